//! 并查集
//!
//! 路径压缩 + 按秩合并，用于 Kruskal 的连通性判定

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use indexmap::IndexMap;

/// 并查集节点
#[derive(Debug, Clone)]
struct Node {
    vertex: VertexId,
    /// 父节点下标，等于自身下标时为根
    parent: usize,
    rank: u32,
}

/// 顶点上的不相交集合森林
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    nodes: Vec<Node>,
    positions: IndexMap<VertexId, usize>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为图中每个顶点建立单元素集合
    pub fn from_graph(graph: &Graph) -> Self {
        let mut uf = Self::new();
        for id in graph.vertex_ids() {
            uf.make_set(id);
        }
        uf
    }

    /// 加入单元素集合，已存在时忽略
    pub fn make_set(&mut self, vertex: VertexId) {
        if self.positions.contains_key(&vertex) {
            return;
        }
        let position = self.nodes.len();
        self.nodes.push(Node {
            vertex,
            parent: position,
            rank: 0,
        });
        self.positions.insert(vertex, position);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 查找代表元，并把路径上每个节点直接挂到根下
    pub fn find(&mut self, vertex: VertexId) -> Result<VertexId> {
        let position = self.position(vertex)?;
        let root = self.find_root(position);
        Ok(self.nodes[root].vertex)
    }

    /// 合并两个集合，返回是否真的发生了合并
    pub fn union(&mut self, a: VertexId, b: VertexId) -> Result<bool> {
        let a_root = self.find_root(self.position(a)?);
        let b_root = self.find_root(self.position(b)?);

        if a_root == b_root {
            return Ok(false);
        }

        let a_rank = self.nodes[a_root].rank;
        let b_rank = self.nodes[b_root].rank;
        if a_rank < b_rank {
            self.nodes[a_root].parent = b_root;
        } else if a_rank > b_rank {
            self.nodes[b_root].parent = a_root;
        } else {
            self.nodes[b_root].parent = a_root;
            self.nodes[a_root].rank += 1;
        }
        Ok(true)
    }

    /// 两个顶点是否在同一集合
    pub fn connected(&mut self, a: VertexId, b: VertexId) -> Result<bool> {
        Ok(self.find(a)? == self.find(b)?)
    }

    fn position(&self, vertex: VertexId) -> Result<usize> {
        self.positions
            .get(&vertex)
            .copied()
            .ok_or(Error::VertexNotFound(vertex))
    }

    fn find_root(&mut self, position: usize) -> usize {
        let mut root = position;
        while self.nodes[root].parent != root {
            root = self.nodes[root].parent;
        }

        // 路径压缩
        let mut current = position;
        while self.nodes[current].parent != root {
            let next = self.nodes[current].parent;
            self.nodes[current].parent = root;
            current = next;
        }
        root
    }
}
