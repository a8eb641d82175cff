//! 邻接索引
//!
//! 维护每个顶点的后继与前驱集合，支持按端点快速摘除边

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use indexmap::{IndexMap, IndexSet};

/// 邻接索引
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    /// 顶点到后继顶点的映射（出边）
    outgoing: IndexMap<VertexId, IndexSet<VertexId>>,
    /// 顶点到前驱顶点的映射（入边）
    incoming: IndexMap<VertexId, IndexSet<VertexId>>,
}

impl AdjacencyIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记顶点（没有边时也能查询到空邻接）
    pub fn add_vertex(&mut self, vertex: VertexId) {
        self.outgoing.entry(vertex).or_default();
        self.incoming.entry(vertex).or_default();
    }

    /// 添加边
    pub fn add_edge(&mut self, edge: EdgeId) {
        self.outgoing.entry(edge.from).or_default().insert(edge.to);
        self.incoming.entry(edge.to).or_default().insert(edge.from);
    }

    /// 从两个端点上摘除边
    pub fn remove_edge(&mut self, edge: EdgeId) {
        if let Some(set) = self.outgoing.get_mut(&edge.from) {
            set.swap_remove(&edge.to);
        }
        if let Some(set) = self.incoming.get_mut(&edge.to) {
            set.swap_remove(&edge.from);
        }
    }

    /// 后继顶点
    pub fn successors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outgoing
            .get(&vertex)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// 前驱顶点
    pub fn predecessors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incoming
            .get(&vertex)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.outgoing.get(&vertex).map_or(0, |set| set.len())
    }

    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.incoming.get(&vertex).map_or(0, |set| set.len())
    }
}
