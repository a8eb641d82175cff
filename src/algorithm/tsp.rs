//! 旅行商问题
//!
//! - 最近邻：每步走向权重最小的未访问邻居
//! - 双倍树：Prim 最小生成树的先序遍历，度量图上为 2-近似
//! - 穷举 / 分支定界：显式栈枚举全部哈密顿回路

use crate::algorithm::mst::Prim;
use crate::algorithm::traversal::{DepthFirstSearch, Traversal, VisitMarks};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// 回路
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// 闭合顶点序列，首尾相同（单顶点时只有一个元素）
    pub vertices: Vec<VertexId>,
    /// 回路上的边
    pub edges: Vec<EdgeId>,
    /// 边权总和
    pub cost: f64,
}

impl Tour {
    fn trivial(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
            cost: 0.0,
        }
    }

    /// 按访问顺序连接顶点并闭合回路
    fn from_order(graph: &Graph, order: Vec<VertexId>) -> Result<Self> {
        let Some(&start) = order.first() else {
            return Err(Error::NoTour("顶点序列为空".to_string()));
        };
        if order.len() == 1 {
            return Ok(Self::trivial(start));
        }

        let mut vertices = order;
        vertices.push(start);
        Self::from_edges(graph, start, connecting_edges(graph, &vertices)?)
    }

    fn from_edges(graph: &Graph, start: VertexId, edges: Vec<EdgeId>) -> Result<Self> {
        let mut vertices = Vec::with_capacity(edges.len() + 1);
        vertices.push(start);
        let mut cost = 0.0;
        for &id in &edges {
            cost += graph.try_edge(id)?.weight();
            vertices.push(id.to);
        }
        Ok(Self {
            vertices,
            edges,
            cost,
        })
    }
}

fn connecting_edges(graph: &Graph, vertices: &[VertexId]) -> Result<Vec<EdgeId>> {
    vertices
        .windows(2)
        .map(|pair| {
            graph.edge(pair[0], pair[1]).map(|edge| edge.id()).ok_or_else(|| {
                Error::NoTour(format!("缺少边 {} -> {}", pair[0], pair[1]))
            })
        })
        .collect()
}

/// 旅行商求解接口
pub trait TravelingSalesman {
    fn graph(&self) -> &Graph;

    fn find_tour_from(&self, start: VertexId) -> Result<Tour>;

    /// 从第一个顶点出发
    fn find_tour(&self) -> Result<Tour> {
        match self.graph().first_vertex() {
            Some(start) => self.find_tour_from(start),
            None => Err(Error::NoTour("图为空".to_string())),
        }
    }
}

/// 最近邻启发式
pub struct NearestNeighbor<'a> {
    graph: &'a Graph,
}

impl<'a> NearestNeighbor<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }
}

impl TravelingSalesman for NearestNeighbor<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn find_tour_from(&self, start: VertexId) -> Result<Tour> {
        self.graph.try_vertex(start)?;

        let mut marks = VisitMarks::new();
        marks.visit(start);
        let mut order = vec![start];
        let mut current = start;

        while order.len() < self.graph.vertex_count() {
            let next = self
                .graph
                .neighbor_edges_by_weight(current)
                .into_iter()
                .map(|id| id.to)
                .find(|to| !marks.is_visited(*to))
                .ok_or_else(|| Error::NoTour(format!("顶点 {} 没有未访问的邻居", current)))?;
            marks.visit(next);
            order.push(next);
            current = next;
        }

        let tour = Tour::from_order(self.graph, order)?;
        debug!(start = %start, cost = tour.cost, "最近邻回路");
        Ok(tour)
    }
}

/// 双倍树启发式
pub struct DoubleTree<'a> {
    graph: &'a Graph,
}

impl<'a> DoubleTree<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }
}

impl TravelingSalesman for DoubleTree<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn find_tour_from(&self, start: VertexId) -> Result<Tour> {
        let tree = Prim::new(self.graph).find_mst_from(start)?;
        if tree.vertices.len() < self.graph.vertex_count() {
            return Err(Error::NoTour(format!(
                "生成树只覆盖 {} / {} 个顶点",
                tree.vertices.len(),
                self.graph.vertex_count()
            )));
        }

        let mst = tree.to_graph(self.graph)?;
        let order = DepthFirstSearch::new(&mst).reachable_vertices(start)?;

        let tour = Tour::from_order(self.graph, order)?;
        debug!(start = %start, cost = tour.cost, mst_weight = tree.total_weight, "双倍树回路");
        Ok(tour)
    }
}

/// 搜索栈帧
struct Frame {
    vertex: VertexId,
    edges: Vec<EdgeId>,
    next: usize,
    /// 到达该顶点时的累计费用
    cost: f64,
}

impl Frame {
    fn new(graph: &Graph, vertex: VertexId, cost: f64) -> Self {
        Self {
            vertex,
            edges: graph.outgoing_edges(vertex).map(|edge| edge.id()).collect(),
            next: 0,
            cost,
        }
    }
}

/// 穷举搜索最优回路，可选分支定界剪枝
pub struct BruteForce<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
    prune: bool,
}

impl<'a> BruteForce<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
            prune: false,
        }
    }

    /// 分支定界：累计费用已超过当前最优回路的分支不再展开
    pub fn branch_and_bound(graph: &'a Graph) -> Self {
        Self {
            prune: true,
            ..Self::new(graph)
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Self {
        self.config = config;
        self
    }
}

impl TravelingSalesman for BruteForce<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn find_tour_from(&self, start: VertexId) -> Result<Tour> {
        self.graph.try_vertex(start)?;
        let vertex_count = self.graph.vertex_count();
        if vertex_count == 1 {
            return Ok(Tour::trivial(start));
        }

        let mut marks = VisitMarks::new();
        marks.visit(start);
        let mut path: Vec<EdgeId> = Vec::with_capacity(vertex_count);
        let mut best: Option<(f64, Vec<EdgeId>)> = None;
        let mut best_cost = f64::INFINITY;
        let mut expanded = 0u64;

        let mut stack = vec![Frame::new(self.graph, start, 0.0)];
        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.edges.len() {
                let vertex = frame.vertex;
                stack.pop();
                marks.unvisit(vertex);
                path.pop();
                continue;
            }
            let id = frame.edges[frame.next];
            frame.next += 1;
            let cost = frame.cost + self.graph.try_edge(id)?.weight();

            if id.to == start {
                if path.len() + 1 == vertex_count && cost < best_cost {
                    let mut tour = path.clone();
                    tour.push(id);
                    trace!(cost, "发现更优回路");
                    best_cost = cost;
                    best = Some((cost, tour));
                }
                continue;
            }
            if marks.is_visited(id.to) || (self.prune && cost > best_cost) {
                continue;
            }

            expanded += 1;
            if let Some(limit) = self.config.search_limit {
                if expanded > limit {
                    return Err(Error::SearchLimitExceeded(limit));
                }
            }
            marks.visit(id.to);
            path.push(id);
            stack.push(Frame::new(self.graph, id.to, cost));
        }

        let Some((cost, edges)) = best else {
            return Err(Error::NoTour(format!("从顶点 {} 出发不存在哈密顿回路", start)));
        };
        debug!(start = %start, cost, expanded, prune = self.prune, "穷举搜索完成");
        Tour::from_edges(self.graph, start, edges)
    }
}
