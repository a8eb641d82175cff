//! 单源最短路径
//!
//! Dijkstra（非负边长）与 Moore-Bellman-Ford（允许负边长，可检测并提取负权环）

use crate::algorithm::path::PathResult;
use crate::algorithm::traversal::VisitMarks;
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::{EdgeMetric, Priority};
use indexmap::IndexMap;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, trace};

/// 最短路径树：距离表与前驱表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortestPathTree {
    /// 源点
    pub source: VertexId,
    /// 源点到各顶点的距离，不可达为 +∞
    pub distances: IndexMap<VertexId, f64>,
    /// 各顶点在最短路径上的前驱
    pub predecessors: IndexMap<VertexId, Option<VertexId>>,
    /// 计算所用的边长度量
    pub metric: EdgeMetric,
}

impl ShortestPathTree {
    fn new(graph: &Graph, source: VertexId, metric: EdgeMetric) -> Self {
        let mut distances = IndexMap::with_capacity(graph.vertex_count());
        let mut predecessors = IndexMap::with_capacity(graph.vertex_count());
        for id in graph.vertex_ids() {
            distances.insert(id, f64::INFINITY);
            predecessors.insert(id, None);
        }
        distances.insert(source, 0.0);

        Self {
            source,
            distances,
            predecessors,
            metric,
        }
    }

    /// 到 `vertex` 的距离
    pub fn distance(&self, vertex: VertexId) -> f64 {
        self.distances
            .get(&vertex)
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn predecessor(&self, vertex: VertexId) -> Option<VertexId> {
        self.predecessors.get(&vertex).copied().flatten()
    }

    pub fn is_reachable(&self, vertex: VertexId) -> bool {
        self.distance(vertex).is_finite()
    }

    fn relax(&mut self, vertex: VertexId, distance: f64, predecessor: VertexId) {
        self.distances.insert(vertex, distance);
        self.predecessors.insert(vertex, Some(predecessor));
    }

    /// 沿前驱回溯重建到 `target` 的路径；不可达时返回空路径
    pub fn path_to(&self, graph: &Graph, target: VertexId) -> Result<PathResult> {
        if !self.is_reachable(target) {
            return Ok(PathResult::empty());
        }

        let mut vertices = vec![target];
        let mut current = target;
        while current != self.source {
            current = match self.predecessor(current) {
                Some(previous) => previous,
                None => return Ok(PathResult::empty()),
            };
            vertices.push(current);
            if vertices.len() > self.distances.len() {
                return Err(Error::NegativeCycleDetected(self.source));
            }
        }
        vertices.reverse();

        PathResult::from_vertices(graph, vertices, self.metric)
    }
}

/// 最短路径算法接口
pub trait ShortestPath {
    fn graph(&self) -> &Graph;

    /// 计算最短路径树；给定 `target` 时允许提前结束
    fn search(&self, source: VertexId, target: Option<VertexId>) -> Result<ShortestPathTree>;

    /// 从 `source` 出发的完整最短路径树
    fn shortest_paths(&self, source: VertexId) -> Result<ShortestPathTree> {
        self.search(source, None)
    }

    /// `source` 到 `target` 的最短路径，不可达时为空路径
    fn build_shortest_path(&self, source: VertexId, target: VertexId) -> Result<PathResult> {
        self.graph().try_vertex(target)?;
        let tree = self.search(source, Some(target))?;
        tree.path_to(self.graph(), target)
    }

    /// `source` 到 `target` 的最短距离，不可达为 +∞
    fn distance(&self, source: VertexId, target: VertexId) -> Result<f64> {
        self.graph().try_vertex(target)?;
        Ok(self.search(source, Some(target))?.distance(target))
    }
}

/// Dijkstra 算法
pub struct Dijkstra<'a> {
    graph: &'a Graph,
    metric: EdgeMetric,
    config: AlgorithmConfig,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            metric: EdgeMetric::Weight,
            config: AlgorithmConfig::default(),
        }
    }

    pub fn with_metric(mut self, metric: EdgeMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Self {
        self.config = config;
        self
    }
}

impl ShortestPath for Dijkstra<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn search(&self, source: VertexId, target: Option<VertexId>) -> Result<ShortestPathTree> {
        self.graph.try_vertex(source)?;
        if let Some(edge) = self.graph.edges().find(|e| self.metric.of(e) < 0.0) {
            return Err(Error::InvalidInput(format!(
                "Dijkstra 不支持负边长: 边 {} 长度为 {}",
                edge.id(),
                self.metric.of(edge)
            )));
        }

        let mut tree = ShortestPathTree::new(self.graph, source, self.metric);

        // 未确定顶点的最小优先队列，距离相同时 ID 小者先出
        let mut frontier = PriorityQueue::with_capacity(self.graph.vertex_count());
        for id in self.graph.vertex_ids() {
            frontier.push(id, Reverse((Priority(tree.distance(id)), id)));
        }

        let mut settled = 0usize;
        while let Some((current, Reverse((Priority(distance), _)))) = frontier.pop() {
            if distance.is_infinite() {
                // 剩余顶点均不可达
                break;
            }
            settled += 1;
            if Some(current) == target {
                break;
            }

            for edge in self.graph.outgoing_edges(current) {
                let head = edge.dst();
                if frontier.get(&head).is_none() {
                    continue;
                }
                let candidate = distance + self.metric.of(edge);
                if candidate < tree.distance(head) - self.config.epsilon {
                    tree.relax(head, candidate, current);
                    frontier.push_increase(head, Reverse((Priority(candidate), head)));
                }
            }
        }

        debug!(source = %source, settled, "Dijkstra 完成");
        Ok(tree)
    }
}

/// Moore-Bellman-Ford 算法
pub struct MooreBellmanFord<'a> {
    graph: &'a Graph,
    metric: EdgeMetric,
    config: AlgorithmConfig,
}

impl<'a> MooreBellmanFord<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            metric: EdgeMetric::Weight,
            config: AlgorithmConfig::default(),
        }
    }

    pub fn with_metric(mut self, metric: EdgeMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Self {
        self.config = config;
        self
    }

    /// 对所有边做一轮松弛，返回是否有距离被更新
    fn relax_round(&self, tree: &mut ShortestPathTree) -> bool {
        let mut changed = false;
        for edge in self.graph.edges() {
            let tail = tree.distance(edge.src());
            if tail.is_infinite() {
                continue;
            }
            let candidate = tail + self.metric.of(edge);
            if candidate < tree.distance(edge.dst()) - self.config.epsilon {
                tree.relax(edge.dst(), candidate, edge.src());
                changed = true;
            }
        }
        changed
    }

    /// 最多 V-1 轮松弛，某轮无更新即提前结束
    fn run_rounds(&self, tree: &mut ShortestPathTree) {
        let rounds = self.graph.vertex_count().saturating_sub(1);
        for round in 0..rounds {
            if !self.relax_round(tree) {
                trace!(round, "松弛收敛");
                break;
            }
        }
    }

    /// 找出一条仍可松弛的边
    fn find_relaxable(&self, tree: &ShortestPathTree) -> Option<EdgeId> {
        self.graph
            .edges()
            .find(|edge| {
                let tail = tree.distance(edge.src());
                tail.is_finite()
                    && tail + self.metric.of(edge) < tree.distance(edge.dst()) - self.config.epsilon
            })
            .map(|edge| edge.id())
    }

    /// 从 `start` 出发寻找一个可达负权环
    ///
    /// 所有从 `start` 可达的顶点都会在 `marks` 中被标记。找到时返回环上
    /// 按前进方向排列的边序列，否则返回 `None`。
    pub fn negative_cycle_from(
        &self,
        start: VertexId,
        marks: &mut VisitMarks,
    ) -> Result<Option<Vec<EdgeId>>> {
        self.graph.try_vertex(start)?;

        let mut tree = ShortestPathTree::new(self.graph, start, self.metric);
        self.run_rounds(&mut tree);

        for id in self.graph.vertex_ids() {
            if tree.is_reachable(id) {
                marks.visit(id);
            }
        }

        let edge = match self.find_relaxable(&tree) {
            Some(edge) => edge,
            None => return Ok(None),
        };
        let candidate = tree.distance(edge.from) + self.metric.of(self.graph.try_edge(edge)?);
        tree.relax(edge.to, candidate, edge.from);

        // 回溯 V 次，保证落在环上
        let mut anchor = edge.to;
        for _ in 0..self.graph.vertex_count() {
            anchor = match tree.predecessor(anchor) {
                Some(previous) => previous,
                None => return Ok(None),
            };
        }

        let mut vertices = vec![anchor];
        let mut current = anchor;
        loop {
            current = match tree.predecessor(current) {
                Some(previous) => previous,
                None => return Ok(None),
            };
            if current == anchor {
                break;
            }
            vertices.push(current);
            if vertices.len() > self.graph.vertex_count() {
                return Ok(None);
            }
        }
        vertices.reverse();

        let mut cycle = Vec::with_capacity(vertices.len());
        let mut total = 0.0;
        for (i, &from) in vertices.iter().enumerate() {
            let to = vertices[(i + 1) % vertices.len()];
            let edge = self.graph.try_edge(EdgeId::new(from, to))?;
            total += self.metric.of(edge);
            cycle.push(edge.id());
        }

        if total >= -self.config.epsilon {
            return Ok(None);
        }

        trace!(start = %start, len = cycle.len(), total, "找到负权环");
        Ok(Some(cycle))
    }
}

impl ShortestPath for MooreBellmanFord<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn search(&self, source: VertexId, _target: Option<VertexId>) -> Result<ShortestPathTree> {
        self.graph.try_vertex(source)?;

        let mut tree = ShortestPathTree::new(self.graph, source, self.metric);
        self.run_rounds(&mut tree);

        if self.find_relaxable(&tree).is_some() {
            return Err(Error::NegativeCycleDetected(source));
        }

        debug!(source = %source, "Moore-Bellman-Ford 完成");
        Ok(tree)
    }
}
