//! 图数据结构
//!
//! 顶点集合与边集合的所有者；`Clone` 即深拷贝，是所有残量图的基础

use super::edge::{Edge, EdgeId};
use super::index::AdjacencyIndex;
use super::vertex::{Vertex, VertexId};
use crate::error::{Error, Result};
use crate::types::{Capacity, Cost, Direction, Priority, Weight};
use indexmap::IndexMap;
use priority_queue::PriorityQueue;
use rand::Rng;
use std::cmp::Reverse;

/// 有向带权图
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// 顶点（按 ID 索引，保持插入顺序）
    vertices: IndexMap<VertexId, Vertex>,
    /// 边（按端点有序对索引）
    edges: IndexMap<EdgeId, Edge>,
    /// 邻接索引
    index: AdjacencyIndex,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建含 `count` 个顶点（ID 为 0..count）的图
    pub fn with_vertices(count: usize) -> Self {
        let mut graph = Self::new();
        for id in 0..count as i64 {
            graph.add_vertex(VertexId::new(id));
        }
        graph
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点，已存在时保持原样
    pub fn add_vertex(&mut self, id: VertexId) -> VertexId {
        if !self.vertices.contains_key(&id) {
            self.vertices.insert(id, Vertex::new(id));
            self.index.add_vertex(id);
        }
        id
    }

    /// 添加带平衡值的顶点，已存在时只更新平衡值
    pub fn add_vertex_with_balance(&mut self, id: VertexId, balance: f64) -> VertexId {
        self.add_vertex(id);
        if let Some(vertex) = self.vertices.get_mut(&id) {
            vertex.set_balance(balance);
        }
        id
    }

    /// 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// 获取顶点，不存在时报错
    pub fn try_vertex(&self, id: VertexId) -> Result<&Vertex> {
        self.vertices.get(&id).ok_or(Error::VertexNotFound(id))
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// 所有顶点
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// 所有顶点 ID
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 第一个插入的顶点
    pub fn first_vertex(&self) -> Option<VertexId> {
        self.vertices.keys().next().copied()
    }

    /// 随机选取一个顶点
    pub fn random_vertex(&self) -> Option<VertexId> {
        self.random_vertex_with(&mut rand::thread_rng())
    }

    /// 用给定的随机源选取顶点（便于复现）
    pub fn random_vertex_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<VertexId> {
        if self.vertices.is_empty() {
            return None;
        }
        let position = rng.gen_range(0..self.vertices.len());
        self.vertices.get_index(position).map(|(id, _)| *id)
    }

    /// 所有顶点平衡值之和
    pub fn total_balance(&self) -> f64 {
        self.vertices.values().map(Vertex::balance).sum()
    }

    // ==================== 边操作 ====================

    /// 连接两个顶点，替换同一有序对上已有的边
    pub fn connect(
        &mut self,
        from: VertexId,
        to: VertexId,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeId> {
        self.add_edge(Edge::new(from, to).with_capacity(capacity).with_cost(cost))
    }

    /// 以边权连接两个顶点
    pub fn connect_weighted(&mut self, from: VertexId, to: VertexId, weight: Weight) -> Result<EdgeId> {
        self.add_edge(Edge::new(from, to).with_weight(weight))
    }

    /// 添加边，两个端点都必须已存在，容量必须为非负数
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        // 验证顶点存在
        if !self.vertices.contains_key(&edge.src()) {
            return Err(Error::VertexNotFound(edge.src()));
        }
        if !self.vertices.contains_key(&edge.dst()) {
            return Err(Error::VertexNotFound(edge.dst()));
        }
        let capacity = edge.capacity();
        if capacity < 0.0 || capacity.is_nan() {
            return Err(Error::InvalidInput(format!(
                "边 {} 的容量不能为 {}",
                edge.id(),
                capacity
            )));
        }

        let id = edge.id();
        self.index.add_edge(id);
        self.edges.insert(id, edge);

        Ok(id)
    }

    /// 批量加边，缺失的端点会被自动创建
    ///
    /// 同一有序对重复出现时后者覆盖前者。返回写入的边数。
    pub fn add_all<I>(&mut self, edges: I, direction: Direction) -> Result<usize>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut added = 0;
        for edge in edges {
            self.add_vertex(edge.src());
            self.add_vertex(edge.dst());

            if direction == Direction::Undirected && !edge.id().is_self_loop() {
                self.add_edge(edge.rebind(edge.dst(), edge.src()))?;
                added += 1;
            }
            self.add_edge(edge)?;
            added += 1;
        }
        Ok(added)
    }

    /// 按端点查找边
    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&Edge> {
        self.edges.get(&EdgeId::new(from, to))
    }

    /// 按 ID 查找边
    pub fn edge_by_id(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// 按 ID 查找边，不存在时报错
    pub fn try_edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges.get(&id).ok_or(Error::EdgeNotFound(id))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    pub fn try_edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
        self.edges.get_mut(&id).ok_or(Error::EdgeNotFound(id))
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// 删除边，同时从两个端点的邻接中摘除
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        let edge = self.edges.swap_remove(&id).ok_or(Error::EdgeNotFound(id))?;
        self.index.remove_edge(id);
        Ok(edge)
    }

    /// 所有边
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// 所有边 ID
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ==================== 邻居查询 ====================

    /// 获取顶点的邻居（出边指向的顶点）
    pub fn neighbors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.index.successors(vertex).collect()
    }

    /// 获取顶点的前驱（入边来源的顶点）
    pub fn predecessors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.index.predecessors(vertex).collect()
    }

    /// 获取顶点的所有出边
    pub fn outgoing_edges(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.index
            .successors(vertex)
            .filter_map(move |to| self.edges.get(&EdgeId::new(vertex, to)))
    }

    /// 获取顶点的所有入边
    pub fn incoming_edges(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.index
            .predecessors(vertex)
            .filter_map(move |from| self.edges.get(&EdgeId::new(from, vertex)))
    }

    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.index.out_degree(vertex)
    }

    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.index.in_degree(vertex)
    }

    // ==================== 优先级视图 ====================

    /// 按边权升序排列的全部边，权重相同时 ID 小者在前
    pub fn edges_by_weight(&self) -> Vec<EdgeId> {
        order_by_weight(self.edges.values())
    }

    /// 按边权升序排列的出边
    pub fn neighbor_edges_by_weight(&self, vertex: VertexId) -> Vec<EdgeId> {
        order_by_weight(self.outgoing_edges(vertex))
    }
}

fn order_by_weight<'a>(edges: impl Iterator<Item = &'a Edge>) -> Vec<EdgeId> {
    let mut queue = PriorityQueue::new();
    for edge in edges {
        queue.push(edge.id(), Reverse((Priority(edge.weight()), edge.id())));
    }
    queue.into_sorted_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn v(id: i64) -> VertexId {
        VertexId::new(id)
    }

    fn create_test_graph() -> Graph {
        // 0 -> 1 -> 2, 0 -> 2
        let mut graph = Graph::with_vertices(3);
        graph.connect(v(0), v(1), 4.0, 1.0).unwrap();
        graph.connect(v(1), v(2), 2.0, 2.0).unwrap();
        graph.connect(v(0), v(2), 1.0, 5.0).unwrap();
        graph
    }

    #[test]
    fn test_graph_basic() {
        let graph = create_test_graph();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(v(0)), vec![v(1), v(2)]);
        assert_eq!(graph.predecessors(v(2)), vec![v(1), v(0)]);
        assert_eq!(graph.out_degree(v(0)), 2);
        assert_eq!(graph.in_degree(v(2)), 2);

        let edge = graph.edge(v(1), v(2)).unwrap();
        assert_eq!(edge.capacity(), 2.0);
        assert!(graph.edge(v(2), v(1)).is_none());
    }

    #[test]
    fn test_connect_requires_vertices() {
        let mut graph = Graph::with_vertices(2);
        let err = graph.connect(v(0), v(9), 1.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::VertexNotFound(id) if id == v(9)));
    }

    #[test]
    fn test_connect_replaces_existing_edge() {
        let mut graph = create_test_graph();
        graph.connect(v(0), v(1), 9.0, 0.0).unwrap();

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge(v(0), v(1)).unwrap().capacity(), 9.0);
        assert_eq!(graph.out_degree(v(0)), 2);
    }

    #[test]
    fn test_remove_edge_detaches_endpoints() {
        let mut graph = create_test_graph();
        let removed = graph.remove_edge(EdgeId::from((0, 2))).unwrap();

        assert_eq!(removed.cost(), 5.0);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(v(0)), vec![v(1)]);
        assert_eq!(graph.predecessors(v(2)), vec![v(1)]);
        assert!(matches!(
            graph.remove_edge(EdgeId::from((0, 2))),
            Err(Error::EdgeNotFound(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = create_test_graph();
        original.vertex_mut(v(0)).unwrap().set_balance(3.0);

        let mut copy = original.clone();
        for edge in original.edges() {
            let cloned = copy.edge_by_id(edge.id()).unwrap();
            assert_eq!(cloned.capacity(), edge.capacity());
            assert_eq!(cloned.flow(), edge.flow());
            assert_eq!(cloned.cost(), edge.cost());
        }
        assert_eq!(copy.vertex(v(0)).unwrap().balance(), 3.0);

        copy.try_edge_mut(EdgeId::from((0, 1))).unwrap().set_flow(4.0).unwrap();
        copy.remove_edge(EdgeId::from((1, 2))).unwrap();
        copy.vertex_mut(v(0)).unwrap().set_balance(0.0);

        assert_eq!(original.edge(v(0), v(1)).unwrap().flow(), 0.0);
        assert!(original.edge(v(1), v(2)).is_some());
        assert_eq!(original.vertex(v(0)).unwrap().balance(), 3.0);
    }

    #[test]
    fn test_add_all_undirected() {
        let mut graph = Graph::new();
        let edges = vec![
            Edge::new(v(0), v(1)).with_capacity(3.0),
            Edge::new(v(1), v(2)).with_capacity(5.0),
        ];
        let added = graph.add_all(edges, Direction::Undirected).unwrap();

        assert_eq!(added, 4);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge(v(2), v(1)).unwrap().capacity(), 5.0);
        assert_eq!(graph.edge(v(1), v(0)).unwrap().capacity(), 3.0);
    }

    #[test]
    fn test_add_all_overwrites_duplicates() {
        let mut graph = Graph::new();
        let edges = vec![
            Edge::new(v(0), v(1)).with_capacity(3.0),
            Edge::new(v(0), v(1)).with_capacity(8.0),
        ];
        graph.add_all(edges, Direction::Directed).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(v(0), v(1)).unwrap().capacity(), 8.0);
    }

    #[test]
    fn test_edges_by_weight() {
        let mut graph = Graph::with_vertices(3);
        graph.connect_weighted(v(0), v(1), 5.0).unwrap();
        graph.connect_weighted(v(1), v(2), 1.0).unwrap();
        graph.connect_weighted(v(0), v(2), 1.0).unwrap();
        graph.connect_weighted(v(2), v(0), 3.0).unwrap();

        let ordered = graph.edges_by_weight();
        assert_eq!(
            ordered,
            vec![
                EdgeId::from((0, 2)),
                EdgeId::from((1, 2)),
                EdgeId::from((2, 0)),
                EdgeId::from((0, 1)),
            ]
        );

        let neighbors = graph.neighbor_edges_by_weight(v(0));
        assert_eq!(neighbors, vec![EdgeId::from((0, 2)), EdgeId::from((0, 1))]);
    }

    #[test]
    fn test_random_vertex() {
        let graph = Graph::with_vertices(5);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let id = graph.random_vertex_with(&mut rng).unwrap();
            assert!(graph.contains_vertex(id));
        }
        assert!(Graph::new().random_vertex().is_none());
    }

    #[test]
    fn test_invalid_capacity_rejected() {
        let mut graph = create_test_graph();

        let err = graph.connect(v(0), v(1), -1.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        let err = graph
            .add_edge(Edge::new(v(1), v(0)).with_capacity(f64::NAN))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // 原有的边保持不变，失败的边不会写入
        assert_eq!(graph.edge(v(0), v(1)).unwrap().capacity(), 4.0);
        assert!(graph.edge(v(1), v(0)).is_none());
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_total_balance() {
        let mut graph = Graph::new();
        graph.add_vertex_with_balance(v(0), 2.0);
        graph.add_vertex_with_balance(v(1), -1.5);
        graph.add_vertex(v(2));
        assert!((graph.total_balance() - 0.5).abs() < 1e-12);

        // 重复添加不覆盖平衡值
        graph.add_vertex(v(0));
        assert_eq!(graph.vertex(v(0)).unwrap().balance(), 2.0);
    }
}
