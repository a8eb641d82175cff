//! 最小生成树
//!
//! Kruskal（全局按边权排序 + 并查集）与 Prim（从单个顶点向外扩展）。
//! 两者只看边权，有向图中的边按无向处理（Prim 沿出边扩展）。

use crate::algorithm::union_find::UnionFind;
use crate::error::Result;
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::Priority;
use indexmap::IndexSet;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// 生成树（图不连通时为生成森林）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanningTree {
    /// 边权总和
    pub total_weight: f64,
    /// 按接受顺序排列的树边
    pub edges: Vec<EdgeId>,
    /// 树中的顶点
    pub vertices: IndexSet<VertexId>,
}

impl SpanningTree {
    fn accept(&mut self, graph: &Graph, id: EdgeId) -> Result<()> {
        self.total_weight += graph.try_edge(id)?.weight();
        self.edges.push(id);
        self.vertices.insert(id.from);
        self.vertices.insert(id.to);
        Ok(())
    }

    /// 以原图的边属性把树重建为图，边方向与接受时一致
    pub fn to_graph(&self, graph: &Graph) -> Result<Graph> {
        let mut tree = Graph::new();
        for &id in &self.vertices {
            let balance = graph.try_vertex(id)?.balance();
            tree.add_vertex_with_balance(id, balance);
        }
        for &id in &self.edges {
            tree.add_edge(graph.try_edge(id)?.clone())?;
        }
        Ok(tree)
    }
}

/// Kruskal 算法
pub struct Kruskal<'a> {
    graph: &'a Graph,
}

impl<'a> Kruskal<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    pub fn find_mst(&self) -> Result<SpanningTree> {
        let mut tree = SpanningTree::default();
        let limit = self.graph.vertex_count().saturating_sub(1);
        let mut components = UnionFind::from_graph(self.graph);

        for id in self.graph.edges_by_weight() {
            if tree.edges.len() >= limit {
                break;
            }
            if components.union(id.from, id.to)? {
                tree.accept(self.graph, id)?;
            }
        }

        debug!(
            edges = tree.edges.len(),
            total_weight = tree.total_weight,
            "Kruskal 完成"
        );
        Ok(tree)
    }
}

/// Prim 算法
pub struct Prim<'a> {
    graph: &'a Graph,
}

impl<'a> Prim<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 从第一个顶点开始，空图返回空树
    pub fn find_mst(&self) -> Result<SpanningTree> {
        match self.graph.first_vertex() {
            Some(start) => self.find_mst_from(start),
            None => Ok(SpanningTree::default()),
        }
    }

    pub fn find_mst_from(&self, start: VertexId) -> Result<SpanningTree> {
        self.graph.try_vertex(start)?;

        let mut tree = SpanningTree::default();
        tree.vertices.insert(start);

        let mut frontier = PriorityQueue::new();
        self.enqueue(&mut frontier, &tree, start);

        while tree.vertices.len() < self.graph.vertex_count() {
            // 边界为空：剩余顶点不可达
            let Some((id, _)) = frontier.pop() else {
                break;
            };
            if tree.vertices.contains(&id.to) {
                continue;
            }
            tree.accept(self.graph, id)?;
            self.enqueue(&mut frontier, &tree, id.to);
        }

        debug!(
            start = %start,
            edges = tree.edges.len(),
            total_weight = tree.total_weight,
            "Prim 完成"
        );
        Ok(tree)
    }

    fn enqueue(
        &self,
        frontier: &mut PriorityQueue<EdgeId, Reverse<(Priority, EdgeId)>>,
        tree: &SpanningTree,
        vertex: VertexId,
    ) {
        for edge in self.graph.outgoing_edges(vertex) {
            if !tree.vertices.contains(&edge.dst()) {
                frontier.push(edge.id(), Reverse((Priority(edge.weight()), edge.id())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use crate::types::Direction;

    fn v(id: i64) -> VertexId {
        VertexId::new(id)
    }

    fn weighted(edges: &[(i64, i64, f64)]) -> Graph {
        let mut graph = Graph::new();
        graph
            .add_all(
                edges
                    .iter()
                    .map(|&(a, b, w)| Edge::new(v(a), v(b)).with_weight(w)),
                Direction::Undirected,
            )
            .unwrap();
        graph
    }

    fn create_k4() -> Graph {
        weighted(&[
            (0, 1, 1.0),
            (0, 2, 4.0),
            (0, 3, 3.0),
            (1, 2, 2.0),
            (1, 3, 5.0),
            (2, 3, 6.0),
        ])
    }

    #[test]
    fn test_kruskal_k4() {
        let graph = create_k4();
        let tree = Kruskal::new(&graph).find_mst().unwrap();

        assert_eq!(tree.edges.len(), 3);
        assert!((tree.total_weight - 6.0).abs() < 1e-9);
        assert_eq!(tree.vertices.len(), 4);
        assert_eq!(tree.edges[0], EdgeId::from((0, 1)));
    }

    #[test]
    fn test_prim_k4() {
        let graph = create_k4();
        let tree = Prim::new(&graph).find_mst().unwrap();

        assert_eq!(tree.edges.len(), 3);
        assert!((tree.total_weight - 6.0).abs() < 1e-9);
        assert_eq!(
            tree.edges,
            vec![
                EdgeId::from((0, 1)),
                EdgeId::from((1, 2)),
                EdgeId::from((0, 3))
            ]
        );
    }

    #[test]
    fn test_prim_from_other_start() {
        let graph = create_k4();
        let tree = Prim::new(&graph).find_mst_from(v(3)).unwrap();
        assert!((tree.total_weight - 6.0).abs() < 1e-9);
        assert_eq!(tree.edges[0], EdgeId::from((3, 0)));
    }

    #[test]
    fn test_disconnected_graph() {
        let mut graph = weighted(&[(0, 1, 2.0), (2, 3, 1.0)]);
        graph.add_vertex(v(4));

        let prim = Prim::new(&graph).find_mst_from(v(0)).unwrap();
        assert_eq!(prim.edges, vec![EdgeId::from((0, 1))]);
        assert_eq!(prim.vertices.len(), 2);

        // Kruskal 产生生成森林
        let kruskal = Kruskal::new(&graph).find_mst().unwrap();
        assert_eq!(kruskal.edges.len(), 2);
        assert!((kruskal.total_weight - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_graph() {
        let graph = create_k4();
        let tree = Prim::new(&graph).find_mst().unwrap();
        let rebuilt = tree.to_graph(&graph).unwrap();

        assert_eq!(rebuilt.vertex_count(), 4);
        assert_eq!(rebuilt.edge_count(), 3);
        assert!(rebuilt.contains_edge(EdgeId::from((1, 2))));
        assert!(!rebuilt.contains_edge(EdgeId::from((2, 1))));
        assert_eq!(rebuilt.edge(v(0), v(3)).unwrap().weight(), 3.0);
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(Prim::new(&graph).find_mst().unwrap().edges.is_empty());
        assert!(Kruskal::new(&graph).find_mst().unwrap().edges.is_empty());
    }
}
