//! 图遍历
//!
//! 广度优先与深度优先搜索：可达顶点集合与路径重建。
//! 访问标记保存在每次运行私有的 [`VisitMarks`] 中，图本身不被修改。

use crate::error::Result;
use crate::graph::{Graph, VertexId};
use std::collections::{HashMap, HashSet, VecDeque};

/// 一次遍历的访问标记
#[derive(Debug, Clone, Default)]
pub struct VisitMarks {
    visited: HashSet<VertexId>,
}

impl VisitMarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记为已访问，首次访问时返回 true
    pub fn visit(&mut self, vertex: VertexId) -> bool {
        self.visited.insert(vertex)
    }

    /// 回溯时撤销标记
    pub fn unvisit(&mut self, vertex: VertexId) {
        self.visited.remove(&vertex);
    }

    pub fn is_visited(&self, vertex: VertexId) -> bool {
        self.visited.contains(&vertex)
    }

    /// 清除全部标记
    pub fn reset(&mut self) {
        self.visited.clear();
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

/// 遍历结果：访问顺序与首次发现时的父节点
#[derive(Debug, Clone)]
pub struct SearchTree {
    /// 起点
    pub start: VertexId,
    /// 访问顺序（BFS 为层序，DFS 为先序）
    pub order: Vec<VertexId>,
    /// 顶点 -> 发现它的父顶点
    pub parents: HashMap<VertexId, VertexId>,
    /// 是否到达了目标
    pub found: bool,
}

impl SearchTree {
    fn new(start: VertexId) -> Self {
        Self {
            start,
            order: vec![start],
            parents: HashMap::new(),
            found: false,
        }
    }

    /// 沿父节点回溯，重建从起点到 `target` 的顶点序列
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        let mut path = vec![target];
        let mut current = target;
        while current != self.start {
            current = *self.parents.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// 遍历接口
pub trait Traversal {
    /// 在给定标记上执行一次遍历，到达 `target` 时提前结束
    fn search_with(
        &self,
        start: VertexId,
        target: Option<VertexId>,
        marks: &mut VisitMarks,
    ) -> Result<SearchTree>;

    /// 从 `start` 可达的所有顶点（含起点），按访问顺序
    fn reachable_vertices(&self, start: VertexId) -> Result<Vec<VertexId>> {
        let tree = self.search_with(start, None, &mut VisitMarks::new())?;
        Ok(tree.order)
    }

    /// 查找从 `start` 到 `target` 的顶点路径
    fn find_path(&self, start: VertexId, target: VertexId) -> Result<Option<Vec<VertexId>>> {
        let tree = self.search_with(start, Some(target), &mut VisitMarks::new())?;
        if !tree.found {
            return Ok(None);
        }
        Ok(tree.path_to(target))
    }

    /// 判断两点是否连通
    fn is_reachable(&self, start: VertexId, target: VertexId) -> Result<bool> {
        Ok(self.find_path(start, target)?.is_some())
    }
}

/// 广度优先搜索
pub struct BreadthFirstSearch<'a> {
    graph: &'a Graph,
}

impl<'a> BreadthFirstSearch<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }
}

impl Traversal for BreadthFirstSearch<'_> {
    fn search_with(
        &self,
        start: VertexId,
        target: Option<VertexId>,
        marks: &mut VisitMarks,
    ) -> Result<SearchTree> {
        self.graph.try_vertex(start)?;
        if let Some(target) = target {
            self.graph.try_vertex(target)?;
        }

        let mut tree = SearchTree::new(start);
        let mut queue = VecDeque::new();
        marks.visit(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if Some(current) == target {
                tree.found = true;
                break;
            }

            for edge in self.graph.outgoing_edges(current) {
                let neighbor = edge.dst();
                if marks.visit(neighbor) {
                    tree.parents.insert(neighbor, current);
                    tree.order.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(tree)
    }
}

/// 深度优先搜索（显式栈，不依赖系统调用栈深度）
pub struct DepthFirstSearch<'a> {
    graph: &'a Graph,
}

impl<'a> DepthFirstSearch<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }
}

impl Traversal for DepthFirstSearch<'_> {
    fn search_with(
        &self,
        start: VertexId,
        target: Option<VertexId>,
        marks: &mut VisitMarks,
    ) -> Result<SearchTree> {
        self.graph.try_vertex(start)?;
        if let Some(target) = target {
            self.graph.try_vertex(target)?;
        }

        let mut tree = SearchTree::new(start);
        marks.visit(start);
        if Some(start) == target {
            tree.found = true;
            return Ok(tree);
        }

        // (顶点, 邻居列表, 下一个待处理的邻居下标)
        let mut stack = vec![(start, self.graph.neighbors(start), 0usize)];

        while let Some((current, neighbors, next)) = stack.last_mut() {
            if *next >= neighbors.len() {
                stack.pop();
                continue;
            }
            let neighbor = neighbors[*next];
            *next += 1;
            let parent = *current;

            if marks.visit(neighbor) {
                tree.parents.insert(neighbor, parent);
                tree.order.push(neighbor);
                if Some(neighbor) == target {
                    tree.found = true;
                    break;
                }
                stack.push((neighbor, self.graph.neighbors(neighbor), 0));
            }
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn v(id: i64) -> VertexId {
        VertexId::new(id)
    }

    fn create_test_graph() -> Graph {
        // 0 -> 1 -> 3 -> 4
        //  \-> 2 -/
        // 5 孤立
        let mut graph = Graph::with_vertices(6);
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)] {
            graph.connect(v(a), v(b), 1.0, 0.0).unwrap();
        }
        graph
    }

    #[test]
    fn test_bfs_level_order() {
        let graph = create_test_graph();
        let bfs = BreadthFirstSearch::new(&graph);

        let order = bfs.reachable_vertices(v(0)).unwrap();
        assert_eq!(order, vec![v(0), v(1), v(2), v(3), v(4)]);
    }

    #[test]
    fn test_dfs_preorder() {
        let graph = create_test_graph();
        let dfs = DepthFirstSearch::new(&graph);

        let order = dfs.reachable_vertices(v(0)).unwrap();
        assert_eq!(order, vec![v(0), v(1), v(3), v(4), v(2)]);
    }

    #[test]
    fn test_find_path() {
        let graph = create_test_graph();

        let bfs_path = BreadthFirstSearch::new(&graph)
            .find_path(v(0), v(4))
            .unwrap()
            .unwrap();
        assert_eq!(bfs_path, vec![v(0), v(1), v(3), v(4)]);

        let dfs_path = DepthFirstSearch::new(&graph)
            .find_path(v(2), v(4))
            .unwrap()
            .unwrap();
        assert_eq!(dfs_path, vec![v(2), v(3), v(4)]);
    }

    #[test]
    fn test_unreachable_target() {
        let graph = create_test_graph();
        assert!(BreadthFirstSearch::new(&graph)
            .find_path(v(0), v(5))
            .unwrap()
            .is_none());
        assert!(!DepthFirstSearch::new(&graph)
            .is_reachable(v(4), v(0))
            .unwrap());
    }

    #[test]
    fn test_path_to_self() {
        let graph = create_test_graph();
        let path = DepthFirstSearch::new(&graph).find_path(v(3), v(3)).unwrap();
        assert_eq!(path, Some(vec![v(3)]));
    }

    #[test]
    fn test_shared_marks_block_revisits() {
        let graph = create_test_graph();
        let bfs = BreadthFirstSearch::new(&graph);
        let mut marks = VisitMarks::new();

        let first = bfs.search_with(v(2), None, &mut marks).unwrap();
        assert_eq!(first.order, vec![v(2), v(3), v(4)]);

        // 3、4 已被标记，第二次遍历不会再进入
        let second = bfs.search_with(v(0), None, &mut marks).unwrap();
        assert_eq!(second.order, vec![v(0), v(1)]);

        marks.reset();
        assert!(marks.is_empty());
    }

    #[test]
    fn test_missing_vertex() {
        let graph = create_test_graph();
        let err = BreadthFirstSearch::new(&graph)
            .reachable_vertices(v(42))
            .unwrap_err();
        assert!(matches!(err, Error::VertexNotFound(_)));
    }
}
