//! 图算法模块
//!
//! 遍历、最短路径、最小生成树、最大流、最小费用流、旅行商与二分图匹配

mod matching;
mod max_flow;
mod min_cost_flow;
mod mst;
mod path;
mod residual;
mod shortest_path;
mod traversal;
mod tsp;
mod union_find;

pub use matching::{Matching, MatchingResult};
pub use max_flow::{
    max_flow_with, AugmentingPathFinder, BreadthFirstPaths, DepthFirstPaths, EdmondsKarp,
    FordFulkerson, MaxFlow, MaximumFlow,
};
pub use min_cost_flow::{CycleCancelling, MinCostFlow, MinimumCostFlow, SuccessiveShortestPath};
pub use mst::{Kruskal, Prim, SpanningTree};
pub use path::PathResult;
pub use residual::ResidualGraph;
pub use shortest_path::{Dijkstra, MooreBellmanFord, ShortestPath, ShortestPathTree};
pub use traversal::{BreadthFirstSearch, DepthFirstSearch, SearchTree, Traversal, VisitMarks};
pub use tsp::{BruteForce, DoubleTree, NearestNeighbor, Tour, TravelingSalesman};
pub use union_find::UnionFind;
