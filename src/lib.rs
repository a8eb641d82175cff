//! GraphWorks - 带权有向图算法引擎
//!
//! 内存中的图模型与一组经典图算法：
//! - 广度/深度优先遍历与路径重建
//! - Dijkstra、Moore-Bellman-Ford 最短路径（含负权环提取）
//! - Kruskal、Prim 最小生成树
//! - Ford-Fulkerson、Edmonds-Karp 最大流
//! - 消圈、连续最短路最小费用流
//! - 最近邻、双倍树、穷举/分支定界旅行商
//! - 二分图最大匹配

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod types;

// 重导出常用类型
pub use config::AlgorithmConfig;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, Vertex, VertexId, SUPER_SINK, SUPER_SOURCE};
pub use types::{Capacity, Cost, Direction, EdgeMetric, Priority, Weight};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
