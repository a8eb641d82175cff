//! 通用类型定义

use crate::graph::Edge;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 容量 / 流量
pub type Capacity = f64;

/// 单位费用
pub type Cost = f64;

/// 边权
pub type Weight = f64;

/// 可全序比较的浮点优先级
///
/// `priority_queue` 要求优先级实现 `Ord`，这里用 `f64::total_cmp` 给出全序。
/// 配合 `std::cmp::Reverse` 即得到最小优先队列。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Priority(pub f64);

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 批量加边时的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// 只添加给定方向的边
    Directed,
    /// 同时添加反向边
    Undirected,
}

/// 作为"长度"参与计算的边属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeMetric {
    /// 边权（未设置时回落到容量）
    #[default]
    Weight,
    /// 单位费用
    Cost,
    /// 容量
    Capacity,
}

impl EdgeMetric {
    /// 取出边在该度量下的长度
    pub fn of(&self, edge: &Edge) -> f64 {
        match self {
            EdgeMetric::Weight => edge.weight(),
            EdgeMetric::Cost => edge.cost(),
            EdgeMetric::Capacity => edge.capacity(),
        }
    }
}
