//! 错误类型定义

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    VertexNotFound(VertexId),

    #[error("边不存在: {0}")]
    EdgeNotFound(EdgeId),

    #[error("容量超限: 边 {edge} 的流量 {flow} 超过容量 {capacity}")]
    CapacityExceeded {
        edge: EdgeId,
        flow: f64,
        capacity: f64,
    },

    #[error("顶点平衡值之和不为零: {0}")]
    InfeasibleBalances(f64),

    #[error("网络无法满足供需: {0}")]
    InfeasibleNetwork(String),

    #[error("从顶点 {0} 可达负权环")]
    NegativeCycleDetected(VertexId),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("无法构成回路: {0}")]
    NoTour(String),

    #[error("搜索步数超过上限: {0}")]
    SearchLimitExceeded(u64),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}
