//! 顶点定义
//!
//! 顶点只保存标识和供需平衡值；遍历标记等运行期状态由各算法自行维护

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（图内唯一，负值保留给算法生成的超级顶点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub i64);

impl VertexId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// 是否为保留的超级顶点
    pub fn is_reserved(&self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for VertexId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 超级源点
pub const SUPER_SOURCE: VertexId = VertexId(-1);

/// 超级汇点
pub const SUPER_SINK: VertexId = VertexId(-2);

/// 顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点 ID
    id: VertexId,
    /// 供需平衡值（正为供给，负为需求）
    balance: f64,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(id: VertexId) -> Self {
        Self { id, balance: 0.0 }
    }

    /// 创建带平衡值的顶点
    pub fn with_balance(id: VertexId, balance: f64) -> Self {
        Self { id, balance }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 获取平衡值
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// 设置平衡值
    pub fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
    }

    pub fn is_supply(&self) -> bool {
        self.balance > 0.0
    }

    pub fn is_demand(&self) -> bool {
        self.balance < 0.0
    }
}
