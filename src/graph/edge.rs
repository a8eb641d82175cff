//! 边定义
//!
//! 有向边，以 (起点, 终点) 有序对为标识

use crate::error::{Error, Result};
use crate::graph::vertex::VertexId;
use crate::types::{Capacity, Cost, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（起点与终点的有序对）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId {
    pub from: VertexId,
    pub to: VertexId,
}

impl EdgeId {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// 反向边的 ID
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl From<(i64, i64)> for EdgeId {
    fn from((from, to): (i64, i64)) -> Self {
        Self::new(VertexId(from), VertexId(to))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 边权，`None` 表示未设置
    weight: Option<Weight>,
    /// 容量
    capacity: Capacity,
    /// 当前流量，始终满足 0 <= flow <= capacity
    flow: Capacity,
    /// 单位费用
    cost: Cost,
}

impl Edge {
    /// 创建新边
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self {
            id: EdgeId::new(from, to),
            weight: None,
            capacity: 0.0,
            flow: 0.0,
            cost: 0.0,
        }
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// 复制属性到新的端点
    pub(crate) fn rebind(&self, from: VertexId, to: VertexId) -> Self {
        Self {
            id: EdgeId::new(from, to),
            ..self.clone()
        }
    }

    /// 获取边 ID
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// 获取源顶点 ID
    pub fn src(&self) -> VertexId {
        self.id.from
    }

    /// 获取目标顶点 ID
    pub fn dst(&self) -> VertexId {
        self.id.to
    }

    /// 获取边权
    ///
    /// 未显式设置边权时以容量代替。
    pub fn weight(&self) -> Weight {
        self.weight.unwrap_or(self.capacity)
    }

    /// 是否显式设置了边权
    pub fn has_weight(&self) -> bool {
        self.weight.is_some()
    }

    pub fn set_weight(&mut self, weight: Weight) {
        self.weight = Some(weight);
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// 设置容量，不允许低于当前流量
    pub fn set_capacity(&mut self, capacity: Capacity) -> Result<()> {
        if capacity < 0.0 || capacity.is_nan() {
            return Err(Error::InvalidInput(format!(
                "边 {} 的容量不能为 {}",
                self.id, capacity
            )));
        }
        if capacity < self.flow {
            return Err(Error::CapacityExceeded {
                edge: self.id,
                flow: self.flow,
                capacity,
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    pub fn flow(&self) -> Capacity {
        self.flow
    }

    /// 设置流量，不允许超过容量
    pub fn set_flow(&mut self, flow: Capacity) -> Result<()> {
        if flow < 0.0 || flow.is_nan() {
            return Err(Error::InvalidInput(format!(
                "边 {} 的流量不能为 {}",
                self.id, flow
            )));
        }
        if flow > self.capacity {
            return Err(Error::CapacityExceeded {
                edge: self.id,
                flow,
                capacity: self.capacity,
            });
        }
        self.flow = flow;
        Ok(())
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn set_cost(&mut self, cost: Cost) {
        self.cost = cost;
    }

    /// 剩余可用容量
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }

    /// 以容量为依据的优先级：容量越大优先级越高，零容量记为 0
    pub fn capacity_priority(&self) -> f64 {
        if self.capacity == 0.0 {
            0.0
        } else {
            1.0 / self.capacity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: i64) -> VertexId {
        VertexId::new(id)
    }

    #[test]
    fn test_edge_identity() {
        let e = Edge::new(v(1), v(2)).with_capacity(5.0).with_cost(3.0);

        assert_eq!(e.id(), EdgeId::from((1, 2)));
        assert_eq!(e.src(), v(1));
        assert_eq!(e.dst(), v(2));
        assert_eq!(e.id().reversed(), EdgeId::from((2, 1)));
        assert_eq!(e.cost(), 3.0);
    }

    #[test]
    fn test_edge_weight_falls_back_to_capacity() {
        let mut e = Edge::new(v(0), v(1)).with_capacity(7.0);
        assert!(!e.has_weight());
        assert_eq!(e.weight(), 7.0);

        e.set_weight(2.0);
        assert_eq!(e.weight(), 2.0);
        assert_eq!(e.capacity(), 7.0);
    }

    #[test]
    fn test_flow_cannot_exceed_capacity() {
        let mut e = Edge::new(v(0), v(1)).with_capacity(4.0);
        e.set_flow(3.0).unwrap();

        let err = e.set_flow(4.5).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { .. }));
        // 失败后保留原值
        assert_eq!(e.flow(), 3.0);
        assert_eq!(e.residual_capacity(), 1.0);
    }

    #[test]
    fn test_capacity_cannot_drop_below_flow() {
        let mut e = Edge::new(v(0), v(1)).with_capacity(4.0);
        e.set_flow(3.0).unwrap();

        assert!(matches!(
            e.set_capacity(2.0),
            Err(Error::CapacityExceeded { .. })
        ));
        assert_eq!(e.capacity(), 4.0);
        assert!(matches!(e.set_capacity(-1.0), Err(Error::InvalidInput(_))));
        e.set_capacity(3.0).unwrap();
    }

    #[test]
    fn test_capacity_priority() {
        assert_eq!(Edge::new(v(0), v(1)).capacity_priority(), 0.0);
        assert_eq!(
            Edge::new(v(0), v(1)).with_capacity(4.0).capacity_priority(),
            0.25
        );
    }
}
