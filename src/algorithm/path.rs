//! 路径结果

use crate::error::Result;
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::EdgeMetric;
use serde::{Deserialize, Serialize};

/// 路径结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列
    pub vertices: Vec<VertexId>,
    /// 路径上的边序列
    pub edges: Vec<EdgeId>,
    /// 路径长度（边数）
    pub length: usize,
    /// 路径总长度（按所选度量累加）
    pub total_weight: f64,
}

impl PathResult {
    /// 空路径（目标不可达）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 由顶点序列构造，逐段在图中查边
    pub fn from_vertices(graph: &Graph, vertices: Vec<VertexId>, metric: EdgeMetric) -> Result<Self> {
        let mut edges = Vec::with_capacity(vertices.len().saturating_sub(1));
        let mut total_weight = 0.0;
        for pair in vertices.windows(2) {
            let edge = graph.try_edge(EdgeId::new(pair[0], pair[1]))?;
            total_weight += metric.of(edge);
            edges.push(edge.id());
        }

        Ok(Self {
            length: edges.len(),
            vertices,
            edges,
            total_weight,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
