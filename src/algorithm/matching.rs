//! 二分图最大匹配
//!
//! 归约为单位容量最大流：超级源点连向左部，右部连向超级汇点。

use crate::algorithm::max_flow::{max_flow_with, DepthFirstPaths, FordFulkerson, MaximumFlow};
use crate::config::AlgorithmConfig;
use crate::error::Result;
use crate::graph::{Graph, VertexId, SUPER_SINK, SUPER_SOURCE};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 匹配结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    /// 匹配边数
    pub size: usize,
    /// (左部顶点, 右部顶点)
    pub pairs: Vec<(VertexId, VertexId)>,
}

pub struct Matching<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
}

impl<'a> Matching<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            config: AlgorithmConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AlgorithmConfig) -> Self {
        self.config = config;
        self
    }

    /// 以 `left` 为左部、其余顶点为右部求最大匹配
    ///
    /// 只使用左部指向右部的边，每条边容量视为 1。
    pub fn find_matching(&self, left: &[VertexId]) -> Result<MatchingResult> {
        let left: IndexSet<VertexId> = left.iter().copied().collect();
        for &id in &left {
            self.graph.try_vertex(id)?;
        }

        let mut network = Graph::new();
        for id in self.graph.vertex_ids().filter(|id| !id.is_reserved()) {
            network.add_vertex(id);
        }
        network.add_vertex(SUPER_SOURCE);
        network.add_vertex(SUPER_SINK);

        for edge in self.graph.edges() {
            let (from, to) = (edge.src(), edge.dst());
            if left.contains(&from) && !left.contains(&to) && !to.is_reserved() {
                network.connect(from, to, 1.0, 0.0)?;
            }
        }
        for id in self.graph.vertex_ids().filter(|id| !id.is_reserved()) {
            if left.contains(&id) {
                network.connect(SUPER_SOURCE, id, 1.0, 0.0)?;
            } else {
                network.connect(id, SUPER_SINK, 1.0, 0.0)?;
            }
        }

        let flow = max_flow_with(&DepthFirstPaths, &network, SUPER_SOURCE, SUPER_SINK, &self.config)?;
        let pairs: Vec<(VertexId, VertexId)> = flow
            .flow
            .keys()
            .filter(|id| !id.from.is_reserved() && !id.to.is_reserved())
            .map(|id| (id.from, id.to))
            .collect();

        debug!(left = left.len(), size = pairs.len(), "二分图匹配完成");
        Ok(MatchingResult {
            size: pairs.len(),
            pairs,
        })
    }

    /// 图中已含超级源点 -1 与超级汇点 -2 及其边时，直接求匹配边数
    pub fn count_matching_edges(&self) -> Result<usize> {
        let value = FordFulkerson::new(self.graph)
            .with_config(self.config)
            .max_flow(SUPER_SOURCE, SUPER_SINK)?
            .value;
        Ok(value.round() as usize)
    }
}
