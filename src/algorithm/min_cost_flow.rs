//! 最小费用流
//!
//! 顶点平衡值为正表示供给，为负表示需求，总和必须为零。
//! - 消圈算法：先用 Edmonds-Karp 求出任意可行流，再反复消去残量网络中的负费用环
//! - 连续最短路算法：先饱和全部负费用边，再沿费用最短路把供给逐步送往需求

use crate::algorithm::max_flow::{augment_until_blocked, BreadthFirstPaths};
use crate::algorithm::residual::ResidualGraph;
use crate::algorithm::shortest_path::{MooreBellmanFord, ShortestPath};
use crate::algorithm::traversal::VisitMarks;
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId, SUPER_SINK, SUPER_SOURCE};
use crate::types::EdgeMetric;
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

/// 最小费用流结果
#[derive(Debug, Clone)]
pub struct MinCostFlow {
    /// 总费用：Σ 流量 × 单位费用
    pub cost: f64,
    /// 流量分配（输入边 -> 流量），只含正流量
    pub flow: IndexMap<EdgeId, f64>,
    /// 结束时的残量网络（可能含拆分反平行边用的中转顶点）
    pub residual: Graph,
}

impl MinCostFlow {
    fn from_residual(graph: &Graph, residual: ResidualGraph) -> Self {
        let flow = residual.flow_assignment(graph);
        let cost = flow
            .iter()
            .filter_map(|(id, amount)| graph.edge_by_id(*id).map(|edge| amount * edge.cost()))
            .sum();

        Self {
            cost,
            flow,
            residual: residual.into_graph(),
        }
    }

    /// 某条输入边上的流量
    pub fn flow_on(&self, id: EdgeId) -> f64 {
        self.flow.get(&id).copied().unwrap_or(0.0)
    }
}

/// 最小费用流算法接口
pub trait MinimumCostFlow {
    fn min_cost_flow(&self) -> Result<MinCostFlow>;
}

fn check_balances(graph: &Graph, config: &AlgorithmConfig) -> Result<()> {
    let total = graph.total_balance();
    if total.abs() > config.epsilon {
        warn!(total, "顶点平衡值之和不为零");
        return Err(Error::InfeasibleBalances(total));
    }
    if let Some(id) = graph.vertex_ids().find(|id| id.is_reserved()) {
        return Err(Error::InvalidInput(format!(
            "顶点 {} 使用了保留给超级源汇的 ID",
            id
        )));
    }
    Ok(())
}

/// 消圈算法
pub struct CycleCancelling<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
}

impl<'a> CycleCancelling<'a> {
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

    /// 加入超级源汇并求一个满足全部供需的初始流
    fn initial_flow(&self) -> Result<ResidualGraph> {
        let eps = self.config.epsilon;
        let mut augmented = self.graph.clone();
        augmented.add_vertex(SUPER_SOURCE);
        augmented.add_vertex(SUPER_SINK);

        let mut supply = 0.0;
        for vertex in self.graph.vertices() {
            let balance = vertex.balance();
            if balance > eps {
                augmented.connect(SUPER_SOURCE, vertex.id(), balance, 0.0)?;
                supply += balance;
            } else if balance < -eps {
                augmented.connect(vertex.id(), SUPER_SINK, -balance, 0.0)?;
            }
        }

        let mut residual = ResidualGraph::new(&augmented, &self.config)?;
        let value =
            augment_until_blocked(&BreadthFirstPaths, &mut residual, SUPER_SOURCE, SUPER_SINK)?;
        if (value - supply).abs() > eps {
            warn!(value, supply, "网络无法输送全部供给");
            return Err(Error::InfeasibleNetwork(format!(
                "只能输送 {} / {} 单位",
                value, supply
            )));
        }

        Ok(residual)
    }

    /// 从尚未标记的顶点出发寻找一个负费用环
    fn find_negative_cycle(&self, residual: &ResidualGraph) -> Result<Option<Vec<EdgeId>>> {
        let graph = residual.graph();
        let finder = MooreBellmanFord::new(graph)
            .with_metric(EdgeMetric::Cost)
            .with_config(self.config);
        let mut marks = VisitMarks::new();

        let starts: Vec<VertexId> = graph.vertex_ids().collect();
        for start in starts {
            if marks.is_visited(start) {
                continue;
            }
            if let Some(cycle) = finder.negative_cycle_from(start, &mut marks)? {
                return Ok(Some(cycle));
            }
        }
        Ok(None)
    }
}

impl MinimumCostFlow for CycleCancelling<'_> {
    fn min_cost_flow(&self) -> Result<MinCostFlow> {
        check_balances(self.graph, &self.config)?;
        debug!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "开始消圈"
        );

        let mut residual = self.initial_flow()?;
        let mut cancelled = 0usize;
        while let Some(cycle) = self.find_negative_cycle(&residual)? {
            let amount = residual.bottleneck(&cycle)?;
            residual.augment(&cycle, amount)?;
            cancelled += 1;
            trace!(cancelled, amount, length = cycle.len(), "消去负费用环");
        }

        let result = MinCostFlow::from_residual(self.graph, residual);
        debug!(cost = result.cost, cancelled, "消圈完成");
        Ok(result)
    }
}

/// 连续最短路算法
pub struct SuccessiveShortestPath<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
}

impl<'a> SuccessiveShortestPath<'a> {
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

    /// 饱和所有负费用边，使残量网络不含负费用边
    fn saturate_negative_edges(
        &self,
        residual: &mut ResidualGraph,
        remaining: &mut IndexMap<VertexId, f64>,
    ) -> Result<()> {
        let negative = self
            .graph
            .edges()
            .filter(|edge| edge.cost() < 0.0 && edge.capacity() > self.config.epsilon);

        for edge in negative {
            let (id, capacity) = (edge.id(), edge.capacity());
            let arcs = residual.arcs(id);
            residual.augment(&arcs, capacity)?;
            *remaining.entry(id.from).or_insert(0.0) -= capacity;
            *remaining.entry(id.to).or_insert(0.0) += capacity;
        }
        Ok(())
    }
}

impl MinimumCostFlow for SuccessiveShortestPath<'_> {
    fn min_cost_flow(&self) -> Result<MinCostFlow> {
        check_balances(self.graph, &self.config)?;
        debug!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "开始连续最短路"
        );

        let eps = self.config.epsilon;
        let mut residual = ResidualGraph::new(self.graph, &self.config)?;
        // 正值为未送出的供给，负值为未满足的需求
        let mut remaining: IndexMap<VertexId, f64> = self
            .graph
            .vertices()
            .map(|vertex| (vertex.id(), vertex.balance()))
            .collect();

        self.saturate_negative_edges(&mut residual, &mut remaining)?;

        let mut augmentations = 0usize;
        loop {
            let Some(source) = remaining
                .iter()
                .find(|(_, balance)| **balance > eps)
                .map(|(id, _)| *id)
            else {
                break;
            };

            let reachable = residual.reachable_from(source)?;
            let Some(sink) = reachable
                .iter()
                .copied()
                .find(|id| remaining.get(id).is_some_and(|balance| *balance < -eps))
            else {
                warn!(source = %source, "供给点无法到达任何需求点");
                return Err(Error::InfeasibleNetwork(format!(
                    "顶点 {} 的供给无法送达任何需求点",
                    source
                )));
            };

            let path = MooreBellmanFord::new(residual.graph())
                .with_metric(EdgeMetric::Cost)
                .with_config(self.config)
                .build_shortest_path(source, sink)?;
            if path.edges.is_empty() {
                return Err(Error::InfeasibleNetwork(format!(
                    "顶点 {} 到 {} 不存在路径",
                    source, sink
                )));
            }

            let supply = remaining.get(&source).copied().unwrap_or(0.0);
            let demand = -remaining.get(&sink).copied().unwrap_or(0.0);
            let amount = residual.bottleneck(&path.edges)?.min(supply).min(demand);
            residual.augment(&path.edges, amount)?;

            *remaining.entry(source).or_insert(0.0) -= amount;
            *remaining.entry(sink).or_insert(0.0) += amount;
            augmentations += 1;
            trace!(source = %source, sink = %sink, amount, cost = path.total_weight, "沿最短路增广");
        }

        let result = MinCostFlow::from_residual(self.graph, residual);
        debug!(cost = result.cost, augmentations, "连续最短路完成");
        Ok(result)
    }
}
