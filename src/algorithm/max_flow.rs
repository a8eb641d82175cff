//! 最大流算法
//!
//! 增广路框架：在残量网络上反复寻找源到汇的路径并按瓶颈推流。
//! 寻路策略可替换：
//! - 深度优先 → Ford-Fulkerson（无多项式上界，无理容量下可能不终止）
//! - 广度优先 → Edmonds-Karp，O(V·E²)

use crate::algorithm::residual::ResidualGraph;
use crate::algorithm::traversal::{BreadthFirstSearch, DepthFirstSearch, Traversal};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId, SUPER_SINK, SUPER_SOURCE};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

/// 增广路径寻找策略
pub trait AugmentingPathFinder {
    /// 在残量网络中寻找 `source` 到 `target` 的顶点路径
    fn find_augmenting_path(
        &self,
        residual: &Graph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Option<Vec<VertexId>>>;
}

impl<F> AugmentingPathFinder for F
where
    F: Fn(&Graph, VertexId, VertexId) -> Result<Option<Vec<VertexId>>>,
{
    fn find_augmenting_path(
        &self,
        residual: &Graph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Option<Vec<VertexId>>> {
        self(residual, source, target)
    }
}

/// 广度优先寻路（最短增广路）
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstPaths;

impl AugmentingPathFinder for BreadthFirstPaths {
    fn find_augmenting_path(
        &self,
        residual: &Graph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Option<Vec<VertexId>>> {
        BreadthFirstSearch::new(residual).find_path(source, target)
    }
}

/// 深度优先寻路
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstPaths;

impl AugmentingPathFinder for DepthFirstPaths {
    fn find_augmenting_path(
        &self,
        residual: &Graph,
        source: VertexId,
        target: VertexId,
    ) -> Result<Option<Vec<VertexId>>> {
        DepthFirstSearch::new(residual).find_path(source, target)
    }
}

/// 最大流结果
#[derive(Debug, Clone)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: f64,
    /// 流量分配（输入边 -> 流量），只含正流量
    pub flow: IndexMap<EdgeId, f64>,
    /// 最小割的源侧顶点集
    pub source_side: IndexSet<VertexId>,
    /// 结束时的残量网络（可能含拆分反平行边用的中转顶点）
    pub residual: Graph,
    epsilon: f64,
}

impl MaxFlow {
    /// 某条输入边上的流量
    pub fn flow_on(&self, id: EdgeId) -> f64 {
        self.flow.get(&id).copied().unwrap_or(0.0)
    }

    /// 复制输入图并写入流量，写入时校验容量约束
    pub fn flow_graph(&self, graph: &Graph) -> Result<Graph> {
        let mut result = graph.clone();
        for (&id, &flow) in &self.flow {
            result.try_edge_mut(id)?.set_flow(flow)?;
        }
        Ok(result)
    }

    /// 瓶颈边：流量等于容量的输入边
    pub fn saturated_edges(&self, graph: &Graph) -> Vec<EdgeId> {
        graph
            .edges()
            .filter(|edge| {
                edge.capacity() > self.epsilon
                    && (edge.capacity() - self.flow_on(edge.id())).abs() <= self.epsilon
            })
            .map(|edge| edge.id())
            .collect()
    }
}

/// 增广路主循环
pub fn max_flow_with<F>(
    finder: &F,
    graph: &Graph,
    source: VertexId,
    target: VertexId,
    config: &AlgorithmConfig,
) -> Result<MaxFlow>
where
    F: AugmentingPathFinder + ?Sized,
{
    graph.try_vertex(source)?;
    graph.try_vertex(target)?;
    debug!(
        source = %source,
        target = %target,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "开始计算最大流"
    );

    let mut residual = ResidualGraph::new(graph, config)?;
    let value = augment_until_blocked(finder, &mut residual, source, target)?;

    let flow = residual.flow_assignment(graph);
    let source_side = residual.reachable_from(source)?;
    debug!(value, "最大流计算完成");

    Ok(MaxFlow {
        value,
        flow,
        source_side,
        epsilon: residual.epsilon(),
        residual: residual.into_graph(),
    })
}

/// 在残量网络上反复增广，直到 `target` 不可达，返回送出的总流量
pub(crate) fn augment_until_blocked<F>(
    finder: &F,
    residual: &mut ResidualGraph,
    source: VertexId,
    target: VertexId,
) -> Result<f64>
where
    F: AugmentingPathFinder + ?Sized,
{
    let mut value = 0.0;
    if source == target {
        return Ok(value);
    }

    let mut augmentations = 0usize;
    while let Some(vertices) = finder.find_augmenting_path(residual.graph(), source, target)? {
        let path = residual.path_edges(&vertices)?;
        let bottleneck = residual.bottleneck(&path)?;
        residual.augment(&path, bottleneck)?;

        value += bottleneck;
        augmentations += 1;
        trace!(augmentations, bottleneck, length = path.len(), "找到增广路");
    }
    Ok(value)
}

/// 最大流算法接口
pub trait MaximumFlow {
    fn graph(&self) -> &Graph;

    fn config(&self) -> &AlgorithmConfig;

    fn path_finder(&self) -> &dyn AugmentingPathFinder;

    /// 计算从 source 到 target 的最大流
    fn max_flow(&self, source: VertexId, target: VertexId) -> Result<MaxFlow> {
        max_flow_with(self.path_finder(), self.graph(), source, target, self.config())
    }

    /// 多源多汇最大流
    ///
    /// 在副本上加入超级源点（连向每个源）与超级汇点（每个汇连入），
    /// 超级边的容量取对应顶点的出/入容量之和。结果中的流量与源侧集合
    /// 不含超级顶点。输入图不得使用保留的负数 ID。
    fn multi_source_sink_max_flow(
        &self,
        sources: &[VertexId],
        sinks: &[VertexId],
    ) -> Result<MaxFlow> {
        let graph = self.graph();
        if let Some(id) = graph.vertex_ids().find(|id| id.is_reserved()) {
            return Err(Error::InvalidInput(format!(
                "顶点 {} 使用了保留给超级源汇的 ID",
                id
            )));
        }

        let mut augmented = graph.clone();
        augmented.add_vertex(SUPER_SOURCE);
        augmented.add_vertex(SUPER_SINK);

        for &source in sources {
            graph.try_vertex(source)?;
            let capacity: f64 = graph.outgoing_edges(source).map(|e| e.capacity()).sum();
            augmented.connect(SUPER_SOURCE, source, capacity, 0.0)?;
        }
        for &sink in sinks {
            graph.try_vertex(sink)?;
            let capacity: f64 = graph.incoming_edges(sink).map(|e| e.capacity()).sum();
            augmented.connect(sink, SUPER_SINK, capacity, 0.0)?;
        }

        let mut result = max_flow_with(
            self.path_finder(),
            &augmented,
            SUPER_SOURCE,
            SUPER_SINK,
            self.config(),
        )?;
        result.flow.retain(|id, _| !id.from.is_reserved() && !id.to.is_reserved());
        result.source_side.retain(|id| !id.is_reserved());
        Ok(result)
    }

    /// 限制流量的关键边
    fn find_bottleneck_edges(&self, source: VertexId, target: VertexId) -> Result<Vec<EdgeId>> {
        Ok(self.max_flow(source, target)?.saturated_edges(self.graph()))
    }
}

/// Ford-Fulkerson 最大流（深度优先增广）
pub struct FordFulkerson<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
}

impl<'a> FordFulkerson<'a> {
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
}

impl MaximumFlow for FordFulkerson<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    fn path_finder(&self) -> &dyn AugmentingPathFinder {
        &DepthFirstPaths
    }
}

/// Edmonds-Karp 最大流（广度优先增广）
pub struct EdmondsKarp<'a> {
    graph: &'a Graph,
    config: AlgorithmConfig,
}

impl<'a> EdmondsKarp<'a> {
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
}

impl MaximumFlow for EdmondsKarp<'_> {
    fn graph(&self) -> &Graph {
        self.graph
    }

    fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    fn path_finder(&self) -> &dyn AugmentingPathFinder {
        &BreadthFirstPaths
    }
}
