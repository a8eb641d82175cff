//! 残量网络
//!
//! 流算法在输入图的副本上工作：沿边推流时扣减正向容量，耗尽（≤ epsilon）
//! 即删除；反向边按需创建，费用取反。调用者的图始终不被修改。
//!
//! 边以有序对为标识。输入中互为反向的一对边里，起点 ID 较大的那条会经由
//! 一个中转顶点拆成两段（自环拆成三段）：第一段携带原费用，其余段费用为 0。
//! 这样每条残量反向边都是新建的，不会与输入边合并。中转顶点的 ID 小于所有
//! 已有顶点与超级源汇。

use crate::algorithm::traversal::{BreadthFirstSearch, Traversal};
use crate::config::AlgorithmConfig;
use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeId, Graph, VertexId, SUPER_SINK};
use indexmap::{IndexMap, IndexSet};
use tracing::trace;

/// 残量网络
#[derive(Debug, Clone)]
pub struct ResidualGraph {
    graph: Graph,
    /// 被拆分的输入边 -> 依次经过的中转顶点
    relays: IndexMap<EdgeId, Vec<VertexId>>,
    epsilon: f64,
}

impl ResidualGraph {
    /// 由输入图构建：保留全部顶点与平衡值，只保留容量大于 epsilon 的边
    pub fn new(graph: &Graph, config: &AlgorithmConfig) -> Result<Self> {
        let eps = config.epsilon;
        let mut residual = Graph::new();
        for vertex in graph.vertices() {
            residual.add_vertex_with_balance(vertex.id(), vertex.balance());
        }

        let mut relays = IndexMap::new();
        let mut next_relay = graph
            .vertex_ids()
            .map(|id| id.as_i64())
            .fold(SUPER_SINK.as_i64(), i64::min)
            - 1;

        for edge in graph.edges().filter(|edge| edge.capacity() > eps) {
            let id = edge.id();
            let antiparallel = graph
                .edge_by_id(id.reversed())
                .is_some_and(|reverse| reverse.capacity() > eps);

            if antiparallel && id.from >= id.to {
                let count = if id.is_self_loop() { 2 } else { 1 };
                let mut hops = vec![id.from];
                for _ in 0..count {
                    hops.push(residual.add_vertex(VertexId::new(next_relay)));
                    next_relay -= 1;
                }
                hops.push(id.to);

                for (step, pair) in hops.windows(2).enumerate() {
                    let cost = if step == 0 { edge.cost() } else { 0.0 };
                    residual.add_edge(
                        Edge::new(pair[0], pair[1])
                            .with_capacity(edge.capacity())
                            .with_cost(cost),
                    )?;
                }
                relays.insert(id, hops[1..=count].to_vec());
            } else {
                residual.add_edge(
                    Edge::new(id.from, id.to)
                        .with_capacity(edge.capacity())
                        .with_cost(edge.cost()),
                )?;
            }
        }
        if !relays.is_empty() {
            trace!(relays = relays.len(), "拆分反平行边");
        }

        Ok(Self {
            graph: residual,
            relays,
            epsilon: eps,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// 是否为拆分反平行边时插入的中转顶点
    pub fn is_relay(&self, vertex: VertexId) -> bool {
        self.relays.values().flatten().any(|relay| *relay == vertex)
    }

    /// 输入边在残量网络中对应的正向边序列
    pub fn arcs(&self, original: EdgeId) -> Vec<EdgeId> {
        let Some(chain) = self.relays.get(&original) else {
            return vec![original];
        };
        let mut vertices = Vec::with_capacity(chain.len() + 2);
        vertices.push(original.from);
        vertices.extend(chain.iter().copied());
        vertices.push(original.to);
        vertices
            .windows(2)
            .map(|pair| EdgeId::new(pair[0], pair[1]))
            .collect()
    }

    /// 边上的剩余容量，边不存在时为 0
    pub fn capacity(&self, id: EdgeId) -> f64 {
        self.graph.edge_by_id(id).map_or(0.0, Edge::capacity)
    }

    /// 沿一条残量边推送 `amount` 单位的流
    pub fn push(&mut self, id: EdgeId, amount: f64) -> Result<()> {
        let (capacity, cost) = {
            let edge = self.graph.try_edge(id)?;
            (edge.capacity(), edge.cost())
        };
        let remaining = capacity - amount;
        if remaining < -self.epsilon {
            return Err(Error::CapacityExceeded {
                edge: id,
                flow: amount,
                capacity,
            });
        }

        if remaining <= self.epsilon {
            self.graph.remove_edge(id)?;
        } else {
            self.graph.try_edge_mut(id)?.set_capacity(remaining)?;
        }

        // 反向边若已存在，必然是此前在 id 上推流时创建的，费用恰为 -cost
        let reverse = id.reversed();
        match self.graph.edge_mut(reverse) {
            Some(edge) => {
                let capacity = edge.capacity() + amount;
                edge.set_capacity(capacity)?;
            }
            None => {
                self.graph.add_edge(
                    Edge::new(reverse.from, reverse.to)
                        .with_capacity(amount)
                        .with_cost(-cost),
                )?;
            }
        }
        Ok(())
    }

    /// 沿路径上每条边推流
    pub fn augment(&mut self, path: &[EdgeId], amount: f64) -> Result<()> {
        for &id in path {
            self.push(id, amount)?;
        }
        trace!(edges = path.len(), amount, "增广");
        Ok(())
    }

    /// 路径上的最小剩余容量
    pub fn bottleneck(&self, path: &[EdgeId]) -> Result<f64> {
        let mut bottleneck = f64::INFINITY;
        for &id in path {
            bottleneck = bottleneck.min(self.graph.try_edge(id)?.capacity());
        }
        Ok(bottleneck)
    }

    /// 顶点序列对应的残量边
    pub fn path_edges(&self, vertices: &[VertexId]) -> Result<Vec<EdgeId>> {
        vertices
            .windows(2)
            .map(|pair| self.graph.try_edge(EdgeId::new(pair[0], pair[1])).map(Edge::id))
            .collect()
    }

    /// 输入边上的流量：max(0, 原容量 - 剩余容量)
    ///
    /// 拆分过的边按第一段计算。
    pub fn flow_on(&self, original: &Edge) -> f64 {
        let head = self.arcs(original.id())[0];
        (original.capacity() - self.capacity(head)).max(0.0)
    }

    /// 对输入图每条边计算流量，只保留正流量
    pub fn flow_assignment(&self, original: &Graph) -> IndexMap<EdgeId, f64> {
        original
            .edges()
            .filter_map(|edge| {
                let flow = self.flow_on(edge);
                (flow > self.epsilon).then_some((edge.id(), flow))
            })
            .collect()
    }

    /// 在残量网络中从 `source` 可达的顶点，不含中转顶点
    pub fn reachable_from(&self, source: VertexId) -> Result<IndexSet<VertexId>> {
        let relays: IndexSet<VertexId> = self.relays.values().flatten().copied().collect();
        Ok(BreadthFirstSearch::new(&self.graph)
            .reachable_vertices(source)?
            .into_iter()
            .filter(|id| !relays.contains(id))
            .collect())
    }
}
