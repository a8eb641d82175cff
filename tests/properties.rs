//! 跨算法一致性测试
//!
//! 用固定种子的随机图比较互为参照的算法

use graphworks::algorithm::{
    BreadthFirstSearch, CycleCancelling, Dijkstra, EdmondsKarp, FordFulkerson, Kruskal,
    MaxFlow, MaximumFlow, MinCostFlow, MinimumCostFlow, MooreBellmanFord, Prim, ShortestPath,
    SuccessiveShortestPath, Traversal, UnionFind,
};
use graphworks::{Direction, Edge, EdgeId, Graph, VertexId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const SEEDS: [u64; 8] = [1, 7, 42, 99, 2024, 31337, 65535, 271828];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn v(id: i64) -> VertexId {
    VertexId::new(id)
}

/// 连通无向图：先串一条链再随机加边
fn random_connected_undirected(rng: &mut StdRng) -> Graph {
    let n: i64 = rng.gen_range(4..10);
    let mut edges = Vec::new();
    for id in 1..n {
        edges.push(Edge::new(v(id - 1), v(id)).with_weight(rng.gen_range(1..50) as f64));
    }
    for _ in 0..(n * 2) {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            edges.push(Edge::new(v(a), v(b)).with_weight(rng.gen_range(1..50) as f64));
        }
    }

    let mut graph = Graph::new();
    graph.add_all(edges, Direction::Undirected).unwrap();
    graph
}

/// 不含反平行边的随机有向图
fn random_directed(rng: &mut StdRng, n: i64, density: usize) -> Graph {
    let mut graph = Graph::with_vertices(n as usize);
    for _ in 0..density {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b || graph.contains_edge(EdgeId::new(v(b), v(a))) {
            continue;
        }
        let capacity = rng.gen_range(1..20) as f64;
        graph.connect(v(a), v(b), capacity, 0.0).unwrap();
        graph
            .edge_mut(EdgeId::new(v(a), v(b)))
            .unwrap()
            .set_weight(rng.gen_range(0..30) as f64);
    }
    graph
}

/// 可行的供需网络：0 供给 k，n-1 需求 k，沿 0 -> 1 -> ... -> n-1 的链保证可行
fn random_supply_network(rng: &mut StdRng) -> Graph {
    let n: i64 = rng.gen_range(4..8);
    let supply = rng.gen_range(1..6) as f64;

    let mut graph = Graph::with_vertices(n as usize);
    graph.vertex_mut(v(0)).unwrap().set_balance(supply);
    graph.vertex_mut(v(n - 1)).unwrap().set_balance(-supply);
    for id in 1..n {
        let cost = rng.gen_range(0..10) as f64;
        graph.connect(v(id - 1), v(id), supply, cost).unwrap();
    }
    for _ in 0..(n * 2) {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b
            || graph.contains_edge(EdgeId::new(v(a), v(b)))
            || graph.contains_edge(EdgeId::new(v(b), v(a)))
        {
            continue;
        }
        let capacity = rng.gen_range(1..6) as f64;
        let cost = rng.gen_range(-3..10) as f64;
        graph.connect(v(a), v(b), capacity, cost).unwrap();
    }
    graph
}

/// 无向供需网络：每条边都按两个方向建模，费用可为负
fn random_undirected_supply_network(rng: &mut StdRng) -> Graph {
    let n: i64 = rng.gen_range(4..8);
    let supply = rng.gen_range(1..6) as f64;

    let mut graph = Graph::with_vertices(n as usize);
    graph.vertex_mut(v(0)).unwrap().set_balance(supply);
    graph.vertex_mut(v(n - 1)).unwrap().set_balance(-supply);
    let mut edges = Vec::new();
    for id in 1..n {
        let cost = rng.gen_range(0..10) as f64;
        edges.push(Edge::new(v(id - 1), v(id)).with_capacity(supply).with_cost(cost));
    }
    graph.add_all(edges, Direction::Undirected).unwrap();

    for _ in 0..(n * 2) {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b || graph.contains_edge(EdgeId::new(v(a), v(b))) {
            continue;
        }
        let capacity = rng.gen_range(1..6) as f64;
        let cost = rng.gen_range(-2..10) as f64;
        let edge = Edge::new(v(a), v(b)).with_capacity(capacity).with_cost(cost);
        graph.add_all([edge], Direction::Undirected).unwrap();
    }
    graph
}

/// 无向容量网络
fn random_undirected_network(rng: &mut StdRng, n: i64, density: usize) -> Graph {
    let mut graph = Graph::with_vertices(n as usize);
    for _ in 0..density {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b {
            continue;
        }
        let edge = Edge::new(v(a), v(b)).with_capacity(rng.gen_range(1..20) as f64);
        graph.add_all([edge], Direction::Undirected).unwrap();
    }
    graph
}

/// 每个顶点的净流出等于平衡值，且每条边不超容量
fn assert_balanced(graph: &Graph, result: &MinCostFlow, seed: u64) {
    for vertex in graph.vertices() {
        let out: f64 = graph
            .outgoing_edges(vertex.id())
            .map(|e| result.flow_on(e.id()))
            .sum();
        let incoming: f64 = graph
            .incoming_edges(vertex.id())
            .map(|e| result.flow_on(e.id()))
            .sum();
        assert!(
            (out - incoming - vertex.balance()).abs() < 1e-6,
            "seed {seed}, vertex {}",
            vertex.id()
        );
    }
    for edge in graph.edges() {
        assert!(result.flow_on(edge.id()) <= edge.capacity() + 1e-6, "seed {seed}");
    }
}

/// 源点净流出为流量值，汇点净流入为流量值，其余顶点守恒
fn assert_conserved(
    graph: &Graph,
    result: &MaxFlow,
    source: VertexId,
    sink: VertexId,
    seed: u64,
) {
    let flowed = result.flow_graph(graph).unwrap();
    for id in flowed.vertex_ids() {
        let out: f64 = flowed.outgoing_edges(id).map(|e| e.flow()).sum();
        let incoming: f64 = flowed.incoming_edges(id).map(|e| e.flow()).sum();
        let expected = if id == source {
            result.value
        } else if id == sink {
            -result.value
        } else {
            0.0
        };
        assert!((out - incoming - expected).abs() < 1e-6, "seed {seed}, vertex {id}");
    }
}

#[test]
fn test_kruskal_equals_prim() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_connected_undirected(&mut rng);

        let kruskal = Kruskal::new(&graph).find_mst().unwrap();
        let prim = Prim::new(&graph).find_mst().unwrap();

        assert_eq!(kruskal.edges.len(), graph.vertex_count() - 1, "seed {seed}");
        assert_eq!(prim.edges.len(), graph.vertex_count() - 1, "seed {seed}");
        assert!(
            (kruskal.total_weight - prim.total_weight).abs() < 1e-6,
            "seed {seed}: kruskal {} != prim {}",
            kruskal.total_weight,
            prim.total_weight
        );
    }
}

#[test]
fn test_dijkstra_equals_bellman_ford() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_directed(&mut rng, 10, 30);

        let dijkstra = Dijkstra::new(&graph).shortest_paths(v(0)).unwrap();
        let bellman_ford = MooreBellmanFord::new(&graph).shortest_paths(v(0)).unwrap();

        for id in graph.vertex_ids() {
            let (a, b) = (dijkstra.distance(id), bellman_ford.distance(id));
            if a.is_infinite() || b.is_infinite() {
                assert_eq!(a, b, "seed {seed}, vertex {id}");
            } else {
                assert!((a - b).abs() < 1e-6, "seed {seed}, vertex {id}: {a} != {b}");
            }
        }
    }
}

#[test]
fn test_shortest_path_matches_distance() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_directed(&mut rng, 8, 25);
        let dijkstra = Dijkstra::new(&graph);

        for target in graph.vertex_ids() {
            let path = dijkstra.build_shortest_path(v(0), target).unwrap();
            let distance = dijkstra.distance(v(0), target).unwrap();
            if distance.is_infinite() {
                assert!(path.is_empty());
            } else {
                assert_eq!(path.vertices.first(), Some(&v(0)));
                assert_eq!(path.vertices.last(), Some(&target));
                assert!((path.total_weight - distance).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn test_ford_fulkerson_equals_edmonds_karp() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_directed(&mut rng, 8, 24);
        let (source, sink) = (v(0), v(7));

        let ff = FordFulkerson::new(&graph).max_flow(source, sink).unwrap();
        let ek = EdmondsKarp::new(&graph).max_flow(source, sink).unwrap();
        assert!(
            (ff.value - ek.value).abs() < 1e-6,
            "seed {seed}: ff {} != ek {}",
            ff.value,
            ek.value
        );

        // 最小割容量等于最大流
        let cut: f64 = graph
            .edges()
            .filter(|e| ek.source_side.contains(&e.src()) && !ek.source_side.contains(&e.dst()))
            .map(|e| e.capacity())
            .sum();
        assert!((cut - ek.value).abs() < 1e-6, "seed {seed}");
    }
}

#[test]
fn test_max_flow_conservation() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_directed(&mut rng, 8, 24);
        let (source, sink) = (v(0), v(7));
        let result = EdmondsKarp::new(&graph).max_flow(source, sink).unwrap();
        assert_conserved(&graph, &result, source, sink, seed);
    }
}

#[test]
fn test_max_flow_on_undirected_networks() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_undirected_network(&mut rng, 8, 16);
        let (source, sink) = (v(0), v(7));

        let ff = FordFulkerson::new(&graph).max_flow(source, sink).unwrap();
        let ek = EdmondsKarp::new(&graph).max_flow(source, sink).unwrap();
        assert!(
            (ff.value - ek.value).abs() < 1e-6,
            "seed {seed}: ff {} != ek {}",
            ff.value,
            ek.value
        );

        let cut: f64 = graph
            .edges()
            .filter(|e| ek.source_side.contains(&e.src()) && !ek.source_side.contains(&e.dst()))
            .map(|e| e.capacity())
            .sum();
        assert!((cut - ek.value).abs() < 1e-6, "seed {seed}");
        assert!(ek.source_side.iter().all(|id| graph.contains_vertex(*id)));

        assert_conserved(&graph, &ff, source, sink, seed);
        assert_conserved(&graph, &ek, source, sink, seed);
    }
}

#[test]
fn test_cycle_cancelling_equals_successive_shortest_path() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_supply_network(&mut rng);

        let cc = CycleCancelling::new(&graph).min_cost_flow().unwrap();
        let ssp = SuccessiveShortestPath::new(&graph).min_cost_flow().unwrap();
        assert!(
            (cc.cost - ssp.cost).abs() < 1e-6,
            "seed {seed}: cc {} != ssp {}",
            cc.cost,
            ssp.cost
        );

        assert_balanced(&graph, &cc, seed);
        assert_balanced(&graph, &ssp, seed);
    }
}

#[test]
fn test_min_cost_flow_on_undirected_networks() {
    init_tracing();
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = random_undirected_supply_network(&mut rng);

        let cc = CycleCancelling::new(&graph).min_cost_flow().unwrap();
        let ssp = SuccessiveShortestPath::new(&graph).min_cost_flow().unwrap();
        assert!(
            (cc.cost - ssp.cost).abs() < 1e-6,
            "seed {seed}: cc {} != ssp {}",
            cc.cost,
            ssp.cost
        );
        assert_balanced(&graph, &cc, seed);
        assert_balanced(&graph, &ssp, seed);

        // 报告的费用与逐边流量一致
        let recomputed: f64 = graph.edges().map(|e| cc.flow_on(e.id()) * e.cost()).sum();
        assert!((recomputed - cc.cost).abs() < 1e-6, "seed {seed}");
    }
}

#[test]
fn test_union_find_matches_reachability() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = 12;
        let mut graph = Graph::with_vertices(n);
        let mut uf = UnionFind::from_graph(&graph);

        for _ in 0..8 {
            let a = v(rng.gen_range(0..n as i64));
            let b = v(rng.gen_range(0..n as i64));
            uf.union(a, b).unwrap();
            assert_eq!(uf.find(a).unwrap(), uf.find(b).unwrap());
            if a != b {
                graph.connect(a, b, 1.0, 0.0).unwrap();
                graph.connect(b, a, 1.0, 0.0).unwrap();
            }
        }

        let bfs = BreadthFirstSearch::new(&graph);
        for a in graph.vertex_ids().collect::<Vec<_>>() {
            let root = uf.find(a).unwrap();
            assert_eq!(uf.find(a).unwrap(), root);
            for b in graph.vertex_ids().collect::<Vec<_>>() {
                assert_eq!(
                    uf.connected(a, b).unwrap(),
                    bfs.is_reachable(a, b).unwrap(),
                    "seed {seed}: {a} / {b}"
                );
            }
        }
    }
}

#[test]
fn test_clone_is_independent() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut graph = random_directed(&mut rng, 6, 15);
    graph.connect(v(0), v(5), 3.0, 1.0).unwrap();
    let mut copy = graph.clone();

    assert_eq!(copy.vertex_count(), graph.vertex_count());
    for edge in graph.edges() {
        assert_eq!(copy.edge_by_id(edge.id()), Some(edge));
    }

    let ids: Vec<EdgeId> = copy.edge_ids().collect();
    for id in &ids {
        copy.try_edge_mut(*id).unwrap().set_capacity(100.0).unwrap();
    }
    copy.remove_edge(ids[0]).unwrap();

    assert!(graph.contains_edge(ids[0]));
    assert!(graph.edges().all(|e| e.capacity() < 100.0));
}
