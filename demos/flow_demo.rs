//! GraphWorks 演示脚本
//!
//! 构造一个小型运输网络，依次运行最短路径、最小生成树、最大流、最小费用流与旅行商

use graphworks::algorithm::{
    CycleCancelling, Dijkstra, DoubleTree, EdmondsKarp, Kruskal, MaximumFlow, MinimumCostFlow,
    NearestNeighbor, ShortestPath, SuccessiveShortestPath, TravelingSalesman,
};
use graphworks::{AlgorithmConfig, Direction, Edge, Graph, VertexId};
use tracing_subscriber::EnvFilter;

fn v(id: i64) -> VertexId {
    VertexId::new(id)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("GraphWorks 演示");
    println!("================\n");

    let config = match std::env::args().nth(1) {
        Some(path) => AlgorithmConfig::from_file(path)?,
        None => AlgorithmConfig::default(),
    };

    // 仓库 0 供给 4 单位，门店 4 需求 4 单位
    let mut graph = Graph::new();
    graph.add_all(
        [
            (0, 1, 3.0, 2.0),
            (0, 2, 2.0, 4.0),
            (1, 2, 2.0, 1.0),
            (1, 3, 2.0, 3.0),
            (2, 3, 3.0, 1.0),
            (2, 4, 1.0, 6.0),
            (3, 4, 4.0, 2.0),
        ]
        .into_iter()
        .map(|(a, b, capacity, cost)| {
            Edge::new(v(a), v(b))
                .with_capacity(capacity)
                .with_cost(cost)
                .with_weight(cost)
        }),
        Direction::Directed,
    )?;
    graph.add_vertex_with_balance(v(0), 4.0);
    graph.add_vertex_with_balance(v(4), -4.0);
    println!(
        "1. 网络: {} 顶点, {} 边\n",
        graph.vertex_count(),
        graph.edge_count()
    );

    let path = Dijkstra::new(&graph)
        .with_config(config)
        .build_shortest_path(v(0), v(4))?;
    println!("2. 最短路径 0 -> 4: {:?}", path.vertices);
    println!("   总长度: {}\n", path.total_weight);

    let flow = EdmondsKarp::new(&graph)
        .with_config(config)
        .max_flow(v(0), v(4))?;
    println!("3. 最大流 0 -> 4: {}", flow.value);
    for (edge, amount) in &flow.flow {
        println!("   {}: {}", edge, amount);
    }
    println!("   最小割源侧: {:?}\n", flow.source_side);

    let cc = CycleCancelling::new(&graph).with_config(config).min_cost_flow()?;
    let ssp = SuccessiveShortestPath::new(&graph)
        .with_config(config)
        .min_cost_flow()?;
    println!("4. 最小费用流");
    println!("   消圈: {}", cc.cost);
    println!("   连续最短路: {}\n", ssp.cost);

    // 旅行商与生成树在无向完全图上演示
    let mut cities = Graph::new();
    let coords: [(f64, f64); 5] = [(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0), (1.5, 2.0)];
    let mut roads = Vec::new();
    for (i, a) in coords.iter().enumerate() {
        for (j, b) in coords.iter().enumerate().skip(i + 1) {
            let distance = ((a.0 - b.0) * (a.0 - b.0) + (a.1 - b.1) * (a.1 - b.1)).sqrt();
            roads.push(Edge::new(v(i as i64), v(j as i64)).with_weight(distance));
        }
    }
    cities.add_all(roads, Direction::Undirected)?;

    let mst = Kruskal::new(&cities).find_mst()?;
    println!("5. 最小生成树总长: {:.3}", mst.total_weight);

    let greedy = NearestNeighbor::new(&cities).find_tour()?;
    let double_tree = DoubleTree::new(&cities).find_tour()?;
    println!("6. 旅行商");
    println!("   最近邻: {:?} 总长 {:.3}", greedy.vertices, greedy.cost);
    println!("   双倍树: {:?} 总长 {:.3}", double_tree.vertices, double_tree.cost);

    println!("\n演示完成!");
    Ok(())
}
