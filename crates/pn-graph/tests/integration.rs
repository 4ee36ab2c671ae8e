//! Integration tests for pn-graph.

use pn_graph::{EdgeRecord, GraphBuilder, GraphError, GraphIssue, NodeKind, NodeRecord, inspect};

#[test]
fn ingest_json_snapshot() {
    let nodes: Vec<NodeRecord> = serde_json::from_str(
        r#"[
            {"id":"G1","type":"GENERAL","x":0,"y":0},
            {"id":"J1","type":"JONCTION","x":0,"y":10},
            {"id":"V1","type":"VANNE","x":0,"y":20}
        ]"#,
    )
    .unwrap();
    let edges: Vec<EdgeRecord> = serde_json::from_str(
        r#"[
            {"id":"E1","from_id":"J1","to_id":"G1","diameter_mm":160},
            {"id":"E2","source":"V1","target":"J1","diameter_mm":"110","created_at":"2024-01-01"}
        ]"#,
    )
    .unwrap();

    let net = GraphBuilder::from_records(&nodes, &edges).build();

    assert_eq!(net.nodes().len(), 3);
    assert_eq!(net.edges().len(), 2);

    let g1 = net.node_idx("G1").unwrap();
    let j1 = net.node_idx("J1").unwrap();
    let v1 = net.node_idx("V1").unwrap();
    let e2 = net.edge_idx("E2").unwrap();

    assert_eq!(net.node(v1).unwrap().kind, NodeKind::Valve);
    assert_eq!(net.arriving_edges(g1).len(), 1);
    assert_eq!(net.arriving_edges(j1), &[e2]);
    assert_eq!(net.leaving_edges(v1), &[e2]);
    assert_eq!(net.degree(j1), 2);
    assert_eq!(net.edge(e2).unwrap().diameter_mm, 110.0);
    assert_eq!(net.sources(), vec![g1]);
}

#[test]
fn lookups_report_unknown_ids() {
    let net = GraphBuilder::new().build();
    assert_eq!(
        net.node_idx("X"),
        Err(GraphError::UnknownNode { id: "X".into() })
    );
    assert_eq!(
        net.edge_idx("E").unwrap_err().to_string(),
        "Edge E not found in network"
    );
}

#[test]
fn sources_sorted_by_id() {
    let mut builder = GraphBuilder::new();
    let g2 = builder.add_node("G2", "GENERAL");
    builder.add_node("A", "JONCTION");
    let g1 = builder.add_node("G1", "general");
    let net = builder.build();
    assert_eq!(net.sources(), vec![g1, g2]);
}

#[test]
fn dropped_edges_are_diagnosed_not_rejected() {
    let nodes = vec![NodeRecord::new("G", "GENERAL"), NodeRecord::new("A", "")];
    let edges = vec![
        EdgeRecord::new("E1", "A", "G"),
        EdgeRecord {
            id: Some("E2".into()),
            source: Some("A".into()),
            ..EdgeRecord::default()
        },
    ];
    let net = GraphBuilder::from_records(&nodes, &edges).build();

    assert_eq!(net.edges().len(), 2);
    assert!(!net.edges()[1].is_indexed());
    assert_eq!(
        inspect(&net),
        vec![GraphIssue::MissingEndpoint { edge: "E2".into() }]
    );
}
