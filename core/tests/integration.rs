//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every catalog
//! operation through `Casebook` over real HTTP with the default ureq
//! transport.

use std::net::SocketAddr;

use casebook_core::{
    ApiError, Case, CaseEdge, CaseFeedback, CaseLayout, CaseListResponse, CaseNode, CaseWithGraph,
    Casebook, ClientConfig, CreateCase, CreateEdge, CreateInteraction, CreateNode,
    KnowledgeParams, ListCasesParams, NodeStatus, NodeType, ParseLogRequest, RateNode,
    RegenerateNode, UpdateCase, UpdateNode,
};
use serde_json::json;

const TOKEN: &str = "integration-token";

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn casebook(addr: SocketAddr) -> Casebook {
    Casebook::new(&ClientConfig::new(&format!("http://{addr}")))
}

fn new_case(cb: &Casebook, query: &str, vendor: Option<&str>) -> CaseWithGraph {
    let input = CreateCase {
        query: query.to_string(),
        vendor: vendor.map(str::to_string),
        ..Default::default()
    };
    serde_json::from_value(cb.create_case(TOKEN, &input).unwrap()).unwrap()
}

#[test]
fn case_lifecycle() {
    let cb = casebook(start_server());

    // Step 1: health and an empty list.
    assert_eq!(cb.get_health(TOKEN).unwrap(), json!({"status": "ok"}));
    let list: CaseListResponse =
        serde_json::from_value(cb.list_cases(TOKEN, &ListCasesParams::default()).unwrap()).unwrap();
    assert_eq!(list.total, 0);

    // Step 2: create.
    let created = new_case(&cb, "disk full", Some("acme"));
    assert_eq!(created.case.title, "disk full");
    assert_eq!(created.case.status, "OPEN");
    assert_eq!(created.nodes.len(), 1);
    assert_eq!(created.nodes[0].node_type, NodeType::UserQuery);
    let id = created.case.id.clone();

    // Step 3: filtered list sees it; a different vendor does not.
    let params = ListCasesParams {
        page: Some(1),
        vendor: Some("acme".to_string()),
        ..Default::default()
    };
    let list: CaseListResponse =
        serde_json::from_value(cb.list_cases(TOKEN, &params).unwrap()).unwrap();
    assert_eq!(list.total, 1);
    assert_eq!(list.items[0].id, id);
    let params = ListCasesParams {
        vendor: Some("nobody".to_string()),
        ..Default::default()
    };
    let list: CaseListResponse =
        serde_json::from_value(cb.list_cases(TOKEN, &params).unwrap()).unwrap();
    assert_eq!(list.total, 0);

    // Step 4: get, typed through call_as.
    let fetched: CaseWithGraph = cb.call_as(cb.client().build_get_case(TOKEN, &id)).unwrap();
    assert_eq!(fetched.case, created.case);

    // Step 5: update and status.
    let update = UpdateCase {
        status: Some("RESOLVED".to_string()),
        ..Default::default()
    };
    let updated: Case = serde_json::from_value(cb.update_case(TOKEN, &id, &update).unwrap()).unwrap();
    assert_eq!(updated.status, "RESOLVED");
    assert_eq!(updated.title, "disk full");
    let status = cb.get_case_status(TOKEN, &id).unwrap();
    assert_eq!(status["status"], "RESOLVED");

    // Step 6: feedback, layout, and stats.
    let feedback = CaseFeedback {
        outcome: "SOLVED".to_string(),
        rating: Some(5),
        comment: None,
        corrected_solution: None,
        knowledge_contribution: None,
        additional_context: None,
    };
    cb.upsert_case_feedback(TOKEN, &id, &feedback).unwrap();
    assert_eq!(cb.get_case_feedback(TOKEN, &id).unwrap()["outcome"], "SOLVED");

    let err = cb.get_case_layout(TOKEN, &id).unwrap_err();
    assert_eq!(err.payload(), Some(&json!("Layout not found")));
    let layout = CaseLayout {
        node_positions: vec![json!({"id": created.nodes[0].id, "x": 10, "y": 20})],
        viewport_state: None,
    };
    cb.save_case_layout(TOKEN, &id, &layout).unwrap();
    let saved = cb.get_case_layout(TOKEN, &id).unwrap();
    assert_eq!(saved["nodePositions"][0]["x"], 10);

    let stats = cb.get_case_stats(TOKEN, &id).unwrap();
    assert_eq!(stats["node_count"], 1);
    assert_eq!(stats["has_feedback"], true);

    let system = cb.get_statistics(TOKEN).unwrap();
    assert_eq!(system["total_cases"], 1);

    // Step 7: delete, then the case is gone.
    let confirmation = cb.delete_case(TOKEN, &id).unwrap();
    assert_eq!(confirmation["success"], true);

    let err = cb.get_case(TOKEN, &id).unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 404, .. }));
    assert_eq!(err.payload(), Some(&json!("Case not found")));

    let err = cb.delete_case(TOKEN, &id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn node_and_edge_lifecycle() {
    let cb = casebook(start_server());
    let created = new_case(&cb, "link flapping", Some("acme"));
    let case_id = created.case.id.clone();
    let root = created.nodes[0].id.clone();

    // Create a node with structured content.
    let input = CreateNode {
        title: "Analysis".to_string(),
        content: json!({"steps": ["check optics"]}),
        node_type: NodeType::AiAnalysis,
        status: Some(NodeStatus::AwaitingUserInput),
        metadata: None,
    };
    let node: CaseNode =
        serde_json::from_value(cb.create_node(TOKEN, &case_id, &input).unwrap()).unwrap();
    assert_eq!(node.status, NodeStatus::AwaitingUserInput);
    assert_eq!(node.structured_content(), Some(json!({"steps": ["check optics"]})));

    let update = UpdateNode {
        title: Some("Analysis v2".to_string()),
        ..Default::default()
    };
    let updated = cb.update_node(TOKEN, &case_id, &node.id, &update).unwrap();
    assert_eq!(updated["title"], "Analysis v2");
    assert_eq!(cb.get_node(TOKEN, &case_id, &node.id).unwrap()["title"], "Analysis v2");

    // Edge between the two.
    let edge_input = CreateEdge {
        source_node_id: root.clone(),
        target_node_id: node.id.clone(),
        edge_type: "ANALYSIS".to_string(),
        metadata: None,
    };
    let edge: CaseEdge =
        serde_json::from_value(cb.create_edge(TOKEN, &case_id, &edge_input).unwrap()).unwrap();
    let edges: Vec<CaseEdge> =
        serde_json::from_value(cb.list_case_edges(TOKEN, &case_id).unwrap()).unwrap();
    assert_eq!(edges, vec![edge.clone()]);

    // Node actions.
    let rated = cb
        .rate_node(TOKEN, &case_id, &node.id, &RateNode { rating: 4, comment: Some("close".to_string()) })
        .unwrap();
    assert_eq!(rated["rating"], 4);

    let err = cb
        .rate_node(TOKEN, &case_id, &node.id, &RateNode { rating: 0, comment: None })
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.payload(), Some(&json!("rating must be between 1 and 5")));

    let params = KnowledgeParams {
        top_k: Some(3),
        vendor: Some("acme".to_string()),
        retrieval_weight: Some(0.0),
    };
    let knowledge = cb.get_node_knowledge(TOKEN, &case_id, &node.id, &params).unwrap();
    assert_eq!(knowledge["mode"], "semantic");
    assert_eq!(knowledge["top_k"], 3);
    assert_eq!(knowledge["retrieval_weight"], 0.0);
    let hybrid = cb
        .get_node_knowledge_hybrid(TOKEN, &case_id, &node.id, &KnowledgeParams::default())
        .unwrap();
    assert_eq!(hybrid["mode"], "hybrid");
    assert!(hybrid["retrieval_weight"].is_null());

    let commands = cb.get_node_commands(TOKEN, &case_id, &node.id, None).unwrap();
    assert_eq!(commands["vendor"], "acme");
    let commands = cb.get_node_commands(TOKEN, &case_id, &node.id, Some("other")).unwrap();
    assert_eq!(commands["vendor"], "other");

    let regen = cb
        .regenerate_node(TOKEN, &case_id, &node.id, &RegenerateNode::default())
        .unwrap();
    assert_eq!(regen["status"], "PROCESSING");
    let tasks = cb.list_node_tasks(TOKEN, &case_id, &node.id).unwrap();
    assert_eq!(tasks["tasks"].as_array().unwrap().len(), 1);
    let stopped = cb.stop_node_tasks(TOKEN, &case_id, &node.id).unwrap();
    assert_eq!(stopped["stopped"], 1);

    // Follow-up interaction hangs two nodes off the parent.
    let interaction = CreateInteraction {
        parent_node_id: node.id.clone(),
        response_data: json!({"answer": "optics replaced"}),
        retrieval_weight: None,
        filter_tags: Some(vec!["hardware".to_string()]),
    };
    let result = cb.create_interaction(TOKEN, &case_id, &interaction).unwrap();
    assert_eq!(result["response_node"]["node_type"], "USER_RESPONSE");
    let nodes: Vec<CaseNode> =
        serde_json::from_value(cb.list_case_nodes(TOKEN, &case_id).unwrap()).unwrap();
    assert_eq!(nodes.len(), 4);

    // Case-agnostic deletes.
    let confirmation = cb.delete_edge(TOKEN, &edge.id).unwrap();
    assert_eq!(confirmation["success"], true);
    let confirmation = cb.delete_node(TOKEN, &node.id).unwrap();
    assert_eq!(confirmation["success"], true);

    let err = cb.delete_node(TOKEN, &node.id).unwrap_err();
    assert_eq!(err.payload(), Some(&json!("Node not found")));
    let err = cb.get_node(TOKEN, &case_id, &node.id).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn log_parsing_round_trip() {
    let cb = casebook(start_server());
    let input = ParseLogRequest {
        log_type: "syslog".to_string(),
        vendor: "acme".to_string(),
        log_content: "boot ok\nkernel: I/O error on sda".to_string(),
        context_info: None,
    };
    let parsed = cb.parse_log(TOKEN, &input).unwrap();
    assert_eq!(parsed["summary"]["anomaly_count"], 1);

    let empty = ParseLogRequest {
        log_content: String::new(),
        ..input
    };
    let err = cb.parse_log(TOKEN, &empty).unwrap_err();
    assert_eq!(err.payload(), Some(&json!("logContent must not be empty")));
}

#[test]
fn empty_token_is_rejected_with_detail() {
    let cb = casebook(start_server());
    let err = cb.get_health("").unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.payload(), Some(&json!("Not authenticated")));
}

#[test]
fn unknown_route_body_is_not_json() {
    let addr = start_server();
    let cb = casebook(addr);
    let req = cb
        .client()
        .request(TOKEN, casebook_core::HttpMethod::Get, "/nope", &Default::default(), None);
    let err = cb.call(req).unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 404, .. }));
}

#[test]
fn rejected_body_is_backend_error_with_detail() {
    let cb = casebook(start_server());
    let req = cb.client().request(
        TOKEN,
        casebook_core::HttpMethod::Post,
        "/cases/",
        &Default::default(),
        Some(r#"{"title":"x"}"#.to_string()),
    );
    let err = cb.call(req).unwrap_err();
    match err {
        ApiError::Backend { status: 422, payload } => {
            let detail = payload.as_str().unwrap();
            assert!(detail.contains("missing field `query`"), "{detail}");
        }
        other => panic!("expected Backend 422, got {other:?}"),
    }
}

#[test]
fn unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cb = casebook(addr);
    let err = cb.get_health(TOKEN).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn concurrent_calls_are_independent() {
    let cb = casebook(start_server());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cb = cb.clone();
            std::thread::spawn(move || new_case(&cb, &format!("query {i}"), None))
        })
        .collect();
    let mut ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().case.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    let params = ListCasesParams {
        page_size: Some(100),
        ..Default::default()
    };
    let list: CaseListResponse =
        serde_json::from_value(cb.list_cases(TOKEN, &params).unwrap()).unwrap();
    assert_eq!(list.total, 8);
}
