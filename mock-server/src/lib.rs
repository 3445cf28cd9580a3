//! In-memory stand-in for the casebook backend.
//!
//! Serves every route the client binds, rejects requests without a bearer
//! token, and reports failures as `{"detail": ...}` bodies.

pub mod extract;
pub mod store;

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

use extract::{ApiJson, ApiQuery};
use store::now;

pub use store::{Case, CaseFilter, CaseList, CaseWithGraph, Edge, Metadata, Node, Store, Task};

pub type Db = Arc<RwLock<Store>>;

/// Error response shaped like the real backend's: `{"detail": ...}`.
#[derive(Debug)]
pub struct DetailError {
    status: StatusCode,
    detail: Value,
}

impl DetailError {
    pub fn new(status: StatusCode, detail: impl Into<Value>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for DetailError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, DetailError>;

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/analysis/log-parsing", post(parse_log))
        .route("/cases/", get(list_cases).post(create_case))
        .route(
            "/cases/{case_id}",
            get(get_case).put(update_case).delete(delete_case),
        )
        .route("/cases/{case_id}/status", get(case_status))
        .route("/cases/{case_id}/nodes", get(list_nodes).post(create_node))
        .route("/cases/{case_id}/edges", get(list_edges).post(create_edge))
        .route(
            "/cases/{case_id}/nodes/{node_id}",
            get(get_node).put(update_node),
        )
        .route("/cases/nodes/{node_id}", delete(delete_node))
        .route("/cases/edges/{edge_id}", delete(delete_edge))
        .route("/cases/{case_id}/nodes/{node_id}/rate", post(rate_node))
        .route("/cases/{case_id}/interactions", post(create_interaction))
        .route("/cases/{case_id}/nodes/{node_id}/knowledge", get(node_knowledge))
        .route(
            "/cases/{case_id}/nodes/{node_id}/knowledge/hybrid",
            get(node_knowledge_hybrid),
        )
        .route("/cases/{case_id}/nodes/{node_id}/commands", get(node_commands))
        .route("/cases/{case_id}/nodes/{node_id}/regenerate", post(regenerate_node))
        .route("/cases/{case_id}/nodes/{node_id}/tasks", get(list_tasks))
        .route("/cases/{case_id}/nodes/{node_id}/tasks/stop", post(stop_tasks))
        .route("/cases/{case_id}/feedback", put(upsert_feedback).get(get_feedback))
        .route("/cases/{case_id}/stats", get(case_stats))
        .route("/cases/{case_id}/layout", put(save_layout).get(get_layout))
        .route("/system/health", get(health))
        .route("/system/statistics", get(statistics))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::warn!(uri = %request.uri(), "rejecting request without bearer token");
        return DetailError::new(StatusCode::UNAUTHORIZED, "Not authenticated").into_response();
    }
    next.run(request).await
}

fn metadata_of(value: Option<Value>) -> Option<Metadata> {
    match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Node content is stored as text; structured payloads are JSON-encoded.
fn content_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// --- analysis ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseLogInput {
    pub log_type: String,
    pub vendor: String,
    pub log_content: String,
    pub context_info: Option<Value>,
}

async fn parse_log(ApiJson(input): ApiJson<ParseLogInput>) -> ApiResult<Value> {
    if input.log_content.trim().is_empty() {
        return Err(DetailError::bad_request("logContent must not be empty"));
    }
    let lines: Vec<&str> = input.log_content.lines().collect();
    let anomalies: Vec<Value> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let lower = line.to_ascii_lowercase();
            lower.contains("error") || lower.contains("fail") || lower.contains("critical")
        })
        .map(|(i, line)| json!({ "line": i + 1, "text": line.trim() }))
        .collect();
    Ok(Json(json!({
        "log_type": input.log_type,
        "vendor": input.vendor,
        "summary": {
            "total_lines": lines.len(),
            "anomaly_count": anomalies.len(),
        },
        "anomalies": anomalies,
        "context_info": input.context_info,
    })))
}

// --- cases ---

#[derive(Deserialize)]
pub struct CreateCaseInput {
    pub query: String,
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub attachments: Option<Vec<Value>>,
}

#[derive(Deserialize)]
pub struct UpdateCaseInput {
    pub title: Option<String>,
    pub status: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
}

async fn list_cases(
    State(db): State<Db>,
    ApiQuery(filter): ApiQuery<CaseFilter>,
) -> Json<CaseList> {
    Json(db.read().await.list_cases(&filter))
}

async fn create_case(
    State(db): State<Db>,
    ApiJson(input): ApiJson<CreateCaseInput>,
) -> ApiResult<CaseWithGraph> {
    let query = input.query.trim().to_string();
    if query.is_empty() {
        return Err(DetailError::bad_request("query must not be empty"));
    }
    let title = input
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| query.clone());
    let metadata = input
        .attachments
        .map(|a| Metadata::from_iter([("attachments".to_string(), Value::Array(a))]));

    let mut store = db.write().await;
    let case = store.insert_case(title.clone(), input.vendor, input.category, metadata);
    store.insert_node(
        &case.id,
        title,
        query,
        "USER_QUERY".to_string(),
        "COMPLETED".to_string(),
        None,
    );
    tracing::info!(case_id = %case.id, "case created");
    let case = store.cases[&case.id].clone();
    Ok(Json(store.with_graph(case)))
}

async fn get_case(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<CaseWithGraph> {
    let store = db.read().await;
    let case = store
        .cases
        .get(&case_id)
        .cloned()
        .ok_or_else(|| DetailError::not_found("Case"))?;
    Ok(Json(store.with_graph(case)))
}

async fn update_case(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<UpdateCaseInput>,
) -> ApiResult<Case> {
    let mut store = db.write().await;
    let case = store
        .cases
        .get_mut(&case_id)
        .ok_or_else(|| DetailError::not_found("Case"))?;
    if let Some(title) = input.title {
        case.title = title;
    }
    if let Some(status) = input.status {
        case.status = status;
    }
    if let Some(vendor) = input.vendor {
        case.vendor = Some(vendor);
    }
    if let Some(category) = input.category {
        case.category = Some(category);
    }
    case.updated_at = now();
    Ok(Json(case.clone()))
}

async fn delete_case(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Value> {
    db.write()
        .await
        .remove_case(&case_id)
        .ok_or_else(|| DetailError::not_found("Case"))?;
    tracing::info!(%case_id, "case deleted");
    Ok(Json(json!({ "success": true, "case_id": case_id })))
}

async fn case_status(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Value> {
    let store = db.read().await;
    let case = store
        .cases
        .get(&case_id)
        .ok_or_else(|| DetailError::not_found("Case"))?;
    let processing = store
        .case_nodes(&case_id)
        .iter()
        .filter(|n| n.status == "PROCESSING")
        .count();
    Ok(Json(json!({
        "case_id": case.id,
        "status": case.status,
        "processing_nodes": processing,
        "updated_at": case.updated_at,
    })))
}

// --- nodes & edges ---

#[derive(Deserialize)]
pub struct CreateNodeInput {
    pub title: String,
    pub content: Value,
    pub node_type: String,
    pub status: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Deserialize)]
pub struct UpdateNodeInput {
    pub title: Option<String>,
    pub status: Option<String>,
    pub content: Option<Value>,
    pub metadata: Option<Value>,
}

#[derive(Deserialize)]
pub struct CreateEdgeInput {
    pub source_node_id: String,
    pub target_node_id: String,
    pub edge_type: String,
    pub metadata: Option<Value>,
}

fn require_case(store: &Store, case_id: &str) -> Result<(), DetailError> {
    if store.cases.contains_key(case_id) {
        Ok(())
    } else {
        Err(DetailError::not_found("Case"))
    }
}

async fn list_nodes(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Vec<Node>> {
    let store = db.read().await;
    require_case(&store, &case_id)?;
    Ok(Json(store.case_nodes(&case_id)))
}

async fn list_edges(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Vec<Edge>> {
    let store = db.read().await;
    require_case(&store, &case_id)?;
    Ok(Json(store.case_edges(&case_id)))
}

async fn get_node(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
) -> ApiResult<Node> {
    let store = db.read().await;
    store
        .node_in_case(&case_id, &node_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| DetailError::not_found("Node"))
}

async fn create_node(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<CreateNodeInput>,
) -> ApiResult<Node> {
    let mut store = db.write().await;
    require_case(&store, &case_id)?;
    let node = store.insert_node(
        &case_id,
        input.title,
        content_text(input.content),
        input.node_type,
        input.status.unwrap_or_else(|| "COMPLETED".to_string()),
        metadata_of(input.metadata),
    );
    Ok(Json(node))
}

async fn update_node(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<UpdateNodeInput>,
) -> ApiResult<Node> {
    let mut store = db.write().await;
    if store.node_in_case(&case_id, &node_id).is_none() {
        return Err(DetailError::not_found("Node"));
    }
    let node = store
        .nodes
        .get_mut(&node_id)
        .ok_or_else(|| DetailError::not_found("Node"))?;
    if let Some(title) = input.title {
        node.title = title;
    }
    if let Some(status) = input.status {
        node.status = status;
    }
    if let Some(content) = input.content {
        node.content = content_text(content);
    }
    if let Some(metadata) = input.metadata {
        node.metadata = metadata_of(Some(metadata));
    }
    let node = node.clone();
    store.touch(&case_id);
    Ok(Json(node))
}

async fn delete_node(State(db): State<Db>, Path(node_id): Path<String>) -> ApiResult<Value> {
    db.write()
        .await
        .remove_node(&node_id)
        .ok_or_else(|| DetailError::not_found("Node"))?;
    Ok(Json(json!({ "success": true, "node_id": node_id })))
}

async fn create_edge(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<CreateEdgeInput>,
) -> ApiResult<Edge> {
    let mut store = db.write().await;
    require_case(&store, &case_id)?;
    let endpoints_ok = store.node_in_case(&case_id, &input.source_node_id).is_some()
        && store.node_in_case(&case_id, &input.target_node_id).is_some();
    if !endpoints_ok {
        return Err(DetailError::bad_request(
            "Edge endpoints must be nodes of the same case",
        ));
    }
    let edge = store.insert_edge(
        &case_id,
        input.source_node_id,
        input.target_node_id,
        input.edge_type,
        metadata_of(input.metadata),
    );
    Ok(Json(edge))
}

async fn delete_edge(State(db): State<Db>, Path(edge_id): Path<String>) -> ApiResult<Value> {
    let mut store = db.write().await;
    let edge = store
        .edges
        .remove(&edge_id)
        .ok_or_else(|| DetailError::not_found("Edge"))?;
    store.touch(&edge.case_id);
    Ok(Json(json!({ "success": true, "edge_id": edge_id })))
}

// --- node actions ---

#[derive(Deserialize)]
pub struct RateInput {
    pub rating: i64,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct InteractionInput {
    pub parent_node_id: String,
    pub response_data: Value,
    pub retrieval_weight: Option<f64>,
    pub filter_tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct KnowledgeQuery {
    #[serde(rename = "topK")]
    pub top_k: Option<u32>,
    pub vendor: Option<String>,
    #[serde(rename = "retrievalWeight")]
    pub retrieval_weight: Option<f64>,
}

#[derive(Deserialize)]
pub struct CommandsQuery {
    pub vendor: Option<String>,
}

#[derive(Deserialize)]
pub struct RegenerateInput {
    pub prompt: Option<String>,
    pub regeneration_strategy: Option<String>,
    pub model: Option<String>,
    pub async_mode: Option<bool>,
}

async fn rate_node(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<RateInput>,
) -> ApiResult<Value> {
    if !(1..=5).contains(&input.rating) {
        return Err(DetailError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "rating must be between 1 and 5",
        ));
    }
    let mut store = db.write().await;
    if store.node_in_case(&case_id, &node_id).is_none() {
        return Err(DetailError::not_found("Node"));
    }
    if let Some(node) = store.nodes.get_mut(&node_id) {
        let metadata = node.metadata.get_or_insert_with(Metadata::new);
        metadata.insert("rating".to_string(), json!(input.rating));
        if let Some(comment) = &input.comment {
            metadata.insert("rating_comment".to_string(), json!(comment));
        }
    }
    Ok(Json(json!({
        "node_id": node_id,
        "rating": input.rating,
        "comment": input.comment,
    })))
}

async fn create_interaction(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<InteractionInput>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    require_case(&store, &case_id)?;
    if store.node_in_case(&case_id, &input.parent_node_id).is_none() {
        return Err(DetailError::not_found("Parent node"));
    }
    let mut metadata = Metadata::new();
    if let Some(weight) = input.retrieval_weight {
        metadata.insert("retrieval_weight".to_string(), json!(weight));
    }
    if let Some(tags) = input.filter_tags {
        metadata.insert("filter_tags".to_string(), json!(tags));
    }
    let response = store.insert_node(
        &case_id,
        "User response".to_string(),
        content_text(input.response_data),
        "USER_RESPONSE".to_string(),
        "COMPLETED".to_string(),
        Some(metadata),
    );
    let analysis = store.insert_node(
        &case_id,
        "Analysis".to_string(),
        String::new(),
        "AI_ANALYSIS".to_string(),
        "PROCESSING".to_string(),
        None,
    );
    let e1 = store.insert_edge(
        &case_id,
        input.parent_node_id,
        response.id.clone(),
        "FOLLOW_UP".to_string(),
        None,
    );
    let e2 = store.insert_edge(
        &case_id,
        response.id.clone(),
        analysis.id.clone(),
        "ANALYSIS".to_string(),
        None,
    );
    Ok(Json(json!({
        "response_node": response,
        "analysis_node": analysis,
        "edges": [e1, e2],
    })))
}

async fn knowledge(
    db: Db,
    case_id: String,
    node_id: String,
    query: KnowledgeQuery,
    mode: &str,
) -> ApiResult<Value> {
    let store = db.read().await;
    let node = store
        .node_in_case(&case_id, &node_id)
        .ok_or_else(|| DetailError::not_found("Node"))?;
    let top_k = query.top_k.unwrap_or(5);
    Ok(Json(json!({
        "node_id": node.id,
        "mode": mode,
        "top_k": top_k,
        "vendor": query.vendor,
        "retrieval_weight": query.retrieval_weight,
        "items": [],
    })))
}

async fn node_knowledge(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiQuery(query): ApiQuery<KnowledgeQuery>,
) -> ApiResult<Value> {
    knowledge(db, case_id, node_id, query, "semantic").await
}

async fn node_knowledge_hybrid(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiQuery(query): ApiQuery<KnowledgeQuery>,
) -> ApiResult<Value> {
    knowledge(db, case_id, node_id, query, "hybrid").await
}

async fn node_commands(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiQuery(query): ApiQuery<CommandsQuery>,
) -> ApiResult<Value> {
    let store = db.read().await;
    let node = store
        .node_in_case(&case_id, &node_id)
        .ok_or_else(|| DetailError::not_found("Node"))?;
    let vendor = query
        .vendor
        .or_else(|| store.cases.get(&case_id).and_then(|c| c.vendor.clone()));
    Ok(Json(json!({
        "node_id": node.id,
        "vendor": vendor,
        "commands": [],
    })))
}

async fn regenerate_node(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<RegenerateInput>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    if store.node_in_case(&case_id, &node_id).is_none() {
        return Err(DetailError::not_found("Node"));
    }
    if let Some(node) = store.nodes.get_mut(&node_id) {
        node.status = "PROCESSING".to_string();
    }
    let task = store.insert_task(&node_id);
    store.touch(&case_id);
    Ok(Json(json!({
        "node_id": node_id,
        "status": "PROCESSING",
        "task_id": task.id,
        "prompt": input.prompt,
        "regeneration_strategy": input.regeneration_strategy,
        "model": input.model,
        "async_mode": input.async_mode.unwrap_or(false),
    })))
}

async fn list_tasks(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let store = db.read().await;
    if store.node_in_case(&case_id, &node_id).is_none() {
        return Err(DetailError::not_found("Node"));
    }
    let mut tasks: Vec<&Task> = store.tasks.values().filter(|t| t.node_id == node_id).collect();
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(Json(json!({ "node_id": node_id, "tasks": tasks })))
}

async fn stop_tasks(
    State(db): State<Db>,
    Path((case_id, node_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    if store.node_in_case(&case_id, &node_id).is_none() {
        return Err(DetailError::not_found("Node"));
    }
    let mut stopped = 0;
    for task in store
        .tasks
        .values_mut()
        .filter(|t| t.node_id == node_id && t.status == "RUNNING")
    {
        task.status = "STOPPED".to_string();
        stopped += 1;
    }
    if let Some(node) = store.nodes.get_mut(&node_id) {
        if node.status == "PROCESSING" {
            node.status = "COMPLETED".to_string();
        }
    }
    Ok(Json(json!({ "node_id": node_id, "stopped": stopped })))
}

// --- feedback, stats, layout ---

#[derive(Deserialize)]
pub struct FeedbackInput {
    pub outcome: String,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub corrected_solution: Option<String>,
    pub knowledge_contribution: Option<Value>,
    pub additional_context: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInput {
    pub node_positions: Vec<Value>,
    pub viewport_state: Option<Value>,
}

async fn upsert_feedback(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<FeedbackInput>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    require_case(&store, &case_id)?;
    let feedback = json!({
        "case_id": case_id,
        "outcome": input.outcome,
        "rating": input.rating,
        "comment": input.comment,
        "corrected_solution": input.corrected_solution,
        "knowledge_contribution": input.knowledge_contribution,
        "additional_context": input.additional_context,
        "updated_at": now(),
    });
    store.feedback.insert(case_id.clone(), feedback.clone());
    store.touch(&case_id);
    Ok(Json(feedback))
}

async fn get_feedback(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Value> {
    let store = db.read().await;
    require_case(&store, &case_id)?;
    store
        .feedback
        .get(&case_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| DetailError::not_found("Feedback"))
}

async fn case_stats(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Value> {
    let store = db.read().await;
    require_case(&store, &case_id)?;
    let nodes = store.case_nodes(&case_id);
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &nodes {
        *by_type.entry(node.node_type.as_str()).or_default() += 1;
        *by_status.entry(node.status.as_str()).or_default() += 1;
    }
    Ok(Json(json!({
        "case_id": case_id,
        "node_count": nodes.len(),
        "edge_count": store.case_edges(&case_id).len(),
        "nodes_by_type": by_type,
        "nodes_by_status": by_status,
        "has_feedback": store.feedback.contains_key(&case_id),
    })))
}

async fn save_layout(
    State(db): State<Db>,
    Path(case_id): Path<String>,
    ApiJson(input): ApiJson<LayoutInput>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    require_case(&store, &case_id)?;
    let layout = json!({
        "case_id": case_id,
        "nodePositions": input.node_positions,
        "viewportState": input.viewport_state,
    });
    store.layouts.insert(case_id, layout.clone());
    Ok(Json(layout))
}

async fn get_layout(State(db): State<Db>, Path(case_id): Path<String>) -> ApiResult<Value> {
    let store = db.read().await;
    require_case(&store, &case_id)?;
    store
        .layouts
        .get(&case_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| DetailError::not_found("Layout"))
}

// --- system ---

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn statistics(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for case in store.cases.values() {
        *by_status.entry(case.status.as_str()).or_default() += 1;
    }
    Json(json!({
        "total_cases": store.cases.len(),
        "total_nodes": store.nodes.len(),
        "total_edges": store.edges.len(),
        "cases_by_status": by_status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_error_wraps_message() {
        let err = DetailError::not_found("Case");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, json!("Case not found"));
    }

    #[test]
    fn structured_content_is_json_encoded() {
        assert_eq!(content_text(json!("plain")), "plain");
        assert_eq!(content_text(json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn non_object_metadata_is_dropped() {
        assert!(metadata_of(Some(json!([1, 2]))).is_none());
        assert!(metadata_of(Some(json!({"k": "v"}))).is_some());
    }

    #[test]
    fn create_case_input_requires_query() {
        let result: Result<CreateCaseInput, _> = serde_json::from_str(r#"{"title":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn knowledge_query_uses_camel_case_names() {
        let q: KnowledgeQuery =
            serde_json::from_str(r#"{"topK":3,"retrievalWeight":0.5}"#).unwrap();
        assert_eq!(q.top_k, Some(3));
        assert_eq!(q.retrieval_weight, Some(0.5));
        assert!(q.vendor.is_none());
    }
}
