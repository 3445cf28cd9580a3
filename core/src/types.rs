//! Domain records and request payloads for the casebook API.
//!
//! # Design
//! Records mirror what the backend sends; endpoint calls return raw JSON and
//! callers opt into these types with `Casebook::call_as` or
//! `serde_json::from_value`. They are defined independently of the
//! mock-server crate, and integration tests catch schema drift.
//!
//! Request payloads omit unset optional fields instead of sending `null`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open-ended JSON object attached to cases, nodes, and edges.
pub type Metadata = Map<String, Value>;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A troubleshooting case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One page of `GET /cases/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseListResponse {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<Case>,
}

/// A node in a case graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseNode {
    pub id: String,
    pub case_id: String,
    pub title: String,
    /// Plain text or a JSON document encoded as a string.
    pub content: String,
    pub node_type: NodeType,
    pub status: NodeStatus,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl CaseNode {
    /// `content` decoded as JSON, when it holds JSON.
    pub fn structured_content(&self) -> Option<Value> {
        serde_json::from_str(&self.content).ok()
    }
}

/// A directed edge between two nodes of the same case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseEdge {
    pub id: String,
    pub case_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub edge_type: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// A case together with its full graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseWithGraph {
    #[serde(flatten)]
    pub case: Case,
    #[serde(default)]
    pub nodes: Vec<CaseNode>,
    #[serde(default)]
    pub edges: Vec<CaseEdge>,
}

/// Kind of a case node. Unknown kinds are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    UserQuery,
    AiAnalysis,
    UserResponse,
    Other(String),
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "USER_QUERY" => NodeType::UserQuery,
            "AI_ANALYSIS" => NodeType::AiAnalysis,
            "USER_RESPONSE" => NodeType::UserResponse,
            _ => NodeType::Other(value),
        }
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::UserQuery => f.write_str("USER_QUERY"),
            NodeType::AiAnalysis => f.write_str("AI_ANALYSIS"),
            NodeType::UserResponse => f.write_str("USER_RESPONSE"),
            NodeType::Other(s) => f.write_str(s),
        }
    }
}

/// Processing state of a case node. Unknown states are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeStatus {
    Completed,
    AwaitingUserInput,
    Processing,
    Other(String),
}

impl From<String> for NodeStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "COMPLETED" => NodeStatus::Completed,
            "AWAITING_USER_INPUT" => NodeStatus::AwaitingUserInput,
            "PROCESSING" => NodeStatus::Processing,
            _ => NodeStatus::Other(value),
        }
    }
}

impl From<NodeStatus> for String {
    fn from(value: NodeStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Completed => f.write_str("COMPLETED"),
            NodeStatus::AwaitingUserInput => f.write_str("AWAITING_USER_INPUT"),
            NodeStatus::Processing => f.write_str("PROCESSING"),
            NodeStatus::Other(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filters for `GET /cases/`. Zero and empty values count as unset.
#[derive(Debug, Clone, Default)]
pub struct ListCasesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
}

/// Knobs for the knowledge retrieval endpoints.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeParams {
    pub top_k: Option<u32>,
    pub vendor: Option<String>,
    pub retrieval_weight: Option<f64>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseLogRequest {
    pub log_type: String,
    pub vendor: String,
    pub log_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_info: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCase {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Value>>,
}

/// Partial update; omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    pub title: String,
    pub content: Value,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEdge {
    pub source_node_id: String,
    pub target_node_id: String,
    pub edge_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateNode {
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Follow-up answer recorded under `parent_node_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInteraction {
    pub parent_node_id: String,
    pub response_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_tags: Option<Vec<String>>,
}

/// Serializes to `{}` when nothing is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regeneration_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_mode: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFeedback {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge_contribution: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLayout {
    pub node_positions: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_state: Option<Metadata>,
}
