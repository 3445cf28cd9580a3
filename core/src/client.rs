//! Stateless HTTP request builder and response parser for the casebook API.
//!
//! # Design
//! `CasebookClient` holds only a `base_url` and carries no mutable state
//! between calls. Every endpoint is a `build_*` method that pins the method,
//! path template, query order, and body shape, then hands off to the shared
//! `request` helper. All responses go through one `parse_response`; the
//! caller executes the round-trip in between.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Query};
use crate::types::{
    CaseFeedback, CaseLayout, CreateCase, CreateEdge, CreateInteraction, CreateNode,
    KnowledgeParams, ListCasesParams, ParseLogRequest, RateNode, RegenerateNode, UpdateCase,
    UpdateNode,
};

/// Synchronous, stateless request builder for the casebook API.
#[derive(Debug, Clone)]
pub struct CasebookClient {
    base_url: String,
}

impl CasebookClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds an authenticated JSON request against `base_url + path`.
    ///
    /// `query` is appended only when it has at least one parameter.
    pub fn request(
        &self,
        token: &str,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<String>,
    ) -> HttpRequest {
        let mut url = format!("{}{path}", self.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }
        HttpRequest {
            method,
            url,
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), format!("Bearer {token}")),
            ],
            body,
        }
    }

    fn get(&self, token: &str, path: &str) -> HttpRequest {
        self.request(token, HttpMethod::Get, path, &Query::new(), None)
    }

    fn delete(&self, token: &str, path: &str) -> HttpRequest {
        self.request(token, HttpMethod::Delete, path, &Query::new(), None)
    }

    fn send_json<B: Serialize>(
        &self,
        token: &str,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| {
            let err = ApiError::Serialization(e.to_string());
            let url = format!("{}{path}", self.base_url);
            tracing::error!(
                method = %method,
                url = %url,
                error = %err,
                "casebook request failed"
            );
            err
        })?;
        Ok(self.request(token, method, path, &Query::new(), Some(body)))
    }

    // -- analysis ----------------------------------------------------------

    pub fn build_parse_log(&self, token: &str, input: &ParseLogRequest) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Post, "/analysis/log-parsing", input)
    }

    // -- cases -------------------------------------------------------------

    pub fn build_list_cases(&self, token: &str, params: &ListCasesParams) -> HttpRequest {
        let mut query = Query::new();
        query
            .push_count("page", params.page)
            .push_count("page_size", params.page_size)
            .push_str("status", params.status.as_deref())
            .push_str("vendor", params.vendor.as_deref())
            .push_str("category", params.category.as_deref());
        self.request(token, HttpMethod::Get, "/cases/", &query, None)
    }

    pub fn build_create_case(&self, token: &str, input: &CreateCase) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Post, "/cases/", input)
    }

    pub fn build_get_case(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}"))
    }

    pub fn build_delete_case(&self, token: &str, case_id: &str) -> HttpRequest {
        self.delete(token, &format!("/cases/{case_id}"))
    }

    pub fn build_update_case(
        &self,
        token: &str,
        case_id: &str,
        input: &UpdateCase,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Put, &format!("/cases/{case_id}"), input)
    }

    pub fn build_get_case_status(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/status"))
    }

    // -- nodes & edges -----------------------------------------------------

    pub fn build_list_case_nodes(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/nodes"))
    }

    pub fn build_list_case_edges(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/edges"))
    }

    pub fn build_get_node(&self, token: &str, case_id: &str, node_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/nodes/{node_id}"))
    }

    pub fn build_create_node(
        &self,
        token: &str,
        case_id: &str,
        input: &CreateNode,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Post, &format!("/cases/{case_id}/nodes"), input)
    }

    pub fn build_update_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &UpdateNode,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(
            token,
            HttpMethod::Put,
            &format!("/cases/{case_id}/nodes/{node_id}"),
            input,
        )
    }

    /// Node deletion is addressed without the owning case.
    pub fn build_delete_node(&self, token: &str, node_id: &str) -> HttpRequest {
        self.delete(token, &format!("/cases/nodes/{node_id}"))
    }

    pub fn build_create_edge(
        &self,
        token: &str,
        case_id: &str,
        input: &CreateEdge,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Post, &format!("/cases/{case_id}/edges"), input)
    }

    /// Edge deletion is addressed without the owning case.
    pub fn build_delete_edge(&self, token: &str, edge_id: &str) -> HttpRequest {
        self.delete(token, &format!("/cases/edges/{edge_id}"))
    }

    // -- node actions ------------------------------------------------------

    pub fn build_rate_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &RateNode,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(
            token,
            HttpMethod::Post,
            &format!("/cases/{case_id}/nodes/{node_id}/rate"),
            input,
        )
    }

    pub fn build_create_interaction(
        &self,
        token: &str,
        case_id: &str,
        input: &CreateInteraction,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(
            token,
            HttpMethod::Post,
            &format!("/cases/{case_id}/interactions"),
            input,
        )
    }

    pub fn build_get_node_knowledge(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        params: &KnowledgeParams,
    ) -> HttpRequest {
        self.knowledge(token, &format!("/cases/{case_id}/nodes/{node_id}/knowledge"), params)
    }

    pub fn build_get_node_knowledge_hybrid(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        params: &KnowledgeParams,
    ) -> HttpRequest {
        self.knowledge(
            token,
            &format!("/cases/{case_id}/nodes/{node_id}/knowledge/hybrid"),
            params,
        )
    }

    fn knowledge(&self, token: &str, path: &str, params: &KnowledgeParams) -> HttpRequest {
        let mut query = Query::new();
        query
            .push_count("topK", params.top_k)
            .push_str("vendor", params.vendor.as_deref())
            .push_number("retrievalWeight", params.retrieval_weight);
        self.request(token, HttpMethod::Get, path, &query, None)
    }

    pub fn build_get_node_commands(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        vendor: Option<&str>,
    ) -> HttpRequest {
        let mut query = Query::new();
        query.push_str("vendor", vendor);
        self.request(
            token,
            HttpMethod::Get,
            &format!("/cases/{case_id}/nodes/{node_id}/commands"),
            &query,
            None,
        )
    }

    pub fn build_regenerate_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &RegenerateNode,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(
            token,
            HttpMethod::Post,
            &format!("/cases/{case_id}/nodes/{node_id}/regenerate"),
            input,
        )
    }

    pub fn build_list_node_tasks(&self, token: &str, case_id: &str, node_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/nodes/{node_id}/tasks"))
    }

    /// POST without a body.
    pub fn build_stop_node_tasks(&self, token: &str, case_id: &str, node_id: &str) -> HttpRequest {
        self.request(
            token,
            HttpMethod::Post,
            &format!("/cases/{case_id}/nodes/{node_id}/tasks/stop"),
            &Query::new(),
            None,
        )
    }

    // -- feedback, stats, layout -------------------------------------------

    pub fn build_upsert_case_feedback(
        &self,
        token: &str,
        case_id: &str,
        input: &CaseFeedback,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Put, &format!("/cases/{case_id}/feedback"), input)
    }

    pub fn build_get_case_feedback(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/feedback"))
    }

    pub fn build_get_case_stats(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/stats"))
    }

    pub fn build_save_case_layout(
        &self,
        token: &str,
        case_id: &str,
        input: &CaseLayout,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(token, HttpMethod::Put, &format!("/cases/{case_id}/layout"), input)
    }

    pub fn build_get_case_layout(&self, token: &str, case_id: &str) -> HttpRequest {
        self.get(token, &format!("/cases/{case_id}/layout"))
    }

    // -- system ------------------------------------------------------------

    pub fn build_get_health(&self, token: &str) -> HttpRequest {
        self.get(token, "/system/health")
    }

    pub fn build_get_statistics(&self, token: &str) -> HttpRequest {
        self.get(token, "/system/statistics")
    }
}

/// Resolve a response to its JSON body or a normalized `ApiError`.
///
/// 2xx bodies come back verbatim. Anything else becomes `ApiError::Backend`
/// carrying the body's `detail` field, or the whole body when `detail` is
/// missing or null. Every failure is logged once here.
pub fn parse_response(request: &HttpRequest, response: &HttpResponse) -> Result<Value, ApiError> {
    let parsed: Result<Value, _> = serde_json::from_str(&response.body);
    let err = match (response.is_success(), parsed) {
        (true, Ok(value)) => return Ok(value),
        (false, Ok(body)) => ApiError::Backend {
            status: response.status,
            payload: normalize_error(body),
        },
        (_, Err(e)) => ApiError::Decode {
            status: response.status,
            message: e.to_string(),
        },
    };
    tracing::error!(
        method = %request.method,
        url = %request.url,
        status = response.status,
        error = %err,
        "casebook request failed"
    );
    Err(err)
}

fn normalize_error(mut body: Value) -> Value {
    let has_detail = body.get("detail").is_some_and(|d| !d.is_null());
    if has_detail {
        body["detail"].take()
    } else {
        body
    }
}
