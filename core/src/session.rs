//! One-call-per-endpoint facade over builder, transport, and parser.
//!
//! Every method is build → execute → `parse_response`. The facade holds no
//! mutable state, so clones can be shared across threads and calls never
//! wait on each other.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{parse_response, CasebookClient};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CaseFeedback, CaseLayout, CreateCase, CreateEdge, CreateInteraction, CreateNode,
    KnowledgeParams, ListCasesParams, ParseLogRequest, RateNode, RegenerateNode, UpdateCase,
    UpdateNode,
};

#[derive(Clone)]
pub struct Casebook<T: Transport = UreqTransport> {
    client: CasebookClient,
    transport: T,
}

impl Casebook<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(CasebookClient::new(&config.base_url), UreqTransport::new(config.timeout))
    }

    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env())
    }
}

impl<T: Transport> Casebook<T> {
    pub fn with_transport(client: CasebookClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CasebookClient {
        &self.client
    }

    /// Executes a built request and normalizes the outcome.
    pub fn call(&self, request: HttpRequest) -> Result<Value, ApiError> {
        self.round_trip(request).map(|(_, value)| value)
    }

    /// Like `call`, then deserializes the JSON into `R`.
    pub fn call_as<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let (method, url) = (request.method, request.url.clone());
        let (status, value) = self.round_trip(request)?;
        serde_json::from_value(value).map_err(|e| {
            let err = ApiError::Decode {
                status,
                message: e.to_string(),
            };
            tracing::error!(
                method = %method,
                url = %url,
                status,
                error = %err,
                "casebook request failed"
            );
            err
        })
    }

    fn round_trip(&self, request: HttpRequest) -> Result<(u16, Value), ApiError> {
        let response = self.transport.execute(&request).inspect_err(|err| {
            tracing::error!(
                method = %request.method,
                url = %request.url,
                error = %err,
                "casebook request failed"
            );
        })?;
        let value = parse_response(&request, &response)?;
        Ok((response.status, value))
    }

    pub fn parse_log(&self, token: &str, input: &ParseLogRequest) -> Result<Value, ApiError> {
        self.call(self.client.build_parse_log(token, input)?)
    }

    pub fn list_cases(&self, token: &str, params: &ListCasesParams) -> Result<Value, ApiError> {
        self.call(self.client.build_list_cases(token, params))
    }

    pub fn create_case(&self, token: &str, input: &CreateCase) -> Result<Value, ApiError> {
        self.call(self.client.build_create_case(token, input)?)
    }

    pub fn get_case(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_case(token, case_id))
    }

    pub fn delete_case(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_delete_case(token, case_id))
    }

    pub fn update_case(&self, token: &str, case_id: &str, input: &UpdateCase) -> Result<Value, ApiError> {
        self.call(self.client.build_update_case(token, case_id, input)?)
    }

    pub fn get_case_status(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_case_status(token, case_id))
    }

    pub fn list_case_nodes(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_list_case_nodes(token, case_id))
    }

    pub fn list_case_edges(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_list_case_edges(token, case_id))
    }

    pub fn get_node(&self, token: &str, case_id: &str, node_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_node(token, case_id, node_id))
    }

    pub fn create_node(&self, token: &str, case_id: &str, input: &CreateNode) -> Result<Value, ApiError> {
        self.call(self.client.build_create_node(token, case_id, input)?)
    }

    pub fn update_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &UpdateNode,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_update_node(token, case_id, node_id, input)?)
    }

    pub fn delete_node(&self, token: &str, node_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_delete_node(token, node_id))
    }

    pub fn create_edge(&self, token: &str, case_id: &str, input: &CreateEdge) -> Result<Value, ApiError> {
        self.call(self.client.build_create_edge(token, case_id, input)?)
    }

    pub fn delete_edge(&self, token: &str, edge_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_delete_edge(token, edge_id))
    }

    pub fn rate_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &RateNode,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_rate_node(token, case_id, node_id, input)?)
    }

    pub fn create_interaction(
        &self,
        token: &str,
        case_id: &str,
        input: &CreateInteraction,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_create_interaction(token, case_id, input)?)
    }

    pub fn get_node_knowledge(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        params: &KnowledgeParams,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_get_node_knowledge(token, case_id, node_id, params))
    }

    pub fn get_node_knowledge_hybrid(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        params: &KnowledgeParams,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_get_node_knowledge_hybrid(token, case_id, node_id, params))
    }

    pub fn get_node_commands(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        vendor: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_get_node_commands(token, case_id, node_id, vendor))
    }

    pub fn regenerate_node(
        &self,
        token: &str,
        case_id: &str,
        node_id: &str,
        input: &RegenerateNode,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_regenerate_node(token, case_id, node_id, input)?)
    }

    pub fn list_node_tasks(&self, token: &str, case_id: &str, node_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_list_node_tasks(token, case_id, node_id))
    }

    pub fn stop_node_tasks(&self, token: &str, case_id: &str, node_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_stop_node_tasks(token, case_id, node_id))
    }

    pub fn upsert_case_feedback(
        &self,
        token: &str,
        case_id: &str,
        input: &CaseFeedback,
    ) -> Result<Value, ApiError> {
        self.call(self.client.build_upsert_case_feedback(token, case_id, input)?)
    }

    pub fn get_case_feedback(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_case_feedback(token, case_id))
    }

    pub fn get_case_stats(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_case_stats(token, case_id))
    }

    pub fn save_case_layout(&self, token: &str, case_id: &str, input: &CaseLayout) -> Result<Value, ApiError> {
        self.call(self.client.build_save_case_layout(token, case_id, input)?)
    }

    pub fn get_case_layout(&self, token: &str, case_id: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_case_layout(token, case_id))
    }

    pub fn get_health(&self, token: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_health(token))
    }

    pub fn get_statistics(&self, token: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_statistics(token))
    }
}
