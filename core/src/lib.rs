//! Client core for the casebook troubleshooting API.
//!
//! # Overview
//! Builds authenticated JSON `HttpRequest` values for every backend route
//! (cases, graph nodes and edges, log analysis, system health) and resolves
//! `HttpResponse` values into either the raw JSON body or a normalized
//! `ApiError`.
//!
//! # Design
//! - `CasebookClient` is stateless: it holds only `base_url`. Each endpoint
//!   is a `build_*` method over one shared request helper.
//! - `parse_response` is the single success/failure rule for all endpoints.
//! - `Transport` is the only I/O seam; `UreqTransport` is the default.
//! - `Casebook` ties the three together into one method per endpoint.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{parse_response, CasebookClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Query};
pub use session::Casebook;
pub use transport::{Transport, UreqTransport};
pub use types::{
    Case, CaseEdge, CaseFeedback, CaseLayout, CaseListResponse, CaseNode, CaseWithGraph,
    CreateCase, CreateEdge, CreateInteraction, CreateNode, KnowledgeParams, ListCasesParams,
    Metadata, NodeStatus, NodeType, ParseLogRequest, RateNode, RegenerateNode, UpdateCase,
    UpdateNode,
};
