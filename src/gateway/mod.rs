//! Collaborator interfaces the form wizard talks to.
//!
//! [`SubmissionGateway`] is the single atomic "submit response" operation plus
//! the reads needed to reconcile after an ambiguous failure.
//! [`CatalogProvider`] supplies the selectable options. Both are implemented
//! in-process by [`Repository`](crate::db::Repository) and over HTTP by
//! [`HttpGateway`].

mod http;
mod local;

pub use http::HttpGateway;

use crate::models::{Catalog, PublicClient, StyleResponse, StyleSelections};

/// Failures reported by a gateway, already classified for the wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("client has already answered the form")]
    AlreadyCompleted,
    #[error("client not found")]
    ClientNotFound,
    /// The server refused the payload itself.
    #[error("submission rejected: {0}")]
    Rejected(String),
    /// Network or infrastructure failure; the outcome of a write is unknown.
    #[error("transport error: {0}")]
    Transport(String),
}

/// The one place where concurrent submissions for a client are resolved.
///
/// Implementations must make `submit_response` atomic: the response insert
/// and the client's status flip happen together or not at all, and of two
/// concurrent calls for one client exactly one succeeds.
#[allow(async_fn_in_trait)]
pub trait SubmissionGateway {
    async fn fetch_client(&self, client_id: &str) -> Result<PublicClient, GatewayError>;

    async fn submit_response(
        &self,
        client_id: &str,
        selections: &StyleSelections,
    ) -> Result<StyleResponse, GatewayError>;

    /// `Ok(None)` when nothing has been recorded for the client.
    async fn fetch_response(&self, client_id: &str) -> Result<Option<StyleResponse>, GatewayError>;
}

/// Read-only source of the selectable catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    async fn fetch_catalog(&self) -> Result<Catalog, GatewayError>;
}
