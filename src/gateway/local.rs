//! In-process gateway backed directly by the SQLite repository.

use super::{CatalogProvider, GatewayError, SubmissionGateway};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Catalog, PublicClient, StyleResponse, StyleSelections};

impl From<AppError> for GatewayError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::AlreadyCompleted(_) => GatewayError::AlreadyCompleted,
            AppError::NotFound(_) => GatewayError::ClientNotFound,
            AppError::Validation(msg) | AppError::BadRequest(msg) => GatewayError::Rejected(msg),
            other => GatewayError::Transport(other.to_string()),
        }
    }
}

impl SubmissionGateway for Repository {
    async fn fetch_client(&self, client_id: &str) -> Result<PublicClient, GatewayError> {
        self.get_client_public(client_id)
            .await?
            .map(PublicClient::from)
            .ok_or(GatewayError::ClientNotFound)
    }

    async fn submit_response(
        &self,
        client_id: &str,
        selections: &StyleSelections,
    ) -> Result<StyleResponse, GatewayError> {
        Ok(Repository::submit_response(self, client_id, selections).await?)
    }

    async fn fetch_response(&self, client_id: &str) -> Result<Option<StyleResponse>, GatewayError> {
        Ok(self.get_response(client_id).await?)
    }
}

impl CatalogProvider for Repository {
    async fn fetch_catalog(&self) -> Result<Catalog, GatewayError> {
        Ok(self.get_catalog().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_errors_are_classified() {
        assert_eq!(
            GatewayError::from(AppError::AlreadyCompleted("x".into())),
            GatewayError::AlreadyCompleted
        );
        assert_eq!(
            GatewayError::from(AppError::client_not_found("c1")),
            GatewayError::ClientNotFound
        );
        assert_eq!(
            GatewayError::from(AppError::Validation("bad".into())),
            GatewayError::Rejected("bad".into())
        );
        assert!(matches!(
            GatewayError::from(AppError::Database("locked".into())),
            GatewayError::Transport(_)
        ));
    }
}
