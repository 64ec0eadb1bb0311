//! Designer-facing client endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::DesignerContext;
use crate::errors::AppError;
use crate::models::{
    Client, ClientReport, ClientStats, CreateClientRequest, ListClientsQuery, UpdateStatusRequest,
};
use crate::AppState;

/// GET /api/clients?status= - List the designer's clients, newest first.
pub async fn list_clients(
    State(state): State<AppState>,
    designer: DesignerContext,
    Query(query): Query<ListClientsQuery>,
) -> ApiResult<Vec<Client>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .list_clients_for_owner(&designer.designer_id, query.status)
        .await
    {
        Ok(clients) => success(clients, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/clients/stats - Total, pending and completed counts.
pub async fn get_client_stats(
    State(state): State<AppState>,
    designer: DesignerContext,
) -> ApiResult<ClientStats> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_client_stats(&designer.designer_id).await {
        Ok(stats) => success(stats, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/clients/:id - Get a single client.
pub async fn get_client(
    State(state): State<AppState>,
    designer: DesignerContext,
    Path(id): Path<String>,
) -> ApiResult<Client> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_client(&designer.designer_id, &id).await {
        Ok(Some(client)) => success(client, revision_id),
        Ok(None) => error(AppError::client_not_found(&id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/clients - Create a new pending client.
pub async fn create_client(
    State(state): State<AppState>,
    designer: DesignerContext,
    Json(request): Json<CreateClientRequest>,
) -> ApiResult<Client> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let name = request.name.trim();
    let email = request.email.trim();

    // Validate required fields
    if name.is_empty() {
        return error(
            AppError::Validation("Name is required".to_string()),
            revision_id,
        );
    }
    if !is_plausible_email(email) {
        return error(
            AppError::Validation("A valid email is required".to_string()),
            revision_id,
        );
    }

    match state
        .repo
        .create_client(&designer.designer_id, name, email)
        .await
    {
        Ok(client) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(client, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/clients/:id/status - Complete or reopen a client.
pub async fn update_client_status(
    State(state): State<AppState>,
    designer: DesignerContext,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Client> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .set_status(&designer.designer_id, &id, request.status)
        .await
    {
        Ok(client) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(client, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/clients/:id - Delete a client and its response.
pub async fn delete_client(
    State(state): State<AppState>,
    designer: DesignerContext,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_client(&designer.designer_id, &id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/clients/:id/report - Client, response and resolved choices.
pub async fn get_client_report(
    State(state): State<AppState>,
    designer: DesignerContext,
    Path(id): Path<String>,
) -> ApiResult<ClientReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state
        .repo
        .get_client_report(&designer.designer_id, &id)
        .await
    {
        Ok(report) => success(report, revision_id),
        Err(e) => error(e, revision_id),
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}
