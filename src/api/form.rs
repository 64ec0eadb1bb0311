//! Public form endpoints, addressed by the opaque client id in the shared link.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{PublicClient, StyleResponse, StyleSelections};
use crate::AppState;

/// GET /api/form/:client_id - What the form needs to know about its client.
pub async fn get_form_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResult<PublicClient> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_client_public(&client_id).await {
        Ok(Some(client)) => success(client.into(), revision_id),
        Ok(None) => error(AppError::client_not_found(&client_id), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/form/:client_id/response - Submit the client's answers once.
pub async fn submit_form_response(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(selections): Json<StyleSelections>,
) -> ApiResult<StyleResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Err(e) = validate_selections(&selections) {
        return error(e, revision_id);
    }

    match state.repo.submit_response(&client_id, &selections).await {
        Ok(response) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(response, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/form/:client_id/response - The recorded answers, if any.
pub async fn get_form_response(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResult<StyleResponse> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_response(&client_id).await {
        Ok(Some(response)) => success(response, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("No response recorded for client {}", client_id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

fn validate_selections(selections: &StyleSelections) -> Result<(), AppError> {
    let blank_logo = selections
        .selected_logo_options
        .iter()
        .any(|(category, option)| category.trim().is_empty() || option.trim().is_empty());
    if blank_logo {
        return Err(AppError::Validation(
            "Logo selections must name a category and an option".to_string(),
        ));
    }

    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&selections.selected_palette) {
        return Err(AppError::Validation("Palette id must not be blank".to_string()));
    }
    if blank(&selections.selected_typography) {
        return Err(AppError::Validation(
            "Typography id must not be blank".to_string(),
        ));
    }

    Ok(())
}
