//! Catalog API endpoints.

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::models::{Catalog, LogoCategory, Palette, TypographyStyle};
use crate::AppState;

/// GET /api/catalog - Everything the form renders.
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Catalog> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_catalog().await {
        Ok(catalog) => success(catalog, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/catalog/logo-categories
pub async fn list_logo_categories(State(state): State<AppState>) -> ApiResult<Vec<LogoCategory>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_logo_categories().await {
        Ok(categories) => success(categories, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/catalog/palettes
pub async fn list_palettes(State(state): State<AppState>) -> ApiResult<Vec<Palette>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_palettes().await {
        Ok(palettes) => success(palettes, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/catalog/typography
pub async fn list_typography_styles(
    State(state): State<AppState>,
) -> ApiResult<Vec<TypographyStyle>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_typography_styles().await {
        Ok(styles) => success(styles, revision_id),
        Err(e) => error(e, revision_id),
    }
}
