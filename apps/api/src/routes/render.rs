//! Axum route handlers for the Render API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::render::{
    normalize_contact, render_entries, AdditionalLabelOverrides, ComposeOptions, ContactLabel,
    EntryPlan, RenderedBlock, RenderedContact,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub resume: ResumeData,
    /// Falls back to the server default when omitted.
    pub show_contact_icons: Option<bool>,
    #[serde(default)]
    pub additional_section_labels: AdditionalLabelOverrides,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub blocks: Vec<RenderedBlock>,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub entries: Vec<String>,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub plan: Option<EntryPlan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub label: ContactLabel,
    pub value: Option<String>,
    pub href_prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub contact: Option<RenderedContact>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render
///
/// Renders a full resume record into ordered blocks. Label overrides from the
/// server config apply first, request overrides on top.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let options = ComposeOptions {
        show_contact_icons: request
            .show_contact_icons
            .unwrap_or(state.config.show_contact_icons),
        additional_section_labels: state
            .config
            .label_overrides
            .layered(&request.additional_section_labels),
    };

    let blocks = state.composer.compose(&request.resume, &options)?;
    info!(blocks = blocks.len(), "Rendered resume");

    Ok(Json(RenderResponse { blocks }))
}

/// POST /api/v1/render/additional
///
/// Previews how one additional-info category will be grouped.
pub async fn handle_categorize(
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, AppError> {
    if request.label.trim().is_empty() {
        return Err(AppError::Validation("label cannot be empty".to_string()));
    }

    Ok(Json(CategorizeResponse {
        plan: render_entries(&request.entries, &request.label),
    }))
}

/// POST /api/v1/render/contact
///
/// Normalizes one contact value. `hrefPrefix` defaults to the label's header prefix.
pub async fn handle_contact(Json(request): Json<ContactRequest>) -> Json<ContactResponse> {
    let prefix = request
        .href_prefix
        .as_deref()
        .unwrap_or_else(|| request.label.default_href_prefix());

    Json(ContactResponse {
        contact: normalize_contact(request.label, request.value.as_deref(), prefix),
    })
}
