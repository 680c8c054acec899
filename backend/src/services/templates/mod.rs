//! # Template Service Module
//!
//! This module aggregates all API endpoints related to templates. It routes
//! requests under `/api/templates` to the handlers of its sub-modules.
//!
//! ## Sub-modules:
//! - `materialize`: stateless engine endpoints (materialize, inspect, HTML import).
//! - `resolve`: stateless resolution and word counts.
//! - `publish`: creates a template record and uploads its placeholder HTML.
//! - `get`: reads one template, all templates, or all templates of a type.
//! - `update`: partial updates and the visibility toggle.
//! - `delete`: removes a template record.
//! - `placeholders`: lists the tokens of a stored template.
//! - `preview`: resolves a stored template and returns HTML or rendered bytes.

mod delete;
mod get;
mod materialize;
mod placeholders;
mod preview;
mod publish;
mod resolve;
mod update;

pub(crate) use preview::load_template_html;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /materialize`**: `{ html, mappings }` to placeholder HTML.
/// *   **`POST /inspect`**: annotates HTML with element ids and lists its elements.
/// *   **`POST /import`**: same as `/inspect` for an uploaded `.html` file (multipart `file`).
/// *   **`POST /resolve`**: `{ templateHtml, jsonData, mode }` to final HTML.
/// *   **`POST /word-counts`**: words per string field of `jsonData`.
/// *   **`POST ""`** / **`GET ""`**: publish / list.
/// *   **`GET /type/{template_type}`**: templates of one type.
/// *   **`GET|PATCH|DELETE /{template_id}`**: read, partial update, delete.
/// *   **`PATCH /{template_id}/visibility`**: `{ isVisible }`.
/// *   **`GET /{template_id}/placeholders`**: tokens of the stored HTML and those the stored data leaves unfilled.
/// *   **`GET /{template_id}/preview`**: resolved HTML with the stored data.
/// *   **`POST /{template_id}/render`**: resolved and rendered JPEG or PDF.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/materialize", post().to(materialize::process))
        .route("/inspect", post().to(materialize::inspect))
        .route("/import", post().to(materialize::import))
        .route("/resolve", post().to(resolve::process))
        .route("/word-counts", post().to(resolve::word_counts))
        .route("", post().to(publish::process))
        .route("", get().to(get::list))
        .route("/type/{template_type}", get().to(get::list_by_type))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", patch().to(update::process))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/visibility", patch().to(update::visibility))
        .route("/{template_id}/placeholders", get().to(placeholders::process))
        .route("/{template_id}/preview", get().to(preview::process))
        .route("/{template_id}/render", post().to(preview::render))
}
