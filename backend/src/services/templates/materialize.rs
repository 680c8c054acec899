//! # Engine Endpoints
//!
//! Stateless endpoints backing the template editor:
//!
//! - `POST /api/templates/materialize`: applies element mappings to an HTML
//!   document and returns the placeholder HTML together with the applied and
//!   skipped mappings.
//! - `POST /api/templates/inspect`: assigns `el-<n>` identifiers to the
//!   elements of a document and returns the annotated HTML plus the element
//!   listing the editor uses to pick mapping targets.
//! - `POST /api/templates/import`: the same inspection for an uploaded `.html`
//!   file (multipart field `file`).

use crate::engine;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{InspectRequest, MaterializeRequest};
use futures_util::StreamExt;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<MaterializeRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if req.html.trim().is_empty() {
        return ServiceError::missing_field("html").error_response();
    }
    let materialized = state.materializer.materialize(&req.html, &req.mappings);
    HttpResponse::Ok().json(materialized)
}

pub(crate) async fn inspect(payload: web::Json<InspectRequest>) -> impl Responder {
    if payload.html.trim().is_empty() {
        return ServiceError::missing_field("html").error_response();
    }
    HttpResponse::Ok().json(engine::inspect(&payload.html))
}

pub(crate) async fn import(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match read_html_upload(payload, state.upload_limit).await {
        Ok(html) => HttpResponse::Ok().json(engine::inspect(&html)),
        Err(e) => e.error_response(),
    }
}

/// Reads the `file` field of a multipart upload as UTF-8 HTML, stopping as
/// soon as it grows past `limit` bytes.
async fn read_html_upload(mut payload: Multipart, limit: usize) -> Result<String, ServiceError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_ascii_lowercase()))
            .unwrap_or_default();
        if !(filename.ends_with(".html") || filename.ends_with(".htm")) {
            return Err(ServiceError::BadRequest(
                "The file must end with .html".to_string(),
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServiceError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(ServiceError::BadRequest(format!(
                    "The file exceeds the {} byte limit",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        log::debug!("Imported {} ({} bytes)", filename, bytes.len());
        return String::from_utf8(bytes)
            .map_err(|_| ServiceError::BadRequest("The file is not valid UTF-8".to_string()));
    }
    Err(ServiceError::missing_field("file"))
}
