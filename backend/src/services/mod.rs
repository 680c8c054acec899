//! HTTP surface of the service.
//!
//! Each sub-module owns one `/api/...` scope and exposes `configure_routes()`.

pub mod case_studies;
pub mod collections;
pub mod render;
pub mod templates;

use crate::error::ServiceError;
use actix_web::web;

/// Registers every API scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(templates::configure_routes())
        .service(render::configure_routes())
        .service(collections::configure_routes())
        .service(case_studies::configure_routes());
}

/// JSON extractor settings: body size limit and `{ "error": ... }` bodies for
/// payloads that fail to deserialize.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ServiceError::BadRequest(err.to_string()).into())
}
