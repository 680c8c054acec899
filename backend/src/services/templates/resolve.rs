// backend/src/services/templates/resolve.rs
use crate::engine::paths::word_counts as count_words;
use crate::engine::Resolver;
use actix_web::{web, HttpResponse, Responder};
use common::requests::{ResolveRequest, WordCountRequest};

/// `POST /api/templates/resolve`: fills the tokens of `templateHtml` from `jsonData`.
pub(crate) async fn process(payload: web::Json<ResolveRequest>) -> impl Responder {
    let req = payload.into_inner();
    let html = Resolver::for_mode(req.mode).resolve(&req.template_html, &req.json_data);
    HttpResponse::Ok().json(serde_json::json!({ "html": html }))
}

/// `POST /api/templates/word-counts`: words per string field, keyed by flattened path.
pub(crate) async fn word_counts(payload: web::Json<WordCountRequest>) -> impl Responder {
    HttpResponse::Ok().json(count_words(&payload.json_data))
}
