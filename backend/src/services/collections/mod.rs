//! # Collections Service
//!
//! CRUD over template collections under `/api/collections`, plus
//! `GET /{collection_id}/templates` which expands a collection's template ids
//! into full template records (ids that no longer exist are dropped).

mod crud;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/collections";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(crud::create))
        .route("", get().to(crud::list))
        .route("/{collection_id}", get().to(crud::process))
        .route("/{collection_id}", patch().to(crud::update))
        .route("/{collection_id}", delete().to(crud::delete))
        .route("/{collection_id}/templates", get().to(crud::templates))
}
