//! # Case Studies Service
//!
//! CRUD over case studies under `/api/case-studies`. A case study is an ordered
//! list of template ids (its slides); `GET /{case_study_id}/templates` returns
//! them as template records.

mod crud;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/case-studies";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(crud::create))
        .route("", get().to(crud::list))
        .route("/{case_study_id}", get().to(crud::process))
        .route("/{case_study_id}", patch().to(crud::update))
        .route("/{case_study_id}", delete().to(crud::delete))
        .route("/{case_study_id}/templates", get().to(crud::templates))
}
