// backend/src/services/case_studies/crud.rs
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::collection::CaseStudy;
use common::requests::{CaseStudyRequest, UpdateCaseStudyRequest};
use uuid::Uuid;

fn not_found(case_study_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Case study {}", case_study_id))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    payload: web::Json<CaseStudyRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let now = Utc::now();
    let case_study = CaseStudy {
        id: Uuid::new_v4().to_string(),
        tags: req.tags,
        template_ids: req.template_ids,
        created_at: now,
        updated_at: now,
    };
    match state.store.insert_case_study(&case_study) {
        Ok(()) => HttpResponse::Created().json(case_study),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn list(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_case_studies() {
        Ok(case_studies) => HttpResponse::Ok().json(case_studies),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn process(state: web::Data<AppState>, case_study_id: web::Path<String>) -> impl Responder {
    match state.store.get_case_study(&case_study_id) {
        Ok(Some(case_study)) => HttpResponse::Ok().json(case_study),
        Ok(None) => not_found(&case_study_id).error_response(),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    case_study_id: web::Path<String>,
    payload: web::Json<UpdateCaseStudyRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let result = state
        .store
        .get_case_study(&case_study_id)
        .and_then(|found| found.ok_or_else(|| not_found(&case_study_id)))
        .and_then(|mut case_study| {
            if let Some(tags) = req.tags {
                case_study.tags = tags;
            }
            if let Some(template_ids) = req.template_ids {
                case_study.template_ids = template_ids;
            }
            case_study.updated_at = Utc::now();
            match state.store.update_case_study(&case_study)? {
                true => Ok(case_study),
                false => Err(not_found(&case_study_id)),
            }
        });
    match result {
        Ok(case_study) => HttpResponse::Ok().json(case_study),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn delete(state: web::Data<AppState>, case_study_id: web::Path<String>) -> impl Responder {
    match state.store.delete_case_study(&case_study_id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => not_found(&case_study_id).error_response(),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn templates(state: web::Data<AppState>, case_study_id: web::Path<String>) -> impl Responder {
    match state.store.case_study_templates(&case_study_id) {
        Ok(Some(templates)) => HttpResponse::Ok().json(templates),
        Ok(None) => not_found(&case_study_id).error_response(),
        Err(e) => e.error_response(),
    }
}
