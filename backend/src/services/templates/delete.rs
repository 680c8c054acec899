// backend/src/services/templates/delete.rs
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};

/// `DELETE /api/templates/{template_id}`. The HTML blob is left in storage;
/// other versions or rendered assets may still link to it.
pub(crate) async fn process(state: web::Data<AppState>, template_id: web::Path<String>) -> impl Responder {
    match state.store.delete_template(&template_id) {
        Ok(true) => {
            log::info!("Deleted template {}", template_id);
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Ok(false) => ServiceError::NotFound(format!("Template {}", template_id)).error_response(),
        Err(e) => e.error_response(),
    }
}
