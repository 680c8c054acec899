// backend/src/services/collections/crud.rs
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::collection::Collection;
use common::requests::{CollectionRequest, UpdateCollectionRequest};
use serde_json::Value;
use uuid::Uuid;

fn not_found(collection_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("Collection {}", collection_id))
}

pub(crate) async fn create(
    state: web::Data<AppState>,
    payload: web::Json<CollectionRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    let name = match req.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return ServiceError::missing_field("name").error_response(),
    };

    let now = Utc::now();
    let collection = Collection {
        id: Uuid::new_v4().to_string(),
        name,
        tags: req.tags,
        placeholders: match req.placeholders {
            Value::Null => Value::Object(Default::default()),
            placeholders => placeholders,
        },
        template_ids: req.template_ids,
        created_at: now,
        updated_at: now,
    };
    match state.store.insert_collection(&collection) {
        Ok(()) => {
            log::info!("Created collection {}", collection.id);
            HttpResponse::Created().json(collection)
        }
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn list(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_collections() {
        Ok(collections) => HttpResponse::Ok().json(collections),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn process(state: web::Data<AppState>, collection_id: web::Path<String>) -> impl Responder {
    match state.store.get_collection(&collection_id) {
        Ok(Some(collection)) => HttpResponse::Ok().json(collection),
        Ok(None) => not_found(&collection_id).error_response(),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn update(
    state: web::Data<AppState>,
    collection_id: web::Path<String>,
    payload: web::Json<UpdateCollectionRequest>,
) -> impl Responder {
    match update_collection(&state, &collection_id, payload.into_inner()) {
        Ok(collection) => HttpResponse::Ok().json(collection),
        Err(e) => e.error_response(),
    }
}

fn update_collection(
    state: &AppState,
    collection_id: &str,
    req: UpdateCollectionRequest,
) -> Result<Collection, ServiceError> {
    let mut collection = state
        .store
        .get_collection(collection_id)?
        .ok_or_else(|| not_found(collection_id))?;

    if let Some(name) = req.name {
        collection.name = name;
    }
    if let Some(tags) = req.tags {
        collection.tags = tags;
    }
    if let Some(placeholders) = req.placeholders {
        collection.placeholders = placeholders;
    }
    if let Some(template_ids) = req.template_ids {
        collection.template_ids = template_ids;
    }
    collection.updated_at = Utc::now();

    if !state.store.update_collection(&collection)? {
        return Err(not_found(collection_id));
    }
    Ok(collection)
}

pub(crate) async fn delete(state: web::Data<AppState>, collection_id: web::Path<String>) -> impl Responder {
    match state.store.delete_collection(&collection_id) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Ok(false) => not_found(&collection_id).error_response(),
        Err(e) => e.error_response(),
    }
}

pub(crate) async fn templates(state: web::Data<AppState>, collection_id: web::Path<String>) -> impl Responder {
    match state.store.collection_templates(&collection_id) {
        Ok(Some(templates)) => HttpResponse::Ok().json(templates),
        Ok(None) => not_found(&collection_id).error_response(),
        Err(e) => e.error_response(),
    }
}
