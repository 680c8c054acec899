//! `POST /api/render/combine-pdfs`: downloads several PDFs and returns them
//! merged into one, in the order given.

use crate::error::ServiceError;
use crate::pdf;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::CombinePdfsRequest;
use lopdf::Document;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<CombinePdfsRequest>,
) -> impl Responder {
    match combine(&state, payload.into_inner().pdf_urls).await {
        Ok(merged) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("merged.pdf".to_string())],
            })
            .body(merged),
        Err(e) => e.error_response(),
    }
}

async fn combine(state: &AppState, urls: Vec<String>) -> Result<Vec<u8>, ServiceError> {
    if urls.is_empty() {
        return Err(ServiceError::BadRequest(
            "Please provide an array of PDF URLs".to_string(),
        ));
    }

    let mut documents = Vec::with_capacity(urls.len());
    for url in &urls {
        let loaded = match state.fetcher.fetch_bytes(url).await {
            Ok(bytes) => Document::load_mem(&bytes).map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(document) => documents.push(document),
            Err(e) => {
                log::warn!("Could not load PDF from {}: {}", url, e);
                return Err(ServiceError::BadRequest(format!(
                    "Failed to download PDF from {}",
                    url
                )));
            }
        }
    }

    log::debug!("Merging {} PDFs", documents.len());
    tokio::task::spawn_blocking(move || pdf::merge(documents))
        .await
        .map_err(|e| ServiceError::Internal(format!("Failed to merge PDFs: {}", e)))?
}
