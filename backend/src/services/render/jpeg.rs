// backend/src/services/render/jpeg.rs
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{RenderFormat, RenderHtmlRequest};

/// `POST /api/render/jpeg`: renders already resolved HTML to a JPEG attachment.
pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<RenderHtmlRequest>,
) -> impl Responder {
    if payload.html.trim().is_empty() {
        return ServiceError::missing_field("html").error_response();
    }

    match state
        .renderer
        .render(&payload.html, RenderFormat::Jpeg, &state.render_options)
        .await
    {
        Ok(rendered) => HttpResponse::Ok()
            .content_type(rendered.content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("rendered-image.jpg".to_string())],
            })
            .body(rendered.bytes),
        Err(e) => e.error_response(),
    }
}
