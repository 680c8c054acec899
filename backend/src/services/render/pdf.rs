//! `POST /api/render/pdf`
//!
//! Renders resolved HTML to a PDF. The response depends on the request:
//!
//! - `uploadToStorage: true` (default): the PDF is stored under a content key
//!   (`pdfs/{md5}.pdf`) and `{ url, contentType }` is returned.
//! - `responseFormat: "base64"` (default): `{ pdf, contentType }` where `pdf`
//!   is a `data:` URL.
//! - `responseFormat: "binary"`: the PDF bytes themselves.

use crate::clients::{content_key, Rendered};
use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::requests::{PdfResponseFormat, RenderFormat, RenderPdfRequest};

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<RenderPdfRequest>,
) -> impl Responder {
    match render_pdf(&state, payload.into_inner()).await {
        Ok(response) => response,
        Err(e) => e.error_response(),
    }
}

async fn render_pdf(state: &AppState, req: RenderPdfRequest) -> Result<HttpResponse, ServiceError> {
    if req.html.trim().is_empty() {
        return Err(ServiceError::missing_field("html"));
    }

    let Rendered {
        bytes,
        content_type,
    } = state
        .renderer
        .render(&req.html, RenderFormat::Pdf, &state.render_options)
        .await?;

    if req.upload_to_storage {
        let key = content_key("pdfs", &bytes, "pdf");
        let url = state.storage.put(&key, bytes, &content_type).await?;
        log::info!("Stored rendered PDF at {}", url);
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "url": url,
            "contentType": content_type,
        })));
    }

    Ok(match req.response_format {
        PdfResponseFormat::Base64 => HttpResponse::Ok().json(serde_json::json!({
            "pdf": format!("data:{};base64,{}", content_type, BASE64.encode(&bytes)),
            "contentType": content_type,
        })),
        PdfResponseFormat::Binary => HttpResponse::Ok()
            .content_type(content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("rendered.pdf".to_string())],
            })
            .body(bytes),
    })
}
