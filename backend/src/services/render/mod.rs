//! # Render Service Module
//!
//! Endpoints under `/api/render` that turn final HTML into assets through the
//! configured render API.
//!
//! ## Sub-modules:
//! - `jpeg`: one-shot HTML to JPEG.
//! - `pdf`: one-shot HTML to PDF, returned inline or uploaded to storage.
//! - `batch`: background rendering of many templates, with status polling.
//! - `combine`: merges already rendered PDFs into one.

mod batch;
mod combine;
mod jpeg;
mod pdf;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/render";

/// Configures and returns the Actix `Scope` for all render routes.
///
/// # Registered Routes:
///
/// *   **`POST /jpeg`**: `{ html }` to a JPEG attachment.
/// *   **`POST /pdf`**: `{ html, responseFormat, uploadToStorage }` to a PDF URL,
///     data URL or binary body.
/// *   **`POST /batch`**: `{ items, format }`, starts a job and returns `{ job_id }`.
/// *   **`GET /status/{job_id}`**: the job's `JobStatus`.
/// *   **`GET /results/{job_id}`**: per-item results once the job has finished.
/// *   **`POST /combine-pdfs`**: `{ pdfUrls }` to one merged PDF attachment.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/jpeg", post().to(jpeg::process))
        .route("/pdf", post().to(pdf::process))
        .route("/batch", post().to(batch::process))
        .route("/status/{job_id}", get().to(batch::status))
        .route("/results/{job_id}", get().to(batch::results))
        .route("/combine-pdfs", post().to(combine::process))
}
