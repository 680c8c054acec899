//! # Batch Render Service
//!
//! Provides `POST /api/render/batch`, which renders many templates in one
//! background job, and the polling endpoints `GET /api/render/status/{job_id}`
//! and `GET /api/render/results/{job_id}`.
//!
//! ## Workflow:
//!
//! 1.  **Job Scheduling**: `schedule_batch_job` creates a `job_id`, registers it as
//!     `Pending` in the shared `JobsState` and returns immediately.
//!
//! 2.  **Loading**: the spawned task reports `InProgress(0)` and loads every item's
//!     template record and placeholder HTML. Items whose template does not exist
//!     fail individually; the rest of the batch continues.
//!
//! 3.  **Resolution**: all documents are resolved in one `spawn_blocking` call, which
//!     fans out over rayon so large batches do not stall the async runtime.
//!
//! 4.  **Rendering & Upload**: items are rendered one at a time (the render API is
//!     rate limited) and stored under content keys (`images/{md5}.jpg`,
//!     `pdfs/{md5}.pdf`). Progress is reported after each item.
//!
//! 5.  **Completion**: the per-item results are stored first, then the final status
//!     is reported: `Completed` when at least one item succeeded, `Failed` otherwise.

use crate::clients::{content_key, Rendered};
use crate::engine::Resolver;
use crate::error::ServiceError;
use crate::job_controller::state::JobsState;
use crate::services::templates::load_template_html;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::jobs::{BatchRenderResult, JobStatus};
use common::requests::{BatchRenderRequest, RenderFormat};
use serde_json::Value;
use uuid::Uuid;

pub(crate) async fn process(
    state: web::Data<AppState>,
    jobs: web::Data<JobsState>,
    payload: web::Json<BatchRenderRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if req.items.is_empty() {
        return ServiceError::missing_field("items").error_response();
    }
    let job_id = schedule_batch_job(state.get_ref().clone(), jobs.get_ref().clone(), req).await;
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

pub(crate) async fn status(jobs: web::Data<JobsState>, job_id: web::Path<String>) -> impl Responder {
    match jobs.status(&job_id).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => ServiceError::NotFound(format!("Job {}", job_id)).error_response(),
    }
}

pub(crate) async fn results(jobs: web::Data<JobsState>, job_id: web::Path<String>) -> impl Responder {
    match jobs.results(&job_id).await {
        Some(results) => HttpResponse::Ok().json(results),
        None => ServiceError::NotFound(format!("Results for job {}", job_id)).error_response(),
    }
}

/// Registers the job as `Pending` and spawns the task that runs it.
async fn schedule_batch_job(state: AppState, jobs: JobsState, req: BatchRenderRequest) -> String {
    let job_id = Uuid::new_v4().to_string();
    jobs.jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let task_job_id = job_id.clone();
    tokio::spawn(async move {
        run_batch_job(&state, &jobs, &task_job_id, req).await;
    });

    log::info!("Scheduled batch render job {}", job_id);
    job_id
}

/// A batch item ready for resolution, or the reason it cannot be rendered.
type Prepared = Result<(String, Value), String>;

async fn run_batch_job(state: &AppState, jobs: &JobsState, job_id: &str, req: BatchRenderRequest) {
    jobs.report(job_id, JobStatus::InProgress(0)).await;
    let total = req.items.len();

    let mut prepared: Vec<Prepared> = Vec::with_capacity(total);
    for item in &req.items {
        let template = match state.store.get_template(&item.template_id) {
            Ok(Some(template)) => template,
            Ok(None) => {
                prepared.push(Err(format!("Template {} not found", item.template_id)));
                continue;
            }
            Err(e) => {
                prepared.push(Err(e.to_string()));
                continue;
            }
        };
        let html = load_template_html(state, &template).await;
        let data = item.json_data.clone().unwrap_or(template.json_data);
        prepared.push(Ok((html, data)));
    }

    let documents: Vec<(String, Value)> = prepared
        .iter()
        .filter_map(|p| p.as_ref().ok().cloned())
        .collect();
    let resolved = match tokio::task::spawn_blocking(move || Resolver::render().resolve_batch(&documents)).await {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Batch job {} resolution panicked: {}", job_id, e);
            jobs.report(job_id, JobStatus::Failed(format!("Resolution failed: {}", e)))
                .await;
            return;
        }
    };

    let mut resolved = resolved.into_iter();
    let mut results = Vec::with_capacity(total);
    for (index, (item, prepared)) in req.items.iter().zip(prepared).enumerate() {
        let outcome = match prepared {
            Ok(_) => match resolved.next() {
                Some(html) => render_and_store(state, &html, req.format).await.map_err(|e| e.to_string()),
                None => Err("Resolution produced no document".to_string()),
            },
            Err(e) => Err(e),
        };
        if let Err(e) = &outcome {
            log::warn!("Batch job {} item {} ({}) failed: {}", job_id, index, item.template_id, e);
        }
        let (url, error) = match outcome {
            Ok(url) => (Some(url), None),
            Err(e) => (None, Some(e)),
        };
        results.push(BatchRenderResult {
            template_id: item.template_id.clone(),
            url,
            error,
        });

        let progress = ((index + 1) as f32 / total as f32 * 100.0) as u32;
        jobs.report(job_id, JobStatus::InProgress(progress)).await;
    }

    let succeeded = results.iter().filter(|r| r.url.is_some()).count();
    jobs.results
        .write()
        .await
        .insert(job_id.to_string(), results);

    let status = if succeeded == 0 {
        JobStatus::Failed(format!("All {} items failed to render", total))
    } else {
        JobStatus::Completed(format!("Rendered {} of {} items", succeeded, total))
    };
    log::info!("Batch job {} finished: {:?}", job_id, status);
    jobs.report(job_id, status).await;
}

async fn render_and_store(state: &AppState, html: &str, format: RenderFormat) -> Result<String, ServiceError> {
    let rendered = state
        .renderer
        .render(html, format, &state.render_options)
        .await?;
    let prefix = match format {
        RenderFormat::Jpeg => "images",
        RenderFormat::Pdf => "pdfs",
    };
    let key = content_key(prefix, &rendered.bytes, Rendered::extension(format));
    state
        .storage
        .put(&key, rendered.bytes, &rendered.content_type)
        .await
}
