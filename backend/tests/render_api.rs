mod support;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use asset_studio::clients::ObjectStorage;
use common::jobs::JobStatus;
use lopdf::Document;
use serde_json::{json, Value};
use std::time::Duration;
use support::{labelled_pdf, TestContext, FAIL_MARKER};

#[actix_web::test]
async fn jpeg_returns_an_attachment() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/render/jpeg")
        .set_json(json!({ "html": "<p>Hi</p>" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/jpeg");
    let disposition = resp.headers().get("content-disposition").unwrap().to_str().unwrap();
    assert!(disposition.contains("rendered-image.jpg"));
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);

    let req = test::TestRequest::post()
        .uri("/api/render/jpeg")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn upstream_failures_surface_as_bad_gateway() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/render/jpeg")
        .set_json(json!({ "html": format!("<p>{}</p>", FAIL_MARKER) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "API returned error: 422 Unprocessable document");
}

#[actix_web::test]
async fn pdf_response_formats() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    // Uploaded by default, under a content key.
    let req = test::TestRequest::post()
        .uri("/api/render/pdf")
        .set_json(json!({ "html": "<p>Doc</p>" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["contentType"], "application/pdf");
    let url = body["url"].as_str().unwrap();
    let key = url.strip_prefix("memory://").unwrap();
    assert!(key.starts_with("pdfs/") && key.ends_with(".pdf"));
    assert!(ctx.storage.object(key).unwrap().0.starts_with(b"%PDF-"));

    let req = test::TestRequest::post()
        .uri("/api/render/pdf")
        .set_json(json!({ "html": "<p>Doc</p>", "uploadToStorage": false }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["pdf"]
        .as_str()
        .unwrap()
        .starts_with("data:application/pdf;base64,JVBERi0"));

    let req = test::TestRequest::post()
        .uri("/api/render/pdf")
        .set_json(json!({ "html": "<p>Doc</p>", "uploadToStorage": false, "responseFormat": "binary" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    assert!(test::read_body(resp).await.starts_with(b"%PDF-"));
}

#[actix_web::test]
async fn template_render_uses_request_data_over_snapshot() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({
            "name": "Banner",
            "type": "banner",
            "html": "<h1>{{title}}</h1>",
            "jsonData": { "title": "Stored" }
        }))
        .to_request();
    let published: Value = test::call_and_read_body_json(&app, req).await;
    let id = published["templateId"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/templates/{}/render", id))
        .set_json(json!({ "format": "pdf", "jsonData": { "title": "Live" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers().get("content-disposition").unwrap().to_str().unwrap();
    assert!(disposition.contains(&format!("{}.pdf", id)));
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"%PDF-<h1>Live</h1>");

    let req = test::TestRequest::post()
        .uri(&format!("/api/templates/{}/render", id))
        .set_json(json!({}))
        .to_request();
    let bytes = test::call_and_read_body(&app, req).await;
    assert!(bytes.ends_with(b"<h1>Stored</h1>"));

    let req = test::TestRequest::post()
        .uri("/api/templates/missing/render")
        .set_json(json!({}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

async fn wait_for_final_status(ctx: &TestContext, job_id: &str) -> JobStatus {
    for _ in 0..200 {
        if let Some(status @ (JobStatus::Completed(_) | JobStatus::Failed(_))) = ctx.jobs.status(job_id).await {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job_id);
}

#[actix_web::test]
async fn batch_render_records_per_item_results() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/templates")
        .set_json(json!({ "name": "Card", "type": "text", "html": "<p>{{text}}</p>" }))
        .to_request();
    let published: Value = test::call_and_read_body_json(&app, req).await;
    let id = published["templateId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/render/batch")
        .set_json(json!({
            "items": [
                { "templateId": id, "jsonData": { "text": "one" } },
                { "templateId": "does-not-exist" },
                { "templateId": id, "jsonData": { "text": FAIL_MARKER } },
                { "templateId": id, "jsonData": { "text": "two" } }
            ],
            "format": "jpeg"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let status = wait_for_final_status(&ctx, &job_id).await;
    assert_eq!(status, JobStatus::Completed("Rendered 2 of 4 items".to_string()));

    let req = test::TestRequest::get()
        .uri(&format!("/api/render/status/{}", job_id))
        .to_request();
    let status: JobStatus = test::call_and_read_body_json(&app, req).await;
    assert!(matches!(status, JobStatus::Completed(_)));

    let req = test::TestRequest::get()
        .uri(&format!("/api/render/results/{}", job_id))
        .to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert!(results[0]["url"].as_str().unwrap().starts_with("memory://images/"));
    assert!(results[1]["error"].as_str().unwrap().contains("not found"));
    assert!(results[2]["error"].as_str().unwrap().contains("422"));
    assert!(results[3]["url"].is_string());
    assert_ne!(results[0]["url"], results[3]["url"]);
}

#[actix_web::test]
async fn batch_fails_when_every_item_fails() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/api/render/batch")
        .set_json(json!({ "items": [{ "templateId": "nope" }] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let status = wait_for_final_status(&ctx, &job_id).await;
    assert!(matches!(status, JobStatus::Failed(_)));

    let req = test::TestRequest::post()
        .uri("/api/render/batch")
        .set_json(json!({ "items": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    for uri in ["/api/render/status/unknown", "/api/render/results/unknown"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn combine_pdfs_merges_in_request_order() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let cover = ctx
        .storage
        .put("pdfs/cover.pdf", labelled_pdf(1, "Cover"), "application/pdf")
        .await
        .unwrap();
    let body = ctx
        .storage
        .put("pdfs/body.pdf", labelled_pdf(2, "Body"), "application/pdf")
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/render/combine-pdfs")
        .set_json(json!({ "pdfUrls": [body, cover] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    let disposition = resp.headers().get("content-disposition").unwrap().to_str().unwrap();
    assert!(disposition.contains("merged.pdf"));

    let merged = Document::load_mem(&test::read_body(resp).await).unwrap();
    let pages = merged.get_pages();
    assert_eq!(pages.len(), 3);
    let last = merged.get_page_content(pages[&3]).unwrap();
    assert!(String::from_utf8_lossy(&last).contains("Cover 1"));
}

#[actix_web::test]
async fn combine_pdfs_rejects_empty_lists_and_bad_downloads() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    for payload in [json!({}), json!({ "pdfUrls": [] })] {
        let req = test::TestRequest::post()
            .uri("/api/render/combine-pdfs")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Please provide an array of PDF URLs");
    }

    let real = ctx
        .storage
        .put("pdfs/real.pdf", labelled_pdf(1, "Real"), "application/pdf")
        .await
        .unwrap();
    let not_pdf = ctx
        .storage
        .put("pdfs/broken.pdf", b"<html>oops</html>".to_vec(), "application/pdf")
        .await
        .unwrap();
    for missing in ["memory://pdfs/missing.pdf", not_pdf.as_str()] {
        let req = test::TestRequest::post()
            .uri("/api/render/combine-pdfs")
            .set_json(json!({ "pdfUrls": [real.as_str(), missing] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], format!("Failed to download PDF from {}", missing));
    }
}
