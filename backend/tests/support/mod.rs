//! In-process collaborators for the HTTP tests.
#![allow(dead_code)]

use actix_web::web;
use asset_studio::clients::{HtmlFetcher, ObjectStorage, RenderOptions, RenderService, Rendered};
use asset_studio::engine::Materializer;
use asset_studio::error::ServiceError;
use asset_studio::job_controller::state::{start_job_updater, JobsState};
use asset_studio::services;
use asset_studio::state::AppState;
use asset_studio::store::Store;
use async_trait::async_trait;
use common::requests::RenderFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const STORAGE_PREFIX: &str = "memory://";

/// Object storage and HTML fetcher over one in-memory map, so what a handler
/// uploads can be fetched back through its URL.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryStorage {
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.object(key).map(|(bytes, _)| String::from_utf8(bytes).unwrap())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(format!("{}{}", STORAGE_PREFIX, key))
    }
}

#[async_trait]
impl HtmlFetcher for MemoryStorage {
    async fn fetch(&self, url: &str) -> Result<String, ServiceError> {
        let key = url.strip_prefix(STORAGE_PREFIX).unwrap_or(url);
        self.text(key)
            .ok_or_else(|| ServiceError::NotFound(format!("Object {}", key)))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        let key = url.strip_prefix(STORAGE_PREFIX).unwrap_or(url);
        self.object(key)
            .map(|(bytes, _)| bytes)
            .ok_or_else(|| ServiceError::NotFound(format!("Object {}", key)))
    }
}

/// Echoes the HTML it is given behind a format marker. Any document containing
/// `FAIL_RENDER` is rejected the way the render API rejects bad input.
#[derive(Default)]
pub struct FakeRenderer {
    pub calls: Mutex<Vec<String>>,
}

pub const FAIL_MARKER: &str = "FAIL_RENDER";

#[async_trait]
impl RenderService for FakeRenderer {
    async fn render(
        &self,
        html: &str,
        format: RenderFormat,
        _options: &RenderOptions,
    ) -> Result<Rendered, ServiceError> {
        self.calls.lock().unwrap().push(html.to_string());
        if html.contains(FAIL_MARKER) {
            return Err(ServiceError::Upstream {
                status: 422,
                message: "Unprocessable document".to_string(),
            });
        }
        let (mut bytes, content_type) = match format {
            RenderFormat::Jpeg => (vec![0xFF, 0xD8, 0xFF], "image/jpeg"),
            RenderFormat::Pdf => (b"%PDF-".to_vec(), "application/pdf"),
        };
        bytes.extend_from_slice(html.as_bytes());
        Ok(Rendered {
            bytes,
            content_type: content_type.to_string(),
        })
    }
}

/// Serialized PDF whose pages each show `"{label} {n}"`.
pub fn labelled_pdf(num_pages: u32, label: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids: Vec<Object> = Vec::new();
    for n in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{} {}", label, n).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub struct TestContext {
    pub state: AppState,
    pub jobs: JobsState,
    pub storage: Arc<MemoryStorage>,
    pub renderer: Arc<FakeRenderer>,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(MemoryStorage::default());
        let renderer = Arc::new(FakeRenderer::default());
        let state = AppState {
            store: Store::open(dir.path().join("templates.sqlite")).unwrap(),
            renderer: renderer.clone(),
            storage: storage.clone(),
            fetcher: storage.clone(),
            materializer: Materializer::default(),
            render_options: RenderOptions::default(),
            upload_limit: 1024 * 1024,
        };
        let (jobs, rx) = JobsState::channel(64);
        tokio::spawn(start_job_updater(jobs.clone(), rx));
        TestContext {
            state,
            jobs,
            storage,
            renderer,
            _dir: dir,
        }
    }

    /// App configuration matching `main`, minus static file serving.
    pub fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) {
        let state = self.state.clone();
        let jobs = self.jobs.clone();
        move |cfg| {
            cfg.app_data(services::json_config(1024 * 1024))
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(jobs));
            services::configure(cfg);
        }
    }
}
