//! # External Collaborators
//!
//! The backend talks to three outside services, each behind a small trait so
//! that handlers hold them as `Arc<dyn ...>` and tests can swap in fakes:
//!
//! - [`RenderService`]: turns final HTML into JPEG or PDF bytes.
//! - [`ObjectStorage`]: stores a blob under a key and returns its public URL.
//! - [`HtmlFetcher`]: downloads a stored template's HTML, or any other
//!   stored file such as a rendered PDF.

pub mod fetch;
pub mod render;
pub mod storage;

use crate::error::ServiceError;
use async_trait::async_trait;
use common::requests::RenderFormat;

pub use fetch::{fallback_document, HttpHtmlFetcher};
pub use render::HttpRenderService;
pub use storage::{content_key, HttpStorage, LocalStorage};

/// Rendering options passed through to the render API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub print_background: bool,
    pub jpeg_quality: u8,
    pub full_page: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 1080,
            height: 1080,
            print_background: true,
            jpeg_quality: 100,
            full_page: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Rendered {
    /// File extension matching the rendered format.
    pub fn extension(format: RenderFormat) -> &'static str {
        match format {
            RenderFormat::Jpeg => "jpg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

#[async_trait]
pub trait RenderService: Send + Sync {
    async fn render(
        &self,
        html: &str,
        format: RenderFormat,
        options: &RenderOptions,
    ) -> Result<Rendered, ServiceError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under `key` and returns the public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ServiceError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}
