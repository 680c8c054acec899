// backend/src/clients/render.rs
use crate::clients::{RenderOptions, RenderService, Rendered};
use crate::error::ServiceError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::requests::RenderFormat;
use serde_json::{json, Value};

/// Render API client (headless browser as a service).
///
/// The HTML is sent base64 encoded in `page.setContent.html`; the response body
/// is the raw image or PDF.
pub struct HttpRenderService {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpRenderService {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: Option<String>) -> Self {
        HttpRenderService {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, format: RenderFormat) -> String {
        match format {
            RenderFormat::Jpeg => format!("{}/screenshot/direct", self.api_url),
            RenderFormat::Pdf => format!("{}/pdf/direct", self.api_url),
        }
    }
}

/// Request body for the render API.
pub fn render_payload(html: &str, format: RenderFormat, options: &RenderOptions) -> Value {
    let encoded = STANDARD.encode(html.as_bytes());
    match format {
        RenderFormat::Jpeg => json!({
            "page": {
                "setContent": { "html": encoded },
                "screenshot": {
                    "type": "jpeg",
                    "quality": options.jpeg_quality,
                    "fullPage": options.full_page,
                },
            },
            "launch": {
                "defaultViewport": { "width": options.width, "height": options.height },
            },
        }),
        RenderFormat::Pdf => json!({
            "page": {
                "setContent": { "html": encoded },
                "pdf": {
                    "printBackground": options.print_background,
                    "height": options.height,
                    "width": options.width,
                },
            },
        }),
    }
}

#[async_trait]
impl RenderService for HttpRenderService {
    async fn render(
        &self,
        html: &str,
        format: RenderFormat,
        options: &RenderOptions,
    ) -> Result<Rendered, ServiceError> {
        let mut request = self
            .client
            .post(self.endpoint(format))
            .json(&render_payload(html, format, options));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("Render API returned error: {} {}", status.as_u16(), message);
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let default_type = match format {
            RenderFormat::Jpeg => "image/jpeg",
            RenderFormat::Pdf => "application/pdf",
        };
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(default_type)
            .to_string();

        let bytes = response.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: "Received empty buffer from render API".to_string(),
            });
        }
        log::debug!("Render API returned {} bytes of {}", bytes.len(), content_type);

        if format == RenderFormat::Jpeg && !has_jpeg_signature(&bytes) {
            log::warn!("Response does not have JPEG signature - may not be a valid image");
        }

        Ok(Rendered {
            bytes,
            content_type,
        })
    }
}

pub fn has_jpeg_signature(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0xFF && bytes[1] == 0xD8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_payload_carries_viewport_and_encoded_html() {
        let payload = render_payload("<p>x</p>", RenderFormat::Jpeg, &RenderOptions::default());
        assert_eq!(payload["page"]["setContent"]["html"], "PHA+eDwvcD4=");
        assert_eq!(payload["page"]["screenshot"]["type"], "jpeg");
        assert_eq!(payload["page"]["screenshot"]["quality"], 100);
        assert_eq!(payload["launch"]["defaultViewport"]["width"], 1080);
    }

    #[test]
    fn pdf_payload_prints_background() {
        let payload = render_payload("<p>x</p>", RenderFormat::Pdf, &RenderOptions::default());
        assert_eq!(payload["page"]["pdf"]["printBackground"], true);
        assert_eq!(payload["page"]["pdf"]["height"], 1080);
        assert!(payload.get("launch").is_none());
    }

    #[test]
    fn endpoints_follow_format() {
        let service = HttpRenderService::new(reqwest::Client::new(), "https://render.test/v1/render/", None);
        assert_eq!(
            service.endpoint(RenderFormat::Jpeg),
            "https://render.test/v1/render/screenshot/direct"
        );
        assert_eq!(service.endpoint(RenderFormat::Pdf), "https://render.test/v1/render/pdf/direct");
    }

    #[test]
    fn detects_jpeg_signature() {
        assert!(has_jpeg_signature(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!has_jpeg_signature(b"%PDF-1.7"));
    }
}
