// backend/src/clients/fetch.rs
use crate::clients::HtmlFetcher;
use crate::engine::dom::escape_html;
use crate::engine::resolve::stringify;
use crate::error::ServiceError;
use async_trait::async_trait;
use common::model::template::Template;
use serde_json::Value;

pub struct HttpHtmlFetcher {
    client: reqwest::Client,
}

impl HttpHtmlFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        HttpHtmlFetcher { client }
    }

    /// GETs `url`, turning a non-2xx status into `ServiceError::Upstream`.
    async fn get(&self, url: &str) -> Result<reqwest::Response, ServiceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HtmlFetcher for HttpHtmlFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ServiceError> {
        Ok(self.get(url).await?.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }
}

/// Page shown when a template's stored HTML cannot be fetched: one line per
/// top-level data field with its value, or its `{{token}}` when there is none.
pub fn fallback_document(template: &Template) -> String {
    let fields: Vec<String> = match &template.json_data {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::Object(_) | Value::Array(_) => String::new(),
                    scalar => stringify(scalar),
                };
                let shown = if text.is_empty() {
                    format!("{{{{{}}}}}", key)
                } else {
                    escape_html(&text)
                };
                format!(
                    "<div class=\"field-item\">\n      <strong>{}:</strong>\n      <span data-placeholder=\"{}\">{}</span>\n    </div>",
                    escape_html(key),
                    escape_html(key),
                    shown
                )
            })
            .collect(),
        _ => Vec::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{} Template</title>
  <meta charset="utf-8">
  <style>
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      margin: 10px;
      font-size: 14px;
      line-height: 1.5;
    }}
    [data-placeholder] {{
      background-color: rgba(59, 130, 246, 0.1);
      border: 1px dashed #3b82f6;
      padding: 2px 4px;
      border-radius: 2px;
      color: #2563eb;
      font-weight: 500;
    }}
    .template-heading {{
      font-size: 16px;
      margin-bottom: 10px;
    }}
    .field-item {{
      margin-bottom: 8px;
    }}
  </style>
</head>
<body>
  <div class="template-container">
    <div class="template-heading">Template Preview</div>
    {}
  </div>
</body>
</html>"#,
        template.template_type.label(),
        fields.join("\n    ")
    )
}
