// backend/src/clients/storage.rs
use crate::clients::ObjectStorage;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Content-addressed key for rendered output: `{prefix}/{md5}.{ext}`.
///
/// Rendering the same bytes twice lands on the same object.
pub fn content_key(prefix: &str, bytes: &[u8], extension: &str) -> String {
    format!("{}/{:x}.{}", prefix, md5::compute(bytes), extension)
}

fn check_key(key: &str) -> Result<(), ServiceError> {
    let safe = !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(())
    } else {
        Err(ServiceError::Storage(format!("Invalid object key: {}", key)))
    }
}

/// Stores objects on the local filesystem. The directory is served by the
/// HTTP server under `/assets`.
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        LocalStorage {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError> {
        check_key(key)?;
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        log::info!("Stored {} ({}, {} bytes)", path.display(), content_type, bytes.len());
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Stores objects with a plain authenticated `PUT {endpoint}/{key}`.
pub struct HttpStorage {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    public_base_url: String,
}

impl HttpStorage {
    pub fn new(client: reqwest::Client, endpoint: &str, token: Option<String>, public_base_url: &str) -> Self {
        HttpStorage {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, ServiceError> {
        check_key(key)?;
        let mut request = self
            .client
            .put(format!("{}/{}", self.endpoint, key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Storage(format!(
                "Upload of {} failed: {} {}",
                key,
                status.as_u16(),
                text
            )));
        }
        let url = format!("{}/{}", self.public_base_url, key);
        log::info!("Uploaded {}", url);
        Ok(url)
    }
}
