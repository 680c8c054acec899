// backend/src/state.rs
use crate::clients::{
    HtmlFetcher, HttpHtmlFetcher, HttpRenderService, HttpStorage, LocalStorage, ObjectStorage,
    RenderOptions, RenderService,
};
use crate::config::AppConfig;
use crate::engine::Materializer;
use crate::error::ServiceError;
use crate::store::Store;
use std::sync::Arc;

/// Everything a handler needs, shared as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub renderer: Arc<dyn RenderService>,
    pub storage: Arc<dyn ObjectStorage>,
    pub fetcher: Arc<dyn HtmlFetcher>,
    pub materializer: Materializer,
    pub render_options: RenderOptions,
    /// Largest accepted HTML upload, in bytes.
    pub upload_limit: usize,
}

impl AppState {
    /// Wires the production collaborators described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<AppState, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let storage: Arc<dyn ObjectStorage> = match &config.storage.endpoint {
            Some(endpoint) => {
                log::info!("Storing objects at {}", endpoint);
                Arc::new(HttpStorage::new(
                    client.clone(),
                    endpoint,
                    config.storage.token.clone(),
                    &config.storage.public_base_url,
                ))
            }
            None => {
                log::info!("Storing objects under {}", config.storage.dir.display());
                Arc::new(LocalStorage::new(
                    config.storage.dir.clone(),
                    &config.storage.public_base_url,
                ))
            }
        };

        if config.render.api_key.is_none() {
            log::warn!("RENDER_API_KEY is not set, render requests will be unauthenticated");
        }

        Ok(AppState {
            store: Store::open(&config.database_path)?,
            renderer: Arc::new(HttpRenderService::new(
                client.clone(),
                &config.render.api_url,
                config.render.api_key.clone(),
            )),
            storage,
            fetcher: Arc::new(HttpHtmlFetcher::new(client)),
            materializer: Materializer::new(config.materialize_options()),
            render_options: RenderOptions::default(),
            upload_limit: config.json_limit,
        })
    }
}
