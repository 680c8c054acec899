//! Runtime configuration read from the environment (and a `.env` file, loaded
//! by `main` before [`AppConfig::from_env`] runs).

use crate::engine::materialize::{DEFAULT_ACCENT_COLOR, DEFAULT_PLACEHOLDER_IMAGE_SRC};
use crate::engine::MaterializeOptions;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RENDER_API_URL: &str = "https://api.doppio.sh/v1/render";

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base URL; `/screenshot/direct` and `/pdf/direct` are appended.
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Local directory used when no remote endpoint is configured.
    pub dir: PathBuf,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    /// Base of the URLs returned for stored objects.
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub render: RenderConfig,
    pub storage: StorageConfig,
    pub placeholder_image_src: String,
    pub default_accent_color: String,
    pub http_timeout: Duration,
    pub json_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env_or("APP_HOST", "127.0.0.1");
        let port = env_or("APP_PORT", "8080").parse().unwrap_or(8080);
        let public_base_url = optional("PUBLIC_ASSETS_URL")
            .unwrap_or_else(|| format!("http://{}:{}/assets", host, port));

        AppConfig {
            database_path: PathBuf::from(env_or("DATABASE_PATH", "templates.sqlite")),
            render: RenderConfig {
                api_url: env_or("RENDER_API_URL", DEFAULT_RENDER_API_URL),
                api_key: optional("RENDER_API_KEY"),
            },
            storage: StorageConfig {
                dir: PathBuf::from(env_or("STORAGE_DIR", "./storage")),
                endpoint: optional("STORAGE_ENDPOINT"),
                token: optional("STORAGE_TOKEN"),
                public_base_url: public_base_url.trim_end_matches('/').to_string(),
            },
            placeholder_image_src: env_or("PLACEHOLDER_IMAGE_SRC", DEFAULT_PLACEHOLDER_IMAGE_SRC),
            default_accent_color: env_or("DEFAULT_ACCENT_COLOR", DEFAULT_ACCENT_COLOR),
            http_timeout: Duration::from_secs(
                env_or("HTTP_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            ),
            json_limit: 10 * 1024 * 1024, // 10 MB
            host,
            port,
        }
    }

    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            placeholder_image_src: self.placeholder_image_src.clone(),
            default_accent_color: self.default_accent_color.clone(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
