use actix_web::{web, App, HttpServer};
use asset_studio::config::AppConfig;
use asset_studio::job_controller::state::{start_job_updater, JobsState};
use asset_studio::services;
use asset_studio::state::AppState;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    let app_state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::channel(100);

    // Start job updater task
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    let serve_local_assets = config.storage.endpoint.is_none();
    let assets_dir = config.storage.dir.clone();
    if serve_local_assets {
        std::fs::create_dir_all(&assets_dir)?;
    }

    info!("Server running at http://{}:{}", config.host, config.port);

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        let app = App::new()
            .app_data(services::json_config(json_limit))
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(jobs_state.clone()))
            .configure(services::configure);
        if serve_local_assets {
            app.service(actix_files::Files::new("/assets", assets_dir.clone()))
        } else {
            app
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
