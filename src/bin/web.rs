//! Clip arena web server: REST API under /api.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8000 by default. Override with env: HOST, PORT, TOKEN_TTL_HOURS.

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use clip_arena::api::{self, AppState};
use clip_arena::config::Config;
use clip_arena::{MemoryRepository, Repository};
use std::sync::Arc;
use std::time::Duration;

/// How often expired login tokens are swept.
const TOKEN_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let repo: Arc<dyn Repository> = Arc::new(MemoryRepository::new());
    let state = Data::new(AppState::new(repo, config.token_ttl));

    // Background task: every 30 minutes, drop expired tokens
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(TOKEN_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match state_cleanup.auth.purge_expired() {
                Ok(0) => {}
                Ok(removed) => log::info!("Dropped {} expired token(s)", removed),
                Err(e) => log::error!("Token cleanup failed: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
