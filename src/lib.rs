pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::llm_provider::LLMProvider;
use crate::state::{AppState, ReviewSettings};

/// Builds shared clients from the environment and wires the full router.
pub async fn create_app(config: &Config) -> axum::Router {
    let completion = LLMProvider::from_env();
    if !completion.is_available() {
        tracing::warn!("LLM API key not configured; reviews will fail");
    }
    let store = db::from_env(config.store_backend).await;

    let state = AppState::new(Arc::new(completion), store, settings_from(config));
    build_app(state, config)
}

pub fn build_app(state: AppState, config: &Config) -> axum::Router {
    routes::with_static_files(routes::router(state), &config.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(routes::cors_layer(&config.cors_origins))
}

pub fn settings_from(config: &Config) -> ReviewSettings {
    ReviewSettings {
        grading_mode: config.grading_mode,
        record_module_progress: config.record_module_progress,
    }
}
