//! services/client/src/bin/vibebot.rs

use client_lib::{
    adapters::{Backend, HttpAuthAdapter, HttpChatAdapter, HttpProcessingAdapter},
    config::Config,
    error::ClientError,
    tui::Tui,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibebot_core::Controller;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Backend base URL: {}", config.base_url);

    // --- 2. Initialize Backend Adapters ---
    let backend = Backend::new(&config)?;
    let auth = Arc::new(HttpAuthAdapter::new(backend.clone()));
    let processing = Arc::new(HttpProcessingAdapter::new(backend.clone()));
    let chat = Arc::new(HttpChatAdapter::new(backend));

    // --- 3. Build the Controller & Run the Front-End ---
    let controller = Arc::new(Controller::new(auth, processing, chat));
    Tui::new(controller).run().await
}
