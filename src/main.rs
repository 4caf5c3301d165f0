//! Main entry point for the Website Mockup Generator

use mockup_generator::{
    api,
    backend::HttpGenerationClient,
    config::Settings,
    notify::{DisabledNotifier, Notifier, SmtpNotifier},
    storage::FileImageStore,
    task::{Orchestrator, PipelineConfig, TaskRegistry},
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    if settings.logging.format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    }

    info!("Starting Website Mockup Generator");

    settings.validate()?;
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Collaborators
    let generator = Arc::new(HttpGenerationClient::new(&settings.generation)?);

    let store = Arc::new(FileImageStore::new(&settings.storage));
    store.ensure_storage_dir().await?;

    let notifier: Arc<dyn Notifier> = if settings.mail.is_enabled() {
        Arc::new(SmtpNotifier::new(settings.mail.clone()))
    } else {
        warn!("mail.smtp_host is not set, mockups will not be emailed");
        Arc::new(DisabledNotifier)
    };

    let registry = Arc::new(TaskRegistry::new());
    let orchestrator = Arc::new(Orchestrator::new(
        generator,
        store,
        notifier,
        registry,
        PipelineConfig::from(&settings),
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app_state = Arc::new(AppState::new(Arc::new(settings), orchestrator));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
