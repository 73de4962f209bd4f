use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use std::sync::Arc;
use tokio::signal;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;
use wellbeing::api::{self, app_state::AppState};
use wellbeing::config::loader::ConfigLoader;
use wellbeing::observability::{AppMetrics, init_tracing};
use wellbeing::security::auth::{JwtAuth, JwtTokenGenerator};
use wellbeing::storage::StorageFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    // `wellbeing token <user_id>` 签发一个开发用 token 后退出
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("token") {
        let user_id = args.get(2).context("usage: wellbeing token <user_id>")?;
        let token = JwtTokenGenerator::from_config(&config.security).generate_token(user_id)?;
        println!("{token}");
        return Ok(());
    }

    let _log_guard = init_tracing(&config.logging)?;
    info!(
        environment = %config.environment,
        backend = %config.database.db_type,
        "Starting {}...",
        config.app_name
    );

    let storage = StorageFactory::create(&config.database).await?;
    info!("Storage initialized: {:?}", storage);

    let metrics = Arc::new(AppMetrics::new()?);
    let app_state = AppState::new(
        &storage,
        Arc::new(JwtAuth::from_config(&config.security)),
        metrics,
    );

    let report = app_state.catalog_service.seed().await?;
    info!(
        "Catalog ready ({} therapists, {} suggestions added)",
        report.therapists_inserted, report.suggestions_inserted
    );

    let router = api::create_router(app_state, &config);
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);
    info!("API router created with observability endpoints");

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
