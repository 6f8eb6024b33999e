use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use gallery_core::ImageTranscoder;
use gallery_server::config::{Config, load_dotenv};
use gallery_server::storage::build_object_store;
use gallery_server::{AppState, create_router};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG も .env から指定できるよう、ログ初期化より先に読む
    let dotenv = load_dotenv().context("failed to load .env")?;
    init_tracing();
    if let Some(path) = dotenv {
        tracing::info!(path = %path.display(), "loaded .env");
    }

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    let store = build_object_store(&config);
    let state = AppState::new(
        Arc::new(store),
        Arc::new(ImageTranscoder::default()),
        config.settings(),
    );
    let app = create_router(state, config.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, bucket = %config.bucket, "server is running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("gallery_server=info,gallery_core=info,tower_http=info")
        }))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("received termination signal, shutting down");
}
