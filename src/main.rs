use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use server_registry::adapters::clock::SystemClock;
use server_registry::config::{apply_env_overrides, load_config};
use server_registry::http::server::{AppState, build_router, serve};
use server_registry::ports::clock::Clock;
use server_registry::registry::evictor::Evictor;
use server_registry::registry::snapshot_cache::SnapshotCache;
use server_registry::registry::store::Registry;

fn find_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SERVER_REGISTRY_CONFIG") {
        return PathBuf::from(path);
    }

    // Check common locations for config file
    let candidates = [
        PathBuf::from("config.yaml"),
        binary_dir().join("config.yaml"),
    ];

    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn binary_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting server-registry");

    // Load configuration
    let config_path = find_config_path();
    let config = load_config(&config_path)?;
    let config = apply_env_overrides(config, |name| std::env::var(name).ok())?;
    config.validate()?;

    // Build core components
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(Registry::new(clock));
    let snapshots = Arc::new(SnapshotCache::new(
        Arc::clone(&registry),
        config.registry.snapshot_refresh(),
    ));
    let evictor = Evictor::new(
        Arc::clone(&registry),
        config.registry.stale_window(),
        config.registry.eviction_interval(),
    )
    .spawn();

    let router = build_router(AppState::new(registry, snapshots, &config.auth.api_key));

    // Public listener plus the optional internal one, same routes
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let mut listeners = JoinSet::new();
    let ports = std::iter::once(config.server.port).chain(config.server.internal_port);
    for port in ports {
        let listener = TcpListener::bind((config.server.bind.as_str(), port))
            .await
            .with_context(|| format!("failed to bind {}:{port}", config.server.bind))?;
        let mut rx = shutdown_rx.clone();
        listeners.spawn(serve(listener, router.clone(), async move {
            let _ = rx.changed().await;
        }));
    }

    tokio::select! {
        () = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
        Some(result) = listeners.join_next() => {
            tracing::error!("Listener exited early: {result:?}");
        }
    }

    let _ = shutdown_tx.send(());
    while let Some(result) = listeners.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Listener failed: {e}"),
            Err(e) => tracing::error!("Listener task panicked: {e}"),
        }
    }
    evictor.shutdown().await;

    tracing::info!("server-registry stopped");
    Ok(())
}
