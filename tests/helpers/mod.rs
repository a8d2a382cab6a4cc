#![allow(dead_code)] // Test helpers appear unused when compiled independently

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use server_registry::adapters::clock::ManualClock;
use server_registry::http::server::{AppState, build_router, serve};
use server_registry::registry::snapshot_cache::SnapshotCache;
use server_registry::registry::store::Registry;

pub const API_KEY: &str = "test-api-key";
pub const STALE_WINDOW: Duration = Duration::from_secs(20 * 60);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(25);

pub fn fixed_start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Registry and cache driven by a manual clock.
pub struct Core {
    pub clock: Arc<ManualClock>,
    pub registry: Arc<Registry>,
    pub cache: Arc<SnapshotCache>,
}

pub fn core() -> Core {
    let clock = Arc::new(ManualClock::new(fixed_start()));
    let registry = Arc::new(Registry::new(clock.clone()));
    let cache = Arc::new(SnapshotCache::new(Arc::clone(&registry), REFRESH_INTERVAL));
    Core {
        clock,
        registry,
        cache,
    }
}

/// A running server on a loopback port.
pub struct TestApp {
    pub base_url: String,
    pub core: Core,
    pub http: reqwest::Client,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestApp {
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn authed(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("x-api-key", API_KEY)
    }
}

pub async fn spawn_app() -> TestApp {
    let core = core();
    let state = AppState::new(
        Arc::clone(&core.registry),
        Arc::clone(&core.cache),
        API_KEY,
    );
    let router = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(err) = serve(listener, router, shutdown).await {
            eprintln!("test server error: {err}");
        }
    });

    TestApp {
        base_url: format!("http://{addr}"),
        core,
        http: reqwest::Client::new(),
        shutdown_tx,
        handle,
    }
}
