use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::handlers::FileStore;
use crate::http::connection::Connection;
use crate::router::Router;

/// Binds the configured address and serves until the task is dropped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let files = FileStore::open(&cfg.directory)
        .await
        .with_context(|| format!("opening file root {}", cfg.directory.display()))?;
    info!("Serving files from {}", files.root().display());

    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, Arc::new(Router::new(files)), cfg.workers).await
}

/// Accept loop over an already-bound listener.
///
/// At most `workers` connections are served at once. A permit is taken
/// before `accept`, so further clients wait in the kernel backlog until a
/// connection finishes.
pub async fn serve(listener: TcpListener, router: Arc<Router>, workers: usize) -> anyhow::Result<()> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));

    loop {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("worker pool closed")?;

        let (socket, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = router.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let mut conn = Connection::new(socket, router);
            if let Err(e) = conn.run().await {
                error!(peer = %peer, error = ?e, "Connection error");
            }
            debug!(peer = %peer, "Connection closed");
        });
    }
}
