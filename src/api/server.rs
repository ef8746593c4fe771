//! HTTP server lifecycle: bind, spawn, graceful shutdown.
//!
//! Pattern: bind the listener first so the caller learns the real address
//! (tests bind port 0), then serve in a background task with a oneshot
//! shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl ApiServer {
    /// Signal the server to stop accepting and drain.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the serve task to finish.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

/// Bind and start serving the API on `addr`.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ctx() -> (ApiContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("clinic.db");
        crate::db::sqlite::open_database(&db_path).unwrap();
        let media = dir.path().join("media");
        crate::media::init_media_dir(&media).unwrap();
        (ApiContext::new(db_path, media), dir)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (ctx, _guard) = test_ctx();
        let mut server = start_server(ctx, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert!(resp.status().is_success());

        server.shutdown();
    }

    #[tokio::test]
    async fn protected_route_rejects_anonymous() {
        let (ctx, _guard) = test_ctx();
        let mut server = start_server(ctx, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");

        let url = format!("http://{}/api/turns", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

        server.shutdown();
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (ctx, _guard) = test_ctx();
        let mut server = start_server(ctx, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn placeholder_avatar_is_served() {
        let (ctx, _guard) = test_ctx();
        let mut server = start_server(ctx, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");

        let url = format!("http://{}/media/avatar.svg", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert!(resp.status().is_success());
        let body = resp.text().await.unwrap();
        assert!(body.contains("<svg"));

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (ctx, _guard) = test_ctx();
        let mut server = start_server(ctx, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("server should start");
        server.shutdown();
        server.shutdown();
    }
}
