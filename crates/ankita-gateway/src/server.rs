use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use ankita_core::AnswerChain;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::router::build_router;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn AnswerChain>,
    pub started_at: Instant,
    /// Report query failures with 500/502 instead of 200.
    pub error_status: bool,
}

impl AppState {
    #[must_use]
    pub fn new(chain: Arc<dyn AnswerChain>) -> Self {
        Self {
            chain,
            started_at: Instant::now(),
            error_status: false,
        }
    }

    #[must_use]
    pub fn with_error_status(mut self, enabled: bool) -> Self {
        self.error_status = enabled;
        self
    }
}

pub struct GatewayServer {
    addr: SocketAddr,
    max_body_size: usize,
    error_status: bool,
    chain: Arc<dyn AnswerChain>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        addr: SocketAddr,
        chain: Arc<dyn AnswerChain>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            addr,
            max_body_size: 1_048_576,
            error_status: false,
            chain,
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    #[must_use]
    pub fn with_error_status(mut self, enabled: bool) -> Self {
        self.error_status = enabled;
        self
    }

    /// Start serving until the shutdown channel flips to `true`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let state = AppState::new(self.chain).with_error_status(self.error_status);
        let router = build_router(state, self.max_body_size);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                tracing::info!("server shutting down");
            })
            .await
            .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::router::tests::StaticChain;

    fn chain() -> Arc<dyn AnswerChain> {
        Arc::new(StaticChain::answering("ok"))
    }

    fn loopback(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn server_builder_chain() {
        let (_stx, srx) = watch::channel(false);
        let server = GatewayServer::new(loopback(8000), chain(), srx)
            .with_max_body_size(512)
            .with_error_status(true);

        assert_eq!(server.max_body_size, 512);
        assert!(server.error_status);
        assert_eq!(server.addr, loopback(8000));
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown_signal() {
        let (stx, srx) = watch::channel(false);
        let server = GatewayServer::new(loopback(0), chain(), srx);
        let handle = tokio::spawn(server.serve());

        tokio::time::sleep(Duration::from_millis(50)).await;
        stx.send(true).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn serve_reports_bind_failure() {
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = occupied.local_addr().unwrap().port();
        let (_stx, srx) = watch::channel(false);

        let err = GatewayServer::new(loopback(port), chain(), srx)
            .serve()
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Bind(..)));
    }
}
