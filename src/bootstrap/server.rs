//! Process wiring: producer, HTTP listener and shutdown.

use crate::{config::BaseConfig, service::ValuesService, transport};
use anyhow::Context as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Run the token server until `shutdown` is cancelled.
///
/// Starts the producer, serves `GET /api/hash` on the configured address and,
/// once `shutdown` fires, drains in-flight requests and waits for the
/// producer to exit.
pub async fn run(config: BaseConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let values_config = config
        .values_config()
        .context("invalid token pipeline configuration")?;
    let service = ValuesService::new(values_config)?;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;

    let mut producer = service.start(shutdown.clone())?;
    let app = transport::router(service, &config.transport_config());

    tracing::info!(%local_addr, "listening");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone().cancelled_owned())
    .await;

    // Covers the case where the server failed before shutdown was requested.
    shutdown.cancel();
    producer.stop().await;
    tracing::info!("server stopped");

    served.context("HTTP server failed")
}

/// Cancel `shutdown` on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = shutdown.cancelled() => return,
    }

    tracing::info!("shutdown signal received");
    shutdown.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn local_config(vars: &'static [(&'static str, &'static str)]) -> BaseConfig {
        BaseConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let config = local_config(&[("HOST", "127.0.0.1"), ("PORT", "0")]);
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(run(config, shutdown.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let config = local_config(&[("HOST", "127.0.0.1"), ("PORT", "0"), ("TOKEN_LENGTH", "0")]);
        let err = run(config, CancellationToken::new()).await.unwrap_err();
        assert!(err.to_string().contains("invalid token pipeline configuration"));
    }

    #[tokio::test]
    async fn test_signal_listener_returns_when_cancelled() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), shutdown_on_signal(shutdown))
            .await
            .unwrap();
    }
}
