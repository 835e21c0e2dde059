use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{infra::app_state::AppState, routes::create_app};

/// Binds the configured address and serves until SIGINT or SIGTERM.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config().server.bind_address();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, error = %err, "failed to bind listener");
            return Err(err).with_context(|| format!("failed to bind {addr}"));
        }
    };

    serve_listener(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_listener<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener
        .local_addr()
        .context("listener has no local address")?
        .port();
    let router = create_app(state);

    info!("==> Listening on port {port}. Open up http://localhost:{port}/ in your browser.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server terminated unexpectedly")?;

    info!("server stopped");
    Ok(())
}

/// Resolves on the first SIGINT (Ctrl-C) or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl-C");
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
            Err(err) => {
                warn!(error = %err, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
