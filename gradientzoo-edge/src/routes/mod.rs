use axum::{
    Router,
    routing::{MethodRouter, get_service},
};
use tower_http::{
    compression::CompressionLayer, services::ServeDir, trace::TraceLayer,
};

use crate::{
    handlers::spa_shell, infra::app_state::AppState,
    infra::middleware::BasicAuthLayer, proxy,
};

pub const STATIC_PREFIX: &str = "/static";

/// Builds the request pipeline.
///
/// `GET`/`HEAD` under `/static` and every method under `/api` are answered
/// before authentication. Anything else, including other methods under
/// `/static`, goes through basic auth to the application shell.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let shell = Router::new()
        .fallback(spa_shell)
        .layer(BasicAuthLayer::new(&config.auth))
        .with_state(state.clone());

    let static_files: MethodRouter =
        get_service(ServeDir::new(config.static_dir()))
            .fallback_service(shell.clone());

    Router::new()
        .nest_service(STATIC_PREFIX, static_files)
        .merge(proxy::api_routes())
        .fallback_service(shell)
        // Outer to inner: compression, then tracing.
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
