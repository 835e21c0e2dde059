use axum::{extract::State, response::Html};
use tracing::warn;

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// Answers any method and path with the application shell.
///
/// The file is read on every request so a redeployed bundle is picked up
/// without a restart.
pub async fn spa_shell(State(state): State<AppState>) -> AppResult<Html<Vec<u8>>> {
    let path = state.config().index_file();
    match tokio::fs::read(path).await {
        Ok(contents) => Ok(Html(contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "application shell is missing");
            Err(AppError::not_found("Not Found"))
        }
        Err(err) => Err(err.into()),
    }
}
