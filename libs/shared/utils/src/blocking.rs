use tracing::error;

use shared_models::error::AppError;

/// Runs synchronous store work on tokio's blocking pool.
pub async fn run_blocking<F, T, E>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(Into::into),
        Err(join_err) => {
            error!("Blocking task failed: {}", join_err);
            Err(AppError::Internal(format!("background task failed: {}", join_err)))
        }
    }
}
