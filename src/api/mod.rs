pub mod districts;
pub mod models;
pub mod states;

#[cfg(test)]
mod tests;

// Re-exports
pub use models::*;

use axum::{Json, Router, extract::State, routing::get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, AppError> {
    let total_states = state.store.count_states().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_states,
    }))
}

/// All routes of the service, bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(states::routes())
        .merge(districts::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The router behind trailing-slash trimming, so `/states/` and `/states/21/`
/// reach the same handlers as `/states` and `/states/21`.
///
/// Trimming has to run before routing, which is why it wraps the router
/// instead of being one of its layers.
pub type App = NormalizePath<Router>;

pub fn app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
