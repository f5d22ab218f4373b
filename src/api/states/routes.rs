use crate::api::models::AppState;
use crate::api::states::handlers::{get_state_handler, list_states_handler, state_stats_handler};
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/states", get(list_states_handler))
        .route("/states/{state_id}", get(get_state_handler))
        .route("/states/{state_id}/stats", get(state_stats_handler))
}
