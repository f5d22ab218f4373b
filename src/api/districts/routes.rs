use crate::api::districts::handlers::{
    add_district_handler, delete_district_handler, district_details_handler, get_district_handler,
    update_district_handler,
};
use crate::api::models::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/districts", post(add_district_handler))
        .route(
            "/districts/{district_id}",
            get(get_district_handler)
                .put(update_district_handler)
                .delete(delete_district_handler),
        )
        .route("/districts/{district_id}/details", get(district_details_handler))
}
