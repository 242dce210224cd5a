//! Route definitions for dashboard widgets, mounted at `/widgets`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// ```text
/// GET    /            -> list_widgets
/// POST   /            -> create_widget
/// GET    /available   -> list_available
/// PUT    /positions   -> set_positions
/// GET    /{id}        -> get_widget
/// PUT    /{id}        -> update_widget
/// DELETE /{id}        -> delete_widget
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(widgets::list_widgets).post(widgets::create_widget))
        .route("/available", get(widgets::list_available))
        .route("/positions", put(widgets::set_positions))
        .route(
            "/{id}",
            get(widgets::get_widget)
                .put(widgets::update_widget)
                .delete(widgets::delete_widget),
        )
}
