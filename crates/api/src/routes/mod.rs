pub mod health;
pub mod widgets;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /widget-types                 registry metadata (GET)
///
/// /widgets                      list (?userId=), create
/// /widgets/available            types with no enabled widget (?userId=)
/// /widgets/positions            batched reorder (PUT)
/// /widgets/{id}                 get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/widget-types",
            get(handlers::widget_types::list_widget_types),
        )
        .nest("/widgets", widgets::router())
}
