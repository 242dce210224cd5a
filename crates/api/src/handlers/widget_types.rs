//! Handler for the static widget registry.

use axum::response::IntoResponse;
use axum::Json;
use insight_core::registry;

use crate::error::AppResult;
use crate::response::WidgetTypesResponse;

/// GET /api/widget-types
///
/// Every registered widget type in declared order.
pub async fn list_widget_types() -> AppResult<impl IntoResponse> {
    let widget_types = registry::list_all().iter().map(|d| d.info()).collect();

    Ok(Json(WidgetTypesResponse { widget_types }))
}
