//! Response bodies for the widget endpoints.
//!
//! The widget API returns bare entities for single-item endpoints and a
//! named collection key for lists (`{ "widgets": [...] }`), which is the
//! shape the dashboard client reads.

use insight_core::registry::WidgetTypeInfo;
use insight_db::models::widget::Widget;
use serde::Serialize;

/// `{ "widgets": [...] }`
#[derive(Debug, Serialize)]
pub struct WidgetListResponse {
    pub widgets: Vec<Widget>,
}

/// `{ "widgetTypes": [...] }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTypesResponse {
    pub widget_types: Vec<WidgetTypeInfo>,
}

/// `{ "success": bool }` returned by delete.
///
/// `success` is `false` when there was nothing to delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
