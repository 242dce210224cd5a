//! Widget entity model and DTOs.

use insight_core::types::{DbId, Timestamp};
use insight_core::widget::WidgetType;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `widgets` table.
///
/// Serializes to the same camelCase shape the client reads as
/// [`insight_core::widget::Widget`].
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: DbId,
    pub user_id: DbId,
    pub widget_type: String,
    pub title: String,
    pub is_enabled: bool,
    pub position: i32,
    pub config: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<Widget> for insight_core::widget::Widget {
    fn from(row: Widget) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            widget_type: row.widget_type,
            title: row.title,
            is_enabled: row.is_enabled,
            position: row.position,
            config: row.config,
            created_at: row.created_at,
        }
    }
}

/// Validated insert for the `widgets` table.
///
/// Built by the API layer after the widget type, title and config have
/// been checked against the registry.
#[derive(Debug, Clone)]
pub struct CreateWidget {
    pub user_id: DbId,
    pub widget_type: WidgetType,
    pub title: String,
    pub is_enabled: bool,
    pub position: i32,
    pub config: serde_json::Value,
}
