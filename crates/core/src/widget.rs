//! Widget entity and request payloads shared by server and client.
//!
//! All wire types serialize with camelCase keys to match the HTTP API
//! (`userId`, `widgetType`, `isEnabled`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of a widget title.
pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// WidgetType
// ---------------------------------------------------------------------------

/// The fixed set of dashboard widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Financial,
    TeamPerformance,
    RecentActivities,
    SalesFunnel,
    ToolMetrics,
}

impl WidgetType {
    /// Every widget type in declared order.
    pub const ALL: [WidgetType; 5] = [
        WidgetType::Financial,
        WidgetType::TeamPerformance,
        WidgetType::RecentActivities,
        WidgetType::SalesFunnel,
        WidgetType::ToolMetrics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Financial => "financial",
            WidgetType::TeamPerformance => "team_performance",
            WidgetType::RecentActivities => "recent_activities",
            WidgetType::SalesFunnel => "sales_funnel",
            WidgetType::ToolMetrics => "tool_metrics",
        }
    }
}

impl FromStr for WidgetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown widget type '{s}'")))
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted dashboard widget as seen over the wire.
///
/// `widget_type` is kept as a raw string so rows written by an older
/// registry (a type that no longer exists) still deserialize; callers use
/// [`Widget::kind`] to resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: DbId,
    pub user_id: DbId,
    pub widget_type: String,
    pub title: String,
    pub is_enabled: bool,
    pub position: i32,
    #[serde(default)]
    pub config: serde_json::Value,
    pub created_at: Timestamp,
}

impl Widget {
    /// The registry type of this widget, or `None` for a stale/unknown type.
    pub fn kind(&self) -> Option<WidgetType> {
        self.widget_type.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of `POST /api/widgets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWidget {
    pub user_id: DbId,
    pub widget_type: String,
    /// Defaults to the registry title when absent or blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    pub position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

/// Body of `PUT /api/widgets/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl WidgetPatch {
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn enabled(is_enabled: bool) -> Self {
        Self {
            is_enabled: Some(is_enabled),
            ..Self::default()
        }
    }

    pub fn config(config: serde_json::Value) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.is_enabled.is_none()
            && self.position.is_none()
            && self.config.is_none()
    }
}

/// A single `{id, position}` assignment produced by a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: DbId,
    pub position: i32,
}

/// Body of `PUT /api/widgets/positions` (batched, transactional reorder).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub user_id: DbId,
    pub positions: Vec<PositionUpdate>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a position is non-negative.
pub fn validate_position(position: i32) -> Result<(), CoreError> {
    if position < 0 {
        return Err(CoreError::Validation(format!(
            "position must be non-negative, got {position}"
        )));
    }
    Ok(())
}

/// Validate a user-supplied title. Blank titles are rejected.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be blank".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}
