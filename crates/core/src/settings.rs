//! Per-widget-type settings documents.
//!
//! A widget's `config` column is an open JSON object. Each widget type
//! reads a handful of known keys; everything else is carried through
//! untouched in `extra`. Known keys with the wrong JSON type are a
//! validation error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::widget::WidgetType;

/// Bounds for `recent_activities.limit`.
pub const MIN_ACTIVITY_LIMIT: u32 = 1;
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSettings {
    pub currency: Option<String>,
    pub period: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformanceSettings {
    pub team: Option<String>,
    pub metric: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentActivitiesSettings {
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFunnelSettings {
    pub pipeline: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stages: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolMetricsSettings {
    pub integration: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metrics: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Typed view of a widget's `config`, one variant per widget type.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSettings {
    Financial(FinancialSettings),
    TeamPerformance(TeamPerformanceSettings),
    RecentActivities(RecentActivitiesSettings),
    SalesFunnel(SalesFunnelSettings),
    ToolMetrics(ToolMetricsSettings),
}

impl WidgetSettings {
    /// Parse `config` as the settings document for `widget_type`.
    ///
    /// `null` is treated as an empty object. Any other non-object value
    /// is rejected.
    pub fn parse(widget_type: WidgetType, config: &Value) -> Result<Self, CoreError> {
        let settings = match widget_type {
            WidgetType::Financial => WidgetSettings::Financial(parse_doc(widget_type, config)?),
            WidgetType::TeamPerformance => {
                WidgetSettings::TeamPerformance(parse_doc(widget_type, config)?)
            }
            WidgetType::RecentActivities => {
                let doc: RecentActivitiesSettings = parse_doc(widget_type, config)?;
                if let Some(limit) = doc.limit {
                    if !(MIN_ACTIVITY_LIMIT..=MAX_ACTIVITY_LIMIT).contains(&limit) {
                        return Err(CoreError::Validation(format!(
                            "recent_activities limit must be between \
                             {MIN_ACTIVITY_LIMIT} and {MAX_ACTIVITY_LIMIT}, got {limit}"
                        )));
                    }
                }
                WidgetSettings::RecentActivities(doc)
            }
            WidgetType::SalesFunnel => WidgetSettings::SalesFunnel(parse_doc(widget_type, config)?),
            WidgetType::ToolMetrics => WidgetSettings::ToolMetrics(parse_doc(widget_type, config)?),
        };
        Ok(settings)
    }

    /// Default settings for a type (equivalent to parsing `{}`).
    pub fn default_for(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Financial => WidgetSettings::Financial(Default::default()),
            WidgetType::TeamPerformance => WidgetSettings::TeamPerformance(Default::default()),
            WidgetType::RecentActivities => WidgetSettings::RecentActivities(Default::default()),
            WidgetType::SalesFunnel => WidgetSettings::SalesFunnel(Default::default()),
            WidgetType::ToolMetrics => WidgetSettings::ToolMetrics(Default::default()),
        }
    }
}

/// Validate a `config` payload before it is persisted.
pub fn validate_config(widget_type: WidgetType, config: &Value) -> Result<(), CoreError> {
    if !config.is_object() {
        return Err(CoreError::Validation(
            "config must be a JSON object".to_string(),
        ));
    }
    WidgetSettings::parse(widget_type, config).map(|_| ())
}

/// Treat an explicit `null` list the same as a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn parse_doc<T: DeserializeOwned + Default>(
    widget_type: WidgetType,
    config: &Value,
) -> Result<T, CoreError> {
    match config {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(config.clone()).map_err(|e| {
            CoreError::Validation(format!("Invalid {widget_type} config: {e}"))
        }),
        _ => Err(CoreError::Validation(
            "config must be a JSON object".to_string(),
        )),
    }
}
