//! Static widget registry.
//!
//! Maps each [`WidgetType`] to its presentation metadata and the function
//! that turns the widget's settings into panel content. The table is
//! fixed at compile time and listed in declared order.

use serde::Serialize;

use crate::settings::WidgetSettings;
use crate::widget::WidgetType;

/// Default reporting period for financial panels.
const DEFAULT_PERIOD: &str = "month";
/// Default currency for financial panels.
const DEFAULT_CURRENCY: &str = "USD";
/// Default ranking metric for team panels.
const DEFAULT_TEAM_METRIC: &str = "deals_closed";
/// Default number of feed entries.
const DEFAULT_ACTIVITY_LIMIT: u32 = 10;
/// Funnel stages shown when none are configured.
const DEFAULT_FUNNEL_STAGES: &[&str] = &["lead", "qualified", "proposal", "negotiation", "won"];

/// Content of a rendered panel, with display defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelBody {
    Financial {
        currency: String,
        period: String,
    },
    TeamPerformance {
        team: Option<String>,
        metric: String,
    },
    ActivityFeed {
        limit: u32,
        sources: Vec<String>,
    },
    Funnel {
        pipeline: Option<String>,
        stages: Vec<String>,
    },
    ToolMetrics {
        integration: Option<String>,
        metrics: Vec<String>,
    },
}

/// Registry entry for one widget type.
pub struct WidgetDefinition {
    pub widget_type: WidgetType,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub render: fn(&WidgetSettings) -> PanelBody,
}

/// Serializable registry metadata (everything except the render function).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetTypeInfo {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl std::fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("widget_type", &self.widget_type)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl WidgetDefinition {
    pub fn info(&self) -> WidgetTypeInfo {
        WidgetTypeInfo {
            widget_type: self.widget_type,
            title: self.title,
            description: self.description,
            icon: self.icon,
            color: self.color,
        }
    }
}

static REGISTRY: [WidgetDefinition; 5] = [
    WidgetDefinition {
        widget_type: WidgetType::Financial,
        title: "Financial Overview",
        description: "Revenue, expenses and profit for the selected period",
        icon: "dollar-sign",
        color: "emerald",
        render: render_financial,
    },
    WidgetDefinition {
        widget_type: WidgetType::TeamPerformance,
        title: "Team Performance",
        description: "Ranking of team members by a chosen sales metric",
        icon: "users",
        color: "blue",
        render: render_team_performance,
    },
    WidgetDefinition {
        widget_type: WidgetType::RecentActivities,
        title: "Recent Activities",
        description: "Latest events synced from connected tools",
        icon: "activity",
        color: "amber",
        render: render_recent_activities,
    },
    WidgetDefinition {
        widget_type: WidgetType::SalesFunnel,
        title: "Sales Funnel",
        description: "Deal counts and conversion across pipeline stages",
        icon: "filter",
        color: "violet",
        render: render_sales_funnel,
    },
    WidgetDefinition {
        widget_type: WidgetType::ToolMetrics,
        title: "Tool Metrics",
        description: "Usage metrics reported by connected integrations",
        icon: "bar-chart",
        color: "slate",
        render: render_tool_metrics,
    },
];

/// Look up a widget type by its wire name. Unknown names yield `None`.
pub fn resolve(widget_type: &str) -> Option<&'static WidgetDefinition> {
    REGISTRY
        .iter()
        .find(|d| d.widget_type.as_str() == widget_type)
}

/// The registry entry for a known widget type.
pub fn definition(widget_type: WidgetType) -> &'static WidgetDefinition {
    REGISTRY
        .iter()
        .find(|d| d.widget_type == widget_type)
        .unwrap_or_else(|| unreachable!("registry covers every WidgetType"))
}

/// All registry entries in declared order.
pub fn list_all() -> &'static [WidgetDefinition] {
    &REGISTRY
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

fn render_financial(settings: &WidgetSettings) -> PanelBody {
    let (currency, period) = match settings {
        WidgetSettings::Financial(s) => (s.currency.clone(), s.period.clone()),
        _ => (None, None),
    };
    PanelBody::Financial {
        currency: currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        period: period.unwrap_or_else(|| DEFAULT_PERIOD.to_string()),
    }
}

fn render_team_performance(settings: &WidgetSettings) -> PanelBody {
    let (team, metric) = match settings {
        WidgetSettings::TeamPerformance(s) => (s.team.clone(), s.metric.clone()),
        _ => (None, None),
    };
    PanelBody::TeamPerformance {
        team,
        metric: metric.unwrap_or_else(|| DEFAULT_TEAM_METRIC.to_string()),
    }
}

fn render_recent_activities(settings: &WidgetSettings) -> PanelBody {
    let (limit, sources) = match settings {
        WidgetSettings::RecentActivities(s) => (s.limit, s.sources.clone()),
        _ => (None, Vec::new()),
    };
    PanelBody::ActivityFeed {
        limit: limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT),
        sources,
    }
}

fn render_sales_funnel(settings: &WidgetSettings) -> PanelBody {
    let (pipeline, stages) = match settings {
        WidgetSettings::SalesFunnel(s) => (s.pipeline.clone(), s.stages.clone()),
        _ => (None, Vec::new()),
    };
    let stages = if stages.is_empty() {
        DEFAULT_FUNNEL_STAGES.iter().map(|s| s.to_string()).collect()
    } else {
        stages
    };
    PanelBody::Funnel { pipeline, stages }
}

fn render_tool_metrics(settings: &WidgetSettings) -> PanelBody {
    match settings {
        WidgetSettings::ToolMetrics(s) => PanelBody::ToolMetrics {
            integration: s.integration.clone(),
            metrics: s.metrics.clone(),
        },
        _ => PanelBody::ToolMetrics {
            integration: None,
            metrics: Vec::new(),
        },
    }
}
