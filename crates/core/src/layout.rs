//! Dashboard renderer.
//!
//! Pure functions from a user's widget list to the ordered set of panels
//! shown on the dashboard, plus the "available widgets" sidebar.

use std::collections::HashSet;

use serde::Serialize;

use crate::registry::{self, PanelBody, WidgetDefinition};
use crate::settings::WidgetSettings;
use crate::types::DbId;
use crate::widget::{Widget, WidgetType};

/// Message shown when the dashboard has nothing to display.
pub const EMPTY_DASHBOARD_CTA: &str = "Your dashboard is empty. Add a widget to get started.";

/// One rendered dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub widget_id: DbId,
    pub widget_type: WidgetType,
    pub title: String,
    pub icon: &'static str,
    pub color: &'static str,
    pub position: i32,
    pub body: PanelBody,
}

/// The rendered dashboard: either a call-to-action or an ordered grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    Empty { call_to_action: &'static str },
    Panels { panels: Vec<PanelView> },
}

impl DashboardView {
    pub fn panels(&self) -> &[PanelView] {
        match self {
            DashboardView::Empty { .. } => &[],
            DashboardView::Panels { panels } => panels,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DashboardView::Empty { .. })
    }
}

/// Enabled widgets in display order.
///
/// Sorting is stable: widgets sharing a position keep their input order.
pub fn ordered_enabled(widgets: &[Widget]) -> Vec<&Widget> {
    let mut enabled: Vec<&Widget> = widgets.iter().filter(|w| w.is_enabled).collect();
    enabled.sort_by_key(|w| w.position);
    enabled
}

/// Position assigned to a newly added widget: the current enabled count.
pub fn next_position(widgets: &[Widget]) -> i32 {
    widgets.iter().filter(|w| w.is_enabled).count() as i32
}

/// Render the dashboard for a user's widget list.
///
/// Widgets whose type is not in the registry are skipped with a warning.
/// A widget whose stored config no longer parses is rendered with default
/// settings.
pub fn render_dashboard(widgets: &[Widget]) -> DashboardView {
    let mut panels = Vec::new();

    for widget in ordered_enabled(widgets) {
        let Some(definition) = registry::resolve(&widget.widget_type) else {
            tracing::warn!(
                widget_id = widget.id,
                widget_type = %widget.widget_type,
                "Skipping widget with unknown type",
            );
            continue;
        };

        let settings = WidgetSettings::parse(definition.widget_type, &widget.config)
            .unwrap_or_else(|e| {
                tracing::warn!(
                    widget_id = widget.id,
                    error = %e,
                    "Stored widget config is invalid, rendering defaults",
                );
                WidgetSettings::default_for(definition.widget_type)
            });

        panels.push(PanelView {
            widget_id: widget.id,
            widget_type: definition.widget_type,
            title: widget.title.clone(),
            icon: definition.icon,
            color: definition.color,
            position: widget.position,
            body: (definition.render)(&settings),
        });
    }

    if panels.is_empty() {
        DashboardView::Empty {
            call_to_action: EMPTY_DASHBOARD_CTA,
        }
    } else {
        DashboardView::Panels { panels }
    }
}

/// Registry entries the user can still add: types with no enabled widget.
///
/// A disabled widget of a type does not hide that type.
pub fn available_widgets(widgets: &[Widget]) -> Vec<&'static WidgetDefinition> {
    let enabled: HashSet<&str> = widgets
        .iter()
        .filter(|w| w.is_enabled)
        .map(|w| w.widget_type.as_str())
        .collect();

    registry::list_all()
        .iter()
        .filter(|d| !enabled.contains(d.widget_type.as_str()))
        .collect()
}
