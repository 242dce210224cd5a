//! Widget Service: dashboard actions over the widget API.
//!
//! Every mutating action follows the same contract:
//! - the server is called first; nothing is changed locally beforehand
//! - on success the owning user's cached widget list is invalidated
//! - the outcome is reported through the [`Notifier`], exactly one error
//!   notification per failed action

use std::sync::Arc;

use futures::future::join_all;
use insight_core::layout::{self, DashboardView};
use insight_core::registry::{self, WidgetTypeInfo};
use insight_core::reorder::{move_item, position_updates, DragIntent};
use insight_core::settings::validate_config;
use insight_core::types::DbId;
use insight_core::widget::{NewWidget, ReorderRequest, Widget, WidgetPatch, WidgetType};

use crate::cache::{CacheKey, WidgetCache};
use crate::config::{ClientConfig, ReorderMode};
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};
use crate::transport::{HttpWidgetApi, WidgetApi};

/// Rendered dashboard plus the sidebar of widgets that can still be added.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub view: DashboardView,
    pub available: Vec<WidgetTypeInfo>,
}

/// What a drag intent turned into once persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Added(Widget),
    /// Number of position writes sent.
    Reordered(usize),
}

pub struct WidgetService {
    api: Arc<dyn WidgetApi>,
    cache: WidgetCache,
    notifier: Arc<dyn Notifier>,
    reorder_mode: ReorderMode,
}

impl WidgetService {
    pub fn new(api: Arc<dyn WidgetApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            cache: WidgetCache::new(),
            notifier,
            reorder_mode: ReorderMode::default(),
        }
    }

    pub fn with_reorder_mode(mut self, reorder_mode: ReorderMode) -> Self {
        self.reorder_mode = reorder_mode;
        self
    }

    /// Service talking HTTP to `config.base_url`.
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Arc::new(HttpWidgetApi::from_config(config)), notifier)
            .with_reorder_mode(config.reorder_mode)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The user's widgets (enabled and disabled), served from cache when
    /// possible.
    pub async fn widgets(&self, user_id: DbId) -> Result<Arc<Vec<Widget>>, ClientError> {
        let key = CacheKey::WidgetList(user_id);
        if let Some(widgets) = self.cache.get(key).await {
            return Ok(widgets);
        }

        let generation = self.cache.generation(key).await;
        let widgets = self.api.list_widgets(user_id).await?;
        tracing::debug!(user_id, count = widgets.len(), "Fetched widget list");
        Ok(self.cache.store(key, generation, widgets).await)
    }

    pub async fn dashboard(&self, user_id: DbId) -> Result<Dashboard, ClientError> {
        let widgets = self.widgets(user_id).await?;
        Ok(Dashboard {
            view: layout::render_dashboard(&widgets),
            available: layout::available_widgets(&widgets)
                .into_iter()
                .map(|d| d.info())
                .collect(),
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a widget of `widget_type` after the user's enabled widgets.
    pub async fn add_widget(
        &self,
        user_id: DbId,
        widget_type: WidgetType,
    ) -> Result<Widget, ClientError> {
        let result = async {
            let current = self.widgets(user_id).await?;
            let input = NewWidget {
                user_id,
                widget_type: widget_type.as_str().to_string(),
                title: Some(registry::definition(widget_type).title.to_string()),
                is_enabled: true,
                position: layout::next_position(&current),
                config: None,
            };
            let widget = self.api.create_widget(&input).await?;
            self.invalidate(user_id).await;
            Ok::<_, ClientError>(widget)
        }
        .await;

        self.report(result, "Could not add widget", |w| {
            Some(Notification::success(
                "Widget added",
                format!("{} was added to your dashboard", w.title),
            ))
        })
    }

    /// Delete a widget. Deleting one that no longer exists is not an error
    /// and is not announced.
    pub async fn remove_widget(&self, widget: &Widget) -> Result<bool, ClientError> {
        let result = match self.api.delete_widget(widget.id).await {
            Ok(existed) => Ok(existed),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        };
        if result.is_ok() {
            self.invalidate(widget.user_id).await;
        }
        if let Ok(false) = result {
            tracing::debug!(widget_id = widget.id, "Widget was already gone");
        }

        self.report(result, "Could not remove widget", |&existed| {
            existed.then(|| {
                Notification::success(
                    "Widget removed",
                    format!("{} was removed from your dashboard", widget.title),
                )
            })
        })
    }

    /// Show or hide a widget. Its position is left as is.
    pub async fn set_enabled(&self, widget: &Widget, enabled: bool) -> Result<Widget, ClientError> {
        let result = self.update(widget, &WidgetPatch::enabled(enabled)).await;
        self.report(result, "Could not update widget", |_| None)
    }

    /// Replace a widget's settings document.
    ///
    /// Settings for a known widget type are checked locally before the
    /// request is sent.
    pub async fn update_config(
        &self,
        widget: &Widget,
        config: serde_json::Value,
    ) -> Result<Widget, ClientError> {
        let checked = widget.kind().map(|t| validate_config(t, &config));
        let result = match checked {
            Some(Err(e)) => Err(ClientError::Validation(e.to_string())),
            _ => self.update(widget, &WidgetPatch::config(config)).await,
        };

        self.report(result, "Could not save widget settings", |w| {
            Some(Notification::success(
                "Settings saved",
                format!("{} settings were updated", w.title),
            ))
        })
    }

    /// Persist a new display order for the user's enabled widgets.
    ///
    /// Only widgets whose index differs from their stored position are
    /// written. Returns the number of writes.
    pub async fn reorder(&self, user_id: DbId, new_order: &[Widget]) -> Result<usize, ClientError> {
        let updates = position_updates(new_order);
        if updates.is_empty() {
            return Ok(0);
        }

        let result = match self.reorder_mode {
            ReorderMode::Independent => self.reorder_independent(user_id, &updates).await,
            ReorderMode::Batched => {
                let request = ReorderRequest {
                    user_id,
                    positions: updates,
                };
                let result = self.api.set_positions(&request).await;
                if result.is_ok() {
                    self.invalidate(user_id).await;
                }
                result.map(|_| request.positions.len())
            }
        };

        if let Ok(count) = result {
            tracing::debug!(user_id, count, mode = ?self.reorder_mode, "Widget order saved");
        }
        self.report(result, "Could not save widget order", |_| None)
    }

    /// Execute a drag intent produced by the drag controller.
    ///
    /// `current` is the widget list the gesture was made against and move
    /// indices are into its rendered panels; a move whose source index no
    /// longer holds the dragged widget is rejected.
    pub async fn apply_intent(
        &self,
        user_id: DbId,
        intent: DragIntent,
        current: &[Widget],
    ) -> Result<IntentOutcome, ClientError> {
        match intent {
            DragIntent::Add(widget_type) => self
                .add_widget(user_id, widget_type)
                .await
                .map(IntentOutcome::Added),
            DragIntent::Move {
                widget_id,
                from,
                to,
            } => {
                // Indices refer to the rendered panels, which leave out
                // widgets of unknown type. Those keep their relative order
                // after the visible ones.
                let (mut order, hidden): (Vec<Widget>, Vec<Widget>) =
                    layout::ordered_enabled(current)
                        .into_iter()
                        .cloned()
                        .partition(|w| registry::resolve(&w.widget_type).is_some());
                if order.get(from).map(|w| w.id) != Some(widget_id) || to >= order.len() {
                    let err = ClientError::Validation(
                        "The dashboard changed while dragging; please try again".to_string(),
                    );
                    return self.report(Err(err), "Could not save widget order", |_| None);
                }
                move_item(&mut order, from, to);
                order.extend(hidden);
                self.reorder(user_id, &order)
                    .await
                    .map(IntentOutcome::Reordered)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn update(&self, widget: &Widget, patch: &WidgetPatch) -> Result<Widget, ClientError> {
        let updated = self.api.update_widget(widget.id, patch).await?;
        self.invalidate(widget.user_id).await;
        Ok(updated)
    }

    /// N concurrent single-widget writes. Successful writes stay applied
    /// when others fail.
    async fn reorder_independent(
        &self,
        user_id: DbId,
        updates: &[insight_core::widget::PositionUpdate],
    ) -> Result<usize, ClientError> {
        let patches: Vec<(DbId, WidgetPatch)> = updates
            .iter()
            .map(|u| (u.id, WidgetPatch::position(u.position)))
            .collect();

        let results = join_all(
            patches
                .iter()
                .map(|(id, patch)| self.api.update_widget(*id, patch)),
        )
        .await;

        let mut committed = 0;
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(_) => committed += 1,
                Err(e) => errors.push(e),
            }
        }

        if committed > 0 {
            self.invalidate(user_id).await;
        }

        let failed = errors.len();
        match errors.into_iter().next() {
            None => Ok(committed),
            Some(first) if committed == 0 => Err(first),
            Some(first) => Err(ClientError::PartialReorder {
                committed,
                failed,
                first: Box::new(first),
            }),
        }
    }

    async fn invalidate(&self, user_id: DbId) {
        self.cache.invalidate(CacheKey::WidgetList(user_id)).await;
    }

    /// Emit the notification for an action's outcome and pass it through.
    fn report<T>(
        &self,
        result: Result<T, ClientError>,
        failure_title: &str,
        on_success: impl FnOnce(&T) -> Option<Notification>,
    ) -> Result<T, ClientError> {
        match &result {
            Ok(value) => {
                if let Some(notification) = on_success(value) {
                    self.notifier.notify(notification);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "{failure_title}");
                self.notifier.notify(Notification::error(failure_title, e));
            }
        }
        result
    }
}
