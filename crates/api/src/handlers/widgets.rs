//! Handlers for per-user dashboard widgets.
//!
//! Request validation (registry type, title, position, typed config) happens
//! here before anything reaches the repository. Uniqueness of enabled types
//! is checked up front and backed by a partial unique index.

use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use insight_core::error::CoreError;
use insight_core::layout;
use insight_core::registry;
use insight_core::settings::validate_config;
use insight_core::types::DbId;
use insight_core::widget::{
    validate_position, validate_title, NewWidget, ReorderRequest, WidgetPatch, WidgetType,
};
use insight_db::models::widget::{CreateWidget, Widget};
use insight_db::repositories::{UserRepo, WidgetRepo};

use crate::error::{AppError, AppResult};
use crate::query::UserScopeParams;
use crate::response::{DeleteResponse, WidgetListResponse, WidgetTypesResponse};
use crate::state::AppState;

/// GET /api/widgets?userId={id}
///
/// All widgets for the user, enabled and disabled, ascending by position.
pub async fn list_widgets(
    State(state): State<AppState>,
    Query(params): Query<UserScopeParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = params.require()?;
    let widgets = WidgetRepo::list_by_user(&state.pool, user_id).await?;

    Ok(Json(WidgetListResponse { widgets }))
}

/// GET /api/widgets/available?userId={id}
///
/// Registry entries the user has no enabled widget for.
pub async fn list_available(
    State(state): State<AppState>,
    Query(params): Query<UserScopeParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = params.require()?;
    let widgets: Vec<insight_core::widget::Widget> =
        WidgetRepo::list_by_user(&state.pool, user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let widget_types = layout::available_widgets(&widgets)
        .into_iter()
        .map(|d| d.info())
        .collect();

    Ok(Json(WidgetTypesResponse { widget_types }))
}

/// GET /api/widgets/{id}
pub async fn get_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let widget = find_widget(&state, widget_id).await?;

    Ok(Json(widget))
}

/// POST /api/widgets
///
/// Create a widget for a user. The title falls back to the registry title
/// and `config` to an empty object.
pub async fn create_widget(
    State(state): State<AppState>,
    Json(input): Json<NewWidget>,
) -> AppResult<impl IntoResponse> {
    let widget_type: WidgetType = input.widget_type.parse()?;
    validate_position(input.position)?;

    let title = match input.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => registry::definition(widget_type).title.to_string(),
    };
    validate_title(&title)?;

    let config = input
        .config
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    validate_config(widget_type, &config)?;

    if !UserRepo::exists(&state.pool, input.user_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "User {} does not exist",
            input.user_id
        ))));
    }

    if input.is_enabled {
        let existing = WidgetRepo::list_by_user(&state.pool, input.user_id).await?;
        if existing
            .iter()
            .any(|w| w.is_enabled && w.widget_type == widget_type.as_str())
        {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A {widget_type} widget is already enabled for user {}",
                input.user_id
            ))));
        }
    }

    let create = CreateWidget {
        user_id: input.user_id,
        widget_type,
        title,
        is_enabled: input.is_enabled,
        position: input.position,
        config,
    };
    let widget = WidgetRepo::create(&state.pool, &create).await?;

    tracing::info!(
        widget_id = widget.id,
        user_id = widget.user_id,
        widget_type = %widget.widget_type,
        position = widget.position,
        "Widget created",
    );

    Ok((StatusCode::CREATED, Json(widget)))
}

/// PUT /api/widgets/{id}
///
/// Merge the provided fields into the widget. Absent fields are untouched;
/// a provided `config` replaces the stored document.
pub async fn update_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<DbId>,
    Json(patch): Json<WidgetPatch>,
) -> AppResult<impl IntoResponse> {
    let existing = find_widget(&state, widget_id).await?;
    validate_patch(&existing, &patch)?;

    let widget = WidgetRepo::update(&state.pool, widget_id, &patch)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Widget",
            id: widget_id,
        }))?;

    tracing::info!(
        widget_id,
        user_id = widget.user_id,
        is_enabled = widget.is_enabled,
        position = widget.position,
        "Widget updated",
    );

    Ok(Json(widget))
}

/// DELETE /api/widgets/{id}
///
/// Idempotent: a missing widget yields `{ "success": false }` with 200.
pub async fn delete_widget(
    State(state): State<AppState>,
    Path(widget_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let success = WidgetRepo::delete(&state.pool, widget_id).await?;

    if success {
        tracing::info!(widget_id, "Widget deleted");
    } else {
        tracing::debug!(widget_id, "Delete of missing widget ignored");
    }

    Ok(Json(DeleteResponse { success }))
}

/// PUT /api/widgets/positions
///
/// Apply a batch of position assignments for one user atomically. An
/// unknown id answers 404 and a widget owned by another user answers 400;
/// either way nothing is written.
pub async fn set_positions(
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    let mut seen = HashSet::with_capacity(input.positions.len());
    for update in &input.positions {
        validate_position(update.position)?;
        if !seen.insert(update.id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Widget {} appears more than once",
                update.id
            ))));
        }
    }

    let ids: Vec<DbId> = input.positions.iter().map(|u| u.id).collect();
    let owners: HashMap<DbId, DbId> = WidgetRepo::find_owners(&state.pool, &ids)
        .await?
        .into_iter()
        .collect();
    for &id in &ids {
        match owners.get(&id) {
            None => {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Widget",
                    id,
                }))
            }
            Some(&owner) if owner != input.user_id => {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Widget {id} does not belong to user {}",
                    input.user_id
                ))))
            }
            Some(_) => {}
        }
    }

    // Ownership is re-checked inside the transaction; a widget deleted in
    // between surfaces as RowNotFound.
    let widgets = WidgetRepo::set_positions(&state.pool, input.user_id, &input.positions).await?;

    tracing::info!(
        user_id = input.user_id,
        count = widgets.len(),
        "Widget positions updated",
    );

    Ok(Json(WidgetListResponse { widgets }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_widget(state: &AppState, widget_id: DbId) -> AppResult<Widget> {
    WidgetRepo::find_by_id(&state.pool, widget_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Widget",
            id: widget_id,
        }))
}

/// Check a patch against the widget it applies to.
///
/// A stored widget whose type has left the registry can still be moved,
/// toggled or retitled; its config only has to be an object.
fn validate_patch(existing: &Widget, patch: &WidgetPatch) -> Result<(), CoreError> {
    if let Some(position) = patch.position {
        validate_position(position)?;
    }
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(config) = &patch.config {
        match existing.widget_type.parse::<WidgetType>() {
            Ok(widget_type) => validate_config(widget_type, config)?,
            Err(_) if config.is_object() => {}
            Err(_) => {
                return Err(CoreError::Validation(
                    "config must be a JSON object".to_string(),
                ))
            }
        }
    }
    Ok(())
}
