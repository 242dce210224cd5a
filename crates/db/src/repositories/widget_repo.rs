//! Repository for the `widgets` table.
//!
//! Each call is an independent statement except [`WidgetRepo::set_positions`],
//! which applies a whole reorder inside one transaction.

use insight_core::types::DbId;
use insight_core::widget::{PositionUpdate, WidgetPatch};
use sqlx::PgPool;

use crate::models::widget::{CreateWidget, Widget};

/// Column list for `widgets` queries.
const COLUMNS: &str =
    "id, user_id, widget_type, title, is_enabled, position, config, created_at";

/// Provides CRUD operations for per-user dashboard widgets.
pub struct WidgetRepo;

impl WidgetRepo {
    /// List every widget (enabled and disabled) for a user.
    ///
    /// Ordered by `position`, then `id` so ties come back in insertion order.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Widget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM widgets WHERE user_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single widget by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Widget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM widgets WHERE id = $1");
        sqlx::query_as::<_, Widget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new widget, returning the created row.
    ///
    /// Fails with a unique violation on `uq_widgets_user_type_enabled` if the
    /// user already has an enabled widget of the same type.
    pub async fn create(pool: &PgPool, input: &CreateWidget) -> Result<Widget, sqlx::Error> {
        let query = format!(
            "INSERT INTO widgets (user_id, widget_type, title, is_enabled, position, config) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(input.user_id)
            .bind(input.widget_type.as_str())
            .bind(&input.title)
            .bind(input.is_enabled)
            .bind(input.position)
            .bind(&input.config)
            .fetch_one(pool)
            .await
    }

    /// Partially update a widget.
    ///
    /// Uses `COALESCE` so only provided fields are changed. `config` is
    /// replaced as a whole when present. Returns `None` if no row matched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &WidgetPatch,
    ) -> Result<Option<Widget>, sqlx::Error> {
        let query = format!(
            "UPDATE widgets SET \
                 title      = COALESCE($2, title), \
                 is_enabled = COALESCE($3, is_enabled), \
                 position   = COALESCE($4, position), \
                 config     = COALESCE($5, config) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(patch.is_enabled)
            .bind(patch.position)
            .bind(&patch.config)
            .fetch_optional(pool)
            .await
    }

    /// Delete a widget by ID.
    ///
    /// Returns `true` if a row was deleted. Deleting a missing ID is not an
    /// error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM widgets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Owning user of each listed widget that exists, as `(id, user_id)`.
    pub async fn find_owners(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, DbId)>, sqlx::Error> {
        sqlx::query_as("SELECT id, user_id FROM widgets WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Apply a batch of position assignments for one user atomically.
    ///
    /// Every id must belong to `user_id`; otherwise the transaction is
    /// rolled back and `sqlx::Error::RowNotFound` is returned.
    pub async fn set_positions(
        pool: &PgPool,
        user_id: DbId,
        positions: &[PositionUpdate],
    ) -> Result<Vec<Widget>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(positions.len());

        let query = format!(
            "UPDATE widgets SET position = $2 \
             WHERE id = $1 AND user_id = $3 \
             RETURNING {COLUMNS}"
        );

        for update in positions {
            let row = sqlx::query_as::<_, Widget>(&query)
                .bind(update.id)
                .bind(update.position)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }
}
