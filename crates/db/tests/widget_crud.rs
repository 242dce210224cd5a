//! Integration tests for the widget repository.
//!
//! Exercises the repository layer against a real database:
//! - Create / list ordering
//! - Partial updates leave absent fields untouched
//! - Idempotent delete
//! - One enabled widget per (user, type)
//! - Transactional batch reorder

use insight_core::widget::{PositionUpdate, WidgetPatch, WidgetType};
use insight_db::models::user::CreateUser;
use insight_db::models::widget::CreateWidget;
use insight_db::repositories::{UserRepo, WidgetRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_widget(user_id: i64, widget_type: WidgetType, position: i32) -> CreateWidget {
    CreateWidget {
        user_id,
        widget_type,
        title: widget_type.as_str().to_string(),
        is_enabled: true,
        position,
        config: json!({}),
    }
}

// ---------------------------------------------------------------------------
// Create / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assigns_id_and_defaults(pool: PgPool) {
    let user_id = new_user(&pool, "alice").await;
    let w = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::Financial, 0))
        .await
        .unwrap();

    assert!(w.id > 0);
    assert_eq!(w.user_id, user_id);
    assert_eq!(w.widget_type, "financial");
    assert!(w.is_enabled);
    assert_eq!(w.config, json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_by_position_then_id(pool: PgPool) {
    let user_id = new_user(&pool, "bob").await;
    let a = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::Financial, 2))
        .await
        .unwrap();
    let b = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 1))
        .await
        .unwrap();
    let c = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::ToolMetrics, 1))
        .await
        .unwrap();

    let mut disabled = new_widget(user_id, WidgetType::TeamPerformance, 0);
    disabled.is_enabled = false;
    let d = WidgetRepo::create(&pool, &disabled).await.unwrap();

    let ids: Vec<i64> = WidgetRepo::list_by_user(&pool, user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![d.id, b.id, c.id, a.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_is_scoped_to_user(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    WidgetRepo::create(&pool, &new_widget(alice, WidgetType::Financial, 0))
        .await
        .unwrap();

    assert_eq!(WidgetRepo::list_by_user(&pool, alice).await.unwrap().len(), 1);
    assert!(WidgetRepo::list_by_user(&pool, bob).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_missing_user_is_fk_violation(pool: PgPool) {
    let err = WidgetRepo::create(&pool, &new_widget(999_999, WidgetType::Financial, 0))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

// ---------------------------------------------------------------------------
// Uniqueness of enabled types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_enabled_widget_of_type_is_rejected(pool: PgPool) {
    let user_id = new_user(&pool, "carol").await;
    WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 0))
        .await
        .unwrap();

    let err = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 1))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_widgets_user_type_enabled"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_disabled_duplicates_are_allowed(pool: PgPool) {
    let user_id = new_user(&pool, "dave").await;
    let first = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 0))
        .await
        .unwrap();
    WidgetRepo::update(&pool, first.id, &WidgetPatch::enabled(false))
        .await
        .unwrap();

    // A fresh enabled instance may coexist with the disabled one.
    WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 0))
        .await
        .unwrap();

    // Re-enabling the old one now conflicts.
    let err = WidgetRepo::update(&pool, first.id, &WidgetPatch::enabled(true))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23505")
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update_leaves_other_fields(pool: PgPool) {
    let user_id = new_user(&pool, "erin").await;
    let mut input = new_widget(user_id, WidgetType::Financial, 3);
    input.config = json!({ "currency": "EUR" });
    let w = WidgetRepo::create(&pool, &input).await.unwrap();

    let updated = WidgetRepo::update(&pool, w.id, &WidgetPatch::enabled(false))
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_enabled);
    assert_eq!(updated.position, 3);
    assert_eq!(updated.title, w.title);
    assert_eq!(updated.config, json!({ "currency": "EUR" }));
    assert_eq!(updated.created_at, w.created_at);

    let updated = WidgetRepo::update(&pool, w.id, &WidgetPatch::position(0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.position, 0);
    assert!(!updated.is_enabled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_widget_returns_none(pool: PgPool) {
    let result = WidgetRepo::update(&pool, 424_242, &WidgetPatch::position(1))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_position_violates_check(pool: PgPool) {
    let user_id = new_user(&pool, "frank").await;
    let w = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::Financial, 0))
        .await
        .unwrap();
    let err = WidgetRepo::update(&pool, w.id, &WidgetPatch::position(-1))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("23514")
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_idempotent(pool: PgPool) {
    let user_id = new_user(&pool, "gina").await;
    let w = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::ToolMetrics, 0))
        .await
        .unwrap();

    assert!(WidgetRepo::delete(&pool, w.id).await.unwrap());
    assert!(!WidgetRepo::delete(&pool, w.id).await.unwrap());
    assert!(WidgetRepo::find_by_id(&pool, w.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Batch reorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_positions_applies_all(pool: PgPool) {
    let user_id = new_user(&pool, "hank").await;
    let a = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::Financial, 0))
        .await
        .unwrap();
    let b = WidgetRepo::create(&pool, &new_widget(user_id, WidgetType::SalesFunnel, 1))
        .await
        .unwrap();

    let rows = WidgetRepo::set_positions(
        &pool,
        user_id,
        &[
            PositionUpdate { id: a.id, position: 1 },
            PositionUpdate { id: b.id, position: 0 },
        ],
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);

    let ids: Vec<i64> = WidgetRepo::list_by_user(&pool, user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![b.id, a.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_positions_rolls_back_on_foreign_widget(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let mine = WidgetRepo::create(&pool, &new_widget(alice, WidgetType::Financial, 0))
        .await
        .unwrap();
    let theirs = WidgetRepo::create(&pool, &new_widget(bob, WidgetType::Financial, 0))
        .await
        .unwrap();

    let err = WidgetRepo::set_positions(
        &pool,
        alice,
        &[
            PositionUpdate { id: mine.id, position: 5 },
            PositionUpdate { id: theirs.id, position: 6 },
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::RowNotFound));

    let mine = WidgetRepo::find_by_id(&pool, mine.id).await.unwrap().unwrap();
    assert_eq!(mine.position, 0, "first write must be rolled back");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_owners_skips_missing_ids(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let a = WidgetRepo::create(&pool, &new_widget(alice, WidgetType::Financial, 0))
        .await
        .unwrap();
    let b = WidgetRepo::create(&pool, &new_widget(bob, WidgetType::Financial, 0))
        .await
        .unwrap();

    let mut owners = WidgetRepo::find_owners(&pool, &[a.id, b.id, 999_999])
        .await
        .unwrap();
    owners.sort();
    assert_eq!(owners, vec![(a.id, alice), (b.id, bob)]);
}
