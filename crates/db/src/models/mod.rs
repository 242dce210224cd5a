//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//!
//! Partial updates use [`insight_core::widget::WidgetPatch`] directly.

pub mod user;
pub mod widget;
