//! Domain logic for the insight dashboard.
//!
//! Widget types and the static registry, per-type settings documents,
//! the dashboard renderer, and the drag/drop reordering controller.
//! This crate performs no I/O; persistence lives in `insight-db` and
//! transport in `insight-api` / `insight-client`.

pub mod error;
pub mod layout;
pub mod registry;
pub mod reorder;
pub mod settings;
pub mod types;
pub mod widget;
