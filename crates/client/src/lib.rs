//! Client-side data layer for the insight dashboard.
//!
//! [`service::WidgetService`] turns dashboard actions (add, remove, toggle,
//! reorder, drag intents) into calls against the widget API, keeps a keyed
//! cache of each user's widget list, and reports the outcome of every user
//! action through a [`notify::Notifier`].

pub mod cache;
pub mod config;
pub mod error;
pub mod notify;
pub mod service;
pub mod transport;
