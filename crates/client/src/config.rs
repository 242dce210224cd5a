/// How the client persists a reorder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReorderMode {
    /// One `PUT /api/widgets/{id}` per changed widget, issued concurrently.
    /// A failure part way through leaves the earlier writes in place.
    #[default]
    Independent,
    /// A single `PUT /api/widgets/positions` applied in one transaction.
    Batched,
}

impl ReorderMode {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "independent" => Some(ReorderMode::Independent),
            "batched" => Some(ReorderMode::Batched),
            _ => None,
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the widget API, without trailing slash.
    pub base_url: String,
    pub reorder_mode: ReorderMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            reorder_mode: ReorderMode::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `INSIGHT_API_URL`       | `http://localhost:3000`  |
    /// | `INSIGHT_REORDER_MODE`  | `independent`            |
    ///
    /// An unrecognised reorder mode falls back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("INSIGHT_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let reorder_mode = match std::env::var("INSIGHT_REORDER_MODE") {
            Ok(raw) => ReorderMode::from_env_value(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown INSIGHT_REORDER_MODE, using independent");
                defaults.reorder_mode
            }),
            Err(_) => defaults.reorder_mode,
        };

        Self {
            base_url,
            reorder_mode,
        }
    }
}
