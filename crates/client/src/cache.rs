//! Keyed cache of server read state.
//!
//! Every entry carries a generation counter. Invalidation removes the entry
//! and bumps the generation, so a fetch that started before a mutation
//! cannot repopulate the cache with pre-mutation data.

use std::collections::HashMap;
use std::sync::Arc;

use insight_core::types::DbId;
use insight_core::widget::Widget;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full widget list (enabled and disabled) of one user.
    WidgetList(DbId),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    value: Option<Arc<Vec<Widget>>>,
}

#[derive(Debug, Default)]
pub struct WidgetCache {
    slots: RwLock<HashMap<CacheKey, Slot>>,
}

impl WidgetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value, if present.
    pub async fn get(&self, key: CacheKey) -> Option<Arc<Vec<Widget>>> {
        self.slots
            .read()
            .await
            .get(&key)
            .and_then(|slot| slot.value.clone())
    }

    /// Current generation of `key`; pass it back to [`Self::store`].
    pub async fn generation(&self, key: CacheKey) -> u64 {
        self.slots
            .read()
            .await
            .get(&key)
            .map_or(0, |slot| slot.generation)
    }

    /// Store a fetched value if `key` has not been invalidated since
    /// `generation` was read. The value is returned either way.
    pub async fn store(
        &self,
        key: CacheKey,
        generation: u64,
        widgets: Vec<Widget>,
    ) -> Arc<Vec<Widget>> {
        let widgets = Arc::new(widgets);
        let mut slots = self.slots.write().await;
        let slot = slots.entry(key).or_default();
        if slot.generation == generation {
            slot.value = Some(Arc::clone(&widgets));
        } else {
            tracing::debug!(?key, "Discarding fetch that raced an invalidation");
        }
        widgets
    }

    /// Drop the value for `key`. Returns whether a value was cached.
    pub async fn invalidate(&self, key: CacheKey) -> bool {
        let mut slots = self.slots.write().await;
        let slot = slots.entry(key).or_default();
        slot.generation += 1;
        slot.value.take().is_some()
    }
}
