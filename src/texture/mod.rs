//! Bounded per-participant card texture cache.
//!
//! Insertion is no-store-if-present so an in-flight avatar upgrade on an
//! existing entry is never discarded. Overflow evicts the oldest half of the
//! entries by insertion order in one sweep — deliberately FIFO-bulk rather
//! than LRU, trading hit rate for a trivial hot path.

pub mod card;
pub mod font;

use std::collections::HashMap;

pub use card::{CardTexture, CardTheme, CARD_H, CARD_THEMES, CARD_W};

/// Default capacity before a bulk eviction sweep.
pub const DEFAULT_CAPACITY: usize = 2000;

pub struct TextureCache {
    entries: HashMap<String, CardTexture>,
    /// Insertion order; front = oldest.
    order: Vec<String>,
    capacity: usize,
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TextureCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            capacity: capacity.max(2),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CardTexture> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CardTexture> {
        self.entries.get_mut(id)
    }

    /// Insert unless the id is already cached. Triggers the bulk sweep when
    /// the capacity is exceeded.
    pub fn insert(&mut self, id: &str, tex: CardTexture) {
        if self.entries.contains_key(id) {
            return;
        }
        self.entries.insert(id.to_string(), tex);
        self.order.push(id.to_string());
        if self.entries.len() > self.capacity {
            let evict = self.capacity / 2;
            log::debug!(
                "texture cache over capacity ({}), evicting {} oldest",
                self.entries.len(),
                evict
            );
            for old in self.order.drain(..evict) {
                self.entries.remove(&old);
            }
        }
    }

    /// Drop every entry (and with it every GPU handle). Called when an
    /// appearance option changes and all cards must be re-composed.
    pub fn clear(&mut self) {
        log::debug!("texture cache cleared ({} entries)", self.entries.len());
        self.entries.clear();
        self.order.clear();
    }

    /// Mutable walk over all entries (avatar upgrade pass).
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut CardTexture> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualConfig;
    use crate::roster::Participant;

    fn tex(n: usize) -> CardTexture {
        let p = Participant {
            id: format!("p{n}"),
            display_name: format!("P {n}"),
            avatar_ref: String::new(),
        };
        CardTexture::compose(&p, &VisualConfig::default())
    }

    #[test]
    fn insert_is_idempotent_per_id() {
        let mut cache = TextureCache::with_capacity(10);
        let mut first = tex(0);
        first.avatar_applied = true; // marker to detect replacement
        cache.insert("a", first);
        cache.insert("a", tex(1));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").unwrap().avatar_applied, "upgrade kept");
    }

    #[test]
    fn overflow_evicts_oldest_half() {
        let mut cache = TextureCache::with_capacity(2000);
        for i in 0..2001 {
            cache.insert(&format!("id{i}"), tex(i));
        }
        assert_eq!(cache.len(), 1001);
        assert!(!cache.contains("id0"), "oldest entry gone");
        assert!(!cache.contains("id999"));
        assert!(cache.contains("id1000"), "survivor boundary");
        assert!(cache.contains("id2000"), "newest entry kept");
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = TextureCache::with_capacity(10);
        cache.insert("a", tex(0));
        cache.insert("b", tex(1));
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.get("a").is_none());
        // Re-insert after clear is a fresh entry, not a stale hit.
        cache.insert("a", tex(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn small_capacity_sweep() {
        let mut cache = TextureCache::with_capacity(4);
        for i in 0..5 {
            cache.insert(&format!("id{i}"), tex(i));
        }
        // 5 entries > 4 capacity: sweep of 2, leaving 3.
        assert_eq!(cache.len(), 3);
    }
}
