//! Watchlist store.
//!
//! The store owns the saved items for one session and mirrors them into a
//! [`StorageSlot`] after every mutation. Storage failures never reach the
//! caller: the store logs them and keeps working from memory.
//!
//! Identity is dual-keyed. An item is the same entry as a stored one when the
//! `link` fields match or the `originalLink` fields match. Lookups and removals
//! by a single key match either field. Two references that share only an
//! `originalLink` therefore collapse into one entry even if their `link`s
//! differ.

use crate::models::{AnimeBase, WatchlistItem};
use crate::storage::StorageSlot;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Session-owned list of saved anime, most recent first
#[derive(Debug)]
pub struct WatchlistStore<S: StorageSlot> {
    slot: S,
    items: Vec<WatchlistItem>,
}

impl<S: StorageSlot> WatchlistStore<S> {
    /// Load the persisted collection from `slot`
    ///
    /// A missing, unreadable or malformed blob yields an empty store.
    pub fn initialize(slot: S) -> Self {
        let items = match Self::load(&slot) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = slot.key(), error = %format!("{e:#}"), "Failed to load watchlist");
                Vec::new()
            }
        };

        info!(key = slot.key(), items = items.len(), "Watchlist initialized");
        Self { slot, items }
    }

    fn load(slot: &S) -> Result<Vec<WatchlistItem>> {
        let Some(blob) = slot.read()? else {
            return Ok(Vec::new());
        };

        let loaded: Vec<WatchlistItem> =
            serde_json::from_str(&blob).context("Failed to parse saved watchlist")?;

        let total = loaded.len();
        let mut items: Vec<WatchlistItem> = Vec::with_capacity(total);
        for item in loaded {
            if items
                .iter()
                .any(|kept| kept.same_entry(&item.link, &item.original_link))
            {
                continue;
            }
            items.push(item);
        }

        if items.len() < total {
            warn!(
                key = slot.key(),
                dropped = total - items.len(),
                "Dropped duplicate watchlist entries"
            );
        }

        Ok(items)
    }

    /// Save `anime` at the front of the list
    ///
    /// Returns false, and writes nothing, when an entry with the same `link`
    /// or the same `originalLink` already exists.
    pub fn add(&mut self, anime: AnimeBase) -> bool {
        if self
            .items
            .iter()
            .any(|item| item.same_entry(&anime.link, &anime.original_link))
        {
            debug!(link = %anime.link, "Already in watchlist");
            return false;
        }

        info!(title = %anime.title, link = %anime.link, "Adding to watchlist");
        self.items
            .insert(0, WatchlistItem::from_anime(anime, Utc::now()));
        self.persist();
        true
    }

    /// Remove every entry whose `link` or `originalLink` equals `key`
    ///
    /// Persists even when nothing matched. Returns the number removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.matches_key(key));
        let removed = before - self.items.len();

        info!(key = key, removed = removed, "Removing from watchlist");
        self.persist();
        removed
    }

    /// True if some entry's `link` or `originalLink` equals `key`
    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.matches_key(key))
    }

    /// Entries in display order
    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Tear down the store, handing back its slot
    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Serialized form of the collection, as written to the slot
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.items).context("Failed to serialize watchlist")
    }

    fn persist(&self) {
        let result = self
            .to_json()
            .and_then(|blob| self.slot.write(&blob));

        if let Err(e) = result {
            warn!(
                key = self.slot.key(),
                error = %format!("{e:#}"),
                "Failed to save watchlist, keeping changes in memory"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DataPaths;
    use crate::storage::{FileSlot, MemorySlot};
    use tempfile::TempDir;

    const KEY: &str = "nimestream_watchlist";

    fn anime(title: &str, link: &str, original_link: &str) -> AnimeBase {
        AnimeBase {
            title: title.to_string(),
            link: link.to_string(),
            original_link: original_link.to_string(),
            ..Default::default()
        }
    }

    fn assert_unique_keys<S: StorageSlot>(store: &WatchlistStore<S>) {
        let items = store.items();
        for (i, a) in items.iter().enumerate() {
            for b in &items[i + 1..] {
                assert_ne!(a.link, b.link, "duplicate link {}", a.link);
                assert_ne!(
                    a.original_link, b.original_link,
                    "duplicate originalLink {}",
                    a.original_link
                );
            }
        }
    }

    #[test]
    fn test_empty_slot_starts_empty() {
        let store = WatchlistStore::initialize(MemorySlot::new(KEY));
        assert!(store.is_empty());
        assert_eq!(store.slot().write_count(), 0);
    }

    #[test]
    fn test_add_then_contains() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));

        assert!(store.add(anime("T", "/a", "https://host/a")));
        assert!(store.contains("/a"));
        assert!(store.contains("https://host/a"));
        assert!(!store.contains("/b"));
        assert_eq!(store.slot().write_count(), 1);
    }

    #[test]
    fn test_newest_first() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("First", "/a", "/a"));
        store.add(anime("Second", "/b", "/b"));
        store.add(anime("Third", "/c", "/c"));

        let titles: Vec<_> = store.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Third", "Second", "First"]);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("A", "/a", "/a"));
        store.add(anime("B", "/b", "/b"));
        let before = store.items().to_vec();
        let writes = store.slot().write_count();

        assert!(!store.add(anime("A again", "/a", "/a")));
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(store.slot().write_count(), writes);
    }

    #[test]
    fn test_shared_original_link_rejected() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));

        assert!(store.add(anime("T", "/a", "/a")));
        assert!(!store.add(anime("T2", "/b", "/a")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "T");
        assert!(!store.contains("/b"));
    }

    #[test]
    fn test_remove_by_original_link() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("T", "/series/x", "https://host/series/x"));

        assert_eq!(store.remove("https://host/series/x"), 1);
        assert!(store.is_empty());
        assert!(!store.contains("/series/x"));
    }

    #[test]
    fn test_remove_then_contains() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("T", "/a", "/a"));

        store.remove("/a");
        assert!(!store.contains("/a"));
    }

    #[test]
    fn test_remove_missing_still_persists() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("T", "/a", "/a"));
        let writes = store.slot().write_count();

        assert_eq!(store.remove("/zzz"), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.slot().write_count(), writes + 1);
    }

    #[test]
    fn test_remove_matches_every_entry() {
        // Entries can share a key across different fields: link of one,
        // originalLink of another
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("One", "/k", "/one"));
        store.add(anime("Two", "/two", "/k"));
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove("/k"), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_keys_stay_unique_across_operation_sequences() {
        let links = ["/a", "/b", "/c", "https://host/a", "https://host/b"];
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));

        // Deterministic pseudo-random walk over add/remove
        let mut seed: u32 = 0x2545_F491;
        for step in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let link = links[(seed % links.len() as u32) as usize];
            let original = links[((seed >> 8) % links.len() as u32) as usize];

            if seed % 3 == 0 {
                store.remove(link);
                assert!(!store.contains(link));
            } else {
                store.add(anime(&format!("step {step}"), link, original));
                assert!(store.contains(link) || store.contains(original));
            }
            assert_unique_keys(&store);
        }
    }

    #[test]
    fn test_round_trip_through_slot() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("A", "/a", "https://host/a").with_image("a.jpg"));
        store.add(anime("B", "/b", "/b").with_poster("b.jpg"));
        let saved = store.items().to_vec();

        let slot = store.into_slot();
        let reloaded = WatchlistStore::initialize(slot);
        assert_eq!(reloaded.items(), saved.as_slice());
    }

    #[test]
    fn test_round_trip_through_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let paths = DataPaths::new(temp_dir.path());

        let mut store = WatchlistStore::initialize(FileSlot::new(&paths, KEY));
        store.add(anime("A", "/a", "/a"));
        store.add(anime("B", "/b", "/b"));
        let saved = store.items().to_vec();
        drop(store);

        let reloaded = WatchlistStore::initialize(FileSlot::new(&paths, KEY));
        assert_eq!(reloaded.items(), saved.as_slice());

        Ok(())
    }

    #[test]
    fn test_invalid_json_starts_empty() {
        let store = WatchlistStore::initialize(MemorySlot::with_contents(KEY, "{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_read_starts_empty() {
        let store = WatchlistStore::initialize(MemorySlot::with_contents(KEY, "[]").failing_reads());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_write_keeps_memory_state() {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY).failing_writes());

        assert!(store.add(anime("T", "/a", "/a")));
        assert!(store.contains("/a"));
        assert_eq!(store.slot().contents(), None);

        store.remove("/a");
        assert!(store.is_empty());
    }

    #[test]
    fn test_loaded_duplicates_are_dropped() {
        let blob = r#"[
            {"title":"Keep","link":"/a","originalLink":"/x","addedAt":3},
            {"title":"Dup link","link":"/a","originalLink":"/y","addedAt":2},
            {"title":"Dup original","link":"/b","originalLink":"/x","addedAt":1},
            {"title":"Other","link":"/c","originalLink":"/z","addedAt":0}
        ]"#;
        let store = WatchlistStore::initialize(MemorySlot::with_contents(KEY, blob));

        let titles: Vec<_> = store.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Keep", "Other"]);
    }

    #[test]
    fn test_to_json_matches_slot_contents() -> Result<()> {
        let mut store = WatchlistStore::initialize(MemorySlot::new(KEY));
        store.add(anime("A", "/a", "/a"));

        assert_eq!(store.slot().contents(), Some(store.to_json()?));
        Ok(())
    }
}
