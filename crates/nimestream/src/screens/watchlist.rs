//! Saved watchlist screen.

use super::Card;
use shared::{StorageSlot, WatchlistStore};

/// View over the store; it holds no data of its own
#[derive(Debug, Default)]
pub struct WatchlistScreen;

impl WatchlistScreen {
    pub fn new() -> Self {
        Self
    }

    /// One card per saved item, newest first
    pub fn cards<S: StorageSlot>(&self, store: &WatchlistStore<S>) -> Vec<Card> {
        store
            .items()
            .iter()
            .map(|item| {
                let mut card = Card::new(
                    &item.title,
                    item.display_image(),
                    &item.original_link,
                    &item.link,
                );
                if let Some(added) = item.added_at_utc() {
                    card = card.with_subtitle(format!("Added {}", added.format("%Y-%m-%d")));
                }
                card
            })
            .collect()
    }

    /// Remove the card's entry; returns how many entries went away
    pub fn remove<S: StorageSlot>(&self, store: &mut WatchlistStore<S>, card: &Card) -> usize {
        store.remove(&card.key)
    }
}
