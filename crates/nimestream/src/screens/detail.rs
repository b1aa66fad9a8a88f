//! Series detail screen.

use super::{Loadable, RequestTicket};
use crate::routes::Route;
use oploverz_client::api::AnimeDetail;
use oploverz_client::{AnimeGateway, ApiResult};
use shared::{AnimeBase, StorageSlot, WatchlistStore};
use tracing::info;

/// Episode row in the detail list
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeEntry {
    pub label: String,
    pub release_date: String,
    pub route: Route,
}

#[derive(Debug, Default)]
pub struct DetailScreen {
    /// The route's `url` parameter, also the watchlist key
    url: Option<String>,
    data: Loadable<AnimeDetail>,
}

impl DetailScreen {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url: url.filter(|u| !u.is_empty()),
            data: Loadable::new(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn data(&self) -> &Loadable<AnimeDetail> {
        &self.data
    }

    /// Fetch the detail for the current route
    pub async fn load<G: AnimeGateway>(&mut self, gateway: &G) {
        let Some(url) = self.url.clone() else {
            self.data.mark_unavailable();
            return;
        };

        let ticket = self.begin();
        let result = gateway.get_detail(&url).await;
        self.finish(ticket, result);
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.data.begin()
    }

    /// Apply a fetched detail if `ticket` is still current
    pub fn finish(&mut self, ticket: RequestTicket, result: ApiResult<AnimeDetail>) -> bool {
        if !self.data.finish(ticket, result) {
            return false;
        }

        if let Some(detail) = self.data.ready() {
            info!(title = %detail.title, episodes = detail.episodes.len(), "Detail loaded");
        }
        true
    }

    pub fn is_saved<S: StorageSlot>(&self, store: &WatchlistStore<S>) -> bool {
        self.url.as_deref().is_some_and(|url| store.contains(url))
    }

    /// Save or unsave the series under the route's `url`
    ///
    /// Returns whether it is saved afterwards, or `None` when nothing is loaded.
    pub fn toggle_watchlist<S: StorageSlot>(&self, store: &mut WatchlistStore<S>) -> Option<bool> {
        let url = self.url.as_deref()?;
        let detail = self.data.ready()?;

        if store.contains(url) {
            store.remove(url);
            return Some(false);
        }

        let poster = (!detail.poster.is_empty()).then(|| detail.poster.clone());
        store.add(AnimeBase {
            title: detail.title.clone(),
            image: poster.clone(),
            poster,
            original_link: url.to_string(),
            link: url.to_string(),
        });
        Some(true)
    }

    /// Episode rows; unlabeled episodes count down from the list length
    pub fn episodes(&self) -> Vec<EpisodeEntry> {
        let Some(detail) = self.data.ready() else {
            return Vec::new();
        };

        let total = detail.episodes.len();
        detail
            .episodes
            .iter()
            .enumerate()
            .map(|(idx, ep)| EpisodeEntry {
                label: if ep.quality.is_empty() {
                    format!("Episode {}", total - idx)
                } else {
                    ep.quality.clone()
                },
                release_date: ep.release_date.clone(),
                route: Route::stream(ep.locator()),
            })
            .collect()
    }
}
