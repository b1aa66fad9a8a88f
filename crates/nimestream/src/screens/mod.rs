//! Screens: the view state behind each route.
//!
//! Every screen fetches through an [`AnimeGateway`](oploverz_client::AnimeGateway)
//! into a [`Loadable`], which tracks the loading, unavailable and ready states
//! and ignores results from requests that have since been superseded.

pub mod detail;
pub mod home;
pub mod search;
pub mod stream;
pub mod watchlist;

pub use detail::DetailScreen;
pub use home::{Carousel, HomeEvent, HomeScreen, PromoPopup};
pub use search::SearchScreen;
pub use stream::StreamScreen;
pub use watchlist::WatchlistScreen;

use crate::routes::Route;
use oploverz_client::api::ItemRef;
use shared::locator::preferred_link;
use shared::{AnimeBase, StorageSlot, WatchlistStore};
use std::fmt::Display;
use tracing::{debug, error};

/// What a screen can currently show
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    /// Missing input or a failed request
    Unavailable,
    Ready(T),
}

/// Identifies one fetch started by a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Hands out tickets; only the newest one is current
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
}

impl RequestTracker {
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        RequestTicket(self.generation)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Make every outstanding ticket stale
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }
}

/// Fetched data plus the guard that keeps stale results out
#[derive(Debug)]
pub struct Loadable<T> {
    state: ViewState<T>,
    requests: RequestTracker,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Loading,
            requests: RequestTracker::default(),
        }
    }
}

impl<T> Loadable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the loading state for a new request
    pub fn begin(&mut self) -> RequestTicket {
        self.state = ViewState::Loading;
        self.requests.begin()
    }

    /// Apply a result if `ticket` is still current; returns whether it was applied
    pub fn finish<E: Display>(&mut self, ticket: RequestTicket, result: Result<T, E>) -> bool {
        if !self.requests.is_current(ticket) {
            debug!(ticket = ticket.0, "Ignoring result of superseded request");
            return false;
        }

        self.state = match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => {
                error!(error = %e, "Failed to load screen data");
                ViewState::Unavailable
            }
        };
        true
    }

    /// Nothing to fetch; any request still in flight becomes stale
    pub fn mark_unavailable(&mut self) {
        self.requests.invalidate();
        self.state = ViewState::Unavailable;
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn ready(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }
}

/// One item tile in a list
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub image: Option<String>,
    pub subtitle: Option<String>,
    pub overlay: Option<String>,
    /// Watchlist key: the item's original link, else its link
    pub key: String,
    pub route: Route,
}

impl Card {
    pub fn new(title: &str, image: Option<&str>, original_link: &str, link: &str) -> Self {
        let key = preferred_link(original_link, link).to_string();
        Self {
            title: title.to_string(),
            image: image.filter(|s| !s.is_empty()).map(str::to_string),
            subtitle: None,
            overlay: None,
            route: Route::for_item(&key, ""),
            key,
        }
    }

    pub fn from_item(item: &ItemRef) -> Self {
        Self::new(
            &item.title,
            item.display_image(),
            &item.original_link,
            &item.link,
        )
    }

    /// Image to show, falling back to `placeholder`
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        let subtitle = subtitle.into();
        self.subtitle = (!subtitle.is_empty()).then_some(subtitle);
        self
    }

    pub fn with_overlay(mut self, overlay: impl Into<String>) -> Self {
        let overlay = overlay.into();
        self.overlay = (!overlay.is_empty()).then_some(overlay);
        self
    }

    pub fn is_saved<S: StorageSlot>(&self, store: &WatchlistStore<S>) -> bool {
        store.contains(&self.key)
    }

    /// Save or unsave this card; returns whether it is saved afterwards
    pub fn toggle_watchlist<S: StorageSlot>(&self, store: &mut WatchlistStore<S>) -> bool {
        if store.contains(&self.key) {
            store.remove(&self.key);
            false
        } else {
            store.add(AnimeBase {
                title: self.title.clone(),
                image: self.image.clone(),
                poster: None,
                original_link: self.key.clone(),
                link: self.key.clone(),
            });
            true
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory gateway for screen tests.

    use oploverz_client::api::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone)]
    pub struct FakeGateway {
        pub home: Option<HomeResult>,
        pub detail: Option<AnimeDetail>,
        pub stream: Option<StreamResult>,
        pub search: Vec<SearchResultItem>,
        /// Every call as `endpoint:argument`, in order
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeGateway {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn missing(what: &str) -> ApiError {
        ApiError::MissingResult {
            url: format!("fake://{what}"),
        }
    }

    impl AnimeGateway for FakeGateway {
        async fn get_home(&self) -> ApiResult<HomeResult> {
            self.record("home:".to_string());
            self.home.clone().ok_or_else(|| missing("home"))
        }

        async fn get_detail(&self, path: &str) -> ApiResult<AnimeDetail> {
            self.record(format!("detail:{path}"));
            self.detail.clone().ok_or_else(|| missing("detail"))
        }

        async fn get_stream(&self, path: &str) -> ApiResult<StreamResult> {
            self.record(format!("stream:{path}"));
            self.stream.clone().ok_or_else(|| missing("stream"))
        }

        async fn search(&self, query: &str) -> ApiResult<Vec<SearchResultItem>> {
            self.record(format!("search:{query}"));
            Ok(self.search.clone())
        }
    }

    pub fn item(title: &str, link: &str, original_link: &str) -> ItemRef {
        ItemRef {
            title: title.to_string(),
            link: link.to_string(),
            original_link: original_link.to_string(),
            ..Default::default()
        }
    }
}
