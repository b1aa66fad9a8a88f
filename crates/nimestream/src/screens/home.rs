//! Home screen: carousel, trending, latest releases and new additions.
//!
//! The carousel advances on a timer and a promotional popup appears after a
//! short delay. Both timers are owned by the screen and only send
//! [`HomeEvent`]s; the screen applies them on the caller's task. Dropping the
//! screen (or calling [`HomeScreen::stop_timers`]) cancels them.

use super::{Card, Loadable, RequestTicket};
use crate::routes::Route;
use crate::tasks::ScheduledTask;
use oploverz_client::api::{CarouselItem, HomeResult};
use oploverz_client::{AnimeGateway, ApiResult};
use shared::config::UiConfig;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Timer output delivered to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEvent {
    AdvanceCarousel,
    ShowPromo,
}

/// Selected carousel slide
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Carousel {
    current: usize,
}

impl Carousel {
    pub fn current(&self) -> usize {
        self.current
    }

    /// Move to the next slide, wrapping around
    pub fn advance(&mut self, len: usize) {
        if len > 0 {
            self.current = (self.current + 1) % len;
        }
    }

    /// Jump to a slide; out-of-range indices are ignored
    pub fn select(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.current = index;
            true
        } else {
            false
        }
    }
}

/// Promotional popup shown once per screen
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PromoPopup {
    visible: bool,
    dismissed: bool,
}

impl PromoPopup {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self) {
        if !self.dismissed {
            self.visible = true;
        }
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.dismissed = true;
    }
}

/// Sections of the home feed as cards
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSections {
    pub latest_releases: Vec<Card>,
    pub trending: Vec<Card>,
    pub new_additions: Vec<Card>,
}

#[derive(Debug, Default)]
pub struct HomeScreen {
    data: Loadable<HomeResult>,
    carousel: Carousel,
    promo: PromoPopup,
    timers: Vec<ScheduledTask>,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &Loadable<HomeResult> {
        &self.data
    }

    pub async fn load<G: AnimeGateway>(&mut self, gateway: &G) {
        let ticket = self.begin();
        let result = gateway.get_home().await;
        self.finish(ticket, result);
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.data.begin()
    }

    /// Apply a fetched feed if `ticket` is still current; the carousel restarts
    pub fn finish(&mut self, ticket: RequestTicket, result: ApiResult<HomeResult>) -> bool {
        if !self.data.finish(ticket, result) {
            return false;
        }

        self.carousel = Carousel::default();
        if let Some(home) = self.data.ready() {
            info!(
                carousel = home.carousel.len(),
                trending = home.trending.len(),
                latest = home.latest_releases.len(),
                "Home feed loaded"
            );
        }
        true
    }

    /// Start the carousel and promo timers
    ///
    /// Events arrive on the returned receiver and must be fed back through
    /// [`HomeScreen::apply`]. Timers disabled in `ui` are not started.
    pub fn start_timers(&mut self, ui: &UiConfig, show_promo: bool) -> mpsc::UnboundedReceiver<HomeEvent> {
        self.stop_timers();
        let (tx, rx) = mpsc::unbounded_channel();

        if let Some(period) = ui.carousel_interval() {
            let tx = tx.clone();
            self.timers.push(ScheduledTask::every("carousel", period, move || {
                let _ = tx.send(HomeEvent::AdvanceCarousel);
            }));
        }

        if show_promo {
            if let Some(delay) = ui.promo_delay() {
                let tx = tx.clone();
                self.timers.push(ScheduledTask::after("promo", delay, move || {
                    let _ = tx.send(HomeEvent::ShowPromo);
                }));
            }
        }

        rx
    }

    pub fn stop_timers(&mut self) {
        if !self.timers.is_empty() {
            debug!(timers = self.timers.len(), "Stopping home timers");
            self.timers.clear();
        }
    }

    pub fn apply(&mut self, event: HomeEvent) {
        match event {
            HomeEvent::AdvanceCarousel => {
                let len = self.carousel_items().len();
                self.carousel.advance(len);
            }
            HomeEvent::ShowPromo => self.promo.show(),
        }
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn select_slide(&mut self, index: usize) -> bool {
        let len = self.carousel_items().len();
        self.carousel.select(index, len)
    }

    pub fn carousel_items(&self) -> &[CarouselItem] {
        self.data
            .ready()
            .map(|home| home.carousel.as_slice())
            .unwrap_or_default()
    }

    pub fn current_slide(&self) -> Option<&CarouselItem> {
        self.carousel_items().get(self.carousel.current())
    }

    /// Where the current slide's watch button leads
    pub fn current_slide_route(&self) -> Option<Route> {
        self.current_slide()
            .map(|slide| Route::for_item(&slide.item.original_link, &slide.item.link))
    }

    pub fn promo(&self) -> &PromoPopup {
        &self.promo
    }

    pub fn dismiss_promo(&mut self) {
        self.promo.dismiss();
    }

    pub fn sections(&self) -> Option<HomeSections> {
        let home = self.data.ready()?;

        let latest_releases = home
            .latest_releases
            .iter()
            .map(|release| {
                // The time label repeats the title and episode upstream
                let overlay = release
                    .time_ago
                    .replacen(&release.item.title, "", 1)
                    .replacen(&release.episode, "", 1)
                    .trim()
                    .to_string();
                Card::from_item(&release.item)
                    .with_subtitle(release.episode.clone())
                    .with_overlay(overlay)
            })
            .collect();

        let trending = home
            .trending
            .iter()
            .map(|item| {
                let mut card = Card::from_item(&item.item).with_subtitle(
                    item.episode_info
                        .clone()
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| "Trending".to_string()),
                );
                // Trending titles carry the synopsis after "Ceritanya"
                if let Some((title, _)) = card.title.split_once("Ceritanya") {
                    card.title = title.trim_end().to_string();
                }
                card
            })
            .collect();

        let new_additions = home
            .new_additions
            .iter()
            .map(|item| {
                Card::from_item(&item.item)
                    .with_subtitle(item.episode_info.clone().unwrap_or_default())
            })
            .collect();

        Some(HomeSections {
            latest_releases,
            trending,
            new_additions,
        })
    }
}
