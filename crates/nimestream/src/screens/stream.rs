//! Episode stream screen.

use super::{Loadable, RequestTicket};
use crate::routes::Route;
use oploverz_client::api::{DownloadQuality, StreamLink, StreamResult};
use oploverz_client::{AnimeGateway, ApiResult};
use tracing::{debug, info};

#[derive(Debug)]
pub struct StreamScreen {
    url: Option<String>,
    data: Loadable<StreamResult>,
    /// Index into `stream_links` of the playing source
    active: Option<usize>,
    preferred_quality: String,
}

/// Default source: first whose label contains `preferred`, else the first
pub fn default_stream(links: &[StreamLink], preferred: &str) -> Option<usize> {
    if links.is_empty() {
        return None;
    }
    links
        .iter()
        .position(|link| !preferred.is_empty() && link.source.contains(preferred))
        .or(Some(0))
}

/// Button label for a source: drop the first `Streaming`, else number the server
pub fn server_label(link: &StreamLink, index: usize) -> String {
    let label = link.source.replacen("Streaming", "", 1);
    let label = label.trim();
    if label.is_empty() {
        format!("Server {}", index + 1)
    } else {
        label.to_string()
    }
}

impl StreamScreen {
    pub fn new(url: Option<String>, preferred_quality: &str) -> Self {
        Self {
            url: url.filter(|u| !u.is_empty()),
            data: Loadable::new(),
            active: None,
            preferred_quality: preferred_quality.to_string(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn data(&self) -> &Loadable<StreamResult> {
        &self.data
    }

    pub async fn load<G: AnimeGateway>(&mut self, gateway: &G) {
        let Some(url) = self.url.clone() else {
            self.data.mark_unavailable();
            self.active = None;
            return;
        };

        let ticket = self.begin();
        let result = gateway.get_stream(&url).await;
        self.finish(ticket, result);
    }

    pub fn begin(&mut self) -> RequestTicket {
        self.active = None;
        self.data.begin()
    }

    /// Apply a fetched stream and pick the default source
    pub fn finish(&mut self, ticket: RequestTicket, result: ApiResult<StreamResult>) -> bool {
        if !self.data.finish(ticket, result) {
            return false;
        }

        if let Some(stream) = self.data.ready() {
            self.active = default_stream(&stream.stream_links, &self.preferred_quality);
            info!(
                title = %stream.title,
                sources = stream.stream_links.len(),
                active = ?self.active,
                "Stream loaded"
            );
        }
        true
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_stream(&self) -> Option<&StreamLink> {
        let stream = self.data.ready()?;
        stream.stream_links.get(self.active?)
    }

    /// Switch source; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        let available = self
            .data
            .ready()
            .map_or(0, |stream| stream.stream_links.len());
        if index >= available {
            debug!(index = index, available = available, "Ignoring invalid stream selection");
            return false;
        }
        self.active = Some(index);
        true
    }

    pub fn server_labels(&self) -> Vec<String> {
        self.data
            .ready()
            .map(|stream| {
                stream
                    .stream_links
                    .iter()
                    .enumerate()
                    .map(|(idx, link)| server_label(link, idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn prev_route(&self) -> Option<Route> {
        let prev = self.data.ready()?.navigation.prev.as_ref()?;
        Some(Route::stream(prev.locator()))
    }

    pub fn next_route(&self) -> Option<Route> {
        let next = self.data.ready()?.navigation.next.as_ref()?;
        Some(Route::stream(next.locator()))
    }

    /// Download qualities, MP4 before MKV, tagged with their container
    pub fn downloads(&self) -> Vec<(&'static str, &DownloadQuality)> {
        let Some(stream) = self.data.ready() else {
            return Vec::new();
        };

        stream
            .download_links
            .mp4
            .iter()
            .map(|q| ("MP4", q))
            .chain(stream.download_links.mkv.iter().map(|q| ("MKV", q)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::fake::FakeGateway;
    use crate::screens::ViewState;
    use oploverz_client::api::{DownloadLinks, EpisodeRef, Navigation};

    fn link(source: &str) -> StreamLink {
        StreamLink {
            source: source.to_string(),
            url: format!("https://player/{}", source.replace(' ', "-")),
        }
    }

    fn stream(links: Vec<StreamLink>) -> StreamResult {
        StreamResult {
            title: "Frieren Episode 2".to_string(),
            stream_links: links,
            download_links: DownloadLinks {
                mp4: vec![DownloadQuality {
                    quality: "480p".to_string(),
                    links: Vec::new(),
                }],
                mkv: vec![DownloadQuality {
                    quality: "1080p".to_string(),
                    links: Vec::new(),
                }],
            },
            navigation: Navigation {
                prev: Some(EpisodeRef {
                    link: "/frieren-episode-1".to_string(),
                    original_link: "https://host/frieren-episode-1".to_string(),
                }),
                next: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_stream_prefers_720() {
        let links = [link("Streaming 480p"), link("Streaming 720p"), link("Streaming 1080p")];
        assert_eq!(default_stream(&links, "720"), Some(1));
    }

    #[test]
    fn test_default_stream_falls_back_to_first() {
        let links = [link("Streaming 480p"), link("Streaming 1080p")];
        assert_eq!(default_stream(&links, "720"), Some(0));
        assert_eq!(default_stream(&links, ""), Some(0));
        assert_eq!(default_stream(&[], "720"), None);
    }

    #[test]
    fn test_server_labels() {
        assert_eq!(server_label(&link("Streaming 720p"), 0), "720p");
        assert_eq!(server_label(&link("Streaming"), 2), "Server 3");
        assert_eq!(server_label(&link(""), 0), "Server 1");
        assert_eq!(server_label(&link("Streaming Streaming HD"), 0), "Streaming HD");
    }

    #[tokio::test]
    async fn test_load_selects_default_and_allows_switching() {
        let gateway = FakeGateway {
            stream: Some(stream(vec![link("Streaming 480p"), link("Streaming 720p")])),
            ..Default::default()
        };
        let mut screen = StreamScreen::new(Some("/frieren-episode-2".to_string()), "720");
        screen.load(&gateway).await;

        assert_eq!(screen.active_index(), Some(1));
        assert_eq!(screen.active_stream().map(|l| l.source.as_str()), Some("Streaming 720p"));
        assert_eq!(screen.server_labels(), ["480p", "720p"]);

        assert!(screen.select(0));
        assert_eq!(screen.active_index(), Some(0));
        assert!(!screen.select(5));
        assert_eq!(screen.active_index(), Some(0));
    }

    #[tokio::test]
    async fn test_no_sources() {
        let gateway = FakeGateway {
            stream: Some(stream(Vec::new())),
            ..Default::default()
        };
        let mut screen = StreamScreen::new(Some("/x-episode-1".to_string()), "720");
        screen.load(&gateway).await;

        assert!(screen.data().ready().is_some());
        assert_eq!(screen.active_stream(), None);
        assert!(!screen.select(0));
    }

    #[tokio::test]
    async fn test_navigation_and_downloads() {
        let gateway = FakeGateway {
            stream: Some(stream(vec![link("Streaming 720p")])),
            ..Default::default()
        };
        let mut screen = StreamScreen::new(Some("/frieren-episode-2".to_string()), "720");
        screen.load(&gateway).await;

        assert_eq!(
            screen.prev_route(),
            Some(Route::Stream {
                url: Some("/frieren-episode-1".to_string())
            })
        );
        assert_eq!(screen.next_route(), None);

        let downloads: Vec<_> = screen
            .downloads()
            .into_iter()
            .map(|(container, q)| format!("{} {}", q.quality, container))
            .collect();
        assert_eq!(downloads, ["480p MP4", "1080p MKV"]);
    }

    #[test]
    fn test_superseded_stream_does_not_change_selection() {
        let mut screen = StreamScreen::new(Some("/a-episode-1".to_string()), "720");
        let stale = screen.begin();
        let current = screen.begin();

        assert!(screen.finish(current, Ok(stream(vec![link("Streaming 480p")]))));
        assert!(!screen.finish(stale, Ok(stream(vec![link("A"), link("B 720")]))));

        assert_eq!(screen.active_stream().map(|l| l.source.as_str()), Some("Streaming 480p"));
    }

    #[tokio::test]
    async fn test_missing_url() {
        let mut screen = StreamScreen::new(Some(String::new()), "720");
        screen.load(&FakeGateway::default()).await;
        assert_eq!(screen.data().state(), &ViewState::Unavailable);
    }
}
