//! Oploverz API response types.
//!
//! The upstream API omits fields and sends `null` freely. Every field here is
//! defaulted at deserialization so display code never sees a missing value:
//! strings become `""`, lists become empty, nested records take their default.

use serde::{Deserialize, Deserializer, Serialize};
use shared::locator::preferred_link;

/// Treat `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Uniform wrapper around every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub author: String,
    pub result: Option<T>,
}

/// Fields shared by every listed item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(rename = "originalLink", default, deserialize_with = "nullable")]
    pub original_link: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link: String,
}

impl ItemRef {
    /// Locator used for routing and watchlist keys
    pub fn locator(&self) -> &str {
        preferred_link(&self.original_link, &self.link)
    }

    /// Image for display: the image, else the poster
    pub fn display_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.poster.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Home feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeResult {
    #[serde(default, deserialize_with = "nullable")]
    pub carousel: Vec<CarouselItem>,
    #[serde(default, deserialize_with = "nullable")]
    pub trending: Vec<TrendingItem>,
    #[serde(default, deserialize_with = "nullable")]
    pub latest_releases: Vec<LatestReleaseItem>,
    #[serde(default, deserialize_with = "nullable")]
    pub new_additions: Vec<TrendingItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarouselItem {
    #[serde(flatten)]
    pub item: ItemRef,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    #[serde(flatten)]
    pub item: ItemRef,
    #[serde(default)]
    pub episode_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestReleaseItem {
    #[serde(flatten)]
    pub item: ItemRef,
    #[serde(default, deserialize_with = "nullable")]
    pub episode: String,
    #[serde(default, deserialize_with = "nullable")]
    pub time_ago: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(flatten)]
    pub item: ItemRef,
    #[serde(default)]
    pub japanese_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub episodes_count: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<String>,
}

/// Series detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub japanese_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub poster: String,
    #[serde(default, deserialize_with = "nullable")]
    pub information: Information,
    #[serde(default, deserialize_with = "nullable")]
    pub episodes: Vec<Episode>,
    #[serde(default, deserialize_with = "nullable")]
    pub breadcrumb: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Information {
    #[serde(default, deserialize_with = "nullable")]
    pub studio: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default, deserialize_with = "nullable")]
    pub quality: String,
    #[serde(default, deserialize_with = "nullable")]
    pub release_date: String,
    #[serde(rename = "originalLink", default, deserialize_with = "nullable")]
    pub original_link: String,
    #[serde(default, deserialize_with = "nullable")]
    pub link: String,
}

impl Episode {
    pub fn locator(&self) -> &str {
        preferred_link(&self.original_link, &self.link)
    }
}

/// Episode stream page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamResult {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub download_links: DownloadLinks,
    #[serde(default, deserialize_with = "nullable")]
    pub stream_links: Vec<StreamLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_info: EpisodeInfo,
    #[serde(default, deserialize_with = "nullable")]
    pub navigation: Navigation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamLink {
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadLinks {
    #[serde(default, deserialize_with = "nullable")]
    pub mp4: Vec<DownloadQuality>,
    #[serde(default, deserialize_with = "nullable")]
    pub mkv: Vec<DownloadQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadQuality {
    #[serde(default, deserialize_with = "nullable")]
    pub quality: String,
    #[serde(default, deserialize_with = "nullable")]
    pub links: Vec<DownloadLinkInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadLinkInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub host: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub episode_number: String,
    #[serde(default, deserialize_with = "nullable")]
    pub released_at: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subbed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    #[serde(default)]
    pub next: Option<EpisodeRef>,
    #[serde(default)]
    pub prev: Option<EpisodeRef>,
}

/// Neighbouring episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRef {
    #[serde(default, deserialize_with = "nullable")]
    pub link: String,
    #[serde(rename = "originalLink", default, deserialize_with = "nullable")]
    pub original_link: String,
}

impl EpisodeRef {
    pub fn locator(&self) -> &str {
        preferred_link(&self.original_link, &self.link)
    }
}
