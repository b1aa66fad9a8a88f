//! Data models for the watchlist.
//!
//! Field names serialize in camelCase so a blob saved by the browser client
//! (`originalLink`, `addedAt`) loads unchanged.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Minimal reference to an anime or episode, as carried by every remote item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeBase {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default)]
    pub original_link: String,
    #[serde(default)]
    pub link: String,
}

impl AnimeBase {
    /// Reference where both identity keys are the same locator
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        Self {
            title: title.into(),
            image: None,
            poster: None,
            original_link: link.clone(),
            link,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }
}

/// Saved watchlist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub link: String,
    pub original_link: String,
    /// Milliseconds since the Unix epoch
    pub added_at: i64,
}

impl WatchlistItem {
    /// Stamp a reference with the time it was saved
    pub fn from_anime(anime: AnimeBase, added_at: DateTime<Utc>) -> Self {
        Self {
            title: anime.title,
            image: anime.image,
            poster: anime.poster,
            link: anime.link,
            original_link: anime.original_link,
            added_at: added_at.timestamp_millis(),
        }
    }

    /// True if `key` equals either identity field
    pub fn matches_key(&self, key: &str) -> bool {
        self.link == key || self.original_link == key
    }

    /// Same entry as `anime`: `link` matches `link` or `originalLink` matches `originalLink`
    pub fn same_entry(&self, link: &str, original_link: &str) -> bool {
        self.link == link || self.original_link == original_link
    }

    /// Image for display: the image, else the poster
    pub fn display_image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.poster.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn added_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.added_at).single()
    }
}
