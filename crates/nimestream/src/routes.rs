//! Client-side routes.
//!
//! Routes use the same shape as the browser client's hash routes, so a route
//! string copied from there (`/detail?url=%2Fseries%2Fx`) opens the same screen.

use shared::locator::{extract_path, is_episode_path, preferred_link};
use std::fmt;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("unknown route '{0}'")]
    Unknown(String),
}

/// A navigable view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// `url` is `None` when the route carries no `url` parameter
    Detail { url: Option<String> },
    Stream { url: Option<String> },
    Search { query: String },
    Watchlist,
}

impl Route {
    /// Parse `/path?query`, tolerating a leading `#`
    pub fn parse(route: &str) -> Result<Self, RouteError> {
        let trimmed = route.trim().trim_start_matches('#');
        let (path, query) = trimmed.split_once('?').unwrap_or((trimmed, ""));
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        match path.trim_end_matches('/') {
            "" => Ok(Route::Home),
            "/detail" => Ok(Route::Detail { url: param("url") }),
            "/stream" => Ok(Route::Stream { url: param("url") }),
            "/search" => Ok(Route::Search {
                query: param("q").unwrap_or_default(),
            }),
            "/watchlist" => Ok(Route::Watchlist),
            _ => Err(RouteError::Unknown(route.to_string())),
        }
    }

    /// Where a listed item leads: episodes stream, everything else shows detail
    pub fn for_item(original_link: &str, link: &str) -> Self {
        let path = extract_path(preferred_link(original_link, link));
        if is_episode_path(&path) {
            Route::Stream { url: Some(path) }
        } else {
            Route::Detail { url: Some(path) }
        }
    }

    /// Stream route for an episode locator
    pub fn stream(locator: &str) -> Self {
        Route::Stream {
            url: Some(extract_path(locator)),
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Detail { url: Some(url) } => write!(f, "/detail?url={}", encode(url)),
            Route::Detail { url: None } => write!(f, "/detail"),
            Route::Stream { url: Some(url) } => write!(f, "/stream?url={}", encode(url)),
            Route::Stream { url: None } => write!(f, "/stream"),
            Route::Search { query } => write!(f, "/search?q={}", encode(query)),
            Route::Watchlist => write!(f, "/watchlist"),
        }
    }
}
