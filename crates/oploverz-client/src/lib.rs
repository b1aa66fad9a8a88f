//! Gateway library for the NextA Oploverz anime API.
//!
//! This library exposes the four read-only queries the client needs (home
//! feed, series detail, episode stream, search) behind the [`AnimeGateway`]
//! trait.

pub mod api;

pub use api::{AnimeGateway, ApiError, ApiResult, OploverzClient};
