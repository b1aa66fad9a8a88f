//! Oploverz API client implementation.
//!
//! This module provides the HTTP gateway to the NextA Oploverz API and the
//! response types it returns.

pub mod client;
pub mod types;

pub use client::{AnimeGateway, ApiError, ApiResult, Endpoint, OploverzClient, DEFAULT_BASE_URL};
pub use types::*;
