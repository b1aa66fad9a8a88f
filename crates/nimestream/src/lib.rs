//! NimeStream client library.
//!
//! Routes, the view state behind each screen, cancellable timers and plain-text
//! rendering. The binary in `main.rs` wires these to the gateway and the
//! watchlist store.

pub mod render;
pub mod routes;
pub mod screens;
pub mod tasks;

pub use routes::{Route, RouteError};
pub use screens::{DetailScreen, HomeScreen, SearchScreen, StreamScreen, ViewState, WatchlistScreen};
pub use tasks::ScheduledTask;
