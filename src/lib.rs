//! # Marquee TUI
//!
//! A terminal movie browser: trending and popular listings, full-text
//! search, a details view with trailers and cast, and a per-account saved
//! list.
//!
//! ## Features
//! - Trending movies ranked by what other users searched for
//! - Popular listing with incremental "load more" paging
//! - Full-text search that feeds the trending ranking
//! - Details view: trailers, cast, runtime, budget/revenue
//! - Save/unsave movies against a backend account
//! - Session persistence across runs
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod constants;
pub mod fetch;
pub mod messages;
pub mod models;
pub mod network;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use fetch::{PagedList, RefreshGroup, RequestId, Resource};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{MovieDetails, MovieSummary, SavedMovie, Session, TrendingMovie, User};
pub use network::NetworkActor;
pub use storage::Storage;
