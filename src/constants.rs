//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Base URL of the movie metadata API
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Base URL for poster/profile images (w500 rendition)
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default endpoint of the account & saved-movies backend
pub const DEFAULT_BACKEND_URL: &str = "https://cloud.appwrite.io/v1";

/// Number of movies per listing page, fixed by the metadata API
pub const PAGE_SIZE: usize = 20;

/// How many trending entries the backend returns
pub const TRENDING_LIMIT: usize = 5;

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Marquee TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
