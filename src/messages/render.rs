//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{AppTab, AuthField, AuthMode, InputMode};
use crate::models::{
    CastMember, MovieDetails, MovieSummary, SavedMovie, Trailer, TrendingMovie, User,
};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub show_help: bool,

    // Session
    pub user: Option<User>,
    pub session_loading: bool,

    // Home tab
    pub trending: Option<Vec<TrendingMovie>>,
    pub trending_error: Option<String>,
    pub popular: Vec<MovieSummary>,
    pub popular_loading: bool,
    pub popular_loading_more: bool,
    pub popular_error: Option<String>,
    pub popular_has_more: bool,
    pub popular_selected: usize,
    pub refreshing: bool,

    // Search tab
    pub search_query: String,
    pub search_results: Vec<MovieSummary>,
    pub search_loading: bool,
    pub search_loading_more: bool,
    pub search_error: Option<String>,
    pub search_has_more: bool,
    pub search_selected: usize,
    /// Query of the last submitted search, None before the first one
    pub searched_query: Option<String>,

    // Saved tab
    pub saved: Vec<SavedMovie>,
    pub saved_loading: bool,
    pub saved_error: Option<String>,
    pub saved_selected: usize,

    // Details overlay
    pub details_open: bool,
    pub details: Option<MovieDetails>,
    pub details_loading: bool,
    pub details_error: Option<String>,
    pub trailers: Vec<Trailer>,
    pub cast: Vec<CastMember>,
    pub cast_loading: bool,
    pub details_scroll: u16,
    pub is_saved: bool,
    pub save_pending: bool,

    // Auth popup
    pub show_auth: bool,
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub auth_email: String,
    pub auth_password: String,
    pub auth_username: String,
    pub auth_submitting: bool,
    pub auth_error: Option<String>,
}
