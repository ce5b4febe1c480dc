//! App state - pure data structure with no I/O logic
//!
//! Owns every screen's fetch state machines plus the process-wide session.
//! The session lives only here (the app actor's single thread) and reaches
//! the UI through `RenderState` snapshots; there is no ambient global.

use crate::fetch::{PagedList, RefreshGroup, RequestId, Resource};
use crate::messages::ui_events::{AppTab, AuthField, AuthMode, InputMode};
use crate::messages::RenderState;
use crate::models::{
    CastMember, MovieDetails, MovieSummary, SavedMovie, Trailer, TrendingMovie, User,
};
use crate::storage::Storage;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Tab navigation
    pub active_tab: AppTab,
    pub input_mode: InputMode,
    pub show_help: bool,

    // Session (current user; None inside the data means guest)
    pub session: Resource<Option<User>>,
    pub storage: Storage,

    // Home tab
    pub trending: Resource<Vec<TrendingMovie>>,
    pub popular: PagedList<MovieSummary>,
    pub refresh: RefreshGroup,
    /// Ids of the fetches issued by the current refresh, so only their
    /// settlement ends the refreshing state
    pub refresh_trending_id: Option<RequestId>,
    pub refresh_popular_id: Option<RequestId>,
    pub popular_selected: usize,

    // Search tab
    pub search_query: String,
    pub searched_query: Option<String>,
    pub search: PagedList<MovieSummary>,
    pub search_selected: usize,

    // Saved tab (also backs the details view's saved indicator)
    pub saved: Resource<Vec<SavedMovie>>,
    pub saved_selected: usize,

    // Details overlay
    pub details_open: bool,
    pub details_movie_id: Option<u64>,
    pub details: Resource<MovieDetails>,
    pub trailers: Resource<Vec<Trailer>>,
    pub cast: Resource<Vec<CastMember>>,
    pub details_scroll: u16,
    /// In-flight save or unsave; loading doubles as the pending flag
    pub save_op: Resource<()>,

    // Auth popup
    pub show_auth: bool,
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub auth_email: String,
    pub auth_password: String,
    pub auth_username: String,
    /// In-flight sign-in/sign-up; error slot holds validation and backend
    /// failures alike
    pub auth_op: Resource<()>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Storage::default())
    }
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        AppState {
            active_tab: AppTab::Home,
            input_mode: InputMode::Normal,
            show_help: false,
            session: Resource::new(),
            storage,
            trending: Resource::new(),
            popular: PagedList::new(),
            refresh: RefreshGroup::new(),
            refresh_trending_id: None,
            refresh_popular_id: None,
            popular_selected: 0,
            search_query: String::new(),
            searched_query: None,
            search: PagedList::new(),
            search_selected: 0,
            saved: Resource::new(),
            saved_selected: 0,
            details_open: false,
            details_movie_id: None,
            details: Resource::new(),
            trailers: Resource::new(),
            cast: Resource::new(),
            details_scroll: 0,
            save_op: Resource::new(),
            show_auth: false,
            auth_mode: AuthMode::SignIn,
            auth_field: AuthField::Email,
            auth_email: String::new(),
            auth_password: String::new(),
            auth_username: String::new(),
            auth_op: Resource::new(),
        }
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<&User> {
        self.session.data().and_then(|u| u.as_ref())
    }

    /// Saved record for the movie currently in the details view
    pub fn saved_record_for_details(&self) -> Option<&SavedMovie> {
        let movie_id = self.details_movie_id?;
        self.saved
            .data()?
            .iter()
            .find(|record| record.movie_id == movie_id)
    }

    /// Movie id under the cursor on the active tab
    pub fn selected_movie_id(&self) -> Option<u64> {
        match self.active_tab {
            AppTab::Home => self
                .popular
                .items()
                .get(self.popular_selected)
                .map(|m| m.id),
            AppTab::Search => self
                .search
                .items()
                .get(self.search_selected)
                .map(|m| m.id),
            AppTab::Saved => self
                .saved
                .data()?
                .get(self.saved_selected)
                .map(|m| m.movie_id),
            AppTab::Profile => None,
        }
    }

    /// Convert state to RenderState for the UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_tab: self.active_tab,
            input_mode: self.input_mode,
            show_help: self.show_help,

            user: self.user().cloned(),
            session_loading: self.session.is_loading(),

            trending: self.trending.data().cloned(),
            trending_error: self.trending.error().map(String::from),
            popular: self.popular.items().to_vec(),
            popular_loading: self.popular.is_loading(),
            popular_loading_more: self.popular.is_loading_more(),
            popular_error: self.popular.error().map(String::from),
            popular_has_more: self.popular.has_more(),
            popular_selected: self.popular_selected,
            refreshing: self.refresh.is_refreshing(),

            search_query: self.search_query.clone(),
            search_results: self.search.items().to_vec(),
            search_loading: self.search.is_loading(),
            search_loading_more: self.search.is_loading_more(),
            search_error: self.search.error().map(String::from),
            search_has_more: self.search.has_more(),
            search_selected: self.search_selected,
            searched_query: self.searched_query.clone(),

            saved: self.saved.data().cloned().unwrap_or_default(),
            saved_loading: self.saved.is_loading(),
            saved_error: self.saved.error().map(String::from),
            saved_selected: self.saved_selected,

            details_open: self.details_open,
            details: self.details.data().cloned(),
            details_loading: self.details.is_loading(),
            details_error: self.details.error().map(String::from),
            trailers: self.trailers.data().cloned().unwrap_or_default(),
            cast: self.cast.data().cloned().unwrap_or_default(),
            cast_loading: self.cast.is_loading(),
            details_scroll: self.details_scroll,
            is_saved: self.saved_record_for_details().is_some(),
            save_pending: self.save_op.is_loading(),

            show_auth: self.show_auth,
            auth_mode: self.auth_mode,
            auth_field: self.auth_field,
            auth_email: self.auth_email.clone(),
            auth_password: self.auth_password.clone(),
            auth_username: self.auth_username.clone(),
            auth_submitting: self.auth_op.is_loading(),
            auth_error: self.auth_op.error().map(String::from),
        }
    }
}
