//! Command handlers - business logic for processing UI events
//!
//! Handlers mutate state and return the network commands to issue; the app
//! actor forwards them to the network actor. `handle_response` feeds
//! results back into the fetch state machines and may itself return
//! follow-up commands (e.g. recording a search after results arrive).

use std::sync::OnceLock;

use regex::Regex;

use crate::app::AppState;
use crate::constants::PAGE_SIZE;
use crate::messages::network::{ListScope, NetworkCommand, NetworkResponse};
use crate::messages::ui_events::{AppTab, AuthField, AuthMode, InputMode};

/// Move-down this close to the end of a paged list triggers a load-more
const LOAD_MORE_THRESHOLD: usize = PAGE_SIZE / 4;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

impl AppState {
    // ========================
    // Startup
    // ========================

    /// Commands to issue when the app starts: resume the persisted session,
    /// resolve the current user, and load the Home tab's two sources.
    pub fn startup(&mut self) -> Vec<NetworkCommand> {
        let mut cmds = Vec::new();

        if let Some(session) = self.storage.load_session() {
            cmds.push(NetworkCommand::SetSession {
                token: Some(session.token),
            });
        }
        cmds.push(NetworkCommand::FetchCurrentUser {
            id: self.session.begin(),
        });

        cmds.push(NetworkCommand::FetchTrending {
            id: self.trending.begin(),
        });
        let req = self.popular.begin_initial();
        cmds.push(NetworkCommand::FetchMovies {
            id: req.id,
            scope: ListScope::Popular,
            query: String::new(),
            page: req.page,
        });

        cmds
    }

    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) -> Option<NetworkCommand> {
        self.active_tab = tab;
        self.input_mode = InputMode::Normal;

        // Entering Saved re-reads the list, mirroring a screen mount
        if tab == AppTab::Saved {
            if let Some(user_id) = self.user().map(|u| u.id.clone()) {
                return Some(NetworkCommand::FetchSavedMovies {
                    id: self.saved.begin(),
                    user_id,
                });
            }
        }
        None
    }

    pub fn move_up(&mut self) {
        match self.active_tab {
            AppTab::Home => self.popular_selected = self.popular_selected.saturating_sub(1),
            AppTab::Search => self.search_selected = self.search_selected.saturating_sub(1),
            AppTab::Saved => self.saved_selected = self.saved_selected.saturating_sub(1),
            AppTab::Profile => {}
        }
    }

    /// Move the cursor down; close to the end of a paged list this also
    /// kicks off the next page, like scrolling near the end of a feed.
    pub fn move_down(&mut self) -> Option<NetworkCommand> {
        match self.active_tab {
            AppTab::Home => {
                let len = self.popular.items().len();
                if len > 0 {
                    self.popular_selected = (self.popular_selected + 1).min(len - 1);
                    if self.popular_selected + LOAD_MORE_THRESHOLD >= len {
                        return self.load_more_popular();
                    }
                }
            }
            AppTab::Search => {
                let len = self.search.items().len();
                if len > 0 {
                    self.search_selected = (self.search_selected + 1).min(len - 1);
                    if self.search_selected + LOAD_MORE_THRESHOLD >= len {
                        return self.load_more_search();
                    }
                }
            }
            AppTab::Saved => {
                let len = self.saved.data().map(Vec::len).unwrap_or(0);
                if len > 0 {
                    self.saved_selected = (self.saved_selected + 1).min(len - 1);
                }
            }
            AppTab::Profile => {}
        }
        None
    }

    pub fn load_more(&mut self) -> Option<NetworkCommand> {
        match self.active_tab {
            AppTab::Home => self.load_more_popular(),
            AppTab::Search => self.load_more_search(),
            _ => None,
        }
    }

    fn load_more_popular(&mut self) -> Option<NetworkCommand> {
        let req = self.popular.begin_more()?;
        Some(NetworkCommand::FetchMovies {
            id: req.id,
            scope: ListScope::Popular,
            query: String::new(),
            page: req.page,
        })
    }

    fn load_more_search(&mut self) -> Option<NetworkCommand> {
        let query = self.searched_query.clone()?;
        let req = self.search.begin_more()?;
        Some(NetworkCommand::FetchMovies {
            id: req.id,
            scope: ListScope::Search,
            query,
            page: req.page,
        })
    }

    // ========================
    // Refresh
    // ========================

    /// User-initiated refresh of the active tab. On Home this re-runs the
    /// trending fetch and the popular list concurrently; `refreshing` ends
    /// only when both have settled, however they end.
    pub fn refresh(&mut self) -> Vec<NetworkCommand> {
        match self.active_tab {
            AppTab::Home => {
                self.refresh.start(2);

                let trending_id = self.trending.begin();
                self.refresh_trending_id = Some(trending_id);

                self.popular.reset();
                let req = self.popular.begin_initial();
                self.refresh_popular_id = Some(req.id);

                vec![
                    NetworkCommand::FetchTrending { id: trending_id },
                    NetworkCommand::FetchMovies {
                        id: req.id,
                        scope: ListScope::Popular,
                        query: String::new(),
                        page: req.page,
                    },
                ]
            }
            AppTab::Saved => match self.user().map(|u| u.id.clone()) {
                Some(user_id) => vec![NetworkCommand::FetchSavedMovies {
                    id: self.saved.begin(),
                    user_id,
                }],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    // ========================
    // Search input
    // ========================

    pub fn start_search_input(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn stop_search_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn search_backspace(&mut self) {
        self.search_query.pop();
    }

    /// Submit the query. An empty query clears the results instead of
    /// fetching; zero hits is a valid empty state, not an error.
    pub fn submit_search(&mut self) -> Option<NetworkCommand> {
        self.input_mode = InputMode::Normal;
        let query = self.search_query.trim().to_string();

        self.search.reset();
        self.search_selected = 0;
        if query.is_empty() {
            self.searched_query = None;
            return None;
        }

        self.searched_query = Some(query.clone());
        let req = self.search.begin_initial();
        Some(NetworkCommand::FetchMovies {
            id: req.id,
            scope: ListScope::Search,
            query,
            page: req.page,
        })
    }

    // ========================
    // Details view
    // ========================

    pub fn open_details(&mut self) -> Vec<NetworkCommand> {
        let Some(movie_id) = self.selected_movie_id() else {
            return Vec::new();
        };

        self.details_open = true;
        self.details_movie_id = Some(movie_id);
        self.details_scroll = 0;

        let mut cmds = vec![
            NetworkCommand::FetchDetails {
                id: self.details.begin(),
                movie_id,
            },
            NetworkCommand::FetchTrailers {
                id: self.trailers.begin(),
                movie_id,
            },
            NetworkCommand::FetchCredits {
                id: self.cast.begin(),
                movie_id,
            },
        ];

        // The saved indicator needs the saved list; load it if we have a
        // user but no list yet
        if let Some(user_id) = self.user().map(|u| u.id.clone()) {
            if self.saved.data().is_none() && !self.saved.is_loading() {
                cmds.push(NetworkCommand::FetchSavedMovies {
                    id: self.saved.begin(),
                    user_id,
                });
            }
        }

        cmds
    }

    /// Tear down the details view. Resetting the resources invalidates any
    /// in-flight request ids, so late responses cannot repopulate a view
    /// that is gone.
    pub fn close_details(&mut self) {
        self.details_open = false;
        self.details_movie_id = None;
        self.details_scroll = 0;
        self.details.reset();
        self.trailers.reset();
        self.cast.reset();
        self.save_op.reset();
    }

    pub fn details_scroll_up(&mut self) {
        self.details_scroll = self.details_scroll.saturating_sub(1);
    }

    pub fn details_scroll_down(&mut self) {
        self.details_scroll = self.details_scroll.saturating_add(1);
    }

    /// Save or unsave the movie in the details view. Guests and an
    /// already-pending operation are no-ops.
    pub fn toggle_saved(&mut self) -> Option<NetworkCommand> {
        if self.save_op.is_loading() {
            return None;
        }
        let user_id = self.user().map(|u| u.id.clone())?;

        if let Some(record) = self.saved_record_for_details() {
            let record_id = record.id.clone();
            Some(NetworkCommand::UnsaveMovie {
                id: self.save_op.begin(),
                record_id,
            })
        } else {
            let movie = self.details.data()?.to_summary();
            Some(NetworkCommand::SaveMovie {
                id: self.save_op.begin(),
                user_id,
                movie,
            })
        }
    }

    // ========================
    // Auth popup
    // ========================

    pub fn open_auth(&mut self, mode: AuthMode) {
        self.show_auth = true;
        self.auth_mode = mode;
        self.auth_field = AuthField::Email;
        self.auth_email.clear();
        self.auth_password.clear();
        self.auth_username.clear();
        self.auth_op.reset();
    }

    pub fn auth_char(&mut self, c: char) {
        match self.auth_field {
            AuthField::Email => self.auth_email.push(c),
            AuthField::Password => self.auth_password.push(c),
            AuthField::Username => self.auth_username.push(c),
        }
    }

    pub fn auth_backspace(&mut self) {
        match self.auth_field {
            AuthField::Email => self.auth_email.pop(),
            AuthField::Password => self.auth_password.pop(),
            AuthField::Username => self.auth_username.pop(),
        };
    }

    pub fn auth_next_field(&mut self) {
        self.auth_field = self.auth_field.next(self.auth_mode);
    }

    pub fn auth_cancel(&mut self) {
        self.show_auth = false;
        self.auth_op.reset();
    }

    /// Validate and submit the auth form. Validation failures surface in
    /// the popup without any network call.
    pub fn auth_submit(&mut self) -> Option<NetworkCommand> {
        if self.auth_op.is_loading() {
            return None;
        }

        let email = self.auth_email.trim().to_string();
        let password = self.auth_password.clone();
        let username = self.auth_username.trim().to_string();

        if email.is_empty()
            || password.is_empty()
            || (self.auth_mode == AuthMode::SignUp && username.is_empty())
        {
            self.auth_op.reject_local("Please fill in all fields");
            return None;
        }
        if !email_regex().is_match(&email) {
            self.auth_op.reject_local("Please enter a valid email address");
            return None;
        }

        let id = self.auth_op.begin();
        Some(match self.auth_mode {
            AuthMode::SignIn => NetworkCommand::SignIn {
                id,
                email,
                password,
            },
            AuthMode::SignUp => NetworkCommand::SignUp {
                id,
                email,
                password,
                username,
            },
        })
    }

    // ========================
    // Profile
    // ========================

    pub fn sign_out(&mut self) -> Option<NetworkCommand> {
        self.user()?;
        Some(NetworkCommand::SignOut {
            id: self.session.begin(),
        })
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network responses
    // ========================

    /// Feed a network response into the owning state machine. Stale ids are
    /// discarded inside the machines; follow-up commands (session adoption,
    /// search recording, saved-list sync) are returned to the actor.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        let mut follow_ups = Vec::new();

        match response {
            NetworkResponse::Movies {
                id,
                scope: ListScope::Popular,
                result,
            } => {
                self.popular.resolve(id, result);
                if self.refresh_popular_id == Some(id) {
                    self.refresh_popular_id = None;
                    self.refresh.settle_one();
                }
                self.popular_selected = clamp_index(self.popular_selected, self.popular.items().len());
            }
            NetworkResponse::Movies {
                id,
                scope: ListScope::Search,
                result,
            } => {
                let was_initial = self.search.is_loading();
                self.search.resolve(id, result);
                self.search_selected = clamp_index(self.search_selected, self.search.items().len());

                // A fresh page of results bumps the backend's trending
                // counter for this term
                if was_initial && !self.search.is_loading() && self.search.error().is_none() {
                    if let (Some(query), Some(first)) =
                        (self.searched_query.clone(), self.search.items().first())
                    {
                        follow_ups.push(NetworkCommand::RecordSearch {
                            query,
                            movie: first.clone(),
                        });
                    }
                }
            }
            NetworkResponse::Trending { id, result } => {
                self.trending.resolve(id, result);
                if self.refresh_trending_id == Some(id) {
                    self.refresh_trending_id = None;
                    self.refresh.settle_one();
                }
            }
            NetworkResponse::Details { id, result } => self.details.resolve(id, result),
            NetworkResponse::Trailers { id, result } => self.trailers.resolve(id, result),
            NetworkResponse::Credits { id, result } => self.cast.resolve(id, result),
            NetworkResponse::SavedMovies { id, result } => {
                self.saved.resolve(id, result);
                let len = self.saved.data().map(Vec::len).unwrap_or(0);
                self.saved_selected = clamp_index(self.saved_selected, len);
            }
            NetworkResponse::MovieSaved { id, result } => match result {
                Ok(record) => {
                    let was_pending = self.save_op.is_loading();
                    self.save_op.resolve(id, Ok(()));
                    // Mirror into the local list only when this confirmation
                    // was the pending one; a superseded or torn-down save may
                    // already be in the list via a refetch
                    let applied = was_pending && !self.save_op.is_loading();
                    if applied && self.saved.data().is_none() {
                        // No local list to mirror into; re-read it
                        if let Some(user_id) = self.user().map(|u| u.id.clone()) {
                            follow_ups.push(NetworkCommand::FetchSavedMovies {
                                id: self.saved.begin(),
                                user_id,
                            });
                        }
                    } else if applied {
                        if let Some(list) = self.saved.data_mut() {
                            if !list.iter().any(|saved| saved.id == record.id) {
                                list.push(record);
                            }
                        }
                    }
                }
                Err(e) => self.save_op.resolve(id, Err(e)),
            },
            NetworkResponse::MovieUnsaved {
                id,
                record_id,
                result,
            } => match result {
                Ok(()) => {
                    self.save_op.resolve(id, Ok(()));
                    if let Some(list) = self.saved.data_mut() {
                        list.retain(|record| record.id != record_id);
                    }
                    let len = self.saved.data().map(Vec::len).unwrap_or(0);
                    self.saved_selected = clamp_index(self.saved_selected, len);
                }
                Err(e) => self.save_op.resolve(id, Err(e)),
            },
            NetworkResponse::SignedIn { id, result }
            | NetworkResponse::SignedUp { id, result } => match result {
                Ok((session, user)) => {
                    self.auth_op.resolve(id, Ok(()));
                    self.show_auth = false;
                    self.auth_password.clear();

                    if let Err(e) = self.storage.save_session(&session) {
                        tracing::warn!("failed to persist session: {}", e);
                    }
                    follow_ups.push(NetworkCommand::SetSession {
                        token: Some(session.token),
                    });

                    let user_id = user.as_ref().map(|u| u.id.clone());
                    self.adopt_user(user);
                    if let Some(user_id) = user_id {
                        follow_ups.push(NetworkCommand::FetchSavedMovies {
                            id: self.saved.begin(),
                            user_id,
                        });
                    }
                }
                Err(e) => self.auth_op.resolve(id, Err(e)),
            },
            NetworkResponse::CurrentUser { id, result } => {
                let resolved_guest = matches!(result, Ok(None));
                self.session.resolve(id, result);
                if resolved_guest {
                    // Persisted session no longer valid; forget it
                    if let Err(e) = self.storage.clear_session() {
                        tracing::warn!("failed to clear session: {}", e);
                    }
                    follow_ups.push(NetworkCommand::SetSession { token: None });
                } else if let Some(user_id) = self.user().map(|u| u.id.clone()) {
                    follow_ups.push(NetworkCommand::FetchSavedMovies {
                        id: self.saved.begin(),
                        user_id,
                    });
                }
            }
            NetworkResponse::SignedOut { id, result } => match result {
                Ok(()) => {
                    self.session.resolve(id, Ok(None));
                    self.saved.reset();
                    self.saved_selected = 0;
                    if let Err(e) = self.storage.clear_session() {
                        tracing::warn!("failed to clear session: {}", e);
                    }
                    follow_ups.push(NetworkCommand::SetSession { token: None });
                }
                Err(e) => self.session.resolve(id, Err(e)),
            },
        }

        follow_ups
    }

    /// Adopt a user resolved outside the session resource's own fetch
    /// cycle (sign-in/sign-up responses)
    fn adopt_user(&mut self, user: Option<crate::models::User>) {
        let id = self.session.begin();
        self.session.resolve(id, Ok(user));
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieSummary, SavedMovie, Session, User};
    use crate::storage::Storage;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(Storage::with_dir(dir.path().to_path_buf()));
        (state, dir)
    }

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            poster_path: None,
            release_date: None,
            vote_average: 0.0,
        }
    }

    fn details(id: u64, title: &str) -> crate::models::MovieDetails {
        crate::models::MovieDetails {
            id,
            title: String::from(title),
            overview: String::new(),
            tagline: None,
            poster_path: None,
            release_date: None,
            runtime: None,
            vote_average: 0.0,
            vote_count: 0,
            genres: vec![],
            budget: 0,
            revenue: 0,
        }
    }

    fn saved_record(record_id: &str, movie_id: u64, title: &str) -> SavedMovie {
        SavedMovie {
            id: String::from(record_id),
            movie_id,
            title: String::from(title),
            poster_path: None,
            release_date: None,
            saved_at: None,
        }
    }

    fn user() -> User {
        User {
            id: String::from("u1"),
            account_id: String::from("a1"),
            username: String::from("casey"),
            avatar_url: None,
            email: None,
        }
    }

    fn signed_in_state() -> (AppState, tempfile::TempDir) {
        let (mut state, dir) = test_state();
        let session = Session {
            id: String::from("s1"),
            token: String::from("tok"),
        };
        let id = state.auth_op.begin();
        state.handle_response(NetworkResponse::SignedIn {
            id,
            result: Ok((session, Some(user()))),
        });
        (state, dir)
    }

    #[test]
    fn test_startup_issues_session_and_home_fetches() {
        let (mut state, _dir) = test_state();
        let cmds = state.startup();
        assert!(cmds
            .iter()
            .any(|c| matches!(c, NetworkCommand::FetchCurrentUser { .. })));
        assert!(cmds
            .iter()
            .any(|c| matches!(c, NetworkCommand::FetchTrending { .. })));
        assert!(cmds.iter().any(|c| matches!(
            c,
            NetworkCommand::FetchMovies {
                scope: ListScope::Popular,
                page: 1,
                ..
            }
        )));
        assert!(state.popular.is_loading());
        assert!(state.session.is_loading());
    }

    #[test]
    fn test_refresh_settles_only_when_both_sources_settle() {
        let (mut state, _dir) = test_state();
        let cmds = state.refresh();
        assert_eq!(cmds.len(), 2);
        assert!(state.refresh.is_refreshing());

        let trending_id = state.refresh_trending_id.unwrap();
        let popular_id = state.refresh_popular_id.unwrap();

        // Trending fails, popular succeeds: refresh still completes and
        // each source keeps its own outcome
        state.handle_response(NetworkResponse::Trending {
            id: trending_id,
            result: Err(String::from("backend down")),
        });
        assert!(state.refresh.is_refreshing());

        state.handle_response(NetworkResponse::Movies {
            id: popular_id,
            scope: ListScope::Popular,
            result: Ok(vec![movie(1), movie(2)]),
        });
        assert!(!state.refresh.is_refreshing());
        assert_eq!(state.trending.error(), Some("backend down"));
        assert_eq!(state.popular.items().len(), 2);
        assert_eq!(state.popular.page(), 1);
    }

    #[test]
    fn test_stale_popular_response_is_discarded() {
        let (mut state, _dir) = test_state();
        state.startup();
        let stale_id = 1; // id of the startup fetch
        state.refresh(); // supersedes it

        state.handle_response(NetworkResponse::Movies {
            id: stale_id,
            scope: ListScope::Popular,
            result: Ok(vec![movie(99)]),
        });
        assert!(state.popular.items().is_empty());
        assert!(state.popular.is_loading());
    }

    #[test]
    fn test_submit_search_records_first_hit() {
        let (mut state, _dir) = test_state();
        state.active_tab = AppTab::Search;
        state.search_query = String::from("matrix");
        let cmd = state.submit_search().unwrap();
        let NetworkCommand::FetchMovies { id, .. } = cmd else {
            panic!("expected movie fetch");
        };

        let follow_ups = state.handle_response(NetworkResponse::Movies {
            id,
            scope: ListScope::Search,
            result: Ok(vec![movie(603), movie(604)]),
        });
        assert!(matches!(
            follow_ups.as_slice(),
            [NetworkCommand::RecordSearch { query, movie }]
                if query == "matrix" && movie.id == 603
        ));
    }

    #[test]
    fn test_empty_search_clears_without_fetch() {
        let (mut state, _dir) = test_state();
        state.active_tab = AppTab::Search;
        state.search_query = String::from("   ");
        assert!(state.submit_search().is_none());
        assert!(state.searched_query.is_none());
        assert!(!state.search.is_loading());
    }

    #[test]
    fn test_guest_cannot_toggle_saved() {
        let (mut state, _dir) = test_state();
        state.details_open = true;
        state.details_movie_id = Some(550);
        assert!(state.toggle_saved().is_none());
    }

    #[test]
    fn test_save_then_unsave_roundtrip() {
        let (mut state, _dir) = signed_in_state();
        // Saved list arrived empty
        let id = state.saved.begin();
        state.handle_response(NetworkResponse::SavedMovies {
            id,
            result: Ok(vec![]),
        });

        // Open details with a loaded movie
        state.details_open = true;
        state.details_movie_id = Some(550);
        let details_id = state.details.begin();
        state.handle_response(NetworkResponse::Details {
            id: details_id,
            result: Ok(details(550, "Fight Club")),
        });

        let cmd = state.toggle_saved().unwrap();
        let NetworkCommand::SaveMovie { id, .. } = cmd else {
            panic!("expected save");
        };
        // Pending save blocks a second toggle
        assert!(state.toggle_saved().is_none());

        state.handle_response(NetworkResponse::MovieSaved {
            id,
            result: Ok(saved_record("rec_1", 550, "Fight Club")),
        });
        assert!(state.saved_record_for_details().is_some());

        let cmd = state.toggle_saved().unwrap();
        let NetworkCommand::UnsaveMovie { id, record_id } = cmd else {
            panic!("expected unsave");
        };
        assert_eq!(record_id, "rec_1");
        state.handle_response(NetworkResponse::MovieUnsaved {
            id,
            record_id,
            result: Ok(()),
        });
        assert!(state.saved_record_for_details().is_none());
    }

    #[test]
    fn test_late_save_confirmation_does_not_duplicate_record() {
        let (mut state, _dir) = signed_in_state();
        let id = state.saved.begin();
        state.handle_response(NetworkResponse::SavedMovies {
            id,
            result: Ok(vec![]),
        });

        state.details_open = true;
        state.details_movie_id = Some(550);
        let details_id = state.details.begin();
        state.handle_response(NetworkResponse::Details {
            id: details_id,
            result: Ok(details(550, "Fight Club")),
        });
        let Some(NetworkCommand::SaveMovie { id: save_id, .. }) = state.toggle_saved() else {
            panic!("expected save");
        };

        // View torn down before the confirmation lands, and a refetch has
        // already brought the committed record back
        state.close_details();
        let refetch_id = state.saved.begin();
        state.handle_response(NetworkResponse::SavedMovies {
            id: refetch_id,
            result: Ok(vec![saved_record("rec_1", 550, "Fight Club")]),
        });

        state.handle_response(NetworkResponse::MovieSaved {
            id: save_id,
            result: Ok(saved_record("rec_1", 550, "Fight Club")),
        });
        let records: Vec<&str> = state
            .saved
            .data()
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(records, ["rec_1"]);
    }

    #[test]
    fn test_auth_validation_blocks_fetch() {
        let (mut state, _dir) = test_state();
        state.open_auth(AuthMode::SignIn);
        assert!(state.auth_submit().is_none());
        assert_eq!(state.auth_op.error(), Some("Please fill in all fields"));

        state.auth_email = String::from("not-an-email");
        state.auth_password = String::from("hunter2");
        assert!(state.auth_submit().is_none());
        assert_eq!(
            state.auth_op.error(),
            Some("Please enter a valid email address")
        );

        state.auth_email = String::from("casey@example.com");
        assert!(matches!(
            state.auth_submit(),
            Some(NetworkCommand::SignIn { .. })
        ));
    }

    #[test]
    fn test_sign_in_failure_keeps_popup_with_error() {
        let (mut state, _dir) = test_state();
        state.open_auth(AuthMode::SignIn);
        state.auth_email = String::from("casey@example.com");
        state.auth_password = String::from("wrong");
        let Some(NetworkCommand::SignIn { id, .. }) = state.auth_submit() else {
            panic!("expected sign-in command");
        };

        state.handle_response(NetworkResponse::SignedIn {
            id,
            result: Err(String::from("Backend returned 401 Unauthorized")),
        });
        assert!(state.show_auth);
        assert!(state.auth_op.error().is_some());
        assert!(state.user().is_none());
    }

    #[test]
    fn test_sign_in_success_adopts_session_and_prefetches_saved() {
        let (mut state, _dir) = test_state();
        state.open_auth(AuthMode::SignIn);
        state.auth_email = String::from("casey@example.com");
        state.auth_password = String::from("hunter2");
        let Some(NetworkCommand::SignIn { id, .. }) = state.auth_submit() else {
            panic!("expected sign-in command");
        };

        let session = Session {
            id: String::from("s1"),
            token: String::from("tok"),
        };
        let follow_ups = state.handle_response(NetworkResponse::SignedIn {
            id,
            result: Ok((session, Some(user()))),
        });

        assert!(!state.show_auth);
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("casey"));
        assert!(state.storage.load_session().is_some());
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, NetworkCommand::SetSession { token: Some(_) })));
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, NetworkCommand::FetchSavedMovies { .. })));
    }

    #[test]
    fn test_sign_out_clears_session_and_saved() {
        let (mut state, _dir) = signed_in_state();
        let id = state.saved.begin();
        state.handle_response(NetworkResponse::SavedMovies {
            id,
            result: Ok(vec![saved_record("rec_1", 550, "Fight Club")]),
        });

        let Some(NetworkCommand::SignOut { id }) = state.sign_out() else {
            panic!("expected sign-out command");
        };
        let follow_ups = state.handle_response(NetworkResponse::SignedOut {
            id,
            result: Ok(()),
        });

        assert!(state.user().is_none());
        assert!(state.saved.data().is_none());
        assert!(state.storage.load_session().is_none());
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, NetworkCommand::SetSession { token: None })));
    }

    #[test]
    fn test_expired_session_resolves_to_guest_and_forgets_token() {
        let (mut state, _dir) = test_state();
        state
            .storage
            .save_session(&Session {
                id: String::from("s1"),
                token: String::from("expired"),
            })
            .unwrap();

        let cmds = state.startup();
        let id = cmds
            .iter()
            .find_map(|c| match c {
                NetworkCommand::FetchCurrentUser { id } => Some(*id),
                _ => None,
            })
            .unwrap();

        let follow_ups = state.handle_response(NetworkResponse::CurrentUser {
            id,
            result: Ok(None),
        });
        assert!(state.user().is_none());
        assert!(state.session.error().is_none());
        assert!(state.storage.load_session().is_none());
        assert!(follow_ups
            .iter()
            .any(|c| matches!(c, NetworkCommand::SetSession { token: None })));
    }

    #[test]
    fn test_closing_details_discards_late_response() {
        let (mut state, _dir) = test_state();
        state.popular_selected = 0;
        let id = state.popular.begin_initial().id;
        state.handle_response(NetworkResponse::Movies {
            id,
            scope: ListScope::Popular,
            result: Ok(vec![movie(550)]),
        });

        let cmds = state.open_details();
        let details_id = cmds
            .iter()
            .find_map(|c| match c {
                NetworkCommand::FetchDetails { id, .. } => Some(*id),
                _ => None,
            })
            .unwrap();

        state.close_details();
        state.handle_response(NetworkResponse::Details {
            id: details_id,
            result: Ok(details(550, "Fight Club")),
        });
        assert!(state.details.data().is_none());
        assert!(!state.details.is_loading());
    }

    #[test]
    fn test_move_down_near_end_loads_next_page() {
        let (mut state, _dir) = test_state();
        let id = state.popular.begin_initial().id;
        state.handle_response(NetworkResponse::Movies {
            id,
            scope: ListScope::Popular,
            result: Ok((0..20).map(movie).collect()),
        });

        // Far from the end: no fetch
        assert!(state.move_down().is_none());
        // Jump near the end: next move issues page 2
        state.popular_selected = 14;
        let cmd = state.move_down();
        assert!(matches!(
            cmd,
            Some(NetworkCommand::FetchMovies {
                scope: ListScope::Popular,
                page: 2,
                ..
            })
        ));
        // And only once while in flight
        assert!(state.move_down().is_none());
    }
}
