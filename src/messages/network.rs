//! Network messages - communication between App and Network layers

use crate::fetch::RequestId;
use crate::models::{
    CastMember, MovieDetails, MovieSummary, SavedMovie, Session, Trailer, TrendingMovie, User,
};

/// Which paged list a movie-listing fetch belongs to. Two screens page
/// through movie listings independently; responses must land in the list
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Home tab: popular movies (empty query)
    Popular,
    /// Search tab: title search results
    Search,
}

/// Commands sent from App layer to Network layer.
///
/// Each fetch carries the request id issued by the owning resource; the
/// matching response echoes it back so stale results can be discarded.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// List movies: search by title when `query` is non-empty, otherwise
    /// popular movies sorted by popularity
    FetchMovies {
        id: RequestId,
        scope: ListScope,
        query: String,
        page: u32,
    },
    /// Top trending entries from the backend's search counters
    FetchTrending { id: RequestId },
    /// Full details for one movie
    FetchDetails { id: RequestId, movie_id: u64 },
    /// Official trailers for one movie
    FetchTrailers { id: RequestId, movie_id: u64 },
    /// Cast list for one movie
    FetchCredits { id: RequestId, movie_id: u64 },

    /// Saved movies of the signed-in user
    FetchSavedMovies { id: RequestId, user_id: String },
    /// Save a movie for the signed-in user
    SaveMovie {
        id: RequestId,
        user_id: String,
        movie: MovieSummary,
    },
    /// Delete a saved-movie record
    UnsaveMovie { id: RequestId, record_id: String },

    /// Create a session, then load the user profile
    SignIn {
        id: RequestId,
        email: String,
        password: String,
    },
    /// Create an account and its profile document, then sign in
    SignUp {
        id: RequestId,
        email: String,
        password: String,
        username: String,
    },
    /// Resolve the current session to a user; guests resolve to None
    FetchCurrentUser { id: RequestId },
    /// Delete the current session
    SignOut { id: RequestId },

    /// Adopt a session token for authenticated backend calls (or drop it)
    SetSession { token: Option<String> },
    /// Bump the backend's search counter for a term. Fire-and-forget:
    /// failures are logged, never surfaced.
    RecordSearch { query: String, movie: MovieSummary },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Movies {
        id: RequestId,
        scope: ListScope,
        result: Result<Vec<MovieSummary>, String>,
    },
    Trending {
        id: RequestId,
        result: Result<Vec<TrendingMovie>, String>,
    },
    Details {
        id: RequestId,
        result: Result<MovieDetails, String>,
    },
    Trailers {
        id: RequestId,
        result: Result<Vec<Trailer>, String>,
    },
    Credits {
        id: RequestId,
        result: Result<Vec<CastMember>, String>,
    },
    SavedMovies {
        id: RequestId,
        result: Result<Vec<SavedMovie>, String>,
    },
    MovieSaved {
        id: RequestId,
        result: Result<SavedMovie, String>,
    },
    MovieUnsaved {
        id: RequestId,
        record_id: String,
        result: Result<(), String>,
    },
    /// Session plus the freshly loaded profile (profile may be missing)
    SignedIn {
        id: RequestId,
        result: Result<(Session, Option<User>), String>,
    },
    SignedUp {
        id: RequestId,
        result: Result<(Session, Option<User>), String>,
    },
    CurrentUser {
        id: RequestId,
        result: Result<Option<User>, String>,
    },
    SignedOut {
        id: RequestId,
        result: Result<(), String>,
    },
}

impl NetworkResponse {
    /// The request id this response answers
    pub fn id(&self) -> RequestId {
        match self {
            NetworkResponse::Movies { id, .. } => *id,
            NetworkResponse::Trending { id, .. } => *id,
            NetworkResponse::Details { id, .. } => *id,
            NetworkResponse::Trailers { id, .. } => *id,
            NetworkResponse::Credits { id, .. } => *id,
            NetworkResponse::SavedMovies { id, .. } => *id,
            NetworkResponse::MovieSaved { id, .. } => *id,
            NetworkResponse::MovieUnsaved { id, .. } => *id,
            NetworkResponse::SignedIn { id, .. } => *id,
            NetworkResponse::SignedUp { id, .. } => *id,
            NetworkResponse::CurrentUser { id, .. } => *id,
            NetworkResponse::SignedOut { id, .. } => *id,
        }
    }
}
