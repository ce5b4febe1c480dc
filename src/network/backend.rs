//! Account & saved-movies backend client
//!
//! Talks to the hosted backend that owns accounts, sessions, saved-movie
//! records and the trending search counters. The app never inspects these
//! calls beyond resolve/reject; guest (no session) is a valid state, not an
//! error.

use serde::{Deserialize, Serialize};

use crate::constants::TRENDING_LIMIT;
use crate::models::{MovieSummary, SavedMovie, Session, TrendingMovie, User};
use crate::network::tmdb::describe_error;

/// Client for the account & saved-items backend
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    project: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    username: &'a str,
}

#[derive(Serialize)]
struct SaveMovieBody<'a> {
    movie_id: u64,
    title: &'a str,
    poster_path: Option<&'a str>,
    release_date: Option<&'a str>,
}

#[derive(Serialize)]
struct RecordSearchBody<'a> {
    search_term: &'a str,
    movie_id: u64,
    title: &'a str,
    poster_url: Option<String>,
}

#[derive(Deserialize)]
struct DocumentList<T> {
    documents: Vec<T>,
}

impl BackendClient {
    pub fn new(client: reqwest::Client, base_url: String, project: String) -> Self {
        BackendClient {
            client,
            base_url,
            project,
            token: None,
        }
    }

    /// Adopt (or drop) the session token used for authenticated calls
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method, url)
            .header("X-Marquee-Project", &self.project)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, String> {
        let response = builder.send().await.map_err(describe_error)?;
        if !response.status().is_success() {
            return Err(format!("Backend returned {}", response.status()));
        }
        Ok(response)
    }

    async fn json<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, String> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to decode backend response: {}", e))
    }

    // --- Sessions & accounts ---

    /// Create a session. Any existing session is deleted first; a failure
    /// there (usually "no session") is ignored.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(Session, Option<User>), String> {
        let _ = self
            .request(reqwest::Method::DELETE, "/sessions/current")
            .send()
            .await;

        let session: Session = self
            .json(
                self.request(reqwest::Method::POST, "/sessions")
                    .json(&SignInBody { email, password }),
            )
            .await?;

        let mut authed = self.clone();
        authed.set_token(Some(session.token.clone()));
        let user = authed.current_user().await?;
        Ok((session, user))
    }

    /// Create an account with its profile document, then sign in
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(Session, Option<User>), String> {
        let _ = self
            .request(reqwest::Method::DELETE, "/sessions/current")
            .send()
            .await;

        self.send(self.request(reqwest::Method::POST, "/accounts").json(
            &SignUpBody {
                email,
                password,
                username,
            },
        ))
        .await?;

        self.sign_in(email, password).await
    }

    /// The user behind the current session. Guests (no or expired session)
    /// resolve to `Ok(None)`.
    pub async fn current_user(&self) -> Result<Option<User>, String> {
        if self.token.is_none() {
            return Ok(None);
        }
        let response = self
            .request(reqwest::Method::GET, "/users/me")
            .send()
            .await
            .map_err(describe_error)?;

        match response.status() {
            s if s.is_success() => response
                .json::<User>()
                .await
                .map(Some)
                .map_err(|e| format!("Failed to decode backend response: {}", e)),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::NOT_FOUND => Ok(None),
            s => Err(format!("Backend returned {}", s)),
        }
    }

    pub async fn sign_out(&self) -> Result<(), String> {
        self.send(self.request(reqwest::Method::DELETE, "/sessions/current"))
            .await?;
        Ok(())
    }

    // --- Saved movies ---

    pub async fn saved_movies(&self, user_id: &str) -> Result<Vec<SavedMovie>, String> {
        let list: DocumentList<SavedMovie> = self
            .json(self.request(
                reqwest::Method::GET,
                &format!("/users/{}/saved", user_id),
            ))
            .await?;
        Ok(list.documents)
    }

    pub async fn save_movie(
        &self,
        user_id: &str,
        movie: &MovieSummary,
    ) -> Result<SavedMovie, String> {
        self.json(
            self.request(
                reqwest::Method::POST,
                &format!("/users/{}/saved", user_id),
            )
            .json(&SaveMovieBody {
                movie_id: movie.id,
                title: &movie.title,
                poster_path: movie.poster_path.as_deref(),
                release_date: movie.release_date.as_deref(),
            }),
        )
        .await
    }

    pub async fn unsave_movie(&self, record_id: &str) -> Result<(), String> {
        self.send(self.request(
            reqwest::Method::DELETE,
            &format!("/saved/{}", record_id),
        ))
        .await?;
        Ok(())
    }

    // --- Trending ---

    /// Top entries by search count
    pub async fn trending_movies(&self) -> Result<Vec<TrendingMovie>, String> {
        let limit = TRENDING_LIMIT.to_string();
        let list: DocumentList<TrendingMovie> = self
            .json(
                self.request(reqwest::Method::GET, "/trending")
                    .query(&[("limit", limit.as_str())]),
            )
            .await?;
        Ok(list.documents)
    }

    /// Upsert the search counter for a term. The backend increments the
    /// count if the term exists and creates the entry otherwise.
    pub async fn record_search(&self, query: &str, movie: &MovieSummary) -> Result<(), String> {
        self.send(
            self.request(reqwest::Method::POST, "/searches")
                .json(&RecordSearchBody {
                    search_term: query,
                    movie_id: movie.id,
                    title: &movie.title,
                    poster_url: movie.poster_url(),
                }),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_saved_movie_documents() {
        let json = r#"{
            "documents": [
                {"id": "rec_1", "movie_id": 550, "title": "Fight Club",
                 "poster_path": "/f.jpg", "release_date": "1999-10-15",
                 "saved_at": "2026-08-01T12:00:00Z"},
                {"id": "rec_2", "movie_id": 603, "title": "The Matrix"}
            ]
        }"#;
        let list: DocumentList<SavedMovie> = serde_json::from_str(json).unwrap();
        assert_eq!(list.documents.len(), 2);
        assert_eq!(list.documents[0].id, "rec_1");
        assert!(list.documents[0].saved_at.is_some());
        assert!(list.documents[1].saved_at.is_none());
    }

    #[test]
    fn test_parse_trending_documents() {
        let json = r#"{
            "documents": [
                {"movie_id": 550, "title": "Fight Club", "count": 14,
                 "search_term": "fight", "poster_url": "https://img/f.jpg"}
            ]
        }"#;
        let list: DocumentList<TrendingMovie> = serde_json::from_str(json).unwrap();
        assert_eq!(list.documents[0].count, 14);
    }

    #[test]
    fn test_current_user_without_token_is_guest() {
        // No session token means guest without any network round trip
        let client = BackendClient::new(
            reqwest::Client::new(),
            String::from("http://localhost:9"),
            String::from("test"),
        );
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let user = rt.block_on(client.current_user()).unwrap();
        assert!(user.is_none());
    }
}
