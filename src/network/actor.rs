//! Network actor - runs all HTTP fetches in the Tokio async runtime
//!
//! Commands arrive from the app actor, each fetch is spawned on a JoinSet,
//! and the result goes back as a `NetworkResponse` tagged with the request
//! id of the command. In-flight requests are never cancelled; superseded
//! results are discarded by id on the app side.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::{BackendClient, TmdbClient};
use crate::storage::AppConfig;

/// Network actor that processes fetch commands
pub struct NetworkActor {
    tmdb: TmdbClient,
    backend: BackendClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    tasks: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, config: &AppConfig) -> Self {
        let client = create_client();
        NetworkActor {
            tmdb: TmdbClient::new(client.clone(), config.tmdb_api_key.clone()),
            backend: BackendClient::new(
                client,
                config.backend_url.clone(),
                config.backend_project.clone(),
            ),
            response_tx,
            tasks: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => break,
                        Some(NetworkCommand::SetSession { token }) => {
                            self.backend.set_token(token);
                        }
                        Some(cmd) => self.dispatch(cmd),
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.tasks.join_next() => {}
            }
        }
    }

    /// Spawn the fetch for one command
    fn dispatch(&mut self, cmd: NetworkCommand) {
        let tx = self.response_tx.clone();
        match cmd {
            NetworkCommand::FetchMovies {
                id,
                scope,
                query,
                page,
            } => {
                let tmdb = self.tmdb.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, ?scope, %query, page, "fetching movies");
                    let result = tmdb.fetch_movies(&query, page).await;
                    let _ = tx.send(NetworkResponse::Movies { id, scope, result });
                });
            }
            NetworkCommand::FetchTrending { id } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, "fetching trending");
                    let result = backend.trending_movies().await;
                    let _ = tx.send(NetworkResponse::Trending { id, result });
                });
            }
            NetworkCommand::FetchDetails { id, movie_id } => {
                let tmdb = self.tmdb.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, movie_id, "fetching details");
                    let result = tmdb.fetch_movie_details(movie_id).await;
                    let _ = tx.send(NetworkResponse::Details { id, result });
                });
            }
            NetworkCommand::FetchTrailers { id, movie_id } => {
                let tmdb = self.tmdb.clone();
                self.tasks.spawn(async move {
                    let result = tmdb.fetch_movie_trailers(movie_id).await;
                    let _ = tx.send(NetworkResponse::Trailers { id, result });
                });
            }
            NetworkCommand::FetchCredits { id, movie_id } => {
                let tmdb = self.tmdb.clone();
                self.tasks.spawn(async move {
                    let result = tmdb.fetch_movie_credits(movie_id).await;
                    let _ = tx.send(NetworkResponse::Credits { id, result });
                });
            }
            NetworkCommand::FetchSavedMovies { id, user_id } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, %user_id, "fetching saved movies");
                    let result = backend.saved_movies(&user_id).await;
                    let _ = tx.send(NetworkResponse::SavedMovies { id, result });
                });
            }
            NetworkCommand::SaveMovie { id, user_id, movie } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, movie_id = movie.id, "saving movie");
                    let result = backend.save_movie(&user_id, &movie).await;
                    let _ = tx.send(NetworkResponse::MovieSaved { id, result });
                });
            }
            NetworkCommand::UnsaveMovie { id, record_id } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, %record_id, "unsaving movie");
                    let result = backend.unsave_movie(&record_id).await;
                    let _ = tx.send(NetworkResponse::MovieUnsaved {
                        id,
                        record_id,
                        result,
                    });
                });
            }
            NetworkCommand::SignIn {
                id,
                email,
                password,
            } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, "signing in");
                    let result = backend.sign_in(&email, &password).await;
                    let _ = tx.send(NetworkResponse::SignedIn { id, result });
                });
            }
            NetworkCommand::SignUp {
                id,
                email,
                password,
                username,
            } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, "creating account");
                    let result = backend.create_account(&email, &password, &username).await;
                    let _ = tx.send(NetworkResponse::SignedUp { id, result });
                });
            }
            NetworkCommand::FetchCurrentUser { id } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, "resolving current user");
                    let result = backend.current_user().await;
                    let _ = tx.send(NetworkResponse::CurrentUser { id, result });
                });
            }
            NetworkCommand::SignOut { id } => {
                let backend = self.backend.clone();
                self.tasks.spawn(async move {
                    tracing::info!(id, "signing out");
                    let result = backend.sign_out().await;
                    let _ = tx.send(NetworkResponse::SignedOut { id, result });
                });
            }
            NetworkCommand::RecordSearch { query, movie } => {
                let backend = self.backend.clone();
                // Fire-and-forget: no response message, failures only logged
                self.tasks.spawn(async move {
                    if let Err(e) = backend.record_search(&query, &movie).await {
                        tracing::warn!(%query, "failed to record search: {}", e);
                    }
                });
            }
            NetworkCommand::SetSession { .. } | NetworkCommand::Shutdown => {
                // Handled in the run loop
            }
        }
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
