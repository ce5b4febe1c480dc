//! Movie metadata client - listing/search, details, trailers and credits
//!
//! Errors are mapped to display strings at this boundary; callers only see
//! whether a fetch resolved or failed.

use serde::Deserialize;

use crate::constants::TMDB_BASE_URL;
use crate::models::{CastMember, MovieDetails, MovieSummary, Trailer};

/// Client for the TMDB-style movie metadata API
#[derive(Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct MovieListResponse {
    results: Vec<MovieSummary>,
}

#[derive(Deserialize)]
struct VideoListResponse {
    results: Vec<Trailer>,
}

#[derive(Deserialize)]
struct CreditsResponse {
    cast: Vec<CastMember>,
}

impl TmdbClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, String::from(TMDB_BASE_URL))
    }

    pub fn with_base_url(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        TmdbClient {
            client,
            base_url,
            api_key,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(describe_error)?;

        if !response.status().is_success() {
            return Err(format!("Movie API returned {}", response.status()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to decode movie API response: {}", e))
    }

    /// Search by title when `query` is non-empty, otherwise list popular
    /// movies. Returns one page of results.
    pub async fn fetch_movies(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, String> {
        let page = page.to_string();
        let body: MovieListResponse = if query.is_empty() {
            self.get_json(
                "/discover/movie",
                &[("sort_by", "popularity.desc"), ("page", &page)],
            )
            .await?
        } else {
            self.get_json("/search/movie", &[("query", query), ("page", &page)])
                .await?
        };
        Ok(body.results)
    }

    pub async fn fetch_movie_details(&self, movie_id: u64) -> Result<MovieDetails, String> {
        self.get_json(&format!("/movie/{}", movie_id), &[]).await
    }

    /// Official trailers only, hosted on YouTube or Vimeo
    pub async fn fetch_movie_trailers(&self, movie_id: u64) -> Result<Vec<Trailer>, String> {
        let body: VideoListResponse = self
            .get_json(&format!("/movie/{}/videos", movie_id), &[])
            .await?;
        Ok(filter_trailers(body.results))
    }

    pub async fn fetch_movie_credits(&self, movie_id: u64) -> Result<Vec<CastMember>, String> {
        let body: CreditsResponse = self
            .get_json(&format!("/movie/{}/credits", movie_id), &[])
            .await?;
        Ok(body.cast)
    }
}

fn filter_trailers(videos: Vec<Trailer>) -> Vec<Trailer> {
    videos
        .into_iter()
        .filter(Trailer::is_official_trailer)
        .collect()
}

/// Human-readable message for a transport failure
pub fn describe_error(e: reqwest::Error) -> String {
    if e.is_timeout() {
        String::from("Request timed out")
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_list() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "poster_path": "/f.jpg",
                 "release_date": "1999-10-15", "vote_average": 8.4,
                 "overview": "An insomniac office worker..."},
                {"id": 603, "title": "The Matrix"}
            ],
            "total_pages": 500
        }"#;
        let parsed: MovieListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Fight Club");
        // Missing optional fields default
        assert_eq!(parsed.results[1].poster_path, None);
        assert_eq!(parsed.results[1].vote_average, 0.0);
    }

    #[test]
    fn test_parse_and_filter_videos() {
        let json = r#"{
            "results": [
                {"key": "a1", "name": "Official Trailer", "site": "YouTube",
                 "type": "Trailer", "official": true},
                {"key": "a2", "name": "Teaser", "site": "YouTube",
                 "type": "Teaser", "official": true},
                {"key": "a3", "name": "Fan cut", "site": "YouTube",
                 "type": "Trailer", "official": false}
            ]
        }"#;
        let parsed: VideoListResponse = serde_json::from_str(json).unwrap();
        let trailers = filter_trailers(parsed.results);
        assert_eq!(trailers.len(), 1);
        assert_eq!(trailers[0].key, "a1");
    }

    #[test]
    fn test_parse_credits() {
        let json = r#"{
            "cast": [
                {"id": 819, "name": "Edward Norton", "character": "The Narrator",
                 "profile_path": "/e.jpg"},
                {"id": 287, "name": "Brad Pitt"}
            ],
            "crew": []
        }"#;
        let parsed: CreditsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cast.len(), 2);
        assert_eq!(parsed.cast[1].character, None);
    }
}
