use serde::{Deserialize, Serialize};

use crate::constants::IMAGE_BASE_URL;

/// A movie as returned by listing/search endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl MovieSummary {
    /// Full image URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| format!("{}{}", IMAGE_BASE_URL, p))
    }

    /// Four-digit release year, if the release date is well-formed
    pub fn release_year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        if date.len() >= 4 && date[..4].chars().all(|c| c.is_ascii_digit()) {
            Some(&date[..4])
        } else {
            None
        }
    }
}

/// A single genre attached to movie details
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie details from the metadata API
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
}

impl MovieDetails {
    /// The summary fields of these details, used when saving from the
    /// details view
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            overview: self.overview.clone(),
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
        }
    }

    /// Runtime as "2h 19m", if known
    pub fn runtime_display(&self) -> Option<String> {
        let minutes = self.runtime?;
        Some(format!("{}h {}m", minutes / 60, minutes % 60))
    }
}

/// A video attached to a movie (trailer, teaser, clip, ...)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

impl Trailer {
    /// Official trailers hosted where we can build a watch URL
    pub fn is_official_trailer(&self) -> bool {
        self.kind == "Trailer"
            && (self.site == "YouTube" || self.site == "Vimeo")
            && self.official
    }

    /// Browser URL for the trailer
    pub fn watch_url(&self) -> String {
        match self.site.as_str() {
            "YouTube" => format!("https://www.youtube.com/watch?v={}", self.key),
            "Vimeo" => format!("https://vimeo.com/{}", self.key),
            _ => self.key.clone(),
        }
    }
}

/// A cast member from the credits endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A trending entry maintained by the backend (search-count ranking)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendingMovie {
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    pub count: u64,
    #[serde(default)]
    pub search_term: String,
}

/// A saved-movie record in the backend store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedMovie {
    /// Backend document id, needed to unsave
    pub id: String,
    pub movie_id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The signed-in user's profile document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub account_id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated backend session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(release_date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 550,
            title: String::from("Fight Club"),
            overview: String::new(),
            poster_path: Some(String::from("/fight.jpg")),
            release_date: release_date.map(String::from),
            vote_average: 8.4,
        }
    }

    #[test]
    fn test_release_year() {
        assert_eq!(movie(Some("1999-10-15")).release_year(), Some("1999"));
        assert_eq!(movie(Some("19")).release_year(), None);
        assert_eq!(movie(None).release_year(), None);
    }

    #[test]
    fn test_poster_url() {
        assert_eq!(
            movie(None).poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/fight.jpg")
        );
    }

    #[test]
    fn test_official_trailer_filter() {
        let trailer = Trailer {
            key: String::from("abc"),
            name: String::from("Official Trailer"),
            site: String::from("YouTube"),
            kind: String::from("Trailer"),
            official: true,
        };
        assert!(trailer.is_official_trailer());

        let teaser = Trailer {
            kind: String::from("Teaser"),
            ..trailer.clone()
        };
        assert!(!teaser.is_official_trailer());

        let unofficial = Trailer {
            official: false,
            ..trailer.clone()
        };
        assert!(!unofficial.is_official_trailer());

        let elsewhere = Trailer {
            site: String::from("Dailymotion"),
            ..trailer
        };
        assert!(!elsewhere.is_official_trailer());
    }
}
