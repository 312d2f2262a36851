use serde::{Deserialize, Serialize};

/// Marker the movie API uses for absent values.
const NOT_AVAILABLE: &str = "N/A";

/// One hit of a title search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl MovieSummary {
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }
}

/// Full record of a single movie, fetched when it is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
}

impl MovieDetail {
    pub fn poster_url(&self) -> Option<&str> {
        poster_url(&self.poster)
    }

    /// IMDb rating as a number, `None` for "N/A" and other junk.
    pub fn imdb_rating_value(&self) -> Option<f64> {
        self.imdb_rating.trim().parse::<f64>().ok()
    }

    /// Runtime in minutes, taken from the leading integer of e.g. "148 min".
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }
}

/// A movie on the user's watched list together with their rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(flatten)]
    pub movie: MovieDetail,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
}

impl WatchedEntry {
    pub fn new(movie: MovieDetail, user_rating: u8) -> Self {
        Self { movie, user_rating }
    }

    pub fn imdb_id(&self) -> &str {
        &self.movie.imdb_id
    }
}

fn poster_url(poster: &str) -> Option<&str> {
    let poster = poster.trim();
    if poster.is_empty() || poster == NOT_AVAILABLE {
        None
    } else {
        Some(poster)
    }
}

#[cfg(test)]
pub(crate) fn detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: id.to_string(),
        title: title.to_string(),
        year: "1972".to_string(),
        poster: NOT_AVAILABLE.to_string(),
        runtime: "175 min".to_string(),
        genre: "Crime, Drama".to_string(),
        imdb_rating: "9.2".to_string(),
        plot: String::new(),
        actors: String::new(),
        director: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watched_entry_is_flat_json() {
        let entry = WatchedEntry::new(detail("tt0068646", "The Godfather"), 8);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["imdbID"], "tt0068646");
        assert_eq!(value["Title"], "The Godfather");
        assert_eq!(value["userRating"], 8);
    }

    #[test]
    fn test_reads_stored_entry_with_extra_fields() {
        let json = r#"{
            "Title": "Inception", "Year": "2010", "Rated": "PG-13",
            "Runtime": "148 min", "Genre": "Action, Sci-Fi",
            "Director": "Christopher Nolan", "Actors": "Leonardo DiCaprio",
            "Plot": "A thief...", "Poster": "N/A", "imdbRating": "8.8",
            "imdbID": "tt1375666", "Response": "True", "userRating": 9
        }"#;
        let entry: WatchedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.imdb_id(), "tt1375666");
        assert_eq!(entry.user_rating, 9);
        assert_eq!(entry.movie.runtime_minutes(), Some(148));
        assert_eq!(entry.movie.imdb_rating_value(), Some(8.8));
        assert_eq!(entry.movie.poster_url(), None);
    }

    #[test]
    fn test_unparseable_numbers() {
        let mut movie = detail("tt1", "Unknown");
        movie.runtime = "N/A".to_string();
        movie.imdb_rating = "N/A".to_string();
        assert_eq!(movie.runtime_minutes(), None);
        assert_eq!(movie.imdb_rating_value(), None);
    }
}
