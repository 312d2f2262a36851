//! Client for the OMDb movie API.
//!
//! Two lookups are used: a title search (`s=`) returning a `Search` array of
//! summaries, and an id lookup (`i=`) returning one flat detail object. The
//! API reports misses in-band with `"Response": "False"` and an `Error` text
//! rather than with an HTTP status.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{MovieDetail, MovieSummary};

const DEFAULT_NOT_FOUND: &str = "Movie not found!";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, FetchError>;
    async fn poster(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        OmdbClient {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?apikey={}&s={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        )
    }

    fn details_url(&self, imdb_id: &str) -> String {
        format!(
            "{}?apikey={}&i={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(imdb_id)
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }
        Ok(response)
    }
}

#[async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        debug!("searching for {:?}", query);
        let body = self.get(&self.search_url(query)).await?.text().await?;
        parse_search(&body)
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        debug!("fetching details for {}", imdb_id);
        let body = self.get(&self.details_url(imdb_id)).await?.text().await?;
        parse_details(&body)
    }

    async fn poster(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Turns an in-band `"Response": "False"` into `NotFound`.
fn check_response(value: &Value) -> Result<(), FetchError> {
    if value.get("Response").and_then(Value::as_str) == Some("False") {
        let message = value
            .get("Error")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NOT_FOUND);
        return Err(FetchError::NotFound(message.to_string()));
    }
    Ok(())
}

pub fn parse_search(body: &str) -> Result<Vec<MovieSummary>, FetchError> {
    let mut value: Value = serde_json::from_str(body)?;
    check_response(&value)?;

    match value.get_mut("Search").map(Value::take) {
        Some(results) => Ok(serde_json::from_value(results)?),
        None => Err(FetchError::NotFound(DEFAULT_NOT_FOUND.to_string())),
    }
}

pub fn parse_details(body: &str) -> Result<MovieDetail, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    check_response(&value)?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_encoded() {
        let client = OmdbClient::new("https://www.omdbapi.com/", "k3y");
        assert_eq!(
            client.search_url("the godfather & co"),
            "https://www.omdbapi.com/?apikey=k3y&s=the%20godfather%20%26%20co"
        );
        assert_eq!(
            client.details_url("tt0068646"),
            "https://www.omdbapi.com/?apikey=k3y&i=tt0068646"
        );
    }

    #[test]
    fn test_parse_search_results() {
        let body = r#"{
            "Search": [
                {"Title": "The Godfather", "Year": "1972", "imdbID": "tt0068646", "Type": "movie", "Poster": "https://example.com/a.jpg"},
                {"Title": "The Godfather Part II", "Year": "1974", "imdbID": "tt0071562", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;
        let movies = parse_search(body).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].imdb_id, "tt0068646");
        assert_eq!(movies[0].poster_url(), Some("https://example.com/a.jpg"));
        assert_eq!(movies[1].poster_url(), None);
    }

    #[test]
    fn test_parse_search_not_found() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        match parse_search(body) {
            Err(FetchError::NotFound(message)) => assert_eq!(message, "Movie not found!"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_missing_array() {
        let body = r#"{"Response": "True"}"#;
        assert!(matches!(parse_search(body), Err(FetchError::NotFound(_))));
    }

    #[test]
    fn test_parse_search_garbage() {
        assert!(matches!(parse_search("<html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_details() {
        let body = r#"{
            "Title": "Inception", "Year": "2010", "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt", "Plot": "A thief...",
            "Poster": "https://example.com/inception.jpg", "imdbRating": "8.8",
            "imdbID": "tt1375666", "Response": "True"
        }"#;
        let movie = parse_details(body).unwrap();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.director, "Christopher Nolan");
        assert_eq!(movie.runtime_minutes(), Some(148));
    }

    #[test]
    fn test_parse_details_bad_id() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        match parse_details(body) {
            Err(FetchError::NotFound(message)) => assert_eq!(message, "Incorrect IMDb ID."),
            other => panic!("unexpected {:?}", other),
        }
    }
}
