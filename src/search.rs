//! Title search backed by the movie API.

use async_channel::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::api::MovieApi;
use crate::error::FetchError;
use crate::fetch::{Outcome, RequestSlot};
use crate::model::MovieSummary;

/// Queries shorter than this (after trimming) never hit the network.
pub const MIN_QUERY_LEN: usize = 3;

pub type SearchOutcome = Outcome<Vec<MovieSummary>>;

pub struct MovieSearch {
    api: Arc<dyn MovieApi>,
    runtime: Handle,
    outcomes: Sender<SearchOutcome>,
    slot: RequestSlot,
    query: String,
    movies: Vec<MovieSummary>,
    is_loading: bool,
    error: String,
    not_found: bool,
}

impl MovieSearch {
    pub fn new(api: Arc<dyn MovieApi>, runtime: Handle, outcomes: Sender<SearchOutcome>) -> Self {
        MovieSearch {
            api,
            runtime,
            outcomes,
            slot: RequestSlot::new(),
            query: String::new(),
            movies: Vec::new(),
            is_loading: false,
            error: String::new(),
            not_found: false,
        }
    }

    /// Applies a new query. `on_change` runs once if the query actually changed.
    ///
    /// The previous request is cancelled before anything else happens, so a
    /// slow answer to an older query can never land.
    pub fn set_query(&mut self, query: &str, on_change: impl FnOnce()) {
        if query == self.query {
            return;
        }
        self.query = query.to_string();
        on_change();
        self.slot.cancel();
        self.not_found = false;

        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            self.movies.clear();
            self.is_loading = false;
            self.error.clear();
            return;
        }

        self.is_loading = true;
        self.error.clear();

        let ticket = self.slot.begin();
        debug!("search {} started for {:?}", ticket.generation(), trimmed);
        let api = self.api.clone();
        let query = trimmed.to_string();
        ticket.spawn(
            &self.runtime,
            async move { api.search(&query).await },
            self.outcomes.clone(),
        );
    }

    /// Folds a finished request into the state. Returns false for stale outcomes.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if !self.slot.settle(outcome.generation) {
            return false;
        }
        self.is_loading = false;

        match outcome.result {
            Ok(movies) => {
                debug!("search {} found {} movies", outcome.generation, movies.len());
                self.not_found = movies.is_empty();
                self.movies = movies;
                self.error.clear();
            }
            Err(FetchError::NotFound(message)) => {
                debug!("search {} found nothing: {}", outcome.generation, message);
                self.movies.clear();
                self.error.clear();
                self.not_found = true;
            }
            Err(e) => {
                self.not_found = false;
                warn!("search for {:?} failed: {}", self.query, e);
                self.error = e.user_message();
            }
        }
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn result_count(&self) -> usize {
        self.movies.len()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// The last search finished and matched no movies.
    pub fn found_nothing(&self) -> bool {
        self.not_found
    }
}
