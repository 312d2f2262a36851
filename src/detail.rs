use tracing::warn;

use crate::error::FetchError;
use crate::model::{MovieDetail, WatchedEntry};
use crate::watched::WatchedList;

pub const MAX_RATING: u8 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(MovieDetail),
    Failed(String),
}

/// What confirming a rating does to the watched list.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Add(WatchedEntry),
    Update(WatchedEntry),
}

/// The open movie: its details and the rating being edited.
#[derive(Debug, Clone)]
pub struct DetailPanel {
    imdb_id: String,
    state: DetailState,
    pending_rating: Option<u8>,
    stored_rating: Option<u8>,
}

impl DetailPanel {
    /// Starts with an empty rating, or the stored one if the movie was watched.
    pub fn open(imdb_id: &str, watched: &WatchedList) -> Self {
        let stored_rating = watched.get(imdb_id).map(|e| e.user_rating);
        DetailPanel {
            imdb_id: imdb_id.to_string(),
            state: DetailState::Loading,
            pending_rating: stored_rating,
            stored_rating,
        }
    }

    pub fn imdb_id(&self) -> &str {
        &self.imdb_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn movie(&self) -> Option<&MovieDetail> {
        match self.state {
            DetailState::Loaded(ref movie) => Some(movie),
            _ => None,
        }
    }

    pub fn loaded(&mut self, result: Result<MovieDetail, FetchError>) {
        self.state = match result {
            Ok(movie) => DetailState::Loaded(movie),
            Err(e) => {
                warn!("could not load {}: {}", self.imdb_id, e);
                DetailState::Failed(e.user_message())
            }
        };
    }

    pub fn pending_rating(&self) -> Option<u8> {
        self.pending_rating
    }

    pub fn stored_rating(&self) -> Option<u8> {
        self.stored_rating
    }

    pub fn watched_before(&self) -> bool {
        self.stored_rating.is_some()
    }

    /// 0 clears the pending rating; anything above the scale is capped.
    pub fn set_pending_rating(&mut self, rating: u8) {
        self.pending_rating = match rating {
            0 => None,
            r => Some(r.min(MAX_RATING)),
        };
    }

    pub fn can_commit(&self) -> bool {
        self.movie().is_some()
            && self.pending_rating.is_some()
            && self.pending_rating != self.stored_rating
    }

    pub fn commit(&self) -> Option<Commit> {
        if !self.can_commit() {
            return None;
        }
        let movie = self.movie()?.clone();
        let entry = WatchedEntry::new(movie, self.pending_rating?);
        if self.watched_before() {
            Some(Commit::Update(entry))
        } else {
            Some(Commit::Add(entry))
        }
    }

    pub fn action_label(&self) -> &'static str {
        if self.watched_before() {
            "Update rating"
        } else {
            "+ Add to watched list"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::detail;

    #[test]
    fn test_new_movie_starts_empty() {
        let mut panel = DetailPanel::open("tt1", &WatchedList::new());
        assert_eq!(panel.pending_rating(), None);
        assert!(!panel.watched_before());
        assert_eq!(panel.action_label(), "+ Add to watched list");
        assert_eq!(panel.state(), &DetailState::Loading);

        // nothing to commit until the details are in
        panel.set_pending_rating(8);
        assert!(!panel.can_commit());
        panel.loaded(Ok(detail("tt1", "Heat")));
        assert!(panel.can_commit());
        match panel.commit() {
            Some(Commit::Add(entry)) => {
                assert_eq!(entry.imdb_id(), "tt1");
                assert_eq!(entry.user_rating, 8);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_watched_movie_prefills_rating() {
        let watched = WatchedList::new().with_added(WatchedEntry::new(detail("tt1", "Heat"), 8));
        let mut panel = DetailPanel::open("tt1", &watched);
        panel.loaded(Ok(detail("tt1", "Heat")));

        assert_eq!(panel.pending_rating(), Some(8));
        assert!(panel.watched_before());
        assert_eq!(panel.action_label(), "Update rating");
        // same as stored
        assert!(!panel.can_commit());

        panel.set_pending_rating(9);
        assert!(matches!(panel.commit(), Some(Commit::Update(ref e)) if e.user_rating == 9));
    }

    #[test]
    fn test_rating_bounds() {
        let mut panel = DetailPanel::open("tt1", &WatchedList::new());
        panel.set_pending_rating(42);
        assert_eq!(panel.pending_rating(), Some(MAX_RATING));
        panel.set_pending_rating(0);
        assert_eq!(panel.pending_rating(), None);
    }

    #[test]
    fn test_failed_load() {
        let mut panel = DetailPanel::open("tt1", &WatchedList::new());
        panel.loaded(Err(FetchError::NotFound("Incorrect IMDb ID.".to_string())));
        assert_eq!(panel.state(), &DetailState::Failed("Incorrect IMDb ID.".to_string()));
        panel.set_pending_rating(5);
        assert_eq!(panel.commit(), None);
    }
}
