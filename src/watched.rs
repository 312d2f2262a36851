use serde::{Deserialize, Serialize};

use crate::model::WatchedEntry;

/// The user's watched movies in insertion order, at most one entry per id.
///
/// Every operation returns a new list and leaves `self` alone, so a change is
/// visible as inequality between the old and the new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchedList {
    entries: Vec<WatchedEntry>,
}

impl WatchedList {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, imdb_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.imdb_id() == imdb_id)
    }

    /// Appends `entry`; an entry for an id already on the list replaces it in place.
    pub fn with_added(&self, entry: WatchedEntry) -> Self {
        if self.contains(entry.imdb_id()) {
            return self.with_updated(entry);
        }
        let mut entries = self.entries.clone();
        entries.push(entry);
        WatchedList { entries }
    }

    /// Replaces the entry with the same id, keeping its position.
    pub fn with_updated(&self, entry: WatchedEntry) -> Self {
        let Some(index) = self.position(entry.imdb_id()) else {
            return self.clone();
        };
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| if i == index { entry.clone() } else { e.clone() })
            .collect();
        WatchedList { entries }
    }

    pub fn without(&self, imdb_id: &str) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|e| e.imdb_id() != imdb_id)
            .cloned()
            .collect();
        WatchedList { entries }
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.imdb_id() == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.position(imdb_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchedEntry> {
        self.entries.iter()
    }
}

impl From<Vec<WatchedEntry>> for WatchedList {
    fn from(entries: Vec<WatchedEntry>) -> Self {
        entries
            .into_iter()
            .fold(WatchedList::new(), |list, entry| list.with_added(entry))
    }
}

impl<'a> IntoIterator for &'a WatchedList {
    type Item = &'a WatchedEntry;
    type IntoIter = std::slice::Iter<'a, WatchedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
