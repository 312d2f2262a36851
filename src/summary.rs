use crate::watched::WatchedList;

/// Aggregates shown above the watched list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

impl WatchedSummary {
    pub fn of(watched: &WatchedList) -> Self {
        WatchedSummary {
            count: watched.len(),
            avg_imdb_rating: mean(watched.iter().filter_map(|e| e.movie.imdb_rating_value())),
            avg_user_rating: mean(watched.iter().map(|e| f64::from(e.user_rating))),
            avg_runtime: mean(
                watched
                    .iter()
                    .filter_map(|e| e.movie.runtime_minutes())
                    .map(f64::from),
            ),
        }
    }

    pub fn count_label(&self) -> String {
        if self.count == 1 {
            "1 movie".to_string()
        } else {
            format!("{} movies", self.count)
        }
    }

    pub fn imdb_rating_label(&self) -> String {
        format!("{:.1}", self.avg_imdb_rating)
    }

    pub fn user_rating_label(&self) -> String {
        format!("{:.1}", self.avg_user_rating)
    }

    pub fn runtime_label(&self) -> String {
        format!("{:.0} min", self.avg_runtime)
    }
}

/// Arithmetic mean, 0 for no values.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{detail, WatchedEntry};

    fn entry(id: &str, imdb: &str, runtime: &str, rating: u8) -> WatchedEntry {
        let mut movie = detail(id, id);
        movie.imdb_rating = imdb.to_string();
        movie.runtime = runtime.to_string();
        WatchedEntry::new(movie, rating)
    }

    #[test]
    fn test_empty_list() {
        let summary = WatchedSummary::of(&WatchedList::new());
        assert_eq!(summary.count_label(), "0 movies");
        assert_eq!(summary.imdb_rating_label(), "0.0");
        assert_eq!(summary.user_rating_label(), "0.0");
        assert_eq!(summary.runtime_label(), "0 min");
    }

    #[test]
    fn test_averages() {
        let list = WatchedList::from(vec![
            entry("a", "8.8", "148 min", 10),
            entry("b", "8.4", "116 min", 7),
        ]);
        let summary = WatchedSummary::of(&list);
        assert_eq!(summary.count_label(), "2 movies");
        assert_eq!(summary.imdb_rating_label(), "8.6");
        assert_eq!(summary.user_rating_label(), "8.5");
        assert_eq!(summary.runtime_label(), "132 min");
    }

    #[test]
    fn test_skips_unavailable_values() {
        let list = WatchedList::from(vec![
            entry("a", "N/A", "N/A", 4),
            entry("b", "7.0", "90 min", 6),
        ]);
        let summary = WatchedSummary::of(&list);
        assert_eq!(summary.avg_imdb_rating, 7.0);
        assert_eq!(summary.avg_runtime, 90.0);
        assert_eq!(summary.avg_user_rating, 5.0);
    }

    #[test]
    fn test_single_movie_label() {
        let list = WatchedList::from(vec![entry("a", "8.0", "100 min", 8)]);
        assert_eq!(WatchedSummary::of(&list).count_label(), "1 movie");
    }
}
