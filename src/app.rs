//! Application root.
//!
//! `App` is either browsing (no movie open) or viewing one movie. Starting a
//! new search always drops back to browsing. Side effects leave through two
//! ports: a [`Storage`] slot for the watched list and a [`TitlePort`] for the
//! window title.

use async_channel::{Receiver, Sender};
use futures::future::Either;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::api::MovieApi;
use crate::detail::{Commit, DetailPanel};
use crate::fetch::{Outcome, RequestSlot};
use crate::model::{MovieDetail, WatchedEntry};
use crate::search::{MovieSearch, SearchOutcome};
use crate::storage::{Persisted, Storage};
use crate::summary::WatchedSummary;
use crate::title::{movie_title, TitlePort, APP_TITLE};
use crate::watched::WatchedList;

pub type DetailOutcome = Outcome<MovieDetail>;

#[derive(Debug)]
pub enum AppEvent {
    Search(SearchOutcome),
    Detail(DetailOutcome),
}

pub enum View<'a> {
    Browsing,
    Viewing(&'a DetailPanel),
}

/// Finished requests waiting to be folded into the [`App`].
pub struct Inbox {
    search: Receiver<SearchOutcome>,
    detail: Receiver<DetailOutcome>,
}

impl Inbox {
    /// Next outcome from either slot; `None` once the app is gone.
    pub async fn next(&self) -> Option<AppEvent> {
        let search = self.search.recv();
        let detail = self.detail.recv();
        futures::pin_mut!(search, detail);

        match futures::future::select(search, detail).await {
            Either::Left((Ok(outcome), _)) => Some(AppEvent::Search(outcome)),
            Either::Right((Ok(outcome), _)) => Some(AppEvent::Detail(outcome)),
            Either::Left((Err(_), _)) | Either::Right((Err(_), _)) => None,
        }
    }
}

pub struct App {
    api: Arc<dyn MovieApi>,
    runtime: Handle,
    search: MovieSearch,
    detail: Option<DetailPanel>,
    detail_slot: RequestSlot,
    detail_outcomes: Sender<DetailOutcome>,
    watched: Persisted<WatchedList>,
    title: Box<dyn TitlePort>,
}

impl App {
    pub fn new(
        api: Arc<dyn MovieApi>,
        runtime: Handle,
        storage: Box<dyn Storage>,
        storage_key: &str,
        title: Box<dyn TitlePort>,
    ) -> (Self, Inbox) {
        let (search_tx, search_rx) = async_channel::unbounded();
        let (detail_tx, detail_rx) = async_channel::unbounded();

        let watched = Persisted::load(storage, storage_key, WatchedList::new());
        info!("loaded {} watched movies", watched.get().len());
        title.set_title(APP_TITLE);

        let app = App {
            search: MovieSearch::new(api.clone(), runtime.clone(), search_tx),
            api,
            runtime,
            detail: None,
            detail_slot: RequestSlot::new(),
            detail_outcomes: detail_tx,
            watched,
            title,
        };
        let inbox = Inbox {
            search: search_rx,
            detail: detail_rx,
        };
        (app, inbox)
    }

    pub fn view(&self) -> View<'_> {
        match self.detail {
            Some(ref panel) => View::Viewing(panel),
            None => View::Browsing,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.as_ref().map(DetailPanel::imdb_id)
    }

    pub fn search(&self) -> &MovieSearch {
        &self.search
    }

    pub fn watched(&self) -> &WatchedList {
        self.watched.get()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::of(self.watched.get())
    }

    pub fn set_query(&mut self, query: &str) {
        let App {
            search,
            detail,
            detail_slot,
            title,
            ..
        } = self;
        search.set_query(query, || close_detail(detail, detail_slot, title.as_ref()));
    }

    pub fn select(&mut self, imdb_id: &str) {
        if self.selected_id() == Some(imdb_id) {
            return;
        }
        debug!("opening {}", imdb_id);
        // the title follows the open movie, which is not loaded yet
        if self.detail.replace(DetailPanel::open(imdb_id, self.watched.get())).is_some() {
            self.title.set_title(APP_TITLE);
        }

        let api = self.api.clone();
        let id = imdb_id.to_string();
        self.detail_slot.begin().spawn(
            &self.runtime,
            async move { api.details(&id).await },
            self.detail_outcomes.clone(),
        );
    }

    pub fn close(&mut self) {
        close_detail(&mut self.detail, &mut self.detail_slot, self.title.as_ref());
    }

    /// Folds a finished request into the state. Returns false if it was stale.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Search(outcome) => self.search.apply(outcome),
            AppEvent::Detail(outcome) => {
                if !self.detail_slot.settle(outcome.generation) {
                    return false;
                }
                let Some(ref mut panel) = self.detail else {
                    return false;
                };
                panel.loaded(outcome.result);
                match panel.movie() {
                    Some(movie) => self.title.set_title(&movie_title(&movie.title)),
                    None => self.title.set_title(APP_TITLE),
                }
                true
            }
        }
    }

    pub fn set_pending_rating(&mut self, rating: u8) {
        if let Some(ref mut panel) = self.detail {
            panel.set_pending_rating(rating);
        }
    }

    /// Adds or updates the open movie with the pending rating, then closes it.
    pub fn commit_rating(&mut self) -> bool {
        let Some(commit) = self.detail.as_ref().and_then(DetailPanel::commit) else {
            return false;
        };
        match commit {
            Commit::Add(entry) => self.add_watched(entry),
            Commit::Update(entry) => self.update_watched(entry),
        };
        self.close();
        true
    }

    pub fn add_watched(&mut self, entry: WatchedEntry) -> bool {
        info!("adding {} to watched", entry.imdb_id());
        self.watched.update(|list| list.with_added(entry))
    }

    pub fn update_watched(&mut self, entry: WatchedEntry) -> bool {
        info!("rating {} as {}", entry.imdb_id(), entry.user_rating);
        self.watched.update(|list| list.with_updated(entry))
    }

    pub fn delete_watched(&mut self, imdb_id: &str) -> bool {
        info!("removing {} from watched", imdb_id);
        self.watched.update(|list| list.without(imdb_id))
    }
}

fn close_detail(detail: &mut Option<DetailPanel>, slot: &mut RequestSlot, title: &dyn TitlePort) {
    slot.cancel();
    if detail.take().is_some() {
        title.set_title(APP_TITLE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMovieApi;
    use crate::detail::DetailState;
    use crate::error::FetchError;
    use crate::keys::KeyListeners;
    use crate::model::detail;
    use crate::search::tests::{summary, SlowApi};
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingTitle(Rc<RefCell<Vec<String>>>);

    impl RecordingTitle {
        fn last(&self) -> String {
            self.0.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl TitlePort for RecordingTitle {
        fn set_title(&self, title: &str) {
            self.0.borrow_mut().push(title.to_string());
        }
    }

    fn godfather_api() -> MockMovieApi {
        let mut api = MockMovieApi::new();
        api.expect_search().withf(|q| q == "godfather").returning(|_| {
            Ok(vec![
                summary("tt0068646", "The Godfather"),
                summary("tt0071562", "The Godfather Part II"),
            ])
        });
        api.expect_details()
            .returning(|id| Ok(detail(id, &format!("Movie {}", id))));
        api
    }

    fn app_with(
        api: impl MovieApi + 'static,
        storage: Rc<MemoryStorage>,
    ) -> (App, Inbox, RecordingTitle) {
        let title = RecordingTitle::default();
        let (app, inbox) = App::new(
            Arc::new(api),
            Handle::current(),
            Box::new(storage),
            "watched",
            Box::new(title.clone()),
        );
        (app, inbox, title)
    }

    #[tokio::test]
    async fn test_browse_rate_and_rerate() {
        let storage = Rc::new(MemoryStorage::new());
        let (app, inbox, title) = app_with(godfather_api(), storage.clone());
        let app = Rc::new(RefCell::new(app));
        assert_eq!(title.last(), "usePopcorn");

        app.borrow_mut().set_query("ab");
        assert!(app.borrow().search().movies().is_empty());

        app.borrow_mut().set_query("godfather");
        let event = inbox.next().await.unwrap();
        assert!(app.borrow_mut().handle(event));
        assert_eq!(app.borrow().search().result_count(), 2);

        let keys = KeyListeners::new();
        let handle = app.clone();
        let _escape = keys.listen("Escape", move || handle.borrow_mut().close());

        app.borrow_mut().select("tt0068646");
        assert_eq!(app.borrow().selected_id(), Some("tt0068646"));
        let event = inbox.next().await.unwrap();
        assert!(app.borrow_mut().handle(event));
        assert_eq!(title.last(), "Movie tt0068646 - usePopcorn");

        assert!(keys.dispatch("Escape"));
        assert!(matches!(app.borrow().view(), View::Browsing));
        assert_eq!(app.borrow().selected_id(), None);
        assert_eq!(title.last(), "usePopcorn");

        // first rating adds one entry
        app.borrow_mut().select("tt0068646");
        let event = inbox.next().await.unwrap();
        app.borrow_mut().handle(event);
        app.borrow_mut().set_pending_rating(8);
        assert!(app.borrow_mut().commit_rating());
        assert_eq!(app.borrow().watched().len(), 1);
        assert_eq!(app.borrow().watched().get("tt0068646").unwrap().user_rating, 8);
        assert_eq!(app.borrow().selected_id(), None);

        // re-rating replaces it
        app.borrow_mut().select("tt0068646");
        if let View::Viewing(panel) = app.borrow().view() {
            assert_eq!(panel.pending_rating(), Some(8));
            assert_eq!(panel.action_label(), "Update rating");
        } else {
            panic!("expected the detail panel");
        }
        let event = inbox.next().await.unwrap();
        app.borrow_mut().handle(event);
        app.borrow_mut().set_pending_rating(9);
        assert!(app.borrow_mut().commit_rating());
        assert_eq!(app.borrow().watched().len(), 1);
        assert_eq!(app.borrow().watched().get("tt0068646").unwrap().user_rating, 9);

        let stored = storage.read("watched").unwrap().unwrap();
        let stored: WatchedList = serde_json::from_str(&stored).unwrap();
        assert_eq!(&stored, app.borrow().watched());
    }

    #[tokio::test]
    async fn test_new_search_closes_detail() {
        let (mut app, inbox, title) = app_with(godfather_api(), Rc::new(MemoryStorage::new()));

        app.select("tt0068646");
        let event = inbox.next().await.unwrap();
        app.handle(event);
        assert!(matches!(app.view(), View::Viewing(_)));

        app.set_query("godfather");
        assert!(matches!(app.view(), View::Browsing));
        assert_eq!(title.last(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_close_cancels_detail_fetch() {
        let (mut app, inbox, _title) = app_with(SlowApi, Rc::new(MemoryStorage::new()));

        app.select("slow-one");
        app.close();
        app.set_query("alien");
        // only the search reports back
        match inbox.next().await.unwrap() {
            AppEvent::Search(outcome) => assert!(app.handle(AppEvent::Search(outcome))),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(app.view(), View::Browsing));
    }

    #[tokio::test]
    async fn test_latest_selection_wins() {
        let (mut app, inbox, title) = app_with(SlowApi, Rc::new(MemoryStorage::new()));

        app.select("slow-one");
        app.select("two");
        let event = inbox.next().await.unwrap();
        assert!(app.handle(event));

        match app.view() {
            View::Viewing(panel) => {
                assert_eq!(panel.imdb_id(), "two");
                assert_eq!(panel.movie().unwrap().imdb_id, "two");
            }
            View::Browsing => panic!("expected the detail panel"),
        }
        assert_eq!(title.last(), "Title of two - usePopcorn");
    }

    #[tokio::test]
    async fn test_failed_switch_resets_title() {
        let mut api = MockMovieApi::new();
        api.expect_details()
            .withf(|id| id == "tt1")
            .returning(|id| Ok(detail(id, "Heat")));
        api.expect_details()
            .withf(|id| id == "bad")
            .returning(|_| Err(FetchError::NotFound("Incorrect IMDb ID.".to_string())));
        let (mut app, inbox, title) = app_with(api, Rc::new(MemoryStorage::new()));

        app.select("tt1");
        let event = inbox.next().await.unwrap();
        assert!(app.handle(event));
        assert_eq!(title.last(), "Heat - usePopcorn");

        app.select("bad");
        assert_eq!(title.last(), "usePopcorn");
        let event = inbox.next().await.unwrap();
        assert!(app.handle(event));

        assert_eq!(app.selected_id(), Some("bad"));
        match app.view() {
            View::Viewing(panel) => assert!(matches!(panel.state(), DetailState::Failed(_))),
            View::Browsing => panic!("expected the detail panel"),
        }
        assert_eq!(title.last(), "usePopcorn");
    }

    #[tokio::test]
    async fn test_commit_requires_rating() {
        let (mut app, inbox, _title) = app_with(godfather_api(), Rc::new(MemoryStorage::new()));
        app.select("tt0068646");
        let event = inbox.next().await.unwrap();
        app.handle(event);

        assert!(!app.commit_rating());
        assert!(app.watched().is_empty());
        assert_eq!(app.selected_id(), Some("tt0068646"));
    }

    #[tokio::test]
    async fn test_delete_and_reload() {
        let storage = Rc::new(MemoryStorage::new());
        {
            let (mut app, _inbox, _title) = app_with(godfather_api(), storage.clone());
            app.add_watched(WatchedEntry::new(detail("tt1", "One"), 7));
            app.add_watched(WatchedEntry::new(detail("tt2", "Two"), 5));
            assert!(app.delete_watched("tt1"));
            assert!(!app.delete_watched("tt1"));
        }

        let (app, _inbox, _title) = app_with(godfather_api(), storage);
        assert_eq!(app.watched().len(), 1);
        assert!(app.watched().contains("tt2"));
        assert_eq!(app.summary().count_label(), "1 movie");
    }
}
