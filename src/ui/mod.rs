//! GTK front end.
//!
//! Every widget here is rebuilt from [`App`] state after each change; the
//! only state kept on the GTK side is what is on screen.

mod details;
mod dialog;
mod movies;
mod poster;
mod stars;
mod watched;
mod widgets;

use gtk::prelude::*;
use gtk::{glib, Application, ApplicationWindow, Box, Label, Orientation, ScrolledWindow, SearchEntry, Separator};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::api::{MovieApi, OmdbClient};
use crate::app::{App, AppEvent, View};
use crate::config::Config;
use crate::keys::{KeyListener, KeyListeners};
use crate::storage::FileStorage;
use crate::title::{TitlePort, APP_TITLE};
use poster::Posters;
use widgets::clear;

struct WindowTitle(ApplicationWindow);

impl TitlePort for WindowTitle {
    fn set_title(&self, title: &str) {
        self.0.set_title(Some(title));
    }
}

pub struct Ui {
    app: RefCell<App>,
    posters: Posters,
    keys: KeyListeners,
    _enter: KeyListener,
    escape: RefCell<Option<KeyListener>>,
    window: ApplicationWindow,
    search_entry: SearchEntry,
    num_results: Label,
    results: Box,
    side: Box,
}

impl Ui {
    fn set_query(self: &Rc<Self>, query: &str) {
        self.app.borrow_mut().set_query(query);
        self.render();
    }

    fn select(self: &Rc<Self>, imdb_id: &str) {
        self.app.borrow_mut().select(imdb_id);
        self.render_side();
    }

    fn close(self: &Rc<Self>) {
        self.app.borrow_mut().close();
        self.render_side();
    }

    fn rate(self: &Rc<Self>, rating: u8) {
        self.app.borrow_mut().set_pending_rating(rating);
        self.render_side();
    }

    fn commit(self: &Rc<Self>) {
        let committed = self.app.borrow_mut().commit_rating();
        if committed {
            self.render_side();
        }
    }

    fn delete(self: &Rc<Self>, imdb_id: &str) {
        let changed = self.app.borrow_mut().delete_watched(imdb_id);
        if changed {
            self.render_side();
        }
    }

    fn handle(self: &Rc<Self>, event: AppEvent) {
        let is_search = matches!(event, AppEvent::Search(_));
        let changed = self.app.borrow_mut().handle(event);
        match (changed, is_search) {
            (false, _) => {}
            (true, true) => self.render_results(),
            (true, false) => self.render_side(),
        }
    }

    /// Return: jump to the search box and start over, unless the focused
    /// widget does something with Enter itself.
    fn focus_search(&self) {
        if !Focus::of(GtkWindowExt::focus(&self.window), &self.search_entry).takes_return() {
            return;
        }
        self.search_entry.grab_focus();
        self.search_entry.set_text("");
    }

    fn render(self: &Rc<Self>) {
        self.render_results();
        self.render_side();
    }

    fn render_results(self: &Rc<Self>) {
        clear(&self.results);
        movies::render_results(self, &self.results);

        let count = self.app.borrow().search().result_count();
        self.num_results
            .set_markup(&format!("Found <b>{}</b> results", count));
    }

    fn render_side(self: &Rc<Self>) {
        clear(&self.side);
        let app = self.app.borrow();
        match app.view() {
            View::Browsing => {
                self.escape.borrow_mut().take();
                self.side.append(&watched::summary_view(&app.summary()));
                self.side.append(&watched::watched_list(self, app.watched()));
            }
            View::Viewing(panel) => {
                self.listen_escape();
                self.side.append(&details::detail_view(self, panel));
            }
        }
    }

    fn listen_escape(self: &Rc<Self>) {
        let mut escape = self.escape.borrow_mut();
        if escape.is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        *escape = Some(self.keys.listen("Escape", move || {
            if let Some(ui) = weak.upgrade() {
                ui.close();
            }
        }));
    }
}

/// Where keyboard focus sits, as far as the Return binding cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Search,
    Activatable,
    Elsewhere,
}

impl Focus {
    fn of(widget: Option<gtk::Widget>, search_entry: &SearchEntry) -> Focus {
        let Some(widget) = widget else {
            return Focus::Elsewhere;
        };
        if widget == *search_entry.upcast_ref::<gtk::Widget>() || widget.is_ancestor(search_entry) {
            Focus::Search
        } else if widget.is::<gtk::Button>() || widget.is::<gtk::ListBoxRow>() || widget.is::<gtk::Editable>() {
            Focus::Activatable
        } else {
            Focus::Elsewhere
        }
    }

    fn takes_return(self) -> bool {
        self == Focus::Elsewhere
    }
}

fn scrolled(child: &Box) -> ScrolledWindow {
    let scrolled = ScrolledWindow::new();
    scrolled.set_vexpand(true);
    scrolled.set_hexpand(true);
    scrolled.set_child(Some(child));
    scrolled
}

fn build_ui(application: &Application, config: &Config, runtime: &Handle) {
    let window = ApplicationWindow::builder()
        .application(application)
        .title(APP_TITLE)
        .default_width(1100)
        .default_height(750)
        .build();

    if let Some(ref api_key) = config.api_key {
        start(&window, config, runtime, api_key);
        return;
    }

    let application = application.clone();
    let config = config.clone();
    let runtime = runtime.clone();
    glib::spawn_future_local(async move {
        match dialog::ask_api_key(&window).await {
            Some(api_key) => start(&window, &config, &runtime, &api_key),
            None => {
                error!("No API key provided. Exiting.");
                application.quit();
            }
        }
    });
}

fn start(window: &ApplicationWindow, config: &Config, runtime: &Handle, api_key: &str) {
    let api: Arc<dyn MovieApi> = Arc::new(OmdbClient::new(&config.api_url, api_key));
    let data_dir = config.data_dir();
    info!("Keeping watched list in {}", data_dir.display());
    let (app, inbox) = App::new(
        api.clone(),
        runtime.clone(),
        std::boxed::Box::new(FileStorage::new(data_dir)),
        &config.storage_key,
        std::boxed::Box::new(WindowTitle(window.clone())),
    );

    let nav = widgets::nav_bar();
    let results = Box::new(Orientation::Vertical, 0);
    let side = Box::new(Orientation::Vertical, 0);

    let main_box = Box::new(Orientation::Horizontal, 0);
    main_box.set_homogeneous(true);
    main_box.append(&widgets::toggle_box(&scrolled(&results)));
    main_box.append(&widgets::toggle_box(&scrolled(&side)));

    let root = Box::new(Orientation::Vertical, 0);
    root.append(&nav.container);
    root.append(&Separator::new(Orientation::Horizontal));
    root.append(&main_box);
    window.set_child(Some(&root));

    let keys = KeyListeners::new();
    let ui = Rc::new_cyclic(|weak: &Weak<Ui>| {
        let weak = weak.clone();
        Ui {
            _enter: keys.listen("Return", move || {
                if let Some(ui) = weak.upgrade() {
                    ui.focus_search();
                }
            }),
            app: RefCell::new(app),
            posters: Posters::new(api, runtime.clone()),
            keys: keys.clone(),
            escape: RefCell::new(None),
            window: window.clone(),
            search_entry: nav.search_entry.clone(),
            num_results: nav.num_results.clone(),
            results,
            side,
        }
    });

    let controller = gtk::EventControllerKey::new();
    controller.set_propagation_phase(gtk::PropagationPhase::Capture);
    // listeners only observe; the focused widget still gets the key
    controller.connect_key_pressed(move |_, key, _, _| {
        if let Some(name) = key.name() {
            keys.dispatch(&name);
        }
        glib::Propagation::Proceed
    });
    window.add_controller(controller);

    let handle = ui.clone();
    nav.search_entry
        .connect_search_changed(move |entry| handle.set_query(&entry.text()));
    nav.search_entry.set_text(&config.initial_query);
    // the delayed search-changed for this text then finds the query unchanged
    ui.set_query(&config.initial_query);

    let handle = ui.clone();
    glib::spawn_future_local(async move {
        while let Some(event) = inbox.next().await {
            handle.handle(event);
        }
    });

    window.present();
}

pub fn run(config: Config, runtime: Handle) {
    let application = Application::builder()
        .application_id("com.example.popcorn")
        .build();

    application.connect_activate(move |application| build_ui(application, &config, &runtime));

    // command line flags are ours, not GTK's
    let args: Vec<String> = std::env::args().take(1).collect();
    application.run_with_args(&args);
}
