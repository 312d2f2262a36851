use gtk::prelude::*;
use gtk::{glib, Box, ListBox, ListBoxRow, Orientation};
use std::rc::Rc;

use super::widgets::{line, message};
use super::Ui;
use crate::model::MovieSummary;

/// Fills `container` with the search results, or what stands in for them.
pub fn render_results(ui: &Rc<Ui>, container: &Box) {
    let app = ui.app.borrow();
    let search = app.search();

    if search.is_loading() {
        container.append(&message("Loading..."));
        return;
    }
    if !search.error().is_empty() {
        container.append(&message(&format!("⛔ {}", search.error())));
    }
    if search.found_nothing() {
        container.append(&message("Movies not found"));
        return;
    }
    if search.movies().is_empty() {
        return;
    }

    let list_box = ListBox::new();
    list_box.set_selection_mode(gtk::SelectionMode::None);
    list_box.set_activate_on_single_click(true);
    for movie in search.movies() {
        list_box.append(&movie_row(ui, movie));
    }

    let handle = ui.clone();
    list_box.connect_row_activated(move |_, row| {
        let imdb_id = handle
            .app
            .borrow()
            .search()
            .movies()
            .get(row.index() as usize)
            .map(|m| m.imdb_id.clone());
        if let Some(imdb_id) = imdb_id {
            handle.select(&imdb_id);
        }
    });

    container.append(&list_box);
}

fn movie_row(ui: &Ui, movie: &MovieSummary) -> ListBoxRow {
    let row = ListBoxRow::new();
    let hbox = Box::new(Orientation::Horizontal, 12);
    hbox.set_margin_start(12);
    hbox.set_margin_end(12);
    hbox.set_margin_top(8);
    hbox.set_margin_bottom(8);

    let vbox = Box::new(Orientation::Vertical, 4);
    vbox.set_valign(gtk::Align::Center);

    let title_label = line("", false);
    title_label.set_markup(&format!("<b>{}</b>", glib::markup_escape_text(&movie.title)));
    let year_label = line(&format!("🗓 {}", movie.year), true);

    vbox.append(&title_label);
    vbox.append(&year_label);

    hbox.append(&ui.posters.picture(movie.poster_url(), 40, 60));
    hbox.append(&vbox);
    row.set_child(Some(&hbox));

    row
}
