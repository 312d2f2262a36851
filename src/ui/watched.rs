use gtk::prelude::*;
use gtk::{glib, Align, Box, Button, Label, ListBox, ListBoxRow, Orientation};
use std::rc::Rc;

use super::widgets::line;
use super::Ui;
use crate::model::WatchedEntry;
use crate::summary::WatchedSummary;
use crate::watched::WatchedList;

pub fn summary_view(summary: &WatchedSummary) -> Box {
    let container = Box::new(Orientation::Vertical, 8);
    container.set_margin_start(12);
    container.set_margin_end(12);
    container.set_margin_bottom(12);

    let heading = Label::new(None);
    heading.set_markup("<b>MOVIES YOU WATCHED</b>");
    heading.set_xalign(0.0);

    let stats = Box::new(Orientation::Horizontal, 16);
    stats.append(&Label::new(Some(&format!("#️⃣ {}", summary.count_label()))));
    stats.append(&Label::new(Some(&format!("⭐️ {}", summary.imdb_rating_label()))));
    stats.append(&Label::new(Some(&format!("🌟 {}", summary.user_rating_label()))));
    stats.append(&Label::new(Some(&format!("⏳ {}", summary.runtime_label()))));

    container.append(&heading);
    container.append(&stats);
    container
}

pub fn watched_list(ui: &Rc<Ui>, watched: &WatchedList) -> ListBox {
    let list_box = ListBox::new();
    list_box.set_selection_mode(gtk::SelectionMode::None);
    for entry in watched {
        list_box.append(&watched_row(ui, entry));
    }
    list_box
}

fn watched_row(ui: &Rc<Ui>, entry: &WatchedEntry) -> ListBoxRow {
    let row = ListBoxRow::new();
    let hbox = Box::new(Orientation::Horizontal, 12);
    hbox.set_margin_start(12);
    hbox.set_margin_end(12);
    hbox.set_margin_top(8);
    hbox.set_margin_bottom(8);

    let vbox = Box::new(Orientation::Vertical, 4);
    vbox.set_hexpand(true);
    vbox.set_valign(Align::Center);

    let title_label = line("", false);
    title_label.set_markup(&format!(
        "<b>{}</b>",
        glib::markup_escape_text(&entry.movie.title)
    ));
    let info_label = line(
        &format!(
            "⭐️ {}   🌟 {}   ⏳ {}",
            entry.movie.imdb_rating, entry.user_rating, entry.movie.runtime
        ),
        true,
    );
    vbox.append(&title_label);
    vbox.append(&info_label);

    let delete_button = Button::with_label("X");
    delete_button.add_css_class("circular");
    delete_button.set_valign(Align::Center);
    delete_button.set_tooltip_text(Some("Remove from watched list"));
    let handle = ui.clone();
    let imdb_id = entry.imdb_id().to_string();
    delete_button.connect_clicked(move |_| handle.delete(&imdb_id));

    hbox.append(&ui.posters.picture(entry.movie.poster_url(), 40, 60));
    hbox.append(&vbox);
    hbox.append(&delete_button);
    row.set_child(Some(&hbox));

    row
}
