use gtk::prelude::*;
use gtk::{glib, Align, Box, Button, Label, Orientation};
use std::rc::Rc;

use super::stars::star_rating;
use super::widgets::{line, message};
use super::Ui;
use crate::detail::{DetailPanel, DetailState, MAX_RATING};
use crate::model::MovieDetail;

pub fn detail_view(ui: &Rc<Ui>, panel: &DetailPanel) -> Box {
    let view = Box::new(Orientation::Vertical, 12);
    view.set_margin_start(12);
    view.set_margin_end(12);
    view.set_margin_bottom(12);

    let back_button = Button::with_label("←");
    back_button.add_css_class("circular");
    back_button.set_halign(Align::Start);
    back_button.set_tooltip_text(Some("Back (Esc)"));
    let handle = ui.clone();
    back_button.connect_clicked(move |_| handle.close());
    view.append(&back_button);

    match panel.state() {
        DetailState::Loading => view.append(&message("Loading...")),
        DetailState::Failed(error) => view.append(&message(&format!("⛔ {}", error))),
        DetailState::Loaded(movie) => {
            view.append(&header(ui, movie));
            view.append(&rating_section(ui, panel));
            view.append(&about(movie));
        }
    }

    view
}

fn header(ui: &Ui, movie: &MovieDetail) -> Box {
    let header = Box::new(Orientation::Horizontal, 16);

    let overview = Box::new(Orientation::Vertical, 6);
    overview.set_valign(Align::Center);

    let title = line("", false);
    title.set_markup(&format!(
        "<span size='x-large' weight='bold'>{}</span>",
        glib::markup_escape_text(&movie.title)
    ));
    overview.append(&title);
    overview.append(&line(&format!("{} · {}", movie.year, movie.runtime), true));
    overview.append(&line(&movie.genre, true));
    overview.append(&line(&format!("⭐️ {} IMDb rating", movie.imdb_rating), false));

    header.append(&ui.posters.picture(movie.poster_url(), 120, 180));
    header.append(&overview);
    header
}

fn rating_section(ui: &Rc<Ui>, panel: &DetailPanel) -> Box {
    let section = Box::new(Orientation::Vertical, 8);
    section.add_css_class("card");
    section.set_margin_top(8);

    if panel.watched_before() {
        let note = Label::new(Some("You watched this movie before!"));
        note.set_margin_top(8);
        section.append(&note);
    }

    let handle = ui.clone();
    let stars = star_rating(MAX_RATING, panel.pending_rating(), move |rating| {
        handle.rate(rating)
    });
    stars.set_halign(Align::Center);
    section.append(&stars);

    if panel.can_commit() {
        let add_button = Button::with_label(panel.action_label());
        add_button.add_css_class("suggested-action");
        add_button.set_halign(Align::Center);
        add_button.set_margin_bottom(8);
        let handle = ui.clone();
        add_button.connect_clicked(move |_| handle.commit());
        section.append(&add_button);
    }

    section
}

fn about(movie: &MovieDetail) -> Box {
    let about = Box::new(Orientation::Vertical, 8);

    let plot = line("", false);
    plot.set_markup(&format!("<i>{}</i>", glib::markup_escape_text(&movie.plot)));
    about.append(&plot);
    about.append(&line(&format!("Starring {}", movie.actors), false));
    about.append(&line(&format!("Directed by {}", movie.director), false));
    about
}
