use gtk::prelude::*;
use gtk::{Align, Box, Button, Label, Orientation, SearchEntry};

use crate::title::APP_TITLE;

pub fn clear(container: &Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}

pub fn margins(widget: &impl IsA<gtk::Widget>, margin: i32) {
    widget.set_margin_start(margin);
    widget.set_margin_end(margin);
    widget.set_margin_top(margin);
    widget.set_margin_bottom(margin);
}

pub fn message(text: &str) -> Label {
    let label = Label::new(Some(text));
    label.set_wrap(true);
    label.set_margin_top(24);
    label.add_css_class("title-4");
    label
}

/// Left-aligned line of text, dimmed if `dim`.
pub fn line(text: &str, dim: bool) -> Label {
    let label = Label::new(Some(text));
    label.set_xalign(0.0);
    label.set_wrap(true);
    if dim {
        label.set_opacity(0.7);
    }
    label
}

pub struct NavBar {
    pub container: Box,
    pub search_entry: SearchEntry,
    pub num_results: Label,
}

pub fn nav_bar() -> NavBar {
    let container = Box::new(Orientation::Horizontal, 12);
    margins(&container, 12);

    let logo = Label::new(None);
    logo.set_markup(&format!(
        "<span size='x-large' weight='bold'>🍿 {}</span>",
        APP_TITLE
    ));
    logo.set_xalign(0.0);
    logo.set_hexpand(true);

    let search_entry = SearchEntry::new();
    search_entry.set_placeholder_text(Some("Search movies..."));
    search_entry.set_width_chars(32);

    let num_results = Label::new(None);
    num_results.set_hexpand(true);
    num_results.set_xalign(1.0);

    container.append(&logo);
    container.append(&search_entry);
    container.append(&num_results);

    NavBar {
        container,
        search_entry,
        num_results,
    }
}

/// Frame with a button that hides and shows `content`.
pub fn toggle_box(content: &impl IsA<gtk::Widget>) -> Box {
    let frame = Box::new(Orientation::Vertical, 0);
    frame.add_css_class("card");
    frame.set_hexpand(true);
    frame.set_vexpand(true);
    margins(&frame, 12);

    let toggle = Button::with_label("–");
    toggle.add_css_class("flat");
    toggle.set_halign(Align::End);

    frame.append(&toggle);
    frame.append(content);

    let content = content.clone().upcast::<gtk::Widget>();
    toggle.connect_clicked(move |button| {
        let open = !content.is_visible();
        content.set_visible(open);
        button.set_label(if open { "–" } else { "+" });
    });

    frame
}
