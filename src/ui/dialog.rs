use gtk::prelude::*;
use gtk::{glib, ApplicationWindow, Box, Button, Entry, Label, Orientation, Window};
use std::rc::Rc;

use super::widgets::margins;

/// Resolves once the user enters an OMDb API key or closes the dialog.
pub async fn ask_api_key(window: &ApplicationWindow) -> Option<String> {
    let dialog = Window::builder()
        .title("OMDb API Key Required")
        .modal(true)
        .transient_for(window)
        .default_width(500)
        .default_height(200)
        .build();

    let content = Box::new(Orientation::Vertical, 12);
    margins(&content, 12);

    let info_label = Label::new(Some(
        "To search movies you need an OMDb API key.\n\
        Get one free at: https://www.omdbapi.com/apikey.aspx\n\n\
        Enter your API key below (or set OMDB_API_KEY next time):",
    ));
    info_label.set_wrap(true);

    let api_entry = Entry::new();
    api_entry.set_placeholder_text(Some("Enter OMDb API key"));

    let button_box = Box::new(Orientation::Horizontal, 8);
    button_box.set_halign(gtk::Align::End);
    let ok_btn = Button::with_label("OK");
    button_box.append(&ok_btn);

    content.append(&info_label);
    content.append(&api_entry);
    content.append(&button_box);

    dialog.set_child(Some(&content));

    // first answer wins; closing the window answers with nothing
    let (answer, answered) = async_channel::bounded::<String>(1);

    let submit = {
        let answer = answer.clone();
        let dialog = dialog.clone();
        let api_entry = api_entry.clone();
        move || {
            let _ = answer.try_send(api_entry.text().trim().to_string());
            dialog.close();
        }
    };
    let submit = Rc::new(submit);
    let on_click = submit.clone();
    ok_btn.connect_clicked(move |_| on_click());
    api_entry.connect_activate(move |_| submit());
    dialog.connect_close_request(move |_| {
        let _ = answer.try_send(String::new());
        glib::Propagation::Proceed
    });

    dialog.present();

    let key = answered.recv().await.ok()?;
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
