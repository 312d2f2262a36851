use gtk::prelude::*;
use gtk::{Box, Button, EventControllerMotion, Label, Orientation};
use std::rc::Rc;

const FULL: &str = "★";
const EMPTY: &str = "☆";

/// Row of `max` star buttons. Hovering previews a rating, clicking sets it.
pub fn star_rating(max: u8, current: Option<u8>, on_rate: impl Fn(u8) + 'static) -> Box {
    let container = Box::new(Orientation::Horizontal, 8);
    let stars = Box::new(Orientation::Horizontal, 0);
    let value = Label::new(None);
    value.set_width_chars(2);
    let current = current.unwrap_or(0);

    let on_rate = Rc::new(on_rate);
    for rating in 1..=max {
        let button = Button::with_label(EMPTY);
        button.add_css_class("flat");
        button.set_tooltip_text(Some(&format!("{} / {}", rating, max)));

        let on_rate = on_rate.clone();
        button.connect_clicked(move |_| on_rate(rating));

        let motion = EventControllerMotion::new();
        let (weak_stars, weak_value) = (stars.downgrade(), value.downgrade());
        motion.connect_enter(move |_, _, _| {
            if let (Some(stars), Some(value)) = (weak_stars.upgrade(), weak_value.upgrade()) {
                paint(&stars, &value, rating);
            }
        });
        let (weak_stars, weak_value) = (stars.downgrade(), value.downgrade());
        motion.connect_leave(move |_| {
            if let (Some(stars), Some(value)) = (weak_stars.upgrade(), weak_value.upgrade()) {
                paint(&stars, &value, current);
            }
        });
        button.add_controller(motion);

        stars.append(&button);
    }
    paint(&stars, &value, current);

    container.append(&stars);
    container.append(&value);
    container
}

fn paint(stars: &Box, value: &Label, filled: u8) {
    let mut child = stars.first_child();
    let mut index = 0u8;
    while let Some(widget) = child {
        if let Some(button) = widget.downcast_ref::<Button>() {
            index += 1;
            button.set_label(if index <= filled { FULL } else { EMPTY });
        }
        child = widget.next_sibling();
    }
    if filled == 0 {
        value.set_text("");
    } else {
        value.set_text(&filled.to_string());
    }
}
