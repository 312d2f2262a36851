pub const APP_TITLE: &str = "usePopcorn";

/// Somewhere to show the window title.
pub trait TitlePort {
    fn set_title(&self, title: &str);
}

pub fn movie_title(title: &str) -> String {
    format!("{} - {}", title, APP_TITLE)
}
