use gpui::*;

use crate::grid::Quit;

/// Set up the application menu bar
pub fn setup_menu(cx: &mut App, title: &str) {
    cx.set_menus(vec![Menu {
        name: title.to_string().into(),
        items: vec![MenuItem::action("Quit", Quit)],
    }]);
}
