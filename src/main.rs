//! A fixed grid of text cells in a window. Click a cell, type, press Return.
//!
//! The font is read from `assets/fonts/ArialRegular.ttf` under the crate root
//! and is not shipped with the source. Copy an Arial TTF there before the
//! first run; without it startup logs `font could not be loaded` and exits
//! with status 1.

mod cell;
mod config;
mod controller;
mod error;
mod grid;
mod menu;
mod renderer;
mod sheet;
mod state;
mod theme;

use std::borrow::Cow;
use std::process;

use gpui::*;
use log::{error, info};

use config::SheetConfig;
use error::StartupError;
use grid::*;
use theme::Theme;

fn abort_startup(err: StartupError) -> ! {
    error!("{err}");
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SheetConfig::default();
    let geometry = config.geometry().unwrap_or_else(|err| abort_startup(err));
    info!(
        "grid is {} columns x {} rows ({} x {} on screen)",
        geometry.cols(),
        geometry.rows(),
        geometry.visible_cols(),
        geometry.visible_rows()
    );
    let font = config.load_font().unwrap_or_else(|err| abort_startup(err));
    info!("loaded font from {}", config.font_path.display());

    Application::new().run(move |cx| {
        if let Err(err) = cx.text_system().add_fonts(vec![Cow::Owned(font)]) {
            abort_startup(StartupError::FontRegistration(format!("{err:#}")));
        }

        // Initialize theme
        Theme::init(cx);

        // Set up menu bar
        menu::setup_menu(cx, &config.title);

        cx.bind_keys([
            KeyBinding::new("enter", Commit, Some("EditMode")),
            KeyBinding::new("backspace", Backspace, Some("EditMode")),
            KeyBinding::new("secondary-q", Quit, None),
        ]);

        // Reached only when the sheet does not have focus.
        cx.on_action::<Quit>(|_, cx| {
            cx.quit();
        });

        let width = config.window_width as f32;
        let height = config.window_height as f32;
        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(width), px(height)),
                cx,
            ))),
            titlebar: Some(TitlebarOptions {
                title: Some(config.title.clone().into()),
                appears_transparent: false,
                ..Default::default()
            }),
            is_resizable: false,
            window_min_size: Some(size(px(width), px(height))),
            ..Default::default()
        };

        let opened = cx.open_window(window_options, |window, cx| {
            let view = cx.new(|cx| SheetView::new(&config, geometry, cx));
            view.focus_handle(cx).focus(window, cx);

            // Closing the window is a quit signal like any other.
            let handle = view.clone();
            window.on_window_should_close(cx, move |window, cx| {
                handle.update(cx, |view, cx| view.quit(&Quit, window, cx));
                true
            });
            view
        });
        if let Err(err) = opened {
            abort_startup(StartupError::Window(format!("{err:#}")));
        }
        info!("window open");
        cx.activate(true);
    });

    info!("shut down");
}
