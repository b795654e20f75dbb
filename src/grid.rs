use gpui::*;
use log::info;

use crate::config::SheetConfig;
use crate::controller::{EditController, InputEvent, Key, Outcome, PointerButton};
use crate::renderer::{self, RasterLog, RenderStyle};
use crate::sheet::{Geometry, Sheet};
use crate::Theme;

// Edit mode actions
actions!(edit_mode, [Commit, Backspace]);

// Global actions
actions!(cellgrid, [Quit]);

/// The sheet window's root view. Owns the grid, the edit state machine and
/// everything needed to draw a frame.
pub struct SheetView {
    focus_handle: FocusHandle,
    pub(crate) sheet: Sheet,
    pub(crate) controller: EditController,
    style: Option<RenderStyle>,
    raster_log: RasterLog,
    pub(crate) preedit: Option<String>,
    padding: f32,
}

impl SheetView {
    pub fn new(config: &SheetConfig, geometry: Geometry, cx: &mut Context<Self>) -> Self {
        let style = RenderStyle::new(config, cx.global::<Theme>());
        Self {
            focus_handle: cx.focus_handle(),
            sheet: Sheet::new(geometry),
            controller: EditController::new(),
            style: Some(style),
            raster_log: RasterLog::default(),
            preedit: None,
            padding: config.cell_padding,
        }
    }

    pub(crate) fn dispatch(&mut self, event: InputEvent, cx: &mut Context<Self>) {
        let was_editing = self.controller.is_editing();
        match self.controller.handle(&mut self.sheet, event) {
            Outcome::Ignored => {}
            Outcome::Redraw => {
                if was_editing != self.controller.is_editing() {
                    self.preedit = None;
                }
                cx.notify();
            }
            Outcome::Terminate => self.shutdown(cx),
        }
    }

    fn on_mouse_down(&mut self, event: &MouseDownEvent, _window: &mut Window, cx: &mut Context<Self>) {
        let button = match event.button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => PointerButton::Other,
        };
        self.dispatch(
            InputEvent::MouseDown {
                button,
                x: f32::from(event.position.x),
                y: f32::from(event.position.y),
            },
            cx,
        );
    }

    fn commit(&mut self, _: &Commit, _window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(InputEvent::KeyDown(Key::Return), cx);
    }

    fn backspace(&mut self, _: &Backspace, _window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(InputEvent::KeyDown(Key::Backspace), cx);
    }

    pub fn quit(&mut self, _: &Quit, _window: &mut Window, cx: &mut Context<Self>) {
        self.dispatch(InputEvent::Quit, cx);
    }

    /// Drop what this view holds, then let gpui close the window and the
    /// platform. The font face stays registered with gpui until exit.
    fn shutdown(&mut self, cx: &mut Context<Self>) {
        info!("dropping render style");
        self.style = None;
        self.preedit = None;
        info!("closing window");
        cx.quit();
    }
}

impl Render for SheetView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = self.controller.state();
        let key_context = if self.controller.is_editing() {
            "EditMode"
        } else {
            "Sheet"
        };

        let list = renderer::build_display_list(
            &self.sheet,
            state,
            self.preedit.as_deref(),
            self.padding,
        );
        let style = self.style.clone();
        let editing = self.controller.is_editing();
        let focus_handle = self.focus_handle.clone();
        let entity = cx.entity().clone();

        div()
            .size_full()
            .key_context(key_context)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::commit))
            .on_action(cx.listener(Self::backspace))
            .on_action(cx.listener(Self::quit))
            .on_any_mouse_down(cx.listener(Self::on_mouse_down))
            .child(
                canvas(
                    |_, _, _| {},
                    move |bounds, _, window, cx| {
                        // Text input only reaches the sheet during an edit session.
                        if editing {
                            window.handle_input(
                                &focus_handle,
                                ElementInputHandler::new(bounds, entity.clone()),
                                cx,
                            );
                        }
                        let Some(style) = style else {
                            return;
                        };
                        let failures = renderer::paint_display_list(&list, &style, bounds, window, cx);
                        if !failures.is_empty() {
                            entity.update(cx, |view, _| {
                                for failure in failures {
                                    view.raster_log.record(failure);
                                }
                            });
                        }
                    },
                )
                .size_full(),
            )
    }
}

impl Focusable for SheetView {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EditState;

    #[gpui::test]
    fn quit_releases_view_resources(cx: &mut TestAppContext) {
        cx.update(Theme::init);
        let config = SheetConfig::default();
        let geometry = config.geometry().unwrap();
        let (view, cx) = cx.add_window_view(move |_, cx| SheetView::new(&config, geometry, cx));

        view.update_in(cx, |view, window, cx| {
            view.preedit = Some("ka".to_string());
            assert!(view.style.is_some());
            view.quit(&Quit, window, cx);
            assert_eq!(view.controller.state(), EditState::Terminating);
            assert!(view.style.is_none());
            assert!(view.preedit.is_none());
        });
    }
}
