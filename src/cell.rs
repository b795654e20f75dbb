// Platform text input for the cell being edited.
//
// The platform talks UTF-16 offsets; the sheet stores UTF-8. The cursor always
// sits at the end of the cell, so committed text is appended and IME
// composition is kept aside in `preedit` until the platform commits it. A
// commit aimed at already committed text (an accent picker replacing the
// letter just typed) replaces that text instead.

use std::ops::Range;

use gpui::*;

use crate::controller::InputEvent;
use crate::grid::SheetView;

fn offset_from_utf16(text: &str, offset: usize) -> usize {
    let mut utf8_offset = 0;
    let mut utf16_count = 0;

    for ch in text.chars() {
        if utf16_count >= offset {
            break;
        }
        utf16_count += ch.len_utf16();
        utf8_offset += ch.len_utf8();
    }

    utf8_offset
}

fn offset_to_utf16(text: &str, offset: usize) -> usize {
    let mut utf16_offset = 0;
    let mut utf8_count = 0;

    for ch in text.chars() {
        if utf8_count >= offset {
            break;
        }
        utf8_count += ch.len_utf8();
        utf16_offset += ch.len_utf16();
    }

    utf16_offset
}

/// Turn a platform commit into a controller event. `range_utf16` indexes the
/// committed text followed by the composition; only the committed part can
/// be replaced, anything from the composition onward is appended.
fn commit_event(
    committed: &str,
    preedit: Option<&str>,
    range_utf16: Option<Range<usize>>,
    new_text: &str,
) -> InputEvent {
    let text = format!("{committed}{}", preedit.unwrap_or_default());
    let Some(range) = range_utf16 else {
        return InputEvent::TextInput(new_text.to_string());
    };
    let start = offset_from_utf16(&text, range.start);
    if start >= committed.len() {
        return InputEvent::TextInput(new_text.to_string());
    }
    let end = offset_from_utf16(&text, range.end).clamp(start, committed.len());
    InputEvent::ReplaceText {
        range: start..end,
        text: new_text.to_string(),
    }
}

impl SheetView {
    /// Content of the cell being edited plus any uncommitted composition.
    fn input_text(&self) -> Option<String> {
        let pos = self.controller.state().selected()?;
        let mut text = self.sheet.content(pos).to_string();
        if let Some(preedit) = &self.preedit {
            text.push_str(preedit);
        }
        Some(text)
    }

    fn committed_len(&self) -> usize {
        self.controller
            .state()
            .selected()
            .map_or(0, |pos| self.sheet.content(pos).len())
    }
}

impl EntityInputHandler for SheetView {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<String> {
        let text = self.input_text()?;
        let start = offset_from_utf16(&text, range_utf16.start);
        let end = offset_from_utf16(&text, range_utf16.end).max(start);
        actual_range.replace(offset_to_utf16(&text, start)..offset_to_utf16(&text, end));
        Some(text[start..end].to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        let text = self.input_text()?;
        let end = offset_to_utf16(&text, text.len());
        Some(UTF16Selection {
            range: end..end,
            reversed: false,
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        self.preedit.as_ref()?;
        let text = self.input_text()?;
        let start = offset_to_utf16(&text, self.committed_len());
        Some(start..offset_to_utf16(&text, text.len()))
    }

    fn unmark_text(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        if self.preedit.take().is_some() {
            cx.notify();
        }
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let Some(pos) = self.controller.state().selected() else {
            return;
        };
        let event = commit_event(
            self.sheet.content(pos),
            self.preedit.as_deref(),
            range_utf16,
            new_text,
        );
        if self.preedit.take().is_some() {
            cx.notify();
        }
        self.dispatch(event, cx);
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        _range_utf16: Option<Range<usize>>,
        new_text: &str,
        _new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !self.controller.is_editing() {
            return;
        }
        self.preedit = (!new_text.is_empty()).then(|| new_text.to_string());
        cx.notify();
    }

    fn bounds_for_range(
        &mut self,
        _range_utf16: Range<usize>,
        bounds: Bounds<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let pos = self.controller.state().selected()?;
        let rect = self.sheet.cell(pos)?.bounds;
        Some(Bounds::new(
            point(bounds.left() + px(rect.x), bounds.top() + px(rect.y)),
            size(px(rect.w), px(rect.h)),
        ))
    }

    fn character_index_for_point(
        &mut self,
        _point: gpui::Point<Pixels>,
        _window: &mut Window,
        _cx: &mut Context<Self>,
    ) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_offsets_count_surrogate_pairs() {
        let text = "a😀b";
        assert_eq!(offset_to_utf16(text, 0), 0);
        assert_eq!(offset_to_utf16(text, 1), 1);
        assert_eq!(offset_to_utf16(text, 5), 3);
        assert_eq!(offset_to_utf16(text, text.len()), 4);
    }

    #[test]
    fn utf16_offsets_map_back_to_char_boundaries() {
        let text = "é😀";
        assert_eq!(offset_from_utf16(text, 1), 2);
        assert_eq!(offset_from_utf16(text, 3), 6);
        assert_eq!(offset_from_utf16(text, 10), text.len());
    }

    #[test]
    fn commits_without_a_range_append() {
        assert_eq!(
            commit_event("ab", None, None, "c"),
            InputEvent::TextInput("c".to_string())
        );
    }

    #[test]
    fn commits_over_committed_text_replace_it() {
        assert_eq!(
            commit_event("e", None, Some(0..1), "é"),
            InputEvent::ReplaceText {
                range: 0..1,
                text: "é".to_string(),
            }
        );
        // UTF-16 offsets past a surrogate pair map to byte offsets.
        assert_eq!(
            commit_event("😀a", None, Some(2..3), "b"),
            InputEvent::ReplaceText {
                range: 4..5,
                text: "b".to_string(),
            }
        );
    }

    #[test]
    fn commits_over_the_composition_append() {
        assert_eq!(
            commit_event("ab", Some("ka"), Some(2..4), "か"),
            InputEvent::TextInput("か".to_string())
        );
        // A range straddling both parts only replaces the committed part.
        assert_eq!(
            commit_event("ab", Some("ka"), Some(1..4), "x"),
            InputEvent::ReplaceText {
                range: 1..2,
                text: "x".to_string(),
            }
        );
    }

    mod view {
        use super::super::*;
        use crate::config::SheetConfig;
        use crate::controller::PointerButton;
        use crate::state::CellPosition;
        use crate::theme::Theme;

        fn open_sheet(cx: &mut TestAppContext) -> (Entity<SheetView>, &mut VisualTestContext) {
            cx.update(Theme::init);
            let config = SheetConfig::default();
            let geometry = config.geometry().unwrap();
            cx.add_window_view(move |_, cx| SheetView::new(&config, geometry, cx))
        }

        fn click_first_cell(view: &mut SheetView, cx: &mut Context<SheetView>) {
            view.dispatch(
                InputEvent::MouseDown {
                    button: PointerButton::Primary,
                    x: 25.0,
                    y: 25.0,
                },
                cx,
            );
        }

        #[gpui::test]
        fn accent_replacement_swaps_the_typed_letter(cx: &mut TestAppContext) {
            let (view, cx) = open_sheet(cx);
            view.update_in(cx, |view, window, cx| {
                click_first_cell(view, cx);
                view.replace_text_in_range(None, "e", window, cx);
                assert_eq!(view.sheet.content(CellPosition::new(0, 0)), "e");

                view.replace_text_in_range(Some(0..1), "é", window, cx);
                assert_eq!(view.sheet.content(CellPosition::new(0, 0)), "é");
            });
        }

        #[gpui::test]
        fn composition_is_marked_until_return(cx: &mut TestAppContext) {
            let (view, cx) = open_sheet(cx);
            view.update_in(cx, |view, window, cx| {
                click_first_cell(view, cx);
                view.replace_text_in_range(None, "a", window, cx);
                view.replace_and_mark_text_in_range(None, "ka", None, window, cx);
                assert_eq!(view.marked_text_range(window, cx), Some(1..3));
                assert_eq!(view.sheet.content(CellPosition::new(0, 0)), "a");

                view.dispatch(InputEvent::KeyDown(crate::controller::Key::Return), cx);
                assert!(view.preedit.is_none());
                assert!(!view.controller.is_editing());
                assert_eq!(view.sheet.content(CellPosition::new(0, 0)), "a");
            });
        }
    }
}
