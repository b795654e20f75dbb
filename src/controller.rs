use std::ops::Range;

use log::debug;

use crate::sheet::Sheet;
use crate::state::EditState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Return,
    Backspace,
}

/// A single input event, already translated out of the windowing layer.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    TextInput(String),
    /// Committed text replacing a byte range of the edited cell, as when an
    /// accent picker swaps the character just typed.
    ReplaceText { range: Range<usize>, text: String },
    MouseDown { button: PointerButton, x: f32, y: f32 },
}

/// What the caller has to do after an event was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Redraw,
    Terminate,
}

/// Drives edit sessions: a click selects a cell, keystrokes edit it, Return
/// ends the session. Mouse input is ignored until the session ends.
#[derive(Debug)]
pub struct EditController {
    state: EditState,
}

impl Default for EditController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditController {
    pub fn new() -> Self {
        Self {
            state: EditState::Idle,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn handle(&mut self, sheet: &mut Sheet, event: InputEvent) -> Outcome {
        match (self.state, event) {
            (EditState::Terminating, _) => Outcome::Ignored,
            (_, InputEvent::Quit) => {
                debug!("quit requested while {:?}", self.state);
                self.state = EditState::Terminating;
                Outcome::Terminate
            }
            (
                EditState::Idle,
                InputEvent::MouseDown {
                    button: PointerButton::Primary,
                    x,
                    y,
                },
            ) => match sheet.hit_test(x, y) {
                Some(pos) => {
                    debug!("editing {}", pos.to_reference());
                    self.state = EditState::Editing(pos);
                    Outcome::Redraw
                }
                None => Outcome::Ignored,
            },
            (EditState::Idle, _) => Outcome::Ignored,
            (EditState::Editing(pos), InputEvent::KeyDown(Key::Return)) => {
                debug!("finished editing {}", pos.to_reference());
                self.state = EditState::Idle;
                Outcome::Redraw
            }
            (EditState::Editing(pos), InputEvent::KeyDown(Key::Backspace)) => {
                let removed = sheet
                    .cell_mut(pos)
                    .is_some_and(|cell| cell.delete_last_grapheme());
                if removed {
                    Outcome::Redraw
                } else {
                    Outcome::Ignored
                }
            }
            (EditState::Editing(pos), InputEvent::TextInput(text)) => {
                if text.is_empty() {
                    return Outcome::Ignored;
                }
                match sheet.cell_mut(pos) {
                    Some(cell) => {
                        cell.append(&text);
                        Outcome::Redraw
                    }
                    None => Outcome::Ignored,
                }
            }
            (EditState::Editing(pos), InputEvent::ReplaceText { range, text }) => {
                match sheet.cell_mut(pos) {
                    Some(cell) => {
                        let before = cell.content.len();
                        cell.replace_range(range, &text);
                        if text.is_empty() && cell.content.len() == before {
                            Outcome::Ignored
                        } else {
                            Outcome::Redraw
                        }
                    }
                    None => Outcome::Ignored,
                }
            }
            (EditState::Editing(_), InputEvent::MouseDown { .. }) => Outcome::Ignored,
        }
    }
}
