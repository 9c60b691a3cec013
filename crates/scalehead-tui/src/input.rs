use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};

use crate::keymap::{KeyBinding, Keymap};

/// User actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Drag the content one row toward the bottom
    DragDown,
    DragUp,
    FlickDown,
    FlickUp,
    Expand,
    Collapse,
    CycleSnapMode,
    FinishLoading,
    None,
}

pub fn handle_key_event(key: KeyEvent, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, key.modifiers);
    keymap.get(&binding).copied().unwrap_or(Action::None)
}

/// Mouse wheel drags like the keyboard does
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::DragDown,
        MouseEventKind::ScrollUp => Action::DragUp,
        _ => Action::None,
    }
}
