//! Cursor management for the winit event source
//!
//! Maps the cursor requested by a widget onto winit cursor icons and caches
//! the last applied state to avoid redundant window calls.

use dear_imgui_host::{GuiBackend, ImGuiWidget, MouseCursor};
use winit::window::{CursorIcon as WinitCursor, Window};

/// Cursor state last pushed to a window
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CursorSettings {
    /// Cursor to show; `None` hides the OS cursor.
    pub cursor: Option<MouseCursor>,
}

impl CursorSettings {
    /// Cursor the widget currently asks the host to show
    pub fn from_widget<B: GuiBackend>(widget: &ImGuiWidget<B>) -> Self {
        Self {
            cursor: widget.cursor(),
        }
    }

    /// Apply cursor settings to the window
    pub fn apply(&self, window: &Window) {
        match self.cursor {
            Some(mouse_cursor) => {
                window.set_cursor_visible(true);
                window.set_cursor(to_winit_cursor(mouse_cursor));
            }
            None => window.set_cursor_visible(false),
        }
    }
}

/// Convert a host mouse cursor to a winit cursor icon
pub fn to_winit_cursor(cursor: MouseCursor) -> WinitCursor {
    match cursor {
        MouseCursor::None | MouseCursor::Arrow => WinitCursor::Default,
        MouseCursor::TextInput => WinitCursor::Text,
        MouseCursor::ResizeAll => WinitCursor::Move,
        MouseCursor::ResizeNS => WinitCursor::NsResize,
        MouseCursor::ResizeEW => WinitCursor::EwResize,
        MouseCursor::ResizeNESW => WinitCursor::NeswResize,
        MouseCursor::ResizeNWSE => WinitCursor::NwseResize,
        MouseCursor::Hand => WinitCursor::Pointer,
        MouseCursor::NotAllowed => WinitCursor::NotAllowed,
    }
}
