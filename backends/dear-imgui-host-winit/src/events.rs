//! Event handling for the winit event source
//!
//! Each handler folds one kind of winit input into an [`ImGuiWidget`] and
//! reports whether the widget consumed it. Pointer positions are logical
//! window coordinates, which the widget treats as screen space.

use dear_imgui_host::{GuiBackend, ImGuiWidget, Reply, Vector2};
use winit::event::{ElementState, Ime, KeyEvent, MouseScrollDelta, TouchPhase};
use winit::keyboard::{Key as WinitKey, KeyLocation, PhysicalKey};

use crate::input::{key_event_to_host_key, to_host_mouse_button};

/// Pixel scroll distance treated as one wheel notch
pub const PIXELS_PER_LINE: f32 = 100.0;

fn merge(a: Reply, b: Reply) -> Reply {
    if a == Reply::Handled || b == Reply::Handled {
        Reply::Handled
    } else {
        Reply::Unhandled
    }
}

/// Handle keyboard input events
pub fn handle_keyboard_input<B: GuiBackend>(event: &KeyEvent, widget: &mut ImGuiWidget<B>) -> Reply {
    handle_key(
        &event.logical_key,
        event.physical_key,
        event.location,
        event.state,
        event.text.as_deref(),
        widget,
    )
}

/// Handle a key transition along with any text it produced.
pub fn handle_key<B: GuiBackend>(
    key: &WinitKey,
    physical: PhysicalKey,
    location: KeyLocation,
    state: ElementState,
    text: Option<&str>,
    widget: &mut ImGuiWidget<B>,
) -> Reply {
    let pressed = state == ElementState::Pressed;
    let mut reply = match key_event_to_host_key(key, physical, location) {
        Some(key) if pressed => widget.on_key_down(key),
        Some(key) => widget.on_key_up(key),
        None => Reply::Unhandled,
    };
    if let (true, Some(text)) = (pressed, text) {
        for ch in text.chars() {
            reply = merge(reply, handle_character_input(ch, widget));
        }
    }
    reply
}

/// Handle character input for text editing
pub fn handle_character_input<B: GuiBackend>(character: char, widget: &mut ImGuiWidget<B>) -> Reply {
    if !character.is_control() || matches!(character, '\t' | '\n' | '\r') {
        widget.on_key_char(character)
    } else {
        Reply::Unhandled
    }
}

/// Handle IME events; only committed text reaches the GUI.
pub fn handle_ime_event<B: GuiBackend>(ime: &Ime, widget: &mut ImGuiWidget<B>) -> Reply {
    match ime {
        Ime::Commit(text) => text
            .chars()
            .filter(|ch| !ch.is_control())
            .fold(Reply::Unhandled, |reply, ch| merge(reply, widget.on_key_char(ch))),
        Ime::Preedit(..) | Ime::Enabled | Ime::Disabled => Reply::Unhandled,
    }
}

/// Handle mouse wheel scrolling
pub fn handle_mouse_wheel<B: GuiBackend>(
    delta: MouseScrollDelta,
    position: Vector2,
    widget: &mut ImGuiWidget<B>,
) -> Reply {
    let (h, v) = match delta {
        MouseScrollDelta::LineDelta(h, v) => (h, v),
        MouseScrollDelta::PixelDelta(pos) => (
            pos.x as f32 / PIXELS_PER_LINE,
            pos.y as f32 / PIXELS_PER_LINE,
        ),
    };
    widget.on_mouse_wheel(v, h, position)
}

/// Handle mouse button events
pub fn handle_mouse_button<B: GuiBackend>(
    button: winit::event::MouseButton,
    state: ElementState,
    position: Vector2,
    widget: &mut ImGuiWidget<B>,
) -> Reply {
    let Some(button) = to_host_mouse_button(button) else {
        return Reply::Unhandled;
    };
    match state {
        ElementState::Pressed => widget.on_mouse_button_down(button, position),
        ElementState::Released => widget.on_mouse_button_up(button, position),
    }
}

/// Handle touch events
pub fn handle_touch_event<B: GuiBackend>(
    phase: TouchPhase,
    position: Vector2,
    widget: &mut ImGuiWidget<B>,
) -> Reply {
    match phase {
        TouchPhase::Started => widget.on_touch_started(position),
        TouchPhase::Moved => widget.on_touch_moved(position),
        TouchPhase::Ended | TouchPhase::Cancelled => widget.on_touch_ended(position),
    }
}

/// Handle window focus events
pub fn handle_focused<B: GuiBackend>(focused: bool, widget: &mut ImGuiWidget<B>) -> Reply {
    if !focused {
        widget.on_focus_lost();
    }
    Reply::Unhandled
}
