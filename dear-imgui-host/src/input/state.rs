//! Per-surface input snapshot.
//!
//! Host events are folded into an [`InputState`] as they arrive. Once per tick
//! the snapshot is copied into the backend IO and the edge-triggered parts are
//! cleared, so characters and wheel deltas are consumed exactly once while
//! held keys and buttons persist across ticks.

use super::{
    GamepadAxis, GamepadButton, KEY_COUNT, KeyModFlags, MOUSE_BUTTON_COUNT, MouseButton,
    NAV_INPUT_COUNT, interop,
};
use crate::math::Vector2;

/// Keyboard, mouse and gamepad state accumulated between two ticks.
#[derive(Clone, Debug)]
pub struct InputState {
    keys_down: [bool; KEY_COUNT],
    mouse_down: [bool; MOUSE_BUTTON_COUNT],
    mouse_pos: Vector2,
    touch_down: bool,
    touch_pos: Vector2,
    mouse_pointer: bool,
    ctrl_down: bool,
    shift_down: bool,
    alt_down: bool,
    super_down: bool,
    nav_inputs: [f32; NAV_INPUT_COUNT],
    keyboard_navigation_enabled: bool,
    gamepad_navigation_enabled: bool,
    has_gamepad: bool,

    input_characters: Vec<char>,
    mouse_wheel_delta: f32,
    mouse_wheel_h_delta: f32,
    keys_updated: Vec<usize>,
    mouse_buttons_updated: Vec<usize>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys_down: [false; KEY_COUNT],
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_pos: [0.0, 0.0],
            touch_down: false,
            touch_pos: [0.0, 0.0],
            mouse_pointer: false,
            ctrl_down: false,
            shift_down: false,
            alt_down: false,
            super_down: false,
            nav_inputs: [0.0; NAV_INPUT_COUNT],
            keyboard_navigation_enabled: false,
            gamepad_navigation_enabled: false,
            has_gamepad: false,
            input_characters: Vec::new(),
            mouse_wheel_delta: 0.0,
            mouse_wheel_h_delta: 0.0,
            keys_updated: Vec::new(),
            mouse_buttons_updated: Vec::new(),
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // Keyboard

    /// Sets the state of the key at a dense key index. Out-of-range indices
    /// are ignored.
    pub fn set_key_down(&mut self, key_index: usize, down: bool) {
        let Some(slot) = self.keys_down.get_mut(key_index) else {
            host_trace!("Ignoring out-of-range key index {}", key_index);
            return;
        };
        if *slot != down {
            *slot = down;
            if !self.keys_updated.contains(&key_index) {
                self.keys_updated.push(key_index);
            }
        }
    }

    /// Whether the key at a dense key index is held.
    pub fn is_key_down(&self, key_index: usize) -> bool {
        self.keys_down.get(key_index).copied().unwrap_or(false)
    }

    pub fn keys_down(&self) -> &[bool; KEY_COUNT] {
        &self.keys_down
    }

    /// Queues a typed character for the next tick.
    pub fn add_character(&mut self, ch: char) {
        self.input_characters.push(ch);
    }

    pub fn characters(&self) -> &[char] {
        &self.input_characters
    }

    pub fn set_control_down(&mut self, down: bool) {
        self.ctrl_down = down;
    }

    pub fn set_shift_down(&mut self, down: bool) {
        self.shift_down = down;
    }

    pub fn set_alt_down(&mut self, down: bool) {
        self.alt_down = down;
    }

    pub fn set_super_down(&mut self, down: bool) {
        self.super_down = down;
    }

    pub fn is_control_down(&self) -> bool {
        self.ctrl_down
    }

    pub fn is_shift_down(&self) -> bool {
        self.shift_down
    }

    pub fn is_alt_down(&self) -> bool {
        self.alt_down
    }

    pub fn is_super_down(&self) -> bool {
        self.super_down
    }

    /// Modifiers currently held
    pub fn modifiers(&self) -> KeyModFlags {
        let mut flags = KeyModFlags::empty();
        flags.set(KeyModFlags::CTRL, self.ctrl_down);
        flags.set(KeyModFlags::SHIFT, self.shift_down);
        flags.set(KeyModFlags::ALT, self.alt_down);
        flags.set(KeyModFlags::SUPER, self.super_down);
        flags
    }

    /// Releases every key and modifier, e.g. when the host widget loses focus.
    pub fn reset_keyboard_keys(&mut self) {
        for index in 0..KEY_COUNT {
            self.set_key_down(index, false);
        }
        self.ctrl_down = false;
        self.shift_down = false;
        self.alt_down = false;
        self.super_down = false;
    }

    // Mouse

    pub fn set_mouse_down(&mut self, button: MouseButton, down: bool) {
        let index = button.index();
        if self.mouse_down[index] != down {
            self.mouse_down[index] = down;
            if !self.mouse_buttons_updated.contains(&index) {
                self.mouse_buttons_updated.push(index);
            }
        }
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    pub fn mouse_buttons_down(&self) -> &[bool; MOUSE_BUTTON_COUNT] {
        &self.mouse_down
    }

    /// Sets the mouse position in canvas space.
    pub fn set_mouse_position(&mut self, pos: Vector2) {
        self.mouse_pos = pos;
    }

    pub fn mouse_position(&self) -> Vector2 {
        self.mouse_pos
    }

    pub fn add_mouse_wheel_delta(&mut self, delta: f32) {
        self.mouse_wheel_delta += delta;
    }

    pub fn add_mouse_wheel_h_delta(&mut self, delta: f32) {
        self.mouse_wheel_h_delta += delta;
    }

    pub fn mouse_wheel_delta(&self) -> f32 {
        self.mouse_wheel_delta
    }

    pub fn mouse_wheel_h_delta(&self) -> f32 {
        self.mouse_wheel_h_delta
    }

    /// Releases every mouse button, e.g. when the pointer leaves the host widget.
    pub fn reset_mouse_buttons(&mut self) {
        for button in MouseButton::ALL {
            self.set_mouse_down(button, false);
        }
        self.touch_down = false;
    }

    /// Whether the backend should draw its own cursor at the mouse position.
    pub fn set_mouse_pointer(&mut self, has_pointer: bool) {
        self.mouse_pointer = has_pointer;
    }

    pub fn has_mouse_pointer(&self) -> bool {
        self.mouse_pointer
    }

    // Touch

    /// Touch is reported to the backend as the left mouse button.
    pub fn set_touch_down(&mut self, down: bool) {
        self.touch_down = down;
    }

    /// Sets the touch position in canvas space.
    pub fn set_touch_position(&mut self, pos: Vector2) {
        self.touch_pos = pos;
    }

    pub fn is_touch_down(&self) -> bool {
        self.touch_down
    }

    pub fn touch_position(&self) -> Vector2 {
        self.touch_pos
    }

    // Navigation

    pub fn set_gamepad_navigation_key(&mut self, button: GamepadButton, down: bool) {
        interop::set_gamepad_navigation_key(&mut self.nav_inputs, button, down);
    }

    pub fn set_gamepad_navigation_axis(&mut self, axis: GamepadAxis, value: f32) {
        interop::set_gamepad_navigation_axis(&mut self.nav_inputs, axis, value);
    }

    pub fn navigation_inputs(&self) -> &[f32; NAV_INPUT_COUNT] {
        &self.nav_inputs
    }

    pub fn reset_navigation_inputs(&mut self) {
        self.nav_inputs = [0.0; NAV_INPUT_COUNT];
    }

    pub fn set_keyboard_navigation_enabled(&mut self, enabled: bool) {
        self.keyboard_navigation_enabled = enabled;
    }

    pub fn set_gamepad_navigation_enabled(&mut self, enabled: bool) {
        self.gamepad_navigation_enabled = enabled;
    }

    pub fn is_keyboard_navigation_enabled(&self) -> bool {
        self.keyboard_navigation_enabled
    }

    pub fn is_gamepad_navigation_enabled(&self) -> bool {
        self.gamepad_navigation_enabled
    }

    /// Whether a gamepad is attached to the host.
    pub fn set_gamepad_attached(&mut self, attached: bool) {
        self.has_gamepad = attached;
    }

    pub fn has_gamepad(&self) -> bool {
        self.has_gamepad
    }

    // Update tracking

    /// Dense key indices whose state changed since the last tick.
    pub fn keys_updated(&self) -> &[usize] {
        &self.keys_updated
    }

    /// Mouse button indices whose state changed since the last tick.
    pub fn mouse_buttons_updated(&self) -> &[usize] {
        &self.mouse_buttons_updated
    }

    /// Clears the edge-triggered part of the snapshot: queued characters,
    /// wheel deltas and change tracking. Held keys, buttons, modifiers and
    /// navigation inputs are kept.
    pub fn clear_update_state(&mut self) {
        self.input_characters.clear();
        self.mouse_wheel_delta = 0.0;
        self.mouse_wheel_h_delta = 0.0;
        self.keys_updated.clear();
        self.mouse_buttons_updated.clear();
    }
}
