use std::path::{Path, PathBuf};

use bitflags::bitflags;

use crate::input::{KEY_COUNT, KeyMapSlot, MOUSE_BUTTON_COUNT, MouseButton, NAV_INPUT_COUNT, NavInput};
use crate::math::Vector2;

bitflags! {
    /// Configuration flags
    #[repr(transparent)]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u32 {
        /// Master keyboard navigation enable flag.
        const NAV_ENABLE_KEYBOARD = 1 << 0;
        /// Master gamepad navigation enable flag.
        const NAV_ENABLE_GAMEPAD = 1 << 1;
        /// Ignore mouse position and buttons.
        const NO_MOUSE = 1 << 4;
        /// Instruct the host to not alter mouse cursor shape and visibility.
        const NO_MOUSE_CURSOR_CHANGE = 1 << 5;
    }
}

bitflags! {
    /// Backend capabilities
    #[repr(transparent)]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BackendFlags: u32 {
        /// Host has a gamepad connected
        const HAS_GAMEPAD = 1 << 0;
        /// Host honours `mouse_cursor` to change the cursor shape
        const HAS_MOUSE_CURSORS = 1 << 1;
    }
}

/// Per-context inputs and outputs exchanged between the host and the backend.
///
/// The host writes display size, timing and input before each frame; the
/// backend writes the capture flags and frame rate while producing it.
#[derive(Clone, Debug)]
pub struct Io {
    display_size: Vector2,
    delta_time: f32,
    ini_filename: Option<PathBuf>,
    config_flags: ConfigFlags,
    backend_flags: BackendFlags,
    key_map: [usize; KeyMapSlot::COUNT],
    keys_down: [bool; KEY_COUNT],
    key_ctrl: bool,
    key_shift: bool,
    key_alt: bool,
    key_super: bool,
    mouse_pos: Vector2,
    mouse_down: [bool; MOUSE_BUTTON_COUNT],
    mouse_wheel: f32,
    mouse_wheel_h: f32,
    mouse_draw_cursor: bool,
    nav_inputs: [f32; NAV_INPUT_COUNT],
    input_queue_characters: Vec<char>,
    want_capture_mouse: bool,
    want_capture_keyboard: bool,
    framerate: f32,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            display_size: [-1.0, -1.0],
            delta_time: 1.0 / 60.0,
            ini_filename: None,
            config_flags: ConfigFlags::empty(),
            backend_flags: BackendFlags::empty(),
            key_map: [usize::MAX; KeyMapSlot::COUNT],
            keys_down: [false; KEY_COUNT],
            key_ctrl: false,
            key_shift: false,
            key_alt: false,
            key_super: false,
            mouse_pos: [-f32::MAX, -f32::MAX],
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            mouse_draw_cursor: false,
            nav_inputs: [0.0; NAV_INPUT_COUNT],
            input_queue_characters: Vec::new(),
            want_capture_mouse: false,
            want_capture_keyboard: false,
            framerate: 60.0,
        }
    }
}

impl Io {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main display size in pixels
    pub fn display_size(&self) -> Vector2 {
        self.display_size
    }

    /// Set main display size in pixels
    pub fn set_display_size(&mut self, size: Vector2) {
        self.display_size = size;
    }

    /// Time elapsed since last frame, in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Set time elapsed since last frame, in seconds
    pub fn set_delta_time(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    /// Path of the settings file, `None` disables persistence
    pub fn ini_filename(&self) -> Option<&Path> {
        self.ini_filename.as_deref()
    }

    pub fn set_ini_filename(&mut self, filename: Option<PathBuf>) {
        self.ini_filename = filename;
    }

    pub fn config_flags(&self) -> ConfigFlags {
        self.config_flags
    }

    pub fn set_config_flags(&mut self, flags: ConfigFlags) {
        self.config_flags = flags;
    }

    pub fn backend_flags(&self) -> BackendFlags {
        self.backend_flags
    }

    pub fn set_backend_flags(&mut self, flags: BackendFlags) {
        self.backend_flags = flags;
    }

    /// Dense key index bound to a key map slot, `None` when unmapped
    pub fn key_map(&self, slot: KeyMapSlot) -> Option<usize> {
        let index = self.key_map[slot.index()];
        (index < KEY_COUNT).then_some(index)
    }

    pub fn set_key_map(&mut self, slot: KeyMapSlot, key_index: usize) {
        self.key_map[slot.index()] = key_index;
    }

    /// Check if the key at a dense index is down
    pub fn key_down(&self, key_index: usize) -> bool {
        self.keys_down.get(key_index).copied().unwrap_or(false)
    }

    pub fn keys_down_mut(&mut self) -> &mut [bool; KEY_COUNT] {
        &mut self.keys_down
    }

    pub fn key_ctrl(&self) -> bool {
        self.key_ctrl
    }

    pub fn key_shift(&self) -> bool {
        self.key_shift
    }

    pub fn key_alt(&self) -> bool {
        self.key_alt
    }

    pub fn key_super(&self) -> bool {
        self.key_super
    }

    /// Set modifier states in `ctrl, shift, alt, super` order
    pub fn set_key_modifiers(&mut self, ctrl: bool, shift: bool, alt: bool, super_: bool) {
        self.key_ctrl = ctrl;
        self.key_shift = shift;
        self.key_alt = alt;
        self.key_super = super_;
    }

    /// Mouse position, in pixels
    pub fn mouse_pos(&self) -> Vector2 {
        self.mouse_pos
    }

    /// Set mouse position, in pixels
    pub fn set_mouse_pos(&mut self, pos: Vector2) {
        self.mouse_pos = pos;
    }

    /// Check if a mouse button is down
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    /// Set mouse button state
    pub fn set_mouse_down(&mut self, button: MouseButton, down: bool) {
        self.mouse_down[button.index()] = down;
    }

    /// Mouse wheel vertical scrolling
    pub fn mouse_wheel(&self) -> f32 {
        self.mouse_wheel
    }

    /// Set mouse wheel vertical scrolling
    pub fn set_mouse_wheel(&mut self, wheel: f32) {
        self.mouse_wheel = wheel;
    }

    /// Mouse wheel horizontal scrolling
    pub fn mouse_wheel_h(&self) -> f32 {
        self.mouse_wheel_h
    }

    /// Set mouse wheel horizontal scrolling
    pub fn set_mouse_wheel_h(&mut self, wheel_h: f32) {
        self.mouse_wheel_h = wheel_h;
    }

    /// Whether the backend draws the cursor itself (software cursor)
    pub fn mouse_draw_cursor(&self) -> bool {
        self.mouse_draw_cursor
    }

    pub fn set_mouse_draw_cursor(&mut self, draw: bool) {
        self.mouse_draw_cursor = draw;
    }

    /// Analog navigation input value
    pub fn nav_input(&self, input: NavInput) -> f32 {
        self.nav_inputs[input.index()]
    }

    pub fn nav_inputs_mut(&mut self) -> &mut [f32; NAV_INPUT_COUNT] {
        &mut self.nav_inputs
    }

    /// Queue a character for text input
    pub fn add_input_character(&mut self, character: char) {
        self.input_queue_characters.push(character);
    }

    pub fn input_queue_characters(&self) -> &[char] {
        &self.input_queue_characters
    }

    pub fn clear_input_characters(&mut self) {
        self.input_queue_characters.clear();
    }

    /// Whether the backend wants exclusive use of the mouse
    pub fn want_capture_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    pub fn set_want_capture_mouse(&mut self, want: bool) {
        self.want_capture_mouse = want;
    }

    /// Whether the backend wants exclusive use of the keyboard
    pub fn want_capture_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    pub fn set_want_capture_keyboard(&mut self, want: bool) {
        self.want_capture_keyboard = want;
    }

    /// Estimate of application framerate, in frames per second
    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    pub fn set_framerate(&mut self, framerate: f32) {
        self.framerate = framerate;
    }
}
