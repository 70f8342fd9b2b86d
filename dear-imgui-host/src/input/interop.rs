//! Translation between host input and backend IO.

use super::{GamepadAxis, GamepadButton, InputState, Key, KeyMapSlot, MouseButton, NAV_INPUT_COUNT, NavInput};
use crate::io::{BackendFlags, ConfigFlags, Io};

/// Host key bound to each backend key map slot.
const KEY_MAP: [(KeyMapSlot, Key); KeyMapSlot::COUNT] = [
    (KeyMapSlot::Tab, Key::Tab),
    (KeyMapSlot::LeftArrow, Key::LeftArrow),
    (KeyMapSlot::RightArrow, Key::RightArrow),
    (KeyMapSlot::UpArrow, Key::UpArrow),
    (KeyMapSlot::DownArrow, Key::DownArrow),
    (KeyMapSlot::PageUp, Key::PageUp),
    (KeyMapSlot::PageDown, Key::PageDown),
    (KeyMapSlot::Home, Key::Home),
    (KeyMapSlot::End, Key::End),
    (KeyMapSlot::Insert, Key::Insert),
    (KeyMapSlot::Delete, Key::Delete),
    (KeyMapSlot::Backspace, Key::Backspace),
    (KeyMapSlot::Space, Key::Space),
    (KeyMapSlot::Enter, Key::Enter),
    (KeyMapSlot::Escape, Key::Escape),
    (KeyMapSlot::KeypadEnter, Key::KeypadEnter),
    (KeyMapSlot::A, Key::A),
    (KeyMapSlot::C, Key::C),
    (KeyMapSlot::V, Key::V),
    (KeyMapSlot::X, Key::X),
    (KeyMapSlot::Y, Key::Y),
    (KeyMapSlot::Z, Key::Z),
];

/// Points every backend key map slot at the dense index of the matching host key.
pub fn install_key_map(io: &mut Io) {
    for (slot, key) in KEY_MAP {
        io.set_key_map(slot, key.index());
    }
}

/// Navigation input driven by a gamepad button, if any.
pub fn gamepad_navigation_input(button: GamepadButton) -> Option<NavInput> {
    match button {
        GamepadButton::FaceButtonBottom => Some(NavInput::Activate),
        GamepadButton::FaceButtonRight => Some(NavInput::Cancel),
        GamepadButton::FaceButtonTop => Some(NavInput::Input),
        GamepadButton::FaceButtonLeft => Some(NavInput::Menu),
        GamepadButton::DpadLeft => Some(NavInput::DpadLeft),
        GamepadButton::DpadRight => Some(NavInput::DpadRight),
        GamepadButton::DpadUp => Some(NavInput::DpadUp),
        GamepadButton::DpadDown => Some(NavInput::DpadDown),
        GamepadButton::LeftShoulder => Some(NavInput::FocusPrev),
        GamepadButton::RightShoulder => Some(NavInput::FocusNext),
        GamepadButton::LeftTrigger => Some(NavInput::TweakSlow),
        GamepadButton::RightTrigger => Some(NavInput::TweakFast),
        GamepadButton::LeftThumbstick
        | GamepadButton::RightThumbstick
        | GamepadButton::Start
        | GamepadButton::Select => None,
    }
}

/// Navigation input pair `(negative, positive)` driven by a gamepad axis, if any.
pub fn gamepad_navigation_axis_pair(axis: GamepadAxis) -> Option<(NavInput, NavInput)> {
    match axis {
        GamepadAxis::LeftX => Some((NavInput::LStickLeft, NavInput::LStickRight)),
        GamepadAxis::LeftY => Some((NavInput::LStickDown, NavInput::LStickUp)),
        GamepadAxis::RightX | GamepadAxis::RightY => None,
    }
}

/// Splits a signed axis value into `(negative, positive)` magnitudes in `[0, 1]`.
#[inline]
pub fn split_axis(value: f32) -> (f32, f32) {
    let value = value.clamp(-1.0, 1.0);
    if value < 0.0 {
        (-value, 0.0)
    } else {
        (0.0, value)
    }
}

/// Sets the navigation input mapped to a gamepad button; unmapped buttons are ignored.
pub fn set_gamepad_navigation_key(
    nav_inputs: &mut [f32; NAV_INPUT_COUNT],
    button: GamepadButton,
    down: bool,
) {
    if let Some(input) = gamepad_navigation_input(button) {
        nav_inputs[input.index()] = if down { 1.0 } else { 0.0 };
    }
}

/// Sets the navigation input pair mapped to a gamepad axis; unmapped axes are ignored.
pub fn set_gamepad_navigation_axis(
    nav_inputs: &mut [f32; NAV_INPUT_COUNT],
    axis: GamepadAxis,
    value: f32,
) {
    if let Some((negative, positive)) = gamepad_navigation_axis_pair(axis) {
        let (neg, pos) = split_axis(value);
        nav_inputs[negative.index()] = neg;
        nav_inputs[positive.index()] = pos;
    }
}

/// Copies an input snapshot into backend IO.
///
/// Touch overrides the mouse: an active touch moves the pointer to the touch
/// position and holds the left button.
pub fn copy_input(io: &mut Io, state: &InputState) {
    let mut config_flags = io.config_flags();
    config_flags.set(
        ConfigFlags::NAV_ENABLE_KEYBOARD,
        state.is_keyboard_navigation_enabled(),
    );
    config_flags.set(
        ConfigFlags::NAV_ENABLE_GAMEPAD,
        state.is_gamepad_navigation_enabled(),
    );
    io.set_config_flags(config_flags);

    let mut backend_flags = io.backend_flags();
    backend_flags.set(BackendFlags::HAS_GAMEPAD, state.has_gamepad());
    io.set_backend_flags(backend_flags);

    io.keys_down_mut().copy_from_slice(state.keys_down());
    io.set_key_modifiers(
        state.is_control_down(),
        state.is_shift_down(),
        state.is_alt_down(),
        state.is_super_down(),
    );

    for button in MouseButton::ALL {
        io.set_mouse_down(button, state.is_mouse_down(button));
    }
    if state.is_touch_down() {
        io.set_mouse_pos(state.touch_position());
        io.set_mouse_down(MouseButton::Left, true);
    } else {
        io.set_mouse_pos(state.mouse_position());
    }
    io.set_mouse_wheel(state.mouse_wheel_delta());
    io.set_mouse_wheel_h(state.mouse_wheel_h_delta());
    io.set_mouse_draw_cursor(state.has_mouse_pointer());

    for &ch in state.characters() {
        io.add_input_character(ch);
    }

    if state.is_gamepad_navigation_enabled() && state.has_gamepad() {
        io.nav_inputs_mut().copy_from_slice(state.navigation_inputs());
    } else {
        *io.nav_inputs_mut() = [0.0; NAV_INPUT_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn axis_split_matches_direction() {
        assert_eq!(split_axis(-1.0), (1.0, 0.0));
        assert_eq!(split_axis(0.25), (0.0, 0.25));
        assert_eq!(split_axis(0.0), (0.0, 0.0));
        assert_eq!(split_axis(-3.0), (1.0, 0.0));
        assert_eq!(split_axis(7.5), (0.0, 1.0));
    }

    #[test]
    fn left_stick_drives_stick_navigation() {
        let mut nav = [0.0; NAV_INPUT_COUNT];
        set_gamepad_navigation_axis(&mut nav, GamepadAxis::LeftX, -0.5);
        assert_eq!(nav[NavInput::LStickLeft.index()], 0.5);
        assert_eq!(nav[NavInput::LStickRight.index()], 0.0);

        set_gamepad_navigation_axis(&mut nav, GamepadAxis::LeftY, 0.75);
        assert_eq!(nav[NavInput::LStickUp.index()], 0.75);
        assert_eq!(nav[NavInput::LStickDown.index()], 0.0);
    }

    #[test]
    fn unmapped_gamepad_inputs_are_ignored() {
        let mut nav = [0.0; NAV_INPUT_COUNT];
        set_gamepad_navigation_axis(&mut nav, GamepadAxis::RightX, 1.0);
        set_gamepad_navigation_key(&mut nav, GamepadButton::Start, true);
        assert!(nav.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn key_map_points_at_host_keys() {
        let mut io = Io::new();
        assert_eq!(io.key_map(KeyMapSlot::Enter), None);
        install_key_map(&mut io);
        assert_eq!(io.key_map(KeyMapSlot::Enter), Some(Key::Enter.index()));
        assert_eq!(io.key_map(KeyMapSlot::Z), Some(Key::Z.index()));
    }

    #[test]
    fn touch_overrides_mouse() {
        let mut state = InputState::new();
        state.set_mouse_position([10.0, 10.0]);
        state.set_touch_position([42.0, 24.0]);
        state.set_touch_down(true);

        let mut io = Io::new();
        copy_input(&mut io, &state);

        assert_eq!(io.mouse_pos(), [42.0, 24.0]);
        assert!(io.mouse_down(MouseButton::Left));
    }

    #[test]
    fn navigation_flags_follow_state() {
        let mut state = InputState::new();
        state.set_keyboard_navigation_enabled(true);
        state.set_gamepad_attached(true);
        state.set_gamepad_navigation_key(GamepadButton::FaceButtonBottom, true);

        let mut io = Io::new();
        copy_input(&mut io, &state);
        assert!(io.config_flags().contains(ConfigFlags::NAV_ENABLE_KEYBOARD));
        assert!(!io.config_flags().contains(ConfigFlags::NAV_ENABLE_GAMEPAD));
        assert!(io.backend_flags().contains(BackendFlags::HAS_GAMEPAD));
        assert_eq!(io.nav_input(NavInput::Activate), 0.0);

        state.set_gamepad_navigation_enabled(true);
        copy_input(&mut io, &state);
        assert_eq!(io.nav_input(NavInput::Activate), 1.0);
    }
}
