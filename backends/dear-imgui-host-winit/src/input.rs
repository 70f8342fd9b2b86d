//! Key and button mapping between winit and the host input model.

use dear_imgui_host::{Key, MouseButton};
use winit::event::MouseButton as WinitMouseButton;
use winit::keyboard::{Key as WinitKey, KeyCode, KeyLocation, NamedKey, PhysicalKey};

/// Convert a winit mouse button to a host mouse button.
pub fn to_host_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back | WinitMouseButton::Other(3) => Some(MouseButton::Extra1),
        WinitMouseButton::Forward | WinitMouseButton::Other(4) => Some(MouseButton::Extra2),
        WinitMouseButton::Other(_) => None,
    }
}

fn digit_key(digit: u32, location: KeyLocation) -> Option<Key> {
    const ROW: [Key; 10] = [
        Key::Key0,
        Key::Key1,
        Key::Key2,
        Key::Key3,
        Key::Key4,
        Key::Key5,
        Key::Key6,
        Key::Key7,
        Key::Key8,
        Key::Key9,
    ];
    const PAD: [Key; 10] = [
        Key::Keypad0,
        Key::Keypad1,
        Key::Keypad2,
        Key::Keypad3,
        Key::Keypad4,
        Key::Keypad5,
        Key::Keypad6,
        Key::Keypad7,
        Key::Keypad8,
        Key::Keypad9,
    ];
    let index = usize::try_from(digit).ok()?;
    match location {
        KeyLocation::Numpad => PAD.get(index).copied(),
        _ => ROW.get(index).copied(),
    }
}

fn letter_key(ch: char) -> Option<Key> {
    const LETTERS: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];
    let lower = ch.to_ascii_lowercase();
    if !lower.is_ascii_lowercase() {
        return None;
    }
    LETTERS.get(usize::from(lower as u8 - b'a')).copied()
}

fn sided(location: KeyLocation, left: Key, right: Key) -> Key {
    match location {
        KeyLocation::Right => right,
        _ => left,
    }
}

/// Convert a winit logical key to a host key, using the key location to tell
/// keypad and right-hand modifier keys apart.
pub fn winit_key_to_host_key(key: &WinitKey, location: KeyLocation) -> Option<Key> {
    match key {
        WinitKey::Character(s) => {
            let ch = s.chars().next()?;
            if let Some(digit) = ch.to_digit(10) {
                return digit_key(digit, location);
            }
            if let Some(key) = letter_key(ch) {
                return Some(key);
            }
            let numpad = location == KeyLocation::Numpad;
            match ch {
                '\'' => Some(Key::Apostrophe),
                ',' => Some(Key::Comma),
                '-' if numpad => Some(Key::KeypadSubtract),
                '-' => Some(Key::Minus),
                '.' if numpad => Some(Key::KeypadDecimal),
                '.' => Some(Key::Period),
                '/' if numpad => Some(Key::KeypadDivide),
                '/' => Some(Key::Slash),
                '*' if numpad => Some(Key::KeypadMultiply),
                '+' if numpad => Some(Key::KeypadAdd),
                ';' => Some(Key::Semicolon),
                '=' if numpad => Some(Key::KeypadEqual),
                '=' => Some(Key::Equal),
                '[' => Some(Key::LeftBracket),
                '\\' => Some(Key::Backslash),
                ']' => Some(Key::RightBracket),
                '`' => Some(Key::GraveAccent),
                _ => None,
            }
        }
        WinitKey::Named(named) => match named {
            NamedKey::ArrowDown => Some(Key::DownArrow),
            NamedKey::ArrowLeft => Some(Key::LeftArrow),
            NamedKey::ArrowRight => Some(Key::RightArrow),
            NamedKey::ArrowUp => Some(Key::UpArrow),
            NamedKey::End => Some(Key::End),
            NamedKey::Home => Some(Key::Home),
            NamedKey::PageDown => Some(Key::PageDown),
            NamedKey::PageUp => Some(Key::PageUp),

            NamedKey::Backspace => Some(Key::Backspace),
            NamedKey::Delete => Some(Key::Delete),
            NamedKey::Insert => Some(Key::Insert),

            NamedKey::Tab => Some(Key::Tab),
            NamedKey::Space => Some(Key::Space),
            NamedKey::Enter if location == KeyLocation::Numpad => Some(Key::KeypadEnter),
            NamedKey::Enter => Some(Key::Enter),
            NamedKey::Escape => Some(Key::Escape),

            NamedKey::Shift => Some(sided(location, Key::LeftShift, Key::RightShift)),
            NamedKey::Control => Some(sided(location, Key::LeftCtrl, Key::RightCtrl)),
            NamedKey::Alt => Some(sided(location, Key::LeftAlt, Key::RightAlt)),
            NamedKey::Super => Some(sided(location, Key::LeftSuper, Key::RightSuper)),

            NamedKey::F1 => Some(Key::F1),
            NamedKey::F2 => Some(Key::F2),
            NamedKey::F3 => Some(Key::F3),
            NamedKey::F4 => Some(Key::F4),
            NamedKey::F5 => Some(Key::F5),
            NamedKey::F6 => Some(Key::F6),
            NamedKey::F7 => Some(Key::F7),
            NamedKey::F8 => Some(Key::F8),
            NamedKey::F9 => Some(Key::F9),
            NamedKey::F10 => Some(Key::F10),
            NamedKey::F11 => Some(Key::F11),
            NamedKey::F12 => Some(Key::F12),

            NamedKey::CapsLock => Some(Key::CapsLock),
            NamedKey::ScrollLock => Some(Key::ScrollLock),
            NamedKey::NumLock => Some(Key::NumLock),

            NamedKey::PrintScreen => Some(Key::PrintScreen),
            NamedKey::Pause => Some(Key::Pause),
            NamedKey::ContextMenu => Some(Key::Menu),

            _ => None,
        },
        _ => None,
    }
}

/// Host key for a physical letter or digit key, independent of the layout.
pub fn physical_key_to_host_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Key0,
        KeyCode::Digit1 => Key::Key1,
        KeyCode::Digit2 => Key::Key2,
        KeyCode::Digit3 => Key::Key3,
        KeyCode::Digit4 => Key::Key4,
        KeyCode::Digit5 => Key::Key5,
        KeyCode::Digit6 => Key::Key6,
        KeyCode::Digit7 => Key::Key7,
        KeyCode::Digit8 => Key::Key8,
        KeyCode::Digit9 => Key::Key9,
        _ => return None,
    };
    Some(key)
}

/// Maps a key event, falling back to the physical key when the logical key
/// has no host equivalent (letters of non-Latin layouts), so shortcuts such
/// as Ctrl+C keep working.
pub fn key_event_to_host_key(
    logical: &WinitKey,
    physical: PhysicalKey,
    location: KeyLocation,
) -> Option<Key> {
    winit_key_to_host_key(logical, location).or_else(|| match logical {
        WinitKey::Character(_) | WinitKey::Dead(_) | WinitKey::Unidentified(_) => {
            physical_key_to_host_key(physical)
        }
        _ => None,
    })
}
