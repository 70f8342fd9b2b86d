//! Input identifiers shared by the host event sources and the GUI backend.
//!
//! Host devices report keys, buttons and axes in their own vocabulary; the
//! event source adapters translate them into the dense index space defined
//! here before folding them into an [`InputState`].

use bitflags::bitflags;

pub mod interop;
pub mod state;

pub use self::state::InputState;

/// Size of the dense key index space.
pub const KEY_COUNT: usize = 512;

/// Number of tracked mouse buttons.
pub const MOUSE_BUTTON_COUNT: usize = 5;

/// Number of analog navigation inputs.
pub const NAV_INPUT_COUNT: usize = NavInput::COUNT;

/// Mouse button identifier
#[repr(usize)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum MouseButton {
    /// Left mouse button
    Left = 0,
    /// Right mouse button
    Right = 1,
    /// Middle mouse button
    Middle = 2,
    /// First extra button (usually "back")
    Extra1 = 3,
    /// Second extra button (usually "forward")
    Extra2 = 4,
}

impl MouseButton {
    pub const ALL: [MouseButton; MOUSE_BUTTON_COUNT] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Extra1,
        MouseButton::Extra2,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Mouse cursor types
#[repr(i32)]
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub enum MouseCursor {
    /// No cursor
    None = -1,
    /// Arrow cursor
    #[default]
    Arrow = 0,
    /// Text input I-beam cursor
    TextInput,
    /// Resize all directions cursor
    ResizeAll,
    /// Resize north-south cursor
    ResizeNS,
    /// Resize east-west cursor
    ResizeEW,
    /// Resize northeast-southwest cursor
    ResizeNESW,
    /// Resize northwest-southeast cursor
    ResizeNWSE,
    /// Hand cursor
    Hand,
    /// Not allowed cursor
    NotAllowed,
}

/// Key identifier in the dense index space understood by the backend.
#[repr(usize)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Key {
    /// Tab key
    Tab = 1,
    /// Left arrow key
    LeftArrow = 2,
    /// Right arrow key
    RightArrow = 3,
    /// Up arrow key
    UpArrow = 4,
    /// Down arrow key
    DownArrow = 5,
    /// Page up key
    PageUp = 6,
    /// Page down key
    PageDown = 7,
    /// Home key
    Home = 8,
    /// End key
    End = 9,
    /// Insert key
    Insert = 10,
    /// Delete key
    Delete = 11,
    /// Backspace key
    Backspace = 12,
    /// Space key
    Space = 13,
    /// Enter key
    Enter = 14,
    /// Escape key
    Escape = 15,
    /// Left Ctrl key
    LeftCtrl = 16,
    /// Left Shift key
    LeftShift = 17,
    /// Left Alt key
    LeftAlt = 18,
    /// Left Super key
    LeftSuper = 19,
    /// Right Ctrl key
    RightCtrl = 20,
    /// Right Shift key
    RightShift = 21,
    /// Right Alt key
    RightAlt = 22,
    /// Right Super key
    RightSuper = 23,
    /// Menu key
    Menu = 24,
    /// 0 key
    Key0 = 25,
    /// 1 key
    Key1 = 26,
    /// 2 key
    Key2 = 27,
    /// 3 key
    Key3 = 28,
    /// 4 key
    Key4 = 29,
    /// 5 key
    Key5 = 30,
    /// 6 key
    Key6 = 31,
    /// 7 key
    Key7 = 32,
    /// 8 key
    Key8 = 33,
    /// 9 key
    Key9 = 34,
    /// A key
    A = 35,
    /// B key
    B = 36,
    /// C key
    C = 37,
    /// D key
    D = 38,
    /// E key
    E = 39,
    /// F key
    F = 40,
    /// G key
    G = 41,
    /// H key
    H = 42,
    /// I key
    I = 43,
    /// J key
    J = 44,
    /// K key
    K = 45,
    /// L key
    L = 46,
    /// M key
    M = 47,
    /// N key
    N = 48,
    /// O key
    O = 49,
    /// P key
    P = 50,
    /// Q key
    Q = 51,
    /// R key
    R = 52,
    /// S key
    S = 53,
    /// T key
    T = 54,
    /// U key
    U = 55,
    /// V key
    V = 56,
    /// W key
    W = 57,
    /// X key
    X = 58,
    /// Y key
    Y = 59,
    /// Z key
    Z = 60,
    /// F1 key
    F1 = 61,
    /// F2 key
    F2 = 62,
    /// F3 key
    F3 = 63,
    /// F4 key
    F4 = 64,
    /// F5 key
    F5 = 65,
    /// F6 key
    F6 = 66,
    /// F7 key
    F7 = 67,
    /// F8 key
    F8 = 68,
    /// F9 key
    F9 = 69,
    /// F10 key
    F10 = 70,
    /// F11 key
    F11 = 71,
    /// F12 key
    F12 = 72,
    /// ' key
    Apostrophe = 73,
    /// , key
    Comma = 74,
    /// - key
    Minus = 75,
    /// . key
    Period = 76,
    /// / key
    Slash = 77,
    /// ; key
    Semicolon = 78,
    /// = key
    Equal = 79,
    /// [ key
    LeftBracket = 80,
    /// Backslash key
    Backslash = 81,
    /// ] key
    RightBracket = 82,
    /// ` key
    GraveAccent = 83,
    /// Caps lock key
    CapsLock = 84,
    /// Scroll lock key
    ScrollLock = 85,
    /// Num lock key
    NumLock = 86,
    /// Print screen key
    PrintScreen = 87,
    /// Pause key
    Pause = 88,
    /// Keypad 0 key
    Keypad0 = 89,
    /// Keypad 1 key
    Keypad1 = 90,
    /// Keypad 2 key
    Keypad2 = 91,
    /// Keypad 3 key
    Keypad3 = 92,
    /// Keypad 4 key
    Keypad4 = 93,
    /// Keypad 5 key
    Keypad5 = 94,
    /// Keypad 6 key
    Keypad6 = 95,
    /// Keypad 7 key
    Keypad7 = 96,
    /// Keypad 8 key
    Keypad8 = 97,
    /// Keypad 9 key
    Keypad9 = 98,
    /// Keypad . key
    KeypadDecimal = 99,
    /// Keypad / key
    KeypadDivide = 100,
    /// Keypad * key
    KeypadMultiply = 101,
    /// Keypad - key
    KeypadSubtract = 102,
    /// Keypad + key
    KeypadAdd = 103,
    /// Keypad enter key
    KeypadEnter = 104,
    /// Keypad = key
    KeypadEqual = 105,
}

impl Key {
    /// Index of this key in [`InputState`] and backend key arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this key is one of the eight modifier keys.
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LeftCtrl
                | Key::RightCtrl
                | Key::LeftShift
                | Key::RightShift
                | Key::LeftAlt
                | Key::RightAlt
                | Key::LeftSuper
                | Key::RightSuper
        )
    }
}

/// Slots of the backend key map.
///
/// The backend reads named keys through this table, which the host fills with
/// the dense indices of its own keys (see [`interop::install_key_map`]).
#[repr(usize)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum KeyMapSlot {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    KeypadEnter,
    A,
    C,
    V,
    X,
    Y,
    Z,
}

impl KeyMapSlot {
    pub const COUNT: usize = 22;

    pub const ALL: [KeyMapSlot; Self::COUNT] = [
        KeyMapSlot::Tab,
        KeyMapSlot::LeftArrow,
        KeyMapSlot::RightArrow,
        KeyMapSlot::UpArrow,
        KeyMapSlot::DownArrow,
        KeyMapSlot::PageUp,
        KeyMapSlot::PageDown,
        KeyMapSlot::Home,
        KeyMapSlot::End,
        KeyMapSlot::Insert,
        KeyMapSlot::Delete,
        KeyMapSlot::Backspace,
        KeyMapSlot::Space,
        KeyMapSlot::Enter,
        KeyMapSlot::Escape,
        KeyMapSlot::KeypadEnter,
        KeyMapSlot::A,
        KeyMapSlot::C,
        KeyMapSlot::V,
        KeyMapSlot::X,
        KeyMapSlot::Y,
        KeyMapSlot::Z,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Analog navigation inputs, each in `[0, 1]`.
#[repr(usize)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum NavInput {
    /// Activate / open / toggle
    Activate,
    /// Cancel / close / exit
    Cancel,
    /// Text input / on-screen keyboard
    Input,
    /// Context menu / tap to toggle menu layer
    Menu,
    DpadLeft,
    DpadRight,
    DpadUp,
    DpadDown,
    LStickLeft,
    LStickRight,
    LStickUp,
    LStickDown,
    /// Previous window (with the menu layer held)
    FocusPrev,
    /// Next window (with the menu layer held)
    FocusNext,
    /// Slower tweaks
    TweakSlow,
    /// Faster tweaks
    TweakFast,
}

impl NavInput {
    pub const COUNT: usize = 16;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Digital gamepad buttons the host reports.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum GamepadButton {
    FaceButtonBottom,
    FaceButtonRight,
    FaceButtonLeft,
    FaceButtonTop,
    DpadLeft,
    DpadRight,
    DpadUp,
    DpadDown,
    LeftShoulder,
    RightShoulder,
    LeftTrigger,
    RightTrigger,
    LeftThumbstick,
    RightThumbstick,
    Start,
    Select,
}

/// Analog gamepad axes the host reports, each in `[-1, 1]`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

bitflags! {
    /// Key modifier flags
    #[repr(transparent)]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModFlags: u8 {
        /// Ctrl key modifier
        const CTRL = 1 << 0;
        /// Shift key modifier
        const SHIFT = 1 << 1;
        /// Alt key modifier
        const ALT = 1 << 2;
        /// Super key modifier
        const SUPER = 1 << 3;
    }
}
