//! Main event source implementation
//!
//! [`WinitPlatform`] tracks the per-window state winit events do not carry
//! (pointer position, scale factor, frame timing and the applied cursor) and
//! routes events into an [`ImGuiWidget`].

use std::time::Instant;

use dear_imgui_host::{GuiBackend, ImGuiWidget, Reply, Vector2, WidgetGeometry};
use winit::dpi::PhysicalPosition;
use winit::event::{Event, WindowEvent};
use winit::window::Window;

use crate::cursor::CursorSettings;
use crate::events;

/// DPI scaling mode for the platform
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum HiDpiMode {
    /// Use the window's scale factor
    #[default]
    Default,
    /// Use a custom scale factor
    Locked(f64),
    /// Round the scale factor to the nearest integer
    Rounded,
}

impl HiDpiMode {
    fn apply(self, scale_factor: f64) -> f64 {
        match self {
            HiDpiMode::Default => scale_factor,
            HiDpiMode::Locked(factor) => factor,
            HiDpiMode::Rounded => scale_factor.round(),
        }
    }
}

/// Feeds one winit window's events into an embedded GUI widget.
#[derive(Debug)]
pub struct WinitPlatform {
    hidpi_mode: HiDpiMode,
    /// Scale factor reported by the window, before the mode is applied
    scale_factor: f64,
    hidpi_factor: f64,
    cursor_position: Vector2,
    cursor_cache: Option<CursorSettings>,
    last_frame: Instant,
}

impl Default for WinitPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self {
            hidpi_mode: HiDpiMode::default(),
            scale_factor: 1.0,
            hidpi_factor: 1.0,
            cursor_position: [0.0, 0.0],
            cursor_cache: None,
            last_frame: Instant::now(),
        }
    }

    pub fn set_hidpi_mode(&mut self, hidpi_mode: HiDpiMode) {
        self.hidpi_mode = hidpi_mode;
        self.hidpi_factor = hidpi_mode.apply(self.scale_factor);
    }

    pub fn hidpi_factor(&self) -> f64 {
        self.hidpi_factor
    }

    /// Last pointer position in logical window coordinates
    pub fn cursor_position(&self) -> Vector2 {
        self.cursor_position
    }

    /// Picks up the window's scale factor.
    pub fn attach_window(&mut self, window: &Window, hidpi_mode: HiDpiMode) {
        self.hidpi_mode = hidpi_mode;
        self.scale_factor = window.scale_factor();
        self.hidpi_factor = hidpi_mode.apply(self.scale_factor);
    }

    /// Geometry of a widget filling the window's client area.
    pub fn geometry(&self, window: &Window) -> WidgetGeometry {
        let size = window.inner_size().to_logical::<f32>(self.hidpi_factor);
        WidgetGeometry::at([0.0, 0.0], [size.width, size.height])
    }

    /// Seconds since the previous call
    pub fn prepare_frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        delta.as_secs_f32()
    }

    /// Pushes the widget's cursor to the window when it changed.
    pub fn update_cursor<B: GuiBackend>(&mut self, widget: &ImGuiWidget<B>, window: &Window) {
        let cursor = CursorSettings::from_widget(widget);
        if self.cursor_cache != Some(cursor) {
            cursor.apply(window);
            self.cursor_cache = Some(cursor);
        }
    }

    /// Forces the next [`update_cursor`](Self::update_cursor) to touch the
    /// window.
    pub fn invalidate_cursor(&mut self) {
        self.cursor_cache = None;
    }

    pub fn handle_event<T, B: GuiBackend>(
        &mut self,
        widget: &mut ImGuiWidget<B>,
        event: &Event<T>,
    ) -> Reply {
        match event {
            Event::WindowEvent { event, .. } => self.handle_window_event(widget, event),
            _ => Reply::Unhandled,
        }
    }

    /// Handle a window event
    pub fn handle_window_event<B: GuiBackend>(
        &mut self,
        widget: &mut ImGuiWidget<B>,
        event: &WindowEvent,
    ) -> Reply {
        match event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let new_hidpi = self.hidpi_mode.apply(*scale_factor);
                if self.hidpi_factor > 0.0 {
                    let scale = (new_hidpi / self.hidpi_factor) as f32;
                    self.cursor_position = [
                        self.cursor_position[0] / scale,
                        self.cursor_position[1] / scale,
                    ];
                }
                self.scale_factor = *scale_factor;
                self.hidpi_factor = new_hidpi;
                Reply::Unhandled
            }
            WindowEvent::KeyboardInput { event, .. } => events::handle_keyboard_input(event, widget),
            WindowEvent::Ime(ime) => events::handle_ime_event(ime, widget),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = self.to_logical(*position);
                widget.on_mouse_move(self.cursor_position)
            }
            WindowEvent::CursorEntered { .. } => {
                widget.on_mouse_enter();
                Reply::Unhandled
            }
            WindowEvent::CursorLeft { .. } => {
                widget.on_mouse_leave();
                Reply::Unhandled
            }
            WindowEvent::MouseInput { button, state, .. } => {
                events::handle_mouse_button(*button, *state, self.cursor_position, widget)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                events::handle_mouse_wheel(*delta, self.cursor_position, widget)
            }
            WindowEvent::Touch(touch) => {
                let position = self.to_logical(touch.location);
                events::handle_touch_event(touch.phase, position, widget)
            }
            WindowEvent::Focused(focused) => events::handle_focused(*focused, widget),
            _ => Reply::Unhandled,
        }
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vector2 {
        let logical = position.to_logical::<f64>(self.hidpi_factor);
        [logical.x as f32, logical.y as f32]
    }
}
