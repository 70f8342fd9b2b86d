//! Host widget glue: routes host events into a proxy and paints its output.
//!
//! [`ImGuiWidget`] is what a host embeds in its widget tree. Events arrive in
//! screen space and are mapped into canvas space before being folded into
//! the proxy's input state; painting maps the captured draw lists back.

use crate::backend::GuiBackend;
use crate::context::{ContextProxy, TickOutcome};
use crate::input::{GamepadAxis, GamepadButton, Key, MouseButton, MouseCursor};
use crate::math::{Rect, Vector2};
use crate::render::{PaintBuffers, PaintSink, PaintStats, paint_draw_lists};
use crate::settings::ModuleSettings;
use crate::texture::TextureRegistry;
use crate::transform::{CanvasTransform, canvas_to_screen, screen_to_canvas};

const MIN_CANVAS_SCALE: f32 = 0.1;
const MAX_CANVAS_SCALE: f32 = 4.0;
const ZOOM_STEP: f32 = 1.1;

/// Whether the host should keep routing an event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    Handled,
    Unhandled,
}

impl Reply {
    fn shared_if(share: bool) -> Reply {
        if share { Reply::Unhandled } else { Reply::Handled }
    }
}

/// Size and placement of the widget for one tick or paint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WidgetGeometry {
    pub absolute_size: Vector2,
    pub widget_to_screen: CanvasTransform,
}

impl WidgetGeometry {
    pub fn new(absolute_size: Vector2, widget_to_screen: CanvasTransform) -> Self {
        Self {
            absolute_size,
            widget_to_screen,
        }
    }

    /// Widget at `position` on screen with no scaling
    pub fn at(position: Vector2, absolute_size: Vector2) -> Self {
        Self::new(absolute_size, CanvasTransform::from_translation(position))
    }
}

/// Pan and zoom of the canvas inside the widget.
///
/// While active, right-button drags pan and the wheel zooms around the
/// cursor; the GUI does not see those events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasControl {
    active: bool,
    scale: f32,
    offset: Vector2,
    drag_position: Option<Vector2>,
}

impl Default for CanvasControl {
    fn default() -> Self {
        Self {
            active: false,
            scale: 1.0,
            offset: [0.0, 0.0],
            drag_position: None,
        }
    }
}

impl CanvasControl {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            host_debug!("Canvas control {}", if active { "enabled" } else { "disabled" });
        }
        self.active = active;
        if !active {
            self.drag_position = None;
        }
    }

    /// Canvas to widget transform
    pub fn transform(&self) -> CanvasTransform {
        CanvasTransform::from_scale_translation(self.scale, self.offset)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = [0.0, 0.0];
        self.drag_position = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_position.is_some()
    }

    pub fn begin_drag(&mut self, widget_pos: Vector2) {
        self.drag_position = Some(widget_pos);
    }

    pub fn drag_to(&mut self, widget_pos: Vector2) {
        if let Some(last) = self.drag_position.replace(widget_pos) {
            self.offset[0] += widget_pos[0] - last[0];
            self.offset[1] += widget_pos[1] - last[1];
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_position = None;
    }

    /// Zooms by `steps` wheel notches, keeping `pivot` (widget space) fixed.
    pub fn zoom(&mut self, steps: f32, pivot: Vector2) {
        let scale = (self.scale * ZOOM_STEP.powf(steps)).clamp(MIN_CANVAS_SCALE, MAX_CANVAS_SCALE);
        let ratio = scale / self.scale;
        self.offset = [
            pivot[0] - (pivot[0] - self.offset[0]) * ratio,
            pivot[1] - (pivot[1] - self.offset[1]) * ratio,
        ];
        self.scale = scale;
    }
}

/// A context proxy embedded in a host widget.
pub struct ImGuiWidget<B: GuiBackend> {
    proxy: ContextProxy<B>,
    canvas: CanvasControl,
    widget_to_screen: CanvasTransform,
    share_keyboard_input: bool,
    share_gamepad_input: bool,
    share_mouse_input: bool,
    use_software_cursor: bool,
    input_enabled: bool,
    hovered: bool,
}

impl<B: GuiBackend> ImGuiWidget<B> {
    pub fn new(proxy: ContextProxy<B>, settings: &ModuleSettings) -> Self {
        let mut widget = Self {
            proxy,
            canvas: CanvasControl::default(),
            widget_to_screen: CanvasTransform::IDENTITY,
            share_keyboard_input: false,
            share_gamepad_input: false,
            share_mouse_input: false,
            use_software_cursor: false,
            input_enabled: true,
            hovered: false,
        };
        widget.apply_settings(settings);
        widget
    }

    pub fn apply_settings(&mut self, settings: &ModuleSettings) {
        self.share_keyboard_input = settings.share_keyboard_input;
        self.share_gamepad_input = settings.share_gamepad_input;
        self.share_mouse_input = settings.share_mouse_input;
        self.use_software_cursor = settings.use_software_cursor;
    }

    pub fn proxy(&self) -> &ContextProxy<B> {
        &self.proxy
    }

    pub fn proxy_mut(&mut self) -> &mut ContextProxy<B> {
        &mut self.proxy
    }

    pub fn into_proxy(self) -> ContextProxy<B> {
        self.proxy
    }

    pub fn canvas(&self) -> &CanvasControl {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasControl {
        &mut self.canvas
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Enables keyboard and gamepad input while the host widget has focus.
    /// Input held when focus goes away is released.
    pub fn update_input_enabled(&mut self) {
        let enabled = self
            .proxy
            .host_widget()
            .is_none_or(|widget| widget.has_keyboard_focus());
        if self.input_enabled && !enabled {
            self.release_keyboard_and_gamepad();
        }
        self.input_enabled = enabled;
    }

    /// Ticks the proxy with the widget's current size.
    pub fn tick(&mut self, geometry: &WidgetGeometry, delta_seconds: f32) -> TickOutcome {
        self.update_input_enabled();
        self.widget_to_screen = geometry.widget_to_screen;

        let state = self.proxy.input_state();
        let canvas_keys = state.is_key_down(Key::LeftAlt.index()) && state.is_key_down(Key::LeftShift.index());
        self.canvas.set_active(canvas_keys);

        let show_pointer = self.use_software_cursor && self.hovered;
        self.proxy.input_state_mut().set_mouse_pointer(show_pointer);
        self.proxy.tick(delta_seconds, geometry.absolute_size)
    }

    /// Paints the proxy's last frame. Can be called any number of times per
    /// tick.
    pub fn paint<T, S>(
        &self,
        geometry: &WidgetGeometry,
        host_clip: Rect,
        textures: &TextureRegistry<T>,
        buffers: &mut PaintBuffers,
        sink: &mut S,
    ) -> PaintStats
    where
        S: PaintSink<T> + ?Sized,
    {
        let transform = canvas_to_screen(&self.canvas.transform(), &geometry.widget_to_screen);
        paint_draw_lists(self.proxy.draw_data(), &transform, host_clip, textures, buffers, sink)
    }

    /// Cursor the host should show; `None` hides it.
    pub fn cursor(&self) -> Option<MouseCursor> {
        if self.use_software_cursor {
            return None;
        }
        match self.proxy.mouse_cursor() {
            MouseCursor::None => None,
            cursor => Some(cursor),
        }
    }

    fn to_canvas(&self, screen_pos: Vector2) -> Vector2 {
        screen_to_canvas(screen_pos, &self.canvas.transform(), &self.widget_to_screen)
    }

    fn to_widget(&self, screen_pos: Vector2) -> Vector2 {
        self.widget_to_screen.inverse().transform_point(screen_pos)
    }

    fn release_keyboard_and_gamepad(&mut self) {
        let state = self.proxy.input_state_mut();
        state.reset_keyboard_keys();
        state.reset_navigation_inputs();
    }

    pub fn on_key_down(&mut self, key: Key) -> Reply {
        self.set_key(key, true)
    }

    pub fn on_key_up(&mut self, key: Key) -> Reply {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: Key, down: bool) -> Reply {
        if !self.input_enabled {
            return Reply::Unhandled;
        }
        let state = self.proxy.input_state_mut();
        state.set_key_down(key.index(), down);
        if key.is_modifier() {
            let keys = state.keys_down();
            let either = |a: Key, b: Key| keys[a.index()] || keys[b.index()];
            let ctrl = either(Key::LeftCtrl, Key::RightCtrl);
            let shift = either(Key::LeftShift, Key::RightShift);
            let alt = either(Key::LeftAlt, Key::RightAlt);
            let super_ = either(Key::LeftSuper, Key::RightSuper);
            state.set_control_down(ctrl);
            state.set_shift_down(shift);
            state.set_alt_down(alt);
            state.set_super_down(super_);
        }
        Reply::shared_if(self.share_keyboard_input)
    }

    pub fn on_key_char(&mut self, ch: char) -> Reply {
        if !self.input_enabled {
            return Reply::Unhandled;
        }
        self.proxy.input_state_mut().add_character(ch);
        Reply::shared_if(self.share_keyboard_input)
    }

    pub fn on_mouse_button_down(&mut self, button: MouseButton, screen_pos: Vector2) -> Reply {
        if self.canvas.is_active() && button == MouseButton::Right {
            let pos = self.to_widget(screen_pos);
            self.canvas.begin_drag(pos);
            return Reply::Handled;
        }
        let pos = self.to_canvas(screen_pos);
        let state = self.proxy.input_state_mut();
        state.set_mouse_position(pos);
        state.set_mouse_down(button, true);
        Reply::shared_if(self.share_mouse_input)
    }

    pub fn on_mouse_button_up(&mut self, button: MouseButton, screen_pos: Vector2) -> Reply {
        if self.canvas.is_dragging() && button == MouseButton::Right {
            self.canvas.end_drag();
            return Reply::Handled;
        }
        let pos = self.to_canvas(screen_pos);
        let state = self.proxy.input_state_mut();
        state.set_mouse_position(pos);
        state.set_mouse_down(button, false);
        Reply::shared_if(self.share_mouse_input)
    }

    pub fn on_mouse_move(&mut self, screen_pos: Vector2) -> Reply {
        if self.canvas.is_dragging() {
            let pos = self.to_widget(screen_pos);
            self.canvas.drag_to(pos);
            return Reply::Handled;
        }
        let pos = self.to_canvas(screen_pos);
        self.proxy.input_state_mut().set_mouse_position(pos);
        Reply::shared_if(self.share_mouse_input)
    }

    pub fn on_mouse_wheel(&mut self, delta: f32, delta_h: f32, screen_pos: Vector2) -> Reply {
        if self.canvas.is_active() {
            let pivot = self.to_widget(screen_pos);
            self.canvas.zoom(delta, pivot);
            return Reply::Handled;
        }
        let state = self.proxy.input_state_mut();
        state.add_mouse_wheel_delta(delta);
        state.add_mouse_wheel_h_delta(delta_h);
        Reply::shared_if(self.share_mouse_input)
    }

    pub fn on_touch_started(&mut self, screen_pos: Vector2) -> Reply {
        let pos = self.to_canvas(screen_pos);
        let state = self.proxy.input_state_mut();
        state.set_touch_position(pos);
        state.set_touch_down(true);
        Reply::Handled
    }

    pub fn on_touch_moved(&mut self, screen_pos: Vector2) -> Reply {
        let pos = self.to_canvas(screen_pos);
        self.proxy.input_state_mut().set_touch_position(pos);
        Reply::Handled
    }

    pub fn on_touch_ended(&mut self, screen_pos: Vector2) -> Reply {
        let pos = self.to_canvas(screen_pos);
        let state = self.proxy.input_state_mut();
        state.set_touch_position(pos);
        state.set_touch_down(false);
        Reply::Handled
    }

    pub fn on_gamepad_button(&mut self, button: GamepadButton, down: bool) -> Reply {
        if !self.input_enabled {
            return Reply::Unhandled;
        }
        let state = self.proxy.input_state_mut();
        state.set_gamepad_attached(true);
        state.set_gamepad_navigation_key(button, down);
        Reply::shared_if(self.share_gamepad_input)
    }

    pub fn on_gamepad_axis(&mut self, axis: GamepadAxis, value: f32) -> Reply {
        if !self.input_enabled {
            return Reply::Unhandled;
        }
        let state = self.proxy.input_state_mut();
        state.set_gamepad_attached(true);
        state.set_gamepad_navigation_axis(axis, value);
        Reply::shared_if(self.share_gamepad_input)
    }

    pub fn on_focus_lost(&mut self) {
        self.release_keyboard_and_gamepad();
    }

    pub fn on_mouse_enter(&mut self) {
        self.hovered = true;
    }

    /// Releases held mouse buttons; the GUI never sees the matching up events.
    pub fn on_mouse_leave(&mut self) {
        self.hovered = false;
        self.canvas.end_drag();
        self.proxy.input_state_mut().reset_mouse_buttons();
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl<B: GuiBackend> std::fmt::Debug for ImGuiWidget<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImGuiWidget")
            .field("proxy", &self.proxy)
            .field("canvas", &self.canvas)
            .field("input_enabled", &self.input_enabled)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn drag_pans_canvas() {
        let mut canvas = CanvasControl::default();
        canvas.set_active(true);
        canvas.begin_drag([10.0, 10.0]);
        canvas.drag_to([25.0, 5.0]);
        canvas.end_drag();
        assert_eq!(canvas.transform().translation(), [15.0, -5.0]);
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut canvas = CanvasControl::default();
        let pivot = [200.0, 100.0];
        let before = canvas.transform().inverse().transform_point(pivot);
        canvas.zoom(3.0, pivot);
        let after = canvas.transform().inverse().transform_point(pivot);
        assert_relative_eq!(before[0], after[0], epsilon = 1e-3);
        assert_relative_eq!(before[1], after[1], epsilon = 1e-3);
        assert_relative_eq!(canvas.scale(), 1.331, epsilon = 1e-4);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut canvas = CanvasControl::default();
        canvas.zoom(-100.0, [0.0, 0.0]);
        assert_eq!(canvas.scale(), MIN_CANVAS_SCALE);
        canvas.zoom(100.0, [0.0, 0.0]);
        assert_eq!(canvas.scale(), MAX_CANVAS_SCALE);
        canvas.reset();
        assert_eq!(canvas.transform(), CanvasTransform::from_scale_translation(1.0, [0.0, 0.0]));
    }

    #[test]
    fn deactivating_stops_drag() {
        let mut canvas = CanvasControl::default();
        canvas.set_active(true);
        canvas.begin_drag([0.0, 0.0]);
        canvas.set_active(false);
        assert!(!canvas.is_dragging());
    }
}
