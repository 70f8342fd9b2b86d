//! Context proxy: one GUI context driven by the host's tick.
//!
//! A [`ContextProxy`] owns a backend context, the input snapshot fed into it
//! and the draw lists of its last completed frame. The host calls
//! [`ContextProxy::tick`] once per frame and paints the captured draw lists
//! as often as it likes in between.

use std::path::{Path, PathBuf};

use crate::backend::{ContextId, CurrentContext, GuiBackend, SharedBackend};
use crate::drawer::ImGuiDrawer;
use crate::error::{ImGuiHostError, ImGuiHostResult, IntoImGuiHostError};
use crate::fonts::{FontId, SharedFontAtlas};
use crate::host::HostWidgetHandle;
use crate::input::interop::{copy_input, install_key_map};
use crate::input::{InputState, MouseCursor};
use crate::manager::{ContextManager, FrameCounter};
use crate::math::{MintVec2, Vector2};
use crate::render::{DrawList, transfer_draw_data};
use crate::settings::{ModuleSettings, ini_file_path};

/// Result of [`ContextProxy::tick`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// A frame ran and its draw lists replaced the previous ones
    Completed,
    /// The proxy already ticked during the current host frame
    Skipped,
}

impl TickOutcome {
    pub fn is_completed(self) -> bool {
        self == TickOutcome::Completed
    }
}

/// One GUI context and its per-frame lifecycle.
///
/// Proxies are single-threaded: they share the backend and font atlas with
/// every other proxy through `Rc` handles.
pub struct ContextProxy<B: GuiBackend> {
    name: String,
    ini_filename: PathBuf,
    backend: SharedBackend<B>,
    context: ContextId,
    font_atlas: SharedFontAtlas,
    frame_counter: FrameCounter,
    last_frame: Option<u64>,
    drawer: Option<Box<dyn ImGuiDrawer<B>>>,
    theme_font: Option<FontId>,
    host_widget: Option<HostWidgetHandle>,
    input_state: InputState,
    draw_lists: Vec<DrawList>,
    display_size: Vector2,
    has_active_item: bool,
    is_mouse_hovering_any_window: bool,
    mouse_cursor: MouseCursor,
    wants_mouse_capture: bool,
    wants_keyboard_capture: bool,
    destroyed: bool,
}

/// Borrows the backend with `context` current. Takes the field rather than
/// the proxy so the proxy's other fields stay borrowable.
fn make_current<B: GuiBackend>(backend: &SharedBackend<B>, context: ContextId) -> CurrentContext<'_, B> {
    CurrentContext::acquire(backend, context)
}

impl<B: GuiBackend> ContextProxy<B> {
    /// Creates a backend context named `name` and runs the drawer's
    /// `on_initialize` with it.
    ///
    /// Fails when fonts are not built yet, when the settings directory
    /// cannot be created, or when the backend refuses to create a context.
    pub fn new<T>(
        name: &str,
        manager: &ContextManager<B, T>,
        mut drawer: Box<dyn ImGuiDrawer<B>>,
    ) -> ImGuiHostResult<Self> {
        if !manager.fonts_built() {
            return Err(ImGuiHostError::invalid_operation(format!(
                "context '{name}' created before fonts were built"
            )));
        }
        let ini_filename = ini_file_path(manager.settings_directory()?, name);

        let backend = manager.backend().clone();
        let context = backend
            .borrow_mut()
            .create_context(manager.font_atlas())
            .map_err(IntoImGuiHostError::into_host_error)?;

        let settings = manager.settings();
        let mut proxy = Self {
            name: name.to_owned(),
            ini_filename,
            backend,
            context,
            font_atlas: manager.font_atlas().clone(),
            frame_counter: manager.frame_counter().clone(),
            last_frame: None,
            drawer: None,
            theme_font: manager.theme_font(settings.theme_font),
            host_widget: None,
            input_state: InputState::new(),
            draw_lists: Vec::new(),
            display_size: settings.default_canvas_size,
            has_active_item: false,
            is_mouse_hovering_any_window: false,
            mouse_cursor: MouseCursor::Arrow,
            wants_mouse_capture: false,
            wants_keyboard_capture: false,
            destroyed: false,
        };
        proxy.configure_input(settings);

        {
            let mut ui = make_current(&proxy.backend, proxy.context);
            let io = ui.io_mut();
            io.set_ini_filename(Some(proxy.ini_filename.clone()));
            io.set_display_size(settings.default_canvas_size);
            install_key_map(io);
            drawer.on_initialize(&mut ui);
        }
        proxy.drawer = Some(drawer);

        crate::logging::log_context_created(&proxy.name);
        Ok(proxy)
    }

    /// Runs one frame of the context.
    ///
    /// The input snapshot is copied into the backend and cleared of its
    /// per-frame events, the drawer draws, and the resulting draw lists
    /// replace the previous ones. A second call within the same host frame
    /// does nothing and returns [`TickOutcome::Skipped`].
    ///
    /// # Panics
    ///
    /// Panics if the font atlas is not built or if called while another
    /// proxy's frame is running. Panics from the drawer propagate and leave
    /// the previous draw lists in place.
    pub fn tick(&mut self, delta_seconds: f32, display_size: impl Into<MintVec2>) -> TickOutcome {
        assert!(
            self.font_atlas.borrow().is_built(),
            "font atlas must be built before ticking context '{}'",
            self.name
        );
        let frame = self.frame_counter.get();
        if self.last_frame == Some(frame) {
            host_debug!("Context '{}' already ticked in frame {}, skipping", self.name, frame);
            return TickOutcome::Skipped;
        }
        self.last_frame = Some(frame);

        let display_size: MintVec2 = display_size.into();
        let display_size = [display_size.x, display_size.y];

        let mut ui = make_current(&self.backend, self.context);
        {
            let io = ui.io_mut();
            io.set_display_size(display_size);
            io.set_delta_time(delta_seconds);
            copy_input(io, &self.input_state);
        }
        self.input_state.clear_update_state();

        ui.new_frame();
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.on_tick(delta_seconds);
            if let Some(font) = self.theme_font {
                ui.push_font(font);
            }
            drawer.on_draw(&mut ui);
            if self.theme_font.is_some() {
                ui.pop_font();
            }
        }
        transfer_draw_data(ui.render(), &mut self.draw_lists);

        self.has_active_item = ui.is_any_item_active();
        self.is_mouse_hovering_any_window = ui.is_any_window_hovered();
        self.mouse_cursor = ui.mouse_cursor();
        self.wants_mouse_capture = ui.io().want_capture_mouse();
        self.wants_keyboard_capture = ui.io().want_capture_keyboard();
        drop(ui);

        self.display_size = display_size;
        crate::logging::log_draw_stats(
            &self.name,
            self.draw_lists.len(),
            self.draw_lists.iter().map(|l| l.vtx_buffer().len()).sum(),
            self.draw_lists.iter().map(|l| l.idx_buffer().len()).sum(),
        );
        TickOutcome::Completed
    }

    /// Runs `f` with this proxy's context current, outside of a frame.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut CurrentContext<'_, B>) -> R) -> R {
        let mut ui = make_current(&self.backend, self.context);
        f(&mut ui)
    }

    /// Re-reads navigation settings and the theme font from `manager`.
    pub fn apply_settings<T>(&mut self, manager: &ContextManager<B, T>) {
        let settings = manager.settings();
        self.configure_input(settings);
        self.theme_font = manager.theme_font(settings.theme_font);
    }

    fn configure_input(&mut self, settings: &ModuleSettings) {
        self.input_state
            .set_keyboard_navigation_enabled(settings.keyboard_navigation);
        self.input_state
            .set_gamepad_navigation_enabled(settings.gamepad_navigation);
    }

    /// Destroys the backend context after running the drawer's `on_destroy`.
    /// Dropping the proxy does the same.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let mut ui = make_current(&self.backend, self.context);
        if let Some(mut drawer) = self.drawer.take() {
            drawer.on_destroy(&mut ui);
        }
        ui.destroy_context(self.context);
        drop(ui);
        crate::logging::log_context_destroyed(&self.name);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context_id(&self) -> ContextId {
        self.context
    }

    pub fn ini_filename(&self) -> &Path {
        &self.ini_filename
    }

    /// Draw lists of the last completed frame
    pub fn draw_data(&self) -> &[DrawList] {
        &self.draw_lists
    }

    pub fn display_size(&self) -> Vector2 {
        self.display_size
    }

    pub fn has_active_item(&self) -> bool {
        self.has_active_item
    }

    pub fn is_mouse_hovering_any_window(&self) -> bool {
        self.is_mouse_hovering_any_window
    }

    pub fn mouse_cursor(&self) -> MouseCursor {
        self.mouse_cursor
    }

    pub fn wants_mouse_capture(&self) -> bool {
        self.wants_mouse_capture
    }

    pub fn wants_keyboard_capture(&self) -> bool {
        self.wants_keyboard_capture
    }

    /// Host frame of the last completed tick
    pub fn last_frame_number(&self) -> Option<u64> {
        self.last_frame
    }

    pub fn theme_font(&self) -> Option<FontId> {
        self.theme_font
    }

    pub fn input_state(&self) -> &InputState {
        &self.input_state
    }

    pub fn input_state_mut(&mut self) -> &mut InputState {
        &mut self.input_state
    }

    /// Whether this proxy's context is the backend's current one. Always
    /// `false` while any frame is running.
    pub fn is_current_context(&self) -> bool {
        self.backend
            .try_borrow()
            .is_ok_and(|backend| backend.current_context() == Some(self.context))
    }

    pub fn host_widget(&self) -> Option<&HostWidgetHandle> {
        self.host_widget.as_ref()
    }

    pub fn set_host_widget(&mut self, widget: Option<HostWidgetHandle>) {
        self.host_widget = widget;
    }

    /// Whether the host widget exists and has keyboard focus
    pub fn host_widget_focused(&self) -> bool {
        self.host_widget
            .as_ref()
            .is_some_and(HostWidgetHandle::has_keyboard_focus)
    }
}

impl<B: GuiBackend> Drop for ContextProxy<B> {
    fn drop(&mut self) {
        if std::thread::panicking() && self.backend.try_borrow_mut().is_err() {
            host_error!(
                "Context '{}' dropped during a panic while the backend was in use; leaking it",
                self.name
            );
            return;
        }
        self.teardown();
    }
}

impl<B: GuiBackend> std::fmt::Debug for ContextProxy<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextProxy")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("ini_filename", &self.ini_filename)
            .field("last_frame", &self.last_frame)
            .field("draw_lists", &self.draw_lists.len())
            .field("display_size", &self.display_size)
            .finish_non_exhaustive()
    }
}
