//! User draw callbacks run by a context proxy every tick.

use bitflags::bitflags;

use crate::backend::{CurrentContext, GuiBackend, RootWindowBackend};

/// Code that draws into a proxy's context.
///
/// `on_draw` runs between the backend's `new_frame` and `render` with the
/// proxy's context current. `on_initialize` and `on_destroy` run once, also
/// with the context current.
pub trait ImGuiDrawer<B: GuiBackend> {
    fn on_initialize(&mut self, _ui: &mut CurrentContext<'_, B>) {}

    /// Called before `on_draw` with the tick's delta time in seconds
    fn on_tick(&mut self, _delta_seconds: f32) {}

    fn on_draw(&mut self, ui: &mut CurrentContext<'_, B>);

    fn on_destroy(&mut self, _ui: &mut CurrentContext<'_, B>) {}
}

impl<B, F> ImGuiDrawer<B> for F
where
    B: GuiBackend,
    F: FnMut(&mut CurrentContext<'_, B>),
{
    fn on_draw(&mut self, ui: &mut CurrentContext<'_, B>) {
        self(ui)
    }
}

/// Drawer that draws nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDrawer;

impl<B: GuiBackend> ImGuiDrawer<B> for NoopDrawer {
    fn on_draw(&mut self, _ui: &mut CurrentContext<'_, B>) {}
}

bitflags! {
    /// Options of the root window opened by [`RootWindowDrawer`]
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RootWindowFlags: u32 {
        /// Reserve a menu bar at the top of the root window
        const MENU_BAR = 1 << 0;
        /// Do not fill the root window, leaving the host visible behind it
        const NO_BACKGROUND = 1 << 1;
        /// Host a dockspace covering the root window
        const DOCKSPACE = 1 << 2;
    }
}

/// Wraps another drawer's `on_draw` in a root window covering the whole
/// canvas.
#[derive(Debug)]
pub struct RootWindowDrawer<D> {
    inner: D,
    flags: RootWindowFlags,
}

impl<D> RootWindowDrawer<D> {
    pub fn new(inner: D, flags: RootWindowFlags) -> Self {
        Self { inner, flags }
    }

    pub fn flags(&self) -> RootWindowFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: RootWindowFlags) {
        self.flags = flags;
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }
}

impl<B, D> ImGuiDrawer<B> for RootWindowDrawer<D>
where
    B: RootWindowBackend,
    D: ImGuiDrawer<B>,
{
    fn on_initialize(&mut self, ui: &mut CurrentContext<'_, B>) {
        self.inner.on_initialize(ui);
    }

    fn on_tick(&mut self, delta_seconds: f32) {
        self.inner.on_tick(delta_seconds);
    }

    fn on_draw(&mut self, ui: &mut CurrentContext<'_, B>) {
        ui.begin_root_window(self.flags);
        self.inner.on_draw(ui);
        ui.end_root_window();
    }

    fn on_destroy(&mut self, ui: &mut CurrentContext<'_, B>) {
        self.inner.on_destroy(ui);
    }
}
