//! Seam between the context proxy and an immediate-mode GUI library.
//!
//! A [`GuiBackend`] owns any number of GUI contexts and exposes one of them
//! at a time as the current context. The proxy never holds the backend
//! directly while a frame runs; it goes through [`CurrentContext`], which
//! borrows the shared backend and makes the proxy's context current for as
//! long as the token lives.

use std::cell::{RefCell, RefMut};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::fonts::{FontId, SharedFontAtlas};
use crate::input::MouseCursor;
use crate::io::Io;
use crate::render::DrawData;

pub mod headless;

pub use self::headless::{HeadlessBackend, HeadlessError};

/// Identifier of a context inside a [`GuiBackend`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ContextId(pub u32);

/// Immediate-mode GUI library driven by the context proxies.
///
/// Every method except `create_context`, `current_context` and
/// `set_current_context` acts on the current context and may panic when
/// there is none.
pub trait GuiBackend: 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates a context that renders text with the shared atlas.
    fn create_context(&mut self, font_atlas: &SharedFontAtlas) -> Result<ContextId, Self::Error>;

    fn destroy_context(&mut self, id: ContextId);

    fn current_context(&self) -> Option<ContextId>;

    fn set_current_context(&mut self, id: Option<ContextId>);

    fn io(&self) -> &Io;

    fn io_mut(&mut self) -> &mut Io;

    fn new_frame(&mut self);

    /// Ends the frame and returns its draw data, if the frame produced any.
    fn render(&mut self) -> Option<&DrawData>;

    fn is_any_item_active(&self) -> bool;

    fn is_any_window_hovered(&self) -> bool;

    fn mouse_cursor(&self) -> MouseCursor;

    fn push_font(&mut self, _font: FontId) {}

    fn pop_font(&mut self) {}
}

/// Backends able to host a full-canvas root window.
pub trait RootWindowBackend: GuiBackend {
    fn begin_root_window(&mut self, flags: crate::drawer::RootWindowFlags);

    fn end_root_window(&mut self);
}

/// Backend shared by every proxy on the UI thread.
pub type SharedBackend<B> = Rc<RefCell<B>>;

/// Execution token: the backend borrowed with one context made current.
///
/// Only one token can exist per backend at a time. Asking for a second one,
/// for example by ticking a proxy from inside another proxy's draw callback,
/// panics.
pub struct CurrentContext<'a, B: GuiBackend> {
    backend: RefMut<'a, B>,
    id: ContextId,
}

impl<'a, B: GuiBackend> CurrentContext<'a, B> {
    pub(crate) fn acquire(backend: &'a SharedBackend<B>, id: ContextId) -> Self {
        let Ok(mut backend) = backend.try_borrow_mut() else {
            panic!(
                "GUI context {:?} made current while another context is executing; \
                 proxies must not be ticked re-entrantly",
                id
            );
        };
        backend.set_current_context(Some(id));
        Self { backend, id }
    }

    /// Context this token executes
    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl<B: GuiBackend> Deref for CurrentContext<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.backend
    }
}

impl<B: GuiBackend> DerefMut for CurrentContext<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
