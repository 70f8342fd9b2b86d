//! # dear-imgui-host
//!
//! Glue for hosting immediate-mode GUI contexts inside a retained-mode host
//! engine. The host owns the widget tree, the renderer and the event loop;
//! this crate owns one GUI context per surface and drives it from the host's
//! tick.
//!
//! ## Overview
//!
//! - [`ContextManager`] owns what every context shares: the GUI backend, the
//!   font atlas, the texture registry and the host frame counter.
//! - [`ContextProxy`] owns one backend context. Its [`tick`](ContextProxy::tick)
//!   copies input in, runs the user's [`ImGuiDrawer`], and captures the
//!   frame's draw lists.
//! - [`ImGuiWidget`] routes host events into a proxy and paints its draw
//!   lists through a [`PaintSink`], mapping canvas space to screen space and
//!   texture ids to host resources.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dear_imgui_host::*;
//!
//! let mut manager: ContextManager<HeadlessBackend, CpuTexture> =
//!     ContextManager::new(HeadlessBackend::new(), ModuleSettings::default());
//! manager
//!     .build_fonts(&FontSet::default(), &mut CpuTextureHost::new())
//!     .unwrap();
//!
//! let mut proxy = manager
//!     .create_proxy("Game", |ui: &mut CurrentContext<'_, HeadlessBackend>| {
//!         ui.window("Stats", Rect::new([10.0, 10.0], [210.0, 110.0]), |ui| {
//!             ui.text([4.0, 4.0], colors::WHITE, "Hello, world!");
//!         });
//!     })
//!     .unwrap();
//!
//! manager.advance_frame();
//! proxy.tick(1.0 / 60.0, [800.0, 600.0]);
//! assert_eq!(proxy.draw_data().len(), 1);
//! ```

#![deny(rust_2018_idioms)]
#![cfg_attr(test, allow(clippy::float_cmp))]

#[macro_use]
pub mod logging;

pub mod backend;
mod context;
mod drawer;
mod error;
pub mod fonts;
mod host;
pub mod input;
mod io;
mod manager;
mod math;
pub mod render;
mod settings;
mod texture;
mod transform;
mod widget;

pub use self::backend::{
    ContextId, CurrentContext, GuiBackend, HeadlessBackend, HeadlessError, RootWindowBackend,
    SharedBackend,
};
pub use self::context::*;
pub use self::drawer::*;
pub use self::error::*;
pub use self::fonts::{
    Font, FontAtlas, FontConfig, FontId, FontSet, FontSource, Glyph, GlyphRange, IconFont,
    SharedFontAtlas, THEME_FONT_COUNT, ThemeFont, ThemeFonts,
};
pub use self::host::*;
pub use self::input::{
    GamepadAxis, GamepadButton, InputState, Key, KeyMapSlot, KeyModFlags, MouseButton,
    MouseCursor, NavInput,
};
pub use self::io::*;
pub use self::manager::*;
pub use self::math::*;
pub use self::render::{
    CmdList, DrawCmd, DrawCommand, DrawData, DrawIdx, DrawList, DrawVert, HostIndex, HostVertex,
    PaintBuffers, PaintSink, PaintStats, paint_draw_lists, transfer_draw_data,
};
pub use self::settings::*;
pub use self::texture::*;
pub use self::transform::*;
pub use self::widget::*;

