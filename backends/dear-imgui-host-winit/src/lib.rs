//! Winit event source for `dear-imgui-host`
//!
//! This crate turns winit window events into input for an embedded
//! [`ImGuiWidget`](dear_imgui_host::ImGuiWidget): keys, text, pointer,
//! wheel, touch and focus. It also mirrors the widget's requested cursor on
//! the window.
//!
//! # Example
//!
//! ```rust,no_run
//! use dear_imgui_host::{
//!     CpuTextureHost, ContextManager, FontSet, HeadlessBackend, ImGuiWidget, ModuleSettings,
//!     NoopDrawer,
//! };
//! use dear_imgui_host_winit::WinitPlatform;
//!
//! let mut manager = ContextManager::new(HeadlessBackend::new(), ModuleSettings::default());
//! manager.build_fonts(&FontSet::default(), &mut CpuTextureHost::new())?;
//! let proxy = manager.create_proxy("Window", NoopDrawer)?;
//! let mut widget = ImGuiWidget::new(proxy, manager.settings());
//! let mut platform = WinitPlatform::new();
//!
//! // In your event loop:
//! // platform.handle_window_event(&mut widget, &event);
//! // manager.advance_frame();
//! // widget.tick(&platform.geometry(&window), platform.prepare_frame());
//! // platform.update_cursor(&widget, &window);
//! # let _ = (&mut widget, &mut platform);
//! # Ok::<(), dear_imgui_host::ImGuiHostError>(())
//! ```

#![cfg_attr(test, allow(clippy::float_cmp))]

mod cursor;
pub mod events;
mod input;
mod platform;

pub use cursor::{CursorSettings, to_winit_cursor};
pub use input::{
    key_event_to_host_key, physical_key_to_host_key, to_host_mouse_button, winit_key_to_host_key,
};
pub use platform::{HiDpiMode, WinitPlatform};
