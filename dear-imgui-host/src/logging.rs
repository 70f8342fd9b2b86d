//! Logging utilities for the host integration layer
//!
//! Built on `tracing`; everything here compiles to no-ops when the `tracing`
//! feature is disabled.

#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// Initialize tracing subscriber with sensible defaults for host applications
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dear_imgui_host=info,dear_imgui_host_winit=info,warn".into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Initialize tracing subscriber with custom filter
#[cfg(feature = "tracing")]
pub fn init_tracing_with_filter(filter: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::new(filter);

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Initialize tracing subscriber for development with more verbose output
#[cfg(feature = "tracing")]
pub fn init_tracing_dev() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dear_imgui_host=debug,dear_imgui_host_winit=debug,info".into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Log context creation
#[cfg(feature = "tracing")]
pub fn log_context_created(name: &str) {
    info!("ImGui context '{}' created", name);
}

/// Log context destruction
#[cfg(feature = "tracing")]
pub fn log_context_destroyed(name: &str) {
    info!("ImGui context '{}' destroyed", name);
}

/// Log font atlas build results
#[cfg(feature = "tracing")]
pub fn log_font_atlas_built(fonts: usize, width: u32, height: u32) {
    info!("Font atlas built: {} fonts, {}x{} texels", fonts, width, height);
}

/// Log per-tick draw statistics
#[cfg(feature = "tracing")]
pub fn log_draw_stats(context: &str, lists: usize, vertices: usize, indices: usize) {
    debug!(
        "[{}] Draw stats - Lists: {}, Vertices: {}, Indices: {}",
        context, lists, vertices, indices
    );
}

// Fallback implementations when tracing is not available
#[cfg(not(feature = "tracing"))]
pub fn init_tracing() {
    eprintln!("Warning: tracing feature not enabled, logging disabled");
}

#[cfg(not(feature = "tracing"))]
pub fn init_tracing_with_filter(_filter: &str) {
    eprintln!("Warning: tracing feature not enabled, logging disabled");
}

#[cfg(not(feature = "tracing"))]
pub fn init_tracing_dev() {
    eprintln!("Warning: tracing feature not enabled, logging disabled");
}

#[cfg(not(feature = "tracing"))]
pub fn log_context_created(_name: &str) {}

#[cfg(not(feature = "tracing"))]
pub fn log_context_destroyed(_name: &str) {}

#[cfg(not(feature = "tracing"))]
pub fn log_font_atlas_built(_fonts: usize, _width: u32, _height: u32) {}

#[cfg(not(feature = "tracing"))]
pub fn log_draw_stats(_context: &str, _lists: usize, _vertices: usize, _indices: usize) {}

/// Macro for conditional tracing
#[macro_export]
macro_rules! host_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    }};
}

/// Macro for conditional debug logging
#[macro_export]
macro_rules! host_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    }};
}

/// Macro for conditional info logging
#[macro_export]
macro_rules! host_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
    }};
}

/// Macro for conditional warning logging
#[macro_export]
macro_rules! host_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
    }};
}

/// Macro for conditional error logging
#[macro_export]
macro_rules! host_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
    }};
}
