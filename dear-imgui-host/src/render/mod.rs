//! Draw data capture and painting
//!
//! Backends produce [`DrawData`] each frame, context proxies keep owned
//! [`DrawList`] copies of it, and the host paints those copies through a
//! [`PaintSink`].

pub mod draw_data;
pub mod paint;
pub mod transfer;

// Re-export commonly used types
pub use draw_data::*;
pub use paint::*;
pub use transfer::*;
