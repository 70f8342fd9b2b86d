//! Font system shared by all context proxies
//!
//! One [`FontAtlas`] is built per process and shared by every backend context
//! through a [`SharedFontAtlas`] handle. Theme fonts are registered into it
//! once by the context manager.

pub mod atlas;
pub mod glyph_ranges;
pub mod theme;

pub use atlas::*;
pub use glyph_ranges::*;
pub use theme::*;

use std::path::PathBuf;
use std::sync::Arc;

/// Index of a font inside a [`FontAtlas`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Where a font's glyph outlines come from.
#[derive(Clone)]
pub enum FontSource {
    /// Built-in face that renders every glyph as an outlined box. Always
    /// available, used as the fallback when a TTF cannot be loaded.
    Default,
    /// TTF/OTF data already in memory
    TtfData(Arc<[u8]>),
    /// TTF/OTF file read when the font is added
    TtfFile(PathBuf),
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontSource::Default => f.write_str("Default"),
            FontSource::TtfData(data) => write!(f, "TtfData({} bytes)", data.len()),
            FontSource::TtfFile(path) => f.debug_tuple("TtfFile").field(path).finish(),
        }
    }
}

/// Configuration of one font added to the atlas
#[derive(Clone, Debug)]
pub struct FontConfig {
    pub name: String,
    pub source: FontSource,
    pub size_pixels: f32,
    /// Add glyphs to the previously added font instead of creating a new one
    pub merge_mode: bool,
    pub glyph_ranges: Vec<GlyphRange>,
    /// Round advances to whole pixels
    pub pixel_snap_h: bool,
    /// Offset applied to every glyph quad
    pub glyph_offset: [f32; 2],
}

impl FontConfig {
    pub fn new(source: FontSource) -> Self {
        Self {
            name: String::new(),
            source,
            size_pixels: 13.0,
            merge_mode: false,
            glyph_ranges: GlyphRange::DEFAULT.to_vec(),
            pixel_snap_h: false,
            glyph_offset: [0.0, 0.0],
        }
    }

    /// Set the font name (debug only)
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the size in pixels for rasterizer
    pub fn size_pixels(mut self, size: f32) -> Self {
        self.size_pixels = size;
        self
    }

    /// Set whether to merge this font with the previous one
    pub fn merge_mode(mut self, merge: bool) -> Self {
        self.merge_mode = merge;
        self
    }

    /// Set the glyph ranges to rasterize
    pub fn glyph_ranges(mut self, ranges: impl Into<Vec<GlyphRange>>) -> Self {
        self.glyph_ranges = ranges.into();
        self
    }

    /// Set pixel snap horizontally
    pub fn pixel_snap_h(mut self, snap: bool) -> Self {
        self.pixel_snap_h = snap;
        self
    }

    /// Set the glyph offset applied to every quad
    pub fn glyph_offset(mut self, offset: [f32; 2]) -> Self {
        self.glyph_offset = offset;
        self
    }
}
