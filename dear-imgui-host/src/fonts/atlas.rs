//! Font atlas: rasterizes configured fonts into one RGBA32 texture.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use super::{FontConfig, FontId, FontSource};
use crate::error::{ImGuiHostError, ImGuiHostResult};
use crate::math::Vector2;
use crate::texture::TextureId;

/// Fixed atlas width; the height grows to the next power of two.
const ATLAS_WIDTH: u32 = 512;
const GLYPH_PADDING: u32 = 1;
/// Side of the opaque white block at the atlas origin.
const WHITE_BLOCK: u32 = 2;
const FALLBACK_CHAR: char = '?';

/// A rasterized glyph: quad offsets relative to the pen position and UVs
/// into the atlas texture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub codepoint: char,
    /// Whether the glyph has pixels (space does not)
    pub visible: bool,
    pub advance_x: f32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// A font inside a built atlas.
#[derive(Clone, Debug)]
pub struct Font {
    name: String,
    size: f32,
    ascent: f32,
    descent: f32,
    glyphs: HashMap<char, Glyph>,
    fallback: Option<Glyph>,
}

impl Font {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height of a line in pixels
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Exact glyph for a character
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Glyph for a character, or the fallback glyph when it is missing
    pub fn find_glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch).or(self.fallback.as_ref())
    }

    /// Size of `text` laid out on lines separated by `\n`
    pub fn calc_text_size(&self, text: &str) -> Vector2 {
        let mut width: f32 = 0.0;
        let mut line_width = 0.0;
        let mut lines = 1;
        for ch in text.chars() {
            if ch == '\n' {
                width = width.max(line_width);
                line_width = 0.0;
                lines += 1;
                continue;
            }
            if let Some(glyph) = self.find_glyph(ch) {
                line_width += glyph.advance_x;
            }
        }
        [width.max(line_width), lines as f32 * self.size]
    }
}

enum Face {
    Builtin,
    Ttf(Box<fontdue::Font>),
}

struct PendingFont {
    config: FontConfig,
    face: Face,
    target: FontId,
}

struct RasterGlyph {
    target: FontId,
    codepoint: char,
    advance_x: f32,
    xmin: f32,
    ymin: f32,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    offset: [f32; 2],
    pixel_snap_h: bool,
    position: [u32; 2],
}

/// Collection of fonts rasterized into a single texture.
///
/// Fonts are added first, then [`build`](FontAtlas::build) rasterizes them.
/// A built atlas is read-only: adding fonts afterwards fails with
/// [`ImGuiHostError::FontAtlasLocked`].
pub struct FontAtlas {
    pending: Vec<PendingFont>,
    configs: Vec<FontConfig>,
    fonts: Vec<Font>,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    white_uv: Vector2,
    tex_id: TextureId,
    built: bool,
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAtlas")
            .field("fonts", &self.fonts.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tex_id", &self.tex_id)
            .field("built", &self.built)
            .finish()
    }
}

impl FontAtlas {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            configs: Vec::new(),
            fonts: Vec::new(),
            pixels: Vec::new(),
            width: 0,
            height: 0,
            white_uv: [0.0, 0.0],
            tex_id: TextureId::null(),
            built: false,
        }
    }

    /// Adds a font and returns the id that will hold its glyphs. Merged fonts
    /// return the id of the font they merge into.
    pub fn add_font(&mut self, config: FontConfig) -> ImGuiHostResult<FontId> {
        if self.built {
            return Err(ImGuiHostError::FontAtlasLocked);
        }
        if config.size_pixels.is_nan() || config.size_pixels <= 0.0 {
            return Err(ImGuiHostError::configuration(format!(
                "font '{}' has invalid size {}",
                config.name, config.size_pixels
            )));
        }
        let face = load_face(&config)?;

        let target = if config.merge_mode {
            match self.fonts.len().checked_sub(1) {
                Some(index) => FontId(index),
                None => {
                    return Err(ImGuiHostError::invalid_operation(format!(
                        "font '{}' merges into nothing; add a base font first",
                        config.name
                    )));
                }
            }
        } else {
            let (ascent, descent) = face_metrics(&face, config.size_pixels);
            self.fonts.push(Font {
                name: config.name.clone(),
                size: config.size_pixels,
                ascent,
                descent,
                glyphs: HashMap::new(),
                fallback: None,
            });
            FontId(self.fonts.len() - 1)
        };

        host_debug!(
            "Queued font '{}' ({}px) into font {}",
            config.name,
            config.size_pixels,
            target.index()
        );
        self.configs.push(config.clone());
        self.pending.push(PendingFont { config, face, target });
        Ok(target)
    }

    /// Adds the built-in face at its default size.
    pub fn add_font_default(&mut self) -> ImGuiHostResult<FontId> {
        self.add_font(
            FontConfig::new(FontSource::Default)
                .name("Default")
                .glyph_ranges(super::GlyphRange::ASCII),
        )
    }

    /// Rasterizes every added font. Building an already built atlas is a
    /// no-op; an atlas without fonts gets the built-in face.
    pub fn build(&mut self) -> ImGuiHostResult<()> {
        if self.built {
            return Ok(());
        }
        if self.fonts.is_empty() {
            self.add_font_default()?;
        }

        let mut raster = Vec::new();
        for pending in &self.pending {
            rasterize_font(pending, &mut raster);
        }

        let height = pack(&mut raster)?;
        self.width = ATLAS_WIDTH;
        self.height = height;
        self.pixels = vec![0; (self.width * self.height * 4) as usize];
        for texel in self.pixels.chunks_exact_mut(4) {
            texel.copy_from_slice(&[255, 255, 255, 0]);
        }
        for y in 0..WHITE_BLOCK {
            for x in 0..WHITE_BLOCK {
                let offset = ((y * self.width + x) * 4 + 3) as usize;
                self.pixels[offset] = 255;
            }
        }
        self.white_uv = [
            (WHITE_BLOCK as f32 * 0.5) / self.width as f32,
            (WHITE_BLOCK as f32 * 0.5) / self.height as f32,
        ];

        let (atlas_w, atlas_h) = (self.width as f32, self.height as f32);
        for glyph in raster {
            let [px, py] = glyph.position;
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let alpha = glyph.coverage[(row * glyph.width + col) as usize];
                    let offset = (((py + row) * self.width + px + col) * 4 + 3) as usize;
                    self.pixels[offset] = alpha;
                }
            }

            let font = &mut self.fonts[glyph.target.index()];
            if font.glyphs.contains_key(&glyph.codepoint) {
                continue;
            }
            let x0 = glyph.xmin + glyph.offset[0];
            let y0 = font.ascent - (glyph.ymin + glyph.height as f32) + glyph.offset[1];
            let advance_x = if glyph.pixel_snap_h {
                glyph.advance_x.round()
            } else {
                glyph.advance_x
            };
            font.glyphs.insert(
                glyph.codepoint,
                Glyph {
                    codepoint: glyph.codepoint,
                    visible: glyph.width > 0 && glyph.height > 0,
                    advance_x,
                    x0,
                    y0,
                    x1: x0 + glyph.width as f32,
                    y1: y0 + glyph.height as f32,
                    u0: px as f32 / atlas_w,
                    v0: py as f32 / atlas_h,
                    u1: (px + glyph.width) as f32 / atlas_w,
                    v1: (py + glyph.height) as f32 / atlas_h,
                },
            );
        }
        for font in &mut self.fonts {
            font.fallback = font.glyphs.get(&FALLBACK_CHAR).copied();
        }

        self.pending.clear();
        self.built = true;
        crate::logging::log_font_atlas_built(self.fonts.len(), self.width, self.height);
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn fonts_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn font(&self, id: FontId) -> Option<&Font> {
        self.fonts.get(id.index())
    }

    /// Configurations of every added font, merged ones included
    pub fn configs(&self) -> &[FontConfig] {
        &self.configs
    }

    /// Atlas pixels as RGBA32 with width and height, once built
    pub fn tex_data_as_rgba32(&self) -> Option<(&[u8], u32, u32)> {
        self.built
            .then_some((self.pixels.as_slice(), self.width, self.height))
    }

    /// UV of an opaque white texel, used for solid fills
    pub fn white_uv(&self) -> Vector2 {
        self.white_uv
    }

    pub fn tex_id(&self) -> TextureId {
        self.tex_id
    }

    /// Texture id the atlas is registered under. This is the only mutation
    /// allowed after the atlas is built.
    pub fn set_tex_id(&mut self, id: TextureId) {
        self.tex_id = id;
    }
}

fn load_face(config: &FontConfig) -> ImGuiHostResult<Face> {
    let parse = |data: &[u8]| {
        fontdue::Font::from_bytes(
            data,
            fontdue::FontSettings {
                scale: config.size_pixels,
                ..fontdue::FontSettings::default()
            },
        )
        .map(|font| Face::Ttf(Box::new(font)))
        .map_err(|reason| {
            ImGuiHostError::font_loading(format!("font '{}': {}", config.name, reason))
        })
    };
    match &config.source {
        FontSource::Default => Ok(Face::Builtin),
        FontSource::TtfData(data) => parse(data),
        FontSource::TtfFile(path) => {
            let data = std::fs::read(path).map_err(|err| {
                ImGuiHostError::font_loading(format!("{}: {}", path.display(), err))
            })?;
            parse(&data)
        }
    }
}

fn face_metrics(face: &Face, size: f32) -> (f32, f32) {
    match face {
        Face::Ttf(font) => font
            .horizontal_line_metrics(size)
            .map(|metrics| (metrics.ascent, metrics.descent))
            .unwrap_or((size * 0.8, -size * 0.2)),
        Face::Builtin => (size * 0.8, -size * 0.2),
    }
}

fn rasterize_font(pending: &PendingFont, out: &mut Vec<RasterGlyph>) {
    let config = &pending.config;
    let size = config.size_pixels;
    for range in &config.glyph_ranges {
        for codepoint in range.chars() {
            let glyph = match &pending.face {
                Face::Ttf(font) => {
                    if font.lookup_glyph_index(codepoint) == 0 && codepoint != ' ' {
                        continue;
                    }
                    let (metrics, coverage) = font.rasterize(codepoint, size);
                    RasterGlyph {
                        target: pending.target,
                        codepoint,
                        advance_x: metrics.advance_width,
                        xmin: metrics.xmin as f32,
                        ymin: metrics.ymin as f32,
                        width: metrics.width as u32,
                        height: metrics.height as u32,
                        coverage,
                        offset: config.glyph_offset,
                        pixel_snap_h: config.pixel_snap_h,
                        position: [0, 0],
                    }
                }
                Face::Builtin => builtin_glyph(pending, codepoint),
            };
            out.push(glyph);
        }
    }
}

/// Outlined box sitting on the baseline; whitespace has no pixels.
fn builtin_glyph(pending: &PendingFont, codepoint: char) -> RasterGlyph {
    let size = pending.config.size_pixels;
    let width = ((size * 0.5).round() as u32).max(1);
    let height = ((size * 0.65).round() as u32).max(1);
    let (width, height, coverage) = if codepoint.is_whitespace() {
        (0, 0, Vec::new())
    } else {
        let mut coverage = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    coverage[(y * width + x) as usize] = 255;
                }
            }
        }
        (width, height, coverage)
    };
    RasterGlyph {
        target: pending.target,
        codepoint,
        advance_x: ((size * 0.5).round()).max(1.0) + 2.0,
        xmin: 1.0,
        ymin: 0.0,
        width,
        height,
        coverage,
        offset: pending.config.glyph_offset,
        pixel_snap_h: pending.config.pixel_snap_h,
        position: [0, 0],
    }
}

/// Shelf-packs glyph bitmaps next to the white block. Returns the atlas height.
fn pack(glyphs: &mut [RasterGlyph]) -> ImGuiHostResult<u32> {
    let mut x = WHITE_BLOCK + GLYPH_PADDING;
    let mut y = 0;
    let mut shelf_height = WHITE_BLOCK;
    for glyph in glyphs.iter_mut() {
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        if glyph.width + GLYPH_PADDING > ATLAS_WIDTH {
            return Err(ImGuiHostError::font_loading(format!(
                "glyph U+{:04X} is {}px wide, wider than the atlas",
                glyph.codepoint as u32, glyph.width
            )));
        }
        if x + glyph.width + GLYPH_PADDING > ATLAS_WIDTH {
            x = 0;
            y += shelf_height + GLYPH_PADDING;
            shelf_height = 0;
        }
        glyph.position = [x, y];
        x += glyph.width + GLYPH_PADDING;
        shelf_height = shelf_height.max(glyph.height);
    }
    Ok((y + shelf_height).max(WHITE_BLOCK).next_power_of_two())
}

/// Shared handle to the process-wide font atlas.
#[derive(Clone, Debug, Default)]
pub struct SharedFontAtlas(Rc<RefCell<FontAtlas>>);

impl SharedFontAtlas {
    pub fn new(atlas: FontAtlas) -> Self {
        Self(Rc::new(RefCell::new(atlas)))
    }

    pub fn borrow(&self) -> Ref<'_, FontAtlas> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, FontAtlas> {
        self.0.borrow_mut()
    }

    /// Whether both handles refer to the same atlas
    pub fn ptr_eq(&self, other: &SharedFontAtlas) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::GlyphRange;

    #[test]
    fn empty_atlas_builds_default_face() {
        let mut atlas = FontAtlas::new();
        atlas.build().unwrap();
        assert!(atlas.is_built());
        assert_eq!(atlas.fonts_count(), 1);

        let font = atlas.font(FontId(0)).unwrap();
        assert!(font.glyph('A').unwrap().visible);
        assert!(!font.glyph(' ').unwrap().visible);
        assert_eq!(font.find_glyph('\u{4e2d}').map(|g| g.codepoint), Some('?'));
    }

    #[test]
    fn built_atlas_is_locked() {
        let mut atlas = FontAtlas::new();
        atlas.build().unwrap();
        let err = atlas.add_font_default().unwrap_err();
        assert!(matches!(err, ImGuiHostError::FontAtlasLocked));
        assert!(atlas.build().is_ok());
    }

    #[test]
    fn white_texel_is_opaque() {
        let mut atlas = FontAtlas::new();
        atlas.build().unwrap();
        let (pixels, width, height) = atlas.tex_data_as_rgba32().unwrap();
        assert_eq!(width, ATLAS_WIDTH);
        assert!(height.is_power_of_two());
        assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
        let [u, v] = atlas.white_uv();
        assert!(u > 0.0 && u < 2.0 / width as f32);
        assert!(v > 0.0 && v < 2.0 / height as f32);
    }

    #[test]
    fn merged_font_extends_previous_font() {
        let mut atlas = FontAtlas::new();
        let base = atlas.add_font_default().unwrap();
        let merged = atlas
            .add_font(
                FontConfig::new(FontSource::Default)
                    .name("Icons")
                    .merge_mode(true)
                    .glyph_ranges([GlyphRange::new(0xF000, 0xF002)])
                    .glyph_offset([0.0, 1.0]),
            )
            .unwrap();
        assert_eq!(base, merged);
        atlas.build().unwrap();

        let font = atlas.font(base).unwrap();
        let icon = font.glyph('\u{F001}').unwrap();
        let letter = font.glyph('A').unwrap();
        assert_eq!(icon.y0, letter.y0 + 1.0);
        assert_eq!(atlas.configs().len(), 2);
    }

    #[test]
    fn merge_without_base_font_fails() {
        let mut atlas = FontAtlas::new();
        let result = atlas.add_font(FontConfig::new(FontSource::Default).merge_mode(true));
        assert!(matches!(result, Err(ImGuiHostError::InvalidOperation { .. })));
    }

    #[test]
    fn missing_font_file_fails_to_load() {
        let mut atlas = FontAtlas::new();
        let result = atlas.add_font(FontConfig::new(FontSource::TtfFile(
            "/nonexistent/DroidSans.ttf".into(),
        )));
        assert!(matches!(result, Err(ImGuiHostError::FontLoading { .. })));
        assert_eq!(atlas.fonts_count(), 0);
    }

    #[test]
    fn text_size_counts_lines() {
        let mut atlas = FontAtlas::new();
        atlas.add_font(FontConfig::new(FontSource::Default).size_pixels(20.0)).unwrap();
        atlas.build().unwrap();
        let font = atlas.font(FontId(0)).unwrap();
        let advance = font.glyph('a').unwrap().advance_x;
        assert_eq!(font.calc_text_size("ab\na"), [advance * 2.0, 40.0]);
    }
}
