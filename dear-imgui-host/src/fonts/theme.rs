//! Theme fonts registered into the shared atlas by the context manager.

use std::path::{Path, PathBuf};

use super::{FontAtlas, FontConfig, FontId, FontSource, GlyphRange};
use crate::error::{ImGuiHostError, ImGuiHostResult};

/// Number of [`ThemeFont`] variants.
pub const THEME_FONT_COUNT: usize = 6;

/// Fonts available to themes. `Default` is the atlas' built-in face.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThemeFont {
    #[default]
    Default,
    Roboto,
    KarlaRegular,
    CousineRegular,
    DroidSans,
    AdobeClean,
}

impl ThemeFont {
    pub const ALL: [ThemeFont; THEME_FONT_COUNT] = [
        ThemeFont::Default,
        ThemeFont::Roboto,
        ThemeFont::KarlaRegular,
        ThemeFont::CousineRegular,
        ThemeFont::DroidSans,
        ThemeFont::AdobeClean,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// File name looked up in the font directory
    pub const fn file_name(self) -> Option<&'static str> {
        match self {
            ThemeFont::Default => None,
            ThemeFont::Roboto => Some("Roboto-Medium.ttf"),
            ThemeFont::KarlaRegular => Some("Karla-Regular.ttf"),
            ThemeFont::CousineRegular => Some("Cousine-Regular.ttf"),
            ThemeFont::DroidSans => Some("DroidSans.ttf"),
            ThemeFont::AdobeClean => Some("AdobeClean-Regular.ttf"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ThemeFont::Default => "Default",
            ThemeFont::Roboto => "Roboto",
            ThemeFont::KarlaRegular => "Karla",
            ThemeFont::CousineRegular => "Cousine",
            ThemeFont::DroidSans => "DroidSans",
            ThemeFont::AdobeClean => "AdobeClean",
        }
    }
}

/// Icon font merged into every non-default theme font.
#[derive(Clone, Debug)]
pub struct IconFont {
    pub source: FontSource,
    pub glyph_ranges: Vec<GlyphRange>,
}

impl IconFont {
    pub fn new(source: FontSource) -> Self {
        Self {
            source,
            glyph_ranges: GlyphRange::FONT_AWESOME.to_vec(),
        }
    }

    fn config(&self) -> FontConfig {
        FontConfig::new(self.source.clone())
            .name("Icons")
            .size_pixels(13.0)
            .merge_mode(true)
            .pixel_snap_h(true)
            .glyph_offset([0.0, 1.0])
            .glyph_ranges(self.glyph_ranges.clone())
    }
}

/// Where theme fonts come from and at what size they are rasterized.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub size_pixels: f32,
    /// Directory holding the theme font files
    pub font_dir: Option<PathBuf>,
    /// Explicit sources that take precedence over `font_dir`
    pub overrides: Vec<(ThemeFont, FontSource)>,
    pub icon_font: Option<IconFont>,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            size_pixels: 16.0,
            font_dir: None,
            overrides: Vec::new(),
            icon_font: None,
        }
    }
}

impl FontSet {
    /// Font set reading every theme font from `dir`
    pub fn from_directory(dir: impl AsRef<Path>) -> Self {
        Self {
            font_dir: Some(dir.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    pub fn with_override(mut self, font: ThemeFont, source: FontSource) -> Self {
        self.overrides.retain(|(existing, _)| *existing != font);
        self.overrides.push((font, source));
        self
    }

    pub fn with_icon_font(mut self, icon_font: IconFont) -> Self {
        self.icon_font = Some(icon_font);
        self
    }

    fn source(&self, font: ThemeFont) -> Option<FontSource> {
        if let Some((_, source)) = self.overrides.iter().find(|(f, _)| *f == font) {
            return Some(source.clone());
        }
        let file_name = font.file_name()?;
        let dir = self.font_dir.as_ref()?;
        Some(FontSource::TtfFile(dir.join(file_name)))
    }

    /// Adds every theme font to `atlas`. Fonts that cannot be loaded map to
    /// the default font.
    pub fn load_into(&self, atlas: &mut FontAtlas) -> ImGuiHostResult<ThemeFonts> {
        let default = atlas.add_font_default()?;
        let mut ids = [default; THEME_FONT_COUNT];

        for font in ThemeFont::ALL.into_iter().skip(1) {
            let Some(source) = self.source(font) else {
                host_debug!("No source for theme font {}, using default", font.name());
                continue;
            };
            let config = FontConfig::new(source)
                .name(font.name())
                .size_pixels(self.size_pixels);
            let id = match atlas.add_font(config) {
                Ok(id) => id,
                Err(err @ ImGuiHostError::FontLoading { .. }) => {
                    host_warn!("Theme font {} unavailable: {}", font.name(), err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            ids[font.index()] = id;

            if let Some(icon_font) = &self.icon_font {
                match atlas.add_font(icon_font.config()) {
                    Ok(_) => {}
                    Err(err @ ImGuiHostError::FontLoading { .. }) => {
                        host_warn!("Icon font unavailable for {}: {}", font.name(), err);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(ThemeFonts(ids))
    }
}

/// Atlas font ids for every [`ThemeFont`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ThemeFonts([FontId; THEME_FONT_COUNT]);

impl ThemeFonts {
    pub fn get(&self, font: ThemeFont) -> FontId {
        self.0[font.index()]
    }
}
