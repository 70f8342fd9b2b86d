//! Process-wide state shared by every context proxy.

use std::cell::{Cell, OnceCell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::backend::{GuiBackend, SharedBackend};
use crate::context::ContextProxy;
use crate::drawer::ImGuiDrawer;
use crate::error::{ImGuiHostError, ImGuiHostResult};
use crate::fonts::{FontAtlas, FontId, FontSet, SharedFontAtlas, ThemeFont, ThemeFonts};
use crate::math::colors;
use crate::settings::{ModuleSettings, ensure_settings_directory};
use crate::texture::{
    CpuTexture, ERROR_TEXTURE_NAME, FONT_ATLAS_TEXTURE_NAME, PLAIN_TEXTURE_NAME, TextureHost,
    TextureRegistration, TextureRegistry,
};

/// Host frame number shared between the manager and its proxies.
#[derive(Clone, Debug, Default)]
pub struct FrameCounter(Rc<Cell<u64>>);

impl FrameCounter {
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }
}

/// Owner of the shared backend, font atlas, texture registry and settings.
///
/// `T` is the host's texture resource type.
pub struct ContextManager<B: GuiBackend, T> {
    backend: SharedBackend<B>,
    settings: ModuleSettings,
    font_atlas: SharedFontAtlas,
    theme_fonts: Option<ThemeFonts>,
    textures: TextureRegistry<T>,
    frame_counter: FrameCounter,
    settings_dir: OnceCell<PathBuf>,
}

impl<B: GuiBackend, T> ContextManager<B, T> {
    pub fn new(backend: B, settings: ModuleSettings) -> Self {
        Self::with_shared_backend(Rc::new(RefCell::new(backend)), settings)
    }

    /// Manager driving a backend the host also holds
    pub fn with_shared_backend(backend: SharedBackend<B>, settings: ModuleSettings) -> Self {
        Self {
            backend,
            settings,
            font_atlas: SharedFontAtlas::new(FontAtlas::new()),
            theme_fonts: None,
            textures: TextureRegistry::new(),
            frame_counter: FrameCounter::default(),
            settings_dir: OnceCell::new(),
        }
    }

    /// Builds the theme fonts into the shared atlas and registers the
    /// placeholder, error and font atlas textures. Later calls do nothing.
    pub fn build_fonts<H>(&mut self, fonts: &FontSet, host: &mut H) -> ImGuiHostResult<()>
    where
        H: TextureHost<Resource = T>,
    {
        if self.theme_fonts.is_some() {
            host_debug!("Fonts already built, ignoring rebuild request");
            return Ok(());
        }

        let plain = CpuTexture::solid(PLAIN_TEXTURE_NAME, 2, 2, colors::WHITE);
        let plain = host.create_texture(PLAIN_TEXTURE_NAME, plain.width, plain.height, &plain.pixels)?;
        self.textures.set_placeholder(PLAIN_TEXTURE_NAME, plain);

        let error = CpuTexture::solid(ERROR_TEXTURE_NAME, 2, 2, colors::MAGENTA);
        let error = host.create_texture(ERROR_TEXTURE_NAME, error.width, error.height, &error.pixels)?;
        let error_id = self
            .textures
            .register(ERROR_TEXTURE_NAME, error, TextureRegistration::AllowReplace)?;
        self.textures.set_error_texture(error_id);

        // The shared atlas locks once built, so it is only replaced after
        // every fallible step succeeded.
        let mut atlas = FontAtlas::new();
        let theme_fonts = fonts.load_into(&mut atlas)?;
        atlas.build()?;
        let Some((pixels, width, height)) = atlas.tex_data_as_rgba32() else {
            return Err(ImGuiHostError::invalid_operation("font atlas has no pixels after build"));
        };
        let resource = host.create_texture(FONT_ATLAS_TEXTURE_NAME, width, height, pixels)?;
        let atlas_id = self.textures.register(
            FONT_ATLAS_TEXTURE_NAME,
            resource,
            TextureRegistration::AllowReplace,
        )?;
        atlas.set_tex_id(atlas_id);
        *self.font_atlas.borrow_mut() = atlas;

        self.theme_fonts = Some(theme_fonts);
        Ok(())
    }

    pub fn fonts_built(&self) -> bool {
        self.theme_fonts.is_some()
    }

    /// Atlas font of a theme font, once fonts are built
    pub fn theme_font(&self, font: ThemeFont) -> Option<FontId> {
        self.theme_fonts.map(|fonts| fonts.get(font))
    }

    /// Starts a new host frame; every proxy may tick once per frame.
    pub fn advance_frame(&self) -> u64 {
        self.frame_counter.advance()
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_counter.get()
    }

    pub(crate) fn frame_counter(&self) -> &FrameCounter {
        &self.frame_counter
    }

    pub fn texture_registry(&self) -> &TextureRegistry<T> {
        &self.textures
    }

    pub fn texture_registry_mut(&mut self) -> &mut TextureRegistry<T> {
        &mut self.textures
    }

    pub fn settings(&self) -> &ModuleSettings {
        &self.settings
    }

    /// Replaces the settings. Existing proxies pick them up through
    /// [`ContextProxy::apply_settings`]; the settings directory is fixed once
    /// it has been created.
    pub fn set_settings(&mut self, settings: ModuleSettings) {
        self.settings = settings;
    }

    /// Directory of the per-context ini files, created on first use.
    pub fn settings_directory(&self) -> ImGuiHostResult<&Path> {
        if let Some(dir) = self.settings_dir.get() {
            return Ok(dir);
        }
        let dir = self.settings.settings_directory();
        ensure_settings_directory(&dir)?;
        Ok(self.settings_dir.get_or_init(|| dir))
    }

    pub fn font_atlas(&self) -> &SharedFontAtlas {
        &self.font_atlas
    }

    pub fn backend(&self) -> &SharedBackend<B> {
        &self.backend
    }

    /// Creates a proxy for a new context named `name`. Fonts must be built.
    pub fn create_proxy<D>(&self, name: &str, drawer: D) -> ImGuiHostResult<ContextProxy<B>>
    where
        D: ImGuiDrawer<B> + 'static,
    {
        ContextProxy::new(name, self, Box::new(drawer))
    }
}

impl<B: GuiBackend, T: std::fmt::Debug> std::fmt::Debug for ContextManager<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("settings", &self.settings)
            .field("font_atlas", &self.font_atlas)
            .field("theme_fonts", &self.theme_fonts)
            .field("textures", &self.textures)
            .field("frame_number", &self.frame_counter.get())
            .finish()
    }
}
