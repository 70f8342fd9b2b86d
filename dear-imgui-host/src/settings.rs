//! Module settings shared by every context proxy.
//!
//! Settings live in memory only; the host decides where they come from.

use std::path::{Path, PathBuf};

use crate::error::{ImGuiHostError, ImGuiHostResult};
use crate::fonts::ThemeFont;
use crate::math::Vector2;

/// Directory name under the settings base directory.
pub const PLUGIN_NAME: &str = "ImGui";

/// Canvas size given to every new context until the host reports its own.
pub const DEFAULT_CANVAS_SIZE: Vector2 = [3840.0, 2160.0];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModuleSettings {
    /// Let keyboard events reach the host after the GUI saw them
    pub share_keyboard_input: bool,
    pub share_gamepad_input: bool,
    pub share_mouse_input: bool,
    /// Draw the cursor with the GUI and hide the host cursor
    pub use_software_cursor: bool,
    pub keyboard_navigation: bool,
    pub gamepad_navigation: bool,
    /// Base directory for per-context ini files, the temp dir when unset
    pub settings_base_dir: Option<PathBuf>,
    pub default_canvas_size: Vector2,
    /// Font pushed around every draw callback
    pub theme_font: ThemeFont,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            share_keyboard_input: false,
            share_gamepad_input: false,
            share_mouse_input: false,
            use_software_cursor: false,
            keyboard_navigation: false,
            gamepad_navigation: false,
            settings_base_dir: None,
            default_canvas_size: DEFAULT_CANVAS_SIZE,
            theme_font: ThemeFont::DroidSans,
        }
    }
}

impl ModuleSettings {
    /// Directory holding the ini files of every context
    pub fn settings_directory(&self) -> PathBuf {
        let base = self
            .settings_base_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        base.join(PLUGIN_NAME)
    }
}

/// Ini file of the context `context_name` inside `settings_dir`.
pub fn ini_file_path(settings_dir: &Path, context_name: &str) -> PathBuf {
    settings_dir.join(format!("{context_name}.ini"))
}

/// Creates `dir` and its parents if needed.
pub fn ensure_settings_directory(dir: &Path) -> ImGuiHostResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| ImGuiHostError::io(dir, source))?;
    host_debug!("Created settings directory {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ini_path_is_under_plugin_directory() {
        let settings = ModuleSettings {
            settings_base_dir: Some(PathBuf::from("/saved/config")),
            ..ModuleSettings::default()
        };
        let dir = settings.settings_directory();
        assert_eq!(dir, Path::new("/saved/config/ImGui"));
        assert_eq!(
            ini_file_path(&dir, "Editor"),
            Path::new("/saved/config/ImGui/Editor.ini")
        );
    }

    #[test]
    fn default_base_is_temp_dir() {
        let settings = ModuleSettings::default();
        assert_eq!(
            settings.settings_directory(),
            std::env::temp_dir().join(PLUGIN_NAME)
        );
    }

    #[test]
    fn directory_is_created_with_parents() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("a").join("b");
        ensure_settings_directory(&dir).unwrap();
        assert!(dir.is_dir());
        ensure_settings_directory(&dir).unwrap();
    }

    #[test]
    fn directory_creation_failure_is_reported() {
        let base = tempfile::tempdir().unwrap();
        let file = base.path().join("file");
        std::fs::write(&file, b"").unwrap();
        let err = ensure_settings_directory(&file.join("dir")).unwrap_err();
        assert!(matches!(err, ImGuiHostError::Io { .. }));
    }
}
