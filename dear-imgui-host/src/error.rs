//! Error types for the host integration layer
//!
//! Configuration and resource problems surface as [`ImGuiHostError`].
//! Lifecycle violations (ticking before fonts are built, re-entrant ticks)
//! are programmer errors and panic instead.

use std::path::PathBuf;

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::{debug, error, warn};

/// Result type for host integration operations
pub type ImGuiHostResult<T> = Result<T, ImGuiHostError>;

/// Errors that can occur while hosting GUI contexts
#[derive(Error, Debug)]
pub enum ImGuiHostError {
    /// The GUI backend refused to create a context
    #[error("GUI backend error")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A texture with this name is already registered
    #[error("Texture name already in use: {name}")]
    TextureNameInUse { name: String },

    /// Texture creation or registration failed
    #[error("Texture operation failed: {operation}")]
    TextureOperation { operation: String },

    /// The font atlas was mutated after it was built
    #[error("Font atlas is locked after build")]
    FontAtlasLocked,

    /// Font loading or rasterization failed
    #[error("Font loading failed: {reason}")]
    FontLoading { reason: String },

    /// A filesystem operation failed
    #[error("IO operation failed on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid operation attempted
    #[error("Invalid operation: {operation}")]
    InvalidOperation { operation: String },

    /// Configuration error
    #[error("Configuration error: {setting}")]
    Configuration { setting: String },
}

impl ImGuiHostError {
    /// Create a texture name collision error
    pub fn texture_name_in_use(name: impl Into<String>) -> Self {
        let name = name.into();
        #[cfg(feature = "tracing")]
        warn!("Texture name already in use: {}", name);
        Self::TextureNameInUse { name }
    }

    /// Create a texture operation error
    pub fn texture_operation(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        #[cfg(feature = "tracing")]
        error!("Texture operation failed: {}", operation);
        Self::TextureOperation { operation }
    }

    /// Create a font loading error
    pub fn font_loading(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        error!("Font loading failed: {}", reason);
        Self::FontLoading { reason }
    }

    /// Create an IO error bound to the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        #[cfg(feature = "tracing")]
        warn!("IO operation failed on {}: {}", path.display(), source);
        Self::Io { path, source }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid operation: {}", operation);
        Self::InvalidOperation { operation }
    }

    /// Create a configuration error
    pub fn configuration(setting: impl Into<String>) -> Self {
        let setting = setting.into();
        #[cfg(feature = "tracing")]
        debug!("Configuration error: {}", setting);
        Self::Configuration { setting }
    }
}

/// Trait for converting backend errors to ImGuiHostError
pub trait IntoImGuiHostError {
    fn into_host_error(self) -> ImGuiHostError;
}

impl<E> IntoImGuiHostError for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_host_error(self) -> ImGuiHostError {
        ImGuiHostError::Backend(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_creation() {
        let err = ImGuiHostError::texture_name_in_use("ImGuiModule_Plain");
        assert!(err.to_string().contains("ImGuiModule_Plain"));
    }

    #[test]
    fn test_error_chain() {
        let source_err = std::io::Error::new(std::io::ErrorKind::Other, "out of contexts");
        let host_err = source_err.into_host_error();
        assert!(matches!(host_err, ImGuiHostError::Backend(_)));
        assert!(host_err.source().is_some());
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = ImGuiHostError::io(
            "/tmp/ImGui",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/ImGui"));
        assert!(err.source().is_some());
    }
}
