//! Error type shared by every component of the translation engine.

use std::path::PathBuf;

/// Errors raised while constructing the engine or loading translation files.
///
/// Lookups never produce one of these: `I18n::translate` always returns a
/// string. Everything here comes from construction, `set_locale`, or the
/// low-level load operations.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("locales: at least one locale is required")]
    NoLocales,

    #[error("fallback: '{fallback}' must be one of the supported locales [{allowed}]")]
    FallbackNotSupported { fallback: String, allowed: String },

    #[error("locale '{locale}' is not supported, allowed locales are [{allowed}]")]
    UnsupportedLocale { locale: String, allowed: String },

    #[error("failed to create locale directory {}", path.display())]
    CreateLocaleDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not inside a locale folder of the translations root", path.display())]
    OutsideRoot { path: PathBuf },

    #[error("background directory walk failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, I18nError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_error_names_allowed_set() {
        let err = I18nError::FallbackNotSupported {
            fallback: "de".to_string(),
            allowed: "en-us, en-fr".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'de'"));
        assert!(msg.contains("en-us, en-fr"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err = I18nError::Io {
            path: PathBuf::from("i18n/en/home.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("i18n/en/home.json"));
        assert!(err.source().is_some());
    }
}
