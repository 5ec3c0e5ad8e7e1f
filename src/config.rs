use crate::i18n::{InterpolationArgs, InterpolationOptions};
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Called with `(key, args, locale)` when a key is missing from both the
/// current and the fallback locale. Its return value replaces the key.
pub type MissingKeyHandler = Arc<dyn Fn(&str, &InterpolationArgs, &str) -> String + Send + Sync>;

/// Construction options for [`crate::I18n`].
#[derive(Clone)]
pub struct I18nOptions {
    /// Supported locales, in priority order (must not be empty)
    pub locales: Vec<String>,

    /// Locale consulted when the current one lacks a phrase.
    /// Defaults to the first entry of `locales`.
    pub fallback: Option<String>,

    /// Root holding `<locale>/**/*.json`
    pub languages_folder: PathBuf,

    /// Defer file reads until a key under them is first requested
    pub lazy_loading: bool,

    /// Preserve case in keys and file paths instead of lowercasing them
    pub case_sensitive: bool,

    /// Only `.` separates key segments (otherwise `/` does too)
    pub only_dot_as_separator: bool,

    /// Load during construction. When false, call `load_translations().await`.
    pub sync_loading: bool,

    // Formatting
    pub interpolation: InterpolationOptions,
    pub on_missing_key: Option<MissingKeyHandler>,
}

impl I18nOptions {
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_languages_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.languages_folder = folder.into();
        self
    }

    pub fn with_lazy_loading(mut self, lazy: bool) -> Self {
        self.lazy_loading = lazy;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_only_dot_as_separator(mut self, only_dot: bool) -> Self {
        self.only_dot_as_separator = only_dot;
        self
    }

    pub fn with_sync_loading(mut self, sync: bool) -> Self {
        self.sync_loading = sync;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationOptions) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_on_missing_key<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &InterpolationArgs, &str) -> String + Send + Sync + 'static,
    {
        self.on_missing_key = Some(Arc::new(handler));
        self
    }

    /// Build options from `I18N_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let locales = std::env::var("I18N_LOCALES").context("I18N_LOCALES not set")?;
        let defaults = Self::default();

        Ok(Self {
            locales: locales
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            fallback: std::env::var("I18N_FALLBACK").ok().filter(|f| !f.is_empty()),
            languages_folder: std::env::var("I18N_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.languages_folder),
            lazy_loading: env_flag("I18N_LAZY_LOADING")?.unwrap_or(defaults.lazy_loading),
            case_sensitive: env_flag("I18N_CASE_SENSITIVE")?.unwrap_or(defaults.case_sensitive),
            only_dot_as_separator: env_flag("I18N_ONLY_DOT_SEPARATOR")?
                .unwrap_or(defaults.only_dot_as_separator),
            sync_loading: env_flag("I18N_SYNC_LOADING")?.unwrap_or(defaults.sync_loading),
            interpolation: defaults.interpolation,
            on_missing_key: None,
        })
    }
}

impl Default for I18nOptions {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            fallback: None,
            languages_folder: PathBuf::from("i18n"),
            lazy_loading: false,
            case_sensitive: false,
            only_dot_as_separator: false,
            sync_loading: true,
            interpolation: InterpolationOptions::default(),
            on_missing_key: None,
        }
    }
}

impl fmt::Debug for I18nOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nOptions")
            .field("locales", &self.locales)
            .field("fallback", &self.fallback)
            .field("languages_folder", &self.languages_folder)
            .field("lazy_loading", &self.lazy_loading)
            .field("case_sensitive", &self.case_sensitive)
            .field("only_dot_as_separator", &self.only_dot_as_separator)
            .field("sync_loading", &self.sync_loading)
            .field("interpolation", &self.interpolation)
            .field("on_missing_key", &self.on_missing_key.is_some())
            .finish()
    }
}

fn env_flag(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value)
            .map(Some)
            .with_context(|| format!("{} must be a boolean, got '{}'", name, value)),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
