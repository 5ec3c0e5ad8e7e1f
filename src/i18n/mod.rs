//! Lazy translation resolution over a directory tree of JSON files.
//!
//! # Architecture
//!
//! - `codec`: phrase key <-> translation file path mapping
//! - `store`: per-locale nested phrase trees
//! - `loader`: directory discovery and file reads (sync and async)
//! - `catalog`: supported locales, current and fallback locale
//! - `interpolation`: placeholder expansion of resolved phrases
//! - `metrics`: per-engine load and lookup counters
//! - `engine`: the `I18n` type tying them together
//!
//! # Example
//!
//! ```rust,ignore
//! use lazy_i18n::{I18n, I18nOptions};
//!
//! let mut i18n = I18n::new(
//!     I18nOptions::new(["en-US", "en-FR"])
//!         .with_fallback("en-fr")
//!         .with_lazy_loading(true),
//! )?;
//! i18n.set_locale("en-US")?;
//! let hello = i18n.t("home.hello");
//! ```

mod catalog;
mod codec;
mod engine;
mod interpolation;
mod loader;
mod metrics;
mod store;

pub use catalog::LocaleCatalog;
pub use codec::{
    canonical_locale, file_path_to_location, key_to_file_path, FileLocation, KeyRules, KnownFiles,
    PhraseKey,
};
pub use engine::I18n;
pub use interpolation::{InterpolationArgs, InterpolationOptions, Interpolator, TemplateInterpolator};
pub use loader::{read_file, read_file_async, FileLoader};
pub use metrics::{LoadMetrics, MetricsReport};
pub use store::{Phrase, PhraseTree, TranslationStore};
