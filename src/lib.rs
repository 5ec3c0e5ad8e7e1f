pub mod config;
pub mod error;
pub mod i18n;

pub use config::I18nOptions;
pub use error::{I18nError, Result};
pub use i18n::{I18n, InterpolationArgs, Interpolator, MetricsReport};
