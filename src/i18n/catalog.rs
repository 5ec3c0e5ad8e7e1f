//! Locale catalog: the supported locales and the active current/fallback pair.
//!
//! Every locale is stored in canonical lowercase form, so `"en-US"` and
//! `"en-us"` name the same locale everywhere.

use crate::error::{I18nError, Result};
use crate::i18n::codec::canonical_locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCatalog {
    locales: Vec<String>,
    fallback: String,
    current: String,
}

impl LocaleCatalog {
    /// Validate and canonicalize the supported locales.
    ///
    /// # Errors
    /// * [`I18nError::NoLocales`] if `locales` is empty (after dropping blanks)
    /// * [`I18nError::FallbackNotSupported`] if `fallback` is not one of them
    pub fn new<S: AsRef<str>>(locales: &[S], fallback: Option<&str>) -> Result<Self> {
        let mut canonical: Vec<String> = Vec::with_capacity(locales.len());
        for locale in locales {
            let locale = canonical_locale(locale.as_ref());
            if !locale.is_empty() && !canonical.contains(&locale) {
                canonical.push(locale);
            }
        }

        let Some(first) = canonical.first().cloned() else {
            return Err(I18nError::NoLocales);
        };

        let fallback = match fallback.map(canonical_locale).filter(|f| !f.is_empty()) {
            Some(f) if canonical.contains(&f) => f,
            Some(f) => {
                return Err(I18nError::FallbackNotSupported {
                    fallback: f,
                    allowed: canonical.join(", "),
                })
            }
            None => first,
        };

        Ok(Self {
            locales: canonical,
            current: fallback.clone(),
            fallback,
        })
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn is_supported(&self, locale: &str) -> bool {
        let locale = canonical_locale(locale);
        self.locales.iter().any(|l| *l == locale)
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Switch the current locale.
    ///
    /// Returns `Ok(false)` without changing anything for blank input,
    /// `Ok(true)` after a switch.
    pub fn set_current(&mut self, value: &str) -> Result<bool> {
        let locale = canonical_locale(value);
        if locale.is_empty() {
            return Ok(false);
        }
        if !self.locales.contains(&locale) {
            return Err(I18nError::UnsupportedLocale {
                locale,
                allowed: self.locales.join(", "),
            });
        }
        self.current = locale;
        Ok(true)
    }
}
