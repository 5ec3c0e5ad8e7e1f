//! Resolution engine: the public `I18n` type.
//!
//! A lookup resolves against the current locale and then against the
//! fallback locale. In lazy mode each step first loads the file that backs
//! the key in that locale, if it has not been loaded yet.

use crate::config::{I18nOptions, MissingKeyHandler};
use crate::error::Result;
use crate::i18n::catalog::LocaleCatalog;
use crate::i18n::codec::{self, KeyRules, PhraseKey};
use crate::i18n::interpolation::{InterpolationArgs, Interpolator, TemplateInterpolator};
use crate::i18n::loader::FileLoader;
use crate::i18n::metrics::{LoadMetrics, MetricsReport};
use crate::i18n::store::{PhraseTree, TranslationStore};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Translation lookup over a `<root>/<locale>/**/*.json` tree.
///
/// Every operation that can load files takes `&mut self`, and there is no
/// internal locking. To share one instance between threads, wrap it in a
/// `Mutex` so lookups are serialized.
pub struct I18n {
    catalog: LocaleCatalog,
    store: TranslationStore,
    loader: FileLoader,
    rules: KeyRules,
    lazy: bool,
    interpolator: Box<dyn Interpolator>,
    on_missing_key: Option<MissingKeyHandler>,
    metrics: LoadMetrics,
}

impl I18n {
    /// Build an engine using the default [`TemplateInterpolator`].
    ///
    /// # Errors
    /// Fails on an empty locale set, a fallback outside the set, a locale
    /// folder that cannot be created, or (when loading synchronously) a
    /// translation file that cannot be read or parsed.
    pub fn new(options: I18nOptions) -> Result<Self> {
        let interpolator = TemplateInterpolator::new(&options.interpolation);
        Self::with_interpolator(options, interpolator)
    }

    /// Build an engine that formats resolved phrases with `interpolator`.
    pub fn with_interpolator<I>(options: I18nOptions, interpolator: I) -> Result<Self>
    where
        I: Interpolator + 'static,
    {
        let catalog = LocaleCatalog::new(&options.locales, options.fallback.as_deref())?;
        let rules = KeyRules {
            case_sensitive: options.case_sensitive,
            only_dot_as_separator: options.only_dot_as_separator,
        };

        let loader = FileLoader::new(options.languages_folder, rules);
        loader.ensure_locale_dirs(catalog.locales())?;

        let mut i18n = Self {
            store: TranslationStore::new(catalog.locales().iter().cloned()),
            catalog,
            loader,
            rules,
            lazy: options.lazy_loading,
            interpolator: Box::new(interpolator),
            on_missing_key: options.on_missing_key,
            metrics: LoadMetrics::new(),
        };

        if options.sync_loading {
            i18n.load_translations_sync()?;
        }

        debug!(
            locales = ?i18n.catalog.locales(),
            fallback = i18n.catalog.fallback(),
            lazy = i18n.lazy,
            "Translation engine ready"
        );
        Ok(i18n)
    }

    fn load_translations_sync(&mut self) -> Result<()> {
        self.loader.discover(self.catalog.locales())?;
        if !self.lazy {
            let read = self.loader.load_all(&mut self.store)?;
            self.metrics.record_files_read(read);
        }
        Ok(())
    }

    /// Walk the translation root and, in eager mode, read every file.
    ///
    /// Meant for engines built with `sync_loading = false`. In lazy mode only
    /// the known-files index is built. Returns the number of files indexed
    /// (lazy) or read (eager).
    pub async fn load_translations(&mut self) -> Result<usize> {
        let locales = self.catalog.locales().to_vec();
        let indexed = self.loader.discover_async(&locales).await?;
        if self.lazy {
            return Ok(indexed);
        }

        let read = self.loader.load_all_async(&mut self.store).await?;
        self.metrics.record_files_read(read);
        Ok(read)
    }

    /// Switch the current locale. Blank input is ignored.
    ///
    /// # Errors
    /// [`crate::I18nError::UnsupportedLocale`] naming the allowed locales.
    pub fn set_locale(&mut self, value: &str) -> Result<()> {
        if self.catalog.set_current(value)? {
            debug!(locale = self.catalog.current(), "Switched locale");
        }
        Ok(())
    }

    /// Current locale, lowercased
    pub fn locale(&self) -> &str {
        self.catalog.current()
    }

    /// Locale consulted when the current one lacks a phrase
    pub fn fallback_locale(&self) -> &str {
        self.catalog.fallback()
    }

    /// Supported locales, lowercased, in configured order
    pub fn locales(&self) -> &[String] {
        self.catalog.locales()
    }

    /// Whether file reads are deferred until first lookup
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Root holding the `<locale>` folders
    pub fn languages_folder(&self) -> &Path {
        self.loader.root()
    }

    /// Everything loaded so far, per locale
    pub fn translations(&self) -> &BTreeMap<String, PhraseTree> {
        self.store.trees()
    }

    /// Snapshot of this engine's load and lookup counters
    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Translate without interpolation arguments.
    pub fn t(&mut self, key: &str) -> String {
        self.translate(key, &InterpolationArgs::new())
    }

    /// Resolve `key` in the current locale, then in the fallback locale.
    ///
    /// Never fails. When neither locale defines the key, the key itself is
    /// returned (or the `on_missing_key` handler's result).
    pub fn translate(&mut self, key: &str, args: &InterpolationArgs) -> String {
        let key = PhraseKey::parse(key, &self.rules);
        for (step, locale) in self.lookup_chain(&key) {
            if self.lazy {
                self.lazy_load(&locale, &key);
            }
            if let Some(text) = self.resolve_step(step, &locale, &key, args) {
                return text;
            }
        }
        self.miss(&key, args)
    }

    /// [`I18n::translate`] with lazy file reads awaited on `tokio::fs`.
    pub async fn translate_async(&mut self, key: &str, args: &InterpolationArgs) -> String {
        let key = PhraseKey::parse(key, &self.rules);
        for (step, locale) in self.lookup_chain(&key) {
            if self.lazy {
                self.lazy_load_async(&locale, &key).await;
            }
            if let Some(text) = self.resolve_step(step, &locale, &key, args) {
                return text;
            }
        }
        self.miss(&key, args)
    }

    /// Locales to try for `key`: current, then fallback if it differs.
    fn lookup_chain(&self, key: &PhraseKey) -> Vec<(Step, String)> {
        if key.is_empty() {
            return Vec::new();
        }
        let current = self.catalog.current();
        let fallback = self.catalog.fallback();

        let mut chain = vec![(Step::Current, current.to_string())];
        if fallback != current {
            chain.push((Step::Fallback, fallback.to_string()));
        }
        chain
    }

    fn resolve_step(
        &mut self,
        step: Step,
        locale: &str,
        key: &PhraseKey,
        args: &InterpolationArgs,
    ) -> Option<String> {
        let text = self
            .store
            .resolve(locale, key)
            .map(|phrase| self.interpolator.interpolate(phrase, args, locale))?;
        match step {
            Step::Current => self.metrics.record_hit(),
            Step::Fallback => self.metrics.record_fallback_hit(),
        }
        Some(text)
    }

    /// The not-yet-loaded file backing `key` in `locale`, if any.
    fn pending_file(&mut self, locale: &str, key: &PhraseKey) -> Option<(codec::FileLocation, PathBuf)> {
        let Some((location, path)) = codec::key_to_file_path(key, locale, self.loader.known()) else {
            self.metrics.record_missing_file();
            warn!(locale, key = key.raw(), "No translation file for key");
            return None;
        };
        if self.loader.is_loaded(path) {
            return None;
        }
        Some((location.clone(), path.to_path_buf()))
    }

    fn lazy_load(&mut self, locale: &str, key: &PhraseKey) {
        let Some((location, path)) = self.pending_file(locale, key) else {
            return;
        };
        let loaded = self.loader.load_file(&mut self.store, &location, &path);
        self.finish_lazy_load(locale, key, &path, loaded);
    }

    async fn lazy_load_async(&mut self, locale: &str, key: &PhraseKey) {
        let Some((location, path)) = self.pending_file(locale, key) else {
            return;
        };
        let loaded = self
            .loader
            .load_file_async(&mut self.store, &location, &path)
            .await;
        self.finish_lazy_load(locale, key, &path, loaded);
    }

    /// Lazy loads never fail a lookup, errors are only logged.
    fn finish_lazy_load(&mut self, locale: &str, key: &PhraseKey, path: &Path, loaded: Result<()>) {
        match loaded {
            Ok(()) => {
                self.metrics.record_lazy_load();
                debug!(locale, key = key.raw(), path = %path.display(), "Lazily loaded translation file");
            }
            Err(e) => warn!(locale, key = key.raw(), "Lazy load failed: {}", e),
        }
    }

    fn miss(&mut self, key: &PhraseKey, args: &InterpolationArgs) -> String {
        self.metrics.record_miss();
        let locale = self.catalog.current();
        warn!(locale, key = key.raw(), "Translation not defined");
        match &self.on_missing_key {
            Some(handler) => handler(key.raw(), args, locale),
            None => key.raw().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Current,
    Fallback,
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("catalog", &self.catalog)
            .field("languages_folder", &self.loader.root())
            .field("lazy", &self.lazy)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
