//! File loader: discovers translation files and merges their content into
//! the [`TranslationStore`].
//!
//! Discovery walks `<root>/<locale>/**/*.json` once and keeps the result as
//! the known-files index. Eager loading then reads every indexed file. Lazy
//! loading reads one indexed file at a time, the first time a key under it
//! is requested.

use crate::error::{I18nError, Result};
use crate::i18n::codec::{self, FileLocation, KeyRules, KnownFiles};
use crate::i18n::store::{Phrase, TranslationStore};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct FileLoader {
    root: PathBuf,
    rules: KeyRules,
    known: KnownFiles,
    loaded: HashSet<PathBuf>,
}

impl FileLoader {
    /// Create a loader for `root` with an empty index.
    pub fn new(root: impl Into<PathBuf>, rules: KeyRules) -> Self {
        Self {
            root: root.into(),
            rules,
            known: KnownFiles::new(),
            loaded: HashSet::new(),
        }
    }

    /// Translations root folder
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files found by the last discovery pass
    pub fn known(&self) -> &KnownFiles {
        &self.known
    }

    /// Whether `path` has already been merged into the store
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains(path)
    }

    /// Create `<root>/<locale>` for every locale that lacks one.
    pub fn ensure_locale_dirs<S: AsRef<str>>(&self, locales: &[S]) -> Result<()> {
        for locale in locales {
            let dir = self.root.join(locale.as_ref());
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|source| I18nError::CreateLocaleDir {
                path: dir.clone(),
                source,
            })?;
            debug!(path = %dir.display(), "Created locale directory");
        }
        Ok(())
    }

    /// Walk the root and rebuild the known-files index. Returns the number of
    /// files indexed.
    pub fn discover<S: AsRef<str>>(&mut self, locales: &[S]) -> Result<usize> {
        let files = walk_translation_files(&self.root)?;
        self.known = build_index(files, &self.root, &self.rules, locales);
        Ok(self.known.len())
    }

    /// [`FileLoader::discover`] with the walk moved to the blocking pool.
    pub async fn discover_async<S: AsRef<str>>(&mut self, locales: &[S]) -> Result<usize> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || walk_translation_files(&root)).await??;
        self.known = build_index(files, &self.root, &self.rules, locales);
        Ok(self.known.len())
    }

    /// Read one file and merge it at `location`.
    pub fn load_file(
        &mut self,
        store: &mut TranslationStore,
        location: &FileLocation,
        path: &Path,
    ) -> Result<()> {
        let content = read_file(path, &self.rules)?;
        self.merge(store, location, path, content);
        Ok(())
    }

    /// [`FileLoader::load_file`] reading through `tokio::fs`.
    pub async fn load_file_async(
        &mut self,
        store: &mut TranslationStore,
        location: &FileLocation,
        path: &Path,
    ) -> Result<()> {
        let content = read_file_async(path, &self.rules).await?;
        self.merge(store, location, path, content);
        Ok(())
    }

    /// Read and merge every indexed file. Returns the number of files read.
    pub fn load_all(&mut self, store: &mut TranslationStore) -> Result<usize> {
        let files = self.eager_order();
        for (location, path) in &files {
            self.load_file(store, location, path)?;
        }
        info!(
            files = files.len(),
            locales = locale_count(&files),
            "Loaded translation files"
        );
        Ok(files.len())
    }

    /// Read every indexed file concurrently, then merge them in eager order.
    pub async fn load_all_async(&mut self, store: &mut TranslationStore) -> Result<usize> {
        let files = self.eager_order();
        let rules = self.rules;
        let contents = try_join_all(files.iter().map(|(_, path)| read_file_async(path, &rules))).await?;

        for ((location, path), content) in files.iter().zip(contents) {
            self.merge(store, location, path, content);
        }
        info!(
            files = files.len(),
            locales = locale_count(&files),
            "Loaded translation files"
        );
        Ok(files.len())
    }

    /// Deepest files first, so a coarser file merged later owns its whole
    /// subtree. This matches the shortest-prefix rule of lazy lookups.
    fn eager_order(&self) -> Vec<(FileLocation, PathBuf)> {
        let mut files: Vec<_> = self
            .known
            .iter()
            .map(|(location, path)| (location.clone(), path.to_path_buf()))
            .collect();
        files.sort_by(|(a, a_path), (b, b_path)| {
            b.depth().cmp(&a.depth()).then_with(|| a_path.cmp(b_path))
        });
        files
    }

    fn merge(
        &mut self,
        store: &mut TranslationStore,
        location: &FileLocation,
        path: &Path,
        content: Phrase,
    ) {
        store.merge(&location.locale, &location.tree_path(), content);
        self.loaded.insert(path.to_path_buf());
    }
}

/// Read and parse one translation file.
///
/// Fails with [`I18nError::NotAFile`] when `path` is not a regular file.
pub fn read_file(path: &Path, rules: &KeyRules) -> Result<Phrase> {
    let metadata = fs::metadata(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(I18nError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Read translation file");
    parse(&text, path, rules)
}

/// [`read_file`] on `tokio::fs`.
pub async fn read_file_async(path: &Path, rules: &KeyRules) -> Result<Phrase> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| I18nError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(I18nError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| I18nError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "Read translation file");
    parse(&text, path, rules)
}

fn parse(text: &str, path: &Path, rules: &KeyRules) -> Result<Phrase> {
    let value = serde_json::from_str(text).map_err(|source| I18nError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Phrase::from_json(value, rules))
}

/// Every `*.json` file below `root`, sorted.
fn walk_translation_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // Symlinked directories are not followed, a link loop would never end
        if entry.file_type().map_err(io_err)?.is_dir() {
            walk(&path, files)?;
        } else if codec::is_translation_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Number of distinct locales among `files`
fn locale_count(files: &[(FileLocation, PathBuf)]) -> usize {
    files
        .iter()
        .map(|(location, _)| location.locale.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn build_index<S: AsRef<str>>(
    files: Vec<PathBuf>,
    root: &Path,
    rules: &KeyRules,
    locales: &[S],
) -> KnownFiles {
    let mut known = KnownFiles::new();
    for path in files {
        let location = match codec::file_path_to_location(&path, root, rules) {
            Ok(location) => location,
            Err(e) => {
                warn!(path = %path.display(), "Skipping translation file: {}", e);
                continue;
            }
        };
        if !locales.iter().any(|l| l.as_ref() == location.locale) {
            debug!(path = %path.display(), locale = %location.locale, "Skipping unsupported locale");
            continue;
        }
        known.insert(location, path);
    }
    known
}
