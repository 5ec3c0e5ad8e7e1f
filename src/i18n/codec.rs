//! Path codec: phrase keys <-> translation file paths.
//!
//! A phrase key such as `users.index.empty` is looked up under
//! `<root>/<locale>/users.json`, then `<root>/<locale>/users/index.json`, and
//! so on. The first candidate present in the [`KnownFiles`] index wins. The
//! inverse direction maps a discovered file back to the locale and tree path
//! its content attaches to.

use crate::error::{I18nError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extension of translation files
pub const JSON_EXTENSION: &str = "json";

/// Canonicalize a locale identifier. Locales are compared lowercased
/// regardless of the case-sensitivity setting.
pub fn canonical_locale(locale: &str) -> String {
    locale.trim().to_lowercase()
}

/// How raw keys and path segments are normalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyRules {
    pub case_sensitive: bool,
    pub only_dot_as_separator: bool,
}

impl KeyRules {
    pub fn canonical_segment(&self, segment: &str) -> String {
        if self.case_sensitive {
            segment.to_string()
        } else {
            segment.to_lowercase()
        }
    }

    fn is_separator(&self, c: char) -> bool {
        c == '.' || (!self.only_dot_as_separator && c == '/')
    }

    /// Split a raw key into canonical segments, dropping empty ones.
    pub fn split_key(&self, key: &str) -> Vec<String> {
        key.split(|c| self.is_separator(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| self.canonical_segment(s))
            .collect()
    }
}

/// A phrase key split into its canonical segments.
///
/// `raw` keeps the caller's spelling so a miss can hand it back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseKey {
    raw: String,
    segments: Vec<String>,
}

impl PhraseKey {
    pub fn parse(raw: &str, rules: &KeyRules) -> Self {
        Self {
            raw: raw.to_string(),
            segments: rules.split_key(raw),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Canonical dotted form, used in diagnostics
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

/// Where a translation file's content attaches in the translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub locale: String,
    pub namespace: Vec<String>,
    pub base_name: String,
}

impl FileLocation {
    /// Tree path under the locale root: namespace segments then the base name.
    pub fn tree_path(&self) -> Vec<String> {
        let mut path = self.namespace.clone();
        path.push(self.base_name.clone());
        path
    }

    /// Depth of the file below its locale folder (1 for `<locale>/home.json`)
    pub fn depth(&self) -> usize {
        self.namespace.len() + 1
    }

    fn index_key(&self) -> String {
        candidate_path(&self.locale, &self.tree_path())
    }
}

/// Canonical relative path of the file that would back `segments`,
/// e.g. `en-us/users/index.json`.
pub fn candidate_path<S: AsRef<str>>(locale: &str, segments: &[S]) -> String {
    let mut path = String::from(locale);
    for segment in segments {
        path.push('/');
        path.push_str(segment.as_ref());
    }
    path.push('.');
    path.push_str(JSON_EXTENSION);
    path
}

/// Every translation file found by a directory walk, keyed by its canonical
/// relative path. The value is the real on-disk path.
#[derive(Debug, Clone, Default)]
pub struct KnownFiles {
    files: BTreeMap<String, (FileLocation, PathBuf)>,
}

impl KnownFiles {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `path` under its canonical location.
    ///
    /// Two files can share a location when case is ignored (`Home.json` and
    /// `home.json`). The later one wins and the displaced path is returned.
    pub fn insert(&mut self, location: FileLocation, path: PathBuf) -> Option<PathBuf> {
        let key = location.index_key();
        let displaced = self.files.insert(key.clone(), (location, path))?.1;
        warn!(
            index_key = %key,
            displaced = %displaced.display(),
            "Two translation files map to the same location, keeping the later one"
        );
        Some(displaced)
    }

    /// Entry for a canonical relative path such as `en-us/home.json`
    pub fn get(&self, candidate: &str) -> Option<(&FileLocation, &Path)> {
        self.files
            .get(candidate)
            .map(|(location, path)| (location, path.as_path()))
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Indexed files in canonical path order
    pub fn iter(&self) -> impl Iterator<Item = (&FileLocation, &Path)> {
        self.files
            .values()
            .map(|(location, path)| (location, path.as_path()))
    }
}

/// Find the file backing `key` under `locale`.
///
/// Candidates are tried from the shortest prefix to the full key, so a
/// coarse namespace file (`users.json`) wins over a deeper one
/// (`users/index.json`) when both exist.
pub fn key_to_file_path<'a>(
    key: &PhraseKey,
    locale: &str,
    known: &'a KnownFiles,
) -> Option<(&'a FileLocation, &'a Path)> {
    (1..=key.segments().len())
        .map(|len| candidate_path(locale, &key.segments()[..len]))
        .find_map(|candidate| known.get(&candidate))
}

/// Map a file under `root` back to its locale and tree location.
///
/// Both `/` and `\` are accepted as separators in the relative part.
pub fn file_path_to_location(path: &Path, root: &Path, rules: &KeyRules) -> Result<FileLocation> {
    let relative = relative_to_root(path, root).ok_or_else(|| I18nError::OutsideRoot {
        path: path.to_path_buf(),
    })?;

    let mut parts: Vec<&str> = relative
        .split(['/', '\\'])
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();

    let file_name = match parts.pop() {
        Some(name) if !parts.is_empty() => name,
        _ => {
            return Err(I18nError::OutsideRoot {
                path: path.to_path_buf(),
            })
        }
    };

    let base_name = strip_json_extension(file_name).ok_or_else(|| I18nError::OutsideRoot {
        path: path.to_path_buf(),
    })?;

    Ok(FileLocation {
        locale: canonical_locale(parts[0]),
        namespace: parts[1..]
            .iter()
            .map(|p| rules.canonical_segment(p))
            .collect(),
        base_name: rules.canonical_segment(base_name),
    })
}

/// True if `path` has a `.json` extension (any case)
pub fn is_translation_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION))
        .unwrap_or(false)
}

fn strip_json_extension(file_name: &str) -> Option<&str> {
    let (base, ext) = file_name.rsplit_once('.')?;
    (ext.eq_ignore_ascii_case(JSON_EXTENSION) && !base.is_empty()).then_some(base)
}

fn relative_to_root(path: &Path, root: &Path) -> Option<String> {
    if let Ok(relative) = path.strip_prefix(root) {
        return relative.to_str().map(str::to_string);
    }

    // Mixed separators defeat Path::strip_prefix, retry on normalized strings
    let path = path.to_str()?.replace('\\', "/");
    let root = root.to_str()?.replace('\\', "/");
    let root = root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    rest.starts_with('/').then(|| rest.to_string())
}
