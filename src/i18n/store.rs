//! In-memory translation trees, one per locale.

use crate::i18n::codec::{KeyRules, PhraseKey};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Children of one node in a translation tree
pub type PhraseTree = BTreeMap<String, Phrase>;

/// A node in a translation tree.
///
/// Files normally hold strings and nested objects. Any other JSON value
/// (numbers, arrays, ...) is kept as-is but never resolves to a phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Phrase {
    Text(String),
    Map(PhraseTree),
    Other(Value),
}

impl Phrase {
    /// Convert parsed JSON, canonicalizing object keys with `rules`.
    pub fn from_json(value: Value, rules: &KeyRules) -> Self {
        match value {
            Value::String(text) => Phrase::Text(text),
            Value::Object(map) => Phrase::Map(
                map.into_iter()
                    .map(|(k, v)| (rules.canonical_segment(&k), Phrase::from_json(v, rules)))
                    .collect(),
            ),
            other => Phrase::Other(other),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Phrase::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Walk `path` from this node.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Phrase> {
        path.iter().try_fold(self, |node, segment| match node {
            Phrase::Map(children) => children.get(segment.as_ref()),
            _ => None,
        })
    }
}

/// Locale -> translation tree.
///
/// Not synchronized. The owning engine takes `&mut self` for every mutation,
/// so sharing across threads needs an outer lock.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    trees: BTreeMap<String, PhraseTree>,
}

impl TranslationStore {
    /// Create one empty bucket per locale.
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trees: locales
                .into_iter()
                .map(|locale| (locale.into(), PhraseTree::new()))
                .collect(),
        }
    }

    /// Attach `content` at `path` under `locale`.
    ///
    /// Intermediate maps are created as needed, and a non-map value in the
    /// way is replaced by one. The value at `path` itself is overwritten.
    /// Siblings are never touched. An empty `path` extends the locale root
    /// when `content` is a map.
    pub fn merge<S: AsRef<str>>(&mut self, locale: &str, path: &[S], content: Phrase) {
        let root = self.trees.entry(locale.to_string()).or_default();

        let Some((last, parents)) = path.split_last() else {
            if let Phrase::Map(children) = content {
                root.extend(children);
            }
            return;
        };

        let mut node = root;
        for segment in parents {
            let slot = node
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| Phrase::Map(PhraseTree::new()));
            if !matches!(slot, Phrase::Map(_)) {
                *slot = Phrase::Map(PhraseTree::new());
            }
            node = match slot {
                Phrase::Map(children) => children,
                _ => unreachable!("slot was just made a map"),
            };
        }

        node.insert(last.as_ref().to_string(), content);
    }

    /// Full tree of one locale
    pub fn get(&self, locale: &str) -> Option<&PhraseTree> {
        self.trees.get(locale)
    }

    /// Snapshot of every locale's tree
    pub fn trees(&self) -> &BTreeMap<String, PhraseTree> {
        &self.trees
    }

    /// Node at `key`, string or not
    pub fn node(&self, locale: &str, key: &PhraseKey) -> Option<&Phrase> {
        let (first, rest) = key.segments().split_first()?;
        self.trees.get(locale)?.get(first)?.get_path(rest)
    }

    pub fn has(&self, locale: &str, key: &PhraseKey) -> bool {
        self.resolve(locale, key).is_some()
    }

    /// The string at `key`, or `None` if a segment is missing or the value
    /// there is not a string.
    pub fn resolve(&self, locale: &str, key: &PhraseKey) -> Option<&str> {
        self.node(locale, key).and_then(Phrase::as_text)
    }
}
