//! Placeholder expansion for resolved phrases.
//!
//! The engine only hands an [`Interpolator`] the phrase it resolved and the
//! caller's arguments. [`TemplateInterpolator`] is the default: it replaces
//! `{{name}}` placeholders and picks between `||||`-separated plural forms
//! using the `smart_count` argument.

use regex::Regex;
use serde_json::{Map, Value};

/// Arguments passed to `translate`
pub type InterpolationArgs = Map<String, Value>;

/// Separator between plural forms in a phrase
pub const PLURAL_SEPARATOR: &str = "||||";

/// Argument selecting the plural form
pub const SMART_COUNT: &str = "smart_count";

/// Expands a resolved phrase with caller-supplied values.
pub trait Interpolator: Send + Sync {
    fn interpolate(&self, phrase: &str, args: &InterpolationArgs, locale: &str) -> String;
}

/// Placeholder delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationOptions {
    pub prefix: String,
    pub suffix: String,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            prefix: "{{".to_string(),
            suffix: "}}".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInterpolator {
    placeholder: Regex,
}

impl TemplateInterpolator {
    pub fn new(options: &InterpolationOptions) -> Self {
        let pattern = format!(
            r"{}\s*([A-Za-z0-9_.\-]+)\s*{}",
            regex::escape(&options.prefix),
            regex::escape(&options.suffix)
        );
        Self {
            // Both delimiters are escaped, the remaining pattern is fixed
            placeholder: Regex::new(&pattern).expect("placeholder pattern is valid"),
        }
    }

    /// Pick the plural form for `smart_count`, if the phrase has several.
    fn select_form<'a>(phrase: &'a str, args: &InterpolationArgs) -> &'a str {
        let Some(count) = args.get(SMART_COUNT).and_then(as_count) else {
            return phrase;
        };
        let forms: Vec<&str> = phrase.split(PLURAL_SEPARATOR).collect();
        let index = if count == 1.0 { 0 } else { 1 };
        forms[index.min(forms.len() - 1)].trim()
    }
}

impl Default for TemplateInterpolator {
    fn default() -> Self {
        Self::new(&InterpolationOptions::default())
    }
}

impl Interpolator for TemplateInterpolator {
    fn interpolate(&self, phrase: &str, args: &InterpolationArgs, _locale: &str) -> String {
        let phrase = Self::select_form(phrase, args);
        self.placeholder
            .replace_all(phrase, |caps: &regex::Captures| match args.get(&caps[1]) {
                Some(value) => display(value),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

fn as_count(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
