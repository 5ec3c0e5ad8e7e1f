//! Integration tests for the translation engine
//!
//! These tests build real translation trees in temporary directories and
//! drive the public `I18n` API end to end.

use lazy_i18n::{I18n, I18nError, I18nOptions, InterpolationArgs};
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ==================== Test Helpers ====================

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("Failed to create dir");
    fs::write(path, content).expect("Failed to write translation file");
}

fn options(root: &Path) -> I18nOptions {
    I18nOptions::new(["en-US", "en-FR"])
        .with_fallback("en-fr")
        .with_languages_folder(root)
}

// ==================== Construction Tests ====================

#[test]
fn test_empty_locale_set_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let options = I18nOptions::new(Vec::<String>::new()).with_languages_folder(temp.path());
    assert!(matches!(I18n::new(options), Err(I18nError::NoLocales)));
}

#[test]
fn test_fallback_outside_set_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let options = I18nOptions::new(["en-US", "en-FR"])
        .with_fallback("es")
        .with_languages_folder(temp.path());
    assert!(matches!(
        I18n::new(options),
        Err(I18nError::FallbackNotSupported { .. })
    ));
}

#[test]
fn test_uncreatable_locale_dir_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path().join("i18n");
    fs::write(&root, "a file, not a folder").expect("Failed to write");

    assert!(matches!(
        I18n::new(options(&root)),
        Err(I18nError::CreateLocaleDir { .. })
    ));
}

// ==================== End-to-End Tests ====================

#[test]
fn test_end_to_end_eager() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-us/home.json", r#"{"hello":"Hello"}"#);

    let mut i18n = I18n::new(options(temp.path())).expect("engine");
    i18n.set_locale("en-US").expect("supported locale");

    assert_eq!(i18n.locale(), "en-us");
    assert_eq!(i18n.t("home.hello"), "Hello");
}

#[test]
fn test_end_to_end_lazy() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-fr/users/index.json", r#"{"empty":"No users"}"#);

    let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    i18n.set_locale("en-FR").expect("supported locale");

    assert_eq!(i18n.t("users.index.empty"), "No users");
    assert_eq!(i18n.metrics().files_read, 1);
}

#[test]
fn test_fallback_only_key_resolves_from_fallback() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-us/home.json", r#"{"hello":"Hello"}"#);
    write(temp.path(), "en-fr/home.json", r#"{"hello":"Bonjour","only_fr":"Seulement"}"#);

    for lazy in [false, true] {
        let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(lazy)).expect("engine");
        i18n.set_locale("en-us").expect("supported locale");
        assert_eq!(i18n.t("home.only_fr"), "Seulement", "lazy = {}", lazy);
    }
}

#[test]
fn test_lazy_no_current_file_loads_fallback_file() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-fr/about.json", r#"{"title":"A propos"}"#);

    let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    i18n.set_locale("en-us").expect("supported locale");

    assert_eq!(i18n.t("about.title"), "A propos");

    let report = i18n.metrics();
    assert_eq!(report.missing_files, 1);
    assert_eq!(report.lazy_loads, 1);
    assert_eq!(report.fallback_hits, 1);
    assert_eq!(report.misses, 0);
}

#[test]
fn test_absent_key_returns_key() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-us/home.json", r#"{"hello":"Hello"}"#);

    for lazy in [false, true] {
        let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(lazy)).expect("engine");
        i18n.set_locale("en-us").expect("supported locale");
        assert_eq!(i18n.t("home.absent"), "home.absent");
        assert_eq!(i18n.t("Nowhere.At.All"), "Nowhere.At.All");
    }
}

// ==================== Lazy Loading Tests ====================

#[test]
fn test_sibling_keys_load_file_once() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(
        temp.path(),
        "en-fr/users.json",
        r#"{"title":"Users","index":{"empty":"No users"}}"#,
    );

    let mut lazy = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    assert_eq!(lazy.t("users.title"), "Users");
    assert_eq!(lazy.t("users.index.empty"), "No users");
    assert_eq!(lazy.metrics().files_read, 1);

    let eager = I18n::new(options(temp.path())).expect("engine");
    assert_eq!(lazy.translations()["en-fr"], eager.translations()["en-fr"]);
}

#[test]
fn test_shortest_prefix_file_wins() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-fr/users.json", r#"{"index":{"empty":"from users.json"}}"#);
    write(temp.path(), "en-fr/users/index.json", r#"{"empty":"from users/index.json"}"#);

    let mut lazy = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    assert_eq!(lazy.t("users.index.empty"), "from users.json");

    let mut eager = I18n::new(options(temp.path())).expect("engine");
    assert_eq!(eager.t("users.index.empty"), "from users.json");
}

#[test]
fn test_slash_keys_unless_only_dot() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-fr/users/index.json", r#"{"empty":"No users"}"#);

    let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    assert_eq!(i18n.t("users/index.empty"), "No users");

    let mut strict = I18n::new(
        options(temp.path())
            .with_lazy_loading(true)
            .with_only_dot_as_separator(true),
    )
    .expect("engine");
    assert_eq!(strict.t("users/index.empty"), "users/index.empty");
}

#[tokio::test]
async fn test_async_lazy_lookup() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "en-us/home.json", r#"{"hello":"Hello {{name}}"}"#);
    write(temp.path(), "en-fr/home.json", r#"{"bye":"Au revoir"}"#);

    let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(true)).expect("engine");
    i18n.set_locale("en-us").expect("supported locale");

    let mut args = InterpolationArgs::new();
    args.insert("name".to_string(), "Ana".into());

    assert_eq!(i18n.translate_async("home.hello", &args).await, "Hello Ana");
    assert_eq!(i18n.translate_async("home.bye", &args).await, "Au revoir");
    assert_eq!(i18n.metrics().lazy_loads, 2);
}

// ==================== Case Sensitivity Tests ====================

#[test]
fn test_case_insensitive_lookup() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write(temp.path(), "EN-FR/Home.json", r#"{"Hello":"Bonjour"}"#);

    for lazy in [false, true] {
        let mut i18n = I18n::new(options(temp.path()).with_lazy_loading(lazy)).expect("engine");
        assert_eq!(i18n.t("Home.Hello"), "Bonjour");
        assert_eq!(i18n.t("home.hello"), "Bonjour");
        assert_eq!(i18n.t("HOME.HELLO"), "Bonjour");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_key_case_does_not_matter(flips in prop::collection::vec(any::<bool>(), 10)) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        write(temp.path(), "en-fr/home.json", r#"{"hello":"Bonjour"}"#);
        let mut i18n = I18n::new(options(temp.path())).expect("engine");

        let key: String = "home.hello"
            .chars()
            .zip(flips.iter().chain(std::iter::repeat(&false)))
            .map(|(c, &upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert_eq!(i18n.t(&key), "Bonjour");
    }
}
