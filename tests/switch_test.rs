//! アクティブカタログの切り替えに関するテスト

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;
use std::thread;

use googletest::prelude::*;
use tempfile::TempDir;
use ts_catalog::{
    ActiveCatalog,
    CatalogError,
    CatalogSettings,
    ConfigManager,
    Translator,
};

const PLUGIN: &str = "LeechCraft::Liznoo::Plugin";

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/translations")
}

/// Copies both fixture catalogs into `dir` under one prefix.
fn prepare_translations(dir: &Path) {
    fs::copy(fixture_dir().join("leechcraft_liznoo_ru_RU.ts"), dir.join("leechcraft_ru_RU.ts"))
        .unwrap();
    fs::copy(fixture_dir().join("leechcraft_poshuku_cleanweb_it.ts"), dir.join("leechcraft_it.ts"))
        .unwrap();
}

fn translator_for(dir: &Path) -> Translator {
    let settings =
        CatalogSettings { translation_dirs: vec![dir.to_path_buf()], ..CatalogSettings::default() };
    Translator::new(settings, None)
}

#[googletest::test]
fn switches_between_locales() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    let translator = translator_for(dir.path());

    translator.switch_locale("ru_RU").unwrap();
    expect_that!(translator.translate(PLUGIN, "Suspend", None), eq("Ждущий режим"));

    translator.switch_locale("it_IT").unwrap();
    expect_that!(translator.translate(PLUGIN, "Suspend", None), eq("Suspend"));
    expect_that!(translator.translate("FlashPlaceHolder", "Load Flash", None), eq("Carico di Flash"));
    expect_that!(
        translator.translate("StartupFirstPageWidget", "Select ad blocking lists", None),
        eq("Select ad blocking lists")
    );
}

#[googletest::test]
fn malformed_catalog_keeps_previous_active() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    fs::write(dir.path().join("leechcraft_de.ts"), "<TS version=\"2.0\" language=\"de\"><context>")
        .unwrap();
    let translator = translator_for(dir.path());
    translator.switch_locale("ru_RU").unwrap();

    let result = translator.switch_locale("de_DE");

    expect_that!(result.as_ref().is_err_and(CatalogError::is_malformed), eq(true));
    expect_that!(translator.active_locale().map(|l| l.to_string()), some(eq("ru_RU")));
    expect_that!(translator.translate(PLUGIN, "Suspend", None), eq("Ждущий режим"));
}

#[googletest::test]
fn available_locales_are_sorted() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    fs::write(dir.path().join("leechcraft_ru_RU.qm"), b"").unwrap();
    fs::write(dir.path().join("README"), "not a catalog").unwrap();
    let translator = translator_for(dir.path());

    let locales: Vec<String> =
        translator.available_locales().unwrap().iter().map(ToString::to_string).collect();

    expect_that!(locales, elements_are![eq("it"), eq("ru_RU")]);
}

#[googletest::test]
fn every_available_locale_can_be_loaded() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::copy(
        fixture_dir().join("leechcraft_poshuku_cleanweb_it.ts"),
        dir.path().join("nested/leechcraft_it.ts"),
    )
    .unwrap();
    fs::copy(fixture_dir().join("leechcraft_liznoo_ru_RU.ts"), dir.path().join("leechcraft_lmp_ru_RU.ts"))
        .unwrap();
    fs::copy(fixture_dir().join("leechcraft_liznoo_ru_RU.ts"), dir.path().join("leechcraft_ru_RU.ts"))
        .unwrap();
    let translator = translator_for(dir.path());

    let locales = translator.available_locales().unwrap();

    let names: Vec<String> = locales.iter().map(ToString::to_string).collect();
    expect_that!(names, elements_are![eq("ru_RU")]);
    for locale in &locales {
        assert!(translator.load_locale(locale.as_str()).is_ok(), "cannot load {locale}");
    }
}

#[googletest::test]
fn concurrent_readers_see_whole_catalogs() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    let translator = translator_for(dir.path());
    let russian = translator.load_locale("ru_RU").unwrap();
    let italian = translator.load_locale("it").unwrap();
    translator.set_active_catalog(russian.clone());

    thread::scope(|scope| {
        for _ in 0..4 {
            let active = Arc::clone(translator.active());
            scope.spawn(move || {
                for _ in 0..500 {
                    let catalog = active.load();
                    let suspend = catalog.lookup(PLUGIN, "Suspend", None);
                    let add = catalog.lookup("FlashOnClickWhitelist", "Add...", None);
                    // Either both come from ru_RU or both from it
                    let consistent = (suspend == "Ждущий режим" && add == "Add...")
                        || (suspend == "Suspend" && add == "Aggiungi...");
                    assert!(consistent, "mixed lookup: {suspend} / {add}");
                }
            });
        }
        scope.spawn(|| {
            for i in 0..100 {
                let next = if i % 2 == 0 { italian.clone() } else { russian.clone() };
                translator.set_active_catalog(next);
            }
        });
    });

    expect_that!(translator.translate(PLUGIN, "Suspend", None), eq("Ждущий режим"));
}

#[googletest::test]
fn translators_can_share_one_active_catalog() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    let active = Arc::new(ActiveCatalog::default());
    let first = translator_for(dir.path()).with_active(Arc::clone(&active));
    let second = translator_for(dir.path()).with_active(Arc::clone(&active));

    first.switch_locale("ru_RU").unwrap();

    expect_that!(second.translate(PLUGIN, "Hibernate", None), eq("Спящий режим"));
    expect_that!(active.translate(PLUGIN, "Hibernate", None), eq("Спящий режим"));
}

#[googletest::test]
fn config_file_drives_translator() {
    let root = TempDir::new().unwrap();
    let translations = root.path().join("translations");
    fs::create_dir_all(&translations).unwrap();
    prepare_translations(&translations);
    fs::write(root.path().join(ts_catalog::config::CONFIG_FILE_NAME), r#"{"defaultLocale": "it-IT"}"#)
        .unwrap();

    let mut config = ConfigManager::new();
    config.load_settings(Some(root.path().to_path_buf())).unwrap();
    let translator = Translator::from_config(&config);
    translator.initialize().unwrap();

    expect_that!(translator.translation_dirs().to_vec(), elements_are![eq(&translations)]);

    expect_that!(translator.active_locale().map(|l| l.to_string()), some(eq("it_IT")));
    expect_that!(translator.translate("FlashOnClickWhitelist", "Remove", None), eq("Rimuovere"));
}

#[tokio::test]
async fn async_switch_from_many_tasks() {
    let dir = TempDir::new().unwrap();
    prepare_translations(dir.path());
    let translator = translator_for(dir.path());

    let handles: Vec<_> = ["ru_RU", "it", "ru_RU", "it_IT"]
        .into_iter()
        .map(|locale| {
            let translator = translator.clone();
            tokio::spawn(async move { translator.switch_locale_async(locale).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let locale = translator.active_locale().map(|l| l.to_string()).unwrap();
    assert!(locale == "ru_RU" || locale == "it_IT", "unexpected locale {locale}");
}
