//! Host-facing facade: loads catalogs for a locale and serves lookups
//! through the active catalog.

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use crate::catalog::{
    ActiveCatalog,
    Catalog,
    CatalogError,
};
use crate::config::{
    CatalogSettings,
    ConfigManager,
};
use crate::input::discovery;
use crate::types::LocaleTag;

/// Loads catalogs from the configured translation directories and switches
/// the active one.
///
/// Clones share the same [`ActiveCatalog`], so a switch through one clone is
/// seen by all of them.
#[derive(Debug, Clone)]
pub struct Translator {
    settings: CatalogSettings,
    /// Translation directories, already resolved against the root
    dirs: Vec<PathBuf>,
    active: Arc<ActiveCatalog>,
}

impl Translator {
    /// Creates a translator that starts with the empty catalog.
    ///
    /// Relative translation directories are resolved against `root`.
    #[must_use]
    pub fn new(settings: CatalogSettings, root: Option<&Path>) -> Self {
        let dirs = settings.resolved_dirs(root);
        Self { settings, dirs, active: Arc::new(ActiveCatalog::default()) }
    }

    /// Creates a translator from a snapshot of the loaded configuration.
    ///
    /// Later reloads of `config` do not affect it.
    #[must_use]
    pub fn from_config(config: &ConfigManager) -> Self {
        Self {
            settings: config.get_settings().clone(),
            dirs: config.translation_dirs(),
            active: Arc::new(ActiveCatalog::default()),
        }
    }

    /// Shares `active` instead of owning a fresh one.
    #[must_use]
    pub fn with_active(mut self, active: Arc<ActiveCatalog>) -> Self {
        self.active = active;
        self
    }

    /// Activates the configured default locale, if any.
    ///
    /// # Errors
    /// Same as [`Translator::switch_locale`].
    pub fn initialize(&self) -> Result<(), CatalogError> {
        match &self.settings.default_locale {
            Some(locale) => self.switch_locale(locale),
            None => {
                tracing::debug!("No default locale configured");
                Ok(())
            }
        }
    }

    /// Resolves and parses the catalog for `locale` without activating it.
    ///
    /// # Errors
    /// - [`CatalogError::InvalidLocale`] if `locale` is not a locale tag
    /// - [`CatalogError::NotFound`] if no catalog file exists
    /// - [`CatalogError::Io`] / [`CatalogError::Malformed`] if the file cannot be loaded
    pub fn load_locale(&self, locale: &str) -> Result<Catalog, CatalogError> {
        let requested = LocaleTag::parse(locale)?;
        let file = discovery::resolve_catalog_file(
            &self.dirs,
            &self.settings.file_prefix,
            &requested,
            self.settings.language_fallback,
        )?;
        Ok(Catalog::from_path(&file.path)?.assume_locale(&requested))
    }

    /// Makes `catalog` the active one.
    pub fn set_active_catalog(&self, catalog: Catalog) {
        let locale = catalog.locale().map(ToString::to_string);
        let previous = self.active.store(catalog);
        tracing::info!(
            from = ?previous.locale().map(LocaleTag::as_str),
            to = ?locale,
            "Switched active catalog"
        );
    }

    /// Loads the catalog for `locale` and activates it.
    ///
    /// On error the previously active catalog stays in place.
    ///
    /// # Errors
    /// Same as [`Translator::load_locale`].
    pub fn switch_locale(&self, locale: &str) -> Result<(), CatalogError> {
        match self.load_locale(locale) {
            Ok(catalog) => {
                self.set_active_catalog(catalog);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%locale, error = %e, "Failed to switch locale, keeping the active catalog");
                Err(e)
            }
        }
    }

    /// [`Translator::switch_locale`] with the file read on the blocking pool.
    ///
    /// # Errors
    /// Same as [`Translator::load_locale`], plus [`CatalogError::LoadTask`]
    /// if the load task panics.
    pub async fn switch_locale_async(&self, locale: &str) -> Result<(), CatalogError> {
        let this = self.clone();
        let owned = locale.to_string();
        let loaded = tokio::task::spawn_blocking(move || this.load_locale(&owned)).await?;

        match loaded {
            Ok(catalog) => {
                self.set_active_catalog(catalog);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%locale, error = %e, "Failed to switch locale, keeping the active catalog");
                Err(e)
            }
        }
    }

    /// Translation of `source` in the active catalog, or `source` itself.
    #[must_use]
    pub fn translate(&self, context: &str, source: &str, disambiguation: Option<&str>) -> String {
        self.active.translate(context, source, disambiguation)
    }

    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: i64,
    ) -> String {
        self.active.translate_plural(context, source, disambiguation, count)
    }

    /// Locale of the active catalog; `None` before the first successful switch.
    #[must_use]
    pub fn active_locale(&self) -> Option<LocaleTag> {
        self.active.locale()
    }

    /// Locales with a catalog file in the translation directories, sorted and deduplicated.
    ///
    /// # Errors
    /// Returns [`CatalogError::Discovery`] if the file pattern is invalid.
    pub fn available_locales(&self) -> Result<Vec<LocaleTag>, CatalogError> {
        let files = discovery::find_catalog_files(
            &self.dirs,
            &self.settings.file_prefix,
            &self.settings.file_pattern,
        )?;
        let mut locales: Vec<LocaleTag> = files.into_iter().map(|file| file.locale).collect();
        locales.sort();
        locales.dedup();
        Ok(locales)
    }

    #[must_use]
    pub const fn active(&self) -> &Arc<ActiveCatalog> {
        &self.active
    }

    #[must_use]
    pub const fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    #[must_use]
    pub fn translation_dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::{
        fixture_dir,
        init_tracing,
        ts_document,
    };

    fn translator(prefix: &str) -> Translator {
        let settings = CatalogSettings {
            translation_dirs: vec![fixture_dir()],
            file_prefix: prefix.to_string(),
            ..CatalogSettings::default()
        };
        Translator::new(settings, None)
    }

    #[fixture]
    fn liznoo() -> Translator {
        init_tracing();
        translator("leechcraft_liznoo")
    }

    #[fixture]
    fn cleanweb() -> Translator {
        init_tracing();
        translator("leechcraft_poshuku_cleanweb")
    }

    #[rstest]
    fn translates_after_switch(liznoo: Translator) {
        assert_that!(liznoo.translate("LeechCraft::Liznoo::Plugin", "Suspend", None), eq("Suspend"));

        liznoo.switch_locale("ru_RU").unwrap();

        assert_that!(
            liznoo.translate("LeechCraft::Liznoo::Plugin", "Suspend", None),
            eq("Ждущий режим")
        );
        assert_that!(liznoo.active_locale().map(|l| l.to_string()), some(eq("ru_RU")));
    }

    #[rstest]
    fn hyphenated_locale_is_accepted(liznoo: Translator) {
        liznoo.switch_locale("ru-RU").unwrap();

        assert_that!(liznoo.translate("liznoosettings", "General", None), eq("Общее"));
    }

    #[rstest]
    fn region_falls_back_to_language_file(cleanweb: Translator) {
        cleanweb.switch_locale("it_IT").unwrap();

        assert_that!(
            cleanweb.translate("StartupFirstPageWidget", "Select ad blocking lists", None),
            eq("Select ad blocking lists")
        );
        assert_that!(
            cleanweb.translate("LeechCraft::Poshuku::CleanWeb::Core", "Name", None),
            eq("Nome")
        );
        // The document declares it_IT
        assert_that!(cleanweb.active_locale().map(|l| l.to_string()), some(eq("it_IT")));
    }

    #[rstest]
    fn missing_locale_keeps_active_catalog(liznoo: Translator) {
        liznoo.switch_locale("ru_RU").unwrap();

        let result = liznoo.switch_locale("de_DE");

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
        assert_that!(liznoo.active_locale().map(|l| l.to_string()), some(eq("ru_RU")));
        assert_that!(liznoo.translate("LeechCraft::Liznoo::Plugin", "Battery", None), eq("Батарея"));
    }

    #[rstest]
    fn invalid_locale_is_rejected(liznoo: Translator) {
        let result = liznoo.load_locale("not a locale");

        assert!(matches!(result, Err(CatalogError::InvalidLocale(_))));
    }

    #[rstest]
    fn clones_share_the_active_catalog(liznoo: Translator) {
        let clone = liznoo.clone();

        clone.switch_locale("ru_RU").unwrap();

        assert_that!(liznoo.active_locale().map(|l| l.to_string()), some(eq("ru_RU")));
    }

    #[rstest]
    fn set_active_catalog_accepts_any_catalog(liznoo: Translator) {
        let catalog = Catalog::parse(&ts_document(
            "pl",
            "<context><name>Ctx</name><message numerus=\"yes\"><source>%n file(s)</source><translation><numerusform>%n plik</numerusform><numerusform>%n pliki</numerusform><numerusform>%n plików</numerusform></translation></message></context>",
        ))
        .unwrap();

        liznoo.set_active_catalog(catalog);

        assert_that!(liznoo.translate_plural("Ctx", "%n file(s)", None, 1), eq("%n plik"));
        assert_that!(liznoo.translate_plural("Ctx", "%n file(s)", None, 3), eq("%n pliki"));
        assert_that!(liznoo.translate_plural("Ctx", "%n file(s)", None, 5), eq("%n plików"));
    }

    #[rstest]
    fn initialize_uses_default_locale() {
        let settings = CatalogSettings {
            translation_dirs: vec![fixture_dir()],
            file_prefix: "leechcraft_liznoo".to_string(),
            default_locale: Some("ru".to_string()),
            ..CatalogSettings::default()
        };
        let translator = Translator::new(settings, None);

        // ru has no file of its own; a language tag never widens to a region
        let result = translator.initialize();

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
        assert_that!(translator.active_locale(), none());
    }

    #[rstest]
    fn initialize_without_default_locale_is_a_no_op(liznoo: Translator) {
        liznoo.initialize().unwrap();

        assert_that!(liznoo.active_locale(), none());
    }

    #[rstest]
    fn from_config_resolves_relative_dirs() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("share/translations")).unwrap();
        fs::copy(
            fixture_dir().join("leechcraft_liznoo_ru_RU.ts"),
            root.path().join("share/translations/leechcraft_liznoo_ru_RU.ts"),
        )
        .unwrap();
        fs::write(
            root.path().join(".ts-catalog.json"),
            r#"{"translationDirs": ["share/translations"], "filePrefix": "leechcraft_liznoo", "defaultLocale": "ru_RU"}"#,
        )
        .unwrap();

        let mut config = ConfigManager::new();
        config.load_settings(Some(root.path().to_path_buf())).unwrap();
        let translator = Translator::from_config(&config);
        translator.initialize().unwrap();

        assert_that!(translator.translate("LeechCraft::Liznoo::Plugin", "Hibernate", None), eq("Спящий режим"));
    }

    #[rstest]
    fn available_locales_lists_matching_files(liznoo: Translator, cleanweb: Translator) {
        let liznoo_locales: Vec<String> =
            liznoo.available_locales().unwrap().iter().map(ToString::to_string).collect();
        let cleanweb_locales: Vec<String> =
            cleanweb.available_locales().unwrap().iter().map(ToString::to_string).collect();

        assert_that!(liznoo_locales, elements_are![eq("ru_RU")]);
        assert_that!(cleanweb_locales, elements_are![eq("it")]);
    }

    #[tokio::test]
    async fn switch_locale_async_loads_off_thread() {
        let translator = translator("leechcraft_liznoo");

        translator.switch_locale_async("ru_RU").await.unwrap();

        assert_eq!(translator.translate("LeechCraft::Liznoo::Plugin", "Suspend", None), "Ждущий режим");
    }

    #[tokio::test]
    async fn switch_locale_async_keeps_catalog_on_error() {
        let translator = translator("leechcraft_liznoo");
        translator.switch_locale_async("ru_RU").await.unwrap();

        let result = translator.switch_locale_async("fr").await;

        assert!(result.is_err());
        assert_eq!(translator.active_locale().map(|l| l.to_string()).as_deref(), Some("ru_RU"));
    }
}
