//! Immutable, locale-scoped translation catalog.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::catalog::error::CatalogError;
use crate::input::document::{
    ContextBlock,
    TsDocument,
};
use crate::ir::translation::{
    TranslationEntry,
    TranslationStatus,
};
use crate::plural::PluralRule;
use crate::types::LocaleTag;

/// context -> source text -> entry indices (one per disambiguation)
type KeyIndex = HashMap<String, HashMap<String, Vec<usize>>>;

/// Translations for one locale.
///
/// Built once and never mutated; lookups never fail and fall back to the
/// source text when no active translation exists. [`Catalog::empty`] is the
/// unloaded state in which every lookup falls back.
#[derive(Clone, Default)]
pub struct Catalog {
    /// Built from a document; a document without a `language` still counts
    loaded: bool,
    locale: Option<LocaleTag>,
    plural_rule: Option<PluralRule>,
    version: Option<String>,
    source_language: Option<String>,
    /// Unique by key, in document order
    entries: Vec<TranslationEntry>,
    index: KeyIndex,
}

/// Entry counts by status, in the manner of the `lrelease` summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    /// Finished with non-empty text.
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete or vanished.
    pub obsolete: usize,
    /// Finished, but the translation is empty.
    pub untranslated: usize,
}

impl CatalogStats {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.finished + self.unfinished + self.obsolete + self.untranslated
    }
}

impl Catalog {
    /// The unloaded catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a catalog from `.ts` text.
    ///
    /// # Errors
    /// Returns [`CatalogError::Malformed`] if the document is not a valid `.ts` file.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let document = TsDocument::parse(text).map_err(|e| CatalogError::malformed(None, e))?;
        Ok(Self::from_document(document))
    }

    /// # Errors
    /// Returns [`CatalogError::Malformed`] if the input is not a valid `.ts` file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document =
            TsDocument::from_reader(reader).map_err(|e| CatalogError::malformed(None, e))?;
        Ok(Self::from_document(document))
    }

    /// Reads and parses a `.ts` file.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Malformed`] if it is not a valid `.ts` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading catalog");

        let bytes = std::fs::read(path)?;
        let document = TsDocument::from_reader(bytes.as_slice())
            .map_err(|e| CatalogError::malformed(Some(path.to_path_buf()), e))?;
        let catalog = Self::from_document(document);

        tracing::debug!(
            path = %path.display(),
            locale = ?catalog.locale.as_ref().map(LocaleTag::as_str),
            entries = catalog.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Builds a catalog from a parsed document.
    ///
    /// Repeated keys keep the first message; locations of later ones are merged into it.
    #[must_use]
    pub fn from_document(document: TsDocument) -> Self {
        let locale = document.language.as_deref().and_then(|language| {
            LocaleTag::parse(language)
                .inspect_err(|e| tracing::warn!(%e, "Ignoring catalog language"))
                .ok()
        });

        let mut catalog = Self {
            loaded: true,
            plural_rule: locale.as_ref().map(PluralRule::for_locale),
            locale,
            version: document.version,
            source_language: document.source_language,
            entries: Vec::new(),
            index: KeyIndex::new(),
        };
        for entry in document.contexts.into_iter().flat_map(|context| context.entries) {
            catalog.insert(entry);
        }
        catalog
    }

    fn insert(&mut self, entry: TranslationEntry) {
        let slots = self
            .index
            .entry(entry.key.context.clone())
            .or_default()
            .entry(entry.key.source.clone())
            .or_default();

        let existing = slots.iter().copied().find(|&i| {
            self.entries.get(i).is_some_and(|e| e.key.disambiguation == entry.key.disambiguation)
        });
        if let Some(first) = existing.and_then(|i| self.entries.get_mut(i)) {
            tracing::warn!(key = %entry.key, "Duplicate message in catalog, keeping the first");
            first.locations.extend(entry.locations);
            return;
        }

        slots.push(self.entries.len());
        self.entries.push(entry);
    }

    /// Uses `requested` as the locale when the document does not declare one.
    ///
    /// A declared language always wins; a different language is only logged.
    #[must_use]
    pub fn assume_locale(mut self, requested: &LocaleTag) -> Self {
        match &self.locale {
            None => {
                self.plural_rule = Some(PluralRule::for_locale(requested));
                self.locale = Some(requested.clone());
            }
            Some(declared) if declared.language() != requested.language() => {
                tracing::warn!(
                    declared = %declared,
                    requested = %requested,
                    "Catalog language differs from the requested locale"
                );
            }
            Some(_) => {}
        }
        self
    }

    /// The entry stored under the exact key, whatever its status.
    #[must_use]
    pub fn find(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&TranslationEntry> {
        self.candidates(context, source).find(|e| e.key.matches(context, source, disambiguation))
    }

    fn candidates<'a>(
        &'a self,
        context: &str,
        source: &str,
    ) -> impl Iterator<Item = &'a TranslationEntry> + 'a {
        self.index
            .get(context)
            .and_then(|sources| sources.get(source))
            .into_iter()
            .flatten()
            .filter_map(|&i| self.entries.get(i))
    }

    /// The active entry for a key.
    ///
    /// An exact match wins; with a disambiguation and no exact match, the
    /// entry without disambiguation is used.
    fn find_active(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&TranslationEntry> {
        let exact = self.find(context, source, disambiguation).filter(|e| e.is_active());
        match disambiguation.filter(|d| !d.is_empty()) {
            Some(_) if exact.is_none() => {
                self.find(context, source, None).filter(|e| e.is_active())
            }
            _ => exact,
        }
    }

    /// Translation of `source`, or `source` itself when none is usable.
    #[must_use]
    pub fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        self.find_active(context, source, disambiguation)
            .and_then(TranslationEntry::text)
            .unwrap_or(source)
    }

    /// Plural-aware lookup: picks the numerus form for `count`.
    #[must_use]
    pub fn lookup_plural<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
        count: i64,
    ) -> &'a str {
        let form = self.plural_rule().form_index(count);
        self.find_active(context, source, disambiguation)
            .and_then(|entry| entry.numerus_form(form))
            .unwrap_or(source)
    }

    #[must_use]
    pub const fn locale(&self) -> Option<&LocaleTag> {
        self.locale.as_ref()
    }

    /// Whether this catalog came from a document rather than [`Catalog::empty`].
    ///
    /// Independent of [`Catalog::locale`]: a parsed document without a
    /// `language` attribute is loaded but has no locale yet.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Plural rule of the catalog language; English when the language is unknown.
    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.plural_rule.unwrap_or(PluralRule::English)
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Number of distinct messages, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter()
    }

    /// Context names in order of first appearance.
    #[must_use]
    pub fn contexts(&self) -> Vec<&str> {
        let mut contexts: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !contexts.contains(&entry.key.context.as_str()) {
                contexts.push(&entry.key.context);
            }
        }
        contexts
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in &self.entries {
            match entry.status {
                TranslationStatus::Finished if entry.translation.is_empty() => {
                    stats.untranslated += 1;
                }
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => stats.obsolete += 1,
            }
        }
        stats
    }

    /// Converts back to a document, grouping messages by context.
    #[must_use]
    pub fn to_document(&self) -> TsDocument {
        let mut contexts: Vec<ContextBlock> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for entry in &self.entries {
            let position = *positions.entry(entry.key.context.as_str()).or_insert_with(|| {
                contexts.push(ContextBlock { name: entry.key.context.clone(), entries: Vec::new() });
                contexts.len() - 1
            });
            if let Some(block) = contexts.get_mut(position) {
                block.entries.push(entry.clone());
            }
        }

        TsDocument {
            version: self.version.clone(),
            language: self.locale.as_ref().map(ToString::to_string),
            source_language: self.source_language.clone(),
            contexts,
        }
    }
}

/// Content equality: same locale and the same entries, in any order.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
            && self.entries.len() == other.entries.len()
            && self.entries.iter().all(|entry| {
                other.find(&entry.key.context, &entry.key.source, entry.key.disambiguation())
                    == Some(entry)
            })
    }
}

impl Eq for Catalog {}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("locale", &self.locale)
            .field("version", &self.version)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}
