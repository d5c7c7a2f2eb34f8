//! 翻訳データの中間表現

use std::fmt;

use crate::ir::key::MessageKey;
use crate::types::SourceLocation;

/// Status carried by the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationStatus {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    /// Source string no longer present in the code.
    Obsolete,
    /// Like `Obsolete`, written by newer `lupdate` versions.
    Vanished,
}

impl TranslationStatus {
    /// Parses the `type` attribute value.
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Attribute value to write, `None` for finished translations.
    #[must_use]
    pub const fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr().unwrap_or("finished"))
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TranslationText {
    Single(String),
    /// One entry per plural form, in the language's numerus order.
    Numerus(Vec<String>),
}

impl Default for TranslationText {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl TranslationText {
    /// True when no form carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// The form at `index`; a single text answers every index.
    #[must_use]
    pub fn form(&self, index: usize) -> Option<&str> {
        match self {
            Self::Single(text) => Some(text.as_str()),
            Self::Numerus(forms) => forms.get(index).map(String::as_str),
        }
    }
}

/// One `<message>` of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationEntry {
    pub key: MessageKey,
    pub translation: TranslationText,
    pub status: TranslationStatus,
    pub locations: Vec<SourceLocation>,
    /// `<extracomment>`: note from the developer.
    pub extra_comment: Option<String>,
    /// `<translatorcomment>`: note from the translator.
    pub translator_comment: Option<String>,
}

impl TranslationEntry {
    #[must_use]
    pub fn new(key: MessageKey, translation: TranslationText, status: TranslationStatus) -> Self {
        Self { key, translation, status, ..Self::default() }
    }

    #[must_use]
    pub const fn is_numerus(&self) -> bool {
        matches!(self.translation, TranslationText::Numerus(_))
    }

    /// Finished and carrying text; only active entries take part in lookup.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TranslationStatus::Finished && !self.translation.is_empty()
    }

    /// The translated text, if the entry is active and form 0 is non-empty.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.numerus_form(0)
    }

    /// The plural form at `index`, if the entry is active and that form is non-empty.
    #[must_use]
    pub fn numerus_form(&self, index: usize) -> Option<&str> {
        if !self.is_active() {
            return None;
        }
        self.translation.form(index).filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn entry(text: &str, status: TranslationStatus) -> TranslationEntry {
        TranslationEntry::new(
            MessageKey::new("LeechCraft::Liznoo::Plugin", "Suspend"),
            TranslationText::Single(text.to_string()),
            status,
        )
    }

    #[rstest]
    #[case::finished("Ждущий режим", TranslationStatus::Finished, Some("Ждущий режим"))]
    #[case::unfinished_empty("", TranslationStatus::Unfinished, None)]
    #[case::unfinished_with_draft("Ждущий", TranslationStatus::Unfinished, None)]
    #[case::finished_but_empty("", TranslationStatus::Finished, None)]
    #[case::obsolete("Ждущий режим", TranslationStatus::Obsolete, None)]
    #[case::vanished("Ждущий режим", TranslationStatus::Vanished, None)]
    fn test_text(
        #[case] text: &str,
        #[case] status: TranslationStatus,
        #[case] expected: Option<&str>,
    ) {
        assert_that!(entry(text, status).text(), eq(expected));
    }

    #[rstest]
    #[case("unfinished", Some(TranslationStatus::Unfinished))]
    #[case("obsolete", Some(TranslationStatus::Obsolete))]
    #[case("vanished", Some(TranslationStatus::Vanished))]
    #[case("finished", None)]
    #[case("", None)]
    fn test_status_from_attr(#[case] value: &str, #[case] expected: Option<TranslationStatus>) {
        assert_that!(TranslationStatus::from_attr(value), eq(expected));
    }

    #[googletest::test]
    fn numerus_form_skips_empty_forms() {
        let entry = TranslationEntry::new(
            MessageKey::new("Ctx", "%n file(s)"),
            TranslationText::Numerus(vec!["%n файл".into(), String::new(), "%n файлов".into()]),
            TranslationStatus::Finished,
        );

        expect_that!(entry.is_numerus(), eq(true));
        expect_that!(entry.numerus_form(0), some(eq("%n файл")));
        expect_that!(entry.numerus_form(1), none());
        expect_that!(entry.numerus_form(2), some(eq("%n файлов")));
        expect_that!(entry.numerus_form(3), none());
    }

    #[googletest::test]
    fn numerus_with_all_forms_empty_is_inactive() {
        let entry = TranslationEntry::new(
            MessageKey::new("Ctx", "%n file(s)"),
            TranslationText::Numerus(vec![String::new(), String::new()]),
            TranslationStatus::Finished,
        );

        expect_that!(entry.is_active(), eq(false));
    }
}
