//! Numerus form selection for plural messages.
//!
//! Qt Linguist stores one `<numerusform>` per plural category of the target
//! language, in a fixed per-language order. [`PluralRule::form_index`] maps a
//! count to the index of the form to use.

use crate::types::LocaleTag;

/// Plural rule families, named after a representative language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// Single form (Chinese, Japanese, Korean, Turkish, ...).
    Invariant,
    /// `n == 1` / other (English, German, Italian, ...).
    English,
    /// `n <= 1` / other (French, Brazilian Portuguese).
    French,
    /// one / few / many by last digits (Russian, Ukrainian, Belarusian, ...).
    Russian,
    /// one / few / many, where only `n == 1` is singular.
    Polish,
    /// one / few (2..=4) / other (Czech, Slovak).
    Czech,
    /// zero / one / two / few / many / other.
    Arabic,
}

impl PluralRule {
    /// Picks the rule for a locale by its language subtag.
    ///
    /// Unknown languages use [`PluralRule::English`].
    #[must_use]
    pub fn for_locale(locale: &LocaleTag) -> Self {
        Self::for_language(locale.language())
    }

    #[must_use]
    pub fn for_language(language: &str) -> Self {
        match language {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "ka" | "lo" | "my" => {
                Self::Invariant
            }
            "fr" | "pt" | "oc" | "tl" | "ln" => Self::French,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::Russian,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::Czech,
            "ar" => Self::Arabic,
            _ => Self::English,
        }
    }

    /// How many `<numerusform>` elements a complete translation carries.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Invariant => 1,
            Self::English | Self::French => 2,
            Self::Russian | Self::Polish | Self::Czech => 3,
            Self::Arabic => 6,
        }
    }

    /// Index of the numerus form to use for `count`.
    ///
    /// Negative counts are treated by absolute value.
    #[must_use]
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let (rem10, rem100) = (n % 10, n % 100);
        match self {
            Self::Invariant => 0,
            Self::English => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::French => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::Russian => {
                if rem10 == 1 && rem100 != 11 {
                    0
                } else if rem10 >= 2 && rem10 <= 4 && !(rem100 >= 12 && rem100 <= 14) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if rem10 >= 2 && rem10 <= 4 && !(rem100 >= 12 && rem100 <= 14) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if rem100 >= 3 && rem100 <= 10 => 3,
                _ if rem100 >= 11 => 4,
                _ => 5,
            },
        }
    }
}
