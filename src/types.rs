//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a locale tag cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid locale tag '{tag}': {reason}")]
pub struct LocaleError {
    pub tag: String,
    pub reason: &'static str,
}

/// A normalized locale tag such as `ru_RU`, `it` or `sr_Latn_RS`.
///
/// Both `_` and `-` separators are accepted on input; the canonical form
/// always uses `_`, a lowercase language, a title-case script and an
/// uppercase region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleTag(String);

impl LocaleTag {
    /// Parses and normalizes a locale tag.
    ///
    /// # Errors
    /// Returns [`LocaleError`] if the language subtag is not 2-3 ASCII letters
    /// or any other subtag contains non-alphanumeric characters.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let invalid = |reason| LocaleError { tag: tag.to_string(), reason };

        let mut parts = tag.trim().split(['_', '-']);
        let language = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| invalid("empty tag"))?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid("language must be 2-3 ASCII letters"));
        }

        let mut normalized = language.to_ascii_lowercase();
        for part in parts {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid("subtags must be non-empty and alphanumeric"));
            }
            normalized.push('_');
            match part.len() {
                // Script subtag (e.g. `Latn`)
                4 => {
                    let mut chars = part.chars();
                    if let Some(first) = chars.next() {
                        normalized.push(first.to_ascii_uppercase());
                    }
                    normalized.extend(chars.map(|c| c.to_ascii_lowercase()));
                }
                _ => normalized.push_str(&part.to_ascii_uppercase()),
            }
        }

        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag alone, e.g. `ru` for `ru_RU`.
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Progressively shorter tags to try when resolving a catalog file.
    ///
    /// `sr_Latn_RS` yields `sr_Latn_RS`, `sr_Latn`, `sr`.
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<Self> {
        let mut chain = vec![self.clone()];
        let mut current = self.0.as_str();
        while let Some((head, _)) = current.rsplit_once('_') {
            chain.push(Self(head.to_string()));
            current = head;
        }
        chain
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleTag {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a message is used in the application sources.
///
/// Purely diagnostic: locations are never part of a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub filename: Option<String>,
    pub line: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: Some(filename.into()), line: Some(line) }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => f.write_str(file),
            (None, Some(line)) => write!(f, "<unknown>:{line}"),
            (None, None) => f.write_str("<unknown>"),
        }
    }
}
