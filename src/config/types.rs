use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::LocaleTag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationDirs[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Where catalogs live and how their files are named.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Directories searched in order. Relative paths are resolved against the root.
    pub translation_dirs: Vec<PathBuf>,

    /// File name prefix before the locale: `{filePrefix}_{locale}.ts`.
    pub file_prefix: String,

    /// Glob matched against file names directly inside each translation directory
    /// during discovery.
    pub file_pattern: String,

    /// Locale activated by `Translator::initialize`.
    /// If unset, the translator starts with the empty catalog.
    pub default_locale: Option<String>,

    /// Try `{filePrefix}_{language}.ts` when `{filePrefix}_{language}_{COUNTRY}.ts` is missing.
    pub language_fallback: bool,
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid file prefix or locale tag
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_dirs.is_empty() {
            errors.push(ValidationError::new(
                "translationDirs",
                "At least one directory is required. Example: [\"translations\"]",
            ));
        }

        for (index, dir) in self.translation_dirs.iter().enumerate() {
            if dir.as_os_str().is_empty() {
                errors.push(ValidationError::new(
                    format!("translationDirs[{index}]"),
                    "The directory cannot be empty. Use \".\" for the root directory",
                ));
            }
        }

        if self.file_prefix.is_empty() {
            errors.push(ValidationError::new(
                "filePrefix",
                "The prefix cannot be empty. Example: \"leechcraft\"",
            ));
        } else if self.file_prefix.contains(['/', '\\']) {
            errors.push(ValidationError::new(
                "filePrefix",
                format!(
                    "The prefix '{}' cannot contain a path separator. Add the directory to 'translationDirs' instead",
                    self.file_prefix
                ),
            ));
        }

        if self.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "filePattern",
                "The pattern cannot be empty. Example: \"*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.file_pattern) {
            errors.push(ValidationError::new(
                "filePattern",
                format!("Invalid glob pattern '{}': {e}", self.file_pattern),
            ));
        }

        if let Some(locale) = &self.default_locale
            && let Err(e) = LocaleTag::parse(locale)
        {
            errors.push(ValidationError::new("defaultLocale", e.to_string()));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Translation directories with relative entries joined onto `root`.
    #[must_use]
    pub fn resolved_dirs(&self, root: Option<&Path>) -> Vec<PathBuf> {
        self.translation_dirs
            .iter()
            .map(|dir| match root {
                Some(root) if dir.is_relative() => root.join(dir),
                _ => dir.clone(),
            })
            .collect()
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translation_dirs: vec![PathBuf::from("translations")],
            file_prefix: "leechcraft".to_string(),
            file_pattern: "*.ts".to_string(),
            default_locale: None,
            language_fallback: true,
        }
    }
}
