use std::path::PathBuf;

use thiserror::Error;

use crate::input::document::DocumentError;
use crate::types::LocaleError;

/// Errors that may occur while loading a catalog.
///
/// Missing or unfinished translations are not errors: lookups fall back to
/// the source text instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document violates the `.ts` structure
    #[error("Malformed catalog {}: {source}", display_path(path.as_ref()))]
    Malformed {
        path: Option<PathBuf>,
        #[source]
        source: DocumentError,
    },

    /// No catalog file exists for the requested locale
    #[error("No catalog found for locale '{locale}' (searched: {})", format_searched(searched))]
    NotFound { locale: String, searched: Vec<PathBuf> },

    #[error(transparent)]
    InvalidLocale(#[from] LocaleError),

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file discovery failed (e.g. an invalid glob pattern)
    #[error("Catalog discovery failed: {0}")]
    Discovery(String),

    /// The background load task panicked or was cancelled
    #[error("Catalog load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),
}

impl CatalogError {
    #[must_use]
    pub(crate) const fn malformed(path: Option<PathBuf>, source: DocumentError) -> Self {
        Self::Malformed { path, source }
    }

    /// Whether this is a structural error in the catalog document itself.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "<memory>".to_string(), |p| format!("'{}'", p.display()))
}

fn format_searched(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no translation directories".to_string();
    }
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
