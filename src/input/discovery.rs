//! Locates `.ts` catalog files on disk.
//!
//! Files are named `{prefix}_{locale}.ts` (e.g. `leechcraft_liznoo_ru_RU.ts`)
//! and live in one of the configured translation directories.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobMatcher,
};
use ignore::WalkBuilder;

use crate::catalog::CatalogError;
use crate::types::LocaleTag;

/// Catalog file extension written by `lupdate`.
const CATALOG_EXTENSION: &str = "ts";

/// A catalog file found on disk together with the locale its name encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub locale: LocaleTag,
}

/// File name of the catalog for `locale`.
#[must_use]
pub fn catalog_file_name(prefix: &str, locale: &LocaleTag) -> String {
    format!("{prefix}_{locale}.{CATALOG_EXTENSION}")
}

/// Locale encoded in a catalog file name, if it follows `{prefix}_{locale}.ts`.
///
/// Only names that [`catalog_file_name`] would produce for the parsed tag
/// are accepted, so every locale found here also resolves.
#[must_use]
pub fn locale_from_file_name(prefix: &str, file_name: &str) -> Option<LocaleTag> {
    let stem = file_name.strip_suffix(CATALOG_EXTENSION)?.strip_suffix('.')?;
    let tag = stem.strip_prefix(prefix)?.strip_prefix('_')?;
    let locale = LocaleTag::parse(tag).ok()?;
    (catalog_file_name(prefix, &locale) == file_name).then_some(locale)
}

/// Resolves the catalog file for `locale`.
///
/// Every directory is searched in order; within a directory the full tag is
/// tried first, then progressively shorter tags when `language_fallback` is
/// set (`ru_RU` then `ru`).
///
/// # Errors
/// Returns [`CatalogError::NotFound`] listing every path tried.
pub fn resolve_catalog_file(
    dirs: &[PathBuf],
    prefix: &str,
    locale: &LocaleTag,
    language_fallback: bool,
) -> Result<CatalogFile, CatalogError> {
    let candidates = if language_fallback { locale.fallback_chain() } else { vec![locale.clone()] };

    let mut searched = Vec::new();
    for dir in dirs {
        for candidate in &candidates {
            let path = dir.join(catalog_file_name(prefix, candidate));
            if path.is_file() {
                tracing::debug!(path = %path.display(), requested = %locale, "Resolved catalog file");
                return Ok(CatalogFile { path, locale: candidate.clone() });
            }
            searched.push(path);
        }
    }

    Err(CatalogError::NotFound { locale: locale.to_string(), searched })
}

/// Finds every catalog file for `prefix` under `dirs`.
///
/// Only files directly inside each directory are considered, the same places
/// [`resolve_catalog_file`] looks. `file_pattern` is matched against the file
/// name. Missing directories are skipped. The result is sorted by path.
///
/// # Errors
/// Returns [`CatalogError::Discovery`] if `file_pattern` is not a valid glob.
pub fn find_catalog_files(
    dirs: &[PathBuf],
    prefix: &str,
    file_pattern: &str,
) -> Result<Vec<CatalogFile>, CatalogError> {
    let matcher = compile_pattern(file_pattern)?;

    let mut found = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "Translation directory does not exist");
            continue;
        }
        found.extend(scan_directory(dir, prefix, &matcher));
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, CatalogError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| CatalogError::Discovery(format!("Invalid file pattern '{pattern}': {e}")))
}

fn scan_directory(dir: &Path, prefix: &str, matcher: &GlobMatcher) -> Vec<CatalogFile> {
    let mut found = Vec::new();

    // Catalogs are often generated and git-ignored, so ignore files are not honored
    let walker =
        WalkBuilder::new(dir).max_depth(Some(1)).hidden(false).ignore(false).git_ignore(false).build();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !matcher.is_match(file_name) {
            continue;
        }

        let Some(locale) = locale_from_file_name(prefix, file_name) else {
            tracing::debug!(path = %path.display(), "Skipping file without a catalog name");
            continue;
        };

        found.push(CatalogFile { path: path.to_path_buf(), locale });
    }

    found
}
