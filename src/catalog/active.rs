//! Atomically swappable reference to the catalog in use.

use std::fmt;
use std::sync::Arc;

use arc_swap::{
    ArcSwap,
    Guard,
};

use crate::catalog::store::Catalog;
use crate::types::LocaleTag;

/// The catalog lookups currently go through.
///
/// Reads are wait-free and always observe one complete catalog: a swap
/// replaces the whole mapping at once, so a reader sees either the previous
/// catalog or the new one.
pub struct ActiveCatalog {
    inner: ArcSwap<Catalog>,
}

impl ActiveCatalog {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { inner: ArcSwap::from_pointee(catalog) }
    }

    /// Short-lived read access; hold the guard only for the duration of a lookup.
    #[must_use]
    pub fn load(&self) -> Guard<Arc<Catalog>> {
        self.inner.load()
    }

    /// An owned reference that stays valid across later swaps.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.inner.load_full()
    }

    /// Makes `catalog` active and returns the one it replaced.
    pub fn store(&self, catalog: Catalog) -> Arc<Catalog> {
        self.inner.swap(Arc::new(catalog))
    }

    /// Drops back to the empty catalog.
    pub fn clear(&self) -> Arc<Catalog> {
        self.store(Catalog::empty())
    }

    #[must_use]
    pub fn locale(&self) -> Option<LocaleTag> {
        self.inner.load().locale().cloned()
    }

    #[must_use]
    pub fn translate(&self, context: &str, source: &str, disambiguation: Option<&str>) -> String {
        self.inner.load().lookup(context, source, disambiguation).to_string()
    }

    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: i64,
    ) -> String {
        self.inner.load().lookup_plural(context, source, disambiguation, count).to_string()
    }
}

impl Default for ActiveCatalog {
    fn default() -> Self {
        Self::new(Catalog::empty())
    }
}

impl fmt::Debug for ActiveCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.inner.load();
        f.debug_struct("ActiveCatalog")
            .field("locale", &catalog.locale().map(LocaleTag::as_str))
            .field("entries", &catalog.len())
            .finish()
    }
}
