//! ts-catalog
//!
//! Qt Linguist `.ts` 翻訳カタログ: ロケールごとのカタログを読み込み、
//! 翻訳が無い場合はソース文字列にフォールバックする。
//! 使用中のカタログはアトミックに切り替えられる。

pub mod catalog;
pub mod config;
pub mod input;
pub mod ir;
pub mod plural;
pub mod translator;
pub mod types;

mod test_utils;

pub use catalog::{
    ActiveCatalog,
    Catalog,
    CatalogError,
    CatalogStats,
};
pub use config::{
    CatalogSettings,
    ConfigError,
    ConfigManager,
};
pub use ir::key::MessageKey;
pub use ir::translation::{
    TranslationEntry,
    TranslationStatus,
    TranslationText,
};
pub use plural::PluralRule;
pub use translator::Translator;
pub use types::{
    LocaleError,
    LocaleTag,
    SourceLocation,
};
