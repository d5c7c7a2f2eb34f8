//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::path::PathBuf;

/// `lupdate` 形式の `.ts` ドキュメントを作成する
///
/// # Arguments
/// * `language` - `TS` 要素の `language` 属性（例: "ru_RU", "it"）
/// * `body` - `<context>` 要素の並び
pub(crate) fn ts_document(language: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS version=\"2.0\" language=\"{language}\">\n{body}\n</TS>\n"
    )
}

/// テスト用の翻訳ファイルが置かれたディレクトリ
pub(crate) fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/translations")
}

/// テストのログ出力を有効化する（複数回呼び出しても安全）
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
}
