//! Ports - 抽象化レイヤー
//!
//! エンジンが外部に依存する箇所を trait として定義します。
//! 実装は `impls` にあり、テストでは InMemoryStore / FixedClock を差し込みます。
//!
//! - KeyValueStore: 判定結果と設定の保存先
//! - Clock: エクスポートのタイムスタンプ
//! - Collator: ロケールを考慮した大文字小文字の畳み込みと比較
//! - CsvSource: name_list.csv のバイト列の取得

pub mod kv_store;
pub mod clock;
pub mod collation;
pub mod source;

pub use self::kv_store::{KeyValueStore, StorageError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::collation::Collator;
pub use self::source::CsvSource;
