//! kazper-core
//!
//! Decision-deck engine for triaging candidate names into "keep" and
//! "reject" buckets.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（entity, catalog, bucket, prefs, state, errors）
//! - **ingest**: CSV の取り込み（tokenizer, encoding, loader）
//! - **deck**: フィルタ・重複排除・シャッフル・判定のステートマシン
//! - **persist**: 判定結果と設定の永続化（codec, repository）
//! - **export**: CSV / JSON スナップショット
//! - **ports**: 抽象化レイヤー（KeyValueStore, Clock, Collator, CsvSource）
//! - **impls**: ports の実装（InMemoryStore, JsonFileStore, CyrillicCollator, ...）
//! - **app**: view 層向けのコマンド面（PickerSession, snapshot, config）

pub mod domain;
pub mod ingest;
pub mod deck;
pub mod persist;
pub mod export;
pub mod ports;
pub mod impls;
pub mod app;

pub use app::{PickerConfig, PickerSession, SessionBuilder, SessionSnapshot};
pub use domain::{Bucket, EntityId, Gender, GenderMode, Locale, NameEntity, Preferences};
