//! App - アプリケーション層
//!
//! このモジュールは、ports と deck を組み合わせて view 層向けのコマンド面を提供します。
//!
//! # 主要コンポーネント
//! - **SessionBuilder**: ports のワイヤリング
//! - **PickerSession**: load / judge / undo / transfer / export などのコマンド
//! - **SessionSnapshot**: 描画用の読み取り専用ビュー
//! - **PickerConfig**: 設定ファイル

pub mod builder;
pub mod config;
pub mod session;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::SessionBuilder;
pub use self::config::{ConfigError, PickerConfig};
pub use self::session::{LoadTicket, PendingSwipe, PickerSession};
pub use self::status::{CardView, Progress, SessionSnapshot};
