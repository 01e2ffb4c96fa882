//! Deck phase as seen by the view layer.

use serde::{Deserialize, Serialize};

/// DeckPhase はデッキ全体の状態
///
/// # 状態遷移
/// - Loading -> Active / Empty (load 成功) | Error (load 失敗)
/// - Active -> Active / Complete (judge)
/// - * -> Active / Empty (restart, filter 変更で rebuild)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckPhase {
    /// A load is in flight.
    Loading,

    /// The last load failed; retry is possible.
    Error,

    /// No names match the current filter.
    Empty,

    /// There is a current card to judge.
    Active,

    /// Every card in a non-empty deck has been judged.
    Complete,
}

impl DeckPhase {
    /// Can a judgment be applied in this phase?
    pub fn is_swipeable(self) -> bool {
        matches!(self, DeckPhase::Active)
    }
}
