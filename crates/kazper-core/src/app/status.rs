//! SessionSnapshot - view 層向けの読み取り専用ビュー
//!
//! Everything a front end needs to draw one frame. Built by
//! [`PickerSession::snapshot`](super::PickerSession::snapshot); holding one
//! never blocks the session.

use std::sync::Arc;

use crate::domain::{DeckPhase, GenderMode, Locale, NameEntity};

/// The card currently up for judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub entity: Arc<NameEntity>,
    pub display_name: String,
}

/// `position / total` as shown above the card.
///
/// `position` is 1-based while a card is showing, equals `total` once the
/// deck is complete, and both are 0 for an empty deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.position, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: DeckPhase,

    /// Banner text of the last failed load.
    pub error: Option<String>,

    /// Malformed rows skipped by the last successful load.
    pub invalid_rows: usize,

    pub current: Option<CardView>,
    pub progress: Progress,

    /// Cards left after the current one.
    pub remaining: usize,

    /// Kept and rejected entities, in the order they were assigned.
    pub kept: Vec<Arc<NameEntity>>,
    pub rejected: Vec<Arc<NameEntity>>,

    pub can_judge: bool,
    pub can_undo: bool,
    pub can_restart: bool,
    pub can_export: bool,
    pub can_reset: bool,

    pub locale: Locale,
    pub gender_mode: GenderMode,
}

impl SessionSnapshot {
    pub fn has_choices(&self) -> bool {
        !self.kept.is_empty() || !self.rejected.is_empty()
    }
}
