//! Deck engine: shuffled review order, cursor, bucket assignment and undo history.
//!
//! Design:
//! - The engine is the single owner of order / cursor / buckets / history.
//! - All state transitions happen through methods; callers read through
//!   accessors and never get mutable references.
//! - Persistence is the caller's job: every method that changes buckets
//!   reports whether it did, so the session can write after each change.

use std::sync::Arc;

use rand::RngCore;

use super::shuffle::shuffle;
use crate::domain::{
    Bucket, BucketAssignment, DeckPhase, EngineError, EntityId, HistoryEntry, NameEntity,
};

pub struct DeckEngine {
    order: Vec<Arc<NameEntity>>,

    /// Index of the next entity to judge; `order.len()` when exhausted.
    cursor: usize,

    buckets: BucketAssignment,

    /// LIFO, cleared on every rebuild.
    history: Vec<HistoryEntry>,

    /// Set while a judgment's transition is pending on the view side.
    locked: bool,

    /// Bumped on every rebuild so stale pending swipes can be detected.
    generation: u64,

    rng: Box<dyn RngCore + Send>,
}

impl std::fmt::Debug for DeckEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckEngine")
            .field("len", &self.order.len())
            .field("cursor", &self.cursor)
            .field("history", &self.history.len())
            .field("locked", &self.locked)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl DeckEngine {
    pub fn new(rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            order: Vec::new(),
            cursor: 0,
            buckets: BucketAssignment::new(),
            history: Vec::new(),
            locked: false,
            generation: 0,
            rng,
        }
    }

    /// Replace the order with a fresh random permutation of `projected`.
    ///
    /// Resets the cursor, clears history and the lock. Buckets are untouched.
    pub fn rebuild(&mut self, projected: Vec<Arc<NameEntity>>) {
        let mut order = projected;
        shuffle(&mut order, &mut self.rng);
        self.order = order;
        self.cursor = 0;
        self.history.clear();
        self.locked = false;
        self.generation += 1;
        tracing::debug!(len = self.order.len(), generation = self.generation, "deck rebuilt");
    }

    /// Drop the order entirely (a load is in flight).
    pub fn clear_order(&mut self) {
        self.rebuild(Vec::new());
    }

    pub fn phase(&self) -> DeckPhase {
        if self.order.is_empty() {
            DeckPhase::Empty
        } else if self.cursor < self.order.len() {
            DeckPhase::Active
        } else {
            DeckPhase::Complete
        }
    }

    pub fn current(&self) -> Option<&Arc<NameEntity>> {
        self.order.get(self.cursor)
    }

    /// Active and not locked.
    pub fn can_judge(&self) -> bool {
        !self.locked && self.phase().is_swipeable()
    }

    pub fn can_undo(&self) -> bool {
        !self.locked && !self.history.is_empty()
    }

    /// Assign the current entity to `bucket` and advance the cursor.
    ///
    /// # Errors
    /// - `EngineError::NotSwipeable`: no current entity, or locked
    pub fn judge(&mut self, bucket: Bucket) -> Result<&HistoryEntry, EngineError> {
        if !self.can_judge() {
            return Err(EngineError::NotSwipeable);
        }
        let id = self
            .current()
            .map(|entity| entity.id().clone())
            .ok_or(EngineError::NotSwipeable)?;

        let previous = self.buckets.bucket_of(&id);
        self.buckets.assign(id.clone(), bucket);
        self.cursor += 1;
        tracing::debug!(%id, bucket = bucket.as_str(), cursor = self.cursor, "judged");

        self.history.push(HistoryEntry {
            id,
            previous,
            next: bucket,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Revert the most recent judgment. `None` when locked or nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.locked {
            return None;
        }
        let entry = self.history.pop()?;
        self.cursor = self.cursor.saturating_sub(1);
        self.buckets.restore(entry.id.clone(), entry.previous);
        tracing::debug!(id = %entry.id, cursor = self.cursor, "undone");
        Some(entry)
    }

    /// Move `id` from `from` to the opposite bucket.
    ///
    /// Does not touch cursor or history, so it is not undoable. Returns
    /// `false` (and changes nothing) when `id` is not currently in `from`.
    pub fn transfer(&mut self, id: &EntityId, from: Bucket) -> bool {
        if self.buckets.bucket_of(id) != Some(from) {
            return false;
        }
        self.buckets.assign(id.clone(), from.opposite());
        true
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_buckets(&mut self, buckets: BucketAssignment) {
        self.buckets = buckets;
    }

    /// Clear every assignment and the history (cursor stays).
    pub fn reset_buckets(&mut self) {
        self.buckets.clear();
        self.history.clear();
    }

    pub fn buckets(&self) -> &BucketAssignment {
        &self.buckets
    }

    pub fn order(&self) -> &[Arc<NameEntity>] {
        &self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
