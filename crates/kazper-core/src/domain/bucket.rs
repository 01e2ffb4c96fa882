//! Bucket assignment: which names were kept and which were rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Terminal judgment for a name.
///
/// Persisted and exported as `good` / `bad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "good")]
    Kept,
    #[serde(rename = "bad")]
    Rejected,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Kept => "good",
            Bucket::Rejected => "bad",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Bucket::Kept => Bucket::Rejected,
            Bucket::Rejected => Bucket::Kept,
        }
    }
}

/// One judgment, recorded so that it can be undone.
///
/// `previous` is `None` when the name was unassigned before the judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: EntityId,
    pub previous: Option<Bucket>,
    pub next: Bucket,
}

/// Insertion-ordered set of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct IdSet {
    order: Vec<EntityId>,
    members: HashSet<EntityId>,
}

impl IdSet {
    fn contains(&self, id: &EntityId) -> bool {
        self.members.contains(id)
    }

    fn insert(&mut self, id: EntityId) {
        if self.members.insert(id.clone()) {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: &EntityId) {
        if self.members.remove(id) {
            self.order.retain(|existing| existing != id);
        }
    }

    fn retain(&mut self, mut keep: impl FnMut(&EntityId) -> bool) {
        let members = &mut self.members;
        self.order.retain(|id| {
            let kept = keep(id);
            if !kept {
                members.remove(id);
            }
            kept
        });
    }
}

/// Mapping from id to kept / rejected / unassigned.
///
/// Stored as two disjoint sets. Every mutation goes through [`assign`](Self::assign)
/// or [`restore`](Self::restore), which remove the id from the opposite set
/// first, so an id is never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketAssignment {
    kept: IdSet,
    rejected: IdSet,
}

impl BucketAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from two raw lists. Duplicates are ignored; an id present in
    /// both lists stays kept.
    pub fn from_lists(
        kept: impl IntoIterator<Item = EntityId>,
        rejected: impl IntoIterator<Item = EntityId>,
    ) -> Self {
        let mut assignment = Self::new();
        for id in kept {
            assignment.kept.insert(id);
        }
        for id in rejected {
            if !assignment.kept.contains(&id) {
                assignment.rejected.insert(id);
            }
        }
        assignment
    }

    pub fn bucket_of(&self, id: &EntityId) -> Option<Bucket> {
        if self.kept.contains(id) {
            Some(Bucket::Kept)
        } else if self.rejected.contains(id) {
            Some(Bucket::Rejected)
        } else {
            None
        }
    }

    pub fn assign(&mut self, id: EntityId, bucket: Bucket) {
        match bucket {
            Bucket::Kept => {
                self.rejected.remove(&id);
                self.kept.insert(id);
            }
            Bucket::Rejected => {
                self.kept.remove(&id);
                self.rejected.insert(id);
            }
        }
    }

    /// Put `id` back into `bucket`, or make it unassigned when `bucket` is `None`.
    pub fn restore(&mut self, id: EntityId, bucket: Option<Bucket>) {
        match bucket {
            Some(bucket) => self.assign(id, bucket),
            None => {
                self.kept.remove(&id);
                self.rejected.remove(&id);
            }
        }
    }

    /// Ids in `bucket`, in the order they were first assigned.
    pub fn ids(&self, bucket: Bucket) -> &[EntityId] {
        match bucket {
            Bucket::Kept => &self.kept.order,
            Bucket::Rejected => &self.rejected.order,
        }
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.ids(bucket).len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.order.is_empty() && self.rejected.order.is_empty()
    }

    /// Drop every id for which `keep` returns false, from both sets.
    pub fn retain(&mut self, mut keep: impl FnMut(&EntityId) -> bool) {
        self.kept.retain(&mut keep);
        self.rejected.retain(&mut keep);
    }

    pub fn clear(&mut self) {
        self.kept = IdSet::default();
        self.rejected = IdSet::default();
    }
}
