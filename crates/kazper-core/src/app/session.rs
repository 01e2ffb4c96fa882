//! PickerSession - view 層に公開するコマンド面
//!
//! Owns the catalog, preferences, deck engine and the injected ports. The view
//! layer issues commands and reads [`SessionSnapshot`]s; it never touches the
//! state directly.
//!
//! # 振る舞い
//! - Every command that changes buckets or preferences writes them through the
//!   [`StateRepository`] before returning. Storage failures are logged and
//!   swallowed.
//! - Commands that are not applicable in the current state are ignored and
//!   report `false` (or `None`).
//! - A load is split into [`begin_load`](PickerSession::begin_load) and
//!   [`complete_load`](PickerSession::complete_load); only the most recent
//!   ticket is honored.

use std::sync::Arc;

use super::status::{CardView, Progress, SessionSnapshot};
use crate::deck::{DeckEngine, project};
use crate::domain::{
    Bucket, DeckPhase, EntityCatalog, EntityId, GenderMode, LoadError, Locale, Preferences,
};
use crate::export::{self, CSV_MIME, ExportError, ExportFile, ExportRecord, JSON_MIME};
use crate::ingest::parse_names;
use crate::persist::{StateRepository, sanitize};
use crate::ports::{Clock, Collator, CsvSource};

/// Handle for one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a load is only applied through complete_load"]
pub struct LoadTicket {
    sequence: u64,
}

/// A judgment whose transition is playing; the deck is locked until it is
/// completed. Consumed by [`complete_swipe`](PickerSession::complete_swipe).
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the deck stays locked until complete_swipe"]
pub struct PendingSwipe {
    bucket: Bucket,
    generation: u64,
}

impl PendingSwipe {
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }
}

pub struct PickerSession {
    catalog: EntityCatalog,
    prefs: Preferences,
    engine: DeckEngine,
    repository: StateRepository,
    clock: Arc<dyn Clock>,
    collator: Arc<dyn Collator>,

    loading: bool,
    error: Option<LoadError>,
    invalid_rows: usize,
    load_sequence: u64,
}

impl std::fmt::Debug for PickerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerSession")
            .field("catalog", &self.catalog.len())
            .field("prefs", &self.prefs)
            .field("engine", &self.engine)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl PickerSession {
    /// Assemble a session; stored preferences are read immediately.
    pub(super) fn new(
        engine: DeckEngine,
        repository: StateRepository,
        clock: Arc<dyn Clock>,
        collator: Arc<dyn Collator>,
    ) -> Self {
        let prefs = repository.read_prefs(Preferences::default());
        tracing::debug!(
            locale = prefs.locale.as_str(),
            gender_mode = prefs.gender_mode.as_str(),
            "preferences hydrated"
        );
        Self {
            catalog: EntityCatalog::default(),
            prefs,
            engine,
            repository,
            clock,
            collator,
            loading: false,
            error: None,
            invalid_rows: 0,
            load_sequence: 0,
        }
    }

    // ---- load ----

    /// Enter the loading state and hand out a ticket for the result.
    ///
    /// Clears the error, the malformed-row count, the deck and the history.
    /// Any ticket handed out before becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_sequence += 1;
        self.loading = true;
        self.error = None;
        self.invalid_rows = 0;
        self.engine.clear_order();
        LoadTicket {
            sequence: self.load_sequence,
        }
    }

    /// Apply the fetched bytes (or fetch failure) for `ticket`.
    ///
    /// Returns `false` and changes nothing when a newer load has begun since.
    pub fn complete_load(&mut self, ticket: LoadTicket, fetched: Result<Vec<u8>, LoadError>) -> bool {
        if ticket.sequence != self.load_sequence {
            tracing::warn!(
                ticket = ticket.sequence,
                latest = self.load_sequence,
                "discarding result of a superseded load"
            );
            return false;
        }
        self.loading = false;

        match fetched.and_then(|bytes| parse_names(&bytes)) {
            Ok(outcome) => {
                self.catalog = EntityCatalog::new(outcome.entities);
                self.invalid_rows = outcome.invalid_rows;
                if self.invalid_rows > 0 {
                    tracing::warn!(invalid_rows = self.invalid_rows, "skipped malformed rows");
                }

                let mut buckets = self.repository.read_choices();
                sanitize(&mut buckets, &self.catalog);
                self.engine.set_buckets(buckets);
                self.persist_choices();
                self.rebuild();
                tracing::info!(
                    names = self.catalog.len(),
                    deck = self.engine.len(),
                    "names loaded"
                );
            }
            Err(error) => {
                tracing::warn!(%error, "failed to load names");
                self.error = Some(error);
            }
        }
        true
    }

    /// Fetch from `source` and apply the result.
    pub async fn load(&mut self, source: &dyn CsvSource) -> bool {
        let ticket = self.begin_load();
        tracing::debug!(location = source.location(), "loading names");
        let fetched = source.fetch().await;
        self.complete_load(ticket, fetched)
    }

    // ---- filters ----

    pub fn set_locale(&mut self, locale: Locale) {
        self.prefs.locale = locale;
        self.persist_prefs();
        self.rebuild_if_ready();
    }

    pub fn set_gender_mode(&mut self, mode: GenderMode) {
        self.prefs.gender_mode = mode;
        self.persist_prefs();
        self.rebuild_if_ready();
    }

    // ---- judgments ----

    fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    pub fn can_judge(&self) -> bool {
        self.is_ready() && self.engine.can_judge()
    }

    /// Judge the current card right away.
    pub fn judge(&mut self, bucket: Bucket) -> bool {
        if !self.is_ready() {
            tracing::debug!("judgment ignored: no names loaded");
            return false;
        }
        if let Err(error) = self.engine.judge(bucket).map(|_| ()) {
            tracing::debug!(%error, "judgment ignored");
            return false;
        }
        self.persist_choices();
        true
    }

    /// Lock the deck for an animated judgment of the current card.
    pub fn begin_swipe(&mut self, bucket: Bucket) -> Option<PendingSwipe> {
        if !self.can_judge() {
            return None;
        }
        self.engine.lock();
        Some(PendingSwipe {
            bucket,
            generation: self.engine.generation(),
        })
    }

    /// Unlock and apply `pending`.
    ///
    /// A swipe begun before the deck was rebuilt is dropped; the rebuild has
    /// already released its lock. So is one whose lock is already gone.
    pub fn complete_swipe(&mut self, pending: PendingSwipe) -> bool {
        if pending.generation != self.engine.generation() {
            tracing::debug!("dropping swipe from a rebuilt deck");
            return false;
        }
        if !self.engine.is_locked() {
            tracing::debug!("dropping swipe: deck is not locked");
            return false;
        }
        self.engine.unlock();
        self.judge(pending.bucket)
    }

    pub fn undo(&mut self) -> bool {
        match self.engine.undo() {
            Some(_) => {
                self.persist_choices();
                true
            }
            None => false,
        }
    }

    /// Reshuffle the current filter. Ignored while loading or after a failed load.
    pub fn restart(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.rebuild();
        true
    }

    /// Move a picked name to the other bucket. Not undoable.
    pub fn transfer(&mut self, id: &EntityId, from: Bucket) -> bool {
        if !self.catalog.contains(id) || !self.engine.transfer(id, from) {
            return false;
        }
        tracing::debug!(%id, to = from.opposite().as_str(), "transferred");
        self.persist_choices();
        true
    }

    /// Forget every pick and restore default preferences.
    ///
    /// Ignored while loading.
    pub fn reset_all(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.prefs = Preferences::default();
        self.engine.reset_buckets();
        if let Err(error) = self.repository.clear() {
            tracing::warn!(%error, "failed to clear stored state");
        }
        self.persist_prefs();
        self.persist_choices();
        self.rebuild_if_ready();
        tracing::info!("picks and preferences reset");
        true
    }

    // ---- export ----

    fn export_records(&self) -> Vec<ExportRecord> {
        export::collect_records(
            self.engine.buckets(),
            &self.catalog,
            self.prefs.locale,
            self.collator.as_ref(),
        )
    }

    /// CSV of all picks; `Ok(None)` when there is nothing to export.
    pub fn export_csv(&self) -> Result<Option<ExportFile>, ExportError> {
        let records = self.export_records();
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(ExportFile {
            file_name: export::file_name(self.clock.now().date_naive(), "csv"),
            mime_type: CSV_MIME,
            contents: export::to_csv(&records, self.prefs.locale)?,
        }))
    }

    /// JSON of all picks; `Ok(None)` when there is nothing to export.
    pub fn export_json(&self) -> Result<Option<ExportFile>, ExportError> {
        let records = self.export_records();
        if records.is_empty() {
            return Ok(None);
        }
        let now = self.clock.now();
        Ok(Some(ExportFile {
            file_name: export::file_name(now.date_naive(), "json"),
            mime_type: JSON_MIME,
            contents: export::to_json(&records, self.prefs.locale, now)?,
        }))
    }

    // ---- queries ----

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> DeckPhase {
        if self.loading {
            DeckPhase::Loading
        } else if self.error.is_some() {
            DeckPhase::Error
        } else {
            self.engine.phase()
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.phase();
        let locale = self.prefs.locale;
        let total = self.engine.len();

        let current = match phase {
            DeckPhase::Active => self.engine.current().map(|entity| CardView {
                display_name: entity.display(locale).to_string(),
                entity: Arc::clone(entity),
            }),
            _ => None,
        };
        let progress = match phase {
            DeckPhase::Active => Progress {
                position: self.engine.cursor() + 1,
                total,
            },
            DeckPhase::Complete => Progress {
                position: total,
                total,
            },
            _ => Progress::default(),
        };
        let remaining = if current.is_some() {
            total.saturating_sub(self.engine.cursor() + 1)
        } else {
            0
        };

        let resolve = |bucket| {
            self.engine
                .buckets()
                .ids(bucket)
                .iter()
                .filter_map(|id| self.catalog.get(id).cloned())
                .collect::<Vec<_>>()
        };
        let kept = resolve(Bucket::Kept);
        let rejected = resolve(Bucket::Rejected);
        let can_export = !kept.is_empty() || !rejected.is_empty();

        SessionSnapshot {
            phase,
            error: self.error.as_ref().map(ToString::to_string),
            invalid_rows: self.invalid_rows,
            current,
            progress,
            remaining,
            kept,
            rejected,
            can_judge: self.can_judge(),
            can_undo: self.engine.can_undo(),
            can_restart: self.is_ready() && !self.engine.is_empty(),
            can_export,
            can_reset: !self.loading,
            locale,
            gender_mode: self.prefs.gender_mode,
        }
    }

    // ---- internals ----

    fn rebuild(&mut self) {
        let projected = project(
            &self.catalog,
            self.prefs.active_genders(),
            self.prefs.locale,
            self.collator.as_ref(),
        );
        self.engine.rebuild(projected);
    }

    /// Filters changed: only an idle, loaded session has a deck to rebuild.
    /// Otherwise the next successful load picks the new filter up.
    fn rebuild_if_ready(&mut self) {
        if self.is_ready() {
            self.rebuild();
        }
    }

    fn persist_choices(&self) {
        if let Err(error) = self.repository.write_choices(self.engine.buckets()) {
            tracing::warn!(%error, "failed to persist choices");
        }
    }

    fn persist_prefs(&self) {
        if let Err(error) = self.repository.write_prefs(&self.prefs) {
            tracing::warn!(%error, "failed to persist preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionBuilder;
    use crate::impls::InMemoryStore;
    use crate::ports::{FixedClock, KeyValueStore};
    use chrono::{TimeZone, Utc};

    const CSV: &str = "kk,ru,en,gender\n\
        Айгерім,Айгерим,Aigerim,F\n\
        Асқар,Аскар,Askar,M\n\
        Нұр,Нур,Nur,B\n\
        Дана,Дана,Dana,F\n";

    fn session(store: &InMemoryStore) -> PickerSession {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        SessionBuilder::new()
            .store(Arc::new(store.clone()))
            .clock(Arc::new(clock))
            .seed(7)
            .build()
    }

    fn loaded(store: &InMemoryStore) -> PickerSession {
        let mut session = session(store);
        let ticket = session.begin_load();
        assert!(session.complete_load(ticket, Ok(CSV.as_bytes().to_vec())));
        session
    }

    #[test]
    fn fresh_session_is_empty_and_idle() {
        let snapshot = session(&InMemoryStore::new()).snapshot();
        assert_eq!(snapshot.phase, DeckPhase::Empty);
        assert_eq!(snapshot.progress, Progress::default());
        assert!(!snapshot.can_judge);
        assert!(snapshot.can_reset);
    }

    #[test]
    fn load_builds_an_active_deck() {
        let session = loaded(&InMemoryStore::new());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, DeckPhase::Active);
        assert_eq!(snapshot.progress, Progress { position: 1, total: 4 });
        assert_eq!(snapshot.remaining, 3);
        assert!(snapshot.can_judge);
        assert!(!snapshot.can_undo);
        assert!(!snapshot.can_export);
        let current = snapshot.current.unwrap();
        assert_eq!(current.display_name, current.entity.ru());
    }

    #[test]
    fn loading_state_blocks_commands() {
        let mut session = loaded(&InMemoryStore::new());
        let _ticket = session.begin_load();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, DeckPhase::Loading);
        assert!(!snapshot.can_reset);
        assert!(!session.judge(Bucket::Kept));
        assert!(!session.restart());
        assert!(!session.reset_all());
    }

    #[test]
    fn failed_load_shows_banner_and_retry_recovers() {
        let mut session = session(&InMemoryStore::new());
        let ticket = session.begin_load();
        let failure = LoadError::Fetch {
            location: "name_list.csv".to_string(),
            status: 404,
        };
        assert!(session.complete_load(ticket, Err(failure)));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, DeckPhase::Error);
        assert_eq!(snapshot.error.as_deref(), Some("Failed to fetch name_list.csv (404)."));
        assert!(!snapshot.can_restart);

        let retry = session.begin_load();
        assert!(session.complete_load(retry, Ok(CSV.as_bytes().to_vec())));
        assert_eq!(session.phase(), DeckPhase::Active);
        assert_eq!(session.snapshot().error, None);
    }

    #[test]
    fn invalid_csv_surfaces_its_message() {
        let mut session = session(&InMemoryStore::new());
        let ticket = session.begin_load();
        session.complete_load(ticket, Ok(b"kk,ru,en\nA,B,C\n".to_vec()));
        assert_eq!(
            session.snapshot().error.as_deref(),
            Some("CSV header must include kk, ru, en, and gender.")
        );
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut session = session(&InMemoryStore::new());
        let first = session.begin_load();
        let second = session.begin_load();

        assert!(session.complete_load(second, Ok(CSV.as_bytes().to_vec())));
        assert!(!session.complete_load(first, Ok(b"kk,ru,en,gender\nX,X,X,M\n".to_vec())));
        assert_eq!(session.catalog().len(), 4);
    }

    #[test]
    fn swipe_locks_until_completed() {
        let mut session = loaded(&InMemoryStore::new());
        let pending = session.begin_swipe(Bucket::Kept).unwrap();

        assert!(!session.can_judge());
        assert!(session.begin_swipe(Bucket::Rejected).is_none());
        assert!(!session.undo());

        assert!(session.complete_swipe(pending));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.kept.len(), 1);
        assert_eq!(snapshot.progress.position, 2);
        assert!(snapshot.can_undo);
    }

    #[test]
    fn completed_swipe_cannot_judge_again() {
        let mut session = loaded(&InMemoryStore::new());
        let pending = session.begin_swipe(Bucket::Kept).unwrap();
        let replay = PendingSwipe {
            bucket: pending.bucket,
            generation: pending.generation,
        };

        assert!(session.complete_swipe(pending));
        assert!(!session.complete_swipe(replay));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.kept.len(), 1);
        assert_eq!(snapshot.progress.position, 2);
        assert!(session.can_judge());
    }

    #[test]
    fn swipe_from_before_a_rebuild_is_dropped() {
        let mut session = loaded(&InMemoryStore::new());
        let pending = session.begin_swipe(Bucket::Kept).unwrap();
        session.set_locale(Locale::En);

        assert!(!session.complete_swipe(pending));
        assert!(session.snapshot().kept.is_empty());
        assert!(session.can_judge());
    }

    #[test]
    fn judgments_are_persisted_immediately() {
        let store = InMemoryStore::new();
        let mut session = loaded(&store);
        session.judge(Bucket::Rejected);

        let raw = store.get("kazper.picker.v1.choices").unwrap().unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document["bad"].as_array().unwrap().len(), 1);
        assert!(document["good"].as_array().unwrap().is_empty());
    }

    #[test]
    fn picks_and_prefs_survive_a_new_session() {
        let store = InMemoryStore::new();
        let mut first = loaded(&store);
        first.set_gender_mode(GenderMode::Female);
        first.set_locale(Locale::Kk);
        first.judge(Bucket::Kept);
        let kept = first.snapshot().kept;

        let second = loaded(&store);
        assert_eq!(second.preferences().locale, Locale::Kk);
        assert_eq!(second.preferences().gender_mode, GenderMode::Female);
        assert_eq!(second.snapshot().kept, kept);
    }

    #[test]
    fn gender_filter_shrinks_the_deck() {
        let mut session = loaded(&InMemoryStore::new());
        session.set_gender_mode(GenderMode::Male);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.progress.total, 2);
        assert_eq!(snapshot.gender_mode, GenderMode::Male);
    }

    #[test]
    fn completing_the_deck() {
        let mut session = loaded(&InMemoryStore::new());
        for _ in 0..4 {
            assert!(session.judge(Bucket::Kept));
        }
        assert!(!session.judge(Bucket::Kept));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, DeckPhase::Complete);
        assert_eq!(snapshot.progress, Progress { position: 4, total: 4 });
        assert_eq!(snapshot.current, None);
        assert!(snapshot.can_restart);

        assert!(session.restart());
        assert_eq!(session.phase(), DeckPhase::Active);
        assert_eq!(session.snapshot().kept.len(), 4);
    }

    #[test]
    fn transfer_moves_between_lists_without_history() {
        let mut session = loaded(&InMemoryStore::new());
        session.judge(Bucket::Kept);
        let id = session.snapshot().kept[0].id().clone();

        assert!(!session.transfer(&id, Bucket::Rejected));
        assert!(session.transfer(&id, Bucket::Kept));

        let snapshot = session.snapshot();
        assert!(snapshot.kept.is_empty());
        assert_eq!(snapshot.rejected[0].id(), &id);

        // Undo reverts the judgment, not the transfer.
        assert!(session.undo());
        assert!(session.snapshot().rejected.is_empty());
        assert!(!session.transfer(&EntityId::from_raw("nobody"), Bucket::Kept));
    }

    #[test]
    fn reset_all_restores_defaults() {
        let store = InMemoryStore::new();
        let mut session = loaded(&store);
        session.set_locale(Locale::En);
        session.set_gender_mode(GenderMode::Male);
        session.judge(Bucket::Kept);

        assert!(session.reset_all());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.locale, Locale::Ru);
        assert_eq!(snapshot.gender_mode, GenderMode::Both);
        assert!(!snapshot.has_choices());
        assert!(!snapshot.can_undo);
        assert_eq!(snapshot.progress, Progress { position: 1, total: 4 });
        assert_eq!(
            store.get("kazper.picker.v1.choices").unwrap().as_deref(),
            Some(r#"{"good":[],"bad":[]}"#)
        );
    }

    #[test]
    fn exports_are_named_after_the_clock() {
        let mut session = loaded(&InMemoryStore::new());
        assert!(session.export_csv().unwrap().is_none());
        assert!(session.export_json().unwrap().is_none());

        session.judge(Bucket::Kept);
        let csv = session.export_csv().unwrap().unwrap();
        assert_eq!(csv.file_name, "kazper-picks-2024-05-01.csv");
        assert_eq!(csv.mime_type, "text/csv;charset=utf-8");
        assert_eq!(csv.contents.lines().count(), 2);

        let json = session.export_json().unwrap().unwrap();
        assert_eq!(json.file_name, "kazper-picks-2024-05-01.json");
        assert!(json.contents.contains("\"exportedAt\": \"2024-05-01T12:00:00.000Z\""));
    }

    #[test]
    fn quota_failures_do_not_interrupt() {
        let store = InMemoryStore::with_quota(8);
        let mut session = loaded(&store);
        assert!(session.judge(Bucket::Kept));
        assert_eq!(session.snapshot().kept.len(), 1);
    }
}
