//! SessionBuilder - セッションの構築とワイヤリング
//!
//! Every port has a default, so `SessionBuilder::new().build()` gives a
//! working in-memory session. Production callers swap in a file store;
//! tests pin the clock and the shuffle seed.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::config::PickerConfig;
use super::session::PickerSession;
use crate::deck::DeckEngine;
use crate::impls::{CyrillicCollator, InMemoryStore};
use crate::persist::{StateRepository, StorageKeys};
use crate::ports::{Clock, Collator, KeyValueStore, SystemClock};

/// SessionBuilder は PickerSession を構築
///
/// # 使用例
/// ```ignore
/// let session = SessionBuilder::new()
///     .store(Arc::new(JsonFileStore::new(&config.storage_path)))
///     .keys(config.storage_keys())
///     .build();
/// ```
///
/// # デフォルト
/// - store: `InMemoryStore`
/// - clock: `SystemClock`
/// - collator: `CyrillicCollator`
/// - rng: `StdRng::from_entropy()`
pub struct SessionBuilder {
    store: Option<Arc<dyn KeyValueStore>>,
    keys: StorageKeys,
    clock: Option<Arc<dyn Clock>>,
    collator: Option<Arc<dyn Collator>>,
    rng: Option<Box<dyn RngCore + Send>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            keys: StorageKeys::default(),
            clock: None,
            collator: None,
            rng: None,
        }
    }

    /// Storage keys from `config`; the store itself is still up to the caller.
    pub fn from_config(config: &PickerConfig) -> Self {
        Self::new().keys(config.storage_keys())
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn collator(mut self, collator: Arc<dyn Collator>) -> Self {
        self.collator = Some(collator);
        self
    }

    pub fn rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Deterministic shuffles.
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    /// Wire the ports together; stored preferences are read here.
    pub fn build(self) -> PickerSession {
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryStore::new()),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let collator: Arc<dyn Collator> = match self.collator {
            Some(collator) => collator,
            None => Arc::new(CyrillicCollator::new()),
        };
        let rng: Box<dyn RngCore + Send> = match self.rng {
            Some(rng) => rng,
            None => Box::new(StdRng::from_entropy()),
        };

        PickerSession::new(
            DeckEngine::new(rng),
            StateRepository::new(store, self.keys),
            clock,
            collator,
        )
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
