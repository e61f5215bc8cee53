use bevy::prelude::*;

use crate::storage::ScoreStore;

use super::session::Session;

/// Best score bookkeeping over an optional persistent store. The first
/// failure drops the store and the rest of the process runs memory-only.
#[derive(Resource, Default)]
pub struct HighScoreBook {
    store: Option<Box<dyn ScoreStore>>,
}

impl HighScoreBook {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    pub fn load(&mut self) -> u32 {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        match store.load() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                warn!("high score unavailable, keeping it in memory: {e}");
                self.store = None;
                0
            }
        }
    }

    pub fn record(&mut self, score: u32) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.save(score) {
            warn!("could not save high score {score}: {e}");
            self.store = None;
        }
    }
}

pub(super) fn load_high_score(mut book: ResMut<HighScoreBook>, mut session: ResMut<Session>) {
    session.high_score = book.load();
    debug!(
        "best score {} ({})",
        session.high_score,
        if book.is_persistent() { "saved" } else { "memory only" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct BrokenStore {
        saves: Arc<AtomicUsize>,
    }

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<u32>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn save(&self, _value: u32) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn loads_saved_best() {
        let mut book = HighScoreBook::new(MemoryStore::with_value(120));
        assert_eq!(book.load(), 120);
        assert!(book.is_persistent());
    }

    #[test]
    fn failed_load_degrades_to_memory() {
        let saves = Arc::new(AtomicUsize::new(0));
        let mut book = HighScoreBook::new(BrokenStore {
            saves: saves.clone(),
        });
        assert_eq!(book.load(), 0);
        assert!(!book.is_persistent());

        book.record(50);
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_save_is_not_retried() {
        let saves = Arc::new(AtomicUsize::new(0));
        let mut book = HighScoreBook::new(BrokenStore {
            saves: saves.clone(),
        });
        book.record(10);
        book.record(20);
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert!(!book.is_persistent());
    }
}
