//! Shared, serialised access to the collection.
//!
//! This module encapsulates the `Arc<Mutex<...>>` locking pattern and poisoning
//! handling so handlers work with the collection without managing concurrency
//! themselves.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Collection, CollectionError};

/// Handle to the collection shared by every connection.
///
/// Cloning the manager clones the handle, not the collection.
#[derive(Clone)]
pub struct CollectionManager {
    inner: Arc<Mutex<Box<dyn Collection>>>,
}

impl CollectionManager {
    /// Wraps a collection for shared use.
    #[must_use]
    pub fn new(collection: impl Collection + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(collection))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn Collection>>, CollectionError> {
        self.inner.lock().map_err(|_| CollectionError::Poisoned)
    }

    /// Runs `f` with exclusive access to the collection.
    ///
    /// Use this for reads, and for undo and redo, which manage history
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Poisoned`] when the lock is poisoned, or
    /// whatever `f` returns.
    pub fn with_col<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn Collection) -> Result<R, E>,
        E: From<CollectionError>,
    {
        let mut guard = self.lock()?;
        f(guard.as_mut())
    }

    /// Runs `op` as one undo step named `label`.
    ///
    /// The step is committed when `op` succeeds and rolled back when it fails,
    /// so a failed operation leaves the collection untouched. The lock is held
    /// for the whole operation, so reads performed inside `op` observe the
    /// state the mutation applies to.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Poisoned`] when the lock is poisoned, or the
    /// error returned by `op`.
    pub fn undoable_op<F, R, E>(&self, label: &str, op: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn Collection) -> Result<R, E>,
        E: From<CollectionError>,
    {
        let mut guard = self.lock()?;
        let col = guard.as_mut();
        col.begin_undoable(label);
        let result = op(&mut *col);
        if result.is_ok() {
            col.commit_undoable();
        } else {
            col.rollback_undoable();
        }
        result
    }
}

impl fmt::Debug for CollectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionManager").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::collection::{Card, CardId, CardQueue, DeckId, MemoryCollection, NoteId};

    #[fixture]
    fn manager() -> CollectionManager {
        let mut collection = MemoryCollection::default();
        collection.insert_card(Card::new(CardId(1), NoteId(1), DeckId(1)));
        CollectionManager::new(collection)
    }

    fn queue(manager: &CollectionManager) -> CardQueue {
        manager
            .with_col(|col| col.card(CardId(1)).map(|card| card.queue))
            .expect("card exists")
    }

    #[rstest]
    fn committed_operations_are_undoable(manager: CollectionManager) {
        let count = manager
            .undoable_op("Bury", |col| col.bury_cards(&[CardId(1)]))
            .expect("bury succeeds");
        assert_eq!(count, 1);
        assert_eq!(queue(&manager), CardQueue::ManuallyBuried);

        let label = manager.with_col(|col| col.undo()).expect("undo succeeds");
        assert_eq!(label, "Bury");
        assert_eq!(queue(&manager), CardQueue::New);
    }

    #[rstest]
    fn failed_operations_roll_back(manager: CollectionManager) {
        let result = manager.undoable_op("Bury", |col| {
            col.bury_cards(&[CardId(1)])?;
            col.bury_cards(&[CardId(404)])
        });
        assert!(matches!(result, Err(CollectionError::NotFound { id: 404, .. })));
        assert_eq!(queue(&manager), CardQueue::New);
        assert!(!manager.with_col(|col| Ok::<_, CollectionError>(col.undo_available())).expect("lock"));
    }

    #[rstest]
    fn clones_share_the_collection(manager: CollectionManager) {
        let clone = manager.clone();
        clone
            .undoable_op("Suspend", |col| col.suspend_cards(&[CardId(1)]))
            .expect("suspend succeeds");
        assert_eq!(queue(&manager), CardQueue::Suspended);
    }

    #[rstest]
    fn poisoned_lock_is_reported(manager: CollectionManager) {
        let clone = manager.clone();
        let outcome = std::thread::spawn(move || {
            clone.with_col(|_| -> Result<(), CollectionError> { panic!("poison the lock") })
        })
        .join();
        assert!(outcome.is_err());
        assert!(matches!(
            manager.with_col(|col| col.card(CardId(1))),
            Err(CollectionError::Poisoned)
        ));
    }
}
