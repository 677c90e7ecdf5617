//! A store that can be handed to several threads.
//!
//! The model itself is single-threaded. [`SharedStore`] is the one
//! mutual-exclusion boundary for hosts that need concurrent access: every
//! read or edit runs inside a closure holding the lock, so a composite edit
//! such as a cascading class delete is never observed half done.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;

use classweave_core::Store;

/// A cloneable handle to a store guarded by a single lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// # Examples
    ///
    /// ```
    /// use classweave::SharedStore;
    ///
    /// let shared = SharedStore::default();
    /// let added = shared.with(|store| store.add_class("Car")).unwrap();
    /// assert!(added);
    /// assert_eq!(shared.with(|store| store.len()), 1);
    /// ```
    pub fn with<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut self.lock())
    }

    /// Swaps in a whole new store, returning the previous one.
    pub fn replace(&self, store: Store) -> Store {
        std::mem::replace(&mut *self.lock(), store)
    }

    /// Returns a copy of the current store.
    pub fn snapshot(&self) -> Store {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Store operations leave the model consistent before they can panic,
        // so a poisoned lock still guards a usable store.
        self.inner.lock().unwrap_or_else(|err: PoisonError<_>| {
            warn!("Recovering store from a poisoned lock");
            err.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use classweave_core::RelationshipType;

    use super::*;

    #[test]
    fn test_replace_and_snapshot() {
        let shared = SharedStore::default();
        shared.with(|store| store.add_class("A")).unwrap();

        let mut next = Store::new();
        next.add_class("B").unwrap();
        let previous = shared.replace(next.clone());

        assert!(previous.class("A").is_some());
        assert_eq!(shared.snapshot(), next);
    }

    #[test]
    fn test_concurrent_edits() {
        let shared = SharedStore::default();
        let handles: Vec<_> = (0..8)
            .map(|idx| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .with(|store| store.add_class(&format!("C{idx}")))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(shared.with(|store| store.len()), 8);
        shared.with(|store| {
            store
                .add_relationship("C0", "C1", RelationshipType::Aggregation)
                .unwrap();
        });
        assert_eq!(shared.snapshot().relationships().len(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let shared = SharedStore::default();
        let clone = shared.clone();
        let _ = thread::spawn(move || {
            clone.with(|store| {
                store.add_class("Survivor").unwrap();
                if store.len() == 1 {
                    panic!("editor crashed");
                }
            })
        })
        .join();

        assert!(shared.with(|store| store.class("Survivor").is_some()));
    }
}
