// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handles shared between the view models and the app.
//
// The SQLite store is `Send` but not `Sync`, so it lives behind
// `Arc<Mutex<>>`. Contention is negligible: every call is a short query made
// from the UI thread.

use std::sync::{Arc, Mutex, MutexGuard};

use paperstack_bridge::PlatformBridge;
use paperstack_core::error::{PaperstackError, Result};
use paperstack_store::DocumentStore;

/// Any document store that can move between threads.
pub type DynStore = dyn DocumentStore + Send + 'static;

/// The process-wide document store.
pub type SharedStore = Arc<Mutex<DynStore>>;

/// The platform bridge, shared by every view model.
pub type SharedBridge = Arc<dyn PlatformBridge>;

/// Lock the store, turning a poisoned lock into a database error.
pub fn lock_store(store: &SharedStore) -> Result<MutexGuard<'_, DynStore>> {
    store
        .lock()
        .map_err(|_| PaperstackError::Database("document store lock poisoned".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperstack_store::SqliteDocumentStore;

    #[test]
    fn poisoned_lock_is_a_database_error() {
        let store: SharedStore = Arc::new(Mutex::new(
            SqliteDocumentStore::open_in_memory().expect("open"),
        ));

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().expect("lock");
            panic!("poison the store lock");
        })
        .join();

        assert!(matches!(
            lock_store(&store),
            Err(PaperstackError::Database(_))
        ));
    }
}
