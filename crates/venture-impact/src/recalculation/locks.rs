use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::scoring::domain::VentureId;

/// Keyed mutex serializing recomputes of the same venture.
///
/// Entries are dropped once no caller holds or waits on them.
#[derive(Debug, Default)]
pub struct EntityLocks {
    inflight: Mutex<HashMap<VentureId, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lock<T>(&self, id: &VentureId, work: impl FnOnce() -> T) -> T {
        let lock = Arc::clone(
            self.inflight()
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        let entry = EntryRelease {
            locks: self,
            id,
            lock,
        };

        let _guard = entry
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        work()
    }

    fn inflight(&self) -> MutexGuard<'_, HashMap<VentureId, Arc<Mutex<()>>>> {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn tracked(&self) -> usize {
        self.inflight().len()
    }
}

/// Drops the map entry for `id` once the last holder leaves, including on unwind.
struct EntryRelease<'a> {
    locks: &'a EntityLocks,
    id: &'a VentureId,
    lock: Arc<Mutex<()>>,
}

impl Drop for EntryRelease<'_> {
    fn drop(&mut self) {
        let mut inflight = self.locks.inflight();
        if Arc::strong_count(&self.lock) == 2 {
            inflight.remove(self.id);
        }
    }
}
