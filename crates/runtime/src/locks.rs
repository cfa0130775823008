//! Per-session write locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use raid_core::SessionId;

use crate::error::{Result, RuntimeError};

type Entry = Arc<Mutex<()>>;

/// One mutex per session, created on first use.
///
/// Held across load → engine → save so each session has a single writer
/// while different sessions proceed in parallel. An entry only lives while
/// some call holds a [`SessionLock`] for it.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Entry>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `id`; the caller locks it for the critical section.
    pub fn handle(&self, id: SessionId) -> Result<SessionLock<'_>> {
        let mut locks = self.locks.lock().map_err(|_| RuntimeError::LockPoisoned)?;
        let entry = Arc::clone(locks.entry(id).or_default());
        Ok(SessionLock {
            owner: self,
            id,
            entry,
        })
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the entry for `id` when `held` is its last outside holder.
    fn forget(&self, id: SessionId, held: &Entry) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        // One count for the map, one for `held`.
        let idle = locks
            .get(&id)
            .is_some_and(|entry| Arc::ptr_eq(entry, held) && Arc::strong_count(entry) == 2);
        if idle {
            locks.remove(&id);
        }
    }
}

/// A claim on one session's lock; dropping it forgets an idle entry.
#[derive(Debug)]
pub struct SessionLock<'a> {
    owner: &'a SessionLocks,
    id: SessionId,
    entry: Entry,
}

impl SessionLock<'_> {
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.entry.lock().map_err(|_| RuntimeError::LockPoisoned)
    }
}

impl Drop for SessionLock<'_> {
    fn drop(&mut self) {
        self.owner.forget(self.id, &self.entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_session_shares_a_lock() {
        let locks = SessionLocks::new();
        let a = locks.handle(SessionId(1)).unwrap();
        let b = locks.handle(SessionId(1)).unwrap();
        let c = locks.handle(SessionId(2)).unwrap();
        assert!(Arc::ptr_eq(&a.entry, &b.entry));
        assert!(!Arc::ptr_eq(&a.entry, &c.entry));

        let _guard = a.lock().unwrap();
        assert!(b.entry.try_lock().is_err());
        assert!(c.entry.try_lock().is_ok());
    }

    #[test]
    fn entry_lives_until_last_holder_drops() {
        let locks = SessionLocks::new();
        let a = locks.handle(SessionId(1)).unwrap();
        let b = locks.handle(SessionId(1)).unwrap();
        assert_eq!(locks.len(), 1);

        drop(a);
        assert_eq!(locks.len(), 1);
        drop(b);
        assert!(locks.is_empty());
    }

    #[test]
    fn entry_is_pruned_after_the_critical_section() {
        let locks = SessionLocks::new();
        {
            let lock = locks.handle(SessionId(4)).unwrap();
            let _guard = lock.lock().unwrap();
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());

        // A fresh claim after pruning is a fresh, unlocked mutex.
        let again = locks.handle(SessionId(4)).unwrap();
        assert!(again.lock().is_ok());
    }
}
