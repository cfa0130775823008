//! In-memory repository implementations for testing and development.

use std::collections::BTreeMap;
use std::sync::RwLock;

use raid_core::{ModeKind, SessionId, TurnResult, UserId};

use super::{
    ActionLogRepository, RepositoryError, Result, SessionRecord, SessionRepository,
};

/// In-memory implementation of [`SessionRepository`].
#[derive(Debug)]
pub struct InMemorySessionRepo {
    records: RwLock<BTreeMap<SessionId, SessionRecord>>,
    next_id: RwLock<u64>,
}

impl InMemorySessionRepo {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: RwLock::new(1),
        }
    }
}

impl Default for InMemorySessionRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRepository for InMemorySessionRepo {
    fn next_id(&self) -> Result<SessionId> {
        let mut next = self.next_id.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let id = SessionId(*next);
        *next += 1;
        Ok(id)
    }

    fn create(&self, record: &SessionRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        if records.contains_key(&record.id) {
            return Err(RepositoryError::AlreadyExists(record.id));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.id, record.clone());
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Option<SessionRecord>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(&id).cloned())
    }

    fn list_open(&self) -> Result<Vec<SessionId>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .values()
            .filter(|r| !r.status.is_terminal())
            .map(|r| r.id)
            .collect())
    }

    fn find_open(&self, user: UserId, kind: ModeKind) -> Result<Option<SessionId>> {
        let records = self.records.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records
            .values()
            .find(|r| r.user == user && r.mode.kind() == kind && !r.status.is_terminal())
            .map(|r| r.id))
    }
}

/// In-memory action log; entries are kept as JSON lines like a file-backed log.
#[derive(Debug, Default)]
pub struct InMemoryActionLog {
    lines: RwLock<BTreeMap<SessionId, Vec<String>>>,
}

impl InMemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActionLogRepository for InMemoryActionLog {
    fn append(&self, session: SessionId, turns: &[TurnResult]) -> Result<()> {
        let encoded = turns
            .iter()
            .map(|turn| serde_json::to_string(turn).map_err(RepositoryError::json("turn")))
            .collect::<Result<Vec<_>>>()?;

        let mut lines = self.lines.write().map_err(|_| RepositoryError::LockPoisoned)?;
        lines.entry(session).or_default().extend(encoded);
        Ok(())
    }

    fn load(&self, session: SessionId) -> Result<Vec<TurnResult>> {
        let lines = self.lines.read().map_err(|_| RepositoryError::LockPoisoned)?;
        lines
            .get(&session)
            .map(|entries| {
                entries
                    .iter()
                    .map(|line| serde_json::from_str(line).map_err(RepositoryError::json("turn")))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn truncate(&self, session: SessionId, len: usize) -> Result<()> {
        let mut lines = self.lines.write().map_err(|_| RepositoryError::LockPoisoned)?;
        if let Some(entries) = lines.get_mut(&session) {
            entries.truncate(len);
        }
        Ok(())
    }
}
