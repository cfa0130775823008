//! Repository contracts for saving and loading sessions.

use raid_core::{ModeKind, SessionId, TurnResult, UserId};

use super::{Result, SessionRecord};

/// Repository for session records.
///
/// Holds the latest committed record per session; the runtime serializes
/// writers per session, so implementations only need to be internally
/// thread-safe.
pub trait SessionRepository: Send + Sync {
    /// Reserves a fresh session id.
    fn next_id(&self) -> Result<SessionId>;

    /// Insert a new record; fails if the id is taken.
    fn create(&self, record: &SessionRecord) -> Result<()>;

    /// Replace the stored record.
    fn save(&self, record: &SessionRecord) -> Result<()>;

    fn load(&self, id: SessionId) -> Result<Option<SessionRecord>>;

    /// Ids of sessions whose status is not terminal.
    fn list_open(&self) -> Result<Vec<SessionId>>;

    /// Open session held by `user` for `kind`, if any.
    fn find_open(&self, user: UserId, kind: ModeKind) -> Result<Option<SessionId>>;
}

/// Append-only per-session turn log.
pub trait ActionLogRepository: Send + Sync {
    fn append(&self, session: SessionId, turns: &[TurnResult]) -> Result<()>;

    /// Every stored turn, in order.
    fn load(&self, session: SessionId) -> Result<Vec<TurnResult>>;

    /// Drops entries past `len` (left behind by a record save that failed).
    fn truncate(&self, session: SessionId, len: usize) -> Result<()>;
}
