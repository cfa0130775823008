//! Repository layer for session data.
//!
//! Repositories handle data that CHANGES during play:
//! - Session records (scalar columns plus three JSON blobs)
//! - Per-session action logs
//!
//! Static content (abilities, characters, missions) is served by the
//! definition store, not by repositories.

mod error;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryActionLog, InMemorySessionRepo};
pub use record::SessionRecord;
pub use traits::{ActionLogRepository, SessionRepository};
