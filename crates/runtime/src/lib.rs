//! Service layer around the combat rules.
//!
//! `raid-core` is pure and does no I/O; this crate is the caller it expects.
//! [`BattleService`] serializes writers per session, loads the committed
//! record, runs the engine and saves the result, then hands completed
//! sessions to the reward, progress and intel collaborators.
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the service and its builder
//! - [`collaborators`] declares the external stores and ships in-memory ones
//! - [`repository`] persists session records and turn logs
//! - [`seed`] derives per-session RNG seeds
//! - [`clock`] abstracts wall-clock time for expiry
pub mod clock;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod repository;
pub mod seed;
pub mod service;

mod locks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborators::{
    Account, Asset, DefinitionError, DefinitionStore, InMemoryIntel, InMemoryLedger,
    InMemoryProgress, LedgerEntry, LedgerError, PlayerIntel, ProgressError, ProgressStore,
    RewardLedger, StaticDefinitions, is_balanced,
};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use repository::{
    ActionLogRepository, InMemoryActionLog, InMemorySessionRepo, RepositoryError, SessionRecord,
    SessionRepository,
};
pub use seed::{derive_seed, seed_fingerprint};
pub use service::{BattleService, BattleServiceBuilder, Opposition};
