//! Session seed derivation.

use raid_core::{BattleMode, SessionId, UserId};
use sha2::{Digest, Sha256};

/// Seed for a new session's RNG.
///
/// `sha256(salt ‖ user ‖ session ‖ mode ‖ started_at)`, first eight bytes
/// little-endian.
pub fn derive_seed(
    salt: &str,
    user: UserId,
    session: SessionId,
    mode: &BattleMode,
    started_at: u64,
) -> u64 {
    let digest = seed_digest(salt, user, session, mode, started_at);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Hex form of the full digest, for audit logs.
pub fn seed_fingerprint(
    salt: &str,
    user: UserId,
    session: SessionId,
    mode: &BattleMode,
    started_at: u64,
) -> String {
    hex::encode(seed_digest(salt, user, session, mode, started_at))
}

fn seed_digest(
    salt: &str,
    user: UserId,
    session: SessionId,
    mode: &BattleMode,
    started_at: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(user.0.to_le_bytes());
    hasher.update(session.0.to_le_bytes());
    match mode {
        BattleMode::Pve { mission } => {
            hasher.update([0u8]);
            hasher.update(mission.0.to_le_bytes());
        }
        BattleMode::Raid {
            mission,
            island,
            sequence,
        } => {
            hasher.update([1u8]);
            hasher.update(mission.0.to_le_bytes());
            hasher.update(island.to_le_bytes());
            hasher.update(sequence.to_le_bytes());
        }
        BattleMode::Pvp { opponent } => {
            hasher.update([2u8]);
            hasher.update(opponent.0.to_le_bytes());
        }
    }
    hasher.update(started_at.to_le_bytes());

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}
