//! In-process collaborator implementations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, RwLock};

use raid_content::ContentBundle;
use raid_core::{
    AbilityOracle, CharacterDefinition, CharacterId, CollusionContext, EffectCatalog, HeadToHead,
    MissionDefinition, MissionId, SessionId, TeamDefinition, TeamId, UserId,
};

use super::{
    Account, Asset, DefinitionError, DefinitionStore, LedgerEntry, LedgerError, PlayerIntel,
    ProgressError, ProgressStore, RewardLedger,
};

/// Definition store over a loaded content bundle.
#[derive(Clone, Debug)]
pub struct StaticDefinitions {
    bundle: ContentBundle,
}

impl StaticDefinitions {
    pub fn new(bundle: ContentBundle) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ContentBundle {
        &self.bundle
    }
}

impl DefinitionStore for StaticDefinitions {
    fn character(&self, id: CharacterId) -> Result<CharacterDefinition, DefinitionError> {
        self.bundle
            .character(id)
            .cloned()
            .ok_or(DefinitionError::UnknownCharacter(id))
    }

    fn team(&self, id: TeamId) -> Result<TeamDefinition, DefinitionError> {
        self.bundle
            .team(id)
            .cloned()
            .ok_or(DefinitionError::UnknownTeam(id))
    }

    fn mission(&self, id: MissionId) -> Result<MissionDefinition, DefinitionError> {
        self.bundle
            .mission(id)
            .cloned()
            .ok_or(DefinitionError::UnknownMission(id))
    }

    fn abilities(&self) -> &dyn AbilityOracle {
        &self.bundle.abilities
    }

    fn effect_catalog(&self) -> &EffectCatalog {
        &self.bundle.effects
    }
}

/// Ledger that keeps postings in memory and refuses double payouts.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    postings: Mutex<BTreeMap<SessionId, Vec<LedgerEntry>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net amount of `asset` posted to `account` across all sessions.
    pub fn balance(&self, account: Account, asset: Asset) -> i64 {
        let Ok(postings) = self.postings.lock() else {
            return 0;
        };
        postings
            .values()
            .flatten()
            .filter(|e| e.account == account && e.asset == asset)
            .map(|e| e.amount)
            .sum()
    }

    pub fn entries(&self, session: SessionId) -> Vec<LedgerEntry> {
        self.postings
            .lock()
            .ok()
            .and_then(|postings| postings.get(&session).cloned())
            .unwrap_or_default()
    }
}

impl RewardLedger for InMemoryLedger {
    fn record_reward(
        &self,
        session: SessionId,
        entries: &[LedgerEntry],
    ) -> Result<(), LedgerError> {
        let mut postings = self.postings.lock().map_err(|_| LedgerError::LockPoisoned)?;
        if postings.contains_key(&session) {
            return Err(LedgerError::AlreadyRecorded(session));
        }
        postings.insert(session, entries.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProgress {
    positions: RwLock<BTreeMap<UserId, (u32, u32)>>,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for InMemoryProgress {
    fn advance_campaign(
        &self,
        user: UserId,
        island: u32,
        sequence: u32,
    ) -> Result<(), ProgressError> {
        let mut positions = self.positions.write().map_err(|_| ProgressError::LockPoisoned)?;
        let position = positions.entry(user).or_insert((island, sequence));
        // Tuple order: a later island beats any sequence on an earlier one.
        if (island, sequence) > *position {
            *position = (island, sequence);
        }
        Ok(())
    }

    fn campaign_position(&self, user: UserId) -> Result<Option<(u32, u32)>, ProgressError> {
        let positions = self.positions.read().map_err(|_| ProgressError::LockPoisoned)?;
        Ok(positions.get(&user).copied())
    }
}

/// Relationship facts registered by hand plus recorded PvP results.
#[derive(Debug, Default)]
pub struct InMemoryIntel {
    networks: RwLock<BTreeMap<UserId, String>>,
    wallet_links: RwLock<BTreeSet<(UserId, UserId)>>,
    records: RwLock<BTreeMap<(UserId, UserId), HeadToHead>>,
}

impl InMemoryIntel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_network(&self, user: UserId, network: impl Into<String>) {
        if let Ok(mut networks) = self.networks.write() {
            networks.insert(user, network.into());
        }
    }

    pub fn link_wallets(&self, a: UserId, b: UserId) {
        if let Ok(mut links) = self.wallet_links.write() {
            links.insert(ordered(a, b));
        }
    }
}

fn ordered(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl PlayerIntel for InMemoryIntel {
    fn collusion_context(&self, player: UserId, opponent: UserId) -> CollusionContext {
        let same_network = self
            .networks
            .read()
            .map(|networks| {
                matches!(
                    (networks.get(&player), networks.get(&opponent)),
                    (Some(a), Some(b)) if a == b
                )
            })
            .unwrap_or(false);
        let linked_wallets = self
            .wallet_links
            .read()
            .map(|links| links.contains(&ordered(player, opponent)))
            .unwrap_or(false);
        let head_to_head = self
            .records
            .read()
            .ok()
            .and_then(|records| records.get(&(player, opponent)).copied())
            .unwrap_or_default();

        CollusionContext {
            player,
            opponent,
            same_network,
            linked_wallets,
            head_to_head,
        }
    }

    fn record_match(&self, player: UserId, opponent: UserId, player_won: bool) {
        let Ok(mut records) = self.records.write() else {
            return;
        };
        let sides = [
            (player, opponent, player_won),
            (opponent, player, !player_won),
        ];
        for (subject, other, won) in sides {
            let record = records.entry((subject, other)).or_default();
            record.matches += 1;
            if won {
                record.wins += 1;
            }
        }
    }
}
