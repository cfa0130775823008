//! Turn scheduling.
//!
//! The queue holds exactly one entry per living combatant, enemies included,
//! sorted by:
//!
//! 1. priority (descending)
//! 2. speed (descending)
//! 3. side (player side first)
//! 4. combatant id (ascending)
//!
//! The last key makes the order total, so the same roster always produces
//! the same queue.

use core::cmp::Ordering;

use crate::error::{CombatError, ErrorSeverity};
use crate::types::{CombatantId, Side};

/// One actor's slot in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnQueueEntry {
    pub actor: CombatantId,
    pub side: Side,
    pub speed: u32,
    pub priority: i32,
}

impl TurnQueueEntry {
    fn order(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.speed.cmp(&self.speed))
            .then_with(|| self.side.cmp(&other.side))
            .then_with(|| self.actor.cmp(&other.actor))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerError {
    #[error("turn queue is empty")]
    EmptyQueue,

    #[error("combatant {0} appears more than once in the turn queue")]
    Duplicate(CombatantId),

    #[error("living combatant {0} is missing from the turn queue")]
    Missing(CombatantId),

    #[error("turn queue holds {0}, who is not a living combatant")]
    Stale(CombatantId),
}

impl CombatError for SchedulerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyQueue => "SCHEDULER_EMPTY_QUEUE",
            Self::Duplicate(_) => "SCHEDULER_DUPLICATE",
            Self::Missing(_) => "SCHEDULER_MISSING",
            Self::Stale(_) => "SCHEDULER_STALE",
        }
    }
}

/// Ordered action queue with a cursor and round counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnQueue {
    entries: Vec<TurnQueueEntry>,
    index: usize,
    /// 1-based round number; bumps every time the cursor wraps.
    round: u32,
}

impl TurnQueue {
    pub fn build(entries: impl IntoIterator<Item = TurnQueueEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(TurnQueueEntry::order);
        Self {
            entries,
            index: 0,
            round: 1,
        }
    }

    pub fn current(&self) -> Result<&TurnQueueEntry, SchedulerError> {
        self.entries.get(self.index).ok_or(SchedulerError::EmptyQueue)
    }

    /// Moves the cursor to the next actor. Returns true if a new round began.
    pub fn advance(&mut self) -> Result<bool, SchedulerError> {
        if self.entries.is_empty() {
            return Err(SchedulerError::EmptyQueue);
        }
        self.index += 1;
        if self.index >= self.entries.len() {
            self.index = 0;
            self.round += 1;
            return Ok(true);
        }
        Ok(false)
    }

    /// Re-sorts the queue after the roster changed.
    ///
    /// The cursor lands on the first actor, scanning forward from the current
    /// position in the old order, that is still in `living`. Landing on an
    /// actor that was behind the cursor means the round ended.
    pub fn rebuild(&mut self, living: impl IntoIterator<Item = TurnQueueEntry>) {
        let mut fresh: Vec<_> = living.into_iter().collect();
        fresh.sort_by(TurnQueueEntry::order);

        let len = self.entries.len();
        let next = (0..len)
            .map(|offset| (self.index + offset, self.entries[(self.index + offset) % len].actor))
            .find(|(_, actor)| fresh.iter().any(|e| e.actor == *actor));

        self.index = match next {
            Some((position, actor)) => {
                if position >= len {
                    self.round += 1;
                }
                fresh.iter().position(|e| e.actor == actor).unwrap_or(0)
            }
            None => 0,
        };
        self.entries = fresh;
    }

    /// Checks that the queue holds exactly the `living` actors, once each.
    pub fn validate(&self, living: &[CombatantId]) -> Result<(), SchedulerError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.actor == entry.actor) {
                return Err(SchedulerError::Duplicate(entry.actor));
            }
            if !living.contains(&entry.actor) {
                return Err(SchedulerError::Stale(entry.actor));
            }
        }
        match living.iter().find(|id| !self.contains(**id)) {
            Some(missing) => Err(SchedulerError::Missing(*missing)),
            None => Ok(()),
        }
    }

    pub fn contains(&self, actor: CombatantId) -> bool {
        self.entries.iter().any(|e| e.actor == actor)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnQueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, side: Side, speed: u32, priority: i32) -> TurnQueueEntry {
        TurnQueueEntry {
            actor: CombatantId(id),
            side,
            speed,
            priority,
        }
    }

    fn order(queue: &TurnQueue) -> Vec<u32> {
        queue.iter().map(|e| e.actor.0).collect()
    }

    #[test]
    fn sorts_by_priority_speed_side_then_id() {
        let queue = TurnQueue::build([
            entry(1, Side::Player, 10, 0),
            entry(2, Side::Enemy, 10, 0),
            entry(3, Side::Player, 30, 0),
            entry(4, Side::Enemy, 5, 1),
            entry(5, Side::Player, 10, 0),
        ]);
        assert_eq!(order(&queue), vec![4, 3, 1, 5, 2]);
    }

    #[test]
    fn build_is_independent_of_input_order() {
        let entries = [
            entry(1, Side::Player, 12, 0),
            entry(2, Side::Enemy, 12, 0),
            entry(3, Side::Enemy, 15, 0),
        ];
        let mut reversed = entries;
        reversed.reverse();
        assert_eq!(TurnQueue::build(entries), TurnQueue::build(reversed));
    }

    #[test]
    fn advance_wraps_and_counts_rounds() {
        let mut queue =
            TurnQueue::build([entry(1, Side::Player, 2, 0), entry(2, Side::Enemy, 1, 0)]);
        assert_eq!(queue.round(), 1);
        assert!(!queue.advance().unwrap());
        assert!(queue.advance().unwrap());
        assert_eq!(queue.round(), 2);
        assert_eq!(queue.current().unwrap().actor, CombatantId(1));
    }

    #[test]
    fn empty_queue_is_an_error() {
        let mut queue = TurnQueue::build([]);
        assert_eq!(queue.current(), Err(SchedulerError::EmptyQueue));
        assert_eq!(queue.advance(), Err(SchedulerError::EmptyQueue));
    }

    #[test]
    fn rebuild_keeps_cursor_on_next_living_actor() {
        let a = entry(1, Side::Player, 30, 0);
        let b = entry(2, Side::Enemy, 20, 0);
        let c = entry(3, Side::Enemy, 10, 0);
        let mut queue = TurnQueue::build([a, b, c]);
        queue.advance().unwrap();
        assert_eq!(queue.current().unwrap().actor, CombatantId(2));

        // #2 faints before acting: #3 is next.
        queue.rebuild([a, c]);
        assert_eq!(queue.current().unwrap().actor, CombatantId(3));
        assert_eq!(queue.round(), 1);
        queue.validate(&[CombatantId(1), CombatantId(3)]).unwrap();
    }

    #[test]
    fn rebuild_that_wraps_starts_next_round() {
        let a = entry(1, Side::Player, 30, 0);
        let b = entry(2, Side::Enemy, 20, 0);
        let mut queue = TurnQueue::build([a, b]);
        queue.advance().unwrap();

        queue.rebuild([a]);
        assert_eq!(queue.current().unwrap().actor, CombatantId(1));
        assert_eq!(queue.round(), 2);
    }

    #[test]
    fn validate_detects_missing_and_stale() {
        let queue = TurnQueue::build([entry(1, Side::Player, 1, 0), entry(2, Side::Enemy, 1, 0)]);
        assert_eq!(
            queue.validate(&[CombatantId(1)]),
            Err(SchedulerError::Stale(CombatantId(2)))
        );
        assert_eq!(
            queue.validate(&[CombatantId(1), CombatantId(2), CombatantId(3)]),
            Err(SchedulerError::Missing(CombatantId(3)))
        );
    }
}
