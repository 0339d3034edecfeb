//! Turn scheduling state: speed clocks, the look-ahead queue and its
//! clock snapshots.

use std::collections::{BTreeMap, VecDeque};

use super::combatant::CombatantId;

/// Scheduler state for one battle.
///
/// `queue` holds upcoming actors; its head is the combatant whose turn is
/// currently in progress, identified by the monotone counter `current_turn`.
/// Entry `i` of the queue belongs to turn `current_turn + i`, and
/// `snapshots` keeps, for each queued turn number, the clock vector as it
/// stood right after that entry was generated. Rebuilds after a death or an
/// agility change restore the snapshot of the in-progress turn and
/// regenerate everything behind it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnQueueState {
    /// One clock per combatant, indexed by id. A turn is due when the clock
    /// reaches zero or below.
    pub clocks: Vec<i32>,
    pub queue: VecDeque<CombatantId>,
    pub snapshots: BTreeMap<u64, Vec<i32>>,
    /// Monotone turn counter of the queue head. Starts at zero and only
    /// ever increments.
    pub current_turn: u64,
    /// Turn number the next generated entry will receive. Always
    /// `current_turn + queue.len()`.
    pub next_turn: u64,
    /// Set once the current actor's auras have ticked this turn; actions may
    /// only resolve afterwards.
    pub auras_resolved: bool,
}

impl TurnQueueState {
    pub fn new(combatant_count: usize, clock_start: i32) -> Self {
        Self {
            clocks: vec![clock_start; combatant_count],
            queue: VecDeque::new(),
            snapshots: BTreeMap::new(),
            current_turn: 0,
            next_turn: 0,
            auras_resolved: false,
        }
    }

    /// The combatant whose turn is in progress.
    pub fn head(&self) -> Option<CombatantId> {
        self.queue.front().copied()
    }

    /// Upcoming actors in order, starting with the current one.
    pub fn preview(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.queue.iter().copied()
    }
}
