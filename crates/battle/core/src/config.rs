/// Battle configuration constants and tunable parameters.
///
/// The crit constants and clock start value changed between historical
/// balance passes, so they are runtime data rather than hard-coded numbers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Value every combatant's turn clock is initialised to, and the base of
    /// each refill after a turn is scheduled.
    pub clock_start: i32,

    /// Number of look-ahead entries the turn queue is kept topped up to.
    pub turn_queue_size: usize,

    /// Base percentage chance an effect has to crit.
    pub base_crit_chance: f32,

    /// Amount the source's agility is scaled by before being added to the
    /// crit chance of an effect.
    pub crit_agility_scaling: f32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants in a single battle.
    pub const MAX_COMBATANTS: usize = 8;
    /// Maximum number of aura instances active on one combatant.
    pub const MAX_ACTIVE_AURAS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CLOCK_START: i32 = 100;
    pub const DEFAULT_TURN_QUEUE_SIZE: usize = 8;
    pub const DEFAULT_BASE_CRIT_CHANCE: f32 = 3.0;
    pub const DEFAULT_CRIT_AGILITY_SCALING: f32 = 0.3;

    pub fn new() -> Self {
        Self {
            clock_start: Self::DEFAULT_CLOCK_START,
            turn_queue_size: Self::DEFAULT_TURN_QUEUE_SIZE,
            base_crit_chance: Self::DEFAULT_BASE_CRIT_CHANCE,
            crit_agility_scaling: Self::DEFAULT_CRIT_AGILITY_SCALING,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
