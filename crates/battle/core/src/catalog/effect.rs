//! Effect definitions: the atomic building block of abilities and auras.

/// The combatant stat an effect modifies.
///
/// Definition data referring to any other stat name fails to parse, which
/// keeps "unsupported effect type" unrepresentable after load.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    /// Hit points: damage when the amount is negative, healing when positive.
    Hp,
    /// Agility: feeds the turn clock and the crit formula. Changing it
    /// invalidates the scheduler's look-ahead.
    Agility,
}

/// A single, immediate stat change.
///
/// Definitions are immutable and shared by reference across many abilities
/// and auras; identity is the (case-insensitive) name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDef {
    pub name: String,
    pub stat: StatKind,
    /// Negative for damage/penalties, positive for heals/buffs.
    pub amount: i32,
    /// Fraction of the source's strength added to the magnitude, always in
    /// the effect's own direction: heals grow, damage goes further negative.
    pub strength_scaling: f32,
    pub can_crit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn stat_kind_parses_case_insensitively() {
        assert_eq!(StatKind::from_str("hp").unwrap(), StatKind::Hp);
        assert_eq!(StatKind::from_str("HP").unwrap(), StatKind::Hp);
        assert_eq!(StatKind::from_str("Agility").unwrap(), StatKind::Agility);
        assert!(StatKind::from_str("charisma").is_err());
    }
}
