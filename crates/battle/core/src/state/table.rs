//! Dense combatant table.

use super::combatant::{Allegiance, CombatantId, CombatantState};

/// All combatants in a battle, indexed by [`CombatantId`].
///
/// The table is fixed at setup: ids are indices into the backing vector and
/// stay valid for the whole battle. Death never removes an entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombatantTable {
    entries: Vec<CombatantState>,
}

impl CombatantTable {
    pub fn push(&mut self, combatant: CombatantState) {
        debug_assert_eq!(combatant.id.0 as usize, self.entries.len());
        self.entries.push(combatant);
    }

    pub fn get(&self, id: CombatantId) -> Option<&CombatantState> {
        self.entries.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut CombatantState> {
        self.entries.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantState> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatantState> {
        self.entries.iter_mut()
    }

    pub fn live(&self) -> impl Iterator<Item = &CombatantState> {
        self.entries.iter().filter(|c| c.is_alive())
    }

    pub fn live_side(&self, side: Allegiance) -> impl Iterator<Item = &CombatantState> {
        self.live().filter(move |c| c.allegiance == side)
    }

    pub fn live_heroes(&self) -> impl Iterator<Item = &CombatantState> {
        self.live_side(Allegiance::Hero)
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &CombatantState> {
        self.live_side(Allegiance::Enemy)
    }

    /// Case-insensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&CombatantState> {
        self.entries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
