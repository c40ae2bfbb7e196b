//! Per-tile wager units

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Units wagered per tile index. Tiles with no units are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLedger {
    bets: BTreeMap<usize, u32>,
}

impl BetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit to a tile. Range and funds checks belong to the caller.
    pub fn add_unit(&mut self, tile_index: usize) -> u32 {
        let units = self.bets.entry(tile_index).or_insert(0);
        *units += 1;
        *units
    }

    pub fn clear(&mut self) {
        self.bets.clear();
    }

    pub fn units_for(&self, tile_index: usize) -> u32 {
        self.bets.get(&tile_index).copied().unwrap_or(0)
    }

    pub fn total_units(&self) -> u64 {
        self.bets.values().map(|&u| u as u64).sum()
    }

    /// Number of tiles carrying at least one unit
    pub fn active_tile_count(&self) -> usize {
        self.bets.len()
    }

    pub fn pending_bet_amount(&self, unit_value: u64) -> u64 {
        self.total_units().saturating_mul(unit_value)
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// `(tile_index, units)` in ascending tile order
    pub fn entries(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.bets.iter().map(|(&index, &units)| (index, units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ledger() {
        let ledger = BetLedger::new();
        assert_eq!(ledger.total_units(), 0);
        assert_eq!(ledger.active_tile_count(), 0);
        assert_eq!(ledger.pending_bet_amount(10), 0);
        assert_eq!(ledger.units_for(3), 0);
    }

    #[test]
    fn test_aggregates() {
        let mut ledger = BetLedger::new();
        ledger.add_unit(3);
        ledger.add_unit(3);
        ledger.add_unit(11);

        assert_eq!(ledger.units_for(3), 2);
        assert_eq!(ledger.units_for(11), 1);
        assert_eq!(ledger.total_units(), 3);
        assert_eq!(ledger.active_tile_count(), 2);
        assert_eq!(ledger.pending_bet_amount(10), 30);
        assert_eq!(ledger.entries().collect::<Vec<_>>(), vec![(3, 2), (11, 1)]);
    }

    #[test]
    fn test_clear() {
        let mut ledger = BetLedger::new();
        ledger.add_unit(0);
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_units(), 0);
    }
}
