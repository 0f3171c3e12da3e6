//! Canonical 5-minute sampling grid.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Minutes between two consecutive slots.
pub const SLOT_STEP_MINUTES: u32 = 5;

/// Number of slots in one day.
pub const SLOT_COUNT: usize = (24 * 60 / SLOT_STEP_MINUTES) as usize;

/// The 288 expected `HH:MM` time-of-day slots, `00:00` through `23:55`.
#[derive(Debug)]
pub struct SlotGrid {
    slots: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SlotGrid {
    fn build() -> Self {
        let slots: Vec<String> = (0..SLOT_COUNT as u32)
            .map(|index| index * SLOT_STEP_MINUTES)
            .map(|minutes| format!("{:02}:{:02}", minutes / 60, minutes % 60))
            .collect();
        let positions = slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (slot.clone(), index))
            .collect();
        Self { slots, positions }
    }

    /// Shared grid, built on first use.
    pub fn canonical() -> &'static Self {
        static GRID: OnceLock<SlotGrid> = OnceLock::new();
        GRID.get_or_init(Self::build)
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Literal string match; `"0:05"` or `"00:01"` are not slots.
    pub fn position(&self, time: &str) -> Option<usize> {
        self.positions.get(time).copied()
    }

    pub fn contains(&self, time: &str) -> bool {
        self.positions.contains_key(time)
    }
}

/// Ordered canonical slots.
pub fn canonical_slots() -> &'static [String] {
    SlotGrid::canonical().slots()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_288_ascending_slots() {
        let slots = canonical_slots();
        assert_eq!(slots.len(), 288);
        assert_eq!(slots.first().map(String::as_str), Some("00:00"));
        assert_eq!(slots.last().map(String::as_str), Some("23:55"));
        assert!(slots.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn membership_is_literal() {
        let grid = SlotGrid::canonical();
        assert_eq!(grid.position("01:00"), Some(12));
        assert!(grid.contains("23:55"));
        assert!(!grid.contains("00:01"));
        assert!(!grid.contains("0:05"));
        assert!(!grid.contains("24:00"));
    }
}
