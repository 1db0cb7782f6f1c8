use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_STONE: u8 = 21;
pub const MAX_STONE: u8 = 36;
pub const STONE_COUNT: usize = 16;

/// Numbers and worm values of every stone in a fresh game.
pub const STONE_TABLE: [(u8, u8); STONE_COUNT] = [
    (21, 1),
    (22, 1),
    (23, 1),
    (24, 1),
    (25, 2),
    (26, 2),
    (27, 2),
    (28, 2),
    (29, 3),
    (30, 3),
    (31, 3),
    (32, 3),
    (33, 4),
    (34, 4),
    (35, 4),
    (36, 4),
];

/// A numbered stone worth some worms at the end of the game.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Stone {
    number: u8,
    worms: u8,
}

impl Stone {
    pub fn new(number: u8, worms: u8) -> Self {
        Self { number, worms }
    }

    /// Looks up the stone carrying `number` in the standard table.
    pub fn from_number(number: u8) -> Option<Self> {
        STONE_TABLE
            .iter()
            .find(|(n, _)| *n == number)
            .map(|&(n, w)| Self::new(n, w))
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    #[inline]
    pub fn worms(&self) -> u8 {
        self.worms
    }
}

impl Ord for Stone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then(self.worms.cmp(&other.worms))
    }
}

impl PartialOrd for Stone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.number, self.worms)
    }
}

/// Builds the full sixteen-stone bank in ascending order.
pub fn full_bank() -> Vec<Stone> {
    STONE_TABLE
        .iter()
        .map(|&(number, worms)| Stone::new(number, worms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_is_sorted_and_complete() {
        let bank = full_bank();
        assert_eq!(bank.len(), STONE_COUNT);
        assert!(bank.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(bank.first().map(Stone::number), Some(MIN_STONE));
        assert_eq!(bank.last().map(Stone::number), Some(MAX_STONE));
        let worms: u32 = bank.iter().map(|s| s.worms() as u32).sum();
        assert_eq!(worms, 40);
    }

    #[test]
    fn lookup_by_number() {
        assert_eq!(Stone::from_number(29), Some(Stone::new(29, 3)));
        assert_eq!(Stone::from_number(20), None);
    }
}
