use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::DieFace;

/// Zero-based index of a player within the game.
pub type PlayerId = usize;

/// Action available to a player at a suspension point of the turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Roll every die that is still in the pool.
    RollDice,
    /// Stop rolling and move on to claiming a stone.
    TakeStone,
    /// Take the stone with this number from the bank.
    TakeStoneWithValue(u8),
    /// Steal the exposed stone with this number from an opponent.
    StealStoneWithValue(u8),
    /// Keep every rolled die showing `face`; `count` is how many there are.
    PickDiceSet { face: DieFace, count: usize },
}

impl PlayerAction {
    pub fn is_roll_or_take(&self) -> bool {
        matches!(self, PlayerAction::RollDice | PlayerAction::TakeStone)
    }

    pub fn is_claim(&self) -> bool {
        matches!(
            self,
            PlayerAction::TakeStoneWithValue(_) | PlayerAction::StealStoneWithValue(_)
        )
    }

    pub fn is_pick(&self) -> bool {
        matches!(self, PlayerAction::PickDiceSet { .. })
    }

    /// Stone number named by a claim, if this is one.
    pub fn stone_number(&self) -> Option<u8> {
        match self {
            PlayerAction::TakeStoneWithValue(n) | PlayerAction::StealStoneWithValue(n) => Some(*n),
            _ => None,
        }
    }

    pub fn face(&self) -> Option<DieFace> {
        match self {
            PlayerAction::PickDiceSet { face, .. } => Some(*face),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::RollDice => write!(f, "Roll the dice."),
            PlayerAction::TakeStone => write!(f, "Take a stone."),
            PlayerAction::TakeStoneWithValue(n) => write!(f, "Take a stone with value {n}."),
            PlayerAction::StealStoneWithValue(n) => {
                write!(f, "Steal a stone from another player with value {n}.")
            }
            PlayerAction::PickDiceSet { face, count } => {
                write!(f, "Pick a set of {count} dice with face {face}.")
            }
        }
    }
}
