use thiserror::Error;

use crate::action::PlayerId;
use crate::dice::DieFace;

/// Errors that can occur when manipulating the game state.
///
/// Everything here indicates either bad configuration or a broken invariant.
/// Forced losses are regular turn outcomes and never surface as errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("invalid dice selection: {0}")]
    InvalidSelection(#[from] InvalidSelection),
    #[error("stone {0} is not in the bank")]
    StoneNotInBank(u8),
    #[error("no opponent exposes stone {0}")]
    StoneNotExposed(u8),
    #[error("encountered a die that has not been rolled")]
    UnrolledDie,
    #[error("requested {requested} dice but only {available} are in the pool")]
    NotEnoughDice { requested: usize, available: usize },
    #[error("turn has already finished")]
    TurnFinished,
    #[error("no legal actions available")]
    NoLegalActions,
    #[error("session did not finish within {0} turns")]
    TurnLimitReached(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("unrecognized bot spec: {0}")]
    InvalidBotSpec(String),
}

/// Details of rejected dice selections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    #[error("face {0} has already been selected this turn")]
    FaceAlreadySelected(DieFace),
    #[error("no rolled die shows face {0}")]
    FaceNotRolled(DieFace),
}
