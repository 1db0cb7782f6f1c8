use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::PlayerAction;
use crate::bot::Bot;
use crate::error::GameError;
use crate::game::Game;
use crate::turn::Turn;

/// Baseline bot that samples uniformly from the legal action set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn name(&self) -> &str {
        "RandomBot"
    }

    fn select_action(
        &mut self,
        _game: &Game,
        _turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError> {
        legal_actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoLegalActions)
    }
}
