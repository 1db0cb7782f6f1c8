use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::PlayerAction;
use crate::bot::{Bot, in_pick_dice_phase, in_roll_take_phase, in_take_steal_phase};
use crate::error::GameError;
use crate::game::Game;
use crate::turn::Turn;

pub const DEFAULT_THRESHOLD: usize = 3;
const STEAL_BONUS: u32 = 20;

/// How a greedy bot ranks the stones it may claim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StonePreference {
    /// Highest number wins, bank or opponent alike.
    Highest,
    /// Steals outrank any bank take; highest number within each kind.
    Stealing,
}

/// Greedy bot: keeps rolling until it has kept `threshold` distinct faces,
/// always keeps the most valuable face, and claims the best stone it can.
pub struct GreedyBot<R: Rng> {
    name: String,
    threshold: usize,
    preference: StonePreference,
    rng: R,
}

impl<R: Rng> GreedyBot<R> {
    pub fn new(threshold: usize, rng: R) -> Self {
        Self {
            name: format!("GreedyBot_{threshold}"),
            threshold,
            preference: StonePreference::Highest,
            rng,
        }
    }

    pub fn stealing(threshold: usize, rng: R) -> Self {
        Self {
            name: format!("GreedyStealingBot_{threshold}"),
            threshold,
            preference: StonePreference::Stealing,
            rng,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    fn dice_key(action: &PlayerAction) -> u32 {
        action
            .face()
            .map(|face| face.value() + u32::from(face.is_worm()))
            .unwrap_or(0)
    }

    fn stone_key(&self, action: &PlayerAction) -> u32 {
        match (self.preference, action) {
            (StonePreference::Stealing, PlayerAction::StealStoneWithValue(n)) => {
                u32::from(*n) + STEAL_BONUS
            }
            _ => action.stone_number().map(u32::from).unwrap_or(0),
        }
    }
}

impl<R: Rng> Bot for GreedyBot<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(
        &mut self,
        game: &Game,
        turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError> {
        if in_roll_take_phase(legal_actions) {
            let kept_faces = game.player(turn.player())?.selected_faces().len();
            if kept_faces >= self.threshold && legal_actions.contains(&PlayerAction::TakeStone) {
                return Ok(PlayerAction::TakeStone);
            }
            return Ok(PlayerAction::RollDice);
        }
        if in_pick_dice_phase(legal_actions) {
            return legal_actions
                .iter()
                .max_by_key(|a| Self::dice_key(a))
                .copied()
                .ok_or(GameError::NoLegalActions);
        }
        if in_take_steal_phase(legal_actions) {
            return legal_actions
                .iter()
                .max_by_key(|a| self.stone_key(a))
                .copied()
                .ok_or(GameError::NoLegalActions);
        }
        legal_actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoLegalActions)
    }
}
