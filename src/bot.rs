use crate::action::PlayerAction;
use crate::error::GameError;
use crate::game::Game;
use crate::turn::{Turn, TurnOutcome, TurnStep};

/// Interface for defining Rain Worms bots.
///
/// `select_action` is called once per suspension of the turn and must return a
/// member of `legal_actions`. The game is shared read-only; bots that want to
/// look ahead copy it.
pub trait Bot {
    /// Stable display name used when reporting results.
    fn name(&self) -> &str;

    fn select_action(
        &mut self,
        game: &Game,
        turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError>;

    /// Plays the current player's turn to completion.
    fn play_turn(&mut self, game: &mut Game) -> Result<TurnOutcome, GameError> {
        let (mut turn, mut step) = game.start_turn()?;
        loop {
            match step {
                TurnStep::Done(outcome) => return Ok(outcome),
                TurnStep::Suspended(legal) => {
                    let action = self.select_action(game, &turn, &legal)?;
                    step = turn.advance(game, &action)?;
                }
            }
        }
    }
}

/// Plays turns until the bank is empty and returns the final worm totals,
/// ordered by player index. `bots[i]` plays for player `i`.
///
/// Fails with [`GameError::TurnLimitReached`] once the game's configured
/// `max_turns` have been played without emptying the bank.
pub fn play_session(game: &mut Game, bots: &mut [Box<dyn Bot>]) -> Result<Vec<u32>, GameError> {
    if bots.len() != game.players().len() {
        return Err(GameError::InvalidConfiguration(
            "exactly one bot per player is required",
        ));
    }
    let max_turns = game.config().max_turns;
    let mut turns = 0;
    while !game.is_finished() {
        if turns == max_turns {
            return Err(GameError::TurnLimitReached(max_turns));
        }
        let current = game.current_player();
        bots[current].play_turn(game)?;
        game.advance_turn();
        turns += 1;
    }
    Ok(game.scores())
}

pub fn in_roll_take_phase(actions: &[PlayerAction]) -> bool {
    actions.iter().any(PlayerAction::is_roll_or_take)
}

pub fn in_pick_dice_phase(actions: &[PlayerAction]) -> bool {
    actions.iter().any(PlayerAction::is_pick)
}

pub fn in_take_steal_phase(actions: &[PlayerAction]) -> bool {
    actions.iter().any(PlayerAction::is_claim)
}
