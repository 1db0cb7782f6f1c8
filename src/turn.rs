//! Turn engine: an explicit state machine that suspends at every decision.
//!
//! A turn is driven by repeatedly handing one of the pending legal actions to
//! [`Turn::advance`]. Each call either suspends again with a fresh, non-empty
//! list of legal actions or finishes with a [`TurnOutcome`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::action::{PlayerAction, PlayerId};
use crate::error::GameError;
use crate::game::Game;
use crate::stone::Stone;

/// Phase of a turn. Search branches use it to resume a copied turn mid-way.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Choose between rolling again and claiming a stone.
    RollOrTake,
    /// Roll the pool (or reuse an unresolved roll).
    RollDice,
    /// Choose which face of the roll to keep.
    PickDiceSet,
    /// Work out which stones can be claimed.
    TakeStone,
    /// Choose which stone to take or steal.
    SelectAStone,
}

/// How a turn ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// The player claimed `stone`; `score` is their worm total afterwards.
    Gained { stone: Stone, score: u32 },
    /// The player lost the turn, surrendering `returned` (if they had a stone)
    /// which in turn may have flipped `turned` out of play.
    Lost {
        returned: Option<Stone>,
        turned: Option<Stone>,
        score: u32,
    },
}

impl TurnOutcome {
    pub fn is_gain(&self) -> bool {
        matches!(self, TurnOutcome::Gained { .. })
    }

    /// The player's worm total once the turn is over.
    pub fn score(&self) -> u32 {
        match self {
            TurnOutcome::Gained { score, .. } | TurnOutcome::Lost { score, .. } => *score,
        }
    }

    /// Change in the player's worm total caused by this turn.
    pub fn score_delta(&self) -> i32 {
        match self {
            TurnOutcome::Gained { stone, .. } => i32::from(stone.worms()),
            TurnOutcome::Lost { returned, .. } => {
                -returned.map(|s| i32::from(s.worms())).unwrap_or(0)
            }
        }
    }
}

/// Result of starting or advancing a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnStep {
    Suspended(Vec<PlayerAction>),
    Done(TurnOutcome),
}

/// Resumable turn context. The dice themselves live on the player inside
/// [`Game`]; the turn only remembers where it is and what it offered.
#[derive(Clone, Debug)]
pub struct Turn {
    player: PlayerId,
    phase: TurnPhase,
    pending: Vec<PlayerAction>,
    outcome: Option<TurnOutcome>,
}

impl Turn {
    /// Starts (or resumes) a turn for `player`, running until the first
    /// suspension point. `phase` defaults to [`TurnPhase::RollOrTake`].
    ///
    /// Resuming in [`TurnPhase::PickDiceSet`] offers the player's unresolved
    /// roll again, and [`TurnPhase::SelectAStone`] recomputes the claims, so a
    /// copied game re-enters the exact decision it was copied at.
    pub fn start(
        game: &mut Game,
        player: PlayerId,
        phase: Option<TurnPhase>,
    ) -> Result<(Self, TurnStep), GameError> {
        game.player(player)?;
        let phase = phase.unwrap_or(TurnPhase::RollOrTake);
        let mut turn = Self {
            player,
            phase,
            pending: Vec::new(),
            outcome: None,
        };
        let step = turn.enter(game, phase)?;
        Ok((turn, step))
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Phase whose actions are pending (or the last phase, once finished).
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn legal_actions(&self) -> &[PlayerAction] {
        &self.pending
    }

    pub fn outcome(&self) -> Option<&TurnOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Applies one of the pending actions.
    ///
    /// An action that was not offered leaves everything untouched and the same
    /// list is offered again.
    pub fn advance(&mut self, game: &mut Game, action: &PlayerAction) -> Result<TurnStep, GameError> {
        if self.outcome.is_some() {
            return Err(GameError::TurnFinished);
        }
        if !self.pending.contains(action) {
            warn!("invalid selection '{action}' in phase {:?}", self.phase);
            return Ok(TurnStep::Suspended(self.pending.clone()));
        }
        match (self.phase, *action) {
            (TurnPhase::RollOrTake, PlayerAction::RollDice) => self.enter(game, TurnPhase::RollDice),
            (TurnPhase::RollOrTake, PlayerAction::TakeStone) => {
                self.enter(game, TurnPhase::TakeStone)
            }
            (TurnPhase::PickDiceSet, PlayerAction::PickDiceSet { face, .. }) => {
                game.pick_dice(self.player, face)?;
                self.enter(game, TurnPhase::RollOrTake)
            }
            (TurnPhase::SelectAStone, PlayerAction::TakeStoneWithValue(number)) => {
                let stone = game.take_stone_from_bank(number)?;
                self.gain(game, stone)
            }
            (TurnPhase::SelectAStone, PlayerAction::StealStoneWithValue(number)) => {
                let stone = game.steal_from_opponents_of(self.player, number)?;
                self.gain(game, stone)
            }
            (phase, action) => {
                warn!("action '{action}' does not belong to phase {phase:?}");
                Ok(TurnStep::Suspended(self.pending.clone()))
            }
        }
    }

    fn enter(&mut self, game: &mut Game, phase: TurnPhase) -> Result<TurnStep, GameError> {
        match phase {
            TurnPhase::RollOrTake => {
                let mut actions = vec![PlayerAction::RollDice];
                if !game.claim_actions(self.player)?.is_empty() {
                    actions.push(PlayerAction::TakeStone);
                }
                Ok(self.suspend(TurnPhase::RollOrTake, actions))
            }
            TurnPhase::RollDice | TurnPhase::PickDiceSet => self.roll(game),
            TurnPhase::TakeStone | TurnPhase::SelectAStone => {
                let actions = game.claim_actions(self.player)?;
                if actions.is_empty() {
                    warn!(
                        "player {} tried to take a stone while none could be claimed",
                        self.player
                    );
                    self.phase = TurnPhase::TakeStone;
                    let outcome = TurnOutcome::Lost {
                        returned: None,
                        turned: None,
                        score: game.player(self.player)?.score(),
                    };
                    return Ok(self.finish(outcome));
                }
                Ok(self.suspend(TurnPhase::SelectAStone, actions))
            }
        }
    }

    fn roll(&mut self, game: &mut Game) -> Result<TurnStep, GameError> {
        self.phase = TurnPhase::RollDice;
        if game.player(self.player)?.rolled_dice().is_empty() {
            game.roll_dice(self.player)?;
        }
        let options = game.player(self.player)?.selectable_faces()?;
        if options.is_empty() {
            debug!("player {} rolled nothing selectable", self.player);
            return self.lose(game);
        }
        let actions = options
            .into_iter()
            .map(|(face, count)| PlayerAction::PickDiceSet { face, count })
            .collect();
        Ok(self.suspend(TurnPhase::PickDiceSet, actions))
    }

    fn suspend(&mut self, phase: TurnPhase, actions: Vec<PlayerAction>) -> TurnStep {
        self.phase = phase;
        self.pending = actions.clone();
        TurnStep::Suspended(actions)
    }

    fn gain(&mut self, game: &mut Game, stone: Stone) -> Result<TurnStep, GameError> {
        let player = game.player_mut(self.player)?;
        player.give_stone(stone);
        let outcome = TurnOutcome::Gained {
            stone,
            score: player.score(),
        };
        debug!("player {} claimed {stone}", self.player);
        Ok(self.finish(outcome))
    }

    fn lose(&mut self, game: &mut Game) -> Result<TurnStep, GameError> {
        let (returned, turned) = game.lose_turn(self.player)?;
        let outcome = TurnOutcome::Lost {
            returned,
            turned,
            score: game.player(self.player)?.score(),
        };
        debug!("player {} lost the turn", self.player);
        Ok(self.finish(outcome))
    }

    fn finish(&mut self, outcome: TurnOutcome) -> TurnStep {
        self.pending.clear();
        self.outcome = Some(outcome.clone());
        TurnStep::Done(outcome)
    }
}
