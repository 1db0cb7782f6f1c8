use rand::Rng;

use crate::action::PlayerAction;
use crate::bot::Bot;
use crate::error::GameError;
use crate::game::Game;
use crate::search::{Aggregate, LeafScoring, SearchConfig, TreeSearch};
use crate::turn::Turn;

pub const DEFAULT_SIMS: usize = 5;
pub const DEFAULT_MC_SIMS: usize = 10;
pub const DEFAULT_RANDOM_ACTIONS: usize = 1;

/// Explores every legal action at every suspension of the simulated turn.
pub struct ExhaustiveTreeBot<R: Rng> {
    name: String,
    search: TreeSearch<R>,
}

impl<R: Rng> ExhaustiveTreeBot<R> {
    pub fn new(aggregate: Aggregate, n_sims: usize, rng: R) -> Result<Self, GameError> {
        let config = SearchConfig::exhaustive(n_sims).with_aggregate(aggregate);
        Ok(Self {
            name: String::from("TreeBot"),
            search: TreeSearch::new(config, rng)?,
        })
    }

    /// Same search, but leaves are scored against the opponents' totals.
    pub fn relative(aggregate: Aggregate, n_sims: usize, rng: R) -> Result<Self, GameError> {
        let config = SearchConfig::exhaustive(n_sims)
            .with_aggregate(aggregate)
            .with_leaf(LeafScoring::Relative);
        Ok(Self {
            name: String::from("TreeBotRelative"),
            search: TreeSearch::new(config, rng)?,
        })
    }

    pub fn search(&self) -> &TreeSearch<R> {
        &self.search
    }
}

impl<R: Rng> Bot for ExhaustiveTreeBot<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(
        &mut self,
        game: &Game,
        turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError> {
        self.search.decide(game, turn, legal_actions)
    }
}

/// Monte Carlo variant: samples `n_random_actions` per suspension and scores
/// leaves relative to the opponents.
pub struct SampledTreeBot<R: Rng> {
    search: TreeSearch<R>,
}

impl<R: Rng> SampledTreeBot<R> {
    pub fn new(
        aggregate: Aggregate,
        n_random_actions: usize,
        n_sims: usize,
        rng: R,
    ) -> Result<Self, GameError> {
        let config = SearchConfig::sampled(n_random_actions, n_sims).with_aggregate(aggregate);
        Ok(Self {
            search: TreeSearch::new(config, rng)?,
        })
    }

    pub fn search(&self) -> &TreeSearch<R> {
        &self.search
    }
}

impl<R: Rng> Bot for SampledTreeBot<R> {
    fn name(&self) -> &str {
        "MCTreeBotRelative"
    }

    fn select_action(
        &mut self,
        game: &Game,
        turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError> {
        self.search.decide(game, turn, legal_actions)
    }
}
