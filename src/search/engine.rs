//! Clone-simulate-propagate search over a single turn.
//!
//! At a decision point every candidate action is tried `n_sims` times on an
//! independent copy of the game. Each copy is driven through the same turn
//! engine as real play; at every later suspension the copy is forked again per
//! explored action until the simulated turn ends. Leaf scores are propagated
//! to the root and aggregated per candidate.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::action::{PlayerAction, PlayerId};
use crate::error::GameError;
use crate::game::Game;
use crate::search::tree::{NodeId, SimulationTree};
use crate::turn::{Turn, TurnStep};

/// Which legal actions a branch explores at each suspension.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Branching {
    All,
    /// Sample this many actions uniformly without replacement.
    Sampled(usize),
}

/// How a finished branch is scored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LeafScoring {
    /// The acting player's worm total.
    Absolute,
    /// The acting player's worm total minus the sum of all opponents' totals.
    Relative,
}

/// How the root children belonging to one candidate are combined.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Aggregate {
    #[default]
    Max,
    Min,
    Mean,
    Sum,
}

impl Aggregate {
    pub fn apply(&self, scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        match self {
            Aggregate::Max => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Min => scores.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Sum => scores.iter().sum(),
            Aggregate::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
        }
    }
}

impl FromStr for Aggregate {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Aggregate::Max),
            "min" => Ok(Aggregate::Min),
            "mean" | "avg" => Ok(Aggregate::Mean),
            "sum" => Ok(Aggregate::Sum),
            other => Err(GameError::InvalidBotSpec(format!(
                "unknown aggregate method: {other}"
            ))),
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Mean => "mean",
            Aggregate::Sum => "sum",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Copies of each candidate first action, to damp the variance of later rolls.
    pub n_sims: usize,
    pub branching: Branching,
    pub leaf: LeafScoring,
    pub aggregate: Aggregate,
}

impl SearchConfig {
    pub fn exhaustive(n_sims: usize) -> Self {
        Self {
            n_sims,
            branching: Branching::All,
            leaf: LeafScoring::Absolute,
            aggregate: Aggregate::Max,
        }
    }

    pub fn sampled(n_random_actions: usize, n_sims: usize) -> Self {
        Self {
            n_sims,
            branching: Branching::Sampled(n_random_actions),
            leaf: LeafScoring::Relative,
            aggregate: Aggregate::Max,
        }
    }

    pub fn with_leaf(mut self, leaf: LeafScoring) -> Self {
        self.leaf = leaf;
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.n_sims == 0 {
            return Err(GameError::InvalidConfiguration("n_sims must be positive"));
        }
        if self.branching == Branching::Sampled(0) {
            return Err(GameError::InvalidConfiguration(
                "sampled search must explore at least one action",
            ));
        }
        Ok(())
    }
}

/// Reusable search engine. `rng` seeds every forked game and drives sampling.
pub struct TreeSearch<R: Rng> {
    config: SearchConfig,
    rng: R,
    forks: usize,
    last_tree: Option<SimulationTree>,
}

impl<R: Rng> TreeSearch<R> {
    pub fn new(config: SearchConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            forks: 0,
            last_tree: None,
        })
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Game copies made during the most recent decision.
    pub fn forks(&self) -> usize {
        self.forks
    }

    /// Tree built by the most recent decision; `None` if it was short-circuited.
    pub fn last_tree(&self) -> Option<&SimulationTree> {
        self.last_tree.as_ref()
    }

    /// Picks the candidate with the best aggregated propagated score.
    ///
    /// Any error raised inside a branch aborts the whole decision.
    pub fn decide(
        &mut self,
        game: &Game,
        turn: &Turn,
        legal_actions: &[PlayerAction],
    ) -> Result<PlayerAction, GameError> {
        self.forks = 0;
        self.last_tree = None;

        let mut candidates: Vec<PlayerAction> = Vec::with_capacity(legal_actions.len());
        for action in legal_actions {
            if !candidates.contains(action) {
                candidates.push(*action);
            }
        }
        match candidates.as_slice() {
            [] => return Err(GameError::NoLegalActions),
            [only] => {
                trace!("single legal action {only}, skipping simulation");
                return Ok(*only);
            }
            _ => {}
        }

        let mut tree = SimulationTree::new();
        for _ in 0..self.config.n_sims {
            for (candidate, action) in candidates.iter().enumerate() {
                let node = tree.add_action(SimulationTree::ROOT, *action, candidate);
                self.explore(&mut tree, node, game, turn, *action)?;
            }
        }
        tree.propagate_scores();

        let mut grouped: Vec<Vec<f64>> = vec![Vec::new(); candidates.len()];
        for (candidate, score) in tree.candidate_scores() {
            grouped[candidate].push(score);
        }
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (candidate, scores) in grouped.iter().enumerate() {
            let score = self.config.aggregate.apply(scores);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        let chosen = candidates[best];
        debug!(
            "tree search chose '{chosen}' ({} {best_score:.3}) over {} nodes",
            self.config.aggregate,
            tree.len()
        );
        self.last_tree = Some(tree);
        Ok(chosen)
    }

    /// Applies `action` to a fresh copy of `game` resumed at the turn's current
    /// phase, then recurses into whatever the copy offers next.
    fn explore(
        &mut self,
        tree: &mut SimulationTree,
        node: NodeId,
        game: &Game,
        turn: &Turn,
        action: PlayerAction,
    ) -> Result<(), GameError> {
        let mut branch = game.fork(self.rng.next_u64());
        self.forks += 1;
        let (mut branch_turn, _) = Turn::start(&mut branch, turn.player(), Some(turn.phase()))?;

        match branch_turn.advance(&mut branch, &action)? {
            TurnStep::Done(outcome) => {
                let score = self.leaf_score(&branch, turn.player())?;
                trace!("branch ended with {outcome:?}, leaf score {score}");
                tree.add_leaf(node, score, outcome.is_gain());
            }
            TurnStep::Suspended(legal) => {
                for (index, next) in self.branch_actions(&legal).into_iter().enumerate() {
                    let child = tree.add_action(node, next, index);
                    self.explore(tree, child, &branch, &branch_turn, next)?;
                }
            }
        }
        Ok(())
    }

    fn branch_actions(&mut self, legal: &[PlayerAction]) -> Vec<PlayerAction> {
        match self.config.branching {
            Branching::All => legal.to_vec(),
            Branching::Sampled(n) => legal
                .choose_multiple(&mut self.rng, n.min(legal.len()))
                .copied()
                .collect(),
        }
    }

    fn leaf_score(&self, game: &Game, player: PlayerId) -> Result<f64, GameError> {
        let own = f64::from(game.player(player)?.score());
        Ok(match self.config.leaf {
            LeafScoring::Absolute => own,
            LeafScoring::Relative => {
                own - game
                    .players()
                    .iter()
                    .filter(|p| p.id() != player)
                    .map(|p| f64::from(p.score()))
                    .sum::<f64>()
            }
        })
    }
}
