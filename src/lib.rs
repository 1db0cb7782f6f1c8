//! Rain Worms game engine: a resumable turn state machine plus heuristic and
//! tree-search bots that drive it.

pub mod action;
pub mod bot;
pub mod bots;
pub mod dice;
pub mod error;
pub mod game;
pub mod player;
pub mod search;
pub mod stone;
pub mod turn;

pub use crate::action::{PlayerAction, PlayerId};
pub use crate::bot::{Bot, play_session};
pub use crate::bots::{
    ExhaustiveTreeBot, GreedyBot, RandomBot, SampledTreeBot, create_bot_from_spec, label_for_spec,
};
pub use crate::dice::{ALL_FACES, Die, DieFace};
pub use crate::error::{GameError, InvalidSelection};
pub use crate::game::{Game, GameBuilder, GameConfig, GameSnapshot};
pub use crate::player::Player;
pub use crate::search::{Aggregate, Branching, LeafScoring, SearchConfig, TreeSearch};
pub use crate::stone::Stone;
pub use crate::turn::{Turn, TurnOutcome, TurnPhase, TurnStep};
