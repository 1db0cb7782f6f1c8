pub mod greedy;
pub mod random;
pub mod registry;
pub mod tree;

pub use greedy::{GreedyBot, StonePreference};
pub use random::RandomBot;
pub use registry::{create_bot_from_spec, label_for_spec};
pub use tree::{ExhaustiveTreeBot, SampledTreeBot};
