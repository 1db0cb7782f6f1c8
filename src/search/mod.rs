//! Look-ahead machinery shared by the tree-search bots.

pub mod engine;
pub mod tree;

pub use engine::{Aggregate, Branching, LeafScoring, SearchConfig, TreeSearch};
pub use tree::{NodeId, NodeKind, SimNode, SimulationTree};
