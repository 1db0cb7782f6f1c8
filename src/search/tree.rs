//! Arena-backed simulation tree.
//!
//! Node 0 is the synthetic start node. Its children are the candidate first
//! actions; leaves carry the terminal score of a simulated turn.

use crate::action::PlayerAction;

pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Start,
    /// An action taken in a branch. `candidate` is the index of the action in
    /// the list it was chosen from.
    Action {
        action: PlayerAction,
        candidate: usize,
    },
    /// End of a simulated turn.
    Terminal { gained: bool },
}

#[derive(Clone, Debug)]
pub struct SimNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub score: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct SimulationTree {
    nodes: Vec<SimNode>,
}

impl SimulationTree {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![SimNode {
                kind: NodeKind::Start,
                parent: None,
                children: Vec::new(),
                depth: 0,
                score: None,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the start node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SimNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Score of a node as read by its parent; unscored nodes count as zero.
    pub fn score(&self, id: NodeId) -> f64 {
        self.nodes[id].score.unwrap_or(0.0)
    }

    pub fn add_action(&mut self, parent: NodeId, action: PlayerAction, candidate: usize) -> NodeId {
        self.push(parent, NodeKind::Action { action, candidate }, None)
    }

    pub fn add_leaf(&mut self, parent: NodeId, score: f64, gained: bool) -> NodeId {
        self.push(parent, NodeKind::Terminal { gained }, Some(score))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind, score: Option<f64>) -> NodeId {
        let id = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(SimNode {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            depth,
            score,
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Leaf-to-root pass: every internal node's score becomes the sum of its
    /// children's scores, each divided by the number of children.
    ///
    /// Nodes are visited deepest first, so each parent reads finished children.
    /// Running it again on a scored tree changes nothing.
    pub fn propagate_scores(&mut self) {
        let mut order: Vec<NodeId> = (0..self.nodes.len()).collect();
        order.sort_by(|a, b| self.nodes[*b].depth.cmp(&self.nodes[*a].depth));
        for id in order {
            let children = &self.nodes[id].children;
            if children.is_empty() {
                continue;
            }
            let share = children.len() as f64;
            let total: f64 = children.iter().map(|child| self.score(*child) / share).sum();
            self.nodes[id].score = Some(total);
        }
    }

    /// `(candidate, score)` for each direct child of the start node.
    pub fn candidate_scores(&self) -> Vec<(usize, f64)> {
        self.children(Self::ROOT)
            .iter()
            .filter_map(|id| match self.nodes[*id].kind {
                NodeKind::Action { candidate, .. } => Some((candidate, self.score(*id))),
                _ => None,
            })
            .collect()
    }
}

impl Default for SimulationTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SimulationTree {
        // start
        // ├── roll ── pick ── leaf 4
        // │       └── leaf 0
        // └── take ── leaf 2
        let mut tree = SimulationTree::new();
        let roll = tree.add_action(SimulationTree::ROOT, PlayerAction::RollDice, 0);
        let take = tree.add_action(SimulationTree::ROOT, PlayerAction::TakeStone, 1);
        let pick = tree.add_action(roll, PlayerAction::TakeStoneWithValue(25), 0);
        tree.add_leaf(pick, 4.0, true);
        tree.add_leaf(roll, 0.0, false);
        tree.add_leaf(take, 2.0, true);
        tree
    }

    #[test]
    fn scores_are_shared_among_children() {
        let mut tree = sample_tree();
        tree.propagate_scores();
        assert_eq!(tree.score(3), 4.0);
        assert_eq!(tree.score(1), 2.0);
        assert_eq!(tree.score(2), 2.0);
        assert_eq!(tree.score(SimulationTree::ROOT), 2.0);
        assert_eq!(tree.candidate_scores(), vec![(0, 2.0), (1, 2.0)]);
    }

    #[test]
    fn propagation_is_idempotent() {
        let mut tree = sample_tree();
        tree.propagate_scores();
        let first: Vec<f64> = (0..tree.len()).map(|id| tree.score(id)).collect();
        tree.propagate_scores();
        let second: Vec<f64> = (0..tree.len()).map(|id| tree.score(id)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn depths_follow_parents() {
        let tree = sample_tree();
        assert_eq!(tree.node(SimulationTree::ROOT).depth, 0);
        assert_eq!(tree.node(3).depth, 2);
        assert_eq!(tree.node(4).depth, 3);
        assert_eq!(tree.node(4).parent, Some(3));
    }
}
