use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::dice::{self, Die, DieFace};
use crate::error::{GameError, InvalidSelection};
use crate::stone::Stone;

/// Per-player state: the stone stack plus the dice held during a turn.
///
/// `rolled` holds dice from the latest roll that have not been resolved by a
/// pick yet; `selected` holds every die kept so far this turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    stones: Vec<Stone>,
    selected: Vec<Die>,
    rolled: Vec<Die>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self::with_stones(id, Vec::new())
    }

    pub fn with_stones(id: PlayerId, stones: Vec<Stone>) -> Self {
        Self {
            id,
            stones,
            selected: Vec::new(),
            rolled: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Owned stones, bottom first.
    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    pub fn top_stone(&self) -> Option<Stone> {
        self.stones.last().copied()
    }

    /// Total worms across owned stones.
    pub fn score(&self) -> u32 {
        self.stones.iter().map(|stone| stone.worms() as u32).sum()
    }

    pub fn selected_dice(&self) -> &[Die] {
        &self.selected
    }

    pub fn rolled_dice(&self) -> &[Die] {
        &self.rolled
    }

    pub fn selected_score(&self) -> u32 {
        dice::score(&self.selected)
    }

    pub fn has_worm(&self) -> bool {
        dice::contains_worm(&self.selected)
    }

    /// Distinct faces kept so far this turn, in face order.
    pub fn selected_faces(&self) -> Vec<DieFace> {
        let mut faces: Vec<DieFace> = self.selected.iter().filter_map(Die::face).collect();
        faces.sort();
        faces.dedup();
        faces
    }

    pub fn has_selected(&self, face: DieFace) -> bool {
        self.selected.iter().any(|die| die.face() == Some(face))
    }

    /// Faces of the current roll that may still be picked, with their counts.
    pub fn selectable_faces(&self) -> Result<Vec<(DieFace, usize)>, GameError> {
        Ok(dice::count_faces(&self.rolled)?
            .into_iter()
            .filter(|(face, _)| !self.has_selected(*face))
            .collect())
    }

    pub fn give_stone(&mut self, stone: Stone) {
        self.stones.push(stone);
    }

    pub fn take_top_stone(&mut self) -> Option<Stone> {
        self.stones.pop()
    }

    pub(crate) fn receive_roll(&mut self, dice: Vec<Die>) {
        self.rolled = dice;
    }

    pub(crate) fn take_rolled(&mut self) -> Vec<Die> {
        std::mem::take(&mut self.rolled)
    }

    pub(crate) fn receive_selection(&mut self, dice: Vec<Die>) {
        self.selected.extend(dice);
    }

    /// Keeps every rolled die showing `face` and hands back the rest of the roll.
    ///
    /// Nothing changes when the selection is rejected.
    pub fn select_dice(&mut self, face: DieFace) -> Result<Vec<Die>, GameError> {
        if self.has_selected(face) {
            return Err(InvalidSelection::FaceAlreadySelected(face).into());
        }
        if !self.rolled.iter().any(|die| die.face() == Some(face)) {
            return Err(InvalidSelection::FaceNotRolled(face).into());
        }
        let (kept, rest): (Vec<Die>, Vec<Die>) = std::mem::take(&mut self.rolled)
            .into_iter()
            .partition(|die| die.face() == Some(face));
        self.selected.extend(kept);
        Ok(rest)
    }

    /// Empties both dice pools, returning the dice so they can go back to the game.
    pub fn give_dice_back(&mut self) -> Vec<Die> {
        let mut dice = std::mem::take(&mut self.selected);
        dice.append(&mut self.rolled);
        dice
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers: Vec<u8> = self.stones.iter().map(Stone::number).collect();
        write!(
            f,
            "Player {} has a score of {}, with stones {:?}.",
            self.id,
            self.score(),
            numbers
        )?;
        if let Some(top) = self.top_stone() {
            write!(f, " The top stone is {}.", top.number())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolled(player: &mut Player, faces: &[DieFace]) {
        player.receive_roll(faces.iter().copied().map(Die::with_face).collect());
    }

    #[test]
    fn select_keeps_matching_dice_and_returns_rest() {
        let mut player = Player::new(0);
        rolled(&mut player, &[DieFace::Worm, DieFace::Two, DieFace::Worm]);
        let rest = player.select_dice(DieFace::Worm).expect("worm was rolled");
        assert_eq!(rest, vec![Die::with_face(DieFace::Two)]);
        assert_eq!(player.selected_score(), 10);
        assert!(player.rolled_dice().is_empty());
        assert!(player.has_worm());
    }

    #[test]
    fn selecting_a_face_twice_is_rejected() {
        let mut player = Player::new(0);
        rolled(&mut player, &[DieFace::Three]);
        player.select_dice(DieFace::Three).expect("three was rolled");
        rolled(&mut player, &[DieFace::Three, DieFace::One]);
        let err = player.select_dice(DieFace::Three).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidSelection(InvalidSelection::FaceAlreadySelected(DieFace::Three))
        ));
        assert_eq!(player.rolled_dice().len(), 2);
        assert_eq!(
            player.selectable_faces().expect("rolled"),
            vec![(DieFace::One, 1)]
        );
    }

    #[test]
    fn score_sums_worms_on_stones() {
        let player = Player::with_stones(1, vec![Stone::new(21, 1), Stone::new(36, 4)]);
        assert_eq!(player.score(), 5);
        assert_eq!(player.top_stone(), Some(Stone::new(36, 4)));
    }
}
