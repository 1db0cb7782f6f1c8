use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const DEFAULT_DICE: usize = 8;
pub const MAX_DICE: usize = 16;

/// One of the six faces of a Rain Worms die.
///
/// Faces compare by identity; the declaration order doubles as the sort order
/// used when listing face counts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum DieFace {
    One,
    Two,
    Three,
    Four,
    Five,
    /// Worth five, and the only face that satisfies the worm requirement.
    Worm,
}

pub const ALL_FACES: [DieFace; 6] = [
    DieFace::One,
    DieFace::Two,
    DieFace::Three,
    DieFace::Four,
    DieFace::Five,
    DieFace::Worm,
];

impl DieFace {
    pub fn name(&self) -> &'static str {
        match self {
            DieFace::One => "⚀",
            DieFace::Two => "⚁",
            DieFace::Three => "⚂",
            DieFace::Four => "⚃",
            DieFace::Five => "⚄",
            DieFace::Worm => "Worm",
        }
    }

    /// Short label a console front-end can type to name this face.
    pub fn category(&self) -> &'static str {
        match self {
            DieFace::One => "1",
            DieFace::Two => "2",
            DieFace::Three => "3",
            DieFace::Four => "4",
            DieFace::Five => "5",
            DieFace::Worm => "W",
        }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        match self {
            DieFace::One => 1,
            DieFace::Two => 2,
            DieFace::Three => 3,
            DieFace::Four => 4,
            DieFace::Five | DieFace::Worm => 5,
        }
    }

    #[inline]
    pub fn is_worm(&self) -> bool {
        matches!(self, DieFace::Worm)
    }

    pub fn from_typed_name(name: &str) -> Option<Self> {
        let name = name.trim();
        ALL_FACES
            .iter()
            .copied()
            .find(|face| face.category().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single die. `None` means the die has not been rolled since its last reset.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Die {
    face: Option<DieFace>,
}

impl Die {
    pub fn new() -> Self {
        Self { face: None }
    }

    pub fn with_face(face: DieFace) -> Self {
        Self { face: Some(face) }
    }

    pub fn face(&self) -> Option<DieFace> {
        self.face
    }

    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DieFace {
        // ALL_FACES is non-empty, so `choose` always yields a face.
        let face = *ALL_FACES.choose(rng).unwrap_or(&DieFace::One);
        self.face = Some(face);
        face
    }

    pub fn reset(&mut self) {
        self.face = None;
    }
}

/// Counts how many dice show each face, sorted by face.
///
/// Fails if any die is unrolled: counting is only meaningful after a roll.
pub fn count_faces(dice: &[Die]) -> Result<Vec<(DieFace, usize)>, GameError> {
    let mut counts = [0usize; ALL_FACES.len()];
    for die in dice {
        let face = die.face().ok_or(GameError::UnrolledDie)?;
        counts[face as usize] += 1;
    }
    Ok(ALL_FACES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(face, count)| (*face, count))
        .collect())
}

/// Sum of face values over all rolled dice. Unrolled dice count as zero.
pub fn score(dice: &[Die]) -> u32 {
    dice.iter().filter_map(Die::face).map(|face| face.value()).sum()
}

pub fn contains_worm(dice: &[Die]) -> bool {
    dice.iter().any(|die| die.face().is_some_and(|face| face.is_worm()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn worm_counts_as_five() {
        let dice = [Die::with_face(DieFace::Worm), Die::with_face(DieFace::Three)];
        assert_eq!(score(&dice), 8);
        assert!(contains_worm(&dice));
    }

    #[test]
    fn count_faces_groups_and_sorts() {
        let dice = [
            Die::with_face(DieFace::Worm),
            Die::with_face(DieFace::Two),
            Die::with_face(DieFace::Worm),
        ];
        let counts = count_faces(&dice).expect("all dice rolled");
        assert_eq!(counts, vec![(DieFace::Two, 1), (DieFace::Worm, 2)]);
    }

    #[test]
    fn count_faces_rejects_unrolled_die() {
        let dice = [Die::with_face(DieFace::One), Die::new()];
        assert!(matches!(count_faces(&dice), Err(GameError::UnrolledDie)));
    }

    #[test]
    fn roll_always_lands_on_a_face() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut die = Die::new();
        for _ in 0..100 {
            let face = die.roll(&mut rng);
            assert_eq!(die.face(), Some(face));
        }
        die.reset();
        assert_eq!(die.face(), None);
    }

    #[test]
    fn typed_names_round_trip() {
        for face in ALL_FACES {
            assert_eq!(DieFace::from_typed_name(face.category()), Some(face));
        }
        assert_eq!(DieFace::from_typed_name("w"), Some(DieFace::Worm));
        assert_eq!(DieFace::from_typed_name("6"), None);
    }
}
