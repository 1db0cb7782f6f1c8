use std::collections::HashSet;
use std::fmt;

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::action::{PlayerAction, PlayerId};
use crate::dice::{DEFAULT_DICE, Die, DieFace, MAX_DICE};
use crate::error::GameError;
use crate::player::Player;
use crate::stone::{Stone, full_bank};
use crate::turn::{Turn, TurnStep};

const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 7;
/// Turns a session may last before it is abandoned.
pub const DEFAULT_MAX_TURNS: usize = 10_000;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub num_dice: usize,
    pub seed: u64,
    /// When set, claiming a stone requires at least one Worm among the kept dice.
    pub require_worm: bool,
    /// Upper bound on turns per session; reaching it is reported as an error.
    pub max_turns: usize,
}

impl GameConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, GameError> {
        let config = Self {
            num_players,
            num_dice: DEFAULT_DICE,
            seed,
            require_worm: false,
            max_turns: DEFAULT_MAX_TURNS,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(GameError::InvalidConfiguration(
                "players must be between 2 and 7",
            ));
        }
        if !(1..=MAX_DICE).contains(&self.num_dice) {
            return Err(GameError::InvalidConfiguration(
                "dice count must be between 1 and 16",
            ));
        }
        if self.max_turns == 0 {
            return Err(GameError::InvalidConfiguration("max_turns must be positive"));
        }
        Ok(())
    }
}

/// Builder that enables deterministic setups for tests and experiments.
pub struct GameBuilder {
    config: GameConfig,
    bank: Option<Vec<Stone>>,
    player_stones: Vec<(PlayerId, Vec<Stone>)>,
}

impl GameBuilder {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        Ok(Self {
            config: GameConfig::new(num_players, DEFAULT_SEED)?,
            bank: None,
            player_stones: Vec::new(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_dice(mut self, num_dice: usize) -> Self {
        self.config.num_dice = num_dice;
        self
    }

    pub fn with_require_worm(mut self, require_worm: bool) -> Self {
        self.config.require_worm = require_worm;
        self
    }

    /// Replace the default sixteen-stone bank.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.config.max_turns = max_turns;
        self
    }

    pub fn with_bank(mut self, bank: Vec<Stone>) -> Self {
        self.bank = Some(bank);
        self
    }

    /// Pre-load a player's stack, bottom first.
    pub fn with_player_stones(mut self, player: PlayerId, stones: Vec<Stone>) -> Self {
        self.player_stones.push((player, stones));
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Serializable copy of everything in a game except its random source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub bank: Vec<Stone>,
    pub turned_stones: Vec<Stone>,
    pub players: Vec<Player>,
    pub dice_pool: Vec<Die>,
    pub current_player: PlayerId,
}

/// Shared table state: bank, turned pile, roster, dice pool and turn pointer.
///
/// Cloning yields a fully independent copy; search branches rely on this.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    bank: Vec<Stone>,
    turned: Vec<Stone>,
    players: Vec<Player>,
    dice: Vec<Die>,
    current_player: PlayerId,
    rng: StdRng,
}

impl Game {
    pub fn builder(num_players: usize) -> Result<GameBuilder, GameError> {
        GameBuilder::new(num_players)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder {
            config,
            bank: None,
            player_stones: Vec::new(),
        }
        .build()
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            bank,
            player_stones,
        } = builder;
        config.validate()?;

        let mut players: Vec<Player> = (0..config.num_players).map(Player::new).collect();
        for (id, stones) in player_stones {
            let player = players.get_mut(id).ok_or(GameError::InvalidPlayer(id))?;
            for stone in stones {
                player.give_stone(stone);
            }
        }

        let mut bank = bank.unwrap_or_else(full_bank);
        bank.sort();

        let mut seen = HashSet::new();
        let owned = players.iter().flat_map(|p| p.stones().iter());
        for stone in bank.iter().chain(owned) {
            if !seen.insert(stone.number()) {
                return Err(GameError::InvalidConfiguration(
                    "each stone number may appear only once",
                ));
            }
        }

        Ok(Self {
            config,
            bank,
            turned: Vec::new(),
            players,
            dice: vec![Die::new(); config.num_dice],
            current_player: 0,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Stones still available, ascending.
    pub fn bank(&self) -> &[Stone] {
        &self.bank
    }

    pub fn turned_stones(&self) -> &[Stone] {
        &self.turned
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id).ok_or(GameError::InvalidPlayer(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players.get_mut(id).ok_or(GameError::InvalidPlayer(id))
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn dice_pool(&self) -> &[Die] {
        &self.dice
    }

    /// The session ends once nothing is left in the bank.
    pub fn is_finished(&self) -> bool {
        self.bank.is_empty()
    }

    /// Final (or running) worm totals ordered by player index.
    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::score).collect()
    }

    /// Every stone in play or turned, sorted. Constant over the life of a game.
    pub fn all_stones(&self) -> Vec<Stone> {
        let mut stones: Vec<Stone> = self
            .bank
            .iter()
            .chain(self.turned.iter())
            .chain(self.players.iter().flat_map(|p| p.stones().iter()))
            .copied()
            .collect();
        stones.sort();
        stones
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            bank: self.bank.clone(),
            turned_stones: self.turned.clone(),
            players: self.players.clone(),
            dice_pool: self.dice.clone(),
            current_player: self.current_player,
        }
    }

    /// Independent copy of this game whose dice are driven by a fresh seed.
    pub fn fork(&self, seed: u64) -> Self {
        let mut game = self.clone();
        game.rng = StdRng::seed_from_u64(seed);
        game
    }

    /// Puts a stone back into the bank. A stone that does not become the new
    /// maximum flips the current maximum onto the turned pile, which is returned.
    pub fn return_stone_to_bank(&mut self, stone: Stone) -> Option<Stone> {
        self.bank.push(stone);
        self.bank.sort();
        let max = self.bank.last().copied()?;
        if stone.number() < max.number() {
            let flipped = self.bank.pop()?;
            self.turned.push(flipped);
            return Some(flipped);
        }
        None
    }

    pub fn take_stone_from_bank(&mut self, number: u8) -> Result<Stone, GameError> {
        let index = self
            .bank
            .iter()
            .position(|stone| stone.number() == number)
            .ok_or(GameError::StoneNotInBank(number))?;
        Ok(self.bank.remove(index))
    }

    /// Removes the exposed stone `number` from whichever opponent of the
    /// current player holds it on top.
    pub fn steal_stone_from_opponent(&mut self, number: u8) -> Result<Stone, GameError> {
        self.steal_from_opponents_of(self.current_player, number)
    }

    pub(crate) fn steal_from_opponents_of(
        &mut self,
        thief: PlayerId,
        number: u8,
    ) -> Result<Stone, GameError> {
        let victim = self
            .players
            .iter_mut()
            .filter(|p| p.id() != thief)
            .find(|p| p.top_stone().is_some_and(|s| s.number() == number))
            .ok_or(GameError::StoneNotExposed(number))?;
        victim
            .take_top_stone()
            .ok_or(GameError::StoneNotExposed(number))
    }

    /// Each opponent of `player` that currently exposes a top stone.
    pub fn other_top_stones(&self, player: PlayerId) -> Vec<(PlayerId, Stone)> {
        self.players
            .iter()
            .filter(|p| p.id() != player)
            .filter_map(|p| p.top_stone().map(|stone| (p.id(), stone)))
            .collect()
    }

    /// Take and steal actions open to `player` with the dice kept so far:
    /// bank stones up to the score, then opponents' top stones equal to it.
    pub fn claim_actions(&self, player: PlayerId) -> Result<Vec<PlayerAction>, GameError> {
        let state = self.player(player)?;
        if self.config.require_worm && !state.has_worm() {
            return Ok(Vec::new());
        }
        let score = state.selected_score();
        let takes = self
            .bank
            .iter()
            .filter(|stone| u32::from(stone.number()) <= score)
            .map(|stone| PlayerAction::TakeStoneWithValue(stone.number()));
        let steals = self
            .other_top_stones(player)
            .into_iter()
            .filter(|(_, stone)| u32::from(stone.number()) == score)
            .map(|(_, stone)| PlayerAction::StealStoneWithValue(stone.number()));
        Ok(takes.chain(steals).collect())
    }

    /// Rolls every die left in the pool and hands the result to `player`.
    pub fn roll_dice(&mut self, player: PlayerId) -> Result<(), GameError> {
        let mut dice = std::mem::take(&mut self.dice);
        for die in dice.iter_mut() {
            die.roll(&mut self.rng);
        }
        match self.players.get_mut(player) {
            Some(state) => {
                state.receive_roll(dice);
                Ok(())
            }
            None => {
                self.dice = dice;
                Err(GameError::InvalidPlayer(player))
            }
        }
    }

    /// Hands `player` a roll showing exactly `faces`, drawn from the pool.
    ///
    /// Any unresolved roll the player already holds goes back to the pool first.
    pub fn load_roll(&mut self, player: PlayerId, faces: &[DieFace]) -> Result<(), GameError> {
        let dice = self.draw_faces(player, faces)?;
        self.players[player].receive_roll(dice);
        Ok(())
    }

    /// Adds dice showing `faces` to the player's kept dice, drawn from the pool.
    pub fn load_selection(&mut self, player: PlayerId, faces: &[DieFace]) -> Result<(), GameError> {
        let dice = self.draw_faces(player, faces)?;
        self.players[player].receive_selection(dice);
        Ok(())
    }

    fn draw_faces(&mut self, player: PlayerId, faces: &[DieFace]) -> Result<Vec<Die>, GameError> {
        let available = self.dice.len() + self.player(player)?.rolled_dice().len();
        if faces.len() > available {
            return Err(GameError::NotEnoughDice {
                requested: faces.len(),
                available,
            });
        }
        let unresolved = self.players[player].take_rolled();
        self.dice.extend(unresolved);
        let remaining = self.dice.len() - faces.len();
        self.dice.truncate(remaining);
        Ok(faces.iter().copied().map(Die::with_face).collect())
    }

    /// Moves the rolled dice showing `face` into the player's kept dice.
    /// The rest of the roll returns to the pool for the next roll.
    pub fn pick_dice(&mut self, player: PlayerId, face: DieFace) -> Result<(), GameError> {
        let rest = self.player_mut(player)?.select_dice(face)?;
        self.dice.extend(rest.into_iter().map(|mut die| {
            die.reset();
            die
        }));
        Ok(())
    }

    /// The player surrenders their top stone, if any, back to the bank.
    /// Returns the surrendered stone and the stone it flipped out of play.
    pub fn lose_turn(&mut self, player: PlayerId) -> Result<(Option<Stone>, Option<Stone>), GameError> {
        let Some(stone) = self.player_mut(player)?.take_top_stone() else {
            return Ok((None, None));
        };
        let flipped = self.return_stone_to_bank(stone);
        debug!(
            "player {player} surrendered {stone}{}",
            flipped.map(|s| format!(", {s} turned")).unwrap_or_default()
        );
        Ok((Some(stone), flipped))
    }

    /// Collects the current player's dice, refreshes the pool and passes the turn.
    pub fn advance_turn(&mut self) {
        if let Some(player) = self.players.get_mut(self.current_player) {
            player.give_dice_back();
        }
        self.dice = vec![Die::new(); self.config.num_dice];
        self.current_player = (self.current_player + 1) % self.players.len();
    }

    /// Starts a fresh turn for the current player.
    pub fn start_turn(&mut self) -> Result<(Turn, TurnStep), GameError> {
        let current = self.current_player;
        Turn::start(self, current, None)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There are {} players in the game.", self.players.len())?;
        for player in &self.players {
            writeln!(f, "{player}")?;
        }
        writeln!(f, "The following stones are still available:")?;
        let bank: Vec<String> = self.bank.iter().map(Stone::to_string).collect();
        writeln!(f, "{}", bank.join(", "))?;
        write!(f, "It is player {}'s turn.", self.current_player)
    }
}
