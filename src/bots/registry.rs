use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bot::Bot;
use crate::bots::greedy::DEFAULT_THRESHOLD;
use crate::bots::tree::{DEFAULT_MC_SIMS, DEFAULT_RANDOM_ACTIONS, DEFAULT_SIMS};
use crate::bots::{ExhaustiveTreeBot, GreedyBot, RandomBot, SampledTreeBot};
use crate::dice::ALL_FACES;
use crate::error::GameError;
use crate::search::Aggregate;

/// Returns a normalized label for a bot spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs:
/// - random[:seed]
/// - greedy[:threshold]
/// - greedy-steal[:threshold]
/// - tree[:aggregate[:n_sims]]
/// - tree-relative[:aggregate[:n_sims]]
/// - mc-tree[:aggregate[:n_random_actions[:n_sims]]]
///
/// `seed` is mixed with `index` so that bots in different seats diverge.
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, GameError> {
    let label = label_for_spec(spec);
    let args: Vec<&str> = spec.split(':').skip(1).map(str::trim).collect();
    let seat_seed = seed ^ ((index as u64 + 1) * 0x9E37_79B9);
    let invalid = || GameError::InvalidBotSpec(spec.to_string());

    match label.as_str() {
        "random" => {
            let custom_seed = match args.first() {
                Some(value) => value.parse::<u64>().map_err(|_| invalid())?,
                None => seat_seed,
            };
            Ok(Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed))))
        }
        "greedy" | "greedy-steal" => {
            let threshold = parse_or(args.first(), DEFAULT_THRESHOLD).map_err(|_| invalid())?;
            // Only six distinct faces can ever be kept in one turn.
            if threshold > ALL_FACES.len() {
                return Err(invalid());
            }
            let rng = StdRng::seed_from_u64(seat_seed);
            if label == "greedy" {
                Ok(Box::new(GreedyBot::new(threshold, rng)))
            } else {
                Ok(Box::new(GreedyBot::stealing(threshold, rng)))
            }
        }
        "tree" | "tree-relative" => {
            let aggregate = parse_or(args.first(), Aggregate::Max).map_err(|_| invalid())?;
            let n_sims = parse_or(args.get(1), DEFAULT_SIMS).map_err(|_| invalid())?;
            let rng = StdRng::seed_from_u64(seat_seed);
            if label == "tree" {
                Ok(Box::new(ExhaustiveTreeBot::new(aggregate, n_sims, rng)?))
            } else {
                Ok(Box::new(ExhaustiveTreeBot::relative(aggregate, n_sims, rng)?))
            }
        }
        "mc-tree" => {
            let aggregate = parse_or(args.first(), Aggregate::Max).map_err(|_| invalid())?;
            let n_random = parse_or(args.get(1), DEFAULT_RANDOM_ACTIONS).map_err(|_| invalid())?;
            let n_sims = parse_or(args.get(2), DEFAULT_MC_SIMS).map_err(|_| invalid())?;
            let rng = StdRng::seed_from_u64(seat_seed);
            Ok(Box::new(SampledTreeBot::new(aggregate, n_random, n_sims, rng)?))
        }
        _ => Err(invalid()),
    }
}

fn parse_or<T: FromStr>(value: Option<&&str>, default: T) -> Result<T, T::Err> {
    match value {
        Some(raw) if !raw.is_empty() => raw.parse(),
        _ => Ok(default),
    }
}
