use std::collections::HashMap;
use std::error::Error;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};

use rainworms::{Bot, Game, create_bot_from_spec, label_for_spec};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play Rain Worms sessions between bots and report their scores."
)]
struct Args {
    /// Number of sessions to play
    #[arg(short = 'g', long = "games", default_value_t = 1)]
    games: usize,

    /// Base RNG seed (dice and bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Dice per player turn
    #[arg(long = "dice", default_value_t = 8)]
    dice: usize,

    /// Require a Worm among the kept dice before any stone can be claimed
    #[arg(long = "require-worm", action = ArgAction::SetTrue)]
    require_worm: bool,

    /// Safety cap on turns per session; capped sessions are reported as aborted
    #[arg(long = "max-turns", default_value_t = 10_000)]
    max_turns: usize,

    /// Print every turn outcome
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Player bot specs, e.g. greedy:3 tree mc-tree:max:1:10 (2-7 total)
    bots: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let specs = if args.bots.is_empty() {
        vec![String::from("greedy"), String::from("random")]
    } else {
        args.bots.clone()
    };
    let num_players = specs.len();

    let mut points_per_label: HashMap<String, u64> = HashMap::new();
    let mut seats_per_label: HashMap<String, usize> = HashMap::new();
    let mut aborted = 0usize;
    let started = Instant::now();

    for game_idx in 0..args.games {
        let game_seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut game = Game::builder(num_players)?
            .with_seed(game_seed)
            .with_dice(args.dice)
            .with_require_worm(args.require_worm)
            .with_max_turns(args.max_turns)
            .build()?;

        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(num_players);
        for (seat, spec) in specs.iter().enumerate() {
            let bot_seed = mix_seed(args.seed, game_idx as u64, seat as u64);
            bots.push(create_bot_from_spec(spec, seat, bot_seed)?);
        }

        let mut turns = 0usize;
        while !game.is_finished() && turns < game.config().max_turns {
            let current = game.current_player();
            let outcome = bots[current].play_turn(&mut game)?;
            if args.verbose {
                println!(
                    "game {game_idx} turn {turns}: {} (player {current}) -> {outcome:?}",
                    bots[current].name()
                );
            }
            game.advance_turn();
            turns += 1;
        }
        if !game.is_finished() {
            aborted += 1;
            continue;
        }

        let scores = game.scores();
        println!("game {game_idx}: scores {scores:?}");
        for (spec, score) in specs.iter().zip(scores) {
            let label = label_for_spec(spec);
            *points_per_label.entry(label.clone()).or_default() += u64::from(score);
            *seats_per_label.entry(label).or_default() += 1;
        }
    }

    let mut labels: Vec<&String> = seats_per_label.keys().collect();
    labels.sort();
    println!("\nAverage worms per seat:");
    for label in labels {
        let seats = seats_per_label.get(label).copied().unwrap_or(0);
        let points = points_per_label.get(label).copied().unwrap_or(0);
        let avg = if seats > 0 {
            points as f64 / seats as f64
        } else {
            0.0
        };
        println!("  {label:<14}  seats: {seats:<6}  avg worms: {avg:>6.2}");
    }
    if aborted > 0 {
        println!("\nNote: {aborted} session(s) hit the turn cap and were not scored.");
    }
    println!("\nFinished in {:.3}s", started.elapsed().as_secs_f64());
    Ok(())
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
