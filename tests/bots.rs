use rand::SeedableRng;
use rand::rngs::StdRng;

use rainworms::dice::DieFace;
use rainworms::{
    Bot, GameBuilder, GameError, GreedyBot, PlayerAction, RandomBot, Turn, TurnPhase,
    create_bot_from_spec, label_for_spec, play_session,
};

fn pick(face: DieFace, count: usize) -> PlayerAction {
    PlayerAction::PickDiceSet { face, count }
}

#[test]
fn random_bot_only_returns_legal_actions() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.build()?;
    let (turn, _) = game.start_turn()?;
    let legal = vec![
        pick(DieFace::One, 2),
        pick(DieFace::Four, 1),
        pick(DieFace::Worm, 3),
    ];
    let mut bot = RandomBot::new(StdRng::seed_from_u64(3));
    for _ in 0..50 {
        let chosen = bot.select_action(&game, &turn, &legal)?;
        assert!(legal.contains(&chosen));
    }
    assert!(matches!(
        bot.select_action(&game, &turn, &[]),
        Err(GameError::NoLegalActions)
    ));
    Ok(())
}

#[test]
fn greedy_keeps_rolling_below_threshold() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.build()?;
    game.load_selection(
        0,
        &[DieFace::Worm, DieFace::Worm, DieFace::Worm, DieFace::Worm, DieFace::Worm],
    )?;
    let (turn, _) = game.start_turn()?;
    assert_eq!(
        turn.legal_actions(),
        &[PlayerAction::RollDice, PlayerAction::TakeStone]
    );
    let mut bot = GreedyBot::new(3, StdRng::seed_from_u64(1));
    let chosen = bot.select_action(&game, &turn, turn.legal_actions())?;
    assert_eq!(chosen, PlayerAction::RollDice);
    Ok(())
}

#[test]
fn greedy_takes_once_threshold_is_met() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.build()?;
    game.load_selection(
        0,
        &[DieFace::Worm, DieFace::Worm, DieFace::Worm, DieFace::Five, DieFace::Five, DieFace::Four],
    )?;
    let (turn, _) = game.start_turn()?;
    let mut bot = GreedyBot::new(3, StdRng::seed_from_u64(1));
    let chosen = bot.select_action(&game, &turn, turn.legal_actions())?;
    assert_eq!(chosen, PlayerAction::TakeStone);

    // Without a claimable stone the bot has to roll again.
    let chosen = bot.select_action(&game, &turn, &[PlayerAction::RollDice])?;
    assert_eq!(chosen, PlayerAction::RollDice);
    Ok(())
}

#[test]
fn greedy_keeps_worms_over_fives() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.build()?;
    game.load_roll(0, &[DieFace::Five, DieFace::Worm, DieFace::Two])?;
    let (turn, _) = Turn::start(&mut game, 0, Some(TurnPhase::PickDiceSet))?;
    let mut bot = GreedyBot::new(3, StdRng::seed_from_u64(1));
    let chosen = bot.select_action(&game, &turn, turn.legal_actions())?;
    assert_eq!(chosen, pick(DieFace::Worm, 1));
    Ok(())
}

#[test]
fn greedy_claims_the_highest_stone() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.build()?;
    let (turn, _) = game.start_turn()?;
    let legal = vec![
        PlayerAction::TakeStoneWithValue(21),
        PlayerAction::TakeStoneWithValue(29),
        PlayerAction::StealStoneWithValue(27),
    ];

    let mut greedy = GreedyBot::new(3, StdRng::seed_from_u64(1));
    assert_eq!(
        greedy.select_action(&game, &turn, &legal)?,
        PlayerAction::TakeStoneWithValue(29)
    );

    let mut stealing = GreedyBot::stealing(3, StdRng::seed_from_u64(1));
    assert_eq!(
        stealing.select_action(&game, &turn, &legal)?,
        PlayerAction::StealStoneWithValue(27)
    );
    assert_eq!(greedy.name(), "GreedyBot_3");
    assert_eq!(stealing.name(), "GreedyStealingBot_3");
    Ok(())
}

#[test]
fn registry_builds_every_bot_kind() -> Result<(), GameError> {
    let cases = [
        ("random", "RandomBot"),
        ("random:42", "RandomBot"),
        ("greedy", "GreedyBot_3"),
        ("greedy:4", "GreedyBot_4"),
        ("greedy-steal:2", "GreedyStealingBot_2"),
        ("tree", "TreeBot"),
        ("tree:mean:2", "TreeBot"),
        ("tree-relative:max", "TreeBotRelative"),
        ("mc-tree:max:1:10", "MCTreeBotRelative"),
    ];
    for (spec, name) in cases {
        let bot = create_bot_from_spec(spec, 0, 7)?;
        assert_eq!(bot.name(), name, "spec {spec}");
    }
    assert_eq!(label_for_spec("Greedy-Steal:3"), "greedy-steal");
    Ok(())
}

#[test]
fn registry_rejects_unknown_or_malformed_specs() {
    for spec in [
        "human",
        "greedy:many",
        "greedy:7",
        "greedy-steal:9",
        "tree:median",
        "mc-tree:max:x",
        "tree:max:0",
    ] {
        assert!(create_bot_from_spec(spec, 0, 7).is_err(), "spec {spec}");
    }
}

#[test]
fn heuristic_session_runs_to_completion() -> Result<(), GameError> {
    let mut game = GameBuilder::new(3)?.with_seed(2024).build()?;
    let initial = game.all_stones();
    let mut bots: Vec<Box<dyn Bot>> = vec![
        create_bot_from_spec("greedy:2", 0, 5)?,
        create_bot_from_spec("greedy-steal:3", 1, 5)?,
        create_bot_from_spec("random", 2, 5)?,
    ];
    let scores = play_session(&mut game, &mut bots)?;
    assert!(game.is_finished());
    assert_eq!(scores.len(), 3);
    assert_eq!(scores, game.scores());
    assert_eq!(game.all_stones(), initial);
    Ok(())
}

#[test]
fn session_needs_one_bot_per_player() -> Result<(), GameError> {
    let mut game = GameBuilder::new(3)?.build()?;
    let mut bots: Vec<Box<dyn Bot>> = vec![create_bot_from_spec("random", 0, 1)?];
    assert!(matches!(
        play_session(&mut game, &mut bots),
        Err(GameError::InvalidConfiguration(_))
    ));
    Ok(())
}

#[test]
fn empty_bank_session_ends_immediately() -> Result<(), GameError> {
    let mut game = GameBuilder::new(2)?.with_bank(Vec::new()).build()?;
    let mut bots: Vec<Box<dyn Bot>> = vec![
        create_bot_from_spec("greedy", 0, 1)?,
        create_bot_from_spec("greedy", 1, 1)?,
    ];
    assert_eq!(play_session(&mut game, &mut bots)?, vec![0, 0]);
    Ok(())
}

#[test]
fn greedy_threshold_may_cover_every_face() -> Result<(), GameError> {
    let bot = create_bot_from_spec("greedy:6", 0, 1)?;
    assert_eq!(bot.name(), "GreedyBot_6");
    Ok(())
}

#[test]
fn session_that_cannot_empty_the_bank_hits_the_turn_limit() -> Result<(), GameError> {
    // Four dice score at most 20, below the lowest stone.
    let mut game = GameBuilder::new(2)?
        .with_dice(4)
        .with_max_turns(200)
        .build()?;
    let mut bots: Vec<Box<dyn Bot>> = vec![
        create_bot_from_spec("greedy", 0, 3)?,
        create_bot_from_spec("random", 1, 3)?,
    ];
    assert!(matches!(
        play_session(&mut game, &mut bots),
        Err(GameError::TurnLimitReached(200))
    ));
    assert_eq!(game.bank().len(), 16);
    Ok(())
}

#[test]
fn zero_turn_limit_is_rejected() {
    let built = GameBuilder::new(2).and_then(|b| b.with_max_turns(0).build());
    assert!(matches!(built, Err(GameError::InvalidConfiguration(_))));
}
