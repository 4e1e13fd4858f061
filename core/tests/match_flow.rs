//! End-to-end match scenarios driven only through the public tick API.

use chesspong_core::{Game, GameConfig, InputFrame, Phase, PieceKind, Side};

fn idle() -> InputFrame {
    InputFrame::default()
}

fn launch() -> InputFrame {
    InputFrame {
        launch: true,
        ..Default::default()
    }
}

fn hold_left() -> InputFrame {
    InputFrame {
        left: true,
        ..Default::default()
    }
}

/// Tick until `done` holds, failing after `max_ticks`.
fn run_until(game: &mut Game, max_ticks: usize, done: impl Fn(&Game) -> bool) {
    for _ in 0..max_ticks {
        if done(game) {
            return;
        }
        game.tick(&idle(), &idle());
    }
    panic!("condition not reached within {max_ticks} ticks");
}

/// Move the top paddle off-center so a straight serve lines up with the
/// defenders' file-2 pawn instead of threading the gap between files.
fn aim_top_serve_at_file_two(game: &mut Game) {
    for _ in 0..15 {
        game.tick(&hold_left(), &idle());
    }
}

#[test]
fn straight_serve_kills_a_one_life_pawn() {
    let mut game = Game::new(GameConfig::default());
    aim_top_serve_at_file_two(&mut game);
    game.tick(&launch(), &idle());
    assert_eq!(game.phase, Phase::Playing);
    assert_eq!(game.ball.vx, 0.0, "angle 0 serve goes straight down");

    run_until(&mut game, 300, |g| g.score(Side::Top) > 0);

    let pawn_value = game.config.points.get(PieceKind::Pawn) as u32;
    assert_eq!(game.score(Side::Top), pawn_value);
    assert_eq!(game.score(Side::Bottom), 0);

    let dead: Vec<_> = game.board.pieces.iter().filter(|p| !p.is_alive()).collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].kind, PieceKind::Pawn);
    assert_eq!(dead[0].owner, Side::Bottom);

    assert_eq!(game.ball.last_touched_by, Some(Side::Bottom));
    assert!(game.ball.vy < 0.0, "pawn hit must reflect the ball upward");
    assert_eq!(game.special_bar, 1, "one non-special hit feeds the bar once");
}

#[test]
fn full_bar_special_serve_pierces_and_resets_the_bar() {
    let mut game = Game::new(GameConfig::default());
    game.special_bar = game.config.special_bar_max;

    aim_top_serve_at_file_two(&mut game);
    game.tick(&launch(), &idle());
    assert!(game.ball.is_special, "full bar at launch serves special");
    assert_eq!(game.ball.damage, game.config.special_ball_damage);

    // First contact: the one-life pawn. Budget 3 pays 1 and carries on, so
    // no bounce happens and the bar empties exactly once.
    run_until(&mut game, 300, |g| {
        g.board.pieces.iter().any(|p| !p.is_alive())
    });
    assert_eq!(game.special_bar, 0);
    assert!(game.ball.is_special, "two points of budget remain");
    assert!(game.ball.vy > 0.0, "piercing contact must not bounce");

    // Second contact: the two-life bishop behind the pawn drains the rest
    // of the budget, so the ball reverts and bounces back upward.
    run_until(&mut game, 100, |g| !g.ball.is_special);
    assert_eq!(game.ball.damage, game.config.ball_damage);
    assert!(game.ball.vy < 0.0);
    assert_eq!(game.special_bar, 0, "special hits never feed the bar");

    let pawn = game.config.points.get(PieceKind::Pawn) as u32;
    let bishop = game.config.points.get(PieceKind::Bishop) as u32;
    assert_eq!(game.score(Side::Top), pawn + bishop);
}

#[test]
fn bar_fills_one_per_hit_and_auto_activates_at_max() {
    let mut game = Game::new(GameConfig::from_overrides([("pawn_lives", 5)]));
    game.special_bar = game.config.special_bar_max - 1;

    aim_top_serve_at_file_two(&mut game);
    game.tick(&launch(), &idle());
    run_until(&mut game, 300, |g| {
        g.special_bar == g.config.special_bar_max
    });

    // The hit that filled the bar bounced normally; activation happens on
    // the following playing tick, before piece collisions are evaluated.
    assert!(!game.ball.is_special);
    game.tick(&idle(), &idle());
    assert!(game.ball.is_special);
    assert_eq!(game.ball.damage, game.config.special_ball_damage);
}

#[test]
fn king_death_ends_the_match_for_the_opponent() {
    let mut game = Game::new(GameConfig::default());
    game.tick(&launch(), &idle());

    // Clear a lane: drop the bottom king to one life and park the ball
    // right above it, descending.
    let king_rect = game.board.king(Side::Bottom).unwrap().rect;
    for piece in &mut game.board.pieces {
        if piece.owner == Side::Bottom && piece.kind == PieceKind::King {
            piece.life = 1;
        }
    }
    game.ball.x = king_rect.center_x();
    game.ball.y = king_rect.top - 20.0;
    game.ball.vx = 0.0;
    game.ball.vy = 3.0;
    game.ball.last_touched_by = Some(Side::Top);

    run_until(&mut game, 20, |g| g.phase == Phase::GameOver);
    assert_eq!(game.winner, Some(Side::Top));
    assert!(game.board.king(Side::Bottom).is_none());
    assert_eq!(
        game.score(Side::Top),
        game.config.points.get(PieceKind::King) as u32
    );

    // Terminal until reset.
    game.tick(&launch(), &launch());
    assert_eq!(game.phase, Phase::GameOver);
    game.reset();
    assert_eq!(game.phase, Phase::Serving);
    assert!(game.board.king(Side::Bottom).is_some());
}

#[test]
fn power_shot_aims_the_special_ball_at_the_enemy_king() {
    let mut game = Game::new(GameConfig::default());
    game.tick(&launch(), &idle());

    game.ball.x = 280.0;
    game.ball.y = 455.0;
    game.ball.vx = 2.0;
    game.ball.vy = -2.0;
    game.ball.is_special = true;
    game.ball.last_touched_by = Some(Side::Top);

    let king_center = game.board.king(Side::Bottom).unwrap().rect.center();
    let speed_before = game.ball.speed();

    let shot = InputFrame {
        power_shot: true,
        ..Default::default()
    };
    game.tick(&shot, &idle());

    // Velocity now points from the pre-tick position toward the king.
    assert!(game.ball.vy > 0.0, "bottom king lies below the ball");
    assert!(
        game.ball.vx > 0.0,
        "king center x {} is right of the ball",
        king_center.0
    );
    assert!((game.ball.speed() - speed_before).abs() < 1e-4);
}

#[test]
fn power_shot_ignores_players_who_do_not_own_the_ball() {
    let mut game = Game::new(GameConfig::default());
    game.tick(&launch(), &idle());

    game.ball.x = 280.0;
    game.ball.y = 455.0;
    game.ball.vx = 0.0;
    game.ball.vy = 3.0;
    game.ball.is_special = true;
    game.ball.last_touched_by = Some(Side::Top);

    let shot = InputFrame {
        power_shot: true,
        ..Default::default()
    };
    game.tick(&idle(), &shot);
    assert_eq!(game.ball.vx, 0.0, "bottom cannot redirect top's shot");
    assert_eq!(game.ball.vy, 3.0);
}

#[test]
fn power_shot_without_a_living_king_is_a_no_op() {
    let mut game = Game::new(GameConfig::default());
    game.tick(&launch(), &idle());

    for piece in &mut game.board.pieces {
        if piece.owner == Side::Bottom && piece.kind == PieceKind::King {
            piece.life = 0;
        }
    }
    game.ball.x = 280.0;
    game.ball.y = 455.0;
    game.ball.vx = 0.0;
    game.ball.vy = 3.0;
    game.ball.is_special = true;
    game.ball.last_touched_by = Some(Side::Top);

    let shot = InputFrame {
        power_shot: true,
        ..Default::default()
    };
    game.tick(&shot, &idle());
    assert_eq!((game.ball.vx, game.ball.vy), (0.0, 3.0));
}

#[test]
fn piece_lives_stay_within_bounds_for_a_long_rally() {
    let mut game = Game::new(GameConfig::default());
    aim_top_serve_at_file_two(&mut game);
    game.tick(&launch(), &idle());

    for _ in 0..5000 {
        game.tick(&idle(), &idle());
        for piece in &game.board.pieces {
            assert!(piece.life >= 0);
            assert!(piece.life <= piece.max_life);
        }
        if game.phase == Phase::GameOver {
            break;
        }
    }
}
