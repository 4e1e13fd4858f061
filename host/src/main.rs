use std::env;
use std::thread;
use std::time::{Duration, Instant};

use chesspong_core::constants::TICK_RATE;
use chesspong_core::{Game, GameConfig, InputFrame, Phase, Side, Snapshot};
use chesspong_host::{save, GameClient, GameServer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "host" => {
            if args.len() < 3 {
                eprintln!("Usage: {} host <port> [--config <file>]", args[0]);
                std::process::exit(1);
            }
            let port: u16 = args[2].parse().unwrap_or_else(|_| {
                eprintln!("❌ Invalid port: '{}'", args[2]);
                std::process::exit(1);
            });
            let config = host_config(config_flag(&args[3..]));
            host_command(port, config);
        }

        "join" => {
            if args.len() < 3 {
                eprintln!("Usage: {} join <host:port>", args[0]);
                std::process::exit(1);
            }
            join_command(&args[2]);
        }

        "demo" => {
            let ticks: u64 = args
                .get(2)
                .filter(|a| !a.starts_with("--"))
                .map(|a| {
                    a.parse().unwrap_or_else(|_| {
                        eprintln!("❌ Invalid tick count: '{a}'");
                        std::process::exit(1);
                    })
                })
                .unwrap_or(3600);
            let config = demo_config(config_flag(&args[2..]));
            demo_command(ticks, config);
        }

        "inspect" => {
            if args.len() < 3 {
                eprintln!("Usage: {} inspect <save-file>", args[0]);
                std::process::exit(1);
            }
            inspect_command(&args[2]);
        }

        "--help" | "-h" => {
            print_usage(&args[0]);
        }

        other => {
            eprintln!("❌ Unknown command: {other}");
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  host <port> [--config <file>]");
    eprintln!("      Run an authoritative match server and wait for one client.");
    eprintln!("      Without a config file the remote player serves first");
    eprintln!("      (starting_player 2), since the headless host has no input.");
    eprintln!();
    eprintln!("  join <host:port>");
    eprintln!("      Connect to a server as the thin client and mirror its state.");
    eprintln!();
    eprintln!("  demo [ticks] [--config <file>]");
    eprintln!("      Run a scripted local match headlessly (default 3600 ticks)");
    eprintln!("      and save the final state to a timestamped JSON file.");
    eprintln!();
    eprintln!("  inspect <save-file>");
    eprintln!("      Print a summary of a saved match state.");
    eprintln!();
    eprintln!("Config files are flat JSON override maps, e.g.");
    eprintln!("  {{\"ball_speed\": 5, \"board_width\": 6, \"starting_player\": 2}}");
}

/// Resolve an optional `--config <file>` flag from a tail of the arg list.
fn config_flag(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" || arg == "-c" {
            match iter.next() {
                Some(path) => return Some(path),
                None => {
                    eprintln!("❌ --config requires a file path");
                    std::process::exit(1);
                }
            }
        }
    }
    None
}

fn load_config_or_exit(path: &str) -> GameConfig {
    save::load_config(path).unwrap_or_else(|e| {
        eprintln!("❌ Error loading config '{path}': {e}");
        std::process::exit(1);
    })
}

fn host_config(path: Option<&str>) -> GameConfig {
    match path {
        Some(p) => load_config_or_exit(p),
        // The headless host cannot press launch, so hand the serve to the
        // remote player by default.
        None => GameConfig::from_overrides([("starting_player", 2)]),
    }
}

fn demo_config(path: Option<&str>) -> GameConfig {
    match path {
        Some(p) => load_config_or_exit(p),
        None => GameConfig::default(),
    }
}

fn tick_duration() -> Duration {
    Duration::from_micros(1_000_000 / TICK_RATE as u64)
}

fn host_command(port: u16, config: GameConfig) {
    println!("🎮 chesspong server");

    let mut server = GameServer::bind(port).unwrap_or_else(|e| {
        eprintln!("❌ Failed to bind port {port}: {e}");
        std::process::exit(1);
    });

    println!("  Waiting for a client on port {port}...");
    if let Err(e) = server.wait_for_peer() {
        eprintln!("❌ Accept failed: {e}");
        std::process::exit(1);
    }

    // The client needs the configuration before the first state frame to
    // build an identical board.
    server.send_config(&config);

    let mut game = Game::new(config);
    let idle = InputFrame::default();
    let period = tick_duration();

    println!("✅ Client connected, match running");
    loop {
        let started = Instant::now();

        // Host plays Top; the remote client plays Bottom.
        let remote = server.latest_input().unwrap_or_default();
        game.tick(&idle, &remote);
        server.send_state(&Snapshot::capture(&game));

        if game.phase == Phase::GameOver {
            announce_result(&game);
            let path = save::default_save_path();
            match save::save_snapshot(&path, &Snapshot::capture(&game)) {
                Ok(()) => println!("💾 Final state saved to {path}"),
                Err(e) => eprintln!("❌ Error saving final state: {e}"),
            }
            break;
        }
        if !server.has_peer() {
            println!("Client disconnected, ending session");
            break;
        }

        if let Some(remaining) = period.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    server.close();
}

fn join_command(addr: &str) {
    println!("🎮 chesspong client");
    println!("  Connecting to {addr}...");

    let mut client = match GameClient::connect(addr) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to connect to {addr}: {e}");
            eprintln!("   Check that the server is running and the port is open.");
            std::process::exit(1);
        }
    };

    let Some(config) = client.wait_for_config(Duration::from_secs(10)) else {
        eprintln!("❌ Server never sent a configuration");
        std::process::exit(1);
    };

    let mut game = Game::new(config);
    let period = tick_duration();
    println!("✅ Connected, mirroring server state");

    // Headless client: serve as soon as the server allows it, otherwise
    // just report what the server replicates.
    let serve = InputFrame {
        launch: true,
        ..Default::default()
    };
    let mut last_score = (0, 0);

    while client.is_connected() {
        let started = Instant::now();

        let input = if game.phase == Phase::Serving {
            serve
        } else {
            InputFrame::default()
        };
        client.send_input(&input);

        if let Some(snapshot) = client.latest_state() {
            if let Err(e) = game.apply_snapshot(&snapshot) {
                eprintln!("❌ Snapshot rejected: {e}");
                break;
            }
        }

        let score = (game.score(Side::Top), game.score(Side::Bottom));
        if score != last_score {
            println!("  Score: {} - {}", score.0, score.1);
            last_score = score;
        }
        if game.phase == Phase::GameOver {
            announce_result(&game);
            break;
        }

        if let Some(remaining) = period.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    if !client.is_connected() {
        println!("Server connection lost, session over");
    }
    client.close();
}

fn demo_command(ticks: u64, config: GameConfig) {
    println!("🎮 chesspong demo: {ticks} ticks");

    let mut game = Game::new(config);

    // Scripted players: the server aims off-center for a few ticks, then
    // launches; afterwards both paddles chase the ball.
    let aim = InputFrame {
        aim_up: true,
        ..Default::default()
    };
    let launch = InputFrame {
        launch: true,
        ..Default::default()
    };

    for _ in 0..8 {
        match game.serving_player {
            Side::Top => game.tick(&aim, &InputFrame::default()),
            Side::Bottom => game.tick(&InputFrame::default(), &aim),
        }
    }
    match game.serving_player {
        Side::Top => game.tick(&launch, &InputFrame::default()),
        Side::Bottom => game.tick(&InputFrame::default(), &launch),
    }

    for _ in 0..ticks {
        if game.phase == Phase::GameOver {
            break;
        }
        let top = chase(&game, Side::Top);
        let bottom = chase(&game, Side::Bottom);
        game.tick(&top, &bottom);
    }

    println!(
        "  Final score: {} - {}",
        game.score(Side::Top),
        game.score(Side::Bottom)
    );
    match game.phase {
        Phase::GameOver => announce_result(&game),
        _ => println!("  Match still running after {ticks} ticks"),
    }

    let path = save::default_save_path();
    match save::save_snapshot(&path, &Snapshot::capture(&game)) {
        Ok(()) => println!("💾 Final state saved to {path}"),
        Err(e) => eprintln!("❌ Error saving final state: {e}"),
    }
}

fn inspect_command(path: &str) {
    let snapshot = match save::load_snapshot(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Error loading '{path}': {e}");
            std::process::exit(1);
        }
    };

    println!("📋 {path}");
    println!("  Score: {} - {}", snapshot.score_top, snapshot.score_bottom);
    let alive = snapshot.pieces.iter().filter(|p| p.life > 0).count();
    println!("  Pieces alive: {}/{}", alive, snapshot.pieces.len());
    println!("  Special bar: {}", snapshot.special_bar);
    if snapshot.game_over {
        match snapshot.winner {
            Some(side) => println!("  Game over, player {} won", side.player_number()),
            None => println!("  Game over, no winner recorded"),
        }
    } else if snapshot.serving {
        println!(
            "  Serving: player {} at {:.1}°",
            snapshot.serving_player.player_number(),
            snapshot.serve_angle
        );
    } else if snapshot.paused {
        println!("  Paused");
    } else {
        println!(
            "  In play, ball at ({:.1}, {:.1})",
            snapshot.ball.x, snapshot.ball.y
        );
    }
}

/// Trivial paddle AI: step toward the ball's x position.
fn chase(game: &Game, side: Side) -> InputFrame {
    let paddle = game.paddle(side);
    let mut frame = InputFrame::default();
    if game.ball.x < paddle.rect.center_x() - paddle.speed {
        frame.left = true;
    } else if game.ball.x > paddle.rect.center_x() + paddle.speed {
        frame.right = true;
    }
    frame
}

fn announce_result(game: &Game) {
    match game.winner {
        Some(side) => println!(
            "🏆 Player {} wins {} - {}",
            side.player_number(),
            game.score(Side::Top),
            game.score(Side::Bottom)
        ),
        None => println!("Match over with no winner recorded"),
    }
}
