//! Headless Drop Merge runner (default binary).
//!
//! Plays a seeded game without a display: either a scripted list of actions or a
//! simple built-in column policy. Resolution runs instantly, so a whole game
//! finishes in milliseconds. Set `RUST_LOG=debug` to watch every merge.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use drop_merge::core::types::{GameAction, COLUMN_COUNT, SPAWN_Y, TILE_SIZE};
use drop_merge::core::{Board, GameConfig};
use drop_merge::engine::{Game, GameStatus, TurnEvent};

/// Command line arguments for the headless runner.
#[derive(Parser, Debug)]
#[command(name = "drop-merge")]
#[command(about = "Headless falling-block 2^k merge puzzle")]
#[command(version)]
struct Args {
    /// Random seed for the spawn sequence
    #[arg(short, long, default_value_t = 1)]
    seed: u32,

    /// JSON config file (defaults to $DROP_MERGE_CONFIG, then built-in values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many locked tiles
    #[arg(short, long, default_value_t = 200)]
    turns: u32,

    /// Override the visible grid height
    #[arg(long)]
    height: Option<u8>,

    /// Comma-separated actions to play instead of the built-in policy
    /// (e.g. "left,left,hardDrop,dropToColumn:3")
    #[arg(long)]
    actions: Option<String>,

    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("starting seed {} with {:?}", args.seed, config);

    let mut game = Game::new(config, args.seed);
    game.start();

    match &args.actions {
        Some(script) => {
            for action in parse_actions(script)? {
                if game.game_over() {
                    break;
                }
                game.apply_action(action);
                game.resolve_all();
                report(&mut game, &args)?;
            }
        }
        None => {
            while game.status() == GameStatus::Playing && game.turn() < args.turns {
                let column = choose_column(&game);
                game.apply_action(GameAction::DropToColumn(column));
                game.resolve_all();
                report(&mut game, &args)?;
            }
        }
    }
    report(&mut game, &args)?;

    println!("{}", game.board());
    println!(
        "seed {}  turns {}  score {}  highest {}  status {:?}",
        game.seed(),
        game.turn(),
        game.score(),
        game.highest_value(),
        game.status()
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::from_env(),
    };
    if let Some(height) = args.height {
        config.grid_height = height;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn parse_actions(script: &str) -> Result<Vec<GameAction>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match GameAction::from_str(s) {
            Some(action) => Ok(action),
            None => bail!("unknown action '{}'", s),
        })
        .collect()
}

/// Exponent and top row of the highest tile in a column, if any
fn column_top(board: &Board, column: u8) -> Option<(u8, i8)> {
    let x = (column * TILE_SIZE) as i8;
    (SPAWN_Y as i8..board.height() as i8).find_map(|y| {
        let id = board.get(x, y)?;
        board.tile(id).map(|tile| (tile.exponent(), y))
    })
}

/// Prefer a column whose top tile matches the active tile, else the lowest stack
fn choose_column(game: &Game) -> u8 {
    let board = game.board();
    let Some(k) = game.active().map(|tile| tile.exponent()) else {
        return 0;
    };

    let mut best = 0;
    let mut best_score = i32::MIN;
    for column in 0..COLUMN_COUNT {
        let (score, open) = match column_top(board, column) {
            Some((top_k, y)) => {
                let matching = if top_k == k { 100 } else { 0 };
                (matching + y as i32, y > SPAWN_Y as i8 + TILE_SIZE as i8)
            }
            None => (board.height() as i32, true),
        };
        if open && score > best_score {
            best = column;
            best_score = score;
        }
    }
    best
}

fn report(game: &mut Game, args: &Args) -> Result<()> {
    for event in game.drain_events() {
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
        } else if !args.quiet {
            match event {
                TurnEvent::Merged {
                    new_k, points, combo, ..
                } => println!("merge -> 2^{} (+{}, combo {})", new_k, points, combo),
                TurnEvent::TierEvicted { removed } => {
                    println!("evicted {} low tile(s)", removed.len())
                }
                TurnEvent::TiersUnlocked {
                    max_unlocked,
                    min_tier,
                } => println!("spawn tiers now 2^{}..2^{}", min_tier, max_unlocked),
                TurnEvent::GameOver { score, .. } => println!("game over, score {}", score),
                _ => {}
            }
        }
    }
    Ok(())
}
