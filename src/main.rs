use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use connect_four_search::ai::{Agent, RandomAgent, SearchAgent, Searcher, WindowHeuristic};
use connect_four_search::arena::{game_seed, play_from};
use connect_four_search::config::AppConfig;
use connect_four_search::game::{Board, GameState, Player};

/// Pick Connect Four moves with a time-bounded negamax search.
#[derive(Parser)]
#[command(name = "connect-four", about = "Time-bounded Connect Four search engine")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the engine's column for a board snapshot
    Move {
        /// Row-major cells as 0/1/2 digits, top row first ('/' separators allowed)
        #[arg(long)]
        board: String,

        /// Side to move: 1 or 2
        #[arg(long)]
        mover: u8,

        /// Override maximum search depth
        #[arg(long)]
        depth: Option<u32>,

        /// Override time limit in milliseconds
        #[arg(long)]
        time_ms: Option<u64>,

        /// Print depth, score and node count alongside the column
        #[arg(long)]
        verbose: bool,
    },
    /// Play full games with the engine as player 1
    Selfplay {
        /// Opponent for the engine
        #[arg(long, value_enum, default_value = "random")]
        opponent: Opponent,

        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: usize,

        /// Base seed for random opponents
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Search,
    Random,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Move {
            board,
            mover,
            depth,
            time_ms,
            verbose,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(depth) = depth {
                config.search.max_depth = depth;
            }
            if let Some(time_ms) = time_ms {
                config.search.time_limit_ms = time_ms;
            }
            run_move(&config, &board, mover, verbose)
        }
        Command::Selfplay {
            opponent,
            games,
            seed,
        } => run_selfplay(&load_config(&cli.config)?, opponent, games, seed),
        Command::DefaultConfig => {
            print!("{}", AppConfig::default_toml()?);
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_or_default(path)
        .with_context(|| format!("loading config from {}", path.display()))
}

fn run_move(config: &AppConfig, text: &str, mover: u8, verbose: bool) -> Result<()> {
    let Some(player) = Player::from_code(mover) else {
        bail!("mover must be 1 or 2, got {mover}");
    };
    let board = Board::parse(config.board.rows, config.board.cols, text)
        .context("parsing board snapshot")?;
    let limits = config.search.limits()?;
    let searcher = Searcher::new(WindowHeuristic::new(config.eval));

    let report = searcher.search_with_report(&board, player, limits)?;
    if verbose {
        println!(
            "column={} decision={:?} depth={} score={} nodes={} elapsed_ms={}",
            report.column,
            report.decision,
            report.depth,
            report
                .score
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
            report.nodes,
            report.elapsed.as_millis()
        );
    } else {
        println!("{}", report.column);
    }
    Ok(())
}

fn run_selfplay(config: &AppConfig, opponent: Opponent, games: usize, seed: u64) -> Result<()> {
    if games == 0 {
        bail!("--games must be at least 1");
    }
    let limits = config.search.limits()?;

    let mut engine_wins = 0;
    let mut opponent_wins = 0;
    let mut draws = 0;

    for game in 0..games {
        let mut engine =
            SearchAgent::with_searcher(Searcher::new(WindowHeuristic::new(config.eval)), limits);
        let mut other: Box<dyn Agent> = match opponent {
            Opponent::Search => Box::new(SearchAgent::with_searcher(
                Searcher::new(WindowHeuristic::new(config.eval)),
                limits,
            )),
            Opponent::Random => Box::new(RandomAgent::seeded(game_seed(seed, game))),
        };

        let start = GameState::from_position(config.board.empty_board()?, Player::One);
        let record = play_from(start, &mut engine, other.as_mut())
            .with_context(|| format!("playing game {}", game + 1))?;
        let result = match record.winner() {
            Some(Player::One) => {
                engine_wins += 1;
                "engine wins"
            }
            Some(Player::Two) => {
                opponent_wins += 1;
                "opponent wins"
            }
            None => {
                draws += 1;
                "draw"
            }
        };
        let moves: Vec<String> = record.moves.iter().map(ToString::to_string).collect();
        println!("game {}: {} ({})", game + 1, moves.join(" "), result);
    }

    println!("engine {engine_wins} / opponent {opponent_wins} / draws {draws}");
    Ok(())
}
