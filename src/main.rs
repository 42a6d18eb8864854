use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chessgo_search::search::{SearchReport, Searcher, Strategy, TerminalScoring};
use chessgo_search::types::Depth;
use chessgo_search::{ChessPosition, EngineConfig};

/// Chooses a move for one chess position with MCTS or alpha-beta minimax.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Position to analyse; the standard starting position when absent
    #[arg(long)]
    fen: Option<String>,

    /// TOML configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search strategy: minimax or mcts
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Minimax depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// MCTS simulations per move
    #[arg(long)]
    simulations: Option<u32>,

    /// UCB1 exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    /// Score checkmates statically (like any other leaf) instead of as mates
    #[arg(long)]
    static_terminals: bool,

    /// RNG seed for reproducible MCTS rollouts
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(depth) = self.depth {
            config.limits.depth = Depth::new(depth);
        }
        if let Some(simulations) = self.simulations {
            config.limits.simulations = simulations;
        }
        if let Some(exploration) = self.exploration {
            config.limits.exploration = exploration;
        }
        if self.static_terminals {
            config.terminal_scoring = TerminalScoring::Static;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid search settings")?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_report(report: &SearchReport, strategy: Strategy) -> String {
    let mut info = format!("info strategy {strategy}");
    if let Some(score) = report.score {
        info.push_str(&format!(" score {score}"));
    }
    info.push_str(&format!(
        " nodes {} nps {} time {}",
        report.stats.nodes,
        report.stats.nps(),
        report.stats.time_ms
    ));
    info
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.engine_config()?;
    let position = match &cli.fen {
        Some(fen) => ChessPosition::from_fen(fen).context("cannot set up position")?,
        None => ChessPosition::starting(),
    };

    let mut searcher = Searcher::from_config(&config);
    let report = searcher.search(&position).context("search failed")?;

    println!("{}", format_report(&report, config.strategy));
    match report.best_move {
        Some(m) => println!("bestmove {m}"),
        None => println!("bestmove 0000"),
    }

    Ok(())
}
