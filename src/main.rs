use anyhow::{Context, Result};
use castlebot::board::cozy::Position;
use castlebot::config::EngineConfig;
use castlebot::search::{EvaluatorKind, Searcher};
use castlebot::uci::UciEngine;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "castlebot", version, about = "Pick a move with iterative-deepening alpha-beta search")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Search depth (overrides the config file)
    #[arg(long)]
    depth: Option<u32>,

    /// Time budget in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluator: classic or centralizing
    #[arg(long)]
    eval: Option<EvaluatorKind>,

    /// Speak UCI on stdin/stdout instead of searching one position
    #[arg(long, default_value_t = false)]
    uci: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(d) = args.depth { config.max_depth = d; }
    if let Some(e) = args.eval { config.evaluator = e; }
    config.validate()?;

    if args.uci {
        return UciEngine::new(config).run_loop();
    }

    let pos = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).map_err(anyhow::Error::msg).context("parsing --fen")?
    };
    let mut searcher = Searcher::new(config);
    let report = searcher.select_move(pos.board(), args.movetime.map(Duration::from_millis))?;
    println!(
        "bestmove {} score {} depth {} nodes {} elapsed={:.3}s{}",
        report.best_move,
        report.score,
        report.depth,
        report.stats.nodes + report.stats.qnodes,
        report.elapsed.as_secs_f64(),
        if report.timed_out { " (budget exhausted)" } else { "" }
    );
    Ok(())
}
