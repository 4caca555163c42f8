use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::board::cozy::Position;
use crate::config::EngineConfig;
use crate::search::alphabeta::{SearchLimits, Searcher, MAX_DEPTH};
use crate::search::SearchError;

pub struct UciEngine {
    pos: Position,
    searcher: Searcher,
}

impl Default for UciEngine {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

impl UciEngine {
    pub fn new(config: EngineConfig) -> Self { Self { pos: Position::startpos(), searcher: Searcher::new(config) } }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "id name Castlebot")?;
        writeln!(out, "id author Castlebot Team")?;
        writeln!(out, "option name Hash type spin default 4 min 1 max 4096")?;
        writeln!(out, "uciok")?;
        Ok(())
    }

    fn cmd_ucinewgame(&mut self) {
        self.pos = Position::startpos();
        self.searcher.clear_cache();
    }

    fn cmd_setoption(&mut self, args: &str) {
        // setoption name Hash value N
        let tokens: Vec<&str> = args.split_whitespace().collect();
        if let [ "name", "Hash", "value", v ] = tokens.as_slice() {
            if let Ok(mb) = v.parse::<usize>() { self.searcher.set_cache_capacity_mb(mb.max(1)); }
        }
    }

    fn cmd_position(&mut self, args: &str) {
        // Supports: 'position startpos [moves ...]' and 'position fen <fen> [moves ...]'
        let mut tokens = args.split_whitespace();
        let base = match tokens.next() {
            Some("startpos") => Ok(Position::startpos()),
            Some("fen") => {
                let fen_fields: Vec<&str> = tokens.by_ref().take_while(|&t| t != "moves").collect();
                Position::from_fen(&fen_fields.join(" "))
            }
            _ => Err(format!("unsupported position command: {args}")),
        };
        let moves: Vec<String> = tokens.skip_while(|&t| t == "moves").map(str::to_string).collect();
        match base.and_then(|p| p.with_moves(&moves)) {
            Ok(p) => self.pos = p,
            Err(e) => log::warn!("{e}"),
        }
    }

    fn cmd_go(&mut self, args: &str, out: &mut impl Write) -> Result<()> {
        let mut depth: Option<u32> = None;
        let mut movetime: Option<Duration> = None;
        let (mut wtime, mut btime, mut winc, mut binc) = (None, None, Duration::ZERO, Duration::ZERO);
        let mut tokens = args.split_whitespace();
        while let Some(tok) = tokens.next() {
            let value = tokens.clone().next().and_then(|s| s.parse::<u64>().ok());
            let ms = value.map(Duration::from_millis);
            match tok {
                "depth" => depth = tokens.clone().next().and_then(|s| s.parse::<u32>().ok()),
                "movetime" => movetime = ms,
                "wtime" => wtime = ms,
                "btime" => btime = ms,
                "winc" => winc = ms.unwrap_or_default(),
                "binc" => binc = ms.unwrap_or_default(),
                _ => continue,
            }
            tokens.next();
        }

        let white = self.pos.side_to_move() == cozy_chess::Color::White;
        let clock = if white { wtime.map(|t| (t, winc)) } else { btime.map(|t| (t, binc)) };
        let timed = movetime.is_some() || clock.is_some();
        // A time control without an explicit depth searches until the budget runs out.
        let depth = depth.unwrap_or(if timed { MAX_DEPTH } else { self.searcher.config().max_depth });
        let limits = match (movetime, clock) {
            (Some(t), _) => SearchLimits { depth, movetime: Some(t), max_nodes: None },
            (None, Some((remaining, inc))) => SearchLimits::from_clock(remaining, inc, depth),
            (None, None) => SearchLimits::depth(depth),
        };

        match self.searcher.search_with_limits(self.pos.board(), limits) {
            Ok(r) => {
                writeln!(
                    out,
                    "info depth {} seldepth {} score cp {} nodes {} time {}",
                    r.depth,
                    r.stats.seldepth,
                    r.score,
                    r.stats.nodes + r.stats.qnodes,
                    r.elapsed.as_millis()
                )?;
                writeln!(out, "bestmove {}", r.best_move)?;
            }
            Err(SearchError::NoLegalMoves) => writeln!(out, "bestmove 0000")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }
            match line {
                "uci" => self.cmd_uci(out)?,
                "isready" => writeln!(out, "readyok")?,
                "ucinewgame" => self.cmd_ucinewgame(),
                "quit" => break,
                "stop" => {}
                _ => {
                    if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                    else if let Some(rest) = line.strip_prefix("setoption ") { self.cmd_setoption(rest); }
                    else if line == "go" { self.cmd_go("", out)?; }
                    else if let Some(rest) = line.strip_prefix("go ") { self.cmd_go(rest, out)?; }
                    else { log::debug!("ignoring unknown command: {line}"); }
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn run_loop(&mut self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run(stdin.lock(), &mut stdout.lock())
    }
}
