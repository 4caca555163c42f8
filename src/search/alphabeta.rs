use cozy_chess::{Board, Move};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::board::cozy::{captured_piece, in_check, is_capture, is_checkmate, is_promotion, legal_moves, moved_piece};
use crate::config::EngineConfig;
use crate::search::eval::{piece_value, Evaluator, DRAW_SCORE, MATE_BOUND, MATE_SCORE};
use crate::search::tt::{Bound, Entry, Tt};
use crate::search::{zobrist, SearchError};

/// Score bound wider than any reachable evaluation.
pub const INF: i32 = MATE_SCORE + 1;
/// Hard ceiling on iterative deepening, keeps mate distances well inside `MATE_BOUND`.
pub const MAX_DEPTH: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u32,
    pub movetime: Option<Duration>,
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self { depth, movetime: None, max_nodes: None }
    }

    /// Per-move budget from the remaining clock: a thirtieth of what is left
    /// plus half the increment, never more than half the remaining time.
    pub fn from_clock(remaining: Duration, increment: Duration, depth: u32) -> Self {
        let budget = (remaining / 30 + increment / 2).min(remaining / 2);
        Self { depth, movetime: Some(budget), max_nodes: None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub seldepth: u32,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best_move: Move,
    pub score: i32,
    /// Deepest iteration that completed; 0 when none did.
    pub depth: u32,
    pub stats: SearchStats,
    pub elapsed: Duration,
    pub timed_out: bool,
    pub mate_shortcut: bool,
}

pub struct Searcher {
    tt: Tt,
    evaluator: Box<dyn Evaluator>,
    config: EngineConfig,
    stats: SearchStats,
    deadline: Option<Instant>,
    node_limit: u64,
    iteration: u32,
    root_best: Option<(Move, i32)>,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

impl Searcher {
    pub fn new(config: EngineConfig) -> Self {
        let evaluator = config.evaluator.build();
        Self::with_evaluator(config, evaluator)
    }

    pub fn with_evaluator(config: EngineConfig, evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            tt: Tt::with_capacity_entries(config.cache_capacity),
            evaluator,
            config,
            stats: SearchStats::default(),
            deadline: None,
            node_limit: u64::MAX,
            iteration: 0,
            root_best: None,
        }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn evaluator(&self) -> &dyn Evaluator { self.evaluator.as_ref() }
    pub fn stats(&self) -> SearchStats { self.stats }
    pub fn tt(&self) -> &Tt { &self.tt }
    pub fn tt_mut(&mut self) -> &mut Tt { &mut self.tt }
    pub fn clear_cache(&mut self) { self.tt.clear(); }

    pub fn set_cache_capacity_mb(&mut self, mb: usize) { self.tt.set_capacity_mb(mb); }

    /// Picks a move for the side to move using the configured depth and an
    /// optional wall-clock budget.
    pub fn select_move(&mut self, board: &Board, budget: Option<Duration>) -> Result<SearchReport, SearchError> {
        let limits = SearchLimits { depth: self.config.max_depth, movetime: budget, max_nodes: None };
        self.search_with_limits(board, limits)
    }

    pub fn search_with_limits(&mut self, board: &Board, limits: SearchLimits) -> Result<SearchReport, SearchError> {
        let start = Instant::now();
        self.stats = SearchStats::default();
        // A budget too large to represent is no deadline at all.
        self.deadline = limits.movetime.and_then(|d| start.checked_add(d));
        self.node_limit = limits.max_nodes.unwrap_or(u64::MAX);
        let result = self.iterate(board, limits.depth.clamp(1, MAX_DEPTH), start);
        self.deadline = None;
        self.node_limit = u64::MAX;
        result
    }

    fn iterate(&mut self, board: &Board, max_depth: u32, start: Instant) -> Result<SearchReport, SearchError> {
        let moves = legal_moves(board);
        let Some(&first) = moves.first() else { return Err(SearchError::NoLegalMoves) };

        if self.config.mate_shortcut {
            if let Some(mv) = moves.iter().copied().find(|&m| gives_mate(board, m)) {
                info!("mate in one: {mv}");
                return Ok(SearchReport {
                    best_move: mv,
                    score: MATE_SCORE - 1,
                    depth: 1,
                    stats: self.stats,
                    elapsed: start.elapsed(),
                    timed_out: false,
                    mate_shortcut: true,
                });
            }
        }

        let mut completed: Option<(Move, i32, u32)> = None;
        let mut timed_out = false;
        self.root_best = None;
        for depth in 1..=max_depth {
            self.iteration = depth;
            self.tt.bump_generation();
            match self.negamax(board, depth, -INF, INF, 0) {
                Ok((score, mv)) => {
                    let mv = mv.or(self.root_best.map(|(m, _)| m)).unwrap_or(first);
                    debug!("depth {depth} score {score} move {mv} nodes {} qnodes {}", self.stats.nodes, self.stats.qnodes);
                    completed = Some((mv, score, depth));
                }
                Err(e @ SearchError::TimeBudgetExceeded { .. }) => {
                    warn!("{e}; keeping result of depth {}", depth - 1);
                    timed_out = true;
                    break;
                }
                Err(e) => return Err(e),
            }
            if depth < max_depth && self.check_budget().is_err() {
                timed_out = true;
                break;
            }
        }

        let (best_move, score, depth) = match completed {
            Some(c) => c,
            None => {
                let (mv, score) = self.root_best.unwrap_or((first, self.evaluator.evaluate(board)));
                (mv, score, 0)
            }
        };
        info!("bestmove {best_move} score {score} depth {depth} nodes {}", self.stats.nodes + self.stats.qnodes);
        Ok(SearchReport { best_move, score, depth, stats: self.stats, elapsed: start.elapsed(), timed_out, mate_shortcut: false })
    }

    /// Alpha-beta search from `board` to `depth` plies. The score is from the
    /// side to move's point of view; the move is `None` at the horizon and at
    /// terminal positions.
    pub fn search(&mut self, board: &Board, depth: u32, alpha: i32, beta: i32) -> Result<(i32, Option<Move>), SearchError> {
        self.root_best = None;
        self.negamax(board, depth, alpha, beta, 0)
    }

    fn negamax(&mut self, board: &Board, depth: u32, mut alpha: i32, beta: i32, ply: u32) -> Result<(i32, Option<Move>), SearchError> {
        self.check_budget()?;
        self.stats.nodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);

        let key = zobrist::compute(board);
        let mut cache_move = None;
        if self.config.use_cache {
            if let Some(e) = self.probe(key, board) {
                let e = Entry { score: score_from_tt(e.score, ply), ..e };
                if e.usable(depth, alpha, beta) {
                    self.stats.tt_hits += 1;
                    return Ok((e.score, e.best));
                }
                cache_move = e.best;
            }
        }

        if depth == 0 {
            return Ok((self.qsearch(board, alpha, beta, ply, 0)?, None));
        }

        let mut moves = legal_moves(board);
        if moves.is_empty() {
            return Ok((terminal_score(board, ply), None));
        }
        if self.config.order_moves {
            order_moves(board, &mut moves, cache_move);
        }

        let orig_alpha = alpha;
        let mut best = -INF;
        let mut best_move = None;
        for m in moves {
            let mut child = board.clone();
            child.play(m);
            let (child_score, _) = self.negamax(&child, depth - 1, -beta, -alpha, ply + 1)?;
            let score = -child_score;
            // Strict improvement: ties keep the earlier move.
            if score > best {
                best = score;
                best_move = Some(m);
                if ply == 0 { self.root_best = Some((m, score)); }
            }
            if best > alpha { alpha = best; }
            if alpha >= beta { break; }
        }

        if self.config.use_cache {
            let bound = if best <= orig_alpha { Bound::Upper } else if best >= beta { Bound::Lower } else { Bound::Exact };
            self.tt.put(Entry { key, depth, score: score_to_tt(best, ply), best: best_move, bound, gen: 0 });
        }
        Ok((best, best_move))
    }

    /// Quiescence value of `board` within `(alpha, beta)`.
    pub fn quiesce(&mut self, board: &Board, alpha: i32, beta: i32) -> Result<i32, SearchError> {
        self.qsearch(board, alpha, beta, 0, 0)
    }

    pub fn qsearch_eval_cp(&mut self, board: &Board) -> i32 {
        self.quiesce(board, -INF, INF).unwrap_or_else(|_| self.evaluator.evaluate(board))
    }

    fn qsearch(&mut self, board: &Board, mut alpha: i32, beta: i32, ply: u32, qply: u32) -> Result<i32, SearchError> {
        self.check_budget()?;
        self.stats.qnodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);

        let moves = legal_moves(board);
        if moves.is_empty() {
            return Ok(terminal_score(board, ply));
        }

        // Stand pat
        let stand = self.evaluator.evaluate(board);
        if stand >= beta || qply >= self.config.qsearch_max_depth {
            return Ok(stand);
        }
        alpha = alpha.max(stand);

        let mut best = stand;
        for m in moves {
            let forcing = is_capture(board, m) || is_promotion(m);
            let mut child = board.clone();
            child.play(m);
            if !forcing && !in_check(&child) { continue; }
            let score = -self.qsearch(&child, -beta, -alpha, ply + 1, qply + 1)?;
            if score > best { best = score; }
            if score > alpha { alpha = score; }
            if alpha >= beta { break; }
        }
        Ok(best)
    }

    fn probe(&mut self, key: u64, board: &Board) -> Option<Entry> {
        match self.tt.probe(key, board) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("{e}; recomputing");
                self.tt.remove(key);
                None
            }
        }
    }

    fn check_budget(&self) -> Result<(), SearchError> {
        let over_nodes = self.stats.nodes + self.stats.qnodes >= self.node_limit;
        let over_time = self.deadline.map_or(false, |dl| Instant::now() >= dl);
        if over_nodes || over_time {
            return Err(SearchError::TimeBudgetExceeded { depth: self.iteration });
        }
        Ok(())
    }
}

fn gives_mate(board: &Board, mv: Move) -> bool {
    let mut child = board.clone();
    child.play(mv);
    is_checkmate(&child)
}

fn terminal_score(board: &Board, ply: u32) -> i32 {
    if in_check(board) { -MATE_SCORE + ply as i32 } else { DRAW_SCORE }
}

// Mate scores are stored relative to the node so they stay valid when the
// same position is reached at a different ply.
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_BOUND { score + ply as i32 } else if score < -MATE_BOUND { score - ply as i32 } else { score }
}

fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_BOUND { score - ply as i32 } else if score < -MATE_BOUND { score + ply as i32 } else { score }
}

/// Cache move first, then captures by most valuable victim / least valuable
/// attacker. The sort is stable so quiet moves keep generation order.
fn order_moves(board: &Board, moves: &mut [Move], cache_move: Option<Move>) {
    moves.sort_by_key(|&m| {
        if Some(m) == cache_move { return i32::MIN; }
        match captured_piece(board, m) {
            Some(victim) => {
                let attacker = moved_piece(board, m).map_or(0, piece_value);
                -(piece_value(victim) * 16 - attacker / 100)
            }
            None => 0,
        }
    });
}
