pub mod alphabeta;
pub mod eval;
pub mod heuristics;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchLimits, SearchReport, SearchStats, Searcher};
pub use eval::{Evaluator, EvaluatorKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The caller asked for a move in a mated or stalemated position.
    #[error("no legal moves in the given position")]
    NoLegalMoves,

    #[error("transposition cache entry {key:#018x} does not match its position")]
    CacheCorruption { key: u64 },

    #[error("time budget exceeded during depth {depth} iteration")]
    TimeBudgetExceeded { depth: u32 },
}
