use cozy_chess::{Board, Color, Piece, Square};
use serde::{Deserialize, Serialize};

use crate::search::heuristics::{is_king_exposed, is_passed_pawn, pawn_table_bonus};

pub const PAWN: i32 = 100;
pub const KNIGHT: i32 = 300;
pub const BISHOP: i32 = 300;
pub const ROOK: i32 = 500;
pub const QUEEN: i32 = 900;
pub const KING: i32 = 20_000;

pub const PASSED_PAWN_BONUS: i32 = 20;
pub const KING_EXPOSED_PENALTY: i32 = 50;
pub const IN_CHECK_PENALTY: i32 = 50;

// Mate scoring helpers
pub const MATE_SCORE: i32 = 30_000;
pub const MATE_BOUND: i32 = MATE_SCORE - 1_000;
pub const DRAW_SCORE: i32 = 0;

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => KING,
    }
}

/// A static scoring strategy. Scores are always from the side-to-move
/// perspective so the search can negate them at every ply.
pub trait Evaluator {
    fn name(&self) -> &'static str;
    fn evaluate(&self, board: &Board) -> i32;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    #[default]
    Classic,
    Centralizing,
}

impl EvaluatorKind {
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Classic => Box::new(ClassicEval),
            EvaluatorKind::Centralizing => Box::new(CentralizingEval),
        }
    }
}

impl std::str::FromStr for EvaluatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(EvaluatorKind::Classic),
            "centralizing" | "central" => Ok(EvaluatorKind::Centralizing),
            other => Err(format!("unknown evaluator: {other}")),
        }
    }
}

fn sign(color: Color) -> i32 {
    if color == Color::White { 1 } else { -1 }
}

fn relative(board: &Board, white_score: i32) -> i32 {
    if board.side_to_move() == Color::White { white_score } else { -white_score }
}

/// Material, pawn placement, passed pawns and king exposure.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicEval;

impl ClassicEval {
    /// White-relative sum over every occupied square.
    pub fn white_score(board: &Board) -> i32 {
        let mut score = 0;
        for sq in board.occupied() {
            let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) else { continue };
            let s = sign(color);
            score += s * piece_value(piece);
            match piece {
                Piece::Pawn => {
                    score += s * pawn_table_bonus(sq, color);
                    if is_passed_pawn(board, sq, color) { score += s * PASSED_PAWN_BONUS; }
                }
                Piece::King => {
                    if is_king_exposed(board, sq, color) { score -= s * KING_EXPOSED_PENALTY; }
                }
                _ => {}
            }
        }
        score
    }
}

impl Evaluator for ClassicEval {
    fn name(&self) -> &'static str { "classic" }

    fn evaluate(&self, board: &Board) -> i32 {
        relative(board, Self::white_score(board))
    }
}

/// Bonus for standing near the middle of the board: 14 minus the Manhattan
/// distance from the centre measured in half squares.
pub fn centralization_bonus(sq: Square) -> i32 {
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    14 - ((2 * f - 7).abs() + (2 * r - 7).abs())
}

/// Material plus centralization of pieces, penalizing the side to move for
/// standing in check.
#[derive(Clone, Copy, Debug, Default)]
pub struct CentralizingEval;

impl Evaluator for CentralizingEval {
    fn name(&self) -> &'static str { "centralizing" }

    fn evaluate(&self, board: &Board) -> i32 {
        let mut white = 0;
        for sq in board.occupied() {
            let (Some(piece), Some(color)) = (board.piece_on(sq), board.color_on(sq)) else { continue };
            let s = sign(color);
            white += s * piece_value(piece);
            if matches!(piece, Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen) {
                white += s * centralization_bonus(sq);
            }
        }
        let mut score = relative(board, white);
        if !board.checkers().is_empty() { score -= IN_CHECK_PENALTY; }
        score
    }
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(board: &Board) -> i32 {
    board.occupied().into_iter()
        .filter_map(|sq| Some(sign(board.color_on(sq)?) * piece_value(board.piece_on(sq)?)))
        .sum()
}

// Material from side-to-move perspective (negamax-friendly)
pub fn material_eval_cp(board: &Board) -> i32 {
    relative(board, material_eval_cp_side_agnostic(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centralization_peaks_in_the_middle() {
        assert_eq!(centralization_bonus(Square::D4), 12);
        assert_eq!(centralization_bonus(Square::E5), 12);
        assert_eq!(centralization_bonus(Square::A1), 0);
        assert_eq!(centralization_bonus(Square::H8), 0);
    }

    #[test]
    fn startpos_is_balanced_for_both_strategies() {
        let b = Board::default();
        assert_eq!(ClassicEval.evaluate(&b), 0);
        assert_eq!(CentralizingEval.evaluate(&b), 0);
    }

    #[test]
    fn evaluator_kind_parses_names() {
        assert_eq!("Classic".parse::<EvaluatorKind>(), Ok(EvaluatorKind::Classic));
        assert_eq!("central".parse::<EvaluatorKind>(), Ok(EvaluatorKind::Centralizing));
        assert!("nnue".parse::<EvaluatorKind>().is_err());
    }
}
