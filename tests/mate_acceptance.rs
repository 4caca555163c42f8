use castlebot::board::cozy::{is_checkmate, legal_moves};
use castlebot::config::EngineConfig;
use castlebot::search::eval::MATE_SCORE;
use castlebot::search::Searcher;
use cozy_chess::{Board, Move};

const BACK_RANK: &str = "6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1";
// Qxa5 wins a rook, Qe8 mates.
const MATE_OR_ROOK: &str = "6k1/5ppp/8/r7/8/8/5PPP/4Q1K1 w - - 0 1";
// Two rooks against a bare king: no mate in one, mate in two.
const ROOK_LADDER: &str = "7k/8/8/8/8/2K5/8/RR6 w - - 0 1";

fn board(fen: &str) -> Board { Board::from_fen(fen, false).expect("valid fen") }

fn after(board: &Board, mv: Move) -> Board {
    let mut child = board.clone();
    child.play(mv);
    child
}

fn has_mate_in_one(board: &Board) -> bool {
    legal_moves(board).into_iter().any(|m| is_checkmate(&after(board, m)))
}

#[test]
fn plays_the_mate_in_one() {
    let mut s = Searcher::default();
    let r = s.select_move(&board(BACK_RANK), None).unwrap();
    assert_eq!(r.best_move.to_string(), "e1e8");
    assert!(r.mate_shortcut);
}

#[test]
fn mate_beats_material_with_and_without_shortcut() {
    for mate_shortcut in [true, false] {
        let mut s = Searcher::new(EngineConfig { mate_shortcut, ..EngineConfig::default() });
        let r = s.select_move(&board(MATE_OR_ROOK), None).unwrap();
        assert_eq!(r.best_move.to_string(), "e1e8", "shortcut={mate_shortcut}");
        assert_eq!(r.score, MATE_SCORE - 1, "shortcut={mate_shortcut}");
    }
}

#[test]
fn centralizing_evaluator_also_takes_the_mate() {
    let cfg = EngineConfig { evaluator: castlebot::search::EvaluatorKind::Centralizing, mate_shortcut: false, ..EngineConfig::default() };
    let mut s = Searcher::new(cfg);
    let r = s.select_move(&board(MATE_OR_ROOK), None).unwrap();
    assert_eq!(r.best_move.to_string(), "e1e8");
}

#[test]
fn finds_mate_in_two_at_depth_three() {
    let b = board(ROOK_LADDER);
    assert!(!has_mate_in_one(&b), "fixture must not contain a mate in one");
    let mut s = Searcher::new(EngineConfig { max_depth: 3, ..EngineConfig::default() });
    let r = s.select_move(&b, None).unwrap();
    assert_eq!(r.score, MATE_SCORE - 3, "expected mate in two score, got {}", r.score);

    // Every defence must leave a mate in one on the board.
    let first = after(&b, r.best_move);
    let replies = legal_moves(&first);
    assert!(!replies.is_empty(), "{} stalemates", r.best_move);
    for reply in replies {
        assert!(has_mate_in_one(&after(&first, reply)), "{} {} escapes", r.best_move, reply);
    }
}

#[test]
fn mate_in_two_survives_a_warm_cache() {
    let b = board(ROOK_LADDER);
    let mut s = Searcher::new(EngineConfig { max_depth: 3, ..EngineConfig::default() });
    let first = s.select_move(&b, None).unwrap();
    let second = s.select_move(&b, None).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(second.score, MATE_SCORE - 3);
}
