use castlebot::config::EngineConfig;
use castlebot::uci::UciEngine;
use std::io::Cursor;

fn run(engine: &mut UciEngine, script: &str) -> String {
    let mut out = Vec::new();
    engine.run(Cursor::new(script.as_bytes()), &mut out).expect("uci loop");
    String::from_utf8(out).unwrap()
}

#[test]
fn handshake_and_search_from_startpos_moves() {
    let mut engine = UciEngine::default();
    let out = run(&mut engine, "uci\nisready\nposition startpos moves e2e4 e7e5\ngo depth 2\nquit\n");
    assert!(out.contains("uciok"));
    assert!(out.contains("readyok"));
    assert!(out.contains("info depth 2"), "{out}");
    let best = out.lines().find_map(|l| l.strip_prefix("bestmove ")).expect("bestmove line");
    assert_eq!(best.len(), 4, "unexpected move text {best}");
}

#[test]
fn fen_position_mate_in_one() {
    let mut engine = UciEngine::default();
    let out = run(&mut engine, "position fen 6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1\ngo movetime 500\n");
    assert!(out.contains("bestmove e1e8"), "{out}");
}

#[test]
fn fen_with_moves_is_applied() {
    let mut engine = UciEngine::default();
    run(&mut engine, "position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1 moves e1g1\n");
    assert_eq!(engine.position().board().to_string(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
}

#[test]
fn mated_position_answers_null_move() {
    let mut engine = UciEngine::new(EngineConfig::default());
    let out = run(&mut engine, "position fen 4Q1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1\ngo depth 3\n");
    assert!(out.contains("bestmove 0000"), "{out}");
}

#[test]
fn clock_budget_search_returns_a_move() {
    let mut engine = UciEngine::default();
    let out = run(&mut engine, "ucinewgame\nposition startpos\ngo wtime 2000 btime 2000 winc 0 binc 0\n");
    assert!(out.lines().any(|l| l.starts_with("bestmove ") && l != "bestmove 0000"), "{out}");
}

#[test]
fn out_of_range_depth_falls_back_to_configured_depth() {
    let mut engine = UciEngine::default();
    // 2^32 + 1 must not wrap around to depth 1.
    let out = run(&mut engine, "position startpos\ngo depth 4294967297\n");
    assert!(out.contains("info depth 3 "), "{out}");
}
