use cozy_chess::{Board, Color, Piece};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

const PIECE_KEYS: usize = 12 * 64;
const CASTLE_KEYS: usize = 2 * 2 * 8;
const EP_KEYS: usize = 8;
const SEED: u64 = 0xF00D_F00D_DEAD_BEEF;

struct Keys {
    pieces: [u64; PIECE_KEYS],
    castles: [u64; CASTLE_KEYS],
    en_passant: [u64; EP_KEYS],
    side: u64,
}

static KEYS: OnceLock<Keys> = OnceLock::new();

fn keys() -> &'static Keys {
    KEYS.get_or_init(|| {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut pieces = [0u64; PIECE_KEYS];
        let mut castles = [0u64; CASTLE_KEYS];
        let mut en_passant = [0u64; EP_KEYS];
        pieces.iter_mut().for_each(|v| *v = rng.gen());
        castles.iter_mut().for_each(|v| *v = rng.gen());
        en_passant.iter_mut().for_each(|v| *v = rng.gen());
        Keys { pieces, castles, en_passant, side: rng.gen() }
    })
}

fn color_index(color: Color) -> usize {
    if color == Color::White { 0 } else { 1 }
}

fn piece_index(color: Color, piece: Piece) -> usize {
    let p = match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    };
    color_index(color) * 6 + p
}

/// Position fingerprint used as the transposition cache key. Covers piece
/// placement, side to move, castling rights and the en-passant file.
pub fn compute(board: &Board) -> u64 {
    let k = keys();
    let mut key = 0u64;
    for &color in &[Color::White, Color::Black] {
        for &piece in &[Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for sq in board.colors(color) & board.pieces(piece) {
                key ^= k.pieces[piece_index(color, piece) * 64 + sq as usize];
            }
        }
        let rights = board.castle_rights(color);
        let base = color_index(color) * 16;
        if let Some(file) = rights.short { key ^= k.castles[base + file as usize]; }
        if let Some(file) = rights.long { key ^= k.castles[base + 8 + file as usize]; }
    }
    if let Some(file) = board.en_passant() { key ^= k.en_passant[file as usize]; }
    if board.side_to_move() == Color::Black { key ^= k.side; }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposed_move_orders_share_a_key() {
        let mut a = Board::default();
        let mut b = Board::default();
        for m in ["g1f3", "g8f6", "b1c3"] { a.play(m.parse().unwrap()); }
        for m in ["b1c3", "g8f6", "g1f3"] { b.play(m.parse().unwrap()); }
        assert_eq!(compute(&a), compute(&b));
    }

    #[test]
    fn side_to_move_changes_key() {
        let w = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", false).unwrap();
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1", false).unwrap();
        assert_ne!(compute(&w), compute(&b));
    }

    #[test]
    fn castling_rights_change_key() {
        let with = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", false).unwrap();
        let without = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1", false).unwrap();
        assert_ne!(compute(&with), compute(&without));
    }
}
