use cozy_chess::{Board, Color, File, Piece, Rank, Square};

// Indexed by [rank relative to the pawn's owner][file].
const PAWN_TABLE: [[i32; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const RAYS: [(i32, i32); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

fn forward(color: Color) -> i32 {
    if color == Color::White { 1 } else { -1 }
}

fn opponent(color: Color) -> Color {
    if color == Color::White { Color::Black } else { Color::White }
}

fn square_at(file: i32, rank: i32) -> Option<Square> {
    if !(0..8).contains(&file) || !(0..8).contains(&rank) { return None; }
    Some(Square::new(File::index(file as usize), Rank::index(rank as usize)))
}

fn is_pawn_of(board: &Board, sq: Square, color: Color) -> bool {
    board.piece_on(sq) == Some(Piece::Pawn) && board.color_on(sq) == Some(color)
}

pub fn pawn_table_bonus(sq: Square, color: Color) -> i32 {
    let rank = sq.rank() as usize;
    let rel = if color == Color::White { rank } else { 7 - rank };
    PAWN_TABLE[rel][sq.file() as usize]
}

/// A pawn is passed when no enemy pawn stands ahead of it on its own or an
/// adjacent file and no friendly pawn stands ahead of it on its own file.
pub fn is_passed_pawn(board: &Board, sq: Square, color: Color) -> bool {
    let dir = forward(color);
    let f = sq.file() as i32;
    let mut r = sq.rank() as i32 + dir;
    while (0..8).contains(&r) {
        for df in -1..=1 {
            let Some(ahead) = square_at(f + df, r) else { continue };
            if is_pawn_of(board, ahead, opponent(color)) { return false; }
            if df == 0 && is_pawn_of(board, ahead, color) { return false; }
        }
        r += dir;
    }
    true
}

/// True when the king has a hole in its pawn shelter (own or adjacent file
/// without a friendly pawn on the two ranks in front) or an enemy slider has
/// an open line to it.
pub fn is_king_exposed(board: &Board, sq: Square, color: Color) -> bool {
    let dir = forward(color);
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    for df in -1..=1 {
        if !(0..8).contains(&(f + df)) { continue; }
        let sheltered = (1..=2)
            .filter_map(|step| square_at(f + df, r + step * dir))
            .any(|s| is_pawn_of(board, s, color));
        if !sheltered { return true; }
    }
    has_open_slider_line(board, sq, color)
}

/// Walks the eight rays from `sq`; the first occupied square on each ray
/// decides whether that ray is an attack line against `color`.
pub fn has_open_slider_line(board: &Board, sq: Square, color: Color) -> bool {
    let f = sq.file() as i32;
    let r = sq.rank() as i32;
    for (df, dr) in RAYS {
        let orthogonal = df == 0 || dr == 0;
        let mut step = 1;
        while let Some(s) = square_at(f + step * df, r + step * dr) {
            if let (Some(piece), Some(owner)) = (board.piece_on(s), board.color_on(s)) {
                if owner != color {
                    let slides_here = match piece {
                        Piece::Queen => true,
                        Piece::Rook => orthogonal,
                        Piece::Bishop => !orthogonal,
                        _ => false,
                    };
                    if slides_here { return true; }
                }
                break;
            }
            step += 1;
        }
    }
    false
}
