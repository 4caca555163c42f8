use cozy_chess::{Board as CozyBoard, Color, Move, Piece};

#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        CozyBoard::from_fen(fen, false).map(|b| Self { board: b }).map_err(|e| format!("FEN error: {e:?}"))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    /// Plays a move given in UCI notation. Castling is accepted both as the
    /// king's two-square step (`e1g1`) and as king-takes-rook (`e1h1`).
    pub fn make_move_uci(&mut self, mv_uci: &str) -> Result<(), String> {
        let found = legal_moves(&self.board).into_iter().find(|&m| {
            let s = m.to_string();
            s == mv_uci || standard_castle_uci(&self.board, m).as_deref() == Some(mv_uci)
        });
        match found {
            Some(m) => { self.board.play(m); Ok(()) }
            None => Err(format!("Illegal move: {}", mv_uci)),
        }
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn with_moves(mut self, moves: &[String]) -> Result<Self, String> {
        for m in moves { self.make_move_uci(m)?; }
        Ok(self)
    }
}

/// All legal moves in generation order.
pub fn legal_moves(board: &CozyBoard) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    board.generate_moves(|ml| { moves.extend(ml); false });
    moves
}

pub fn has_legal_moves(board: &CozyBoard) -> bool {
    let mut any = false;
    board.generate_moves(|ml| { any = !ml.is_empty(); any });
    any
}

/// Kind of the piece making `mv`.
pub fn moved_piece(board: &CozyBoard, mv: Move) -> Option<Piece> {
    board.piece_on(mv.from)
}

/// Captured piece kind, counting en passant as a pawn capture. Castling
/// (king onto own rook) is not a capture.
pub fn captured_piece(board: &CozyBoard, mv: Move) -> Option<Piece> {
    let stm = board.side_to_move();
    match board.color_on(mv.to) {
        Some(c) if c != stm => board.piece_on(mv.to),
        Some(_) => None,
        None => {
            let diagonal_pawn_step = moved_piece(board, mv) == Some(Piece::Pawn) && mv.from.file() != mv.to.file();
            diagonal_pawn_step.then_some(Piece::Pawn)
        }
    }
}

pub fn is_capture(board: &CozyBoard, mv: Move) -> bool {
    captured_piece(board, mv).is_some()
}

pub fn is_promotion(mv: Move) -> bool {
    mv.promotion.is_some()
}

pub fn in_check(board: &CozyBoard) -> bool {
    !board.checkers().is_empty()
}

pub fn is_checkmate(board: &CozyBoard) -> bool {
    in_check(board) && !has_legal_moves(board)
}

fn standard_castle_uci(board: &CozyBoard, mv: Move) -> Option<String> {
    if moved_piece(board, mv) != Some(Piece::King) { return None; }
    if board.color_on(mv.to) != Some(board.side_to_move()) { return None; }
    let file = if mv.to.file() as usize > mv.from.file() as usize { "g" } else { "c" };
    let rank = mv.from.rank() as usize + 1;
    Some(format!("{}{}{}", mv.from, file, rank))
}
