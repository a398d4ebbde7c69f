//! Position scoring: a pluggable [`Evaluator`] trait plus the always-available
//! [`MaterialEvaluator`] fallback, so the engine can play a full game with no external
//! weights file.
//!
//! The board-facing [`evaluate`] function does the marshaling any evaluator needs:
//! walking the piece bitboards into sentinel-terminated `pieces[]`/`squares[]` arrays
//! with the side-to-move's king first, then handing those to whichever `Evaluator` is
//! configured, and finally biasing the result toward a draw as the fifty-move counter
//! climbs.

use corvid_core::core::{Piece, PieceType, Player};
use corvid_core::position::Position;

/// Sentinel marking the end of a `pieces`/`squares` array, matching neither a valid
/// `Piece` discriminant nor a valid square index.
pub const NO_PIECE: i8 = -1;
const MAX_PIECES: usize = 34; // 32 board pieces + 2 king sentinels can never overlap, 32 is enough but round up

/// A pure scoring function: given the side to move and the marshaled piece/square
/// arrays (kings at slots 0 and 1), returns a centipawn score from that side's
/// perspective. Implementations must not look at anything but their arguments.
pub trait Evaluator {
    fn evaluate(&self, side: Player, pieces: &[i8], squares: &[i8]) -> i32;
}

/// Classical material count plus a compact piece-square table, in lieu of any trained
/// weights. Always available; this is what the engine uses when no weights file is
/// configured or the configured one fails to load.
pub struct MaterialEvaluator;

/// Flat, single-phase piece-square bonuses indexed `[piece_type][square 0..63]`, square
/// 0 = a1 from the evaluated side's own perspective. Crude compared to a tapered
/// midgame/endgame table, but enough to stop pieces from being developed blindly.
const PAWN_PST: [i32; 64] = pst_row_repeat([0, 5, 5, -10, -10, 5, 5, 0], [0, 10, 10, 20, 20, 10, 10, 0]);
const KNIGHT_PST: [i32; 64] = pst_row_repeat(
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 10, 15, 15, 10, 0, -10],
);

const fn pst_row_repeat(edge: [i32; 8], middle: [i32; 8]) -> [i32; 64] {
    let mut table = [0i32; 64];
    let mut rank = 0;
    while rank < 8 {
        let row = if rank == 0 || rank == 7 { edge } else { middle };
        let mut file = 0;
        while file < 8 {
            table[rank * 8 + file] = row[file];
            file += 1;
        }
        rank += 1;
    }
    table
}

impl MaterialEvaluator {
    fn piece_square_bonus(pt: PieceType, sq: i8) -> i32 {
        let sq = sq as usize;
        match pt {
            PieceType::P => PAWN_PST[sq],
            PieceType::N => KNIGHT_PST[sq],
            _ => 0,
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, side: Player, pieces: &[i8], squares: &[i8]) -> i32 {
        let mut score = 0i32;
        for (i, &p) in pieces.iter().enumerate() {
            if p == NO_PIECE {
                break;
            }
            let piece = decode_piece(p);
            let sq = squares[i];
            let value = PieceType::value(piece.piece_type()) as i32;
            let owner = piece.player().expect("sentinel already filtered out Piece::None");
            let pst = MaterialEvaluator::piece_square_bonus(piece.piece_type(), relative_square(sq, owner));
            let signed = if owner == side { value + pst } else { -(value + pst) };
            score += signed;
        }
        score
    }
}

fn relative_square(sq: i8, owner: Player) -> i8 {
    match owner {
        Player::White => sq,
        Player::Black => sq ^ 56,
    }
}

fn decode_piece(code: i8) -> Piece {
    unsafe { std::mem::transmute(code as u8) }
}

/// Marshals `pos` into the sentinel-terminated piece/square arrays and calls `evaluator`,
/// then applies the fifty-move draw bias described for the evaluation adapter.
pub fn evaluate(pos: &Position, evaluator: &dyn Evaluator) -> i32 {
    let mut pieces = [NO_PIECE; MAX_PIECES];
    let mut squares = [0i8; MAX_PIECES];
    let us = pos.side_to_move();

    let mut slot = 2; // 0 and 1 reserved for the kings
    let us_king = pos.king_sq(us);
    let them_king = pos.king_sq(!us);
    pieces[0] = Piece::make(us, PieceType::K) as i8;
    squares[0] = us_king.0 as i8;
    pieces[1] = Piece::make(!us, PieceType::K) as i8;
    squares[1] = them_king.0 as i8;

    for &pt in &[PieceType::P, PieceType::N, PieceType::B, PieceType::R, PieceType::Q] {
        for &player in &[Player::White, Player::Black] {
            let mut bb = pos.piece_bb(Piece::make(player, pt));
            while bb.is_not_empty() {
                let sq = bb.bit_scan_forward();
                bb &= !sq.to_bb();
                pieces[slot] = Piece::make(player, pt) as i8;
                squares[slot] = sq.0 as i8;
                slot += 1;
            }
        }
    }

    let raw = evaluator.evaluate(us, &pieces[..slot], &squares[..slot]);
    let fifty = pos.fifty_move_counter() as i32;
    (raw * (100 - fifty).max(0)) / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_exactly_balanced() {
        let pos = Position::start_pos();
        let eval = MaterialEvaluator;
        assert_eq!(evaluate(&pos, &eval), 0);
    }

    #[test]
    fn missing_a_rook_scores_negative_for_the_side_down_material() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let full = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let eval = MaterialEvaluator;
        assert!(evaluate(&pos, &eval) > evaluate(&full, &eval));
    }

    #[test]
    fn fifty_move_counter_scales_the_score_toward_zero() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 80 1").unwrap();
        let fresh = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let eval = MaterialEvaluator;
        assert!(evaluate(&pos, &eval) < evaluate(&fresh, &eval));
    }
}
