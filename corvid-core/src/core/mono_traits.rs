//! Per-player direction helpers, monomorphized via dummy `WhiteType`/`BlackType`
//! structs so pawn-generation code can be written once and specialized by the
//! compiler for each side rather than branching on `Player` at runtime.
//!
//! Under this crate's top-down numbering (square 0 = a8), "up" — towards the
//! opponent's back rank — is a *decreasing* square index for White and an
//! *increasing* one for Black; the reverse of the more common a1=0 convention.

use super::bitboard::BitBoard;
use super::square::SQ;
use super::Player;

/// Per-player direction and shift operations, used to write pawn-move generation
/// generically over the side to move.
pub trait PlayerTrait {
    fn player() -> Player;
    fn opp_player() -> Player;
    fn player_idx() -> usize;

    fn up(sq: SQ) -> SQ;
    fn down(sq: SQ) -> SQ;
    fn left(sq: SQ) -> SQ;
    fn right(sq: SQ) -> SQ;
    fn up_left(sq: SQ) -> SQ;
    fn up_right(sq: SQ) -> SQ;
    fn down_left(sq: SQ) -> SQ;
    fn down_right(sq: SQ) -> SQ;

    fn shift_up(bb: BitBoard) -> BitBoard;
    fn shift_down(bb: BitBoard) -> BitBoard;
    fn shift_left(bb: BitBoard) -> BitBoard;
    fn shift_right(bb: BitBoard) -> BitBoard;
    fn shift_up_left(bb: BitBoard) -> BitBoard;
    fn shift_up_right(bb: BitBoard) -> BitBoard;
    fn shift_down_left(bb: BitBoard) -> BitBoard;
    fn shift_down_right(bb: BitBoard) -> BitBoard;

    /// The rank pawns start on for this player.
    fn pawn_start_rank_bb() -> BitBoard;
    /// The rank a pawn promotes from (one step before the back rank).
    fn pawn_promo_rank_bb() -> BitBoard;
}

/// Dummy type standing in for `Player::White` at the type level.
pub struct WhiteType;
/// Dummy type standing in for `Player::Black` at the type level.
pub struct BlackType;

impl PlayerTrait for WhiteType {
    #[inline(always)]
    fn player() -> Player {
        Player::White
    }
    #[inline(always)]
    fn opp_player() -> Player {
        Player::Black
    }
    #[inline(always)]
    fn player_idx() -> usize {
        Player::White as usize
    }

    #[inline(always)]
    fn up(sq: SQ) -> SQ {
        sq - SQ(8)
    }
    #[inline(always)]
    fn down(sq: SQ) -> SQ {
        sq + SQ(8)
    }
    #[inline(always)]
    fn left(sq: SQ) -> SQ {
        sq - SQ(1)
    }
    #[inline(always)]
    fn right(sq: SQ) -> SQ {
        sq + SQ(1)
    }
    #[inline(always)]
    fn up_left(sq: SQ) -> SQ {
        sq - SQ(9)
    }
    #[inline(always)]
    fn up_right(sq: SQ) -> SQ {
        sq - SQ(7)
    }
    #[inline(always)]
    fn down_left(sq: SQ) -> SQ {
        sq + SQ(7)
    }
    #[inline(always)]
    fn down_right(sq: SQ) -> SQ {
        sq + SQ(9)
    }

    #[inline(always)]
    fn shift_up(bb: BitBoard) -> BitBoard {
        bb >> 8
    }
    #[inline(always)]
    fn shift_down(bb: BitBoard) -> BitBoard {
        bb << 8
    }
    #[inline(always)]
    fn shift_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 1
    }
    #[inline(always)]
    fn shift_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 1
    }
    #[inline(always)]
    fn shift_up_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 9
    }
    #[inline(always)]
    fn shift_up_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) >> 7
    }
    #[inline(always)]
    fn shift_down_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) << 7
    }
    #[inline(always)]
    fn shift_down_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 9
    }

    #[inline(always)]
    fn pawn_start_rank_bb() -> BitBoard {
        BitBoard::RANK_2
    }
    #[inline(always)]
    fn pawn_promo_rank_bb() -> BitBoard {
        BitBoard::RANK_7
    }
}

impl PlayerTrait for BlackType {
    #[inline(always)]
    fn player() -> Player {
        Player::Black
    }
    #[inline(always)]
    fn opp_player() -> Player {
        Player::White
    }
    #[inline(always)]
    fn player_idx() -> usize {
        Player::Black as usize
    }

    #[inline(always)]
    fn up(sq: SQ) -> SQ {
        sq + SQ(8)
    }
    #[inline(always)]
    fn down(sq: SQ) -> SQ {
        sq - SQ(8)
    }
    #[inline(always)]
    fn left(sq: SQ) -> SQ {
        sq + SQ(1)
    }
    #[inline(always)]
    fn right(sq: SQ) -> SQ {
        sq - SQ(1)
    }
    #[inline(always)]
    fn up_left(sq: SQ) -> SQ {
        sq + SQ(9)
    }
    #[inline(always)]
    fn up_right(sq: SQ) -> SQ {
        sq + SQ(7)
    }
    #[inline(always)]
    fn down_left(sq: SQ) -> SQ {
        sq - SQ(7)
    }
    #[inline(always)]
    fn down_right(sq: SQ) -> SQ {
        sq - SQ(9)
    }

    #[inline(always)]
    fn shift_up(bb: BitBoard) -> BitBoard {
        bb << 8
    }
    #[inline(always)]
    fn shift_down(bb: BitBoard) -> BitBoard {
        bb >> 8
    }
    #[inline(always)]
    fn shift_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) << 1
    }
    #[inline(always)]
    fn shift_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) >> 1
    }
    #[inline(always)]
    fn shift_up_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) << 9
    }
    #[inline(always)]
    fn shift_up_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 7
    }
    #[inline(always)]
    fn shift_down_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 7
    }
    #[inline(always)]
    fn shift_down_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) >> 9
    }

    #[inline(always)]
    fn pawn_start_rank_bb() -> BitBoard {
        BitBoard::RANK_7
    }
    #[inline(always)]
    fn pawn_promo_rank_bb() -> BitBoard {
        BitBoard::RANK_2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_up_decreases_index() {
        assert_eq!(WhiteType::up(SQ::E2), SQ::E3);
        assert_eq!(BlackType::up(SQ::E7), SQ::E6);
    }
}
