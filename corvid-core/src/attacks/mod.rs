//! Precomputed attack tables: leaper pieces (pawn, knight, king) and magic-bitboard
//! lookups for the sliding pieces (bishop, rook, queen).
//!
//! Everything here is generated once, lazily, on first use and then read-only for the
//! rest of the process.

pub mod leapers;
pub mod magic;

use crate::core::bitboard::BitBoard;
use crate::core::square::SQ;
use crate::core::Player;

pub use leapers::{king_attacks, knight_attacks, pawn_attacks};
pub use magic::{bishop_attacks, rook_attacks};

/// Forces the lazily-initialized attack tables to build now rather than on first query.
/// Search startup calls this so the first `go` isn't the one paying the magic-number
/// search cost.
pub fn warm_up() {
    let _ = magic::bishop_attacks(BitBoard(0), SQ::A1);
    let _ = magic::rook_attacks(BitBoard(0), SQ::A1);
    let _ = leapers::knight_attacks(SQ::A1);
    let _ = leapers::king_attacks(SQ::A1);
    let _ = leapers::pawn_attacks(SQ::A1, Player::White);
}

/// Queen attacks are the union of the bishop and rook rays from the same square.
#[inline(always)]
pub fn queen_attacks(occupied: BitBoard, sq: SQ) -> BitBoard {
    bishop_attacks(occupied, sq) | rook_attacks(occupied, sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let occ = BitBoard(0);
        let q = queen_attacks(occ, SQ::D4);
        let r = rook_attacks(occ, SQ::D4);
        let b = bishop_attacks(occ, SQ::D4);
        assert_eq!(q, r | b);
    }
}
