//! Zobrist hashing: an incremental 64-bit position key built by XOR-ing together a
//! pseudo-random number per (piece, square), per en-passant file, per castling-rights
//! combination and for the side to move.
//!
//! Keys are generated once at process startup from a fixed seed, so the same position
//! always hashes to the same key within a single build -- but the key space is not
//! portable across builds or processes, matching how every reference engine that uses
//! this scheme treats it (a position hash is a book-keeping ID, never a protocol wire
//! value).

use lazy_static::lazy_static;

use crate::core::bitboard::{BitBoard, Prng};
use crate::core::masks::{ALL_CASTLING_RIGHTS, FILE_CNT, SQ_CNT};
use crate::core::square::SQ;
use crate::core::Piece;

const ZOBRIST_SEED: u64 = 23_081;

struct ZobristKeys {
    piece_square: [[u64; 12]; SQ_CNT],
    en_passant: [u64; FILE_CNT],
    castle: [u64; ALL_CASTLING_RIGHTS],
    side: u64,
}

impl ZobristKeys {
    fn generate() -> ZobristKeys {
        let mut rng = Prng::init(ZOBRIST_SEED);
        let mut piece_square = [[0u64; 12]; SQ_CNT];
        for sq_keys in piece_square.iter_mut() {
            for key in sq_keys.iter_mut() {
                *key = rng.rand();
            }
        }

        let mut en_passant = [0u64; FILE_CNT];
        for key in en_passant.iter_mut() {
            *key = rng.rand();
        }

        // Every right-combination's key is the XOR of the single-right keys it's
        // built from, so clearing or granting one right during make/unmake is a
        // single XOR rather than a table lookup keyed by the post-move combination.
        let mut single_right = [0u64; 4];
        for key in single_right.iter_mut() {
            *key = rng.rand();
        }
        let mut castle = [0u64; ALL_CASTLING_RIGHTS];
        for (cr, key) in castle.iter_mut().enumerate() {
            let mut bits = BitBoard(cr as u64);
            let mut acc = 0u64;
            while let Some(bit) = bits.pop_some_lsb() {
                acc ^= single_right[bit.0 as usize];
            }
            *key = acc;
        }

        ZobristKeys {
            piece_square,
            en_passant,
            castle,
            side: rng.rand(),
        }
    }
}

lazy_static! {
    static ref KEYS: ZobristKeys = ZobristKeys::generate();
}

/// The key contribution of `piece` sitting on `sq`.
#[inline(always)]
pub fn z_square(sq: SQ, piece: Piece) -> u64 {
    debug_assert!(sq.is_okay());
    debug_assert_ne!(piece, Piece::None);
    KEYS.piece_square[sq.0 as usize][piece as usize]
}

/// The key contribution of an en-passant target on `sq`'s file.
#[inline(always)]
pub fn z_ep(sq: SQ) -> u64 {
    debug_assert!(sq.is_okay());
    KEYS.en_passant[sq.file() as usize]
}

/// The key contribution of `castle`, a 4-bit castling-rights mask.
#[inline(always)]
pub fn z_castle(castle: u8) -> u64 {
    debug_assert!((castle as usize) < ALL_CASTLING_RIGHTS);
    KEYS.castle[castle as usize]
}

/// The key contribution of it being black's turn to move (XORed in and out as the
/// side to move flips; never applied for white, by convention).
#[inline(always)]
pub fn z_side() -> u64 {
    KEYS.side
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_across_calls() {
        assert_eq!(z_square(SQ::E4, Piece::WhitePawn), z_square(SQ::E4, Piece::WhitePawn));
        assert_eq!(z_side(), z_side());
    }

    #[test]
    fn distinct_inputs_give_distinct_keys() {
        assert_ne!(z_square(SQ::E4, Piece::WhitePawn), z_square(SQ::E4, Piece::BlackPawn));
        assert_ne!(z_square(SQ::E4, Piece::WhitePawn), z_square(SQ::D4, Piece::WhitePawn));
    }

    #[test]
    fn castle_rights_key_is_xor_of_individual_rights() {
        let k_only = z_castle(0b0001);
        let q_only = z_castle(0b0010);
        let both = z_castle(0b0011);
        assert_eq!(k_only ^ q_only, both);
    }

    #[test]
    fn no_rights_has_zero_key() {
        assert_eq!(z_castle(0), 0);
    }
}
