//! Core chessboard primitives: squares, bitboards, pieces and packed moves.
//!
//! Square numbering throughout this crate is rank-major and top-down: square `0` is
//! `a8`, square `63` is `h1`. See [`square::SQ`] for the full convention.

#[macro_use]
mod macros;

pub mod bit_twiddles;
pub mod bitboard;
pub mod masks;
pub mod mono_traits;
pub mod move_list;
pub mod piece_move;
pub mod score;
pub mod square;

use std::mem::transmute;

/// One of the two sides in a chess game.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    #[inline(always)]
    pub fn other_player(self) -> Player {
        unsafe { transmute(self as u8 ^ 1) }
    }

    #[inline(always)]
    pub fn idx(self) -> usize {
        self as usize
    }
}

impl ::std::ops::Not for Player {
    type Output = Player;

    #[inline(always)]
    fn not(self) -> Player {
        self.other_player()
    }
}

/// The six kinds of chess piece, plus `None` and `All` sentinels used for indexing
/// piece-kind-keyed tables.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum PieceType {
    None = 0,
    P = 1,
    N = 2,
    B = 3,
    R = 4,
    Q = 5,
    K = 6,
    All = 7,
}

impl PieceType {
    #[inline(always)]
    pub fn value(self) -> i16 {
        match self {
            PieceType::P => 100,
            PieceType::N => 320,
            PieceType::B => 330,
            PieceType::R => 500,
            PieceType::Q => 900,
            PieceType::K => 20000,
            PieceType::None | PieceType::All => 0,
        }
    }

    #[inline(always)]
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::P),
            'N' => Some(PieceType::N),
            'B' => Some(PieceType::B),
            'R' => Some(PieceType::R),
            'Q' => Some(PieceType::Q),
            'K' => Some(PieceType::K),
            _ => None,
        }
    }
}

/// A piece of a specific color. Indexed `P,N,B,R,Q,K,p,n,b,r,q,k` as `0..11`;
/// `None` is a 13th sentinel slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Piece {
    WhitePawn = 0,
    WhiteKnight = 1,
    WhiteBishop = 2,
    WhiteRook = 3,
    WhiteQueen = 4,
    WhiteKing = 5,
    BlackPawn = 6,
    BlackKnight = 7,
    BlackBishop = 8,
    BlackRook = 9,
    BlackQueen = 10,
    BlackKing = 11,
    None = 12,
}

impl Piece {
    #[inline(always)]
    pub fn make(player: Player, piece_type: PieceType) -> Piece {
        debug_assert_ne!(piece_type, PieceType::None);
        debug_assert_ne!(piece_type, PieceType::All);
        unsafe { transmute((player as u8) * 6 + (piece_type as u8 - 1)) }
    }

    #[inline(always)]
    pub fn player(self) -> Option<Player> {
        if self == Piece::None {
            None
        } else {
            Some(unsafe { transmute((self as u8) / 6) })
        }
    }

    #[inline(always)]
    pub fn piece_type(self) -> PieceType {
        if self == Piece::None {
            PieceType::None
        } else {
            unsafe { transmute((self as u8) % 6 + 1) }
        }
    }

    #[inline(always)]
    pub fn value(self) -> i16 {
        self.piece_type().value()
    }

    #[inline(always)]
    pub fn character_lossy(self) -> char {
        let c = match self.piece_type() {
            PieceType::P => 'p',
            PieceType::N => 'n',
            PieceType::B => 'b',
            PieceType::R => 'r',
            PieceType::Q => 'q',
            PieceType::K => 'k',
            PieceType::None | PieceType::All => '_',
        };
        match self.player() {
            Some(Player::White) => c.to_ascii_uppercase(),
            _ => c,
        }
    }
}

/// A file (column) of the board, `A` through `H`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    #[inline(always)]
    pub fn from_char(c: char) -> Option<File> {
        match c {
            'a' => Some(File::A),
            'b' => Some(File::B),
            'c' => Some(File::C),
            'd' => Some(File::D),
            'e' => Some(File::E),
            'f' => Some(File::F),
            'g' => Some(File::G),
            'h' => Some(File::H),
            _ => None,
        }
    }
}

/// A rank (row) of the board, `R1` through `R8`.
///
/// Discriminants match the top-down square numbering's row index, so `R8 == 0` and
/// `R1 == 7`: `SQ::rank()` transmutes `sq.0 / 8` directly into this type.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    #[inline(always)]
    pub fn from_char(c: char) -> Option<Rank> {
        match c {
            '1' => Some(Rank::R1),
            '2' => Some(Rank::R2),
            '3' => Some(Rank::R3),
            '4' => Some(Rank::R4),
            '5' => Some(Rank::R5),
            '6' => Some(Rank::R6),
            '7' => Some(Rank::R7),
            '8' => Some(Rank::R8),
            _ => None,
        }
    }

    /// The algebraic rank number, `1..=8`.
    #[inline(always)]
    pub fn number(self) -> u8 {
        8 - self as u8
    }
}

/// Plies beyond which search and repetition bookkeeping no longer track individual
/// positions. Chosen generously above any depth this engine reaches.
pub const MAX_PLY: usize = 128;

/// Score representing checkmate, offset per-ply by the search so that shorter mates
/// sort ahead of longer ones.
pub const MATE_VALUE: i32 = 32_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_round_trips_through_make() {
        let p = Piece::make(Player::Black, PieceType::N);
        assert_eq!(p, Piece::BlackKnight);
        assert_eq!(p.player(), Some(Player::Black));
        assert_eq!(p.piece_type(), PieceType::N);
    }

    #[test]
    fn player_not_flips() {
        assert_eq!(!Player::White, Player::Black);
        assert_eq!(!Player::Black, Player::White);
    }
}
