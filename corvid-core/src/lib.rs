//! Bitboard chess position representation, magic-bitboard attack tables, legal move
//! generation and Static Exchange Evaluation.
//!
//! # Examples
//!
//! ```
//! use corvid_core::position::Position;
//! use corvid_core::movegen;
//!
//! let pos = Position::start_pos();
//! let moves = movegen::generate_legal(&pos);
//! assert_eq!(moves.len(), 20);
//! ```

#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

pub mod attacks;
pub mod core;
pub mod movegen;
pub mod perft;
pub mod position;
pub mod see;
pub mod zobrist;

pub use core::bitboard::BitBoard;
pub use core::piece_move::BitMove;
pub use core::move_list::MoveList;
pub use core::square::SQ;
pub use core::{Piece, PieceType, Player};
pub use position::{FenError, Position};
