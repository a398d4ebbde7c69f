//! Pseudo-legal and legal move generation.
//!
//! Generation is split by piece type over bitboards, then pseudo-legal moves are
//! filtered to legal ones simply by replaying each one
//! through [`Position::make_move`] and keeping the ones that return `Some` — copy-make
//! already does the "does this leave my own king in check" work a separate legality
//! checker would otherwise duplicate.

use crate::attacks;
use crate::core::bitboard::BitBoard;
use crate::core::masks::*;
use crate::core::mono_traits::{BlackType, PlayerTrait, WhiteType};
use crate::core::move_list::MoveList;
use crate::core::piece_move::{BitMove, PreMoveInfo};
use crate::core::square::{SQ, NO_SQ};
use crate::core::{Piece, PieceType, Player};
use crate::position::Position;

const PROMO_PIECES: [PieceType; 4] = [PieceType::Q, PieceType::R, PieceType::B, PieceType::N];

/// Every pseudo-legal move for the side to move. May include moves that leave that
/// side's own king in check, or castle through an attacked square.
pub fn generate_pseudo_legal(pos: &Position) -> MoveList {
    match pos.side_to_move() {
        Player::White => generate::<WhiteType>(pos),
        Player::Black => generate::<BlackType>(pos),
    }
}

/// Every legal move for the side to move.
pub fn generate_legal(pos: &Position) -> MoveList {
    let mut out = MoveList::new();
    for &mv in generate_pseudo_legal(pos).iter() {
        if pos.make_move(mv, false).is_some() {
            out.push(mv);
        }
    }
    out
}

/// Legal capturing moves only (captures and en-passant), for quiescence search.
pub fn generate_legal_captures(pos: &Position) -> MoveList {
    let mut out = MoveList::new();
    for &mv in generate_pseudo_legal(pos).iter() {
        if (mv.is_capture() || mv.is_en_passant()) && pos.make_move(mv, true).is_some() {
            out.push(mv);
        }
    }
    out
}

fn generate<P: PlayerTrait>(pos: &Position) -> MoveList {
    let mut list = MoveList::new();
    let us = P::player();
    let occ = pos.occ_all();
    let us_occ = pos.occ_player(us);
    let them_occ = pos.occ_player(!us);

    gen_pawn_moves::<P>(pos, &mut list, us_occ, them_occ);
    gen_knight_moves(pos, &mut list, us, us_occ, them_occ);
    gen_slider_moves(pos, &mut list, Piece::make(us, PieceType::B), occ, us_occ, them_occ, attacks::bishop_attacks);
    gen_slider_moves(pos, &mut list, Piece::make(us, PieceType::R), occ, us_occ, them_occ, attacks::rook_attacks);
    gen_slider_moves(pos, &mut list, Piece::make(us, PieceType::Q), occ, us_occ, them_occ, attacks::queen_attacks);
    gen_king_moves(pos, &mut list, us, us_occ, them_occ);
    gen_castling::<P>(pos, &mut list, occ);

    list
}

#[inline]
fn push_simple_move(list: &mut MoveList, src: SQ, dst: SQ, piece: Piece, them_occ: BitBoard) {
    let capture = (dst.to_bb() & them_occ).is_not_empty();
    list.push(BitMove::init(PreMoveInfo {
        src,
        dst,
        piece,
        promotion: None,
        capture,
        double_push: false,
        en_passant: false,
        castle: false,
    }));
}

fn gen_knight_moves(pos: &Position, list: &mut MoveList, us: Player, us_occ: BitBoard, them_occ: BitBoard) {
    let mut knights = pos.piece_bb(Piece::make(us, PieceType::N));
    while let Some(src) = knights.pop_some_lsb() {
        let mut targets = attacks::knight_attacks(src) & !us_occ;
        while let Some(dst) = targets.pop_some_lsb() {
            push_simple_move(list, src, dst, Piece::make(us, PieceType::N), them_occ);
        }
    }
}

fn gen_king_moves(pos: &Position, list: &mut MoveList, us: Player, us_occ: BitBoard, them_occ: BitBoard) {
    let src = pos.king_sq(us);
    let mut targets = attacks::king_attacks(src) & !us_occ;
    while let Some(dst) = targets.pop_some_lsb() {
        push_simple_move(list, src, dst, Piece::make(us, PieceType::K), them_occ);
    }
}

fn gen_slider_moves(
    pos: &Position,
    list: &mut MoveList,
    piece: Piece,
    occ: BitBoard,
    us_occ: BitBoard,
    them_occ: BitBoard,
    attack_fn: fn(BitBoard, SQ) -> BitBoard,
) {
    let mut bb = pos.piece_bb(piece);
    while let Some(src) = bb.pop_some_lsb() {
        let mut targets = attack_fn(occ, src) & !us_occ;
        while let Some(dst) = targets.pop_some_lsb() {
            push_simple_move(list, src, dst, piece, them_occ);
        }
    }
}

fn gen_pawn_moves<P: PlayerTrait>(pos: &Position, list: &mut MoveList, us_occ: BitBoard, them_occ: BitBoard) {
    let us = P::player();
    let piece = Piece::make(us, PieceType::P);
    let occ = us_occ | them_occ;
    let empty = !occ;

    let all_pawns = pos.piece_bb(piece);
    let promo_rank = P::pawn_promo_rank_bb();
    let pawns_promo = all_pawns & promo_rank;
    let pawns_rest = all_pawns & !promo_rank;

    let mut push1 = P::shift_up(pawns_rest) & empty;
    let double_src = pawns_rest & P::pawn_start_rank_bb();
    let mut push2 = P::shift_up(P::shift_up(double_src) & empty) & empty;

    while let Some(dst) = push1.pop_some_lsb() {
        let src = P::down(dst);
        list.push(BitMove::init(PreMoveInfo {
            src,
            dst,
            piece,
            promotion: None,
            capture: false,
            double_push: false,
            en_passant: false,
            castle: false,
        }));
    }
    while let Some(dst) = push2.pop_some_lsb() {
        let src = P::down(P::down(dst));
        list.push(BitMove::init(PreMoveInfo {
            src,
            dst,
            piece,
            promotion: None,
            capture: false,
            double_push: true,
            en_passant: false,
            castle: false,
        }));
    }

    let mut left_cap = P::shift_up_left(pawns_rest) & them_occ;
    while let Some(dst) = left_cap.pop_some_lsb() {
        let src = P::down_right(dst);
        list.push(BitMove::init(PreMoveInfo {
            src,
            dst,
            piece,
            promotion: None,
            capture: true,
            double_push: false,
            en_passant: false,
            castle: false,
        }));
    }
    let mut right_cap = P::shift_up_right(pawns_rest) & them_occ;
    while let Some(dst) = right_cap.pop_some_lsb() {
        let src = P::down_left(dst);
        list.push(BitMove::init(PreMoveInfo {
            src,
            dst,
            piece,
            promotion: None,
            capture: true,
            double_push: false,
            en_passant: false,
            castle: false,
        }));
    }

    let mut push_promo = P::shift_up(pawns_promo) & empty;
    while let Some(dst) = push_promo.pop_some_lsb() {
        let src = P::down(dst);
        for &pt in PROMO_PIECES.iter() {
            list.push(BitMove::init(PreMoveInfo {
                src,
                dst,
                piece,
                promotion: Some(pt),
                capture: false,
                double_push: false,
                en_passant: false,
                castle: false,
            }));
        }
    }
    let mut left_cap_promo = P::shift_up_left(pawns_promo) & them_occ;
    while let Some(dst) = left_cap_promo.pop_some_lsb() {
        let src = P::down_right(dst);
        for &pt in PROMO_PIECES.iter() {
            list.push(BitMove::init(PreMoveInfo {
                src,
                dst,
                piece,
                promotion: Some(pt),
                capture: true,
                double_push: false,
                en_passant: false,
                castle: false,
            }));
        }
    }
    let mut right_cap_promo = P::shift_up_right(pawns_promo) & them_occ;
    while let Some(dst) = right_cap_promo.pop_some_lsb() {
        let src = P::down_left(dst);
        for &pt in PROMO_PIECES.iter() {
            list.push(BitMove::init(PreMoveInfo {
                src,
                dst,
                piece,
                promotion: Some(pt),
                capture: true,
                double_push: false,
                en_passant: false,
                castle: false,
            }));
        }
    }

    if pos.ep_square() != NO_SQ {
        let ep_sq = pos.ep_square();
        let mut attackers = pawns_rest & attacks::pawn_attacks(ep_sq, !us);
        while let Some(src) = attackers.pop_some_lsb() {
            list.push(BitMove::init(PreMoveInfo {
                src,
                dst: ep_sq,
                piece,
                promotion: None,
                capture: true,
                double_push: false,
                en_passant: true,
                castle: false,
            }));
        }
    }
}

fn gen_castling<P: PlayerTrait>(pos: &Position, list: &mut MoveList, occ: BitBoard) {
    let us = P::player();
    if pos.in_check() {
        return;
    }
    let rights = pos.castle_rights();
    let side_idx = us.idx();
    let (k_mask, q_mask) = match us {
        Player::White => (C_WHITE_K_MASK, C_WHITE_Q_MASK),
        Player::Black => (C_BLACK_K_MASK, C_BLACK_Q_MASK),
    };
    let king_src = pos.king_sq(us);
    let piece = Piece::make(us, PieceType::K);

    if rights & k_mask != 0 {
        let path = BitBoard(CASTLING_PATH[side_idx][0]);
        let (king_dst, transit): (SQ, [SQ; 2]) = match us {
            Player::White => (SQ::G1, [SQ::F1, SQ::G1]),
            Player::Black => (SQ::G8, [SQ::F8, SQ::G8]),
        };
        if (path & occ).is_empty() && transit.iter().all(|&s| !pos.attacked_by(s, !us)) {
            list.push(BitMove::init(PreMoveInfo {
                src: king_src,
                dst: king_dst,
                piece,
                promotion: None,
                capture: false,
                double_push: false,
                en_passant: false,
                castle: true,
            }));
        }
    }

    if rights & q_mask != 0 {
        let path = BitBoard(CASTLING_PATH[side_idx][1]);
        let (king_dst, transit): (SQ, [SQ; 2]) = match us {
            Player::White => (SQ::C1, [SQ::D1, SQ::C1]),
            Player::Black => (SQ::C8, [SQ::D8, SQ::C8]),
        };
        if (path & occ).is_empty() && transit.iter().all(|&s| !pos.attacked_by(s, !us)) {
            list.push(BitMove::init(PreMoveInfo {
                src: king_src,
                dst: king_dst,
                piece,
                promotion: None,
                capture: false,
                double_push: false,
                en_passant: false,
                castle: true,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pos_has_twenty_legal_moves() {
        let pos = Position::start_pos();
        assert_eq!(generate_legal(&pos).len(), 20);
    }

    #[test]
    fn every_pseudo_legal_move_is_reproduced_by_legal_subset() {
        let pos = Position::start_pos();
        let legal = generate_legal(&pos);
        let plegal = generate_pseudo_legal(&pos);
        assert!(legal.len() <= plegal.len());
        for mv in legal.iter() {
            assert!(plegal.iter().any(|m| m == mv));
        }
    }

    #[test]
    fn king_in_check_only_has_evading_moves() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        let legal = generate_legal(&pos);
        for mv in legal.iter() {
            let next = pos.make_move(*mv, false).unwrap();
            assert!(!next.attacked_by(next.king_sq(Player::White), Player::Black));
        }
    }

    #[test]
    fn pinned_piece_cannot_move_off_the_pin_line() {
        let pos = Position::from_fen("4k3/8/8/8/8/2b5/3R4/4K3 w - - 0 1").unwrap();
        let legal = generate_legal(&pos);
        let off_diagonal_moves: Vec<_> = legal
            .iter()
            .filter(|mv| mv.get_src() == SQ::D2 && mv.get_dest() != SQ::C3)
            .collect();
        assert!(off_diagonal_moves.is_empty());
    }

    #[test]
    fn stalemate_position_has_no_legal_moves() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!pos.in_check());
        assert_eq!(generate_legal(&pos).len(), 0);
    }

    #[test]
    fn castling_is_available_with_clear_path_and_rights() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let legal = generate_legal(&pos);
        assert!(legal.iter().any(|mv| mv.is_castle() && mv.get_dest() == SQ::G1));
        assert!(legal.iter().any(|mv| mv.is_castle() && mv.get_dest() == SQ::C1));
    }

    #[test]
    fn castling_through_check_is_illegal() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        let legal = generate_legal(&pos);
        assert!(!legal.iter().any(|mv| mv.is_castle() && mv.get_dest() == SQ::G1));
    }

    #[test]
    fn en_passant_move_is_generated_when_available() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let legal = generate_legal(&pos);
        assert!(legal.iter().any(|mv| mv.is_en_passant() && mv.get_dest() == SQ::D6));
    }
}
