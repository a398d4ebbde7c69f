//! Iterative-deepening PVS search: negamax with aspiration windows, null-move and
//! razoring pruning, late-move reductions, and a capture-only quiescence tail.
//!
//! Every worker thread owns its own [`ThreadData`] (killers, history, PV table, node
//! count) and shares only the [`TranspositionTable`] and the stop flag with its
//! siblings — see the `threadpool` module for how the workers are actually spun up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use corvid_core::core::piece_move::BitMove;
use corvid_core::movegen;
use corvid_core::position::Position;
use corvid_core::see;

use crate::eval::{self, Evaluator};
use crate::movepick::{new_history, History, MovePicker};
use crate::tt::{Bound, TranspositionTable};

pub const MAX_PLY: usize = 128;
pub const MATE_VALUE: i32 = 32_000;
pub const INFINITE: i32 = 1_000_000;
const MATE_THRESHOLD: i32 = MATE_VALUE - MAX_PLY as i32;
const NODES_PER_STOP_CHECK: u64 = 2048;

/// Per-thread search state: everything a worker mutates while walking its own line.
/// Cheap to reset between searches (`ucinewgame`), never shared across threads.
pub struct ThreadData {
    pub killers: [[BitMove; 2]; MAX_PLY],
    pub history: History,
    pv_table: [[BitMove; MAX_PLY]; MAX_PLY],
    pv_length: [usize; MAX_PLY],
    pub nodes: u64,
}

impl ThreadData {
    pub fn new() -> ThreadData {
        ThreadData {
            killers: [[BitMove::null(); 2]; MAX_PLY],
            history: new_history(),
            pv_table: [[BitMove::null(); MAX_PLY]; MAX_PLY],
            pv_length: [0; MAX_PLY],
            nodes: 0,
        }
    }

    pub fn clear(&mut self) {
        self.killers = [[BitMove::null(); 2]; MAX_PLY];
        self.history = new_history();
        self.nodes = 0;
    }
}

impl Default for ThreadData {
    fn default() -> ThreadData {
        ThreadData::new()
    }
}

/// What every worker shares: the transposition table, the cooperative stop flag, the
/// evaluator, and (if the search is time-bounded) the instant to stop by.
pub struct SearchContext<'a> {
    pub tt: &'a TranspositionTable,
    pub stop: &'a AtomicBool,
    pub evaluator: &'a dyn Evaluator,
    pub stop_time: Option<Instant>,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: BitMove,
    pub score: i32,
    pub depth: i32,
    pub pv: Vec<BitMove>,
    pub nodes: u64,
}

/// Moves to mate for a reported score, signed: positive when the side to move delivers
/// mate, negative when it's being mated. `None` if `score` isn't a forced mate.
pub fn mate_in_moves(score: i32) -> Option<i32> {
    if score >= MATE_THRESHOLD {
        Some((MATE_VALUE - score + 1) / 2)
    } else if score <= -MATE_THRESHOLD {
        Some(-(MATE_VALUE + score + 1) / 2)
    } else {
        None
    }
}

fn value_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn value_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

fn should_stop(ctx: &SearchContext, td: &ThreadData) -> bool {
    if td.nodes % NODES_PER_STOP_CHECK != 0 {
        return false;
    }
    if ctx.stop.load(Ordering::Relaxed) {
        return true;
    }
    if let Some(deadline) = ctx.stop_time {
        if Instant::now() >= deadline {
            ctx.stop.store(true, Ordering::Relaxed);
            return true;
        }
    }
    false
}

/// Runs iterative deepening from `root` up to `max_depth`, calling `on_iteration`
/// after every depth that completes inside its aspiration window (or is forced open
/// after a fail-high/fail-low). Returns the best result found before the search
/// stopped, either by exhausting `max_depth` or by the shared stop flag firing.
///
/// `jitter` is added to the depth actually handed to `negamax` at every iteration
/// (recomputed fresh each call, including aspiration retries) without disturbing the
/// `current_depth`/aspiration bookkeeping below — a Lazy-SMP helper passes a small
/// nonzero jitter so its searches explore slightly off-depth from the main worker's.
pub fn iterative_deepening(
    root: &Position,
    max_depth: i32,
    jitter: i32,
    td: &mut ThreadData,
    ctx: &SearchContext,
    mut on_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    let mut best = SearchResult { best_move: BitMove::null(), score: 0, depth: 0, pv: Vec::new(), nodes: 0 };
    let mut score = 0;
    let mut depth = 1;

    while depth <= max_depth {
        if ctx.stop.load(Ordering::Relaxed) {
            break;
        }

        let mut alpha = if depth == 1 { -INFINITE } else { score - 50 };
        let mut beta = if depth == 1 { INFINITE } else { score + 50 };
        let mut search_depth = depth;

        let final_score = loop {
            let jittered_depth = (search_depth + jitter).clamp(1, MAX_PLY as i32 - 1);
            let s = negamax(root, alpha, beta, jittered_depth, 0, true, td, ctx);
            if ctx.stop.load(Ordering::Relaxed) {
                break s;
            }
            if s <= alpha || s >= beta {
                alpha = -INFINITE;
                beta = INFINITE;
                search_depth = (search_depth - 1).max(1);
                continue;
            }
            break s;
        };

        score = final_score;
        depth = search_depth + 1;

        if ctx.stop.load(Ordering::Relaxed) && td.pv_length[0] == 0 {
            break;
        }

        best.best_move = td.pv_table[0][0];
        best.score = score;
        best.depth = search_depth;
        best.pv = td.pv_table[0][..td.pv_length[0]].to_vec();
        best.nodes = td.nodes;
        on_iteration(&best);

        if ctx.stop.load(Ordering::Relaxed) {
            break;
        }
    }

    best
}

/// Negamax with principal-variation search. `ply` is the absolute distance from the
/// search root (root is ply 0); `depth` is the remaining search horizon and may be
/// extended (check extension) or reduced (LMR) relative to the caller's depth − 1.
pub fn negamax(
    pos: &Position,
    mut alpha: i32,
    beta: i32,
    mut depth: i32,
    ply: usize,
    is_root: bool,
    td: &mut ThreadData,
    ctx: &SearchContext,
) -> i32 {
    td.pv_length[ply] = ply;

    if !is_root && (pos.is_threefold_repetition() || pos.fifty_move_counter() >= 100) {
        return 0;
    }

    let is_pv = beta - alpha > 1;
    let tt_key = pos.hash();
    let mut tt_move = BitMove::null();

    if !is_root {
        if let Some(entry) = ctx.tt.probe(tt_key) {
            tt_move = entry.best_move;
            if (entry.depth as i32) >= depth && !is_pv {
                let score = value_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Alpha if score <= alpha => return alpha,
                    Bound::Beta if score >= beta => return beta,
                    _ => {}
                }
            }
        }
    }

    td.nodes += 1;
    if should_stop(ctx, td) {
        return 0;
    }

    if depth <= 0 {
        return quiescence(pos, alpha, beta, ply, td, ctx);
    }

    if ply >= MAX_PLY - 1 {
        return eval::evaluate(pos, ctx.evaluator);
    }

    let in_check = pos.in_check();
    if in_check {
        depth += 1;
    }

    let static_eval = eval::evaluate(pos, ctx.evaluator);

    if depth < 3 && !is_pv && !in_check {
        let margin = static_eval - 120 * depth;
        if margin >= beta {
            return margin;
        }
    }

    if depth >= 3 && !in_check && ply > 0 {
        let null_pos = pos.null_move();
        let score = -negamax(&null_pos, -beta, -beta + 1, depth - 3, ply + 1, false, td, ctx);
        if score >= beta {
            return beta;
        }
    }

    if !is_pv && !in_check && depth <= 3 {
        let s = static_eval + 125;
        if s < beta {
            if depth == 1 {
                let q = quiescence(pos, alpha, beta, ply, td, ctx);
                return s.max(q);
            } else if depth == 2 {
                let s2 = s + 175;
                if s2 < beta {
                    let q = quiescence(pos, alpha, beta, ply, td, ctx);
                    if q < beta {
                        return s2.max(q);
                    }
                }
            }
        }
    }

    let moves = movegen::generate_legal(pos);
    if moves.is_empty() {
        return if in_check { -MATE_VALUE + ply as i32 } else { 0 };
    }

    let mut picker = MovePicker::new(pos, moves.as_slice(), tt_move, td.killers[ply], &td.history);

    let mut best_score = -INFINITE;
    let mut best_move = BitMove::null();
    let mut hash_flag = Bound::Alpha;
    let mut moves_searched = 0u32;

    while let Some(mv) = picker.next() {
        if ctx.stop.load(Ordering::Relaxed) {
            break;
        }

        let next_pos = match pos.make_move(mv, false) {
            Some(p) => p,
            None => continue,
        };

        let score = if moves_searched == 0 {
            let s = -negamax(&next_pos, -beta, -alpha, depth - 1, ply + 1, false, td, ctx);
            if ctx.stop.load(Ordering::Relaxed) {
                break;
            }
            s
        } else {
            let try_lmr = moves_searched >= 4 && depth >= 3 && !in_check && mv.is_quiet();
            let mut s = if try_lmr {
                let r = -negamax(&next_pos, -alpha - 1, -alpha, depth - 2, ply + 1, false, td, ctx);
                if ctx.stop.load(Ordering::Relaxed) {
                    break;
                }
                r
            } else {
                alpha + 1
            };
            if s > alpha {
                s = -negamax(&next_pos, -alpha - 1, -alpha, depth - 1, ply + 1, false, td, ctx);
                if ctx.stop.load(Ordering::Relaxed) {
                    break;
                }
                if s > alpha && s < beta {
                    s = -negamax(&next_pos, -beta, -alpha, depth - 1, ply + 1, false, td, ctx);
                    if ctx.stop.load(Ordering::Relaxed) {
                        break;
                    }
                }
            }
            s
        };

        moves_searched += 1;

        if score > best_score {
            best_score = score;
            best_move = mv;
        }

        if score > alpha {
            alpha = score;
            td.pv_table[ply][ply] = mv;
            for i in (ply + 1)..td.pv_length[ply + 1] {
                td.pv_table[ply][i] = td.pv_table[ply + 1][i];
            }
            td.pv_length[ply] = td.pv_length[ply + 1].max(ply + 1);
            hash_flag = Bound::Exact;

            if mv.is_quiet() {
                let piece_idx = mv.moved_piece() as usize;
                let target_idx = mv.get_dest().0 as usize;
                td.history[piece_idx][target_idx] += depth;
            }

            if score >= beta {
                ctx.tt.store(tt_key, value_to_tt(beta, ply), depth as u8, Bound::Beta, mv);
                if mv.is_quiet() {
                    td.killers[ply][1] = td.killers[ply][0];
                    td.killers[ply][0] = mv;
                }
                return beta;
            }
        }
    }

    ctx.tt.store(tt_key, value_to_tt(alpha, ply), depth as u8, hash_flag, best_move);
    alpha
}

fn quiescence(pos: &Position, mut alpha: i32, beta: i32, ply: usize, td: &mut ThreadData, ctx: &SearchContext) -> i32 {
    td.nodes += 1;
    if should_stop(ctx, td) {
        return 0;
    }
    if ply >= MAX_PLY - 1 {
        return eval::evaluate(pos, ctx.evaluator);
    }

    let static_eval = eval::evaluate(pos, ctx.evaluator);
    if static_eval >= beta {
        return beta;
    }
    if static_eval + 975 < alpha {
        return alpha;
    }
    if static_eval > alpha {
        alpha = static_eval;
    }

    let moves = movegen::generate_legal_captures(pos);
    let mut picker = MovePicker::new(pos, moves.as_slice(), BitMove::null(), [BitMove::null(); 2], &td.history);

    while let Some(mv) = picker.next() {
        if see::see(pos, mv) < -200 {
            continue;
        }
        let next_pos = match pos.make_move(mv, true) {
            Some(p) => p,
            None => continue,
        };
        let score = -quiescence(&next_pos, -beta, -alpha, ply + 1, td, ctx);
        if ctx.stop.load(Ordering::Relaxed) {
            break;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;
    use crate::tt::TranspositionTable;
    use corvid_core::position::Position;

    fn search(fen: &str, depth: i32) -> SearchResult {
        let pos = Position::from_fen(fen).unwrap();
        let tt = TranspositionTable::new(1);
        let stop = AtomicBool::new(false);
        let evaluator = MaterialEvaluator;
        let ctx = SearchContext { tt: &tt, stop: &stop, evaluator: &evaluator, stop_time: None };
        let mut td = ThreadData::new();
        iterative_deepening(&pos, depth, 0, &mut td, &ctx, |_| {})
    }

    #[test]
    fn finds_mate_in_one() {
        // White to move, Qh5-h7 style back-rank mate pattern.
        let result = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 4);
        assert!(result.score >= MATE_VALUE - 10);
    }

    #[test]
    fn avoids_stalemating_the_opponent_when_winning() {
        // Would be stalemate if black has no legal move; engine must pick a mating or
        // at least a non-stalemating continuation when material is overwhelmingly ahead.
        let result = search("7k/8/6QK/8/8/8/8/8 w - - 0 1", 3);
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn picks_up_a_hanging_queen() {
        let result = search("4k3/8/8/3q4/4R3/8/8/4K3 w - - 0 1", 3);
        assert!(result.score > 300);
    }

    #[test]
    fn stop_flag_halts_the_search_promptly() {
        let pos = Position::start_pos();
        let tt = TranspositionTable::new(1);
        let stop = AtomicBool::new(true);
        let evaluator = MaterialEvaluator;
        let ctx = SearchContext { tt: &tt, stop: &stop, evaluator: &evaluator, stop_time: None };
        let mut td = ThreadData::new();
        let result = iterative_deepening(&pos, 20, 0, &mut td, &ctx, |_| {});
        assert_eq!(result.depth, 0);
    }
}
