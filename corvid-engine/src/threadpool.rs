//! Lazy-SMP driver: every worker runs its own iterative-deepening search over the same
//! root, sharing nothing but the transposition table and the stop flag. There's no work
//! splitting and no result merging beyond picking the main worker's own PV — the
//! diversity comes entirely from hash-table cross-pollination and a small per-worker
//! depth jitter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use corvid_core::position::Position;

use crate::eval::Evaluator;
use crate::search::{self, SearchContext, SearchResult, ThreadData};
use crate::tt::TranspositionTable;

/// Runs a Lazy-SMP search to `max_depth` using `num_threads` workers (the caller, plus
/// `num_threads - 1` spawned helpers). Calls `on_main_iteration` after every depth the
/// main worker completes, and returns the main worker's final result once every worker
/// has stopped (by exhausting `max_depth`, hitting `stop_time`, or `stop` being set
/// externally, e.g. by a UCI `stop` command observed by the caller before this returns).
pub fn go(
    root: &Position,
    max_depth: i32,
    num_threads: usize,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator + Send + Sync>,
    stop_time: Option<Instant>,
    stop: Arc<AtomicBool>,
    mut on_main_iteration: impl FnMut(&SearchResult),
) -> SearchResult {
    stop.store(false, Ordering::Relaxed);

    let num_helpers = num_threads.saturating_sub(1);
    let mut handles = Vec::with_capacity(num_helpers);

    for worker_id in 1..=num_helpers {
        let helper_root = root.clone();
        let helper_tt = Arc::clone(&tt);
        let helper_eval = Arc::clone(&evaluator);
        let helper_stop = Arc::clone(&stop);
        let helper_jitter = (worker_id % 2) as i32;

        handles.push(thread::spawn(move || {
            let ctx = SearchContext {
                tt: helper_tt.as_ref(),
                stop: helper_stop.as_ref(),
                evaluator: helper_eval.as_ref(),
                stop_time,
            };
            let mut td = ThreadData::new();
            search::iterative_deepening(&helper_root, max_depth, helper_jitter, &mut td, &ctx, |_| {});
        }));
    }

    let main_ctx = SearchContext {
        tt: tt.as_ref(),
        stop: stop.as_ref(),
        evaluator: evaluator.as_ref(),
        stop_time,
    };
    let mut main_td = ThreadData::new();
    let result = search::iterative_deepening(root, max_depth, 0, &mut main_td, &main_ctx, |r| on_main_iteration(r));

    stop.store(true, Ordering::Relaxed);
    for handle in handles {
        let _ = handle.join();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;
    use corvid_core::position::Position;

    #[test]
    fn single_threaded_search_returns_a_legal_move() {
        let pos = Position::start_pos();
        let tt = Arc::new(TranspositionTable::new(1));
        let evaluator: Arc<dyn Evaluator + Send + Sync> = Arc::new(MaterialEvaluator);
        let stop = Arc::new(AtomicBool::new(false));
        let result = go(&pos, 3, 1, tt, evaluator, None, stop, |_| {});
        assert!(!result.best_move.is_null());
    }

    #[test]
    fn multi_threaded_search_agrees_with_single_threaded_within_a_reasonable_margin() {
        let pos = Position::from_fen("4k3/8/8/3q4/4R3/8/8/4K3 w - - 0 1").unwrap();
        let evaluator: Arc<dyn Evaluator + Send + Sync> = Arc::new(MaterialEvaluator);

        let tt1 = Arc::new(TranspositionTable::new(1));
        let stop1 = Arc::new(AtomicBool::new(false));
        let single = go(&pos, 4, 1, tt1, Arc::clone(&evaluator), None, stop1, |_| {});

        let tt2 = Arc::new(TranspositionTable::new(1));
        let stop2 = Arc::new(AtomicBool::new(false));
        let multi = go(&pos, 4, 4, tt2, evaluator, None, stop2, |_| {});

        assert!((single.score - multi.score).abs() <= 200);
    }

    #[test]
    fn go_resets_a_stop_flag_left_over_from_a_previous_search() {
        let pos = Position::start_pos();
        let tt = Arc::new(TranspositionTable::new(1));
        let evaluator: Arc<dyn Evaluator + Send + Sync> = Arc::new(MaterialEvaluator);
        let stop = Arc::new(AtomicBool::new(true));
        let result = go(&pos, 3, 2, tt, evaluator, None, stop, |_| {});
        assert!(result.depth > 0);
    }
}
