//! Naive wall-clock time budget: one straight division of the remaining clock by the
//! moves left to play, with a small safety margin. No move-importance modeling, no
//! hypothetical-moves-to-go sweep.

use std::time::{Duration, Instant};

mod uci_timer;

pub use uci_timer::{GoLimits, LimitsType, UciClock};

const MOVE_OVERHEAD_MS: i64 = 50;
const DEFAULT_MOVES_TO_GO: i64 = 30;

/// Picks the instant the search should stop by, given the limits sent with `go`.
/// Returns `None` when the search has no time budget at all (`depth`, `nodes`,
/// `infinite`, or `mate` searches run until their own stopping condition fires).
pub fn compute_stop_time(start: Instant, limits: &GoLimits, us: corvid_core::core::Player) -> Option<Instant> {
    match &limits.limits_type {
        LimitsType::MoveTime(ms) => Some(start + Duration::from_millis(*ms)),
        LimitsType::Time(timer) => {
            let side = us as usize;
            let my_time = timer.time_msec[side];
            let my_inc = timer.inc_msec[side];
            let movestogo = if timer.moves_to_go > 0 {
                timer.moves_to_go as i64
            } else {
                DEFAULT_MOVES_TO_GO
            };

            // Overhead is subtracted from the clock split and the increment separately,
            // each floored at zero, rather than from their sum.
            let time_part = (my_time / movestogo - MOVE_OVERHEAD_MS).max(0);
            let inc_part = (my_inc - MOVE_OVERHEAD_MS).max(0);
            let budget_ms = (time_part + inc_part).max(1);
            Some(start + Duration::from_millis(budget_ms as u64))
        }
        LimitsType::Depth(_) | LimitsType::Nodes(_) | LimitsType::Mate(_) | LimitsType::Infinite | LimitsType::Ponder => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::uci_timer::UciClock;

    #[test]
    fn movetime_limit_stops_exactly_at_the_requested_duration() {
        let start = Instant::now();
        let limits = GoLimits {
            limits_type: LimitsType::MoveTime(250),
            ..GoLimits::blank()
        };
        let stop = compute_stop_time(start, &limits, corvid_core::core::Player::White).unwrap();
        assert_eq!(stop.duration_since(start), Duration::from_millis(250));
    }

    #[test]
    fn clock_budget_splits_remaining_time_by_moves_to_go() {
        let start = Instant::now();
        let limits = GoLimits {
            limits_type: LimitsType::Time(UciClock {
                time_msec: [60_000, 60_000],
                inc_msec: [0, 0],
                moves_to_go: 20,
            }),
            ..GoLimits::blank()
        };
        let stop = compute_stop_time(start, &limits, corvid_core::core::Player::White).unwrap();
        let expected = 60_000 / 20 - MOVE_OVERHEAD_MS;
        assert_eq!(stop.duration_since(start), Duration::from_millis(expected as u64));
    }

    #[test]
    fn overhead_is_subtracted_from_the_split_and_the_increment_separately() {
        let start = Instant::now();
        let limits = GoLimits {
            limits_type: LimitsType::Time(UciClock {
                time_msec: [1_000, 1_000],
                inc_msec: [100, 100],
                moves_to_go: 50,
            }),
            ..GoLimits::blank()
        };
        // time/movestogo = 20ms, clamped to 0 after overhead; inc 100ms - 50ms = 50ms.
        let stop = compute_stop_time(start, &limits, corvid_core::core::Player::White).unwrap();
        assert_eq!(stop.duration_since(start), Duration::from_millis(50));
    }

    #[test]
    fn depth_limited_search_has_no_wall_clock_budget() {
        let start = Instant::now();
        let limits = GoLimits {
            limits_type: LimitsType::Depth(10),
            ..GoLimits::blank()
        };
        assert!(compute_stop_time(start, &limits, corvid_core::core::Player::White).is_none());
    }
}
