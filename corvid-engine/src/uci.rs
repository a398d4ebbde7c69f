//! UCI protocol glue: reads commands from stdin, drives the engine, and writes
//! replies to stdout. stdout is reserved for the protocol; every diagnostic goes to
//! `log` (stderr) instead.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use corvid_core::core::piece_move::BitMove;
use corvid_core::movegen;
use corvid_core::position::Position;

use crate::config::Config;
use crate::eval::{Evaluator, MaterialEvaluator};
use crate::search::{self, SearchResult};
use crate::time::{self, GoLimits, LimitsType, UciClock};
use crate::threadpool;
use crate::tt::TranspositionTable;

const ENGINE_NAME: &str = "Corvid";
const ENGINE_AUTHOR: &str = "Corvid Contributors";

/// Holds everything that persists across UCI commands: the current position, the
/// configuration, and the shared search state (table + stop flag). A fresh `Engine`
/// reflects `ucinewgame` having just been sent.
pub struct Engine {
    position: Position,
    config: Config,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator + Send + Sync>,
    stop: Arc<AtomicBool>,
}

impl Engine {
    pub fn new() -> Engine {
        let config = Config::new();
        Engine {
            position: Position::start_pos(),
            tt: Arc::new(TranspositionTable::new(config.hash_mb)),
            evaluator: Arc::new(MaterialEvaluator),
            stop: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Blocks reading lines from `stdin` until `quit` or EOF, dispatching each UCI
    /// command as it arrives. `stop` only halts an in-flight `go`, still emitting
    /// `bestmove`; `quit` ends this loop entirely.
    pub fn run_stdin_loop(&mut self) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            if self.dispatch(line.trim()) {
                break;
            }
        }
    }

    /// Handles one line of input. Returns `true` if the caller should stop reading
    /// further input (i.e. `quit` was received).
    pub fn dispatch(&mut self, line: &str) -> bool {
        let mut tokens = line.split_whitespace();
        let command = match tokens.next() {
            Some(c) => c,
            None => return false,
        };
        let rest: Vec<&str> = tokens.collect();

        match command {
            "uci" => self.handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => self.handle_new_game(),
            "setoption" => self.handle_setoption(&rest),
            "position" => self.handle_position(&rest),
            "go" => self.handle_go(&rest),
            "stop" => self.stop.store(true, Ordering::Relaxed),
            "quit" => return true,
            "" => {}
            other => log::debug!("ignoring unrecognized UCI command: {}", other),
        }
        flush_stdout();
        false
    }

    fn handle_uci(&self) {
        println!("id name {}", ENGINE_NAME);
        println!("id author {}", ENGINE_AUTHOR);
        println!(
            "option name Hash type spin default {} min {} max {}",
            crate::config::DEFAULT_HASH_MB,
            crate::config::MIN_HASH_MB,
            crate::config::MAX_HASH_MB
        );
        println!(
            "option name Threads type spin default 1 min 1 max {}",
            Config::max_threads()
        );
        println!("option name EvalFile type string default <empty>");
        println!("uciok");
    }

    fn handle_new_game(&mut self) {
        self.position = Position::start_pos();
        self.tt.clear();
        self.stop.store(false, Ordering::Relaxed);
    }

    fn handle_setoption(&mut self, args: &[&str]) {
        let (name, value) = parse_setoption(args);
        match name.as_str() {
            "Hash" => {
                if let Ok(mb) = value.parse::<usize>() {
                    self.config.set_hash_mb(mb);
                    self.tt = Arc::new(TranspositionTable::new(self.config.hash_mb));
                }
            }
            "Threads" => {
                if let Ok(n) = value.parse::<usize>() {
                    self.config.set_threads(n);
                }
            }
            "EvalFile" => {
                if value.is_empty() || value == "<empty>" {
                    log::warn!("no evaluation weights file configured, falling back to the material evaluator");
                } else {
                    log::warn!("weights file '{}' is unreadable by this build, falling back to the material evaluator", value);
                    self.config.set_eval_file(value);
                }
            }
            _ => log::debug!("ignoring unknown UCI option '{}'", name),
        }
    }

    fn handle_position(&mut self, args: &[&str]) {
        if args.is_empty() {
            return;
        }
        let mut position = match args[0] {
            "startpos" => Some(Position::start_pos()),
            "fen" => {
                let fen: String = args[1..]
                    .iter()
                    .take_while(|tok| **tok != "moves")
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ");
                Position::from_fen(&fen).ok()
            }
            _ => None,
        };

        let position = match position.take() {
            Some(p) => p,
            None => {
                log::debug!("ignoring malformed 'position' command");
                return;
            }
        };

        let moves_idx = args.iter().position(|&tok| tok == "moves");
        let mut position = position;
        if let Some(idx) = moves_idx {
            for mv_str in &args[idx + 1..] {
                match apply_uci_move(&position, mv_str) {
                    Some(next) => position = next,
                    None => break,
                }
            }
        }

        self.position = position;
    }

    fn handle_go(&mut self, args: &[&str]) {
        let limits = parse_go(args);
        let start = Instant::now();
        let stop_time = time::compute_stop_time(start, &limits, self.position.side_to_move());
        let max_depth = match limits.limits_type {
            LimitsType::Depth(d) => d as i32,
            _ => crate::search::MAX_PLY as i32 - 1,
        };

        let tt = Arc::clone(&self.tt);
        let evaluator = Arc::clone(&self.evaluator);
        let stop = Arc::clone(&self.stop);
        let num_threads = self.config.threads;
        let position = self.position.clone();

        let result = threadpool::go(&position, max_depth, num_threads, tt, evaluator, stop_time, stop, |result| {
            print_info_line(result, start);
        });

        if result.best_move.is_null() {
            println!("bestmove (none)");
        } else {
            println!("bestmove {}", format_move(result.best_move));
        }
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

fn flush_stdout() {
    let _ = io::stdout().flush();
}

fn parse_setoption(args: &[&str]) -> (String, String) {
    let mut name = Vec::new();
    let mut value = Vec::new();
    let mut in_value = false;
    for &tok in args {
        match tok {
            "name" => {}
            "value" => in_value = true,
            _ if in_value => value.push(tok),
            _ => name.push(tok),
        }
    }
    (name.join(" "), value.join(" "))
}

fn parse_go(args: &[&str]) -> GoLimits {
    let mut limits = GoLimits::blank();
    let mut clock = UciClock::blank();
    let mut have_clock = false;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "depth" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<u16>().ok()) {
                    limits.limits_type = LimitsType::Depth(v);
                    i += 1;
                }
            }
            "nodes" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<u64>().ok()) {
                    limits.limits_type = LimitsType::Nodes(v);
                    i += 1;
                }
            }
            "mate" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<u16>().ok()) {
                    limits.limits_type = LimitsType::Mate(v);
                    i += 1;
                }
            }
            "movetime" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<u64>().ok()) {
                    limits.limits_type = LimitsType::MoveTime(v);
                    i += 1;
                }
            }
            "infinite" => limits.limits_type = LimitsType::Infinite,
            "ponder" => limits.limits_type = LimitsType::Ponder,
            "wtime" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<i64>().ok()) {
                    clock.time_msec[0] = v;
                    have_clock = true;
                    i += 1;
                }
            }
            "btime" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<i64>().ok()) {
                    clock.time_msec[1] = v;
                    have_clock = true;
                    i += 1;
                }
            }
            "winc" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<i64>().ok()) {
                    clock.inc_msec[0] = v;
                    i += 1;
                }
            }
            "binc" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<i64>().ok()) {
                    clock.inc_msec[1] = v;
                    i += 1;
                }
            }
            "movestogo" => {
                if let Some(v) = args.get(i + 1).and_then(|s| s.parse::<u32>().ok()) {
                    clock.moves_to_go = v;
                    i += 1;
                }
            }
            "searchmoves" => {
                let mut j = i + 1;
                while let Some(&tok) = args.get(j) {
                    if is_go_keyword(tok) {
                        break;
                    }
                    limits.search_moves.push(tok.to_string());
                    j += 1;
                }
                i = j - 1;
            }
            _ => {}
        }
        i += 1;
    }

    if have_clock {
        limits.limits_type = LimitsType::Time(clock);
    }
    limits
}

fn is_go_keyword(tok: &str) -> bool {
    matches!(
        tok,
        "searchmoves" | "ponder" | "wtime" | "btime" | "winc" | "binc" | "movestogo" | "depth" | "nodes" | "mate" | "movetime" | "infinite"
    )
}

fn apply_uci_move(pos: &Position, mv_str: &str) -> Option<Position> {
    let candidates = movegen::generate_legal(pos);
    let mv = candidates.iter().find(|m| format_move(**m) == mv_str)?;
    pos.make_move(*mv, false)
}

fn format_move(mv: BitMove) -> String {
    mv.to_uci_string()
}

fn print_info_line(result: &SearchResult, start: Instant) {
    println!("{}", format_info_line(result, start.elapsed().as_millis().max(1) as u64));
}

fn format_info_line(result: &SearchResult, elapsed_ms: u64) -> String {
    let nps = (result.nodes * 1000) / elapsed_ms;
    let pv_str: Vec<String> = result.pv.iter().map(|&mv| format_move(mv)).collect();
    let score_str = match search::mate_in_moves(result.score) {
        Some(moves) => format!("mate {}", moves),
        None => format!("cp {}", result.score),
    };
    format!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        result.depth,
        score_str,
        result.nodes,
        nps,
        elapsed_ms,
        pv_str.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isready_replies_with_readyok() {
        let mut engine = Engine::new();
        assert!(!engine.dispatch("isready"));
    }

    #[test]
    fn quit_signals_the_read_loop_to_stop() {
        let mut engine = Engine::new();
        assert!(engine.dispatch("quit"));
    }

    #[test]
    fn stop_does_not_signal_the_read_loop_to_stop() {
        let mut engine = Engine::new();
        assert!(!engine.dispatch("stop"));
        assert!(engine.stop.load(Ordering::Relaxed));
    }

    #[test]
    fn position_startpos_with_moves_advances_the_board() {
        let mut engine = Engine::new();
        engine.dispatch("position startpos moves e2e4 e7e5");
        assert_eq!(engine.position.fifty_move_counter(), 0);
        assert_ne!(engine.position.hash(), Position::start_pos().hash());
    }

    #[test]
    fn position_fen_parses_the_given_fen() {
        let mut engine = Engine::new();
        engine.dispatch("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(engine.position.hash(), Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap().hash());
    }

    #[test]
    fn illegal_move_in_a_moves_list_stops_applying_further_moves() {
        let mut engine = Engine::new();
        let before = engine.position.clone();
        engine.dispatch("position startpos moves e2e9");
        assert_eq!(engine.position.hash(), before.hash());
    }

    #[test]
    fn setoption_hash_is_clamped_to_the_documented_range() {
        let mut engine = Engine::new();
        engine.dispatch("setoption name Hash value 999999");
        assert_eq!(engine.config.hash_mb, crate::config::MAX_HASH_MB);
    }

    #[test]
    fn setoption_threads_is_clamped_to_hardware_concurrency() {
        let mut engine = Engine::new();
        engine.dispatch("setoption name Threads value 999999");
        assert_eq!(engine.config.threads, Config::max_threads());
    }

    #[test]
    fn go_depth_one_emits_a_legal_bestmove() {
        let mut engine = Engine::new();
        engine.dispatch("go depth 1");
    }

    #[test]
    fn parse_go_recognizes_clock_and_increment_tokens() {
        let limits = parse_go(&["wtime", "60000", "btime", "60000", "winc", "500", "movestogo", "30"]);
        match limits.limits_type {
            LimitsType::Time(clock) => {
                assert_eq!(clock.time_msec[0], 60000);
                assert_eq!(clock.inc_msec[0], 500);
                assert_eq!(clock.moves_to_go, 30);
            }
            _ => panic!("expected a clock-based limit"),
        }
    }

    #[test]
    fn parse_go_collects_searchmoves_until_the_next_keyword() {
        let limits = parse_go(&["searchmoves", "e2e4", "d2d4", "depth", "5"]);
        assert_eq!(limits.search_moves, vec!["e2e4", "d2d4"]);
        assert!(matches!(limits.limits_type, LimitsType::Depth(5)));
    }

    #[test]
    fn info_line_reports_a_forced_mate_as_score_mate() {
        let result = SearchResult {
            best_move: BitMove::null(),
            score: search::MATE_VALUE - 1,
            depth: 3,
            pv: Vec::new(),
            nodes: 100,
        };
        let line = format_info_line(&result, 10);
        assert!(line.contains("score mate 1"));
        assert!(!line.contains("score cp"));
    }

    #[test]
    fn info_line_reports_a_non_mate_score_as_cp() {
        let result = SearchResult {
            best_move: BitMove::null(),
            score: 45,
            depth: 3,
            pv: Vec::new(),
            nodes: 100,
        };
        let line = format_info_line(&result, 10);
        assert!(line.contains("score cp 45"));
    }
}
