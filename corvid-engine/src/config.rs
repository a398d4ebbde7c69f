//! Engine-wide configuration: the UCI-tunable knobs (`Hash`, `Threads`, `EvalFile`)
//! plus the clamping rules that keep a hostile or careless `setoption` from producing
//! an unusable engine.

use serde::{Deserialize, Serialize};

pub const MIN_HASH_MB: usize = 1;
pub const MAX_HASH_MB: usize = 1024;
pub const DEFAULT_HASH_MB: usize = 16;
pub const MAX_THREADS_CAP: usize = 64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub hash_mb: usize,
    pub threads: usize,
    pub eval_file: Option<String>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            hash_mb: DEFAULT_HASH_MB,
            threads: 1,
            eval_file: None,
        }
    }

    /// The ceiling `Threads` is clamped to: the lesser of the hardware's reported
    /// concurrency and a hard cap, so a misconfigured container doesn't get asked to
    /// spawn hundreds of workers.
    pub fn max_threads() -> usize {
        num_cpus::get().min(MAX_THREADS_CAP).max(1)
    }

    pub fn set_hash_mb(&mut self, mb: usize) {
        self.hash_mb = mb.clamp(MIN_HASH_MB, MAX_HASH_MB);
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads.clamp(1, Config::max_threads());
    }

    pub fn set_eval_file(&mut self, path: String) {
        self.eval_file = Some(path);
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_size_clamps_to_the_documented_range() {
        let mut cfg = Config::new();
        cfg.set_hash_mb(0);
        assert_eq!(cfg.hash_mb, MIN_HASH_MB);
        cfg.set_hash_mb(100_000);
        assert_eq!(cfg.hash_mb, MAX_HASH_MB);
        cfg.set_hash_mb(64);
        assert_eq!(cfg.hash_mb, 64);
    }

    #[test]
    fn thread_count_never_exceeds_the_hardware_or_hard_cap() {
        let mut cfg = Config::new();
        cfg.set_threads(100_000);
        assert_eq!(cfg.threads, Config::max_threads());
        assert!(cfg.threads <= MAX_THREADS_CAP);
    }

    #[test]
    fn zero_threads_is_clamped_up_to_one() {
        let mut cfg = Config::new();
        cfg.set_threads(0);
        assert_eq!(cfg.threads, 1);
    }
}
