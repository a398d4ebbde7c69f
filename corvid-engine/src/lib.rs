//! A UCI chess engine built on `corvid-core`'s move generator: a lockless shared
//! transposition table, iterative-deepening PVS search, and a Lazy-SMP parallel driver.
//!
//! This crate is a binary first; the library surface exists so the engine's pieces
//! (search, time management, the transposition table) can be unit tested and reused by
//! tooling such as a bench harness without going through the UCI text protocol.

pub mod config;
pub mod eval;
pub mod movepick;
pub mod search;
pub mod threadpool;
pub mod time;
pub mod tt;
pub mod uci;
