//! A lockless, shared transposition table. Every worker thread probes and stores into
//! the same flat array of entries with no locking; torn reads under concurrent writers
//! are caught by storing `key ^ data` alongside `data` and rejecting any entry where the
//! two don't reconstruct the probe key (the Hyatt XOR trick).

use std::sync::atomic::{AtomicU64, Ordering};

use corvid_core::core::piece_move::BitMove;

const BYTES_PER_MB: usize = 1024 * 1024;

/// What kind of bound a stored score represents, relative to the window it was found in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Bound {
    Exact = 0,
    Alpha = 1,
    Beta = 2,
}

impl Bound {
    fn from_u8(v: u8) -> Bound {
        match v {
            0 => Bound::Exact,
            1 => Bound::Alpha,
            _ => Bound::Beta,
        }
    }
}

/// A decoded transposition table entry, as returned by a successful [`TranspositionTable::probe`].
#[derive(Copy, Clone, Debug)]
pub struct ProbeResult {
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
    pub best_move: BitMove,
}

struct Slot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

/// Packs `(score, depth, bound, best_move)` into the 64 bits stored alongside the XOR key.
fn pack(score: i32, depth: u8, bound: Bound, best_move: BitMove) -> u64 {
    let biased_score = (score + 32768) as u16 as u64;
    (biased_score << 48) | ((depth as u64) << 40) | ((bound as u64) << 32) | (best_move.get_raw() as u64)
}

fn unpack(data: u64) -> (i32, u8, Bound, BitMove) {
    let score = ((data >> 48) & 0xFFFF) as i32 - 32768;
    let depth = ((data >> 40) & 0xFF) as u8;
    let bound = Bound::from_u8(((data >> 32) & 0xFF) as u8);
    let best_move = BitMove::from_raw(data as u32);
    (score, depth, bound, best_move)
}

/// The shared hash table. Cheap to clone (it's just an `Arc`-free flat array behind
/// shared references): every accessor takes `&self`, since atomics give interior
/// mutability without a lock.
pub struct TranspositionTable {
    slots: Vec<Slot>,
}

impl TranspositionTable {
    /// Allocates a table sized to roughly `mb` megabytes, rounded down to a power of
    /// two number of slots so probing can mask instead of dividing.
    pub fn new(mb: usize) -> TranspositionTable {
        let mb = mb.max(1);
        let slot_bytes = std::mem::size_of::<Slot>();
        let num_slots = ((mb * BYTES_PER_MB) / slot_bytes).next_power_of_two().max(1);
        TranspositionTable::with_slot_count(num_slots)
    }

    fn with_slot_count(num_slots: usize) -> TranspositionTable {
        let mut slots = Vec::with_capacity(num_slots);
        for _ in 0..num_slots {
            slots.push(Slot {
                key_xor: AtomicU64::new(0),
                data: AtomicU64::new(0),
            });
        }
        TranspositionTable { slots }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & (self.slots.len() - 1)
    }

    /// Looks up `key`. Returns `None` on a clean miss, a torn read (concurrent writer
    /// caught mid-write), or a genuinely empty slot.
    pub fn probe(&self, key: u64) -> Option<ProbeResult> {
        let slot = &self.slots[self.index(key)];
        let key_xor = slot.key_xor.load(Ordering::Relaxed);
        let data = slot.data.load(Ordering::Relaxed);
        if key_xor ^ data != key {
            return None;
        }
        let (score, depth, bound, best_move) = unpack(data);
        Some(ProbeResult { score, depth, bound, best_move })
    }

    /// Always-replace store: every probe miss or hit on the same slot gets overwritten.
    pub fn store(&self, key: u64, score: i32, depth: u8, bound: Bound, best_move: BitMove) {
        let slot = &self.slots[self.index(key)];
        let data = pack(score, depth, bound, best_move);
        slot.data.store(data, Ordering::Relaxed);
        slot.key_xor.store(key ^ data, Ordering::Relaxed);
    }

    /// Zeroes every slot, discarding all stored positions.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.data.store(0, Ordering::Relaxed);
            slot.key_xor.store(0, Ordering::Relaxed);
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn size_megabytes(&self) -> usize {
        (self.slots.len() * std::mem::size_of::<Slot>()) / BYTES_PER_MB
    }

    /// Fraction of the first 1000 slots currently holding an entry, in permille, the
    /// UCI `hashfull` convention.
    pub fn hash_permille(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        if sample == 0 {
            return 0;
        }
        let filled = self.slots[..sample]
            .iter()
            .filter(|s| s.data.load(Ordering::Relaxed) != 0)
            .count();
        ((filled * 1000) / sample) as u32
    }
}

/// Builds a table around `mb`, retrying at half the size on allocation failure down to
/// 1 MB. Returns the table and the size it actually landed on.
pub fn new_table_with_fallback(mb: usize) -> (TranspositionTable, usize) {
    let mut size = mb.max(1);
    loop {
        let result = std::panic::catch_unwind(|| TranspositionTable::new(size));
        match result {
            Ok(tt) => return (tt, size),
            Err(_) if size > 1 => {
                log::warn!("failed to allocate {} MB transposition table, retrying at {} MB", size, size / 2);
                size /= 2;
            }
            Err(e) => std::panic::resume_unwind(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::core::piece_move::{BitMove as BM, PreMoveInfo};
    use corvid_core::core::square::SQ;
    use corvid_core::core::Piece;

    fn dummy_move() -> BM {
        BM::init(PreMoveInfo {
            src: SQ::E2,
            dst: SQ::E4,
            piece: Piece::WhitePawn,
            promotion: None,
            capture: false,
            double_push: true,
            en_passant: false,
            castle: false,
        })
    }

    #[test]
    fn probe_on_empty_table_misses() {
        let tt = TranspositionTable::new(1);
        assert!(tt.probe(12345).is_none());
    }

    #[test]
    fn stored_entry_is_retrieved_intact() {
        let tt = TranspositionTable::new(1);
        let mv = dummy_move();
        tt.store(999, 150, 6, Bound::Exact, mv);
        let hit = tt.probe(999).expect("entry should be present");
        assert_eq!(hit.score, 150);
        assert_eq!(hit.depth, 6);
        assert_eq!(hit.bound, Bound::Exact);
        assert_eq!(hit.best_move, mv);
    }

    #[test]
    fn different_key_mapping_to_same_slot_is_a_miss() {
        let tt = TranspositionTable::new(1);
        let mv = dummy_move();
        let slots = tt.num_slots() as u64;
        tt.store(42, 10, 1, Bound::Beta, mv);
        assert!(tt.probe(42 + slots).is_none());
    }

    #[test]
    fn clear_wipes_all_entries() {
        let tt = TranspositionTable::new(1);
        tt.store(7, 1, 1, Bound::Alpha, dummy_move());
        tt.clear();
        assert!(tt.probe(7).is_none());
    }

    #[test]
    fn negative_scores_round_trip_through_the_bias() {
        let tt = TranspositionTable::new(1);
        tt.store(3, -400, 3, Bound::Exact, dummy_move());
        assert_eq!(tt.probe(3).unwrap().score, -400);
    }
}
