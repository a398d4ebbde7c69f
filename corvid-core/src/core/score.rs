//! Primitives for evaluation scores: a single centipawn `Value`, and a mid-game /
//! end-game pair `Score` used by piece-square tables.

use std::ops::*;

/// A centipawn evaluation score.
pub type Value = i32;

pub const ZERO: Value = 0;
pub const DRAW: Value = 0;
pub const MATE: Value = super::MATE_VALUE;
pub const INFINITE: Value = 32_001;
pub const NEG_INFINITE: Value = -32_001;

/// Piece values used by SEE and the material evaluator
/// (pawn, knight, bishop, rook, queen, king).
pub const PAWN: Value = 100;
pub const KNIGHT: Value = 320;
pub const BISHOP: Value = 330;
pub const ROOK: Value = 500;
pub const QUEEN: Value = 900;
pub const KING: Value = 20000;

/// A mid-game / end-game score pair, linearly blended by game phase in the
/// evaluation adapter's piece-square tables.
#[derive(Copy, Clone, Debug, Default)]
pub struct Score(pub Value, pub Value);

impl Score {
    pub const ZERO: Score = Score(0, 0);

    #[inline(always)]
    pub fn make(mg: Value, eg: Value) -> Self {
        Score(mg, eg)
    }

    #[inline(always)]
    pub fn mg(self) -> Value {
        self.0
    }

    #[inline(always)]
    pub fn eg(self) -> Value {
        self.1
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score(self.0 + other.0, self.1 + other.1)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, other: Score) {
        *self = *self + other;
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, other: Score) -> Score {
        Score(self.0 - other.0, self.1 - other.1)
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, other: Score) {
        *self = *self - other;
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0, -self.1)
    }
}
