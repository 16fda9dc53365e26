//! The rolling 32-bit token hasher.
//!
//! [`XorHash32`] is the reference model for the per-signal fingerprint. The
//! update is a classic 13/17/5 xorshift applied after folding the token into
//! the state, so it is cheap enough to run once per cycle per signal and can
//! be reproduced bit-for-bit by a hardware implementation given the same seed.

use serde::{Deserialize, Serialize};

/// Constant folded into every seed so that the state never starts at zero.
pub const SEED_SALT: u32 = 0x9e37_79b9;

/// Stateful xorshift hasher consuming one 32-bit token per update.
///
/// The output of [`next`](XorHash32::next) depends only on the previous state
/// and the token. Two hashers seeded with the same pair and fed the same token
/// sequence always agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XorHash32 {
    state: u32,
}

impl XorHash32 {
    /// Creates a hasher whose initial state is derived from a seed pair.
    ///
    /// The state is `seed0 ^ seed1.rotate_left(16) ^ SEED_SALT`, replaced by
    /// [`SEED_SALT`] if that would be zero.
    pub fn seeded(seed0: u32, seed1: u32) -> Self {
        Self {
            state: seed_state(seed0, seed1),
        }
    }

    /// Mixes `token` into the state and returns the new state.
    pub fn next(&mut self, token: u32) -> u32 {
        let mut x = self.state ^ token;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns the current state without consuming a token.
    pub fn value(&self) -> u32 {
        self.state
    }

    /// Feeds every token in order and returns the final state.
    pub fn consume<I: IntoIterator<Item = u32>>(&mut self, tokens: I) -> u32 {
        for token in tokens {
            self.next(token);
        }
        self.state
    }
}

impl Default for XorHash32 {
    fn default() -> Self {
        Self::seeded(0, 0)
    }
}

fn seed_state(seed0: u32, seed1: u32) -> u32 {
    match seed0 ^ seed1.rotate_left(16) ^ SEED_SALT {
        0 => SEED_SALT,
        s => s,
    }
}
