//! Periodic roster rotation over the visible cards.
//!
//! Keeps a large roster visually represented by replacing a few random
//! cards at a fixed cadence. The cadence keeps running through every phase;
//! fires are simply discarded whenever the phase forbids visible shuffling,
//! so a watched spin-to-stop sequence never changes under the player.

use rand::Rng;

use crate::roster::Participant;

#[derive(Default)]
pub struct SwapScheduler {
    last_fire: Option<f64>,
}

impl SwapScheduler {
    /// Decide this frame's swaps: `(card index, replacement)` pairs.
    /// Empty when the interval hasn't elapsed, the phase forbids swapping,
    /// or there is nothing to draw from.
    pub fn plan(
        &mut self,
        now: f64,
        interval_s: f64,
        swap_count: usize,
        allowed: bool,
        roster: &[Participant],
        visible_len: usize,
        rng: &mut impl Rng,
    ) -> Vec<(usize, Participant)> {
        match self.last_fire {
            None => {
                self.last_fire = Some(now);
                return Vec::new();
            }
            Some(last) if now - last < interval_s => return Vec::new(),
            _ => self.last_fire = Some(now),
        }

        if !allowed || roster.is_empty() || visible_len == 0 || swap_count == 0 {
            return Vec::new();
        }

        (0..swap_count)
            .map(|_| {
                let idx = rng.gen_range(0..visible_len);
                let candidate = roster[rng.gen_range(0..roster.len())].clone();
                (idx, candidate)
            })
            .collect()
    }

    /// Restart the cadence (roster replaced, engine remounted).
    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}
