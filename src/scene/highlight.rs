//! Winner-card highlight: overshoot scale-up, pulsing glow, one-shot flash.
//!
//! Effects are not scene-graph children of the card; they are values here,
//! addressed by the decorated card's index, and the painter derives their
//! quads from the card's transform. Clearing stops every looping tween
//! before a new highlight may start, so loops can never accumulate.

use crate::anim::{Channel, Easing, Timeline, Tween};

pub const SCALE_FACTOR: f32 = 1.5;
pub const SCALE_UP_DURATION: f64 = 0.6;
pub const SCALE_DOWN_DURATION: f64 = 0.3;
pub const GLOW_PERIOD: f64 = 0.8;
pub const GLOW_SIZE_FACTOR: f32 = 1.25;
pub const FLASH_DURATION: f64 = 0.5;
pub const FLASH_SIZE_FACTOR: f32 = 1.5;

#[derive(Default)]
pub struct HighlightState {
    /// Card currently decorated.
    pub active: Option<usize>,
    /// Card animating back to base scale after a clear.
    settling: Option<usize>,
}

impl HighlightState {
    /// Decorate `index`. Always clears the previous highlight first.
    pub fn highlight(&mut self, index: usize, base_scale: f32, now: f64, timeline: &mut Timeline) {
        self.clear(base_scale, now, timeline);
        self.settling = None;
        self.active = Some(index);

        timeline.start(
            Channel::WinnerScale,
            Tween::once(
                base_scale,
                base_scale * SCALE_FACTOR,
                now,
                SCALE_UP_DURATION,
                Easing::BackOut,
            ),
        );
        timeline.start(
            Channel::GlowOpacity,
            Tween::yoyo(0.6, 0.2, now, GLOW_PERIOD, Easing::Linear),
        );
        timeline.start(
            Channel::GlowScale,
            Tween::yoyo(1.0, 1.15, now, GLOW_PERIOD, Easing::Linear),
        );
        timeline.start(
            Channel::FlashOpacity,
            Tween::once(0.9, 0.0, now, FLASH_DURATION, Easing::Linear),
        );
    }

    /// Remove the decoration and stop its loops. Safe to call repeatedly.
    pub fn clear(&mut self, base_scale: f32, now: f64, timeline: &mut Timeline) {
        if let Some(index) = self.active.take() {
            let from = timeline
                .value(Channel::WinnerScale, now)
                .unwrap_or(base_scale * SCALE_FACTOR);
            timeline.start(
                Channel::WinnerScale,
                Tween::once(from, base_scale, now, SCALE_DOWN_DURATION, Easing::Linear),
            );
            self.settling = Some(index);
        }
        timeline.stop(Channel::GlowOpacity);
        timeline.stop(Channel::GlowScale);
        timeline.stop(Channel::FlashOpacity);
    }

    /// Scale to paint card `index` with.
    pub fn scale_for(&self, index: usize, base_scale: f32, now: f64, timeline: &Timeline) -> f32 {
        let decorated = self.active == Some(index) || self.settling == Some(index);
        if !decorated {
            return base_scale;
        }
        match timeline.value(Channel::WinnerScale, now) {
            Some(v) => v,
            None if self.active == Some(index) => base_scale * SCALE_FACTOR,
            None => base_scale,
        }
    }

    /// Forget the settling card once its scale-back tween retired.
    pub fn tidy(&mut self, timeline: &Timeline) {
        if self.active.is_none() && !timeline.is_running(Channel::WinnerScale) {
            self.settling = None;
        }
    }
}
