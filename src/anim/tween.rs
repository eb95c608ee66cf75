//! Scalar property tweens on named channels.
//!
//! Every animated quantity in the scene (sphere yaw/pitch, camera distance,
//! highlight scale/glow/flash) is one channel. Starting a tween on a channel
//! that already has one supersedes it — no queue, last request wins — which
//! is what makes every choreography step individually cancellable.

use std::collections::HashMap;

use crate::anim::easing::Easing;

/// One animated scene property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Yaw,
    Pitch,
    CamDistance,
    WinnerScale,
    GlowOpacity,
    GlowScale,
    FlashOpacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Run once and settle on the target.
    Once,
    /// Bounce between the endpoints forever; never settles.
    YoyoLoop,
}

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: f64,
    pub duration: f64,
    pub easing: Easing,
    pub repeat: Repeat,
}

impl Tween {
    pub fn once(from: f32, to: f32, start: f64, duration: f64, easing: Easing) -> Self {
        Self { from, to, start, duration: duration.max(1e-6), easing, repeat: Repeat::Once }
    }

    pub fn yoyo(from: f32, to: f32, start: f64, duration: f64, easing: Easing) -> Self {
        Self { from, to, start, duration: duration.max(1e-6), easing, repeat: Repeat::YoyoLoop }
    }

    pub fn sample(&self, now: f64) -> f32 {
        let phase = ((now - self.start) / self.duration).max(0.0);
        let t = match self.repeat {
            Repeat::Once => phase.min(1.0) as f32,
            Repeat::YoyoLoop => {
                let cycle = phase.floor() as u64;
                let frac = phase.fract() as f32;
                if cycle % 2 == 1 {
                    1.0 - frac
                } else {
                    frac
                }
            }
        };
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// A one-shot tween is done once its duration has elapsed; loops never are.
    pub fn done(&self, now: f64) -> bool {
        self.repeat == Repeat::Once && now >= self.start + self.duration
    }
}

/// The set of live tweens, keyed by channel.
#[derive(Default)]
pub struct Timeline {
    active: HashMap<Channel, Tween>,
}

impl Timeline {
    /// Start (or supersede) the tween on `channel`.
    pub fn start(&mut self, channel: Channel, tween: Tween) {
        self.active.insert(channel, tween);
    }

    /// Cancel the tween on `channel`. Returns whether one was running.
    pub fn stop(&mut self, channel: Channel) -> bool {
        self.active.remove(&channel).is_some()
    }

    /// Current value of the channel, if a tween drives it.
    pub fn value(&self, channel: Channel, now: f64) -> Option<f32> {
        self.active.get(&channel).map(|t| t.sample(now))
    }

    /// True when the channel has no tween or its one-shot has elapsed.
    pub fn settled(&self, channel: Channel, now: f64) -> bool {
        self.active.get(&channel).map_or(true, |t| t.done(now))
    }

    /// Drop completed one-shots. Owners must have sampled final values
    /// before calling this within the same frame.
    pub fn retire(&mut self, now: f64) {
        self.active.retain(|_, t| !t.done(now));
    }

    /// Number of infinite loops currently running (leak regression probe).
    pub fn looping_count(&self) -> usize {
        self.active.values().filter(|t| t.repeat == Repeat::YoyoLoop).count()
    }

    pub fn is_running(&self, channel: Channel) -> bool {
        self.active.contains_key(&channel)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_hits_endpoints() {
        let t = Tween::once(2.0, 10.0, 1.0, 2.0, Easing::Linear);
        assert_eq!(t.sample(1.0), 2.0);
        assert_eq!(t.sample(2.0), 6.0);
        assert_eq!(t.sample(3.0), 10.0);
        assert_eq!(t.sample(99.0), 10.0, "clamps past the end");
        assert!(!t.done(2.9));
        assert!(t.done(3.0));
    }

    #[test]
    fn yoyo_mirrors_and_never_finishes() {
        let t = Tween::yoyo(0.0, 1.0, 0.0, 1.0, Easing::Linear);
        assert!((t.sample(0.25) - 0.25).abs() < 1e-6);
        assert!((t.sample(1.5) - 0.5).abs() < 1e-6, "second cycle runs backwards");
        assert!((t.sample(1.75) - 0.25).abs() < 1e-6);
        assert!(!t.done(1000.0));
    }

    #[test]
    fn last_request_wins_on_a_channel() {
        let mut tl = Timeline::default();
        tl.start(Channel::Yaw, Tween::once(0.0, 1.0, 0.0, 1.0, Easing::Linear));
        tl.start(Channel::Yaw, Tween::once(5.0, 6.0, 0.0, 1.0, Easing::Linear));
        assert_eq!(tl.value(Channel::Yaw, 0.0), Some(5.0));
    }

    #[test]
    fn retire_drops_finished_keeps_loops() {
        let mut tl = Timeline::default();
        tl.start(Channel::FlashOpacity, Tween::once(0.9, 0.0, 0.0, 0.5, Easing::Linear));
        tl.start(Channel::GlowOpacity, Tween::yoyo(0.6, 0.2, 0.0, 0.8, Easing::Linear));
        tl.retire(10.0);
        assert!(!tl.is_running(Channel::FlashOpacity));
        assert!(tl.is_running(Channel::GlowOpacity));
        assert_eq!(tl.looping_count(), 1);
    }

    #[test]
    fn settled_semantics() {
        let mut tl = Timeline::default();
        assert!(tl.settled(Channel::Pitch, 0.0), "no tween means settled");
        tl.start(Channel::Pitch, Tween::once(1.0, 0.0, 0.0, 1.2, Easing::QuadOut));
        assert!(!tl.settled(Channel::Pitch, 0.5));
        assert!(tl.settled(Channel::Pitch, 1.2));
    }
}
