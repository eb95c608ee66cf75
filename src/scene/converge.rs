//! Winner selection and the dual-axis convergence choreography.
//!
//! Picking the winner is trivial; bringing its card to the camera is not. A
//! shortest-path rotation can spin either direction and looks abrupt, so the
//! yaw target is normalized to be reachable by a strictly decreasing
//! rotation and then pushed two extra full turns down: the planet always
//! decelerates through several spins in the same visual direction, whatever
//! orientation the previous round left it in.
//!
//! The stop choreography is one named staged sequence (rotate, then dolly,
//! then highlight and linger) with explicit settle checks per stage, driven
//! by the per-frame tick. Dropping the sequence cancels it as a unit.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::anim::{Channel, Easing, Timeline, Tween};
use crate::scene::camera::CLOSE_UP_DISTANCE;
use crate::scene::layout::CardField;

/// Sphere rotation phase of the reveal.
pub const CONVERGE_DURATION: f64 = 6.0;
/// Camera dolly phase.
pub const APPROACH_DURATION: f64 = 1.0;
/// Hold on the highlighted winner before surfacing the result.
pub const LINGER_DURATION: f64 = 0.2;

/// Rotation targets that bring one card face-on to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealPlan {
    pub winner_index: usize,
    pub target_yaw: f32,
    pub target_pitch: f32,
}

/// Yaw/pitch that center `local` (a card's pre-rotation position) on the
/// camera axis, with the yaw reachable by monotonically decreasing rotation
/// from `current_yaw` plus at least two full extra turns.
pub fn convergence_angles(local: Vec3, current_yaw: f32) -> (f32, f32) {
    let angle_y = local.x.atan2(local.z);
    let mut target_yaw = -angle_y;
    while target_yaw > current_yaw {
        target_yaw -= TAU;
    }
    target_yaw -= TAU * 2.0;

    // Pitch is bounded; no multi-turn correction needed.
    let projected = (local.x * local.x + local.z * local.z).sqrt();
    let target_pitch = local.y.atan2(projected);

    (target_yaw, target_pitch)
}

/// Pick a winner card uniformly at random and compute its reveal targets.
pub fn plan_reveal(field: &CardField, current_yaw: f32, rng: &mut impl Rng) -> Option<RevealPlan> {
    if field.is_empty() {
        return None;
    }
    let winner_index = rng.gen_range(0..field.len());
    let (target_yaw, target_pitch) = convergence_angles(field.cards[winner_index].position, current_yaw);
    Some(RevealPlan { winner_index, target_yaw, target_pitch })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RevealStage {
    /// Sphere rotating onto the winner.
    Converge,
    /// Camera dollying to the close-up distance.
    Approach,
    /// Winner highlighted; short hold before completion.
    Linger { until: f64 },
    Done,
}

/// What the per-frame tick learned about the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealEvent {
    Pending,
    /// The dolly settled: highlight this card now.
    HighlightNow(usize),
    /// The linger elapsed: the reveal is complete.
    Finished(usize),
}

pub struct RevealSequence {
    pub plan: RevealPlan,
    stage: RevealStage,
}

impl RevealSequence {
    /// Start the rotation stage from the current orientation.
    pub fn begin(
        plan: RevealPlan,
        now: f64,
        yaw: f32,
        pitch: f32,
        timeline: &mut Timeline,
    ) -> Self {
        timeline.start(
            Channel::Yaw,
            Tween::once(yaw, plan.target_yaw, now, CONVERGE_DURATION, Easing::CubicOut),
        );
        timeline.start(
            Channel::Pitch,
            Tween::once(pitch, plan.target_pitch, now, CONVERGE_DURATION, Easing::CubicOut),
        );
        Self { plan, stage: RevealStage::Converge }
    }

    /// Advance stage transitions on settle. Call once per frame.
    pub fn advance(&mut self, now: f64, cam_distance: f32, timeline: &mut Timeline) -> RevealEvent {
        match self.stage {
            RevealStage::Converge => {
                if timeline.settled(Channel::Yaw, now) && timeline.settled(Channel::Pitch, now) {
                    timeline.start(
                        Channel::CamDistance,
                        Tween::once(
                            cam_distance,
                            CLOSE_UP_DISTANCE,
                            now,
                            APPROACH_DURATION,
                            Easing::QuadOut,
                        ),
                    );
                    self.stage = RevealStage::Approach;
                }
                RevealEvent::Pending
            }
            RevealStage::Approach => {
                if timeline.settled(Channel::CamDistance, now) {
                    self.stage = RevealStage::Linger { until: now + LINGER_DURATION };
                    RevealEvent::HighlightNow(self.plan.winner_index)
                } else {
                    RevealEvent::Pending
                }
            }
            RevealStage::Linger { until } => {
                if now >= until {
                    self.stage = RevealStage::Done;
                    RevealEvent::Finished(self.plan.winner_index)
                } else {
                    RevealEvent::Pending
                }
            }
            RevealStage::Done => RevealEvent::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn yaw_always_decreases_by_at_least_two_turns() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let pos = Vec3::new(
                rng.gen_range(-1.0..1.0f32),
                rng.gen_range(-1.0..1.0f32),
                rng.gen_range(-1.0..1.0f32),
            )
            .normalize_or_zero()
                * 600.0;
            if pos.length_squared() < 1.0 {
                continue;
            }
            let current = rng.gen_range(-50.0..50.0f32);
            let (target, _) = convergence_angles(pos, current);
            assert!(target <= current, "target {target} above current {current}");
            assert!(
                current - target >= TAU * 2.0 - 1e-3,
                "less than two extra turns: {}",
                current - target
            );
            // Still the same facing angle, modulo full turns.
            let residue = (-pos.x.atan2(pos.z) - target).rem_euclid(TAU);
            assert!(residue < 1e-3 || residue > TAU - 1e-3);
        }
    }

    #[test]
    fn pitch_is_bounded_and_direct() {
        let (_, pitch) = convergence_angles(Vec3::new(0.0, 600.0, 1.0), 0.0);
        assert!((pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-2);
        let (_, pitch) = convergence_angles(Vec3::new(300.0, 0.0, 300.0), 0.0);
        assert_eq!(pitch, 0.0);
    }

    #[test]
    fn winner_pick_is_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let roster = crate::roster::demo_roster(10, &mut rng);
        let mut field = CardField::default();
        field.rebuild(&roster, &VisualConfig::default(), 1280.0);

        let mut counts = [0usize; 10];
        for _ in 0..20_000 {
            let plan = plan_reveal(&field, 0.0, &mut rng).unwrap();
            counts[plan.winner_index] += 1;
        }
        for (i, &c) in counts.iter().enumerate() {
            assert!(
                (1600..=2400).contains(&c),
                "index {i} drawn {c} times out of 20000"
            );
        }
    }

    #[test]
    fn empty_field_yields_no_plan() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(plan_reveal(&CardField::default(), 0.0, &mut rng).is_none());
    }

    #[test]
    fn stages_advance_on_settle_only() {
        let mut timeline = Timeline::default();
        let plan = RevealPlan { winner_index: 4, target_yaw: -15.0, target_pitch: 0.3 };
        let mut seq = RevealSequence::begin(plan, 0.0, -1.0, 0.0, &mut timeline);

        // Mid-rotation: nothing settles, nothing advances.
        assert_eq!(seq.advance(3.0, 1200.0, &mut timeline), RevealEvent::Pending);
        assert!(!timeline.is_running(Channel::CamDistance));

        // Rotation settled: the dolly starts.
        assert_eq!(seq.advance(6.1, 1200.0, &mut timeline), RevealEvent::Pending);
        assert!(timeline.is_running(Channel::CamDistance));

        // Dolly settled: highlight fires once.
        let ev = seq.advance(7.2, CLOSE_UP_DISTANCE, &mut timeline);
        assert_eq!(ev, RevealEvent::HighlightNow(4));

        // Linger: pending, then finished exactly once.
        assert_eq!(seq.advance(7.3, CLOSE_UP_DISTANCE, &mut timeline), RevealEvent::Pending);
        assert_eq!(seq.advance(7.45, CLOSE_UP_DISTANCE, &mut timeline), RevealEvent::Finished(4));
        assert_eq!(seq.advance(8.0, CLOSE_UP_DISTANCE, &mut timeline), RevealEvent::Pending);
    }
}
