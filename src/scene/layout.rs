//! Card arena and Fibonacci-sphere placement.
//!
//! Positions are derived purely from the card's index, so a swap can rebind
//! a card to a new participant without touching the geometry of any other
//! card. A rebuild always recreates the whole arena; it only happens on
//! roster, count or appearance changes, never per frame.

use glam::Vec3;

use crate::config::VisualConfig;
use crate::roster::Participant;

/// Below this viewport width cards get a legibility scale boost.
pub const MOBILE_WIDTH: f32 = 768.0;
pub const MOBILE_SCALE: f32 = 1.5;

/// Golden angle in radians.
const GOLDEN_ANGLE: f32 = std::f32::consts::PI * (3.0 - 2.236_068);

/// One participant card bound to an index-derived point on the sphere.
#[derive(Debug, Clone)]
pub struct Card {
    pub participant: Participant,
    /// Local position (before sphere rotation), on the sphere surface.
    pub position: Vec3,
    pub scale: f32,
}

/// Index `i` of `n` on the unit sphere, evenly distributed.
pub fn sphere_point(i: usize, n: usize) -> Vec3 {
    if n <= 1 {
        return Vec3::Z;
    }
    let y = 1.0 - (i as f32 / (n - 1) as f32) * 2.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * i as f32;
    Vec3::new(theta.cos() * r, y, theta.sin() * r)
}

/// Tangent-plane basis for a card at `local_pos`: (right, up), both unit
/// length, oriented so the card front faces outward from the center.
pub fn card_axes(local_pos: Vec3) -> (Vec3, Vec3) {
    let normal = local_pos.normalize_or_zero();
    let mut right = Vec3::Y.cross(normal);
    if right.length_squared() < 1e-6 {
        // Polar card: world up is parallel to the normal.
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = normal.cross(right);
    (right, up)
}

/// The engine-owned card arena. Its bindings are the visible set.
#[derive(Default)]
pub struct CardField {
    pub cards: Vec<Card>,
}

impl CardField {
    /// Fully replace the card set from the visible participants.
    pub fn rebuild(&mut self, visible: &[Participant], config: &VisualConfig, viewport_w: f32) {
        let scale = config.card_scale * mobile_multiplier(viewport_w);
        let n = visible.len();
        self.cards = visible
            .iter()
            .enumerate()
            .map(|(i, p)| Card {
                participant: p.clone(),
                position: sphere_point(i, n) * config.radius,
                scale,
            })
            .collect();
        log::debug!("card field rebuilt: {} cards, scale {scale}", n);
    }

    /// Swap support: rebind one index to a new participant, leaving its
    /// geometry (and every other card) untouched.
    pub fn rebind(&mut self, index: usize, participant: Participant) {
        if let Some(card) = self.cards.get_mut(index) {
            card.participant = participant;
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The participants currently bound to cards, in index order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.participant.id.clone()).collect()
    }
}

pub fn mobile_multiplier(viewport_w: f32) -> f32 {
    if viewport_w < MOBILE_WIDTH {
        MOBILE_SCALE
    } else {
        1.0
    }
}
