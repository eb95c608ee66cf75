//! Starfield and drifting particle backdrop.

use glam::Vec3;
use rand::Rng;
use rayon::prelude::*;

const STAR_COUNT: usize = 1500;
const STAR_SPREAD: f32 = 4000.0;
const DUST_BOUND: f32 = 2000.0;

/// Additive-looking accent colors for the dust field.
const DUST_COLORS: [[u8; 3]; 3] = [[255, 107, 107], [29, 209, 161], [255, 215, 0]];

#[derive(Debug, Clone, Copy)]
pub struct Dust {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: [u8; 3],
    pub size: f32,
}

/// Static stars plus a drifting foreground dust field.
pub struct Sky {
    pub stars: Vec<Vec3>,
    pub dust: Vec<Dust>,
}

impl Sky {
    pub fn new(particle_count: usize, rng: &mut impl Rng) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-STAR_SPREAD / 2.0..STAR_SPREAD / 2.0),
                    rng.gen_range(-STAR_SPREAD / 2.0..STAR_SPREAD / 2.0),
                    rng.gen_range(-STAR_SPREAD / 2.0..STAR_SPREAD / 2.0),
                )
            })
            .collect();
        let mut sky = Self { stars, dust: Vec::new() };
        sky.rebuild_dust(particle_count, rng);
        sky
    }

    /// Regenerate the dust field (particle-count config change).
    pub fn rebuild_dust(&mut self, count: usize, rng: &mut impl Rng) {
        self.dust = (0..count)
            .map(|_| Dust {
                pos: Vec3::new(
                    rng.gen_range(-DUST_BOUND..DUST_BOUND),
                    rng.gen_range(-DUST_BOUND..DUST_BOUND),
                    rng.gen_range(-500.0..500.0),
                ),
                vel: Vec3::new(rng.gen_range(-2.5..2.5), rng.gen_range(-2.5..2.5), 0.0),
                color: DUST_COLORS[rng.gen_range(0..DUST_COLORS.len())],
                size: rng.gen_range(4.0..12.0),
            })
            .collect();
    }

    /// Advance the drift. Motion is tuned to the original 60 Hz step.
    pub fn tick(&mut self, dt: f32) {
        let step = dt * 6.0;
        self.dust.par_iter_mut().for_each(|d| {
            d.pos.x += d.vel.x * step;
            d.pos.y += d.vel.y * step;
            if d.pos.x > DUST_BOUND {
                d.pos.x = -DUST_BOUND;
            }
            if d.pos.x < -DUST_BOUND {
                d.pos.x = DUST_BOUND;
            }
            if d.pos.y > DUST_BOUND {
                d.pos.y = -DUST_BOUND;
            }
            if d.pos.y < -DUST_BOUND {
                d.pos.y = DUST_BOUND;
            }
        });
    }
}
