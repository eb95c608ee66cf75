//! Scene state and the per-frame update/paint pass.
//!
//! Everything mutable lives in [`SceneState`] and is threaded into the
//! frame pass by reference — there are no ambient singletons. The host's
//! repaint request is the scheduling loop; one tick samples tweens,
//! integrates rotation, advances the reveal choreography and the backdrop,
//! then painting projects the world onto the egui painter.

pub mod camera;
pub mod converge;
pub mod highlight;
pub mod layout;
pub mod sky;

use glam::{Mat3, Vec3};
use rand::Rng;

use crate::anim::{Channel, Easing, Timeline, Tween};
use crate::config::VisualConfig;
use crate::texture::TextureCache;
use camera::Camera;
use converge::{plan_reveal, RevealEvent, RevealSequence};
use highlight::HighlightState;
use layout::{card_axes, CardField, MOBILE_WIDTH};
use sky::Sky;

/// Ambient rotation step per 60 Hz frame while idle.
pub const IDLE_SPIN_SPEED: f32 = 0.002;

/// Matches the original scene fog falloff.
const FOG_DENSITY: f32 = 0.0008;

const STAR_COLOR: egui::Color32 = egui::Color32::from_rgb(136, 136, 153);
// 0x1e293b at 5% and 0x4834d4 at 20%, premultiplied.
const SHELL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(2, 2, 3, 13);
const WIREFRAME: egui::Color32 = egui::Color32::from_rgba_premultiplied(14, 10, 42, 51);
const GLOW_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);

pub struct SceneState {
    /// Sphere rotation about Y; spins downward (negative) over time.
    pub yaw: f32,
    /// Sphere rotation about X; zeroed by reset-view.
    pub pitch: f32,
    pub camera: Camera,
    pub field: CardField,
    pub sky: Sky,
    pub timeline: Timeline,
    pub highlight: HighlightState,
    reveal: Option<RevealSequence>,
    last_now: Option<f64>,
}

impl SceneState {
    pub fn new(viewport: (f32, f32), config: &VisualConfig, rng: &mut impl Rng) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            camera: Camera::new(viewport, config.radius),
            field: CardField::default(),
            sky: Sky::new(config.particle_count, rng),
            timeline: Timeline::default(),
            highlight: HighlightState::default(),
            reveal: None,
            last_now: None,
        }
    }

    /// Current sphere rotation, pitch applied over yaw.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.pitch) * Mat3::from_rotation_y(self.yaw)
    }

    /// Track the paint surface size. Returns true when the narrow-viewport
    /// card scale flips, in which case the caller must rebuild the cards.
    pub fn set_viewport(&mut self, viewport: (f32, f32), radius: f32) -> bool {
        let was_narrow = self.camera.viewport.0 < MOBILE_WIDTH;
        if self.camera.viewport == viewport {
            return false;
        }
        self.camera.viewport = viewport;
        if !self.timeline.is_running(Channel::CamDistance) {
            self.camera.distance = self.camera.ideal_distance(radius);
        }
        was_narrow != (viewport.0 < MOBILE_WIDTH)
    }

    /// Start the stop choreography. Returns false when there is nothing to
    /// reveal (no cards).
    pub fn begin_reveal(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        match plan_reveal(&self.field, self.yaw, rng) {
            Some(plan) => {
                log::info!(
                    "reveal: card {} targets yaw {:.2} pitch {:.2}",
                    plan.winner_index,
                    plan.target_yaw,
                    plan.target_pitch
                );
                self.reveal = Some(RevealSequence::begin(
                    plan,
                    now,
                    self.yaw,
                    self.pitch,
                    &mut self.timeline,
                ));
                true
            }
            None => false,
        }
    }

    pub fn reveal_active(&self) -> bool {
        self.reveal.is_some()
    }

    /// Drop the reveal and its rotation tweens (teardown, defensive abort).
    pub fn cancel_reveal(&mut self) {
        if self.reveal.take().is_some() {
            self.timeline.stop(Channel::Yaw);
            self.timeline.stop(Channel::Pitch);
            self.timeline.stop(Channel::CamDistance);
        }
    }

    /// Restore camera distance and zero the pitch. Yaw is deliberately left
    /// alone so the planet does not visibly snap back.
    pub fn reset_view(&mut self, now: f64, radius: f32, base_scale: f32) {
        self.highlight.clear(base_scale, now, &mut self.timeline);
        let ideal = self.camera.ideal_distance(radius);
        self.timeline.start(
            Channel::CamDistance,
            Tween::once(self.camera.distance, ideal, now, 1.5, Easing::QuadInOut),
        );
        self.timeline.start(
            Channel::Pitch,
            Tween::once(self.pitch, 0.0, now, 1.2, Easing::QuadOut),
        );
    }

    /// One cooperative update step. `spin_speed` is the per-60Hz-frame
    /// rotation for the current phase (zero while paused/stopped). Returns
    /// the winner card index once the reveal choreography completes.
    pub fn tick(&mut self, now: f64, spin_speed: f32) -> Option<usize> {
        let dt = (now - self.last_now.unwrap_or(now)).clamp(0.0, 0.25) as f32;
        self.last_now = Some(now);

        // Tween-driven properties win over integration.
        match self.timeline.value(Channel::Yaw, now) {
            Some(v) => self.yaw = v,
            None => self.yaw -= spin_speed * dt * 60.0,
        }
        if let Some(v) = self.timeline.value(Channel::Pitch, now) {
            self.pitch = v;
        }
        if let Some(v) = self.timeline.value(Channel::CamDistance, now) {
            self.camera.distance = v;
        }

        let mut finished = None;
        if let Some(seq) = &mut self.reveal {
            match seq.advance(now, self.camera.distance, &mut self.timeline) {
                RevealEvent::Pending => {}
                RevealEvent::HighlightNow(idx) => match self.field.cards.get(idx) {
                    Some(card) => {
                        let base = card.scale;
                        self.highlight.highlight(idx, base, now, &mut self.timeline);
                    }
                    None => {
                        // Card arena shrank mid-reveal; abort quietly.
                        log::warn!("reveal card {idx} vanished, aborting reveal");
                        self.cancel_reveal();
                    }
                },
                RevealEvent::Finished(idx) => finished = Some(idx),
            }
        }
        if finished.is_some() {
            self.reveal = None;
        }

        self.sky.tick(dt);

        // Completed one-shots have been sampled above; drop them.
        self.timeline.retire(now);
        self.highlight.tidy(&self.timeline);

        finished
    }

    /// Paint the whole scene into `painter`, within `rect`.
    pub fn paint(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        rect: egui::Rect,
        cache: &mut TextureCache,
        config: &VisualConfig,
        now: f64,
    ) {
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return;
        }
        let origin = rect.min.to_vec2();
        let rot = self.rotation();

        self.paint_backdrop(painter, origin);
        self.paint_shell(painter, origin, config.radius);
        self.paint_cards(ctx, painter, origin, rot, cache, config, now);
    }

    fn paint_backdrop(&self, painter: &egui::Painter, origin: egui::Vec2) {
        for star in &self.sky.stars {
            if let Some((pos, depth)) = self.camera.project(*star) {
                let r = self.camera.project_len(2.0, depth).clamp(0.4, 2.0);
                painter.circle_filled(pos + origin, r, STAR_COLOR);
            }
        }
        for dust in &self.sky.dust {
            if let Some((pos, depth)) = self.camera.project(dust.pos) {
                let r = self.camera.project_len(dust.size, depth) * 0.5;
                let [cr, cg, cb] = dust.color;
                let color = egui::Color32::from_rgba_unmultiplied(cr, cg, cb, 140);
                painter.circle_filled(pos + origin, r.clamp(0.5, 6.0), color);
            }
        }
    }

    /// Inner sphere silhouette plus a rotating wireframe shell.
    fn paint_shell(&self, painter: &egui::Painter, origin: egui::Vec2, radius: f32) {
        let shell_r = radius - 20.0;
        if let Some((center, depth)) = self.camera.project(Vec3::ZERO) {
            let r = self.camera.project_len(shell_r, depth);
            painter.circle_filled(center + origin, r, SHELL_FILL);
        }

        let rot = self.rotation();
        let stroke = egui::Stroke::new(1.0, WIREFRAME);
        const SEGMENTS: usize = 48;

        // Latitude rings.
        for lat_deg in [-60.0f32, -30.0, 0.0, 30.0, 60.0] {
            let lat = lat_deg.to_radians();
            let ring_r = shell_r * lat.cos();
            let y = shell_r * lat.sin();
            self.stroke_loop(painter, origin, stroke, |i| {
                let a = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                rot * Vec3::new(ring_r * a.cos(), y, ring_r * a.sin())
            });
        }
        // Meridians.
        for lon_step in 0..6 {
            let lon = lon_step as f32 / 6.0 * std::f32::consts::PI;
            self.stroke_loop(painter, origin, stroke, |i| {
                let a = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                let p = Vec3::new(shell_r * a.cos(), shell_r * a.sin(), 0.0);
                rot * Mat3::from_rotation_y(lon) * p
            });
        }
    }

    fn stroke_loop(
        &self,
        painter: &egui::Painter,
        origin: egui::Vec2,
        stroke: egui::Stroke,
        point: impl Fn(usize) -> Vec3,
    ) {
        const SEGMENTS: usize = 48;
        let mut prev: Option<egui::Pos2> = None;
        for i in 0..=SEGMENTS {
            let projected = self.camera.project(point(i % SEGMENTS)).map(|(p, _)| p + origin);
            if let (Some(a), Some(b)) = (prev, projected) {
                painter.line_segment([a, b], stroke);
            }
            prev = projected;
        }
    }

    fn paint_cards(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        origin: egui::Vec2,
        rot: Mat3,
        cache: &mut TextureCache,
        config: &VisualConfig,
        now: f64,
    ) {
        // Painter's algorithm: far cards first.
        let mut order: Vec<(usize, f32)> = self
            .field
            .cards
            .iter()
            .enumerate()
            .map(|(i, c)| (i, (rot * c.position).z))
            .collect();
        order.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (idx, _) in order {
            let card = &self.field.cards[idx];
            let scale = self
                .highlight
                .scale_for(idx, card.scale, now, &self.timeline);
            let (right, up) = card_axes(card.position);
            let hw = config.card_width * scale * 0.5;
            let hh = config.card_height * scale * 0.5;

            let corners = [
                card.position - right * hw + up * hh, // texture top-left
                card.position + right * hw + up * hh,
                card.position + right * hw - up * hh,
                card.position - right * hw - up * hh,
            ];
            let mut screen = [egui::Pos2::ZERO; 4];
            let mut depth_sum = 0.0;
            let mut visible = true;
            for (corner, out) in corners.iter().zip(screen.iter_mut()) {
                match self.camera.project(rot * *corner) {
                    Some((p, d)) => {
                        *out = p + origin;
                        depth_sum += d;
                    }
                    None => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }
            let depth = depth_sum / 4.0;
            let fog = (-(FOG_DENSITY * depth).powi(2)).exp();
            let alpha = (fog * 255.0) as u8;
            if alpha == 0 {
                continue;
            }

            let highlighted = self.highlight.active == Some(idx);
            if highlighted {
                self.paint_glow(painter, &screen, now);
            }

            if let Some(tex) = cache.get_mut(&card.participant.id) {
                let tex_id = tex.ensure_uploaded(ctx, &card.participant.id);
                let tint = egui::Color32::from_rgba_unmultiplied(255, 255, 255, alpha);
                let uvs = [
                    egui::pos2(0.0, 0.0),
                    egui::pos2(1.0, 0.0),
                    egui::pos2(1.0, 1.0),
                    egui::pos2(0.0, 1.0),
                ];
                let mut mesh = egui::Mesh::with_texture(tex_id);
                for (pos, uv) in screen.iter().zip(uvs) {
                    mesh.vertices.push(egui::epaint::Vertex { pos: *pos, uv, color: tint });
                }
                mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
                painter.add(egui::Shape::mesh(mesh));
            }

            if highlighted {
                self.paint_flash(painter, &screen, now);
            }
        }
    }

    fn paint_glow(&self, painter: &egui::Painter, card_screen: &[egui::Pos2; 4], now: f64) {
        let opacity = match self.timeline.value(Channel::GlowOpacity, now) {
            Some(v) => v,
            None => return,
        };
        let pulse = self.timeline.value(Channel::GlowScale, now).unwrap_or(1.0);
        let grow = highlight::GLOW_SIZE_FACTOR * pulse;
        let pts = scale_quad(card_screen, grow);
        let color = GLOW_COLOR.gamma_multiply(opacity);
        painter.add(egui::Shape::convex_polygon(pts.to_vec(), color, egui::Stroke::NONE));
    }

    fn paint_flash(&self, painter: &egui::Painter, card_screen: &[egui::Pos2; 4], now: f64) {
        let opacity = match self.timeline.value(Channel::FlashOpacity, now) {
            Some(v) => v,
            None => return,
        };
        let pts = scale_quad(card_screen, highlight::FLASH_SIZE_FACTOR);
        let color = egui::Color32::WHITE.gamma_multiply(opacity);
        painter.add(egui::Shape::convex_polygon(pts.to_vec(), color, egui::Stroke::NONE));
    }
}

/// Enlarge a screen quad about its centroid.
fn scale_quad(quad: &[egui::Pos2; 4], factor: f32) -> [egui::Pos2; 4] {
    let cx = (quad[0].x + quad[1].x + quad[2].x + quad[3].x) / 4.0;
    let cy = (quad[0].y + quad[1].y + quad[2].y + quad[3].y) / 4.0;
    let center = egui::pos2(cx, cy);
    quad.map(|p| center + (p - center) * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene_with_cards(n: usize) -> (SceneState, StdRng) {
        let mut rng = StdRng::seed_from_u64(21);
        let config = VisualConfig::default();
        let mut scene = SceneState::new((1280.0, 800.0), &config, &mut rng);
        let roster = crate::roster::demo_roster(n, &mut rng);
        scene.field.rebuild(&roster, &config, 1280.0);
        (scene, rng)
    }

    #[test]
    fn spinning_decreases_yaw() {
        let (mut scene, _) = scene_with_cards(10);
        scene.tick(0.0, 0.08);
        scene.tick(1.0 / 60.0, 0.08);
        assert!(scene.yaw < 0.0);
    }

    #[test]
    fn paused_rotation_stands_still() {
        let (mut scene, _) = scene_with_cards(10);
        scene.tick(0.0, 0.08);
        scene.tick(0.5, 0.08);
        let yaw = scene.yaw;
        scene.tick(1.0, 0.0);
        assert_eq!(scene.yaw, yaw);
    }

    #[test]
    fn reveal_runs_to_completion_and_highlights() {
        let (mut scene, mut rng) = scene_with_cards(25);
        scene.tick(0.0, 0.08);
        assert!(scene.begin_reveal(1.0, &mut rng));
        assert!(scene.reveal_active());

        assert_eq!(scene.tick(2.0, 0.0), None);
        // Rotation settled at 7.0; dolly settles at 8.x; linger 0.2 more.
        assert_eq!(scene.tick(7.5, 0.0), None);
        assert_eq!(scene.tick(8.6, 0.0), None);
        assert!(scene.highlight.active.is_some(), "highlight fired after dolly");
        let winner = scene.tick(8.9, 0.0);
        assert!(winner.is_some());
        assert!(!scene.reveal_active());
        assert!((scene.camera.distance - camera::CLOSE_UP_DISTANCE).abs() < 1.0);
    }

    #[test]
    fn reveal_yaw_lands_exactly_on_target() {
        let (mut scene, mut rng) = scene_with_cards(25);
        scene.tick(0.0, 0.08);
        scene.begin_reveal(0.0, &mut rng);
        let target = scene
            .timeline
            .value(Channel::Yaw, 1e9)
            .expect("yaw tween running");
        for i in 1..200 {
            scene.tick(i as f64 * 0.05, 0.0);
        }
        assert!((scene.yaw - target).abs() < 1e-4);
    }

    #[test]
    fn reset_view_zeroes_pitch_keeps_yaw() {
        let (mut scene, mut rng) = scene_with_cards(25);
        scene.tick(0.0, 0.08);
        scene.begin_reveal(0.0, &mut rng);
        for i in 1..200 {
            scene.tick(i as f64 * 0.05, 0.0);
        }
        let yaw_after_reveal = scene.yaw;

        scene.reset_view(10.0, 600.0, 1.0);
        for i in 0..40 {
            scene.tick(10.0 + i as f64 * 0.05, 0.0);
        }
        assert!(scene.pitch.abs() < 1e-4, "pitch returned to level");
        assert_eq!(scene.yaw, yaw_after_reveal, "yaw untouched by reset");
        assert_eq!(scene.highlight.active, None);
    }

    #[test]
    fn viewport_flip_reports_rebuild_needed() {
        let (mut scene, _) = scene_with_cards(10);
        assert!(!scene.set_viewport((1200.0, 700.0), 600.0), "still wide");
        assert!(scene.set_viewport((500.0, 900.0), 600.0), "crossed into narrow");
        assert!(!scene.set_viewport((400.0, 900.0), 600.0), "still narrow");
    }

    #[test]
    fn cancel_reveal_stops_rotation_tweens() {
        let (mut scene, mut rng) = scene_with_cards(10);
        scene.begin_reveal(0.0, &mut rng);
        scene.cancel_reveal();
        assert!(!scene.reveal_active());
        assert!(!scene.timeline.is_running(Channel::Yaw));
        assert!(!scene.timeline.is_running(Channel::Pitch));
    }
}
