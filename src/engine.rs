//! The lottery state machine and top-level controller.
//!
//! Owns the phase, the roster, every timer, and the scene; external UI talks
//! to it exclusively through the imperative control surface. The machine is
//! defensive: it is driven by asynchronous UI timers that may race, so an
//! illegal transition is a logged no-op, never an error.

use std::sync::mpsc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::avatar::AvatarLoader;
use crate::config::{VisualConfig, VisualConfigPatch};
use crate::roster::{select_distinct, Participant, RosterResult};
use crate::scene::{SceneState, IDLE_SPIN_SPEED};
use crate::swap::SwapScheduler;
use crate::texture::{CardTexture, TextureCache};

/// Fixed pre-spin countdown.
pub const COUNTDOWN_SECONDS: f64 = 3.0;

/// `IDLE → COUNTDOWN → SPINNING → (PAUSED ⇄ SPINNING) → STOPPING → RESULT → IDLE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown,
    Spinning,
    Paused,
    Stopping,
    Result,
}

impl Phase {
    /// Roster rotation is a user-visible-continuity hazard everywhere else.
    pub fn swaps_active(self) -> bool {
        matches!(self, Phase::Idle | Phase::Spinning)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Countdown => "countdown",
            Phase::Spinning => "spinning",
            Phase::Paused => "paused",
            Phase::Stopping => "stopping",
            Phase::Result => "result",
        }
    }
}

pub struct LotteryEngine {
    config: VisualConfig,
    phase: Phase,

    roster: Vec<Participant>,
    pending_roster: Option<mpsc::Receiver<RosterResult>>,
    fallback: Vec<Participant>,
    using_fallback: bool,

    winner: Option<Participant>,
    winner_history: Vec<Participant>,

    pub scene: SceneState,
    cache: TextureCache,
    avatars: AvatarLoader,
    swap: SwapScheduler,

    countdown_until: Option<f64>,
    auto_stop_at: Option<f64>,
    auto_next_at: Option<f64>,

    rng: StdRng,
    started: Instant,
}

impl LotteryEngine {
    pub fn new(viewport: (f32, f32)) -> Self {
        Self::with_seed(viewport, rand::random())
    }

    /// Deterministic construction for tests and reproducible demos.
    pub fn with_seed(viewport: (f32, f32), seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = VisualConfig::default();
        let scene = SceneState::new(viewport, &config, &mut rng);
        Self {
            config,
            phase: Phase::Idle,
            roster: Vec::new(),
            pending_roster: None,
            fallback: Vec::new(),
            using_fallback: false,
            winner: None,
            winner_history: Vec::new(),
            scene,
            cache: TextureCache::default(),
            avatars: AvatarLoader::new(),
            swap: SwapScheduler::default(),
            countdown_until: None,
            auto_stop_at: None,
            auto_next_at: None,
            rng,
            started: Instant::now(),
        }
    }

    /// Seconds on the engine's monotonic timeline; the `now` every control
    /// and tick call expects.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    // ── Roster ──

    /// Hand over a ready roster.
    pub fn set_roster(&mut self, roster: Vec<Participant>) {
        log::info!("roster set: {} participants", roster.len());
        self.roster = roster;
        self.using_fallback = false;
        self.pending_roster = None;
        self.swap.reset();
        self.reset_visible();
    }

    /// Hand over a deferred roster source plus the fallback to use if it
    /// fails. Cards appear once the source resolves.
    pub fn set_roster_deferred(
        &mut self,
        source: mpsc::Receiver<RosterResult>,
        fallback: Vec<Participant>,
    ) {
        self.pending_roster = Some(source);
        self.fallback = fallback;
    }

    fn poll_roster(&mut self) {
        let polled = match self.pending_roster.as_ref() {
            Some(rx) => rx.try_recv(),
            None => return,
        };
        match polled {
            Ok(Ok(roster)) => self.set_roster(roster),
            Ok(Err(err)) => {
                log::warn!("roster source failed ({err}), using fallback data");
                let fallback = std::mem::take(&mut self.fallback);
                self.set_roster(fallback);
                self.using_fallback = true;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                log::warn!("roster source dropped, using fallback data");
                let fallback = std::mem::take(&mut self.fallback);
                self.set_roster(fallback);
                self.using_fallback = true;
            }
        }
    }

    /// Visible set := roster prefix of the configured size; full rebuild.
    fn reset_visible(&mut self) {
        let visible: Vec<Participant> = self
            .roster
            .iter()
            .take(self.config.card_count)
            .cloned()
            .collect();
        let viewport_w = self.scene.camera.viewport.0;
        self.scene.field.rebuild(&visible, &self.config, viewport_w);
    }

    /// Rebuild the cards keeping their current participant bindings
    /// (appearance/geometry change, narrow-viewport flip).
    fn refresh_cards(&mut self) {
        if self.scene.field.is_empty() {
            self.reset_visible();
            return;
        }
        let current: Vec<Participant> = self
            .scene
            .field
            .cards
            .iter()
            .map(|c| c.participant.clone())
            .collect();
        let viewport_w = self.scene.camera.viewport.0;
        self.scene.field.rebuild(&current, &self.config, viewport_w);
    }

    /// Compose any missing card textures for the currently visible set and
    /// kick off their avatar fetches. Runs every frame; almost always a
    /// no-op per card.
    fn ensure_textures(&mut self) {
        for i in 0..self.scene.field.len() {
            let participant = self.scene.field.cards[i].participant.clone();
            if self.cache.contains(&participant.id) {
                continue;
            }
            let mut tex = CardTexture::compose(&participant, &self.config);
            match self.avatars.get(&participant.avatar_ref) {
                Some(img) => tex.apply_avatar(img),
                None => self.avatars.request(&participant.avatar_ref),
            }
            self.cache.insert(&participant.id, tex);
        }
    }

    // ── Control surface ──

    pub fn start(&mut self, now: f64, with_countdown: bool) {
        if self.phase != Phase::Idle {
            log::debug!("start ignored in phase {}", self.phase.label());
            return;
        }
        if self.scene.field.is_empty() {
            log::warn!("start ignored: no participants");
            return;
        }
        if with_countdown {
            self.phase = Phase::Countdown;
            self.countdown_until = Some(now + COUNTDOWN_SECONDS);
        } else {
            self.enter_spinning(now);
        }
    }

    /// Toggle SPINNING ⇄ PAUSED.
    pub fn pause(&mut self, now: f64) {
        match self.phase {
            Phase::Spinning => {
                self.phase = Phase::Paused;
                self.auto_stop_at = None;
            }
            Phase::Paused => self.enter_spinning(now),
            _ => log::debug!("pause ignored in phase {}", self.phase.label()),
        }
    }

    /// Begin the stop choreography. No further input is accepted until the
    /// reveal resolves into RESULT.
    pub fn stop(&mut self, now: f64) {
        if !matches!(self.phase, Phase::Spinning | Phase::Paused) {
            log::debug!("stop ignored in phase {}", self.phase.label());
            return;
        }
        if self.scene.begin_reveal(now, &mut self.rng) {
            self.phase = Phase::Stopping;
            self.countdown_until = None;
            self.auto_stop_at = None;
            self.auto_next_at = None;
        }
    }

    pub fn reset_view(&mut self, now: f64) {
        self.scene.reset_view(now, self.config.radius, self.base_card_scale());
    }

    /// Leave RESULT. With `start_next` the next round begins immediately,
    /// skipping the countdown.
    pub fn dismiss_result(&mut self, now: f64, start_next: bool) {
        if self.phase != Phase::Result {
            log::debug!("dismiss ignored in phase {}", self.phase.label());
            return;
        }
        self.winner = None;
        self.auto_next_at = None;
        self.phase = Phase::Idle;
        self.reset_view(now);
        if start_next {
            self.start(now, false);
        }
    }

    /// Apply a host override patch and invalidate exactly what it touches.
    pub fn update_visual_config(&mut self, patch: &VisualConfigPatch) {
        let delta = self.config.apply(patch);
        if delta.appearance {
            self.cache.clear();
            self.refresh_cards();
        } else if delta.geometry {
            self.refresh_cards();
        }
        if delta.count {
            self.reset_visible();
        }
        if delta.particles {
            self.scene.sky.rebuild_dust(self.config.particle_count, &mut self.rng);
        }
    }

    /// Multi-winner draw over the full roster (distinct picks). Recorded in
    /// the winner history alongside single-reveal winners.
    pub fn draw_winners(&mut self, count: usize) -> Vec<Participant> {
        let picked = select_distinct(&self.roster, count, &mut self.rng);
        self.winner_history.extend(picked.iter().cloned());
        picked
    }

    /// Tear the scene down for a remount: cancel the choreography, stop all
    /// tweens, release every texture.
    pub fn detach(&mut self) {
        self.scene.cancel_reveal();
        self.scene.timeline.clear();
        self.cache.clear();
        self.countdown_until = None;
        self.auto_stop_at = None;
        self.auto_next_at = None;
    }

    // ── Per-frame ──

    /// One cooperative update step; everything time-based runs off `now`.
    pub fn tick(&mut self, now: f64, viewport: (f32, f32)) {
        if self.scene.set_viewport(viewport, self.config.radius) {
            self.refresh_cards();
        }

        self.poll_roster();

        // Avatar upgrades mutate cached cards in place.
        for avatar_ref in self.avatars.poll() {
            if let Some(img) = self.avatars.get(&avatar_ref) {
                for tex in self.cache.values_mut() {
                    if tex.avatar_ref == avatar_ref && !tex.avatar_applied {
                        tex.apply_avatar(img);
                    }
                }
            }
        }

        // Timers. Each transition clears the deadlines it supersedes.
        if self.countdown_until.is_some_and(|t| now >= t) && self.phase == Phase::Countdown {
            self.enter_spinning(now);
        }
        if self.auto_stop_at.is_some_and(|t| now >= t) && self.phase == Phase::Spinning {
            log::debug!("spin duration elapsed, stopping");
            self.stop(now);
        }
        if self.auto_next_at.is_some_and(|t| now >= t) && self.phase == Phase::Result {
            self.dismiss_result(now, true);
        }

        // Roster rotation.
        let swaps = self.swap.plan(
            now,
            self.config.swap_interval_s,
            self.config.swap_count,
            self.phase.swaps_active(),
            &self.roster,
            self.scene.field.len(),
            &mut self.rng,
        );
        for (idx, participant) in swaps {
            self.scene.field.rebind(idx, participant);
        }

        self.ensure_textures();

        let spin_speed = match self.phase {
            Phase::Spinning => self.config.spin_speed_max,
            Phase::Idle => IDLE_SPIN_SPEED,
            _ => 0.0,
        };

        if let Some(winner_idx) = self.scene.tick(now, spin_speed) {
            match self.scene.field.cards.get(winner_idx) {
                Some(card) => {
                    let winner = card.participant.clone();
                    log::info!("winner revealed: {}", winner.display_name);
                    self.winner_history.push(winner.clone());
                    self.winner = Some(winner);
                    self.phase = Phase::Result;
                    if self.config.auto_start_next_round {
                        self.auto_next_at = Some(now + self.config.auto_start_delay_s);
                    }
                }
                None => self.phase = Phase::Idle,
            }
        } else if self.phase == Phase::Stopping && !self.scene.reveal_active() {
            // The reveal aborted under us (card arena changed); recover.
            self.phase = Phase::Idle;
        }
    }

    /// Host entry point: tick with the real clock and paint into `ui`.
    pub fn frame(&mut self, ui: &mut egui::Ui) {
        let now = self.elapsed();
        let rect = ui.max_rect();
        self.tick(now, (rect.width(), rect.height()));

        let painter = ui.painter_at(rect);
        self.scene
            .paint(ui.ctx(), &painter, rect, &mut self.cache, &self.config, now);

        // The scene is always animating; keep the frame callback scheduled.
        ui.ctx().request_repaint();
    }

    fn enter_spinning(&mut self, now: f64) {
        self.phase = Phase::Spinning;
        self.countdown_until = None;
        self.auto_stop_at = if self.config.spin_duration_s > 0.0 {
            Some(now + self.config.spin_duration_s)
        } else {
            None
        };
    }

    fn base_card_scale(&self) -> f32 {
        self.scene
            .field
            .cards
            .first()
            .map(|c| c.scale)
            .unwrap_or(self.config.card_scale)
    }

    // ── Observables ──

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<&Participant> {
        self.winner.as_ref()
    }

    pub fn winner_history(&self) -> &[Participant] {
        &self.winner_history
    }

    pub fn visible_count(&self) -> usize {
        self.scene.field.len()
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Advisory: the deferred roster failed and the fallback is on display.
    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }

    /// Remaining whole seconds of the countdown, while in COUNTDOWN.
    pub fn countdown_remaining(&self, now: f64) -> Option<u32> {
        if self.phase != Phase::Countdown {
            return None;
        }
        self.countdown_until
            .map(|t| (t - now).max(0.0).ceil() as u32)
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn texture_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterError;

    const VP: (f32, f32) = (1280.0, 800.0);

    /// Offline roster: empty avatar refs keep the loader idle under test.
    fn test_roster(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant {
                id: format!("p{i:04}-xxxxxx"),
                display_name: format!("Player {i}"),
                avatar_ref: String::new(),
            })
            .collect()
    }

    fn engine_with_roster(n: usize) -> LotteryEngine {
        let mut engine = LotteryEngine::with_seed(VP, 1234);
        engine.set_roster(test_roster(n));
        // Keep scenario timelines manual unless a test opts back in.
        engine.update_visual_config(&VisualConfigPatch {
            auto_start_next_round: Some(false),
            spin_duration_s: Some(0.0),
            ..Default::default()
        });
        engine
    }

    /// Drive the engine through a whole reveal starting at `t0`.
    fn run_reveal(engine: &mut LotteryEngine, t0: f64) {
        let mut t = t0;
        while engine.phase() == Phase::Stopping {
            t += 0.1;
            engine.tick(t, VP);
            assert!(t < t0 + 30.0, "reveal never resolved");
        }
    }

    #[test]
    fn full_round_scenario() {
        let mut engine = engine_with_roster(5);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.visible_count(), 5);

        engine.start(0.0, false);
        assert_eq!(engine.phase(), Phase::Spinning);

        engine.tick(0.1, VP);
        engine.stop(0.5);
        assert_eq!(engine.phase(), Phase::Stopping);
        assert!(engine.winner().is_none(), "winner only set entering RESULT");

        run_reveal(&mut engine, 0.5);
        assert_eq!(engine.phase(), Phase::Result);
        let winner = engine.winner().expect("winner set in RESULT").clone();
        assert!(engine.roster.contains(&winner));
        assert_eq!(engine.winner_history(), std::slice::from_ref(&winner));

        // Reset drives pitch home but leaves yaw where the reveal put it.
        let yaw = engine.scene.yaw;
        engine.reset_view(20.0);
        for i in 0..40 {
            engine.tick(20.0 + i as f64 * 0.05, VP);
        }
        assert!(engine.scene.pitch.abs() < 1e-4);
        assert_eq!(engine.scene.yaw, yaw);
    }

    #[test]
    fn illegal_transitions_are_noops() {
        let mut engine = engine_with_roster(5);
        engine.stop(0.0);
        assert_eq!(engine.phase(), Phase::Idle);
        engine.pause(0.0);
        assert_eq!(engine.phase(), Phase::Idle);
        engine.dismiss_result(0.0, false);
        assert_eq!(engine.phase(), Phase::Idle);

        engine.start(0.0, false);
        engine.start(0.1, true); // already spinning; no countdown appears
        assert_eq!(engine.phase(), Phase::Spinning);
        assert_eq!(engine.countdown_remaining(0.1), None);

        engine.stop(1.0);
        engine.stop(1.1); // second stop during STOPPING is ignored
        engine.pause(1.2); // as is pausing mid-reveal
        assert_eq!(engine.phase(), Phase::Stopping);
    }

    #[test]
    fn start_without_roster_is_a_noop() {
        let mut engine = LotteryEngine::with_seed(VP, 7);
        engine.start(0.0, false);
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn countdown_counts_down_then_spins() {
        let mut engine = engine_with_roster(10);
        engine.start(0.0, true);
        assert_eq!(engine.phase(), Phase::Countdown);
        assert_eq!(engine.countdown_remaining(0.2), Some(3));
        assert_eq!(engine.countdown_remaining(2.5), Some(1));

        engine.tick(1.0, VP);
        assert_eq!(engine.phase(), Phase::Countdown);
        engine.tick(3.1, VP);
        assert_eq!(engine.phase(), Phase::Spinning);
        assert_eq!(engine.countdown_remaining(3.2), None);
    }

    #[test]
    fn spin_duration_auto_stops() {
        let mut engine = engine_with_roster(10);
        engine.update_visual_config(&VisualConfigPatch {
            spin_duration_s: Some(2.0),
            ..Default::default()
        });
        engine.start(0.0, false);
        engine.tick(1.0, VP);
        assert_eq!(engine.phase(), Phase::Spinning);
        engine.tick(2.1, VP);
        assert_eq!(engine.phase(), Phase::Stopping);
    }

    #[test]
    fn pause_toggles_and_freezes_rotation() {
        let mut engine = engine_with_roster(10);
        engine.start(0.0, false);
        engine.tick(0.0, VP);
        engine.tick(0.5, VP);
        engine.pause(0.6);
        assert_eq!(engine.phase(), Phase::Paused);

        engine.tick(0.7, VP);
        let yaw = engine.scene.yaw;
        engine.tick(1.5, VP);
        assert_eq!(engine.scene.yaw, yaw, "paused sphere must not rotate");

        engine.pause(1.6);
        assert_eq!(engine.phase(), Phase::Spinning);
    }

    #[test]
    fn swaps_only_mutate_visible_set_while_idle_or_spinning() {
        let mut engine = engine_with_roster(100);
        engine.update_visual_config(&VisualConfigPatch {
            card_count: Some(10),
            swap_interval_s: Some(1.0),
            swap_count: Some(5),
            ..Default::default()
        });
        engine.tick(0.0, VP);

        // Paused: many intervals elapse, bindings must not move.
        engine.start(0.1, false);
        engine.pause(0.2);
        let ids = engine.scene.field.visible_ids();
        for i in 0..50 {
            engine.tick(0.3 + i as f64, VP);
        }
        assert_eq!(engine.scene.field.visible_ids(), ids);

        // Stopping: same guarantee through the whole reveal.
        engine.pause(60.0);
        engine.stop(60.1);
        let ids = engine.scene.field.visible_ids();
        let mut t = 60.1;
        while engine.phase() == Phase::Stopping {
            t += 0.5;
            engine.tick(t, VP);
        }
        assert_eq!(engine.phase(), Phase::Result);
        assert_eq!(engine.scene.field.visible_ids(), ids);

        // Result: still frozen.
        for i in 0..20 {
            engine.tick(t + 1.0 + i as f64, VP);
        }
        assert_eq!(engine.scene.field.visible_ids(), ids);
    }

    #[test]
    fn swaps_do_fire_while_spinning() {
        let mut engine = engine_with_roster(200);
        engine.update_visual_config(&VisualConfigPatch {
            card_count: Some(10),
            swap_interval_s: Some(1.0),
            swap_count: Some(8),
            ..Default::default()
        });
        engine.tick(0.0, VP);
        engine.start(0.1, false);
        let before = engine.scene.field.visible_ids();
        let mut changed = false;
        for i in 1..=20 {
            engine.tick(i as f64 * 1.1, VP);
            if engine.scene.field.visible_ids() != before {
                changed = true;
                break;
            }
        }
        assert!(changed, "swap scheduler never rotated the roster");
        assert_eq!(engine.visible_count(), 10, "swaps preserve arena size");
    }

    #[test]
    fn appearance_change_clears_cache_then_rebuild_rescales() {
        let mut engine = engine_with_roster(10);
        engine.tick(0.0, VP);
        assert_eq!(engine.texture_count(), 10);

        engine.update_visual_config(&VisualConfigPatch {
            card_scale: Some(2.0),
            ..Default::default()
        });
        assert_eq!(engine.texture_count(), 0, "appearance change empties the cache");
        for card in &engine.scene.field.cards {
            assert_eq!(card.scale, 2.0);
        }

        // Next frame re-composes the visible set.
        engine.tick(0.1, VP);
        assert_eq!(engine.texture_count(), 10);
    }

    #[test]
    fn count_change_resizes_visible_set() {
        let mut engine = engine_with_roster(50);
        assert_eq!(engine.visible_count(), 50);
        engine.update_visual_config(&VisualConfigPatch {
            card_count: Some(8),
            ..Default::default()
        });
        assert_eq!(engine.visible_count(), 8);
        engine.update_visual_config(&VisualConfigPatch {
            card_count: Some(30),
            ..Default::default()
        });
        assert_eq!(engine.visible_count(), 30);
    }

    #[test]
    fn deferred_roster_failure_falls_back_with_advisory() {
        let mut engine = LotteryEngine::with_seed(VP, 5);
        let fallback = test_roster(5);
        let (tx, rx) = mpsc::channel();
        engine.set_roster_deferred(rx, fallback);

        engine.tick(0.0, VP);
        assert_eq!(engine.visible_count(), 0, "nothing until the source settles");

        tx.send(Err(RosterError { message: "boom".into() })).unwrap();
        engine.tick(0.1, VP);
        assert!(engine.using_fallback());
        assert_eq!(engine.roster_len(), 5);
        assert_eq!(engine.visible_count(), 5);
    }

    #[test]
    fn deferred_roster_success_replaces_without_advisory() {
        let mut engine = LotteryEngine::with_seed(VP, 5);
        let (tx, rx) = mpsc::channel();
        engine.set_roster_deferred(rx, test_roster(5));
        tx.send(Ok(test_roster(40))).unwrap();
        engine.tick(0.0, VP);
        assert!(!engine.using_fallback());
        assert_eq!(engine.roster_len(), 40);
    }

    #[test]
    fn dismiss_clears_winner_and_can_chain_rounds() {
        let mut engine = engine_with_roster(5);
        engine.start(0.0, false);
        engine.stop(0.5);
        run_reveal(&mut engine, 0.5);
        assert_eq!(engine.phase(), Phase::Result);

        engine.dismiss_result(20.0, true);
        assert!(engine.winner().is_none(), "winner cleared on leaving RESULT");
        assert_eq!(engine.phase(), Phase::Spinning, "auto-start skips the countdown");
        assert_eq!(engine.winner_history().len(), 1, "history survives dismissal");
    }

    #[test]
    fn result_auto_advances_when_configured() {
        let mut engine = engine_with_roster(5);
        engine.update_visual_config(&VisualConfigPatch {
            auto_start_next_round: Some(true),
            auto_start_delay_s: Some(2.0),
            ..Default::default()
        });
        engine.start(0.0, false);
        engine.stop(0.5);
        run_reveal(&mut engine, 0.5);
        assert_eq!(engine.phase(), Phase::Result);

        let result_at = engine.auto_next_at.expect("auto-advance armed");
        engine.tick(result_at - 0.1, VP);
        assert_eq!(engine.phase(), Phase::Result);
        engine.tick(result_at + 0.1, VP);
        assert_eq!(engine.phase(), Phase::Spinning);
        assert!(engine.winner().is_none());
    }

    #[test]
    fn multi_winner_draw_is_distinct_and_recorded() {
        let mut engine = engine_with_roster(30);
        let picked = engine.draw_winners(3);
        assert_eq!(picked.len(), 3);
        let ids: std::collections::HashSet<_> = picked.iter().map(|p| &p.id).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(engine.winner_history().len(), 3);
    }

    #[test]
    fn detach_releases_everything() {
        let mut engine = engine_with_roster(10);
        engine.tick(0.0, VP);
        engine.start(0.1, false);
        engine.stop(0.5);
        engine.detach();
        assert!(!engine.scene.reveal_active());
        assert_eq!(engine.texture_count(), 0);
        assert_eq!(engine.scene.timeline.looping_count(), 0);
    }
}
