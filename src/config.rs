//! Typed visual configuration and the override boundary.
//!
//! Host-supplied overrides arrive as a patch of optional fields, are clamped
//! to sane ranges here, and are classified into the rebuild work they imply.
//! Nothing untyped crosses into the engine.

/// All tunables of the lottery scene.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    /// Cards simultaneously on the sphere (the visible set size).
    pub card_count: usize,
    /// Sphere radius in world units.
    pub radius: f32,
    pub card_width: f32,
    pub card_height: f32,
    /// Rotation step per 60 Hz frame while spinning.
    pub spin_speed_max: f32,
    /// Auto-start the next round out of RESULT.
    pub auto_start_next_round: bool,
    pub auto_start_delay_s: f64,
    /// Auto-stop a spin after this long; `0` waits for a manual stop.
    pub spin_duration_s: f64,
    pub swap_interval_s: f64,
    /// Cards replaced per swap tick.
    pub swap_count: usize,
    pub particle_count: usize,
    pub card_scale: f32,
    /// Avatar radius as a ratio of its base size.
    pub avatar_size: f32,
    pub nickname_limit: usize,
    pub nickname_font_size: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            card_count: 200,
            radius: 600.0,
            card_width: 60.0,
            card_height: 35.0,
            spin_speed_max: 0.08,
            auto_start_next_round: true,
            auto_start_delay_s: 2.0,
            spin_duration_s: 3.0,
            swap_interval_s: 5.0,
            swap_count: 5,
            particle_count: 1000,
            card_scale: 1.0,
            avatar_size: 0.6,
            nickname_limit: 8,
            nickname_font_size: 24.0,
        }
    }
}

/// Partial override, one `Option` per field.
#[derive(Debug, Clone, Default)]
pub struct VisualConfigPatch {
    pub card_count: Option<usize>,
    pub radius: Option<f32>,
    pub card_width: Option<f32>,
    pub card_height: Option<f32>,
    pub spin_speed_max: Option<f32>,
    pub auto_start_next_round: Option<bool>,
    pub auto_start_delay_s: Option<f64>,
    pub spin_duration_s: Option<f64>,
    pub swap_interval_s: Option<f64>,
    pub swap_count: Option<usize>,
    pub particle_count: Option<usize>,
    pub card_scale: Option<f32>,
    pub avatar_size: Option<f32>,
    pub nickname_limit: Option<usize>,
    pub nickname_font_size: Option<f32>,
}

/// What an applied patch invalidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigDelta {
    /// Card pixels changed: texture cache must be cleared, cards rebuilt.
    pub appearance: bool,
    /// Visible-set size changed.
    pub count: bool,
    /// Card positions changed without affecting textures.
    pub geometry: bool,
    /// Backdrop particle field must be regenerated.
    pub particles: bool,
}

impl ConfigDelta {
    pub fn any(self) -> bool {
        self.appearance || self.count || self.geometry || self.particles
    }
}

impl VisualConfig {
    /// Apply a host override patch. Values are clamped at this boundary and
    /// the returned delta says which caches/layouts the change invalidates.
    pub fn apply(&mut self, patch: &VisualConfigPatch) -> ConfigDelta {
        let before = self.clone();

        if let Some(v) = patch.card_count {
            self.card_count = clamp_usize("card_count", v, 1, 2000);
        }
        if let Some(v) = patch.radius {
            self.radius = clamp_f32("radius", v, 100.0, 2000.0);
        }
        if let Some(v) = patch.card_width {
            self.card_width = clamp_f32("card_width", v, 10.0, 200.0);
        }
        if let Some(v) = patch.card_height {
            self.card_height = clamp_f32("card_height", v, 10.0, 200.0);
        }
        if let Some(v) = patch.spin_speed_max {
            self.spin_speed_max = clamp_f32("spin_speed_max", v, 0.005, 0.5);
        }
        if let Some(v) = patch.auto_start_next_round {
            self.auto_start_next_round = v;
        }
        if let Some(v) = patch.auto_start_delay_s {
            self.auto_start_delay_s = clamp_f64("auto_start_delay_s", v, 0.0, 60.0);
        }
        if let Some(v) = patch.spin_duration_s {
            self.spin_duration_s = clamp_f64("spin_duration_s", v, 0.0, 120.0);
        }
        if let Some(v) = patch.swap_interval_s {
            self.swap_interval_s = clamp_f64("swap_interval_s", v, 0.5, 60.0);
        }
        if let Some(v) = patch.swap_count {
            self.swap_count = clamp_usize("swap_count", v, 0, 50);
        }
        if let Some(v) = patch.particle_count {
            self.particle_count = clamp_usize("particle_count", v, 0, 5000);
        }
        if let Some(v) = patch.card_scale {
            self.card_scale = clamp_f32("card_scale", v, 0.2, 4.0);
        }
        if let Some(v) = patch.avatar_size {
            self.avatar_size = clamp_f32("avatar_size", v, 0.1, 1.0);
        }
        if let Some(v) = patch.nickname_limit {
            self.nickname_limit = clamp_usize("nickname_limit", v, 1, 20);
        }
        if let Some(v) = patch.nickname_font_size {
            self.nickname_font_size = clamp_f32("nickname_font_size", v, 8.0, 32.0);
        }

        ConfigDelta {
            appearance: self.card_scale != before.card_scale
                || self.avatar_size != before.avatar_size
                || self.nickname_limit != before.nickname_limit
                || self.nickname_font_size != before.nickname_font_size
                || self.card_width != before.card_width
                || self.card_height != before.card_height,
            count: self.card_count != before.card_count,
            geometry: self.radius != before.radius,
            particles: self.particle_count != before.particle_count,
        }
    }
}

fn clamp_f32(name: &str, v: f32, lo: f32, hi: f32) -> f32 {
    let c = v.clamp(lo, hi);
    if c != v {
        log::warn!("config {name}={v} out of range, clamped to {c}");
    }
    c
}

fn clamp_f64(name: &str, v: f64, lo: f64, hi: f64) -> f64 {
    let c = v.clamp(lo, hi);
    if c != v {
        log::warn!("config {name}={v} out of range, clamped to {c}");
    }
    c
}

fn clamp_usize(name: &str, v: usize, lo: usize, hi: usize) -> usize {
    let c = v.clamp(lo, hi);
    if c != v {
        log::warn!("config {name}={v} out of range, clamped to {c}");
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appearance_options_flag_appearance() {
        let mut cfg = VisualConfig::default();
        let delta = cfg.apply(&VisualConfigPatch {
            card_scale: Some(2.0),
            ..Default::default()
        });
        assert!(delta.appearance);
        assert!(!delta.count);
        assert_eq!(cfg.card_scale, 2.0);
    }

    #[test]
    fn count_option_only_flags_count() {
        let mut cfg = VisualConfig::default();
        let delta = cfg.apply(&VisualConfigPatch {
            card_count: Some(80),
            ..Default::default()
        });
        assert!(delta.count);
        assert!(!delta.appearance);
        assert!(!delta.geometry);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut cfg = VisualConfig::default();
        cfg.apply(&VisualConfigPatch {
            card_count: Some(1_000_000),
            avatar_size: Some(-3.0),
            ..Default::default()
        });
        assert_eq!(cfg.card_count, 2000);
        assert_eq!(cfg.avatar_size, 0.1);
    }

    #[test]
    fn noop_patch_reports_no_delta() {
        let mut cfg = VisualConfig::default();
        let delta = cfg.apply(&VisualConfigPatch::default());
        assert!(!delta.any());

        // Re-applying the current value is also not a change.
        let delta = cfg.apply(&VisualConfigPatch {
            radius: Some(cfg.radius),
            ..Default::default()
        });
        assert!(!delta.any());
    }
}
