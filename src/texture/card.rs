//! CPU composition of per-participant card bitmaps.
//!
//! A card is a 256x140 RGBA image: rounded themed backdrop, circular avatar
//! (initials placeholder until the real image arrives), nickname and a
//! masked id line. Shapes are evaluated as signed distances per pixel with a
//! 1 px smoothed edge; rows are composed in parallel.

use rayon::prelude::*;

use crate::config::VisualConfig;
use crate::roster::Participant;
use crate::texture::font;

/// Card bitmap dimensions in pixels.
pub const CARD_W: u32 = 256;
pub const CARD_H: u32 = 140;

/// Base avatar radius before the config ratio is applied.
const AVATAR_BASE_RADIUS: f32 = 35.0;
const AVATAR_CX: f32 = 60.0;
const AVATAR_CY: f32 = 70.0;

const AVATAR_PLACEHOLDER: [u8; 4] = [68, 68, 68, 255];
const NAME_COLOR: [u8; 4] = [255, 255, 255, 255];
const ID_COLOR: [u8; 4] = [29, 209, 161, 255];

/// Border/background pairing for a card backdrop.
#[derive(Debug, Clone, Copy)]
pub struct CardTheme {
    pub border: [u8; 4],
    pub background: [u8; 4],
}

pub const CARD_THEMES: [CardTheme; 4] = [
    CardTheme { border: [66, 194, 255, 255], background: [37, 78, 112, 255] },
    CardTheme { border: [183, 98, 254, 255], background: [106, 59, 158, 255] },
    CardTheme { border: [193, 255, 114, 255], background: [112, 158, 59, 255] },
    CardTheme { border: [255, 133, 225, 255], background: [161, 78, 135, 255] },
];

/// Theme choice is a stable hash of the participant id, so a re-composed
/// card (cache clear, appearance change) keeps its colors.
pub fn theme_for(id: &str) -> CardTheme {
    let mut h: u32 = 0x811c9dc5;
    for b in id.as_bytes() {
        h ^= *b as u32;
        h = h.wrapping_mul(0x01000193);
    }
    CARD_THEMES[(h % CARD_THEMES.len() as u32) as usize]
}

/// Nickname clipped to the configured limit, with an ellipsis when cut.
pub fn display_label(name: &str, limit: usize) -> String {
    if name.chars().count() > limit {
        let mut s: String = name.chars().take(limit).collect();
        s.push_str("...");
        s
    } else {
        name.to_string()
    }
}

/// `ab***1234` style masking of the participant id.
pub fn masked_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 6 {
        return id.to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("ID: {}***{}", head, tail)
}

/// A composed card visual plus its lazily-created GPU handle.
///
/// The pixel buffer is the source of truth; `handle` mirrors it once the
/// paint pass uploads it. Dropping the handle releases the GPU copy, so
/// "dispose" is simply dropping the whole value.
pub struct CardTexture {
    pub pixels: Vec<u8>,
    pub handle: Option<egui::TextureHandle>,
    pub avatar_ref: String,
    pub avatar_applied: bool,
    theme: CardTheme,
    avatar_radius: f32,
}

impl CardTexture {
    /// Compose the placeholder card synchronously: backdrop, initials
    /// avatar, nickname, masked id. The real avatar arrives later via
    /// [`CardTexture::apply_avatar`].
    pub fn compose(participant: &Participant, config: &VisualConfig) -> Self {
        let theme = theme_for(&participant.id);
        let avatar_radius = AVATAR_BASE_RADIUS * config.avatar_size;
        let mut pixels = vec![0u8; (CARD_W * CARD_H * 4) as usize];

        paint_backdrop(&mut pixels, theme, avatar_radius);

        // Initials placeholder inside the avatar circle.
        let initial: String = participant
            .display_name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        let half = (font::GLYPH_SIZE * 3 / 2) as i32;
        font::draw_text(
            &mut pixels,
            CARD_W,
            CARD_H,
            AVATAR_CX as i32 - half,
            AVATAR_CY as i32 - half,
            &initial,
            3,
            NAME_COLOR,
            true,
        );

        let text_x = (AVATAR_CX + avatar_radius + 15.0).max(110.0) as i32;
        let name_scale = ((config.nickname_font_size / 8.0).round() as u32).clamp(1, 4);
        let name = display_label(&participant.display_name, config.nickname_limit);
        font::draw_text(
            &mut pixels,
            CARD_W,
            CARD_H,
            text_x,
            60 - (font::GLYPH_SIZE * name_scale) as i32 + 2,
            &name,
            name_scale,
            NAME_COLOR,
            true,
        );
        font::draw_text(
            &mut pixels,
            CARD_W,
            CARD_H,
            text_x,
            95 - (font::GLYPH_SIZE * 2) as i32 + 2,
            &masked_id(&participant.id),
            2,
            ID_COLOR,
            false,
        );

        Self {
            pixels,
            handle: None,
            avatar_ref: participant.avatar_ref.clone(),
            avatar_applied: false,
            theme,
            avatar_radius,
        }
    }

    /// Draw the fetched avatar into the circle, in place. The cache entry
    /// and its identity are unchanged; an existing GPU handle is updated.
    pub fn apply_avatar(&mut self, avatar: &image::RgbaImage) {
        let r = self.avatar_radius;
        let size = (r * 2.0).round().max(1.0) as u32;
        let resized = image::imageops::resize(
            avatar,
            size,
            size,
            image::imageops::FilterType::Triangle,
        );

        let x0 = (AVATAR_CX - r).floor().max(0.0) as u32;
        let y0 = (AVATAR_CY - r).floor().max(0.0) as u32;
        let x1 = ((AVATAR_CX + r).ceil() as u32).min(CARD_W - 1);
        let y1 = ((AVATAR_CY + r).ceil() as u32).min(CARD_H - 1);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - AVATAR_CX;
                let dy = py as f32 + 0.5 - AVATAR_CY;
                let d = (dx * dx + dy * dy).sqrt() - r;
                let idx = ((py * CARD_W + px) * 4) as usize;
                if d < 0.0 {
                    let sx = (px - x0).min(resized.width() - 1);
                    let sy = (py - y0).min(resized.height() - 1);
                    let src = resized.get_pixel(sx, sy).0;
                    let cover = (-d).min(1.0);
                    blend(&mut self.pixels[idx..idx + 4], src, cover);
                }
                // Keep the border ring crisp over the photo edge.
                if d.abs() <= 2.0 {
                    let cover = (2.0 - d.abs()).min(1.0);
                    blend(&mut self.pixels[idx..idx + 4], self.theme.border, cover);
                }
            }
        }

        self.avatar_applied = true;
        if let Some(handle) = &mut self.handle {
            let img = egui::ColorImage::from_rgba_unmultiplied(
                [CARD_W as usize, CARD_H as usize],
                &self.pixels,
            );
            handle.set(img, egui::TextureOptions::LINEAR);
        }
    }

    /// Upload the bitmap on first use; afterwards the handle is stable.
    pub fn ensure_uploaded(&mut self, ctx: &egui::Context, name_hint: &str) -> egui::TextureId {
        if self.handle.is_none() {
            let img = egui::ColorImage::from_rgba_unmultiplied(
                [CARD_W as usize, CARD_H as usize],
                &self.pixels,
            );
            self.handle = Some(ctx.load_texture(
                format!("card-{name_hint}"),
                img,
                egui::TextureOptions::LINEAR,
            ));
        }
        self.handle.as_ref().map(|h| h.id()).unwrap_or_default()
    }
}

/// Rounded backdrop plus the empty avatar circle, SDF-evaluated per pixel.
fn paint_backdrop(pixels: &mut [u8], theme: CardTheme, avatar_radius: f32) {
    let half_w = (CARD_W as f32 - 10.0) / 2.0;
    let half_h = (CARD_H as f32 - 10.0) / 2.0;
    let cx = CARD_W as f32 / 2.0;
    let cy = CARD_H as f32 / 2.0;
    let corner = 15.0;

    pixels
        .par_chunks_mut((CARD_W * 4) as usize)
        .enumerate()
        .for_each(|(row, line)| {
            let py = row as f32 + 0.5;
            for col in 0..CARD_W as usize {
                let px = col as f32 + 0.5;
                let d = rounded_rect_sdf(px - cx, py - cy, half_w, half_h, corner);
                let idx = col * 4;
                if d < 1.0 {
                    let cover = (1.0 - d).min(1.0);
                    blend(&mut line[idx..idx + 4], theme.background, cover);
                }
                if d.abs() <= 2.0 {
                    let cover = (2.0 - d.abs()).min(1.0);
                    blend(&mut line[idx..idx + 4], theme.border, cover);
                }
                let dx = px - AVATAR_CX;
                let dy = py - AVATAR_CY;
                let dc = (dx * dx + dy * dy).sqrt() - avatar_radius;
                if dc < 1.0 {
                    let cover = (1.0 - dc).min(1.0);
                    blend(&mut line[idx..idx + 4], AVATAR_PLACEHOLDER, cover);
                }
                if dc.abs() <= 2.0 {
                    let cover = (2.0 - dc.abs()).min(1.0);
                    blend(&mut line[idx..idx + 4], theme.border, cover);
                }
            }
        });
}

fn rounded_rect_sdf(x: f32, y: f32, half_w: f32, half_h: f32, r: f32) -> f32 {
    let qx = x.abs() - (half_w - r);
    let qy = y.abs() - (half_h - r);
    let ox = qx.max(0.0);
    let oy = qy.max(0.0);
    (ox * ox + oy * oy).sqrt() + qx.max(qy).min(0.0) - r
}

fn blend(dst: &mut [u8], src: [u8; 4], cover: f32) {
    let a = cover.clamp(0.0, 1.0) * (src[3] as f32 / 255.0);
    for i in 0..3 {
        dst[i] = (src[i] as f32 * a + dst[i] as f32 * (1.0 - a)) as u8;
    }
    dst[3] = ((a + (dst[3] as f32 / 255.0) * (1.0 - a)) * 255.0) as u8;
}
