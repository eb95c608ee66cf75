//! Background avatar fetching and decoding.
//!
//! Spawns a thread per requested avatar ref, downloads and decodes to a
//! square RGBA crop, and hands results back over a channel polled once per
//! frame. Failures are remembered so a broken ref is fetched only once and
//! its card keeps the initials placeholder.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use url::Url;

/// Manages background avatar fetching and decoding.
pub struct AvatarLoader {
    pending: HashMap<String, mpsc::Receiver<Option<image::RgbaImage>>>,
    loaded: HashMap<String, image::RgbaImage>,
    failed: HashSet<String>,
}

impl Default for AvatarLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarLoader {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Request an avatar to be fetched in the background. Duplicate and
    /// already-resolved refs are ignored.
    pub fn request(&mut self, avatar_ref: &str) {
        if avatar_ref.is_empty()
            || self.loaded.contains_key(avatar_ref)
            || self.pending.contains_key(avatar_ref)
            || self.failed.contains(avatar_ref)
        {
            return;
        }

        if Url::parse(avatar_ref).is_err() {
            log::debug!("unusable avatar ref: {avatar_ref}");
            self.failed.insert(avatar_ref.to_string());
            return;
        }

        let (tx, rx) = mpsc::channel();
        let url_owned = avatar_ref.to_string();
        std::thread::spawn(move || {
            let result = fetch_and_decode(&url_owned);
            let _ = tx.send(result);
        });
        self.pending.insert(avatar_ref.to_string(), rx);
    }

    /// Poll for completed downloads. Call every frame; returns the refs that
    /// became available this frame so their cards can be upgraded.
    pub fn poll(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        let mut completed = Vec::new();
        for (avatar_ref, rx) in &self.pending {
            if let Ok(result) = rx.try_recv() {
                match result {
                    Some(img) => {
                        self.loaded.insert(avatar_ref.clone(), img);
                        ready.push(avatar_ref.clone());
                    }
                    None => {
                        log::debug!("avatar fetch failed: {avatar_ref}");
                        self.failed.insert(avatar_ref.clone());
                    }
                }
                completed.push(avatar_ref.clone());
            }
        }
        for avatar_ref in completed {
            self.pending.remove(&avatar_ref);
        }
        ready
    }

    pub fn get(&self, avatar_ref: &str) -> Option<&image::RgbaImage> {
        self.loaded.get(avatar_ref)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn fetch_and_decode(avatar_ref: &str) -> Option<image::RgbaImage> {
    let resp = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?
        .get(avatar_ref)
        .send()
        .ok()?;

    if !resp.status().is_success() {
        return None;
    }

    let bytes = resp.bytes().ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    // Center-crop to square; cards only ever show a circular cutout.
    let side = w.min(h);
    let cropped = image::imageops::crop_imm(&rgba, (w - side) / 2, (h - side) / 2, side, side)
        .to_image();

    // Cap decode size; the on-card circle is tiny.
    if side > 256 {
        Some(image::imageops::resize(
            &cropped,
            256,
            256,
            image::imageops::FilterType::Triangle,
        ))
    } else {
        Some(cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_deduplicates() {
        let mut loader = AvatarLoader::new();
        loader.request("https://example.com/a.png");
        loader.request("https://example.com/a.png"); // should not duplicate
        assert_eq!(loader.pending_count(), 1);
    }

    #[test]
    fn invalid_refs_fail_without_spawning() {
        let mut loader = AvatarLoader::new();
        loader.request("not a url");
        loader.request("");
        assert_eq!(loader.pending_count(), 0);
        // A failed ref is never retried.
        loader.request("not a url");
        assert_eq!(loader.pending_count(), 0);
    }
}
