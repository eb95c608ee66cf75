//! Participant roster: the opaque data source handed in by the caller.
//!
//! The engine never fetches rosters itself. It accepts either a ready
//! `Vec<Participant>` or a deferred source resolving on a background thread,
//! with a caller-supplied fallback applied if resolution fails.

use std::sync::mpsc;

use rand::Rng;

/// One entrant. Immutable once issued; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
    pub avatar_ref: String,
}

/// Error from a deferred roster source.
pub struct RosterError {
    pub message: String,
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RosterError({})", self.message)
    }
}

pub type RosterResult = Result<Vec<Participant>, RosterError>;

/// Run a blocking roster producer on a background thread; the engine polls
/// the receiver once per frame.
pub fn spawn_source<F>(producer: F) -> mpsc::Receiver<RosterResult>
where
    F: FnOnce() -> RosterResult + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(producer());
    });
    rx
}

/// Pick `count` distinct participants uniformly at random. Returns fewer
/// when the roster is smaller than `count`.
pub fn select_distinct(roster: &[Participant], count: usize, rng: &mut impl Rng) -> Vec<Participant> {
    let mut taken = std::collections::HashSet::new();
    let mut selected = Vec::new();
    while selected.len() < count && taken.len() < roster.len() {
        let idx = rng.gen_range(0..roster.len());
        if taken.insert(idx) {
            selected.push(roster[idx].clone());
        }
    }
    selected
}

/// Demo roster for hosts without a real data source.
pub fn demo_roster(count: usize, rng: &mut impl Rng) -> Vec<Participant> {
    (0..count)
        .map(|i| {
            let id = format!("u{:05}", 10000 + i);
            Participant {
                display_name: format!("User_{}", rng.gen_range(1000..10000)),
                avatar_ref: format!("https://i.pravatar.cc/150?u={id}"),
                id,
            }
        })
        .collect()
}
