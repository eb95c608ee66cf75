pub mod anim;
pub mod avatar;
pub mod config;
pub mod engine;
pub mod roster;
pub mod scene;
pub mod swap;
pub mod texture;

pub use config::{VisualConfig, VisualConfigPatch};
pub use engine::{LotteryEngine, Phase};
pub use roster::Participant;
