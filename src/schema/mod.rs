//! Plain data: manifests, resolved scenes, stats, and per-turn snapshots.

pub mod manifest;
pub mod scene;
pub mod state;
pub mod stats;
