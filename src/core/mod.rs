//! Behaviour: content resolution, caching, configuration, and the engine.

pub mod cache;
pub mod config;
pub mod engine;
pub mod resolver;
