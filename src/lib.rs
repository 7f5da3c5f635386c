//! Spritecycle library.
//!
//! A frame-based sprite animation engine: catalogs of named clips, a
//! playback state machine with unstoppable/forced-restart rules, temporary
//! frame-rate overrides, frame tags, and a start/end listener protocol.
//! Exposed for integration tests and as a reusable library.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
