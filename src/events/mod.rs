//! Notification protocol used by the engine.
//!
//! This module groups the listener traits and listener implementations that
//! animators notify on clip transitions. Listeners provide a decoupled way
//! for hosts to react to playback without polling animator state.
//!
//! Submodules:
//! - [`animation`] – start/end listener protocol, channel and log listeners

pub mod animation;
