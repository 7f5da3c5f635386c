//! ECS components for animated entities.
//!
//! This module groups the component types attached to entities that play
//! sprite animations.
//!
//! Submodules overview:
//! - [`animator`] – playback state machine for sprite animations
//! - [`sprite`] – current frame selection and the visual sink seam

pub mod animator;
pub mod sprite;
