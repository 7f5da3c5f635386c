//! Animation system.
//!
//! [`animation`] drives every `(Animator, Sprite)` pair from the shared
//! clock: animators are activated lazily on their first tick, then advanced
//! by the scaled delta, writing frame selections into their [`Sprite`].
//!
//! # Animation Flow
//!
//! 1. Clip data is sealed in an [`AnimationCatalog`](crate::resources::catalog::AnimationCatalog)
//! 2. Entities carry an [`Animator`](crate::components::animator::Animator)
//!    over that catalog plus a [`Sprite`] sink
//! 3. This system activates and advances each animator every tick
//! 4. Drivers switch clips by calling
//!    [`play_by_name`](crate::components::animator::Animator::play_by_name)
//!    through their own queries
//!
//! # Related
//!
//! - [`crate::components::animator`] – per-entity playback state
//! - [`crate::resources::worldtime`] – shared clock

use bevy_ecs::prelude::*;

use crate::components::animator::Animator;
use crate::components::sprite::Sprite;
use crate::resources::worldtime::WorldTime;

/// Activate and advance animators, updating sprite frames.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Activates animators that have not gone live yet.
/// - Mutates [`Animator`] playback state and the paired [`Sprite`] sink.
pub fn animation(mut query: Query<(&mut Animator, &mut Sprite)>, time: Res<WorldTime>) {
    for (mut animator, mut sprite) in query.iter_mut() {
        if !animator.is_activated() {
            animator.activate(&mut *sprite);
        }
        animator.advance(time.delta, &mut *sprite);
    }
}
