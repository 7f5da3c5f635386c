//! Sprite animation playback state machine.
//!
//! The [`Animator`] component owns the playback position for one sprite and
//! applies the timing and override rules every tick. It reads clip data from
//! a shared [`AnimationCatalog`], writes the selected frame to a
//! [`VisualSink`], and notifies registered
//! [`AnimationListener`](crate::events::animation::AnimationListener)s when
//! a clip starts or ends.
//!
//! # Playback Flow
//!
//! 1. Wiring code seals an [`AnimationCatalog`] and constructs the animator
//!    with it, registering listeners before activation
//! 2. [`Animator::activate`] runs once when the player goes live and starts
//!    the fallback clip unless a play request already happened
//! 3. The tick loop calls [`Animator::advance`] with the frame delta;
//!    drivers call [`Animator::play_by_name`] or
//!    [`Animator::play_by_index`] whenever they want a different clip
//! 4. A non-looping clip falls back to clip 0 when it completes
//!
//! # Override Rules
//!
//! A clip marked `unstoppable` refuses routine play requests until it
//! completes or a forced request replaces it; the engine's own end
//! transition always forces. A frame-rate override substitutes the nominal
//! clip rate until cleared or until the clip naturally ends.
//!
//! # Related
//!
//! - [`crate::resources::catalog`] – clip definitions
//! - [`crate::systems::animation`] – per-tick ECS driver
//! - [`crate::events::animation`] – listener protocol

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::{debug, error};

use crate::components::sprite::VisualSink;
use crate::events::animation::AnimationListener;
use crate::resources::catalog::{AnimationCatalog, AnimationClip};

/// Tag value reported while the current frame carries no frame tag.
pub const NO_TAG: &str = "none";

/// How hard a named play request pushes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayForce {
    /// Routine request; refused while the current clip is unstoppable.
    None,
    /// Bypass the unstoppable guard. Re-triggering the clip that is already
    /// playing stays suppressed.
    Hard,
}

/// Rejected play request.
///
/// Covers bad identifiers only; policy refusals (unstoppable clip, redundant
/// re-trigger) are routine no-ops, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// The requested clip index is outside the catalog.
    InvalidAnimationId(usize),
    /// No clip in the catalog carries the requested name.
    AnimationNotFound(String),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::InvalidAnimationId(index) => write!(f, "invalid animation id: {}", index),
            PlayError::AnimationNotFound(name) => write!(f, "animation '{}' not found", name),
        }
    }
}

impl std::error::Error for PlayError {}

/// Playback state machine for one animated sprite.
///
/// All mutating operations take the visual sink as an explicit collaborator;
/// the animator never renders, it only decides which frame of which clip is
/// current and pushes that decision out.
#[derive(Component)]
pub struct Animator {
    catalog: Arc<AnimationCatalog>,
    clip_index: usize,
    frame: usize,
    frame_timer: f32,
    rate_override: Option<f32>,
    manually_set: bool,
    activated: bool,
    current_tag: String,
    listeners: Vec<Box<dyn AnimationListener>>,
}

impl Animator {
    /// Create a player over a sealed catalog, parked on the fallback clip.
    pub fn new(catalog: Arc<AnimationCatalog>) -> Self {
        Self {
            catalog,
            clip_index: 0,
            frame: 0,
            frame_timer: 0.0,
            rate_override: None,
            manually_set: false,
            activated: false,
            current_tag: NO_TAG.to_owned(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Notification order follows registration order.
    pub fn add_listener(&mut self, listener: Box<dyn AnimationListener>) {
        self.listeners.push(listener);
    }

    /// Builder form of [`Animator::add_listener`].
    pub fn with_listener(mut self, listener: Box<dyn AnimationListener>) -> Self {
        self.add_listener(listener);
        self
    }

    /// Mark the player live. Idempotent.
    ///
    /// If no explicit play request has been issued yet, starts the fallback
    /// clip with force semantics: there is no current clip to protect, so
    /// the unstoppable and already-playing guards do not apply.
    pub fn activate(&mut self, sink: &mut dyn VisualSink) {
        if self.activated {
            return;
        }
        self.activated = true;
        if !self.manually_set {
            debug!("starting with clip '{}'", self.current_name());
            let _ = self.play_by_index(0, true, sink);
        }
    }

    /// Per-tick timing update.
    ///
    /// Accumulates `delta` and performs at most one frame step per call: the
    /// accumulator resets to zero when it crosses the frame duration instead
    /// of subtracting, so a large delta never skips frames. A non-looping
    /// clip on its last frame ends instead of stepping: listeners are
    /// notified, the rate override is dropped, and the fallback clip is
    /// force-played.
    pub fn advance(&mut self, delta: f32, sink: &mut dyn VisualSink) {
        self.frame_timer += delta;

        let (frame_count, nominal_rate, looped) = {
            let clip = self.current_clip();
            (clip.frames.len(), clip.frame_rate, clip.looped)
        };
        let rate = match self.rate_override {
            Some(r) if r > 0.0 => r,
            _ => nominal_rate,
        };
        let frame_duration = 1.0 / rate;
        if self.frame_timer < frame_duration {
            return;
        }
        self.frame_timer = 0.0;

        let on_last_frame = self.frame + 1 >= frame_count;
        if on_last_frame && !looped {
            let ended = self.current_clip().name.clone();
            self.notify_end(&ended);
            self.rate_override = None;
            debug!("clip '{}' completed, switching to fallback", ended);
            let _ = self.play_by_index(0, true, sink);
        } else {
            let next = (self.frame + 1) % frame_count;
            let frame_ref = self.current_clip().frames[next].clone();
            self.frame = next;
            sink.set_current_frame(&frame_ref);
            self.refresh_tag();
        }
    }

    /// Request the clip at `index`.
    ///
    /// Refused silently while the current clip is unstoppable and `force` is
    /// false. An out-of-range index is reported and leaves state unchanged.
    /// Requesting the already-current index without force is a no-op;
    /// otherwise the switch resets the frame position and timer, pushes
    /// frame 0 to the sink, and notifies listeners that the clip started.
    pub fn play_by_index(
        &mut self,
        index: usize,
        force: bool,
        sink: &mut dyn VisualSink,
    ) -> Result<(), PlayError> {
        self.manually_set = true;

        if self.current_clip().unstoppable && !force {
            debug!(
                "clip '{}' is unstoppable, ignoring play request for id {}",
                self.current_name(),
                index
            );
            return Ok(());
        }

        let (first_frame, name) = match self.catalog.clips().get(index) {
            Some(clip) => (clip.frames[0].clone(), clip.name.clone()),
            None => {
                error!("invalid animation id: {}", index);
                return Err(PlayError::InvalidAnimationId(index));
            }
        };

        if index != self.clip_index || force {
            self.clip_index = index;
            self.frame = 0;
            self.frame_timer = 0.0;
            sink.set_current_frame(&first_frame);
            self.refresh_tag();
            self.notify_start(&name);
            debug!("playing clip '{}' (id {})", name, index);
        }
        Ok(())
    }

    /// Request the first clip named `name`.
    ///
    /// Same unstoppable guard as [`Animator::play_by_index`], bypassed by
    /// [`PlayForce::Hard`]. A Hard request for the clip that is already
    /// playing is suppressed; Hard only has force semantics for a different
    /// clip. An unknown name is reported and leaves state unchanged.
    pub fn play_by_name(
        &mut self,
        name: &str,
        force: PlayForce,
        sink: &mut dyn VisualSink,
    ) -> Result<(), PlayError> {
        if self.current_clip().unstoppable && force == PlayForce::None {
            debug!(
                "clip '{}' is unstoppable, ignoring play request for '{}'",
                self.current_name(),
                name
            );
            return Ok(());
        }

        if self.current_name() == name && force == PlayForce::Hard {
            debug!("already playing clip '{}'", name);
            return Ok(());
        }

        match self.catalog.index_of(name) {
            Some(index) => self.play_by_index(index, force == PlayForce::Hard, sink),
            None => {
                error!("animation '{}' not found", name);
                Err(PlayError::AnimationNotFound(name.to_owned()))
            }
        }
    }

    /// Temporarily substitute the playback rate.
    ///
    /// Never mutates the clip's stored nominal rate. Non-positive values are
    /// ignored at use. The override persists across frame steps and clip
    /// switches until cleared or until a non-looping clip completes.
    pub fn set_frame_rate_override(&mut self, rate: f32) {
        self.rate_override = Some(rate);
    }

    /// Drop the rate override; the next step uses the clip's nominal rate.
    pub fn clear_frame_rate_override(&mut self) {
        self.rate_override = None;
    }

    /// Park on the fallback clip without playing it: the sink is cleared and
    /// the tag reset, and no notifications fire. The frame position and
    /// timer keep their values; the modulo step in [`Animator::advance`]
    /// keeps a stale position safe against a shorter fallback clip.
    pub fn stop(&mut self, sink: &mut dyn VisualSink) {
        self.clip_index = 0;
        sink.clear();
        self.current_tag = NO_TAG.to_owned();
        debug!("animation stopped");
    }

    pub fn current_index(&self) -> usize {
        self.clip_index
    }

    pub fn current_name(&self) -> &str {
        &self.current_clip().name
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    /// Tag of the current frame, or [`NO_TAG`].
    pub fn current_tag(&self) -> &str {
        &self.current_tag
    }

    pub fn frame_rate_override(&self) -> Option<f32> {
        self.rate_override
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn catalog(&self) -> &AnimationCatalog {
        &self.catalog
    }

    /// Clip with the given name, cloned out of the catalog, or the empty
    /// default clip when absent.
    pub fn find_clip(&self, name: &str) -> AnimationClip {
        self.catalog
            .find_by_name(name)
            .cloned()
            .unwrap_or_default()
    }

    fn current_clip(&self) -> &AnimationClip {
        // clip_index is only ever assigned after a range check
        &self.catalog.clips()[self.clip_index]
    }

    fn refresh_tag(&mut self) {
        let tag = self.current_clip().tag_at(self.frame).map(str::to_owned);
        self.current_tag = tag.unwrap_or_else(|| NO_TAG.to_owned());
    }

    fn notify_start(&mut self, name: &str) {
        for listener in self.listeners.iter_mut() {
            listener.on_animation_start(name);
        }
    }

    fn notify_end(&mut self, name: &str) {
        for listener in self.listeners.iter_mut() {
            listener.on_animation_end(name);
        }
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("clip_index", &self.clip_index)
            .field("frame", &self.frame)
            .field("frame_timer", &self.frame_timer)
            .field("rate_override", &self.rate_override)
            .field("manually_set", &self.manually_set)
            .field("activated", &self.activated)
            .field("current_tag", &self.current_tag)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
