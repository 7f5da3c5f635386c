//! Animation lifecycle notifications.
//!
//! This module defines the listener protocol animators notify through, plus
//! the listener implementations shipped with the crate. Wiring code owns the
//! listener list: it registers listeners on an animator explicitly before
//! activation, and the animator invokes them synchronously, in registration
//! order, whenever a clip starts or a non-looping clip completes.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::info;

/// Observer of animation lifecycle transitions.
///
/// Both methods default to no-ops so a listener only implements the
/// callbacks it cares about. Callbacks run inside the animator operation
/// that caused the transition, before any further state mutation of that
/// operation.
pub trait AnimationListener: Send + Sync {
    /// A clip began playing.
    fn on_animation_start(&mut self, _name: &str) {}
    /// A non-looping clip reached its last frame.
    fn on_animation_end(&mut self, _name: &str) {}
}

/// Notifications forwarded out of band by [`ChannelListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationMessage {
    Started { name: String },
    Ended { name: String },
}

/// Listener that forwards notifications over a channel.
///
/// Lets a host drain start/end notifications outside the animator's tick. A
/// dropped receiver is tolerated; sends simply go nowhere.
pub struct ChannelListener {
    tx: Sender<AnimationMessage>,
}

impl ChannelListener {
    /// Create the listener together with its receiving half.
    pub fn new() -> (Self, Receiver<AnimationMessage>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl AnimationListener for ChannelListener {
    fn on_animation_start(&mut self, name: &str) {
        let _ = self.tx.send(AnimationMessage::Started {
            name: name.to_owned(),
        });
    }

    fn on_animation_end(&mut self, name: &str) {
        let _ = self.tx.send(AnimationMessage::Ended {
            name: name.to_owned(),
        });
    }
}

/// Listener that reports transitions on the log.
#[derive(Default)]
pub struct LogListener;

impl AnimationListener for LogListener {
    fn on_animation_start(&mut self, name: &str) {
        info!("animation '{}' started", name);
    }

    fn on_animation_end(&mut self, name: &str) {
        info!("animation '{}' ended", name);
    }
}
