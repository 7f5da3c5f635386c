use bevy_ecs::prelude::Component;

use crate::resources::catalog::FrameRef;

/// Receives frame selections from an [`Animator`](crate::components::animator::Animator).
///
/// The animator only decides *which* frame is current; the host's renderer
/// interprets the [`FrameRef`] it finds in the sink. `clear` displays
/// nothing, the state [`Animator::stop`](crate::components::animator::Animator::stop)
/// leaves behind.
pub trait VisualSink {
    fn set_current_frame(&mut self, frame: &FrameRef);
    fn clear(&mut self);
}

/// Sprite holds the frame reference currently selected for an entity, or
/// `None` after the animator has been stopped.
#[derive(Component, Clone, Debug, Default)]
pub struct Sprite {
    pub current: Option<FrameRef>,
}

impl VisualSink for Sprite {
    fn set_current_frame(&mut self, frame: &FrameRef) {
        self.current = Some(frame.clone());
    }

    fn clear(&mut self) {
        self.current = None;
    }
}
