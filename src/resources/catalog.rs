//! Animation clip catalog.
//!
//! This module provides an immutable, ordered store of animation clip
//! definitions that can be shared by multiple animators. Clips are addressed
//! by index or looked up by name; index 0 is the implicit fallback clip that
//! playback returns to when a non-looping clip completes.
//!
//! Catalogs are validated once at construction. An empty catalog, a clip
//! without frames, or a non-positive frame rate is a configuration error and
//! refuses to build rather than producing a store that indexes out of range
//! later.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::info;
use serde::{Deserialize, Serialize};

/// A reference to one drawable frame: a texture key plus a cell inside that
/// texture's sheet.
///
/// The engine never interprets the contents; it only selects which reference
/// is current and forwards it to the visual sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRef {
    /// Texture key resolved by whatever renders the sprite.
    pub tex_key: Arc<str>,
    /// Cell index within the texture's sheet.
    pub cell: u32,
}

impl FrameRef {
    pub fn new(tex_key: impl Into<Arc<str>>, cell: u32) -> Self {
        Self {
            tex_key: tex_key.into(),
            cell,
        }
    }
}

/// A label attached to one frame index of a clip.
///
/// At most one tag is active at a given frame; on duplicate indices the
/// first entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTag {
    /// Zero-based frame index within the owning clip.
    pub index: usize,
    /// Label reported while that frame is current.
    pub tag: String,
}

/// Immutable definition of one named animation.
///
/// `Default` produces the empty clip (no name, no frames) used as the
/// absent-value result of [`Animator::find_clip`](crate::components::animator::Animator::find_clip);
/// an empty clip never passes catalog validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Unique-by-convention name; lookups take the first match.
    pub name: String,
    /// Ordered frame sequence. Never empty in a sealed catalog.
    pub frames: Vec<FrameRef>,
    /// Frame labels, matched exactly against the current frame index.
    #[serde(default)]
    pub frame_tags: Vec<FrameTag>,
    /// Nominal playback rate in frames per second.
    pub frame_rate: f32,
    /// Restart from frame 0 after the last frame instead of completing.
    #[serde(default)]
    pub looped: bool,
    /// Refuse non-forced play requests while this clip is current.
    #[serde(default)]
    pub unstoppable: bool,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frames: Vec<FrameRef>, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_tags: Vec::new(),
            frame_rate,
            looped: false,
            unstoppable: false,
        }
    }

    pub fn with_loop(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn with_unstoppable(mut self) -> Self {
        self.unstoppable = true;
        self
    }

    pub fn with_tag(mut self, index: usize, tag: impl Into<String>) -> Self {
        self.frame_tags.push(FrameTag {
            index,
            tag: tag.into(),
        });
        self
    }

    /// First tag whose index equals `frame`, if any.
    pub fn tag_at(&self, frame: usize) -> Option<&str> {
        self.frame_tags
            .iter()
            .find(|t| t.index == frame)
            .map(|t| t.tag.as_str())
    }
}

/// Catalog construction and lookup failures.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog was given no clips.
    Empty,
    /// A clip has an empty name.
    UnnamedClip { index: usize },
    /// A clip has no frames.
    NoFrames { name: String },
    /// A clip's nominal frame rate is not a positive finite number.
    BadFrameRate { name: String, rate: f32 },
    /// An index lookup fell outside `0..len`.
    OutOfRange { index: usize, len: usize },
    /// The catalog document could not be parsed.
    Parse(serde_json::Error),
    /// The catalog file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "animation catalog has no clips"),
            CatalogError::UnnamedClip { index } => {
                write!(f, "clip at index {} has an empty name", index)
            }
            CatalogError::NoFrames { name } => write!(f, "clip '{}' has no frames", name),
            CatalogError::BadFrameRate { name, rate } => {
                write!(f, "clip '{}' has invalid frame rate {}", name, rate)
            }
            CatalogError::OutOfRange { index, len } => {
                write!(f, "clip index {} out of range (catalog holds {})", index, len)
            }
            CatalogError::Parse(e) => write!(f, "failed to parse catalog document: {}", e),
            CatalogError::Io(e) => write!(f, "failed to read catalog file: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            CatalogError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Ordered, immutable registry of animation clips.
///
/// Shared read-only between animators, either as an ECS resource or behind an
/// `Arc`. No mutation operations exist once sealed.
#[derive(Resource, Debug, Clone)]
pub struct AnimationCatalog {
    clips: Vec<AnimationClip>,
}

#[derive(Deserialize)]
struct CatalogDef {
    clips: Vec<AnimationClip>,
}

impl AnimationCatalog {
    /// Validate and seal a set of clips. Index 0 becomes the fallback clip.
    pub fn new(clips: Vec<AnimationClip>) -> Result<Self, CatalogError> {
        if clips.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, clip) in clips.iter().enumerate() {
            if clip.name.is_empty() {
                return Err(CatalogError::UnnamedClip { index });
            }
            if clip.frames.is_empty() {
                return Err(CatalogError::NoFrames {
                    name: clip.name.clone(),
                });
            }
            if !(clip.frame_rate.is_finite() && clip.frame_rate > 0.0) {
                return Err(CatalogError::BadFrameRate {
                    name: clip.name.clone(),
                    rate: clip.frame_rate,
                });
            }
        }
        Ok(Self { clips })
    }

    /// Parse and validate a `{ "clips": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let def: CatalogDef = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::new(def.clips)
    }

    /// Load and validate a catalog document from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(CatalogError::Io)?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            "Loaded catalog: {} clips from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Clip at `index`, or `OutOfRange`.
    pub fn get(&self, index: usize) -> Result<&AnimationClip, CatalogError> {
        self.clips.get(index).ok_or(CatalogError::OutOfRange {
            index,
            len: self.clips.len(),
        })
    }

    /// First clip with the given name, scanning in catalog order.
    pub fn find_by_name(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// Index of the first clip with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name == name)
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, frame_count: u32, frame_rate: f32) -> AnimationClip {
        let frames = (0..frame_count).map(|c| FrameRef::new("tex", c)).collect();
        AnimationClip::new(name, frames, frame_rate)
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = AnimationCatalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn unnamed_clip_is_rejected() {
        let err = AnimationCatalog::new(vec![clip("idle", 2, 4.0), clip("", 2, 4.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::UnnamedClip { index: 1 }));
    }

    #[test]
    fn zero_frame_clip_is_rejected() {
        let err = AnimationCatalog::new(vec![clip("idle", 0, 4.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::NoFrames { ref name } if name == "idle"));
    }

    #[test]
    fn non_positive_frame_rate_is_rejected() {
        let err = AnimationCatalog::new(vec![clip("idle", 2, 0.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::BadFrameRate { ref name, .. } if name == "idle"));

        let err = AnimationCatalog::new(vec![clip("idle", 2, f32::NAN)]).unwrap_err();
        assert!(matches!(err, CatalogError::BadFrameRate { .. }));
    }

    #[test]
    fn get_rejects_out_of_range_index() {
        let catalog = AnimationCatalog::new(vec![clip("idle", 2, 4.0)]).unwrap();
        assert_eq!(catalog.get(0).unwrap().name, "idle");
        let err = catalog.get(1).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn name_lookup_takes_first_match() {
        let first = clip("walk", 2, 4.0);
        let second = clip("walk", 6, 8.0);
        let catalog = AnimationCatalog::new(vec![clip("idle", 2, 4.0), first, second]).unwrap();

        assert_eq!(catalog.index_of("walk"), Some(1));
        assert_eq!(catalog.find_by_name("walk").unwrap().frames.len(), 2);
        assert_eq!(catalog.index_of("run"), None);
        assert!(catalog.find_by_name("run").is_none());
    }

    #[test]
    fn tag_lookup_takes_first_match_on_duplicates() {
        let clip = clip("attack", 4, 10.0)
            .with_tag(2, "hit")
            .with_tag(2, "late")
            .with_tag(3, "recover");
        assert_eq!(clip.tag_at(2), Some("hit"));
        assert_eq!(clip.tag_at(3), Some("recover"));
        assert_eq!(clip.tag_at(0), None);
    }

    #[test]
    fn catalog_document_parses_and_validates() {
        let doc = r#"{
            "clips": [
                {
                    "name": "Idle",
                    "frames": [
                        { "tex_key": "hero", "cell": 0 },
                        { "tex_key": "hero", "cell": 1 }
                    ],
                    "frame_rate": 2.0,
                    "looped": true
                },
                {
                    "name": "Attack",
                    "frames": [
                        { "tex_key": "hero", "cell": 16 },
                        { "tex_key": "hero", "cell": 17 }
                    ],
                    "frame_tags": [ { "index": 1, "tag": "hit" } ],
                    "frame_rate": 10.0,
                    "unstoppable": true
                }
            ]
        }"#;

        let catalog = AnimationCatalog::from_json_str(doc).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().frames[1].cell, 1);
        assert!(catalog.get(1).unwrap().unstoppable);
        assert_eq!(catalog.get(1).unwrap().tag_at(1), Some("hit"));

        let err = AnimationCatalog::from_json_str("{ \"clips\": 3 }").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = AnimationCatalog::from_json_str("{ \"clips\": [] }").unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }
}
