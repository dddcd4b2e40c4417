//! Error types for keyframes, clips, controllers and library loading

use armature_pose::PoseError;

use crate::ids::{ClipPoolId, KeyframePoolId};

/// Error type for animation operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnimationError {
    /// Keyframe or clip duration that is zero, negative or not finite
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: f32 },

    /// Clip range whose first keyframe comes after its last
    #[error("Inverted keyframe range: first {first} > last {last}")]
    InvertedKeyframeRange { first: usize, last: usize },

    #[error("Keyframe {index} out of range (pool has {count})")]
    KeyframeOutOfRange { index: usize, count: usize },

    #[error("Clip {index} out of range (pool has {count})")]
    ClipOutOfRange { index: usize, count: usize },

    #[error("Keyframe pool not found: {id:?}")]
    UnknownKeyframePool { id: KeyframePoolId },

    #[error("Clip pool not found: {id:?}")]
    UnknownClipPool { id: ClipPoolId },

    /// Lookup by name failed (clip, keyframe pool or clip pool)
    #[error("{kind} not found: {name}")]
    UnknownName { kind: &'static str, name: String },

    /// Two pools (or two clips in one pool) share a name in a loaded description
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Invalid time step: {dt}")]
    InvalidTimeStep { dt: f32 },

    #[error("Update crossed more than {limit} boundaries")]
    TooManyBoundaryCrossings { limit: usize },

    /// A keyframe's sample does not address a pose in the group being sampled
    #[error("Sample {sample} out of range (pose group has {count} poses)")]
    SampleOutOfRange { sample: u32, count: usize },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    #[error(transparent)]
    Pose(#[from] PoseError),
}

impl AnimationError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. }
            | Self::InvertedKeyframeRange { .. }
            | Self::DuplicateName { .. } => "validation",
            Self::KeyframeOutOfRange { .. }
            | Self::ClipOutOfRange { .. }
            | Self::SampleOutOfRange { .. } => "index",
            Self::UnknownKeyframePool { .. }
            | Self::UnknownClipPool { .. }
            | Self::UnknownName { .. } => "lookup",
            Self::InvalidTimeStep { .. } | Self::TooManyBoundaryCrossings { .. } => "playback",
            Self::Serialization { .. } => "serialization",
            Self::Pose(err) => err.category(),
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnimationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            AnimationError::InvalidDuration { duration: 0.0 }.category(),
            "validation"
        );
        assert_eq!(AnimationError::InvalidTimeStep { dt: -1.0 }.category(), "playback");
        assert_eq!(
            AnimationError::from(PoseError::EmptyPoseGroup).category(),
            "allocation"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let converted: AnimationError = err.into();
        assert_eq!(converted.category(), "serialization");
    }
}
