//! armature-animation-core: keyframe pools, clips and clip controllers.
//!
//! Content lives in an [`AnimationLibrary`]: keyframe pools hold timed samples, clip pools
//! hold named keyframe ranges with per-direction transitions. A [`ClipController`] is the
//! per-instance playhead; `update(dt)` walks keyframes, fires transitions at clip
//! boundaries and exposes the normalized keyframe and clip parameters that
//! [`sample_clip_pose`] turns into a hierarchy pose.

pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod keyframe;
pub mod library;
pub mod sampling;
pub mod stored_library;

pub use clip::{Clip, ClipPool, ClipTransition};
pub use config::Config;
pub use controller::{ClipController, ControllerEvent, PlaybackState};
pub use error::{AnimationError, Result};
pub use ids::{ClipPoolId, IdAllocator, KeyframePoolId};
pub use keyframe::{Keyframe, KeyframePool};
pub use library::AnimationLibrary;
pub use sampling::{sample_clip_pose, SampleMode};
pub use stored_library::parse_clip_library_json;
