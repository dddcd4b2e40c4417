//! Pose sampling: turn a controller's playhead into a hierarchy pose.
//!
//! Model:
//! - Each keyframe's `sample` is the index of a pose in a [`PoseGroup`].
//! - The controller sits in keyframe `k` at normalized `keyframe_param`; the blend runs from
//!   `k` toward its successor in the clip, which wraps from the last keyframe to the first.
//! - Cubic sampling also reads the predecessor and the second successor, wrapping the same way.

use armature_pose::{HierarchyPose, HierarchyPoseMut, PoseGroup};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::controller::ClipController;
use crate::error::{AnimationError, Result};
use crate::keyframe::KeyframePool;
use crate::library::AnimationLibrary;

/// Interpolation used between neighbouring keyframes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Hold the current keyframe.
    Step,
    Nearest,
    #[default]
    Linear,
    Smoothstep,
    Cubic,
}

#[inline]
fn next_in_clip(clip: &Clip, keyframe: usize) -> usize {
    if keyframe >= clip.last_keyframe() {
        clip.first_keyframe()
    } else {
        keyframe + 1
    }
}

#[inline]
fn prev_in_clip(clip: &Clip, keyframe: usize) -> usize {
    if keyframe <= clip.first_keyframe() {
        clip.last_keyframe()
    } else {
        keyframe - 1
    }
}

fn sample_pose<'g>(
    keyframes: &KeyframePool,
    group: &'g PoseGroup,
    keyframe: usize,
) -> Result<HierarchyPose<'g>> {
    let sample = keyframes.get(keyframe)?.sample();
    group
        .pose(sample as usize)
        .map_err(|_| AnimationError::SampleOutOfRange {
            sample,
            count: group.pose_count(),
        })
}

/// Write the pose at `controller`'s playhead into `out`.
///
/// `out` must have the group's node count; a mismatch panics like any other hierarchy
/// operator.
pub fn sample_clip_pose(
    library: &AnimationLibrary,
    controller: &ClipController,
    group: &PoseGroup,
    mode: SampleMode,
    out: &mut HierarchyPoseMut<'_>,
) -> Result<()> {
    let clip = library.clip(controller.clip_pool(), controller.clip())?;
    let keyframes = library.keyframe_pool(clip.keyframe_pool())?;
    let k0 = controller.keyframe();
    let k1 = next_in_clip(clip, k0);
    let u = controller.keyframe_param().clamp(0.0, 1.0);

    let p0 = sample_pose(keyframes, group, k0)?;
    match mode {
        SampleMode::Step => {
            out.copy_from(p0);
        }
        SampleMode::Nearest => {
            out.nearest(p0, sample_pose(keyframes, group, k1)?, u);
        }
        SampleMode::Linear => {
            out.lerp(p0, sample_pose(keyframes, group, k1)?, u);
        }
        SampleMode::Smoothstep => {
            out.smoothstep(p0, sample_pose(keyframes, group, k1)?, u);
        }
        SampleMode::Cubic => {
            let pn1 = sample_pose(keyframes, group, prev_in_clip(clip, k0))?;
            let p1 = sample_pose(keyframes, group, k1)?;
            let p2 = sample_pose(keyframes, group, next_in_clip(clip, k1))?;
            out.cubic(pn1, p0, p1, p2, u);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::KeyframePoolId;

    #[test]
    fn neighbours_wrap_within_clip() {
        let clip = Clip::new("c", KeyframePoolId(0), 2, 4).unwrap();
        assert_eq!(next_in_clip(&clip, 2), 3);
        assert_eq!(next_in_clip(&clip, 4), 2);
        assert_eq!(prev_in_clip(&clip, 2), 4);
        assert_eq!(prev_in_clip(&clip, 3), 2);
    }

    #[test]
    fn single_keyframe_clip_neighbours_itself() {
        let clip = Clip::new("c", KeyframePoolId(0), 1, 1).unwrap();
        assert_eq!(next_in_clip(&clip, 1), 1);
        assert_eq!(prev_in_clip(&clip, 1), 1);
    }
}
