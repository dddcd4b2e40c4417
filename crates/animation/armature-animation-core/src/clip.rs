//! Clips: named, inclusive keyframe ranges with boundary transitions.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::ids::{ClipPoolId, KeyframePoolId};
use crate::keyframe::{check_duration, KeyframePool};

/// What a controller does when it runs off one end of a clip.
///
/// A clip whose transition slot is `None` loops in place. `clip` may be any index in
/// the target pool, including 0 and the clip that owns the transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipTransition {
    pub clip_pool: ClipPoolId,
    pub clip: usize,
    /// Playback rate applied to the controller when the transition fires. `None` keeps
    /// the controller's current rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<f32>,
}

impl ClipTransition {
    pub fn new(clip_pool: ClipPoolId, clip: usize) -> Self {
        Self {
            clip_pool,
            clip,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: f32) -> Self {
        self.direction = Some(direction);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Clip {
    name: String,
    index: usize,
    keyframe_pool: KeyframePoolId,
    first_keyframe: usize,
    last_keyframe: usize,
    duration: f32,
    duration_inverse: f32,
    forward_transition: Option<ClipTransition>,
    reverse_transition: Option<ClipTransition>,
}

impl Clip {
    /// A clip over keyframes `first..=last` of `keyframe_pool`. Its duration is zero until
    /// [`compute_duration_from_keyframes`](Self::compute_duration_from_keyframes) or
    /// [`distribute_duration_to_keyframes`](Self::distribute_duration_to_keyframes) runs.
    pub fn new(
        name: impl Into<String>,
        keyframe_pool: KeyframePoolId,
        first_keyframe: usize,
        last_keyframe: usize,
    ) -> Result<Self> {
        if first_keyframe > last_keyframe {
            return Err(AnimationError::InvertedKeyframeRange {
                first: first_keyframe,
                last: last_keyframe,
            });
        }
        Ok(Self {
            name: name.into(),
            index: 0,
            keyframe_pool,
            first_keyframe,
            last_keyframe,
            duration: 0.0,
            duration_inverse: 0.0,
            forward_transition: None,
            reverse_transition: None,
        })
    }

    pub fn with_forward_transition(mut self, transition: ClipTransition) -> Self {
        self.forward_transition = Some(transition);
        self
    }

    pub fn with_reverse_transition(mut self, transition: ClipTransition) -> Self {
        self.reverse_transition = Some(transition);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the clip in its pool, assigned by [`ClipPool::push`].
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn keyframe_pool(&self) -> KeyframePoolId {
        self.keyframe_pool
    }

    #[inline]
    pub fn first_keyframe(&self) -> usize {
        self.first_keyframe
    }

    #[inline]
    pub fn last_keyframe(&self) -> usize {
        self.last_keyframe
    }

    #[inline]
    pub fn keyframe_count(&self) -> usize {
        self.last_keyframe - self.first_keyframe + 1
    }

    #[inline]
    pub fn contains_keyframe(&self, index: usize) -> bool {
        (self.first_keyframe..=self.last_keyframe).contains(&index)
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn duration_inverse(&self) -> f32 {
        self.duration_inverse
    }

    #[inline]
    pub fn forward_transition(&self) -> Option<&ClipTransition> {
        self.forward_transition.as_ref()
    }

    #[inline]
    pub fn reverse_transition(&self) -> Option<&ClipTransition> {
        self.reverse_transition.as_ref()
    }

    pub fn set_forward_transition(&mut self, transition: Option<ClipTransition>) {
        self.forward_transition = transition;
    }

    pub fn set_reverse_transition(&mut self, transition: Option<ClipTransition>) {
        self.reverse_transition = transition;
    }

    fn check_range(&self, pool: &KeyframePool) -> Result<()> {
        if self.first_keyframe > self.last_keyframe {
            return Err(AnimationError::InvertedKeyframeRange {
                first: self.first_keyframe,
                last: self.last_keyframe,
            });
        }
        if self.last_keyframe >= pool.len() {
            return Err(AnimationError::KeyframeOutOfRange {
                index: self.last_keyframe,
                count: pool.len(),
            });
        }
        Ok(())
    }

    /// Set the clip duration to the sum of its keyframes' durations and return it.
    pub fn compute_duration_from_keyframes(&mut self, pool: &KeyframePool) -> Result<f32> {
        self.check_range(pool)?;
        let total: f32 = pool.as_slice()[self.first_keyframe..=self.last_keyframe]
            .iter()
            .map(|k| k.duration())
            .sum();
        self.duration = check_duration(total)?;
        self.duration_inverse = total.recip();
        Ok(total)
    }

    /// Set the clip duration to `total` and split it evenly over the clip's keyframes.
    pub fn distribute_duration_to_keyframes(
        &mut self,
        pool: &mut KeyframePool,
        total: f32,
    ) -> Result<()> {
        let total = check_duration(total)?;
        self.check_range(pool)?;
        let each = check_duration(total / self.keyframe_count() as f32)?;
        for keyframe in &mut pool.as_mut_slice()[self.first_keyframe..=self.last_keyframe] {
            keyframe.set_duration(each)?;
        }
        self.duration = total;
        self.duration_inverse = total.recip();
        Ok(())
    }
}

/// Ordered clips sharing one namespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClipPool {
    name: String,
    clips: Vec<Clip>,
}

impl ClipPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clips: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a clip, assigning its pool index, and return that index.
    pub fn push(&mut self, mut clip: Clip) -> usize {
        let index = self.clips.len();
        clip.index = index;
        self.clips.push(clip);
        index
    }

    pub fn get(&self, index: usize) -> Result<&Clip> {
        let count = self.clips.len();
        self.clips
            .get(index)
            .ok_or(AnimationError::ClipOutOfRange { index, count })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Clip> {
        let count = self.clips.len();
        self.clips
            .get_mut(index)
            .ok_or(AnimationError::ClipOutOfRange { index, count })
    }

    /// Index of the first clip called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Clip> {
        self.clips.iter_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clip> {
        self.clips.iter()
    }
}
