//! Timed samples and the pools that own them.

use serde::Serialize;

use crate::error::{AnimationError, Result};

pub(crate) fn check_duration(duration: f32) -> Result<f32> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(AnimationError::InvalidDuration { duration })
    }
}

/// One timed sample. `sample` is the index of a pose in the pose group that the
/// owning library is paired with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Keyframe {
    index: usize,
    duration: f32,
    duration_inverse: f32,
    sample: u32,
}

impl Keyframe {
    /// Build keyframe `index`; the duration must be positive and finite.
    pub fn new(index: usize, duration: f32, sample: u32) -> Result<Self> {
        let duration = check_duration(duration)?;
        Ok(Self {
            index,
            duration,
            duration_inverse: duration.recip(),
            sample,
        })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
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
    pub fn sample(&self) -> u32 {
        self.sample
    }

    pub fn set_duration(&mut self, duration: f32) -> Result<()> {
        self.duration = check_duration(duration)?;
        self.duration_inverse = duration.recip();
        Ok(())
    }

    #[inline]
    pub fn set_sample(&mut self, sample: u32) {
        self.sample = sample;
    }
}

/// Ordered keyframes; a keyframe's index never changes once pushed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KeyframePool {
    name: String,
    keyframes: Vec<Keyframe>,
}

impl KeyframePool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a keyframe and return its index.
    pub fn push(&mut self, duration: f32, sample: u32) -> Result<usize> {
        let index = self.keyframes.len();
        self.keyframes.push(Keyframe::new(index, duration, sample)?);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Result<&Keyframe> {
        let count = self.keyframes.len();
        self.keyframes
            .get(index)
            .ok_or(AnimationError::KeyframeOutOfRange { index, count })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Keyframe> {
        let count = self.keyframes.len();
        self.keyframes
            .get_mut(index)
            .ok_or(AnimationError::KeyframeOutOfRange { index, count })
    }

    pub fn set_duration(&mut self, index: usize, duration: f32) -> Result<()> {
        self.get_mut(index)?.set_duration(duration)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.keyframes.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Keyframe] {
        &mut self.keyframes
    }
}
