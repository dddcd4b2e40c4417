//! Library: ownership of keyframe pools and clip pools, addressed by id.
//!
//! Methods:
//! - add_keyframe_pool / add_clip_pool, lookups by id, clip / keyframe shortcuts
//! - find_clip (by name), compute_clip_duration, distribute_clip_duration, validate

use log::debug;

use crate::clip::{Clip, ClipPool, ClipTransition};
use crate::error::{AnimationError, Result};
use crate::ids::{ClipPoolId, IdAllocator, KeyframePoolId};
use crate::keyframe::{Keyframe, KeyframePool};

/// Content-side storage read by controllers and sampling.
#[derive(Clone, Debug, Default)]
pub struct AnimationLibrary {
    ids: IdAllocator,
    keyframe_pools: Vec<(KeyframePoolId, KeyframePool)>,
    clip_pools: Vec<(ClipPoolId, ClipPool)>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_keyframe_pool(&mut self, pool: KeyframePool) -> KeyframePoolId {
        let id = self.ids.alloc_keyframe_pool();
        debug!(
            "library: keyframe pool {:?} '{}' ({} keyframes)",
            id,
            pool.name(),
            pool.len()
        );
        self.keyframe_pools.push((id, pool));
        id
    }

    /// Add a clip pool. Clip durations and transitions are not checked until
    /// [`validate`](Self::validate).
    pub fn add_clip_pool(&mut self, pool: ClipPool) -> ClipPoolId {
        let id = self.ids.alloc_clip_pool();
        debug!(
            "library: clip pool {:?} '{}' ({} clips)",
            id,
            pool.name(),
            pool.len()
        );
        self.clip_pools.push((id, pool));
        id
    }

    pub fn keyframe_pool(&self, id: KeyframePoolId) -> Result<&KeyframePool> {
        self.keyframe_pools
            .iter()
            .find_map(|(k, p)| if *k == id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownKeyframePool { id })
    }

    pub fn keyframe_pool_mut(&mut self, id: KeyframePoolId) -> Result<&mut KeyframePool> {
        self.keyframe_pools
            .iter_mut()
            .find_map(|(k, p)| if *k == id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownKeyframePool { id })
    }

    pub fn clip_pool(&self, id: ClipPoolId) -> Result<&ClipPool> {
        self.clip_pools
            .iter()
            .find_map(|(k, p)| if *k == id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownClipPool { id })
    }

    pub fn clip_pool_mut(&mut self, id: ClipPoolId) -> Result<&mut ClipPool> {
        self.clip_pools
            .iter_mut()
            .find_map(|(k, p)| if *k == id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownClipPool { id })
    }

    pub fn keyframe_pools(&self) -> impl Iterator<Item = &(KeyframePoolId, KeyframePool)> {
        self.keyframe_pools.iter()
    }

    pub fn clip_pools(&self) -> impl Iterator<Item = &(ClipPoolId, ClipPool)> {
        self.clip_pools.iter()
    }

    pub fn find_keyframe_pool(&self, name: &str) -> Option<KeyframePoolId> {
        self.keyframe_pools
            .iter()
            .find(|(_, p)| p.name() == name)
            .map(|(id, _)| *id)
    }

    pub fn find_clip_pool(&self, name: &str) -> Option<ClipPoolId> {
        self.clip_pools
            .iter()
            .find(|(_, p)| p.name() == name)
            .map(|(id, _)| *id)
    }

    pub fn clip(&self, pool: ClipPoolId, index: usize) -> Result<&Clip> {
        self.clip_pool(pool)?.get(index)
    }

    pub fn keyframe(&self, pool: KeyframePoolId, index: usize) -> Result<&Keyframe> {
        self.keyframe_pool(pool)?.get(index)
    }

    /// Index of the clip called `name` in `pool`.
    pub fn find_clip(&self, pool: ClipPoolId, name: &str) -> Result<usize> {
        self.clip_pool(pool)?
            .index_of(name)
            .ok_or_else(|| AnimationError::UnknownName {
                kind: "clip",
                name: name.to_string(),
            })
    }

    /// Recompute a clip's duration from its keyframes and return it.
    pub fn compute_clip_duration(&mut self, pool: ClipPoolId, index: usize) -> Result<f32> {
        let keyframe_pool_id = self.clip(pool, index)?.keyframe_pool();
        let keyframes = self
            .keyframe_pools
            .iter()
            .find_map(|(k, p)| if *k == keyframe_pool_id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownKeyframePool {
                id: keyframe_pool_id,
            })?;
        let clip = self
            .clip_pools
            .iter_mut()
            .find_map(|(k, p)| if *k == pool { Some(p) } else { None })
            .ok_or(AnimationError::UnknownClipPool { id: pool })?
            .get_mut(index)?;
        clip.compute_duration_from_keyframes(keyframes)
    }

    /// Give a clip the duration `total`, split evenly over its keyframes.
    ///
    /// Every other timed clip whose range overlaps the rewritten keyframes is re-timed from
    /// its keyframes, so cached clip durations always match the keyframes they cover.
    pub fn distribute_clip_duration(
        &mut self,
        pool: ClipPoolId,
        index: usize,
        total: f32,
    ) -> Result<()> {
        let (keyframe_pool_id, first, last) = {
            let clip = self.clip(pool, index)?;
            (
                clip.keyframe_pool(),
                clip.first_keyframe(),
                clip.last_keyframe(),
            )
        };
        let keyframes = self
            .keyframe_pools
            .iter_mut()
            .find_map(|(k, p)| if *k == keyframe_pool_id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownKeyframePool {
                id: keyframe_pool_id,
            })?;
        let clip = self
            .clip_pools
            .iter_mut()
            .find_map(|(k, p)| if *k == pool { Some(p) } else { None })
            .ok_or(AnimationError::UnknownClipPool { id: pool })?
            .get_mut(index)?;
        clip.distribute_duration_to_keyframes(keyframes, total)?;
        self.retime_overlapping(keyframe_pool_id, first, last, (pool, index))
    }

    fn retime_overlapping(
        &mut self,
        keyframe_pool_id: KeyframePoolId,
        first: usize,
        last: usize,
        skip: (ClipPoolId, usize),
    ) -> Result<()> {
        let keyframes = self
            .keyframe_pools
            .iter()
            .find_map(|(k, p)| if *k == keyframe_pool_id { Some(p) } else { None })
            .ok_or(AnimationError::UnknownKeyframePool {
                id: keyframe_pool_id,
            })?;
        for (pool_id, clips) in self.clip_pools.iter_mut() {
            for clip in clips.iter_mut() {
                let overlaps = clip.keyframe_pool() == keyframe_pool_id
                    && clip.first_keyframe() <= last
                    && first <= clip.last_keyframe();
                // untimed clips stay untimed
                if (*pool_id, clip.index()) == skip || !overlaps || clip.duration() <= 0.0 {
                    continue;
                }
                let duration = clip.compute_duration_from_keyframes(keyframes)?;
                debug!(
                    "library: re-timed clip {:?}/{} '{}' to {}",
                    pool_id,
                    clip.index(),
                    clip.name(),
                    duration
                );
            }
        }
        Ok(())
    }

    fn check_transition(&self, transition: Option<&ClipTransition>) -> Result<()> {
        if let Some(t) = transition {
            self.clip(t.clip_pool, t.clip)?;
        }
        Ok(())
    }

    /// Check that every clip is playable: its keyframe pool exists, its range fits that
    /// pool, its duration is positive and its transitions name existing clips.
    pub fn validate(&self) -> Result<()> {
        for (_, clips) in &self.clip_pools {
            for clip in clips.iter() {
                let keyframes = self.keyframe_pool(clip.keyframe_pool())?;
                if clip.last_keyframe() >= keyframes.len() {
                    return Err(AnimationError::KeyframeOutOfRange {
                        index: clip.last_keyframe(),
                        count: keyframes.len(),
                    });
                }
                let duration = clip.duration();
                if !(duration.is_finite() && duration > 0.0) {
                    return Err(AnimationError::InvalidDuration { duration });
                }
                self.check_transition(clip.forward_transition())?;
                self.check_transition(clip.reverse_transition())?;
            }
        }
        Ok(())
    }
}
