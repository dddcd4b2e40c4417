//! Clip controller: a playhead that walks keyframes and resolves clip boundaries.
//!
//! `update(dt)` advances clip time and keyframe time by `dt * playback_rate`, then
//! resolves every keyframe boundary crossed. Running off the last keyframe (forward) or the
//! first keyframe (reverse) fires the clip's transition for that direction, or loops the
//! clip in place when there is none. Leftover time carries into the clip that is entered,
//! so one large step may cross many boundaries.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::config::Config;
use crate::error::{AnimationError, Result};
use crate::ids::ClipPoolId;
use crate::library::AnimationLibrary;

/// Direction of travel derived from the sign of the playback rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Forward,
    Reverse,
    Paused,
}

/// Boundary crossings observed during the most recent `update`, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerEvent {
    KeyframeEntered {
        keyframe: usize,
    },
    /// The clip ended with no transition and restarted from its other end.
    ClipLooped {
        clip_pool: ClipPoolId,
        clip: usize,
    },
    /// A configured transition fired; the target may be the clip that just ended.
    ClipTransitioned {
        from_pool: ClipPoolId,
        from_clip: usize,
        to_pool: ClipPoolId,
        to_clip: usize,
    },
}

#[derive(Clone, Copy)]
enum Terminus {
    Start,
    End,
}

/// Playhead fields saved across an `update` so a failed one can be undone.
#[derive(Clone, Copy)]
struct Cursor {
    clip_pool: ClipPoolId,
    clip: usize,
    clip_time: f32,
    clip_param: f32,
    keyframe: usize,
    keyframe_time: f32,
    keyframe_param: f32,
    playback_rate: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipController {
    name: String,
    clip_pool: ClipPoolId,
    clip: usize,
    clip_time: f32,
    clip_param: f32,
    keyframe: usize,
    keyframe_time: f32,
    keyframe_param: f32,
    playback_rate: f32,
    max_boundary_crossings: usize,
    events: Vec<ControllerEvent>,
}

impl ClipController {
    /// Create a controller positioned at the start of `clip` in `clip_pool`, playing at
    /// the configured default rate.
    pub fn new(
        name: impl Into<String>,
        library: &AnimationLibrary,
        clip_pool: ClipPoolId,
        clip: usize,
        cfg: &Config,
    ) -> Result<Self> {
        let mut controller = Self {
            name: name.into(),
            clip_pool,
            clip,
            clip_time: 0.0,
            clip_param: 0.0,
            keyframe: 0,
            keyframe_time: 0.0,
            keyframe_param: 0.0,
            playback_rate: 0.0,
            max_boundary_crossings: cfg.max_boundary_crossings,
            events: Vec::new(),
        };
        controller.set_playback_rate(cfg.default_playback_rate)?;
        controller.set_clip(library, clip_pool, clip)?;
        Ok(controller)
    }

    /// Switch to `clip` in `clip_pool` and rewind to its first keyframe.
    ///
    /// The playback rate is left unchanged.
    pub fn set_clip(
        &mut self,
        library: &AnimationLibrary,
        clip_pool: ClipPoolId,
        clip: usize,
    ) -> Result<()> {
        let target = playable_clip(library, clip_pool, clip)?;
        self.clip_pool = clip_pool;
        self.clip = clip;
        self.clip_time = 0.0;
        self.clip_param = 0.0;
        self.keyframe = target.first_keyframe();
        self.keyframe_time = 0.0;
        self.keyframe_param = 0.0;
        Ok(())
    }

    /// Change the playback rate. Negative plays in reverse; zero pauses.
    pub fn set_playback_rate(&mut self, rate: f32) -> Result<()> {
        if !rate.is_finite() {
            return Err(AnimationError::InvalidTimeStep { dt: rate });
        }
        self.playback_rate = rate;
        Ok(())
    }

    /// Advance by `dt` seconds of real time.
    ///
    /// A rejected update leaves the controller exactly as it was, events included.
    pub fn update(&mut self, library: &AnimationLibrary, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            warn!("controller '{}': rejected time step {}", self.name, dt);
            return Err(AnimationError::InvalidTimeStep { dt });
        }

        let saved = self.cursor();
        let previous_events = std::mem::take(&mut self.events);
        let result = self.advance(library, dt);
        if result.is_err() {
            self.restore(saved);
            self.events = previous_events;
        }
        result
    }

    fn advance(&mut self, library: &AnimationLibrary, dt: f32) -> Result<()> {
        let step = dt * self.playback_rate;
        self.clip_time += step;
        self.keyframe_time += step;

        let mut crossings = 0usize;
        loop {
            let clip = library.clip(self.clip_pool, self.clip)?;
            let keyframe = library.keyframe(clip.keyframe_pool(), self.keyframe)?;

            let crossed = if self.playback_rate > 0.0 && self.keyframe_time >= keyframe.duration()
            {
                if self.keyframe < clip.last_keyframe() {
                    self.keyframe_time -= keyframe.duration();
                    self.keyframe += 1;
                    trace!("controller '{}': keyframe {}", self.name, self.keyframe);
                    self.events.push(ControllerEvent::KeyframeEntered {
                        keyframe: self.keyframe,
                    });
                } else {
                    let carry = self.keyframe_time - keyframe.duration();
                    self.cross_terminus(library, Terminus::End, carry)?;
                }
                true
            } else if self.playback_rate < 0.0 && self.keyframe_time < 0.0 {
                if self.keyframe > clip.first_keyframe() {
                    self.keyframe -= 1;
                    let previous = library.keyframe(clip.keyframe_pool(), self.keyframe)?;
                    self.keyframe_time += previous.duration();
                    trace!("controller '{}': keyframe {}", self.name, self.keyframe);
                    self.events.push(ControllerEvent::KeyframeEntered {
                        keyframe: self.keyframe,
                    });
                } else {
                    let carry = -self.keyframe_time;
                    self.cross_terminus(library, Terminus::Start, carry)?;
                }
                true
            } else {
                false
            };

            if !crossed {
                break;
            }
            crossings += 1;
            if crossings > self.max_boundary_crossings {
                warn!(
                    "controller '{}': more than {} boundaries in one update",
                    self.name, self.max_boundary_crossings
                );
                return Err(AnimationError::TooManyBoundaryCrossings {
                    limit: self.max_boundary_crossings,
                });
            }
        }

        self.refresh_params(library)
    }

    /// Leave the current clip through `side`, carrying `carry` units of overshoot.
    fn cross_terminus(
        &mut self,
        library: &AnimationLibrary,
        side: Terminus,
        carry: f32,
    ) -> Result<()> {
        let from_pool = self.clip_pool;
        let from_clip = self.clip;
        let current = library.clip(from_pool, from_clip)?;
        let transition = match side {
            Terminus::End => current.forward_transition(),
            Terminus::Start => current.reverse_transition(),
        }
        .copied();

        // Whole passes through a self-looping clip land where they started.
        let carry = if transition.is_none() && carry >= current.duration() {
            carry % current.duration()
        } else {
            carry
        };

        let (to_pool, to_clip) =
            transition.map_or((from_pool, from_clip), |t| (t.clip_pool, t.clip));
        self.set_clip(library, to_pool, to_clip)?;
        let old_rate = self.playback_rate;
        if let Some(direction) = transition.and_then(|t| t.direction) {
            self.set_playback_rate(direction)?;
        }

        // Overshoot is measured at the old rate; replay it at the new one.
        let carry = if old_rate == 0.0 {
            0.0
        } else {
            carry * (self.playback_rate.abs() / old_rate.abs())
        };
        if self.playback_rate < 0.0 {
            let target = library.clip(to_pool, to_clip)?;
            let last = library.keyframe(target.keyframe_pool(), target.last_keyframe())?;
            self.keyframe = target.last_keyframe();
            self.keyframe_time = last.duration() - carry;
            self.clip_time = target.duration() - carry;
        } else if self.playback_rate > 0.0 {
            self.keyframe_time = carry;
            self.clip_time = carry;
        }

        match transition {
            Some(_) => {
                debug!(
                    "controller '{}': transition {:?}/{} -> {:?}/{}",
                    self.name, from_pool, from_clip, to_pool, to_clip
                );
                self.events.push(ControllerEvent::ClipTransitioned {
                    from_pool,
                    from_clip,
                    to_pool,
                    to_clip,
                });
            }
            None => {
                debug!(
                    "controller '{}': loop {:?}/{}",
                    self.name, from_pool, from_clip
                );
                self.events.push(ControllerEvent::ClipLooped {
                    clip_pool: from_pool,
                    clip: from_clip,
                });
            }
        }
        Ok(())
    }

    fn cursor(&self) -> Cursor {
        Cursor {
            clip_pool: self.clip_pool,
            clip: self.clip,
            clip_time: self.clip_time,
            clip_param: self.clip_param,
            keyframe: self.keyframe,
            keyframe_time: self.keyframe_time,
            keyframe_param: self.keyframe_param,
            playback_rate: self.playback_rate,
        }
    }

    fn restore(&mut self, cursor: Cursor) {
        self.clip_pool = cursor.clip_pool;
        self.clip = cursor.clip;
        self.clip_time = cursor.clip_time;
        self.clip_param = cursor.clip_param;
        self.keyframe = cursor.keyframe;
        self.keyframe_time = cursor.keyframe_time;
        self.keyframe_param = cursor.keyframe_param;
        self.playback_rate = cursor.playback_rate;
    }

    fn refresh_params(&mut self, library: &AnimationLibrary) -> Result<()> {
        let clip = library.clip(self.clip_pool, self.clip)?;
        let keyframe = library.keyframe(clip.keyframe_pool(), self.keyframe)?;
        self.keyframe_param = self.keyframe_time * keyframe.duration_inverse();
        self.clip_param = self.clip_time * clip.duration_inverse();
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn clip_pool(&self) -> ClipPoolId {
        self.clip_pool
    }

    #[inline]
    pub fn clip(&self) -> usize {
        self.clip
    }

    #[inline]
    pub fn clip_time(&self) -> f32 {
        self.clip_time
    }

    #[inline]
    pub fn clip_param(&self) -> f32 {
        self.clip_param
    }

    #[inline]
    pub fn keyframe(&self) -> usize {
        self.keyframe
    }

    #[inline]
    pub fn keyframe_time(&self) -> f32 {
        self.keyframe_time
    }

    #[inline]
    pub fn keyframe_param(&self) -> f32 {
        self.keyframe_param
    }

    #[inline]
    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.playback_rate > 0.0 {
            PlaybackState::Forward
        } else if self.playback_rate < 0.0 {
            PlaybackState::Reverse
        } else {
            PlaybackState::Paused
        }
    }

    /// Boundary events from the last `update`.
    #[inline]
    pub fn events(&self) -> &[ControllerEvent] {
        &self.events
    }
}

fn playable_clip(library: &AnimationLibrary, pool: ClipPoolId, index: usize) -> Result<&Clip> {
    let clip = library.clip(pool, index)?;
    let duration = clip.duration();
    if !(duration.is_finite() && duration > 0.0) {
        return Err(AnimationError::InvalidDuration { duration });
    }
    library.keyframe(clip.keyframe_pool(), clip.last_keyframe())?;
    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipPool, ClipTransition};
    use crate::keyframe::KeyframePool;

    fn one_clip(durations: &[f32]) -> (AnimationLibrary, ClipPoolId) {
        let mut lib = AnimationLibrary::new();
        let mut kf = KeyframePool::new("kf");
        for (i, d) in durations.iter().enumerate() {
            kf.push(*d, i as u32).unwrap();
        }
        let kf_id = lib.add_keyframe_pool(kf);
        let mut clips = ClipPool::new("clips");
        clips.push(Clip::new("only", kf_id, 0, durations.len() - 1).unwrap());
        let pool = lib.add_clip_pool(clips);
        lib.compute_clip_duration(pool, 0).unwrap();
        (lib, pool)
    }

    #[test]
    fn untimed_clip_is_not_playable() {
        let mut lib = AnimationLibrary::new();
        let mut kf = KeyframePool::new("kf");
        kf.push(1.0, 0).unwrap();
        let kf_id = lib.add_keyframe_pool(kf);
        let mut clips = ClipPool::new("clips");
        clips.push(Clip::new("raw", kf_id, 0, 0).unwrap());
        let pool = lib.add_clip_pool(clips);
        let err = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap_err();
        assert!(matches!(err, AnimationError::InvalidDuration { .. }));
    }

    #[test]
    fn playback_state_follows_rate_sign() {
        let (lib, pool) = one_clip(&[1.0]);
        let mut c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();
        assert_eq!(c.playback_state(), PlaybackState::Forward);
        c.set_playback_rate(-0.5).unwrap();
        assert_eq!(c.playback_state(), PlaybackState::Reverse);
        c.set_playback_rate(0.0).unwrap();
        assert_eq!(c.playback_state(), PlaybackState::Paused);
        assert!(c.set_playback_rate(f32::NAN).is_err());
    }

    #[test]
    fn crossing_limit_is_enforced() {
        let mut lib = AnimationLibrary::new();
        let mut kf = KeyframePool::new("kf");
        kf.push(0.001, 0).unwrap();
        kf.push(0.001, 1).unwrap();
        let kf_id = lib.add_keyframe_pool(kf);
        let pool = lib.add_clip_pool(ClipPool::new("clips"));
        for (name, first, other) in [("ping", 0, 1), ("pong", 1, 0)] {
            let clip = Clip::new(name, kf_id, first, first)
                .unwrap()
                .with_forward_transition(ClipTransition::new(pool, other));
            lib.clip_pool_mut(pool).unwrap().push(clip);
        }
        lib.compute_clip_duration(pool, 0).unwrap();
        lib.compute_clip_duration(pool, 1).unwrap();
        let cfg = Config {
            max_boundary_crossings: 8,
            ..Config::default()
        };
        let mut c = ClipController::new("c", &lib, pool, 0, &cfg).unwrap();
        c.update(&lib, 0.0015).unwrap();
        let before = c.clone();

        assert!(matches!(
            c.update(&lib, 1.0),
            Err(AnimationError::TooManyBoundaryCrossings { limit: 8 })
        ));
        assert_eq!(c, before);
    }

    #[test]
    fn self_loop_folds_whole_passes() {
        let (lib, pool) = one_clip(&[0.001]);
        let cfg = Config {
            max_boundary_crossings: 8,
            ..Config::default()
        };
        let mut c = ClipController::new("c", &lib, pool, 0, &cfg).unwrap();
        c.update(&lib, 1.0).unwrap();
        assert_eq!(c.events().len(), 1);
        assert!(c.keyframe_time() >= 0.0 && c.keyframe_time() < 0.001);
    }
}
