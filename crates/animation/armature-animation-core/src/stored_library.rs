use hashbrown::HashMap;
use log::debug;
use serde::Deserialize;

use crate::clip::{Clip, ClipPool, ClipTransition};
use crate::error::{AnimationError, Result};
use crate::ids::{ClipPoolId, KeyframePoolId};
use crate::keyframe::KeyframePool;
use crate::library::AnimationLibrary;

/// Public API: parse a clip-library JSON document into a validated [`AnimationLibrary`].
///
/// Notes:
/// - Pools are referenced by name; a transition without `clipPool` targets its own pool.
/// - A clip with `duration` spreads it evenly over its keyframes; otherwise its duration is
///   the sum of its keyframes' durations.
/// - Clips are timed in document order. A later clip that distributes over a shared
///   keyframe range rewrites those keyframes, and earlier clips covering them are re-timed.
pub fn parse_clip_library_json(s: &str) -> Result<AnimationLibrary> {
    let doc: StoredLibrary = serde_json::from_str(s)?;
    let mut lib = AnimationLibrary::new();

    let mut keyframe_pools: HashMap<String, KeyframePoolId> = HashMap::new();
    for sp in doc.keyframe_pools {
        let mut pool = KeyframePool::new(sp.name.clone());
        for sk in sp.keyframes {
            pool.push(sk.duration, sk.sample)?;
        }
        if keyframe_pools.contains_key(&sp.name) {
            return Err(AnimationError::DuplicateName {
                kind: "keyframe pool",
                name: sp.name,
            });
        }
        let id = lib.add_keyframe_pool(pool);
        keyframe_pools.insert(sp.name, id);
    }

    // Pools are registered before any transition is resolved so targets may point forward.
    let mut clip_pools: HashMap<String, ClipPoolId> = HashMap::new();
    let mut pending: Vec<(ClipPoolId, Vec<SaClip>)> = Vec::with_capacity(doc.clip_pools.len());
    for sp in doc.clip_pools {
        if clip_pools.contains_key(&sp.name) {
            return Err(AnimationError::DuplicateName {
                kind: "clip pool",
                name: sp.name,
            });
        }
        let mut pool = ClipPool::new(sp.name.clone());
        for sc in &sp.clips {
            if pool.index_of(&sc.name).is_some() {
                return Err(AnimationError::DuplicateName {
                    kind: "clip",
                    name: sc.name.clone(),
                });
            }
            let kf = lookup(&keyframe_pools, "keyframe pool", &sc.keyframe_pool)?;
            pool.push(Clip::new(
                sc.name.clone(),
                kf,
                sc.first_keyframe,
                sc.last_keyframe,
            )?);
        }
        let id = lib.add_clip_pool(pool);
        clip_pools.insert(sp.name, id);
        pending.push((id, sp.clips));
    }

    for (pool_id, clips) in pending {
        for (index, sc) in clips.into_iter().enumerate() {
            match sc.duration {
                Some(total) => lib.distribute_clip_duration(pool_id, index, total)?,
                None => {
                    lib.compute_clip_duration(pool_id, index)?;
                }
            }
            let forward = resolve(&lib, &clip_pools, pool_id, sc.forward)?;
            let reverse = resolve(&lib, &clip_pools, pool_id, sc.reverse)?;
            let clip = lib.clip_pool_mut(pool_id)?.get_mut(index)?;
            clip.set_forward_transition(forward);
            clip.set_reverse_transition(reverse);
        }
    }

    lib.validate()?;
    debug!(
        "stored library: {} keyframe pools, {} clip pools",
        keyframe_pools.len(),
        clip_pools.len()
    );
    Ok(lib)
}

fn lookup<T: Copy>(map: &HashMap<String, T>, kind: &'static str, name: &str) -> Result<T> {
    map.get(name)
        .copied()
        .ok_or_else(|| AnimationError::UnknownName {
            kind,
            name: name.to_string(),
        })
}

fn resolve(
    lib: &AnimationLibrary,
    clip_pools: &HashMap<String, ClipPoolId>,
    own_pool: ClipPoolId,
    st: Option<SaTransition>,
) -> Result<Option<ClipTransition>> {
    let Some(st) = st else {
        return Ok(None);
    };
    let pool = match &st.clip_pool {
        Some(name) => lookup(clip_pools, "clip pool", name)?,
        None => own_pool,
    };
    let clip = lib.find_clip(pool, &st.clip)?;
    let mut transition = ClipTransition::new(pool, clip);
    if let Some(direction) = st.direction {
        if !direction.is_finite() {
            return Err(AnimationError::InvalidTimeStep { dt: direction });
        }
        transition = transition.with_direction(direction);
    }
    Ok(Some(transition))
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLibrary {
    #[serde(default)]
    keyframe_pools: Vec<SaKeyframePool>,
    #[serde(default)]
    clip_pools: Vec<SaClipPool>,
}

#[derive(Debug, Deserialize)]
struct SaKeyframePool {
    name: String,
    keyframes: Vec<SaKeyframe>,
}

#[derive(Debug, Deserialize)]
struct SaKeyframe {
    duration: f32,
    sample: u32,
}

#[derive(Debug, Deserialize)]
struct SaClipPool {
    name: String,
    clips: Vec<SaClip>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaClip {
    name: String,
    keyframe_pool: String,
    first_keyframe: usize,
    last_keyframe: usize,
    #[serde(default)]
    duration: Option<f32>,
    #[serde(default)]
    forward: Option<SaTransition>,
    #[serde(default)]
    reverse: Option<SaTransition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaTransition {
    #[serde(default)]
    clip_pool: Option<String>,
    clip: String,
    #[serde(default)]
    direction: Option<f32>,
}
