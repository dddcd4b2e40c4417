//! Core configuration for armature-animation-core.

use serde::{Deserialize, Serialize};

/// Controller tuning shared by every controller created from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on keyframe and clip boundaries resolved by a single `update`.
    /// An update that would cross more is rejected.
    pub max_boundary_crossings: usize,

    /// Playback rate assigned to newly created controllers (1 = forward at real time).
    pub default_playback_rate: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_boundary_crossings: 4096,
            default_playback_rate: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"default_playback_rate": -0.5}"#).unwrap();
        assert_eq!(cfg.default_playback_rate, -0.5);
        assert_eq!(cfg.max_boundary_crossings, Config::default().max_boundary_crossings);
    }
}
