//! Per-node pose metadata: animated channel mask and Euler rotation order.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Channels of a spatial pose that a node animates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PoseChannels: u16 {
        const ROTATE_X = 0x0001;
        const ROTATE_Y = 0x0002;
        const ROTATE_Z = 0x0004;
        const SCALE_X = 0x0010;
        const SCALE_Y = 0x0020;
        const SCALE_Z = 0x0040;
        const TRANSLATE_X = 0x0100;
        const TRANSLATE_Y = 0x0200;
        const TRANSLATE_Z = 0x0400;

        const ROTATE = Self::ROTATE_X.bits() | Self::ROTATE_Y.bits() | Self::ROTATE_Z.bits();
        const SCALE = Self::SCALE_X.bits() | Self::SCALE_Y.bits() | Self::SCALE_Z.bits();
        const TRANSLATE =
            Self::TRANSLATE_X.bits() | Self::TRANSLATE_Y.bits() | Self::TRANSLATE_Z.bits();
        const ALL = Self::ROTATE.bits() | Self::SCALE.bits() | Self::TRANSLATE.bits();
    }
}

impl Default for PoseChannels {
    fn default() -> Self {
        Self::ALL
    }
}

/// Order in which the three Euler angles are applied when building a rotation matrix.
///
/// `Xyz` rotates about X first, then Y, then Z (matrix `Rz * Ry * Rx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EulerOrder {
    #[default]
    Xyz,
    Yzx,
    Zxy,
    Yxz,
    Xzy,
    Zyx,
}

impl EulerOrder {
    /// Axis indices (0 = X, 1 = Y, 2 = Z) in application order.
    #[inline]
    pub fn axes(self) -> [usize; 3] {
        match self {
            Self::Xyz => [0, 1, 2],
            Self::Yzx => [1, 2, 0],
            Self::Zxy => [2, 0, 1],
            Self::Yxz => [1, 0, 2],
            Self::Xzy => [0, 2, 1],
            Self::Zyx => [2, 1, 0],
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::Yzx => "yzx",
            Self::Zxy => "zxy",
            Self::Yxz => "yxz",
            Self::Xzy => "xzy",
            Self::Zyx => "zyx",
        }
    }
}
