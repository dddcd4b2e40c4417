//! Single-joint decomposed pose and its operator set.
//!
//! Rotation is stored as three Euler angles in degrees and composes additively; scale
//! composes multiplicatively; translation composes additively. Blends treat angles and
//! translation arithmetically and scale geometrically (`s0 * (s1/s0)^u`), so that scale
//! blends stay consistent with `scale_by`, which raises scale to a power.
//!
//! Every operator returns a new pose; inputs are never mutated. The `*_into` forms write
//! the same result into a caller-owned pose instead. Operators that would
//! divide by a zero scale component substitute zero for that component.

use serde::{Deserialize, Serialize};

use crate::channel::EulerOrder;
use crate::interp::{
    catmull_rom_weights, geometric_lerp, guarded_div, guarded_pow, lerp_vec3, smoothstep_ease,
    wrap_degrees,
};

/// Three-component vector (x, y, z).
pub type Vec3 = [f32; 3];

/// Column-major 4x4 matrix: `m[column][row]`.
pub type Mat4 = [[f32; 4]; 4];

const ZERO3: Vec3 = [0.0, 0.0, 0.0];
const ONE3: Vec3 = [1.0, 1.0, 1.0];

fn one3() -> Vec3 {
    ONE3
}

/// One joint's local transform in decomposed form.
///
/// `transform` caches the composed matrix produced by [`SpatialPose::refresh_transform`].
/// It is derived data: operators other than copying drop it, and equality ignores it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpatialPose {
    /// Euler angles in degrees.
    #[serde(default)]
    pub angles: Vec3,
    #[serde(default = "one3")]
    pub scale: Vec3,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(skip)]
    pub transform: Option<Mat4>,
}

impl Default for SpatialPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for SpatialPose {
    fn eq(&self, other: &Self) -> bool {
        self.angles == other.angles
            && self.scale == other.scale
            && self.translation == other.translation
    }
}

#[inline]
fn map3(a: Vec3, f: impl Fn(f32) -> f32) -> Vec3 {
    [f(a[0]), f(a[1]), f(a[2])]
}

#[inline]
fn zip3(a: Vec3, b: Vec3, f: impl Fn(f32, f32) -> f32) -> Vec3 {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2])]
}

impl SpatialPose {
    /// Zero angles, unit scale, zero translation.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            angles: ZERO3,
            scale: ONE3,
            translation: ZERO3,
            transform: None,
        }
    }

    /// Build a pose from raw channels. Finite angles are wrapped into [-180, 180); NaN and
    /// infinite angles are stored as given.
    #[inline]
    pub fn construct(rotation: Vec3, scale: Vec3, translation: Vec3) -> Self {
        Self {
            angles: map3(rotation, wrap_degrees),
            scale,
            translation,
            transform: None,
        }
    }

    /// Field-wise duplicate, including the cached matrix.
    #[inline]
    pub fn copy(&self) -> Self {
        *self
    }

    /// Negated angles and translation, reciprocal scale (zero scale stays zero).
    #[inline]
    pub fn invert(&self) -> Self {
        Self {
            angles: map3(self.angles, |a| -a),
            scale: map3(self.scale, |s| guarded_div(1.0, s)),
            translation: map3(self.translation, |t| -t),
            transform: None,
        }
    }

    /// Composition: angles and translation add, scale multiplies.
    #[inline]
    pub fn concat(&self, rhs: &Self) -> Self {
        Self {
            angles: zip3(self.angles, rhs.angles, |a, b| a + b),
            scale: zip3(self.scale, rhs.scale, |a, b| a * b),
            translation: zip3(self.translation, rhs.translation, |a, b| a + b),
            transform: None,
        }
    }

    /// Inverse of [`concat`](Self::concat): angles and translation subtract, scale divides.
    /// A zero `rhs` scale component yields zero.
    #[inline]
    pub fn deconcat(&self, rhs: &Self) -> Self {
        Self {
            angles: zip3(self.angles, rhs.angles, |a, b| a - b),
            scale: zip3(self.scale, rhs.scale, guarded_div),
            translation: zip3(self.translation, rhs.translation, |a, b| a - b),
            transform: None,
        }
    }

    /// Fractional concatenation: angles and translation times `u`, scale to the power `u`.
    #[inline]
    pub fn scale_by(&self, u: f32) -> Self {
        Self {
            angles: map3(self.angles, |a| a * u),
            scale: map3(self.scale, |s| guarded_pow(s, u)),
            translation: map3(self.translation, |t| t * u),
            transform: None,
        }
    }

    /// Inverse of [`scale_by`](Self::scale_by). Descaling by zero returns the pose unchanged.
    #[inline]
    pub fn descale(&self, u: f32) -> Self {
        if u == 0.0 {
            return *self;
        }
        self.scale_by(1.0 / u)
    }

    /// `pose0` when `u < 0.5`, otherwise `pose1` (a tie at 0.5 picks `pose1`).
    #[inline]
    pub fn nearest(pose0: &Self, pose1: &Self, u: f32) -> Self {
        if u < 0.5 {
            *pose0
        } else {
            *pose1
        }
    }

    /// Linear blend of angles and translation, geometric blend of scale.
    /// `u == 0` reproduces `pose0` and `u == 1` reproduces `pose1` exactly.
    #[inline]
    pub fn lerp(pose0: &Self, pose1: &Self, u: f32) -> Self {
        Self {
            angles: lerp_vec3(pose0.angles, pose1.angles, u),
            scale: zip3(pose0.scale, pose1.scale, |s0, s1| geometric_lerp(s0, s1, u)),
            translation: lerp_vec3(pose0.translation, pose1.translation, u),
            transform: None,
        }
    }

    /// [`lerp`](Self::lerp) with the eased parameter `u^2 (3 - 2u)`; `u` outside (0, 1)
    /// returns the nearer endpoint unchanged.
    #[inline]
    pub fn smoothstep(pose0: &Self, pose1: &Self, u: f32) -> Self {
        if u <= 0.0 {
            return *pose0;
        }
        if u >= 1.0 {
            return *pose1;
        }
        Self::lerp(pose0, pose1, smoothstep_ease(u))
    }

    /// Catmull-Rom blend through `pose0` (u = 0) and `pose1` (u = 1), using `pose_n1` and
    /// `pose2` as outer control points.
    pub fn cubic(pose_n1: &Self, pose0: &Self, pose1: &Self, pose2: &Self, u: f32) -> Self {
        let [wn1, w0, w1, w2] = catmull_rom_weights(u);
        let lhs = pose_n1.scale_by(wn1).concat(&pose0.scale_by(w0));
        let rhs = pose1.scale_by(w1).concat(&pose2.scale_by(w2));
        lhs.concat(&rhs).scale_by(0.5)
    }

    /// Barycentric blend with weights `(u1, u2, 1 - u1 - u2)`.
    pub fn triangular(pose0: &Self, pose1: &Self, pose2: &Self, u1: f32, u2: f32) -> Self {
        let u0 = 1.0 - u1 - u2;
        let sum = |a: f32, b: f32, c: f32| a * u1 + b * u2 + c * u0;
        let product =
            |a: f32, b: f32, c: f32| guarded_pow(a, u1) * guarded_pow(b, u2) * guarded_pow(c, u0);
        let mut out = Self::identity();
        for i in 0..3 {
            out.angles[i] = sum(pose0.angles[i], pose1.angles[i], pose2.angles[i]);
            out.scale[i] = product(pose0.scale[i], pose1.scale[i], pose2.scale[i]);
            out.translation[i] = sum(
                pose0.translation[i],
                pose1.translation[i],
                pose2.translation[i],
            );
        }
        out
    }

    /// Nearest along each row (`u0` for the first row, `u1` for the second), then nearest
    /// between the row results by `u`.
    pub fn bi_nearest(
        pose00: &Self,
        pose01: &Self,
        pose10: &Self,
        pose11: &Self,
        u0: f32,
        u1: f32,
        u: f32,
    ) -> Self {
        let row0 = Self::nearest(pose00, pose01, u0);
        let row1 = Self::nearest(pose10, pose11, u1);
        Self::nearest(&row0, &row1, u)
    }

    /// Linear blend along each row (`u0`, `u1`), then between the row results by `u`.
    pub fn bi_linear(
        pose00: &Self,
        pose01: &Self,
        pose10: &Self,
        pose11: &Self,
        u0: f32,
        u1: f32,
        u: f32,
    ) -> Self {
        let row0 = Self::lerp(pose00, pose01, u0);
        let row1 = Self::lerp(pose10, pose11, u1);
        Self::lerp(&row0, &row1, u)
    }

    /// Cubic blend of each of the four grid rows by its own parameter, then a cubic blend
    /// of the four row results by `u`. Rows are ordered -1, 0, 1, 2.
    pub fn bi_cubic(grid: &[[Self; 4]; 4], row_params: [f32; 4], u: f32) -> Self {
        let rows: [Self; 4] = std::array::from_fn(|r| {
            let [pn1, p0, p1, p2] = &grid[r];
            Self::cubic(pn1, p0, p1, p2, row_params[r])
        });
        Self::cubic(&rows[0], &rows[1], &rows[2], &rows[3], u)
    }

    // Output-parameter forms: write the result into `out` and hand it back for chaining.

    #[inline]
    pub fn concat_into<'a>(out: &'a mut Self, lhs: &Self, rhs: &Self) -> &'a mut Self {
        *out = lhs.concat(rhs);
        out
    }

    #[inline]
    pub fn nearest_into<'a>(
        out: &'a mut Self,
        pose0: &Self,
        pose1: &Self,
        u: f32,
    ) -> &'a mut Self {
        *out = Self::nearest(pose0, pose1, u);
        out
    }

    #[inline]
    pub fn lerp_into<'a>(out: &'a mut Self, pose0: &Self, pose1: &Self, u: f32) -> &'a mut Self {
        *out = Self::lerp(pose0, pose1, u);
        out
    }

    #[inline]
    pub fn smoothstep_into<'a>(
        out: &'a mut Self,
        pose0: &Self,
        pose1: &Self,
        u: f32,
    ) -> &'a mut Self {
        *out = Self::smoothstep(pose0, pose1, u);
        out
    }

    pub fn cubic_into<'a>(
        out: &'a mut Self,
        pose_n1: &Self,
        pose0: &Self,
        pose1: &Self,
        pose2: &Self,
        u: f32,
    ) -> &'a mut Self {
        *out = Self::cubic(pose_n1, pose0, pose1, pose2, u);
        out
    }

    pub fn triangular_into<'a>(
        out: &'a mut Self,
        pose0: &Self,
        pose1: &Self,
        pose2: &Self,
        u1: f32,
        u2: f32,
    ) -> &'a mut Self {
        *out = Self::triangular(pose0, pose1, pose2, u1, u2);
        out
    }

    /// Compose translation * rotation * scale into a column-major matrix.
    pub fn to_matrix(&self, order: EulerOrder) -> Mat4 {
        let r = rotation_matrix(self.angles, order);
        let s = self.scale;
        let t = self.translation;
        [
            [r[0][0] * s[0], r[1][0] * s[0], r[2][0] * s[0], 0.0],
            [r[0][1] * s[1], r[1][1] * s[1], r[2][1] * s[1], 0.0],
            [r[0][2] * s[2], r[1][2] * s[2], r[2][2] * s[2], 0.0],
            [t[0], t[1], t[2], 1.0],
        ]
    }

    /// Recompute and cache [`to_matrix`](Self::to_matrix).
    pub fn refresh_transform(&mut self, order: EulerOrder) -> &Mat4 {
        self.transform.insert(self.to_matrix(order))
    }

    /// Component-wise comparison within `eps`, ignoring the matrix cache.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        let close = |a: Vec3, b: Vec3| (0..3).all(|i| (a[i] - b[i]).abs() <= eps);
        close(self.angles, other.angles)
            && close(self.scale, other.scale)
            && close(self.translation, other.translation)
    }
}

type Mat3 = [[f32; 3]; 3];

fn axis_rotation(axis: usize, deg: f32) -> Mat3 {
    let (s, c) = deg.to_radians().sin_cos();
    match axis {
        0 => [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        1 => [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        _ => [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
    }
}

fn mul3(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0f32; 3]; 3];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, cell) in out_row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[row][k] * b[k][col]).sum();
        }
    }
    out
}

/// Row-major rotation; the first axis in `order` is applied first.
fn rotation_matrix(angles: Vec3, order: EulerOrder) -> Mat3 {
    let [first, second, third] = order.axes();
    let r1 = axis_rotation(first, angles[first]);
    let r2 = axis_rotation(second, angles[second]);
    let r3 = axis_rotation(third, angles[third]);
    mul3(&r3, &mul3(&r2, &r1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_about_z_maps_x_to_y() {
        let pose = SpatialPose::construct([0.0, 0.0, 90.0], ONE3, ZERO3);
        let m = pose.to_matrix(EulerOrder::Xyz);
        // first column is the image of +X
        assert!((m[0][0]).abs() < 1e-6);
        assert!((m[0][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn matrix_carries_scale_and_translation() {
        let pose = SpatialPose::construct(ZERO3, [2.0, 3.0, 4.0], [5.0, 6.0, 7.0]);
        let m = pose.to_matrix(EulerOrder::Zyx);
        assert_eq!(m[0][0], 2.0);
        assert_eq!(m[1][1], 3.0);
        assert_eq!(m[2][2], 4.0);
        assert_eq!(m[3], [5.0, 6.0, 7.0, 1.0]);
    }

    #[test]
    fn operators_drop_the_matrix_cache() {
        let mut pose = SpatialPose::construct([10.0, 0.0, 0.0], ONE3, ZERO3);
        pose.refresh_transform(EulerOrder::Xyz);
        assert!(pose.copy().transform.is_some());
        assert!(pose.concat(&SpatialPose::identity()).transform.is_none());
        // equality ignores the cache
        assert_eq!(pose, pose.concat(&SpatialPose::identity()));
    }
}
