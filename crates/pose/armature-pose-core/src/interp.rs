//! Scalar interpolation helpers shared by the pose operators:
//! - lerp_f32 / lerp_vec3 (endpoint-exact linear blend)
//! - guarded_pow (power that never produces NaN/Inf for scale channels)
//! - geometric_lerp (scale interpolation)
//! - smoothstep_ease, catmull_rom_weights
//! - wrap_degrees (angle canonicalization)

use crate::spatial::Vec3;

/// Linear interpolation written as `a*(1-t) + b*t` so that `t == 0` yields `a`
/// and `t == 1` yields `b` bit-for-bit.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

/// `base^exp` for scale components.
///
/// - any base to the power 0 is 1
/// - a zero base with a negative exponent yields 0 instead of infinity
/// - a negative base keeps its sign (`-|base|^exp`) instead of producing NaN
#[inline]
pub fn guarded_pow(base: f32, exp: f32) -> f32 {
    if exp == 0.0 {
        return 1.0;
    }
    if base == 0.0 {
        return 0.0;
    }
    if base < 0.0 {
        -(-base).powf(exp)
    } else {
        base.powf(exp)
    }
}

/// Geometric blend `s0 * (s1 / s0)^u`; a zero `s0` yields 0. Endpoints are exact.
#[inline]
pub fn geometric_lerp(s0: f32, s1: f32, u: f32) -> f32 {
    if u == 0.0 {
        return s0;
    }
    if u == 1.0 {
        return s1;
    }
    if s0 == 0.0 {
        return 0.0;
    }
    s0 * guarded_pow(s1 / s0, u)
}

/// Division for scale channels: a zero denominator yields 0.
#[inline]
pub fn guarded_div(num: f32, den: f32) -> f32 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Hermite ease `u^2 (3 - 2u)`; maps 0 to 0, 0.5 to 0.5 and 1 to 1.
#[inline]
pub fn smoothstep_ease(u: f32) -> f32 {
    u * u * (3.0 - 2.0 * u)
}

/// Catmull-Rom basis weights for the points at -1, 0, 1, 2, before the 0.5 normalization.
/// The weights always sum to 2.
#[inline]
pub fn catmull_rom_weights(u: f32) -> [f32; 4] {
    let u2 = u * u;
    let u3 = u2 * u;
    [
        -u + 2.0 * u2 - u3,
        2.0 - 5.0 * u2 + 3.0 * u3,
        u + 4.0 * u2 - 3.0 * u3,
        -u2 + u3,
    ]
}

/// Wrap an angle in degrees into [-180, 180). Non-finite input is returned unchanged.
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    if !deg.is_finite() {
        return deg;
    }
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
