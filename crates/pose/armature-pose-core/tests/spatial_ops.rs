use armature_pose::{EulerOrder, SpatialPose};

fn approx(a: f32, b: f32, eps: f32) {
    assert!(
        (a - b).abs() <= eps,
        "expected {b}, got {a} (diff {})",
        (a - b).abs()
    );
}

fn approx_pose(a: &SpatialPose, b: &SpatialPose, eps: f32) {
    assert!(a.approx_eq(b, eps), "expected {b:?}, got {a:?}");
}

fn sample_a() -> SpatialPose {
    SpatialPose::construct([30.0, -45.0, 90.0], [2.0, 0.5, 1.0], [1.0, 2.0, 3.0])
}

fn sample_b() -> SpatialPose {
    SpatialPose::construct([-10.0, 15.0, 0.0], [4.0, 2.0, 3.0], [-1.0, 0.0, 5.0])
}

#[test]
fn construct_wraps_angles() {
    let p = SpatialPose::construct([190.0, -190.0, 540.0], [1.0; 3], [0.0; 3]);
    approx(p.angles[0], -170.0, 1e-4);
    approx(p.angles[1], 170.0, 1e-4);
    approx(p.angles[2], -180.0, 1e-4);
    let q = SpatialPose::construct([180.0, 0.0, 0.0], [1.0; 3], [0.0; 3]);
    approx(q.angles[0], -180.0, 1e-4);
}

#[test]
fn construct_keeps_non_finite_angles() {
    let p = SpatialPose::construct([f32::NAN, f32::INFINITY, 10.0], [1.0; 3], [0.0; 3]);
    assert!(p.angles[0].is_nan());
    assert_eq!(p.angles[1], f32::INFINITY);
    assert_eq!(p.angles[2], 10.0);
}

#[test]
fn identity_is_neutral_for_concat() {
    let a = sample_a();
    let id = SpatialPose::identity();
    assert_eq!(a.concat(&id), a);
    assert_eq!(id.concat(&a), a);
}

#[test]
fn invert_cancels_concat() {
    let a = sample_a();
    approx_pose(&a.concat(&a.invert()), &SpatialPose::identity(), 1e-6);
}

#[test]
fn invert_keeps_zero_scale_at_zero() {
    let p = SpatialPose::construct([0.0; 3], [0.0, 2.0, 1.0], [0.0; 3]);
    let inv = p.invert();
    assert_eq!(inv.scale, [0.0, 0.5, 1.0]);
}

#[test]
fn deconcat_undoes_concat() {
    let a = sample_a();
    let b = sample_b();
    approx_pose(&a.concat(&b).deconcat(&b), &a, 1e-5);
}

#[test]
fn deconcat_by_zero_scale_yields_zero() {
    let a = sample_a();
    let z = SpatialPose::construct([0.0; 3], [0.0, 1.0, 1.0], [0.0; 3]);
    let out = a.deconcat(&z);
    assert_eq!(out.scale[0], 0.0);
    assert!(out.scale.iter().all(|s| s.is_finite()));
}

#[test]
fn scale_by_one_and_zero() {
    let a = sample_a();
    approx_pose(&a.scale_by(1.0), &a, 1e-6);
    assert_eq!(a.scale_by(0.0), SpatialPose::identity());
}

#[test]
fn scale_by_halves_channels() {
    let p = SpatialPose::construct([40.0, 0.0, 0.0], [4.0, 1.0, 1.0], [2.0, 0.0, 0.0]);
    let half = p.scale_by(0.5);
    approx(half.angles[0], 20.0, 1e-5);
    approx(half.scale[0], 2.0, 1e-5);
    approx(half.translation[0], 1.0, 1e-6);
}

#[test]
fn descale_inverts_scale_by() {
    let a = sample_a();
    approx_pose(&a.scale_by(0.25).descale(0.25), &a, 1e-4);
    assert_eq!(a.descale(0.0), a);
}

#[test]
fn nearest_picks_by_half() {
    let a = sample_a();
    let b = sample_b();
    assert_eq!(SpatialPose::nearest(&a, &b, 0.49), a);
    assert_eq!(SpatialPose::nearest(&a, &b, 0.5), b);
    assert_eq!(SpatialPose::nearest(&a, &b, 0.51), b);
}

#[test]
fn lerp_endpoints_are_exact() {
    let a = sample_a();
    let b = sample_b();
    assert_eq!(SpatialPose::lerp(&a, &b, 0.0), a);
    assert_eq!(SpatialPose::lerp(&a, &b, 1.0), b);
}

#[test]
fn lerp_scale_is_geometric() {
    let a = SpatialPose::construct([0.0; 3], [1.0, 2.0, 1.0], [0.0; 3]);
    let b = SpatialPose::construct([0.0; 3], [4.0, 8.0, 1.0], [10.0, 0.0, 0.0]);
    let mid = SpatialPose::lerp(&a, &b, 0.5);
    approx(mid.scale[0], 2.0, 1e-5);
    approx(mid.scale[1], 4.0, 1e-5);
    approx(mid.translation[0], 5.0, 1e-6);
}

#[test]
fn lerp_from_zero_scale_stays_zero() {
    let a = SpatialPose::construct([0.0; 3], [0.0, 1.0, 1.0], [0.0; 3]);
    let b = SpatialPose::construct([0.0; 3], [3.0, 1.0, 1.0], [0.0; 3]);
    let mid = SpatialPose::lerp(&a, &b, 0.5);
    assert_eq!(mid.scale[0], 0.0);
    assert_eq!(SpatialPose::lerp(&a, &b, 1.0).scale[0], 3.0);
}

#[test]
fn smoothstep_matches_lerp_at_half_and_clamps() {
    let a = sample_a();
    let b = sample_b();
    approx_pose(
        &SpatialPose::smoothstep(&a, &b, 0.5),
        &SpatialPose::lerp(&a, &b, 0.5),
        1e-5,
    );
    assert_eq!(SpatialPose::smoothstep(&a, &b, -1.0), a);
    assert_eq!(SpatialPose::smoothstep(&a, &b, 2.0), b);
    let eased = SpatialPose::smoothstep(&a, &b, 0.25);
    let linear = SpatialPose::lerp(&a, &b, 0.25);
    // eased parameter is 0.15625, so the blend lags the linear one
    let lag = |p: &SpatialPose| (p.translation[2] - a.translation[2]).abs();
    assert!(lag(&eased) < lag(&linear));
}

#[test]
fn cubic_passes_through_inner_points() {
    let pn1 = SpatialPose::construct([0.0; 3], [1.0; 3], [-1.0, 0.0, 0.0]);
    let p0 = sample_a();
    let p1 = sample_b();
    let p2 = SpatialPose::construct([5.0; 3], [1.5; 3], [3.0, 3.0, 3.0]);
    approx_pose(&SpatialPose::cubic(&pn1, &p0, &p1, &p2, 0.0), &p0, 1e-4);
    approx_pose(&SpatialPose::cubic(&pn1, &p0, &p1, &p2, 1.0), &p1, 1e-4);
}

#[test]
fn cubic_of_equal_points_is_constant() {
    let p = sample_a();
    for u in [0.0, 0.3, 0.5, 0.8, 1.0] {
        approx_pose(&SpatialPose::cubic(&p, &p, &p, &p, u), &p, 1e-4);
    }
}

#[test]
fn cubic_on_a_line_is_linear_in_translation() {
    let at = |x: f32| SpatialPose::construct([0.0; 3], [1.0; 3], [x, 0.0, 0.0]);
    let out = SpatialPose::cubic(&at(-1.0), &at(0.0), &at(1.0), &at(2.0), 0.25);
    approx(out.translation[0], 0.25, 1e-5);
}

#[test]
fn triangular_corners() {
    let a = sample_a();
    let b = sample_b();
    let c = SpatialPose::construct([1.0, 2.0, 3.0], [3.0; 3], [7.0; 3]);
    approx_pose(&SpatialPose::triangular(&a, &b, &c, 1.0, 0.0), &a, 1e-5);
    approx_pose(&SpatialPose::triangular(&a, &b, &c, 0.0, 1.0), &b, 1e-5);
    approx_pose(&SpatialPose::triangular(&a, &b, &c, 0.0, 0.0), &c, 1e-5);
}

#[test]
fn triangular_centroid_translation() {
    let at = |x: f32| SpatialPose::construct([0.0; 3], [1.0; 3], [x, 0.0, 0.0]);
    let third = 1.0 / 3.0;
    let out = SpatialPose::triangular(&at(0.0), &at(3.0), &at(6.0), third, third);
    approx(out.translation[0], 3.0, 1e-5);
}

#[test]
fn bi_nearest_picks_grid_corner() {
    let at = |x: f32| SpatialPose::construct([0.0; 3], [1.0; 3], [x, 0.0, 0.0]);
    let (p00, p01, p10, p11) = (at(0.0), at(1.0), at(10.0), at(11.0));
    assert_eq!(SpatialPose::bi_nearest(&p00, &p01, &p10, &p11, 0.2, 0.8, 0.1), p00);
    assert_eq!(SpatialPose::bi_nearest(&p00, &p01, &p10, &p11, 0.2, 0.8, 0.7), p11);
}

#[test]
fn bi_linear_uses_both_row_params() {
    let at = |x: f32| SpatialPose::construct([0.0; 3], [1.0; 3], [x, 0.0, 0.0]);
    let (p00, p01, p10, p11) = (at(0.0), at(10.0), at(100.0), at(110.0));
    // row0 -> 2, row1 -> 108, then halfway -> 55
    let out = SpatialPose::bi_linear(&p00, &p01, &p10, &p11, 0.2, 0.8, 0.5);
    approx(out.translation[0], 55.0, 1e-4);
}

#[test]
fn bi_cubic_of_constant_grid_is_constant() {
    let p = sample_b();
    let grid = [[p; 4]; 4];
    let out = SpatialPose::bi_cubic(&grid, [0.1, 0.4, 0.6, 0.9], 0.3);
    approx_pose(&out, &p, 1e-4);
}

#[test]
fn matrix_of_identity_is_identity() {
    let m = SpatialPose::identity().to_matrix(EulerOrder::Xyz);
    for (c, col) in m.iter().enumerate() {
        for (r, v) in col.iter().enumerate() {
            approx(*v, if c == r { 1.0 } else { 0.0 }, 1e-6);
        }
    }
}

#[test]
fn serde_defaults_fill_missing_channels() {
    let p: SpatialPose = serde_json::from_str(r#"{"translation":[1,2,3]}"#).expect("parse");
    assert_eq!(p.scale, [1.0; 3]);
    assert_eq!(p.angles, [0.0; 3]);
    assert_eq!(p.translation, [1.0, 2.0, 3.0]);
}

#[test]
fn into_forms_write_the_value_result() {
    let a = sample_a();
    let b = sample_b();
    let c = SpatialPose::construct([5.0, 5.0, 5.0], [1.0, 2.0, 4.0], [0.0, 1.0, 0.0]);
    let mut out = SpatialPose::identity();

    assert_eq!(
        *SpatialPose::lerp_into(&mut out, &a, &b, 0.25),
        SpatialPose::lerp(&a, &b, 0.25)
    );
    assert_eq!(*SpatialPose::nearest_into(&mut out, &a, &b, 0.51), b);
    assert_eq!(
        *SpatialPose::smoothstep_into(&mut out, &a, &b, 0.3),
        SpatialPose::smoothstep(&a, &b, 0.3)
    );
    assert_eq!(*SpatialPose::concat_into(&mut out, &a, &b), a.concat(&b));
    assert_eq!(
        *SpatialPose::cubic_into(&mut out, &c, &a, &b, &c, 0.4),
        SpatialPose::cubic(&c, &a, &b, &c, 0.4)
    );
    SpatialPose::triangular_into(&mut out, &a, &b, &c, 0.2, 0.3);
    assert_eq!(out, SpatialPose::triangular(&a, &b, &c, 0.2, 0.3));
}
