use std::sync::Arc;

use armature_animation::{
    sample_clip_pose, AnimationError, AnimationLibrary, Clip, ClipController, ClipPool,
    ClipPoolId, Config, KeyframePool, SampleMode,
};
use armature_pose::{Hierarchy, HierarchyState, PoseGroup};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn skeleton() -> Arc<Hierarchy> {
    let json = armature_test_fixtures::skeletons::json("biped-lite").expect("fixture");
    Arc::new(serde_json::from_str(&json).expect("skeleton"))
}

/// Four poses whose every node is translated along x by 0, 10, 20 and 30.
fn line_group(hierarchy: Arc<Hierarchy>) -> PoseGroup {
    let mut group = PoseGroup::new(hierarchy, 4).expect("group");
    for (k, mut pose) in group.poses_mut().enumerate() {
        pose.construct([0.0; 3], [1.0; 3], [k as f32 * 10.0, 0.0, 0.0]);
    }
    group
}

fn library(samples: &[u32]) -> (AnimationLibrary, ClipPoolId) {
    let mut lib = AnimationLibrary::new();
    let mut kf = KeyframePool::new("kf");
    for s in samples {
        kf.push(1.0, *s).expect("keyframe");
    }
    let kf_id = lib.add_keyframe_pool(kf);
    let mut clips = ClipPool::new("clips");
    clips.push(Clip::new("line", kf_id, 0, samples.len() - 1).expect("clip"));
    let pool = lib.add_clip_pool(clips);
    lib.compute_clip_duration(pool, 0).expect("timed");
    (lib, pool)
}

fn sampled_x(
    lib: &AnimationLibrary,
    controller: &ClipController,
    group: &PoseGroup,
    mode: SampleMode,
) -> f32 {
    let mut state = HierarchyState::new(Arc::clone(group.hierarchy()));
    sample_clip_pose(lib, controller, group, mode, &mut state.sample_pose_mut())
        .expect("sampled");
    let x = state.sample_pose()[0].translation[0];
    for node in state.sample_pose().iter() {
        assert_eq!(node.translation[0], x, "nodes blend independently but equally here");
    }
    x
}

#[test]
fn modes_between_neighbouring_keyframes() {
    let group = line_group(skeleton());
    let (lib, pool) = library(&[0, 1, 2, 3]);
    let mut c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();
    c.update(&lib, 1.5).unwrap();
    assert_eq!(c.keyframe(), 1);

    approx(sampled_x(&lib, &c, &group, SampleMode::Step), 10.0, 1e-5);
    approx(sampled_x(&lib, &c, &group, SampleMode::Nearest), 20.0, 1e-5);
    approx(sampled_x(&lib, &c, &group, SampleMode::Linear), 15.0, 1e-5);
    approx(sampled_x(&lib, &c, &group, SampleMode::Smoothstep), 15.0, 1e-5);
    approx(sampled_x(&lib, &c, &group, SampleMode::Cubic), 15.0, 1e-4);
}

#[test]
fn smoothstep_eases_off_the_midpoint() {
    let group = line_group(skeleton());
    let (lib, pool) = library(&[0, 1]);
    let mut c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();
    c.update(&lib, 0.25).unwrap();
    approx(sampled_x(&lib, &c, &group, SampleMode::Linear), 2.5, 1e-5);
    approx(sampled_x(&lib, &c, &group, SampleMode::Smoothstep), 1.5625, 1e-5);
}

#[test]
fn last_keyframe_blends_toward_first() {
    let group = line_group(skeleton());
    let (lib, pool) = library(&[0, 1, 2, 3]);
    let mut c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();
    c.update(&lib, 3.5).unwrap();
    assert_eq!(c.keyframe(), 3);
    approx(sampled_x(&lib, &c, &group, SampleMode::Linear), 15.0, 1e-5);
}

#[test]
fn out_of_range_sample_is_an_error() {
    let group = line_group(skeleton());
    let (lib, pool) = library(&[0, 9]);
    let mut c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();
    c.update(&lib, 0.5).unwrap();
    let mut state = HierarchyState::new(Arc::clone(group.hierarchy()));
    let err = sample_clip_pose(
        &lib,
        &c,
        &group,
        SampleMode::Linear,
        &mut state.sample_pose_mut(),
    )
    .unwrap_err();
    assert_eq!(err, AnimationError::SampleOutOfRange { sample: 9, count: 4 });
    // step mode only reads the current keyframe
    assert!(sample_clip_pose(
        &lib,
        &c,
        &group,
        SampleMode::Step,
        &mut state.sample_pose_mut()
    )
    .is_ok());
}

#[test]
fn sample_then_commit_then_object_space() {
    let hierarchy = skeleton();
    let group = line_group(Arc::clone(&hierarchy));
    let (lib, pool) = library(&[1, 2]);
    let c = ClipController::new("c", &lib, pool, 0, &Config::default()).unwrap();

    let mut state = HierarchyState::new(hierarchy);
    sample_clip_pose(&lib, &c, &group, SampleMode::Linear, &mut state.sample_pose_mut())
        .unwrap();
    state.commit_sample();
    state.update_object_space();

    let shin_l = state.hierarchy().index_of("shin_l").expect("node");
    assert_eq!(state.local_space_pose()[shin_l].translation[0], 10.0);
    // pelvis -> thigh_l -> shin_l accumulates three local offsets
    assert_eq!(state.object_space_pose()[shin_l].translation[0], 30.0);
}
