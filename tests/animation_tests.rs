//! Animation clip and track tests
//!
//! Tests for:
//! - BoneTrack sampling: exact keyframes, interpolation, endpoint clamping
//! - Duplicate key times
//! - AnimationClip duration auto-computation
//! - AnimationAction defaults

use std::sync::Arc;

use animix::animation::{AnimationAction, AnimationClip, BoneTrack, CompositionFunction};
use animix::transform::Transform;
use glam::{Quat, Vec3};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn translation_track(bone_id: usize, keys: &[(f32, Vec3)]) -> BoneTrack {
    BoneTrack::new(
        bone_id,
        keys.iter().map(|&(time, _)| time).collect(),
        keys.iter()
            .map(|&(_, translation)| Transform::from_translation(translation))
            .collect(),
    )
}

// ============================================================================
// BoneTrack sampling
// ============================================================================

#[test]
fn track_samples_exact_keyframes() {
    let track = translation_track(
        0,
        &[
            (0.0, Vec3::ZERO),
            (1.0, Vec3::new(10.0, 0.0, 0.0)),
            (2.0, Vec3::new(20.0, 0.0, 0.0)),
        ],
    );

    assert!(vec3_approx(track.sample(0.0).translation, Vec3::ZERO));
    assert!(vec3_approx(track.sample(1.0).translation, Vec3::new(10.0, 0.0, 0.0)));
    assert!(vec3_approx(track.sample(2.0).translation, Vec3::new(20.0, 0.0, 0.0)));
}

#[test]
fn track_interpolates_between_keyframes() {
    let track = translation_track(0, &[(0.0, Vec3::ZERO), (1.0, Vec3::new(10.0, 4.0, 0.0))]);

    let mid = track.sample(0.5);
    assert!(vec3_approx(mid.translation, Vec3::new(5.0, 2.0, 0.0)));
}

#[test]
fn track_interpolates_rotation_spherically() {
    let track = BoneTrack::new(
        0,
        vec![0.0, 1.0],
        vec![
            Transform::IDENTITY,
            Transform::new(Quat::from_rotation_z(1.0), Vec3::ZERO),
        ],
    );

    let mid = track.sample(0.5).rotation;
    assert!(mid.dot(Quat::from_rotation_z(0.5)).abs() > 1.0 - EPSILON);
    assert!(approx_eq(mid.length(), 1.0));
}

#[test]
fn track_clamps_before_first_keyframe() {
    let track = translation_track(0, &[(1.0, Vec3::new(10.0, 0.0, 0.0)), (2.0, Vec3::new(20.0, 0.0, 0.0))]);
    assert!(vec3_approx(track.sample(0.5).translation, Vec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn track_clamps_after_last_keyframe() {
    let track = translation_track(0, &[(0.0, Vec3::ZERO), (1.0, Vec3::new(10.0, 0.0, 0.0))]);
    assert!(vec3_approx(track.sample(5.0).translation, Vec3::new(10.0, 0.0, 0.0)));
}

#[test]
fn track_handles_duplicate_key_times() {
    // A step discontinuity encoded as two keys at the same time: sampling
    // at the shared time takes the later key, with no division blowup.
    let track = translation_track(
        0,
        &[
            (0.0, Vec3::ZERO),
            (1.0, Vec3::new(10.0, 0.0, 0.0)),
            (1.0, Vec3::new(-10.0, 0.0, 0.0)),
        ],
    );

    let at_time = track.sample(1.0);
    assert!(vec3_approx(at_time.translation, Vec3::new(-10.0, 0.0, 0.0)));
}

#[test]
fn single_key_track_is_constant() {
    let track = translation_track(0, &[(0.5, Vec3::new(3.0, 0.0, 0.0))]);
    assert!(vec3_approx(track.sample(0.0).translation, Vec3::new(3.0, 0.0, 0.0)));
    assert!(vec3_approx(track.sample(9.0).translation, Vec3::new(3.0, 0.0, 0.0)));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_latest_track_end() {
    let clip = AnimationClip::new(
        "walk",
        vec![
            translation_track(0, &[(0.0, Vec3::ZERO), (1.5, Vec3::X)]),
            translation_track(1, &[(0.0, Vec3::ZERO), (2.25, Vec3::Y)]),
        ],
    );
    assert!(approx_eq(clip.duration, 2.25));
}

#[test]
fn empty_clip_has_zero_duration() {
    let clip = AnimationClip::new("empty", Vec::new());
    assert!(approx_eq(clip.duration, 0.0));
}

// ============================================================================
// AnimationAction
// ============================================================================

#[test]
fn action_defaults() {
    let clip = Arc::new(AnimationClip::new("idle", Vec::new()));
    let action = AnimationAction::new(Arc::clone(&clip));

    assert!(approx_eq(action.time, 0.0));
    assert!(approx_eq(action.weight, 1.0));
    assert!(approx_eq(action.scale, 1.0));
    assert!(approx_eq(action.ramp_value, 1.0));
    assert_eq!(action.composition(), CompositionFunction::Average);
    assert!(Arc::ptr_eq(action.clip(), &clip));
}
