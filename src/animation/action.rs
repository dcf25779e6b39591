use std::sync::Arc;

use crate::animation::clip::AnimationClip;

/// Controls how an action composes with other simultaneously playing
/// actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionFunction {
    /// Attenuates every lower-priority contribution by the inverse of
    /// this action's ramp value. Fully ramped in, it masks them entirely.
    Replace,
    /// Replace-style attenuation, intended for smooth transition blending
    /// rather than a lasting override.
    CrossFade,
    /// Plain weighted averaging; never attenuates other contributions.
    Average,
}

/// A manually driven animation instance ("action").
///
/// At most one action exists per clip. An action ramped to zero retains
/// its state (time, amplitude) while having no effect on the skeleton.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    /// Local playback time the clip's tracks are sampled at.
    pub time: f32,
    /// Relative blend weight, read by morph-channel drivers. Skeletal
    /// blending derives its factors from `ramp_value`.
    pub weight: f32,
    /// Amplitude of the animation; scales the sampled translations. An
    /// action with zero scale still competes for influence, it just
    /// contributes a null displacement.
    pub scale: f32,
    /// How far the action has faded in, in `[0, 1]`.
    pub ramp_value: f32,

    // Changed only through the mixer, which reorders the action list.
    pub(crate) composition: CompositionFunction,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            scale: 1.0,
            ramp_value: 1.0,
            composition: CompositionFunction::Average,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn composition(&self) -> CompositionFunction {
        self.composition
    }
}

/// The full attribute set, for setting every action property in one call.
#[derive(Debug, Clone, Copy)]
pub struct ManualAnimationAttributes {
    pub time: f32,
    pub weight: f32,
    pub scale: f32,
    pub ramp_value: f32,
    pub composition: CompositionFunction,
}
