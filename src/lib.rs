#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::float_cmp)]

//! Runtime blending core for skeletal character animation.
//!
//! Combines simultaneously playing animation actions, procedural bone
//! adjustments, and morph target channels into one coherent pose per
//! frame: an [`AnimationMixer`] feeds weighted contributions into each
//! bone's blend accumulator in priority order, a hierarchy pass turns the
//! blended relative poses into absolute and skin transforms, and
//! [`Submesh`] resolves morph channel weights with per-channel
//! composition semantics.

pub mod animation;
pub mod errors;
pub mod morph;
pub mod skeleton;
pub mod transform;

pub use animation::{
    AnimationAction, AnimationClip, AnimationMixer, BoneAdjustment, BoneAdjustmentFlags, BoneTrack,
    CompositionFunction, MAX_BONE_ADJUSTMENTS, ManualAnimationAttributes,
};
pub use errors::{AnimixError, Result};
pub use morph::{CoreSubmesh, MorphChannel, MorphTargetKind, Submesh};
pub use skeleton::{Bone, CoreBone, CoreSkeleton, Skeleton, SkinTransform};
pub use transform::{Transform, blend};
