//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! Every recoverable condition in the blend core is a lookup miss or a
//! capacity limit; both are reported as typed errors and are never fatal.
//! Invariant violations (for example a blend factor above one produced by
//! an unclamped ramp value) are programming errors and stay debug
//! assertions instead.

use thiserror::Error;

/// The main error type for the animation blending core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimixError {
    /// No animation action exists for the given clip.
    #[error("No animation action for clip: {0}")]
    ActionNotFound(String),

    /// An action already exists for the given clip; at most one action
    /// may exist per clip.
    #[error("Animation action already exists for clip: {0}")]
    ActionAlreadyExists(String),

    /// The bone-adjustment table is at capacity.
    #[error("Bone adjustment table full (capacity: {capacity})")]
    BoneAdjustmentsFull {
        /// Fixed capacity of the table
        capacity: usize,
    },

    /// No adjustment is registered for the given bone.
    #[error("No bone adjustment for bone: {0}")]
    BoneAdjustmentNotFound(usize),

    /// A bone's parent index does not precede the bone itself. The
    /// hierarchy pass relies on parent-before-child ordering.
    #[error("Invalid bone topology: bone {bone_id} has parent {parent_id}")]
    InvalidBoneTopology {
        /// The offending bone
        bone_id: usize,
        /// Its out-of-order parent
        parent_id: usize,
    },

    /// The submesh has no morph channel with the given name.
    #[error("Morph channel not found: {0}")]
    MorphChannelNotFound(String),
}

/// Alias for `Result<T, AnimixError>`.
pub type Result<T> = std::result::Result<T, AnimixError>;
