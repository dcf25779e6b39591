use crate::errors::{AnimixError, Result};
use crate::transform::Transform;

/// A bone of the skeleton asset. Read-only once published.
#[derive(Debug, Clone)]
pub struct CoreBone {
    pub name: String,
    /// Parent bone index; `None` for root bones. Parents always precede
    /// their children in the skeleton's bone array.
    pub parent_id: Option<usize>,
    /// Bind-pose transform relative to the parent bone.
    pub relative_transform: Transform,
    /// Transform from mesh space into this bone's space at bind time.
    pub bone_space_transform: Transform,
}

/// The skeleton asset: an ordered bone array, parents before children.
///
/// Shared read-only across skeleton instances; wrap in an `Arc` to share.
#[derive(Debug, Clone)]
pub struct CoreSkeleton {
    bones: Vec<CoreBone>,
}

impl CoreSkeleton {
    /// Builds a skeleton asset, validating that every parent index refers
    /// to an earlier bone. A single pass over the bone array can then
    /// evaluate the hierarchy without revisiting any bone.
    pub fn new(bones: Vec<CoreBone>) -> Result<Self> {
        for (bone_id, bone) in bones.iter().enumerate() {
            if let Some(parent_id) = bone.parent_id
                && parent_id >= bone_id
            {
                return Err(AnimixError::InvalidBoneTopology { bone_id, parent_id });
            }
        }
        Ok(Self { bones })
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[CoreBone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
