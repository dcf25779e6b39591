mod asset;
mod bone;

pub use asset::{CoreBone, CoreSkeleton};
pub use bone::{Bone, SkinTransform};

/// A skeleton instance: per-bone pose state for one animated character.
///
/// Bones are stored in the asset's order, parents before children, so a
/// single forward walk suffices to propagate the hierarchy.
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    skin_transforms: Vec<SkinTransform>,
}

impl Skeleton {
    #[must_use]
    pub fn new(core: &CoreSkeleton) -> Self {
        let bones: Vec<Bone> = core.bones().iter().map(Bone::new).collect();
        let skin_transforms = vec![SkinTransform::IDENTITY; bones.len()];
        Self {
            bones,
            skin_transforms,
        }
    }

    /// Resets every bone's blend accumulators for a new frame.
    pub fn clear_state(&mut self) {
        for bone in &mut self.bones {
            bone.clear_state();
        }
    }

    /// Finalizes every bone for the frame, in parent-before-child order,
    /// refreshing the skin transform array.
    pub fn calculate_state(&mut self) {
        for bone_id in 0..self.bones.len() {
            // Parents precede children, so the parent's absolute
            // transform is already final when the child reads it.
            let parent_absolute = self.bones[bone_id]
                .parent_id()
                .map(|parent_id| self.bones[parent_id].absolute_transform());
            self.skin_transforms[bone_id] = self.bones[bone_id].calculate_state(parent_absolute);
        }
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, bone_id: usize) -> Option<&Bone> {
        self.bones.get(bone_id)
    }

    #[inline]
    pub fn bone_mut(&mut self, bone_id: usize) -> Option<&mut Bone> {
        self.bones.get_mut(bone_id)
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// The final per-bone skin transforms computed by the last
    /// [`Skeleton::calculate_state`], indexed by bone id.
    #[inline]
    #[must_use]
    pub fn skin_transforms(&self) -> &[SkinTransform] {
        &self.skin_transforms
    }
}
