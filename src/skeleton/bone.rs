use glam::{Mat3, Vec3};

use crate::skeleton::CoreBone;
use crate::transform::{Transform, blend};

/// The per-bone output consumed by the skinning pass: a rotation-scale
/// matrix plus a translation, mapping bind-pose mesh space to posed mesh
/// space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinTransform {
    pub matrix: Mat3,
    pub translation: Vec3,
}

impl SkinTransform {
    pub const IDENTITY: Self = Self {
        matrix: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };
}

/// Per-instance bone state: the weighted blend accumulator and the
/// hierarchy propagation step.
///
/// Core fields are copied from the [`CoreBone`] at construction and never
/// change; the pose fields and accumulators are rewritten every frame.
#[derive(Debug, Clone)]
pub struct Bone {
    parent_id: Option<usize>,
    core_relative_transform: Transform,
    core_bone_space_transform: Transform,

    relative_transform: Transform,
    // Doubles as the scratch pose while a blend pass accumulates;
    // `calculate_state` rewrites it with the hierarchy-absolute pose.
    absolute_transform: Transform,

    // Weight locked in by previous passes this frame.
    accumulated_weight: f32,
    // Weight of the current, not yet finalized pass.
    accumulated_weight_absolute: f32,
    // Non-increasing within a pass; 1 = no replace contribution seen yet.
    accumulated_replacement_attenuation: f32,
    mesh_scale_absolute: Vec3,
}

impl Bone {
    #[must_use]
    pub fn new(core_bone: &CoreBone) -> Self {
        Self {
            parent_id: core_bone.parent_id,
            core_relative_transform: core_bone.relative_transform,
            core_bone_space_transform: core_bone.bone_space_transform,
            relative_transform: Transform::IDENTITY,
            absolute_transform: Transform::IDENTITY,
            accumulated_weight: 0.0,
            accumulated_weight_absolute: 0.0,
            accumulated_replacement_attenuation: 1.0,
            mesh_scale_absolute: Vec3::ONE,
        }
    }

    /// Resets the blend accumulators in preparation for a new frame.
    pub fn clear_state(&mut self) {
        self.accumulated_weight = 0.0;
        self.accumulated_weight_absolute = 0.0;
        self.accumulated_replacement_attenuation = 1.0;
        self.mesh_scale_absolute = Vec3::ONE;
    }

    #[inline]
    #[must_use]
    pub fn parent_id(&self) -> Option<usize> {
        self.parent_id
    }

    /// The blended pose relative to the parent bone.
    #[inline]
    #[must_use]
    pub fn relative_transform(&self) -> Transform {
        self.relative_transform
    }

    /// The model-space pose. Only valid after [`Bone::calculate_state`].
    #[inline]
    #[must_use]
    pub fn absolute_transform(&self) -> Transform {
        self.absolute_transform
    }

    /// Weight locked in by the finalized passes of the current frame.
    #[inline]
    #[must_use]
    pub fn accumulated_weight(&self) -> f32 {
        self.accumulated_weight
    }

    /// Sets the non-uniform scale applied to skin-space geometry bound to
    /// this bone. Reset to one by [`Bone::clear_state`].
    pub fn set_mesh_scale_absolute(&mut self, scale: Vec3) {
        self.mesh_scale_absolute = scale;
    }

    /// Folds one weighted contribution into the bone's running blend.
    ///
    /// Each applied "replace" contribution attenuates the weights of all
    /// subsequent contributions by the inverse of its ramp value, so a
    /// replace animation ramped up to full drives every lower-priority
    /// contribution's weight to zero.
    ///
    /// The first contribution of a pass is copied verbatim: it
    /// establishes the base pose at full scale. Later contributions blend
    /// in proportion to their attenuated weight relative to the running
    /// pass total. Each application gives the new contribution its
    /// correct share of the aggregate while leaving the proportions among
    /// the earlier ones intact, so by induction the result of non-replace
    /// contributions does not depend on application order.
    pub fn blend_state(&mut self, transform: Transform, replace: bool, ramp_value: f32) {
        let attenuated_weight = ramp_value * self.accumulated_replacement_attenuation;
        if replace {
            self.accumulated_replacement_attenuation *= 1.0 - ramp_value;
        }

        let first = self.accumulated_weight_absolute == 0.0;
        self.accumulated_weight_absolute += attenuated_weight;

        if first {
            // Scaling the first state would crumple the skeleton; blend
            // factors only apply once a base pose exists.
            self.absolute_transform = transform;
        } else {
            // Worked example, Wave played over Walk with Wave a "replace"
            // animation ramping in at 80%. Wave is applied first (replace
            // animations sort ahead of average ones):
            //
            //   Animation  Ramped  Attenuated  InAccum  OutAttenuation  Factor
            //   Wave       0.8     0.8         0.0      0.2 (replace)   (first)
            //   Walk       1.0     0.2         0.8      0.2             0.2/(0.8+0.2)
            //
            // Wave ends at 80% influence and Walk at 20%.
            let factor = attenuated_weight / self.accumulated_weight_absolute;
            debug_assert!(factor <= 1.0);
            self.absolute_transform = blend(factor, self.absolute_transform, transform);
        }
    }

    /// Finalizes the bone for this frame and derives its skin transform.
    ///
    /// Folds the pass accumulator into the locked relative pose (bind
    /// pose if nothing contributed all frame), composes with the parent's
    /// absolute transform, and returns the bone-space skin transform.
    ///
    /// `parent_absolute` must be the parent's already finalized absolute
    /// transform, or `None` for root bones; callers walk the bone array
    /// in index order, which is parent-before-child by construction.
    pub fn calculate_state(&mut self, parent_absolute: Option<Transform>) -> SkinTransform {
        // The pass total never pushes the locked weight past one.
        if self.accumulated_weight_absolute > 1.0 - self.accumulated_weight {
            self.accumulated_weight_absolute = 1.0 - self.accumulated_weight;
        }

        if self.accumulated_weight_absolute > 0.0 {
            if self.accumulated_weight == 0.0 {
                // First pass of the frame: copy, don't blend.
                self.relative_transform = self.absolute_transform;
                self.accumulated_weight = self.accumulated_weight_absolute;
            } else {
                let factor = self.accumulated_weight_absolute
                    / (self.accumulated_weight + self.accumulated_weight_absolute);
                self.relative_transform =
                    blend(factor, self.relative_transform, self.absolute_transform);
                self.accumulated_weight += self.accumulated_weight_absolute;
            }

            self.accumulated_weight_absolute = 0.0;
        }

        if self.accumulated_weight == 0.0 {
            // Untouched by any active animation: fall back to bind pose.
            self.relative_transform = self.core_relative_transform;
        }

        self.absolute_transform = match parent_absolute {
            None => self.relative_transform,
            Some(parent) => parent * self.relative_transform,
        };

        // Derive the bone-space skin transform.
        let rotation_bone_space = self.core_bone_space_transform.rotation;
        let mut translation_bone_space = self.core_bone_space_transform.translation;
        let mut matrix = Mat3::from_quat(rotation_bone_space);

        let mesh_scaling_on = self.mesh_scale_absolute != Vec3::ONE;
        if mesh_scaling_on {
            // The scale targets mesh-space geometry, so it has to land
            // before the bone-space rotation; scaling after it would
            // shear. Re-express the bind translation through the inverse
            // rotation, scale, and rotate back.
            translation_bone_space = rotation_bone_space
                * ((rotation_bone_space.inverse() * translation_bone_space)
                    * self.mesh_scale_absolute);

            // Scaling the matrix columns applies the scale prior to the
            // bone-space rotation.
            matrix *= Mat3::from_diagonal(self.mesh_scale_absolute);
        }

        SkinTransform {
            matrix: Mat3::from_quat(self.absolute_transform.rotation) * matrix,
            translation: self.absolute_transform * translation_bone_space,
        }
    }
}
