use std::sync::Arc;

use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::animation::action::{AnimationAction, CompositionFunction, ManualAnimationAttributes};
use crate::animation::clip::AnimationClip;
use crate::errors::{AnimixError, Result};
use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// Capacity of the bone-adjustment table.
pub const MAX_BONE_ADJUSTMENTS: usize = 20;

bitflags::bitflags! {
    /// Selects which parts of a [`BoneAdjustment`] are applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BoneAdjustmentFlags: u32 {
        /// Apply `mesh_scale_absolute` to the bone's skin transform.
        const MESH_SCALE = 1 << 0;
        /// Blend `local_position`/`local_orientation` into the bone pose.
        const POS_ROT = 1 << 1;
    }
}

/// A procedural per-bone override, blended in ahead of every action.
#[derive(Debug, Clone, Copy)]
pub struct BoneAdjustment {
    pub flags: BoneAdjustmentFlags,
    pub mesh_scale_absolute: Vec3,
    pub local_position: Vec3,
    pub local_orientation: Quat,
    pub ramp_value: f32,
}

impl Default for BoneAdjustment {
    fn default() -> Self {
        Self {
            flags: BoneAdjustmentFlags::empty(),
            mesh_scale_absolute: Vec3::ONE,
            local_position: Vec3::ZERO,
            local_orientation: Quat::IDENTITY,
            ramp_value: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoneAdjustmentEntry {
    bone_id: usize,
    adjustment: BoneAdjustment,
}

/// Blends all active animation actions and bone adjustments into a single
/// skeleton pose, once per frame.
///
/// The action list's order is its priority, front first: Replace and
/// CrossFade actions sort ahead of Average ones, and within a class the
/// most recently (re)inserted action wins. Bone adjustments outrank every
/// action. All ordering mutations happen through explicit calls between
/// frames, never during [`AnimationMixer::update_skeleton`].
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    bone_adjustments: SmallVec<[BoneAdjustmentEntry; MAX_BONE_ADJUSTMENTS]>,

    animation_time: f32,
    animation_duration: f32,
    time_factor: f32,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            bone_adjustments: SmallVec::new(),
            animation_time: 0.0,
            animation_duration: 0.0,
            time_factor: 1.0,
        }
    }

    // ========================================================================
    // Action lookup
    // ========================================================================

    fn action_index(&self, clip: &Arc<AnimationClip>) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| Arc::ptr_eq(action.clip(), clip))
    }

    fn action_mut(&mut self, clip: &Arc<AnimationClip>) -> Result<&mut AnimationAction> {
        let index = self
            .action_index(clip)
            .ok_or_else(|| AnimixError::ActionNotFound(clip.name.clone()))?;
        Ok(&mut self.actions[index])
    }

    /// The active action for a clip, if any.
    #[must_use]
    pub fn animation_action(&self, clip: &Arc<AnimationClip>) -> Option<&AnimationAction> {
        self.action_index(clip).map(|index| &self.actions[index])
    }

    /// Whether an action currently exists for the clip.
    #[must_use]
    pub fn action_on(&self, clip: &Arc<AnimationClip>) -> bool {
        self.action_index(clip).is_some()
    }

    /// All active actions, in priority order (highest first).
    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    // ========================================================================
    // Manual animation lifecycle
    // ========================================================================

    /// Adds a manual action for this clip.
    ///
    /// Only one action can exist per clip; a second add for the same clip
    /// fails without creating a duplicate.
    pub fn add_manual_animation(&mut self, clip: &Arc<AnimationClip>) -> Result<()> {
        if self.action_on(clip) {
            return Err(AnimixError::ActionAlreadyExists(clip.name.clone()));
        }

        log::debug!("adding manual animation action for clip '{}'", clip.name);
        let action = AnimationAction::new(Arc::clone(clip));
        self.insert_by_composition(action);
        Ok(())
    }

    /// Removes the action for this clip.
    pub fn remove_manual_animation(&mut self, clip: &Arc<AnimationClip>) -> Result<()> {
        let index = self
            .action_index(clip)
            .ok_or_else(|| AnimixError::ActionNotFound(clip.name.clone()))?;

        log::debug!("removing animation action for clip '{}'", clip.name);
        self.actions.remove(index);
        Ok(())
    }

    /// Stops the action for this clip, removing it from the mixer.
    pub fn stop_action(&mut self, clip: &Arc<AnimationClip>) -> Result<()> {
        self.remove_manual_animation(clip)
    }

    // ========================================================================
    // Action attribute setters
    // ========================================================================

    /// Sets the local playback time of the action.
    pub fn set_manual_animation_time(&mut self, clip: &Arc<AnimationClip>, time: f32) -> Result<()> {
        self.action_mut(clip)?.time = time;
        Ok(())
    }

    /// Sets the relative blend weight of the action.
    pub fn set_manual_animation_weight(
        &mut self,
        clip: &Arc<AnimationClip>,
        weight: f32,
    ) -> Result<()> {
        self.action_mut(clip)?.weight = weight;
        Ok(())
    }

    /// Sets the amplitude scale of the action. The scale is distinct from
    /// the weight: weight controls relative influence among actions,
    /// scale controls the amplitude of what this action contributes.
    pub fn set_manual_animation_scale(
        &mut self,
        clip: &Arc<AnimationClip>,
        scale: f32,
    ) -> Result<()> {
        self.action_mut(clip)?.scale = scale;
        Ok(())
    }

    /// Sets the ramp value of the action, in `[0, 1]`.
    pub fn set_manual_animation_ramp_value(
        &mut self,
        clip: &Arc<AnimationClip>,
        ramp_value: f32,
    ) -> Result<()> {
        self.action_mut(clip)?.ramp_value = ramp_value;
        Ok(())
    }

    /// Sets the composition function, which controls how the action
    /// blends with other simultaneous actions.
    ///
    /// Priority is, firstly, whether an action is Replace/CrossFade or
    /// not, and secondly how recently it was (re)inserted, the most
    /// recent insertion winning. Setting the value an action already has
    /// keeps its current position, so an action is not needlessly
    /// promoted within its class.
    pub fn set_manual_animation_composition_function(
        &mut self,
        clip: &Arc<AnimationClip>,
        composition: CompositionFunction,
    ) -> Result<()> {
        let index = self
            .action_index(clip)
            .ok_or_else(|| AnimixError::ActionNotFound(clip.name.clone()))?;
        self.set_composition_at(index, composition);
        Ok(())
    }

    /// Sets every attribute of the action in one call.
    pub fn set_manual_animation_attributes(
        &mut self,
        clip: &Arc<AnimationClip>,
        attributes: ManualAnimationAttributes,
    ) -> Result<()> {
        let index = self
            .action_index(clip)
            .ok_or_else(|| AnimixError::ActionNotFound(clip.name.clone()))?;

        let action = &mut self.actions[index];
        action.time = attributes.time;
        action.weight = attributes.weight;
        action.scale = attributes.scale;
        action.ramp_value = attributes.ramp_value;

        self.set_composition_at(index, attributes.composition);
        Ok(())
    }

    fn set_composition_at(&mut self, index: usize, composition: CompositionFunction) {
        if self.actions[index].composition == composition {
            return;
        }

        // Remove and reinsert as one logical step.
        let mut action = self.actions.remove(index);
        action.composition = composition;
        self.insert_by_composition(action);
    }

    /// Inserts per the priority rule: Replace at the front, CrossFade
    /// after the last Replace, Average before the first existing Average.
    fn insert_by_composition(&mut self, action: AnimationAction) {
        let position = match action.composition {
            CompositionFunction::Replace => 0,
            CompositionFunction::CrossFade => self
                .actions
                .iter()
                .position(|other| other.composition != CompositionFunction::Replace)
                .unwrap_or(self.actions.len()),
            CompositionFunction::Average => self
                .actions
                .iter()
                .position(|other| other.composition == CompositionFunction::Average)
                .unwrap_or(self.actions.len()),
        };
        self.actions.insert(position, action);
    }

    // ========================================================================
    // Bone adjustments
    // ========================================================================

    /// Registers a procedural adjustment for a bone.
    ///
    /// The table is capacity-bounded; when full, the adjustment is
    /// rejected and the caller decides what to drop.
    pub fn add_bone_adjustment(&mut self, bone_id: usize, adjustment: BoneAdjustment) -> Result<()> {
        if self.bone_adjustments.len() == MAX_BONE_ADJUSTMENTS {
            log::warn!("bone adjustment table full; rejecting adjustment for bone {bone_id}");
            return Err(AnimixError::BoneAdjustmentsFull {
                capacity: MAX_BONE_ADJUSTMENTS,
            });
        }

        self.bone_adjustments.push(BoneAdjustmentEntry {
            bone_id,
            adjustment,
        });
        Ok(())
    }

    /// Removes the adjustment registered for the bone.
    pub fn remove_bone_adjustment(&mut self, bone_id: usize) -> Result<()> {
        let index = self
            .bone_adjustments
            .iter()
            .position(|entry| entry.bone_id == bone_id)
            .ok_or(AnimixError::BoneAdjustmentNotFound(bone_id))?;
        self.bone_adjustments.remove(index);
        Ok(())
    }

    /// Drops all registered bone adjustments.
    pub fn remove_all_bone_adjustments(&mut self) {
        self.bone_adjustments.clear();
    }

    #[must_use]
    pub fn bone_adjustment_count(&self) -> usize {
        self.bone_adjustments.len()
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Advances the shared animation time by `delta_time`, scaled by the
    /// time factor and wrapped into `[0, duration)`. A negative time
    /// factor plays backwards; a zero duration pins the time to zero.
    pub fn update_animation(&mut self, delta_time: f32) {
        if self.animation_duration == 0.0 {
            self.animation_time = 0.0;
        } else {
            self.animation_time += delta_time * self.time_factor;
            self.animation_time %= self.animation_duration;
            if self.animation_time < 0.0 {
                self.animation_time += self.animation_duration;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn animation_time(&self) -> f32 {
        self.animation_time
    }

    pub fn set_animation_time(&mut self, animation_time: f32) {
        self.animation_time = animation_time;
    }

    #[inline]
    #[must_use]
    pub fn animation_duration(&self) -> f32 {
        self.animation_duration
    }

    pub fn set_animation_duration(&mut self, animation_duration: f32) {
        self.animation_duration = animation_duration;
    }

    #[inline]
    #[must_use]
    pub fn time_factor(&self) -> f32 {
        self.time_factor
    }

    pub fn set_time_factor(&mut self, time_factor: f32) {
        self.time_factor = time_factor;
    }

    // ========================================================================
    // Per-frame pose
    // ========================================================================

    /// Computes the frame's pose: clears all bone state, applies bone
    /// adjustments, feeds every action's tracks to the bone blend
    /// accumulators in priority order, then finalizes the hierarchy.
    pub fn update_skeleton(&self, skeleton: &mut Skeleton) {
        skeleton.clear_state();

        // Adjustments blend as "replace" at full unramped weight, so they
        // go first: highest priority, with subsequent animations on the
        // same bones attenuated accordingly.
        self.apply_bone_adjustments(skeleton);

        for action in &self.actions {
            // Replace and CrossFade both blend with the replace function.
            let replace = action.composition != CompositionFunction::Average;

            for track in &action.clip().tracks {
                let Some(bone) = skeleton.bone_mut(track.bone_id()) else {
                    continue;
                };

                let mut sampled = track.sample(action.time);
                sampled.translation *= action.scale;
                bone.blend_state(sampled, replace, action.ramp_value);
            }
        }

        skeleton.calculate_state();
    }

    fn apply_bone_adjustments(&self, skeleton: &mut Skeleton) {
        for entry in &self.bone_adjustments {
            let Some(bone) = skeleton.bone_mut(entry.bone_id) else {
                continue;
            };

            let adjustment = &entry.adjustment;
            if adjustment.flags.contains(BoneAdjustmentFlags::MESH_SCALE) {
                bone.set_mesh_scale_absolute(adjustment.mesh_scale_absolute);
            }
            if adjustment.flags.contains(BoneAdjustmentFlags::POS_ROT) {
                let transform =
                    Transform::new(adjustment.local_orientation, adjustment.local_position);
                bone.blend_state(transform, true, adjustment.ramp_value);
            }
        }
    }
}
