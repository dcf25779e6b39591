use std::sync::Arc;

use crate::errors::{AnimixError, Result};
use crate::morph::asset::{CoreSubmesh, MorphTargetKind};

// For Exclusive channels, a replacement attenuation is recorded after the
// first replace blend of a pass. Until then the slot holds this value,
// which is any number not between zero and one.
const REPLACEMENT_ATTENUATION_UNSET: f32 = 100.0;

/// Per-submesh morph blend state: weighted accumulation of morph channel
/// weights, with per-channel composition semantics.
///
/// The resolved weight array, together with the implicit base weight, is
/// consumed by the skinning pass.
#[derive(Debug, Clone)]
pub struct Submesh {
    core: Arc<CoreSubmesh>,

    weights: Vec<f32>,
    // Blend-pass scratch, mirroring the bone accumulator semantics.
    accumulated_weights: Vec<f32>,
    replacement_attenuations: Vec<f32>,

    // Indexed by group id; groups never outnumber the channels.
    group_attenuators: Vec<Option<usize>>,
    group_attenuations: Vec<f32>,
}

impl Submesh {
    #[must_use]
    pub fn new(core: Arc<CoreSubmesh>) -> Self {
        let count = core.channel_count();
        Self {
            core,
            weights: vec![0.0; count],
            accumulated_weights: vec![0.0; count],
            replacement_attenuations: vec![REPLACEMENT_ATTENUATION_UNSET; count],
            group_attenuators: vec![None; count],
            group_attenuations: vec![0.0; count],
        }
    }

    #[must_use]
    pub fn core(&self) -> &Arc<CoreSubmesh> {
        &self.core
    }

    // ========================================================================
    // Exclusivity groups
    // ========================================================================

    /// Designates, per group, the channel exempt from group attenuation.
    /// `None` leaves a group non-exclusive.
    pub fn set_group_attenuators(&mut self, attenuators: &[Option<usize>]) {
        debug_assert!(attenuators.len() <= self.group_attenuators.len());
        for (slot, attenuator) in self.group_attenuators.iter_mut().zip(attenuators) {
            *slot = *attenuator;
        }
    }

    /// Publishes, per group, the attenuation factor applied to the
    /// group's non-attenuator members for the coming pass.
    pub fn set_group_attenuations(&mut self, attenuations: &[f32]) {
        debug_assert!(attenuations.len() <= self.group_attenuations.len());
        for (slot, attenuation) in self.group_attenuations.iter_mut().zip(attenuations) {
            *slot = *attenuation;
        }
    }

    // ========================================================================
    // Blending
    // ========================================================================

    /// Blends one contribution into the named channel according to the
    /// channel's composition kind.
    ///
    /// `scale` is the contribution's amplitude, `unramped_weight` its
    /// relative blend weight before ramping, `ramp_value` how far the
    /// contributing animation has faded in, and `replace` whether the
    /// contribution claims replace semantics (Exclusive channels only).
    pub fn blend_morph_target_scale(
        &mut self,
        name: &str,
        scale: f32,
        unramped_weight: f32,
        ramp_value: f32,
        replace: bool,
    ) -> Result<()> {
        let channel_id = self
            .core
            .channel_id(name)
            .ok_or_else(|| AnimixError::MorphChannelNotFound(name.to_string()))?;
        let channel = &self.core.channels()[channel_id];

        match channel.kind {
            MorphTargetKind::Additive => {
                self.weights[channel_id] += scale * ramp_value;
            }
            MorphTargetKind::Clamped => {
                self.weights[channel_id] += scale * ramp_value;
                if self.weights[channel_id] > 1.0 {
                    self.weights[channel_id] = 1.0;
                }
            }
            MorphTargetKind::Exclusive | MorphTargetKind::Average => {
                let mut attenuated_weight = unramped_weight * ramp_value;

                if let Some(group) = channel.group {
                    if let Some(attenuator) = self.group_attenuators[group] {
                        if attenuator == channel_id {
                            // The attenuator is exempt. Earlier
                            // accumulation needs no retroactive fixup: the
                            // published group factor covers the whole
                            // pass, and the replace flag was already taken
                            // into account when the attenuator was chosen.
                            self.replacement_attenuations[channel_id] = 1.0 - ramp_value;
                        } else {
                            attenuated_weight *= self.group_attenuations[group];
                        }
                    }
                } else if channel.kind == MorphTargetKind::Exclusive {
                    // One replace contribution, chosen arbitrarily (the
                    // first one seen), attenuates all others on the
                    // channel. Unlike bone blending, attenuations do not
                    // compound across multiple replace contributions:
                    // morph contributions arrive in arbitrary order, not
                    // priority order, so exact replace semantics are not
                    // available here. Without a replace contribution the
                    // channel behaves like an Average one.
                    if self.replacement_attenuations[channel_id] != REPLACEMENT_ATTENUATION_UNSET {
                        attenuated_weight *= self.replacement_attenuations[channel_id];
                    } else if replace {
                        let attenuation = 1.0 - ramp_value;
                        self.replacement_attenuations[channel_id] = attenuation;
                        self.weights[channel_id] *= attenuation;
                        self.accumulated_weights[channel_id] *= attenuation;
                    }
                }

                // The same running weighted average as the bone
                // accumulator: the first contribution assigns its full
                // ramped scale, later ones blend by their share of the
                // pass total. The influence of each contribution comes
                // out as scale * ramp * (weight / sum of weights).
                let ramped_scale = scale * ramp_value;
                if self.accumulated_weights[channel_id] == 0.0 {
                    self.weights[channel_id] = ramped_scale;
                } else {
                    let factor =
                        attenuated_weight / (self.accumulated_weights[channel_id] + attenuated_weight);
                    self.weights[channel_id] =
                        self.weights[channel_id] * (1.0 - factor) + ramped_scale * factor;
                }
                self.accumulated_weights[channel_id] += attenuated_weight;
            }
        }

        Ok(())
    }

    /// Resets every channel in preparation for a new blend pass.
    ///
    /// [`Submesh::blend_morph_target_scale`] and
    /// [`Submesh::set_morph_target_weight`] both drive a channel's
    /// influence, but with different composition behavior; use one or the
    /// other between clears.
    pub fn clear_morph_target_scales(&mut self) {
        for channel_id in 0..self.weights.len() {
            self.weights[channel_id] = 0.0;
            self.accumulated_weights[channel_id] = 0.0;
            self.replacement_attenuations[channel_id] = REPLACEMENT_ATTENUATION_UNSET;
        }
    }

    /// Resets a single named channel.
    pub fn clear_morph_target_state(&mut self, name: &str) -> Result<()> {
        let channel_id = self
            .core
            .channel_id(name)
            .ok_or_else(|| AnimixError::MorphChannelNotFound(name.to_string()))?;

        self.weights[channel_id] = 0.0;
        self.accumulated_weights[channel_id] = 0.0;
        self.replacement_attenuations[channel_id] = REPLACEMENT_ATTENUATION_UNSET;
        Ok(())
    }

    // ========================================================================
    // Weight access
    // ========================================================================

    /// Sets a channel's weight directly, bypassing blend composition.
    pub fn set_morph_target_weight(&mut self, channel_id: usize, weight: f32) {
        self.weights[channel_id] = weight;
    }

    /// Sets a channel's weight by name, bypassing blend composition.
    pub fn set_morph_target_weight_by_name(&mut self, name: &str, weight: f32) -> Result<()> {
        let channel_id = self
            .core
            .channel_id(name)
            .ok_or_else(|| AnimixError::MorphChannelNotFound(name.to_string()))?;
        self.weights[channel_id] = weight;
        Ok(())
    }

    #[must_use]
    pub fn morph_target_weight(&self, channel_id: usize) -> f32 {
        self.weights[channel_id]
    }

    #[must_use]
    pub fn morph_target_weight_by_name(&self, name: &str) -> Option<f32> {
        self.core.channel_id(name).map(|id| self.weights[id])
    }

    /// The resolved per-channel weight array, indexed by channel id.
    #[inline]
    #[must_use]
    pub fn morph_target_weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline]
    #[must_use]
    pub fn morph_target_weight_count(&self) -> usize {
        self.weights.len()
    }

    /// Nonzero channel weights as `(channel_id, weight)` pairs, for the
    /// skinning consumer.
    #[must_use]
    pub fn active_morphs(&self) -> Vec<(usize, f32)> {
        self.weights
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, weight)| weight != 0.0)
            .collect()
    }

    /// The implicit weight of the base (unmorphed) vertices: one minus
    /// the sum of the channel weights.
    #[must_use]
    pub fn base_weight(&self) -> f32 {
        1.0 - self.weights.iter().sum::<f32>()
    }
}
