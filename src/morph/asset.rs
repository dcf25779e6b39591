use rustc_hash::FxHashMap;

/// Composition semantics of a morph target channel.
///
/// The kind is a property of the channel itself, so an exclusive blend
/// never competes with an average blend on the same channel; different
/// contributions all blend into the channel under one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphTargetKind {
    /// Contributions add their ramped scales; they do not compete, so
    /// relative weights are ignored.
    Additive,
    /// Additive, clamped to a weight of one.
    Clamped,
    /// Weighted running average, with one replace contribution allowed to
    /// attenuate all others on the channel.
    Exclusive,
    /// Weighted running average.
    Average,
}

/// A named morph target ("blend shape") channel of a submesh.
#[derive(Debug, Clone)]
pub struct MorphChannel {
    pub name: String,
    pub kind: MorphTargetKind,
    /// Exclusivity group, if the channel belongs to one.
    pub group: Option<usize>,
}

impl MorphChannel {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MorphTargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            group: None,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = Some(group);
        self
    }
}

/// The submesh asset's morph metadata: an ordered morph channel list.
///
/// Read-only once published; wrap in an `Arc` to share across submesh
/// instances.
#[derive(Debug, Clone)]
pub struct CoreSubmesh {
    channels: Vec<MorphChannel>,
    channel_index: FxHashMap<String, usize>,
}

impl CoreSubmesh {
    #[must_use]
    pub fn new(channels: Vec<MorphChannel>) -> Self {
        let channel_index = channels
            .iter()
            .enumerate()
            .map(|(index, channel)| (channel.name.clone(), index))
            .collect();

        Self {
            channels,
            channel_index,
        }
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[MorphChannel] {
        &self.channels
    }

    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Resolves a channel name to its id.
    #[must_use]
    pub fn channel_id(&self, name: &str) -> Option<usize> {
        self.channel_index.get(name).copied()
    }
}
