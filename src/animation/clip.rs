use crate::transform::{Transform, blend};

/// A single bone's keyframe track.
///
/// Keys are sorted by time; sampling clamps to the track's endpoints and
/// interpolates between the bracketing keys.
#[derive(Debug, Clone)]
pub struct BoneTrack {
    bone_id: usize,
    times: Vec<f32>,
    keys: Vec<Transform>,
}

impl BoneTrack {
    #[must_use]
    pub fn new(bone_id: usize, times: Vec<f32>, keys: Vec<Transform>) -> Self {
        assert_eq!(times.len(), keys.len(), "keyframe times and values must be parallel");
        assert!(!times.is_empty(), "track is empty");
        Self {
            bone_id,
            times,
            keys,
        }
    }

    /// Id of the bone this track animates.
    #[inline]
    #[must_use]
    pub fn bone_id(&self) -> usize {
        self.bone_id
    }

    /// Time of the last keyframe.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples the track at `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> Transform {
        // partition_point finds the first keyframe with a time greater
        // than `time`, i.e. the next keyframe.
        let next = self.times.partition_point(|&t| t <= time);
        if next == 0 {
            return self.keys[0];
        }
        if next == self.times.len() {
            return self.keys[next - 1];
        }

        let prev = next - 1;
        let t0 = self.times[prev];
        let t1 = self.times[next];
        let dt = t1 - t0;

        // Guard against duplicate key times.
        let factor = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        blend(factor.clamp(0.0, 1.0), self.keys[prev], self.keys[next])
    }
}

/// A shareable animation asset: one keyframe track per animated bone.
///
/// Read-only once published; wrap in an `Arc` so that many actions and
/// skeleton instances can sample it concurrently.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    /// Builds a clip; duration is the latest keyframe time of any track.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<BoneTrack>) -> Self {
        let duration = tracks
            .iter()
            .map(BoneTrack::end_time)
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}
