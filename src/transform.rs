use glam::{Quat, Vec3};

/// A rigid transform: a rotation followed by a translation.
///
/// This is the algebraic foundation for bone poses and skin transforms.
/// Composition `outer * inner` means "apply `inner`, then `outer`", so a
/// child bone's absolute pose is `parent_absolute * child_relative`.
///
/// Immutable value type; copied freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    #[must_use]
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    /// Transforms a point.
    #[inline]
    #[must_use]
    pub fn transform_point(self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;

    fn mul(self, inner: Transform) -> Transform {
        Transform {
            rotation: self.rotation * inner.rotation,
            translation: self.rotation * inner.translation + self.translation,
        }
    }
}

impl std::ops::Mul<Vec3> for Transform {
    type Output = Vec3;

    fn mul(self, point: Vec3) -> Vec3 {
        self.transform_point(point)
    }
}

/// Interpolates from `left` toward `right` by `factor`.
///
/// Rotation interpolates spherically so repeated blending keeps the
/// rotation on the unit sphere instead of drifting toward a scaled
/// matrix; translation interpolates linearly.
#[must_use]
pub fn blend(factor: f32, left: Transform, right: Transform) -> Transform {
    Transform {
        rotation: left.rotation.slerp(right.rotation, factor),
        translation: left.translation.lerp(right.translation, factor),
    }
}
