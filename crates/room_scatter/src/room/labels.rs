//! Semantic labels and surface orientation classes.
use std::ops::{BitOr, BitOrAssign};

use glam::Vec3;

/// Bitset of semantic labels attached to room surfaces and anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneLabels(pub u32);

impl SceneLabels {
    pub const NONE: Self = Self(0);
    pub const FLOOR: Self = Self(1 << 0);
    pub const CEILING: Self = Self(1 << 1);
    pub const WALL_FACE: Self = Self(1 << 2);
    pub const TABLE: Self = Self(1 << 3);
    pub const COUCH: Self = Self(1 << 4);
    pub const DOOR_FRAME: Self = Self(1 << 5);
    pub const WINDOW_FRAME: Self = Self(1 << 6);
    pub const OTHER: Self = Self(1 << 7);
    pub const STORAGE: Self = Self(1 << 8);
    pub const BED: Self = Self(1 << 9);
    pub const SCREEN: Self = Self(1 << 10);
    pub const LAMP: Self = Self(1 << 11);
    pub const PLANT: Self = Self(1 << 12);
    pub const WALL_ART: Self = Self(1 << 13);
    pub const GLOBAL_MESH: Self = Self(1 << 14);
    pub const INVISIBLE_WALL_FACE: Self = Self(1 << 15);
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for SceneLabels {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for SceneLabels {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SceneLabels {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Restricts surface sampling to patches carrying one of the included labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelFilter {
    pub included: SceneLabels,
}

impl LabelFilter {
    pub fn new(included: SceneLabels) -> Self {
        Self { included }
    }

    #[inline]
    pub fn passes(&self, label: SceneLabels) -> bool {
        self.included.intersects(label)
    }
}

/// Orientation classes a surface patch can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceType(pub u8);

impl SurfaceType {
    pub const NONE: Self = Self(0);
    pub const FACING_UP: Self = Self(1 << 0);
    pub const VERTICAL: Self = Self(1 << 1);
    pub const FACING_DOWN: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    /// Cosine against world up beyond which a surface counts as facing up or down.
    pub const FACING_THRESHOLD: f32 = 0.9;

    /// Classifies a surface normal.
    pub fn classify(normal: Vec3) -> Self {
        let up = normal.normalize_or_zero().dot(Vec3::Y);
        if up >= Self::FACING_THRESHOLD {
            Self::FACING_UP
        } else if up <= -Self::FACING_THRESHOLD {
            Self::FACING_DOWN
        } else {
            Self::VERTICAL
        }
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }
}

impl BitOr for SurfaceType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SurfaceType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
