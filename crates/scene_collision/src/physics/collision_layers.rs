//! Collision layer system for filtering ray queries
//!
//! Every collider belongs to one or more layers; a query passes a mask and
//! only sees colliders sharing at least one layer with it.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Regular scene geometry
        const SCENE = 1 << 0;
        /// Static environment geometry
        const ENVIRONMENT = 1 << 1;
        /// Objects the user can select
        const PICKABLE = 1 << 2;
        /// Editor gizmos and handles
        const GIZMO = 1 << 3;
        /// Trigger volumes (never block a pick)
        const TRIGGER = 1 << 4;
        /// Debug visualisation
        const DEBUG = 1 << 5;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::SCENE
    }
}

impl CollisionLayers {
    /// Whether a collider on these layers is visible to a query using `mask`
    pub fn matches(self, mask: Self) -> bool {
        self.intersects(mask)
    }
}
