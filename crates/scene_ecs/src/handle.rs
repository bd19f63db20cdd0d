//! Opaque handles to resources owned outside the ECS.
//!
//! Meshes, materials, models, and physics bodies live in the renderer,
//! material library, asset store, and physics world. Components only carry
//! these handles; the ECS never looks inside them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a handle from a raw index.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw index.
            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

opaque_handle!(
    /// A rigid body in the physics world.
    BodyHandle,
    "Body"
);
opaque_handle!(
    /// A mesh primitive uploaded to the renderer.
    MeshHandle,
    "Mesh"
);
opaque_handle!(
    /// A GPU-resident material.
    MaterialHandle,
    "Material"
);
opaque_handle!(
    /// A loaded model asset.
    ModelHandle,
    "Model"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_display_with_their_kind() {
        assert_eq!(BodyHandle::from_raw(3).to_string(), "Body(3)");
        assert_eq!(MaterialHandle(7).to_string(), "Material(7)");
    }
}
