//! System error types.

use scene_ecs::RegistryError;

/// Errors that abort a system pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The material library has no material under this name.
    #[error("material '{0}' not found in the material library")]
    MissingMaterial(String),
}
