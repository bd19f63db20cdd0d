//! # scene_systems
//!
//! Per-frame systems that run against an
//! [`EntityRegistry`](scene_ecs::EntityRegistry), and the collaborator traits
//! they talk to.
//!
//! Each frame the [`SystemsUpdater`] runs, in this order:
//!
//! 1. [`UpdateCameraSystem`]: advances the camera.
//! 2. [`TransformSystem`]: copies physics body poses into entity transforms.
//! 3. [`PreRenderSystem`]: frustum-culls meshes and submits visible instances.
//!
//! Physics, camera, materials, and rendering are external. The systems only
//! see them through the traits in [`collaborators`].

pub mod camera;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod pre_render;
pub mod transform;
pub mod updater;

pub use camera::{PerspectiveCamera, UpdateCameraSystem};
pub use collaborators::{
    Camera, InstanceList, MaterialLibrary, MeshInstance, NamedMaterialLibrary, PhysicsWorld,
    PoseTable, Renderer,
};
pub use config::{DEFAULT_MATERIAL, UpdaterConfig};
pub use error::SystemError;
pub use pre_render::{PreRenderStats, PreRenderSystem};
pub use transform::TransformSystem;
pub use updater::{Frame, FrameReport, SystemsUpdater};
