//! Fixed-order frame driver.
//!
//! [`SystemsUpdater`] runs camera update → transform sync → pre-render on
//! every frame. The order is fixed: pre-render reads global matrices, and
//! those are only valid once physics poses have been written.

use scene_ecs::EntityRegistry;
use tracing::debug;

use crate::camera::UpdateCameraSystem;
use crate::collaborators::{Camera, MaterialLibrary, PhysicsWorld, Renderer};
use crate::config::UpdaterConfig;
use crate::error::SystemError;
use crate::pre_render::{PreRenderStats, PreRenderSystem};
use crate::transform::TransformSystem;

/// The collaborators a frame talks to.
pub struct Frame<'a> {
    /// Source of body poses.
    pub physics: &'a dyn PhysicsWorld,
    /// Camera to advance and cull against.
    pub camera: &'a mut dyn Camera,
    /// Material lookup for meshes without a `Material` component.
    pub materials: &'a dyn MaterialLibrary,
    /// Receiver of visible instances.
    pub renderer: &'a mut dyn Renderer,
}

/// What one frame did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Index of the frame, starting at 1.
    pub frame: u64,
    /// Entities whose transform was taken from physics.
    pub synced_bodies: usize,
    /// Pre-render counters.
    pub pre_render: PreRenderStats,
}

/// Runs the per-frame systems in their fixed order.
#[derive(Debug, Clone)]
pub struct SystemsUpdater {
    camera: UpdateCameraSystem,
    transform: TransformSystem,
    pre_render: PreRenderSystem,
    frame: u64,
}

impl SystemsUpdater {
    /// Create an updater with the given configuration.
    #[must_use]
    pub fn new(config: &UpdaterConfig) -> Self {
        Self {
            camera: UpdateCameraSystem::new(),
            transform: TransformSystem::new(),
            pre_render: PreRenderSystem::new(config),
            frame: 0,
        }
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SystemError`] raised by a system. Systems after
    /// the failing one do not run for this frame.
    pub fn update(
        &mut self,
        registry: &mut EntityRegistry,
        frame: Frame<'_>,
        dt: f32,
    ) -> Result<FrameReport, SystemError> {
        self.frame += 1;

        self.camera.update(frame.camera, dt);
        let synced_bodies = self.transform.update(registry, frame.physics, dt)?;
        let pre_render =
            self.pre_render
                .update(registry, frame.camera, frame.materials, frame.renderer)?;

        debug!(
            frame = self.frame,
            dt,
            synced_bodies,
            submitted = pre_render.submitted,
            culled = pre_render.culled,
            "frame complete"
        );

        Ok(FrameReport {
            frame: self.frame,
            synced_bodies,
            pre_render,
        })
    }
}

impl Default for SystemsUpdater {
    fn default() -> Self {
        Self::new(&UpdaterConfig::default())
    }
}
