//! Frustum culling and render submission.
//!
//! Mesh entities are visited in the order their `ModelMesh` was added. Each
//! one's local bounds are moved into world space with its global matrix and
//! tested against the camera frustum; survivors go to the renderer. Sorting
//! and batching are the renderer's business.

use scene_ecs::{EntityRegistry, Material, ModelMesh};
use tracing::{debug, trace};

use crate::collaborators::{Camera, MaterialLibrary, Renderer};
use crate::config::UpdaterConfig;
use crate::error::SystemError;

/// Counters for one pre-render pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreRenderStats {
    /// Mesh entities considered.
    pub candidates: usize,
    /// Instances submitted to the renderer.
    pub submitted: usize,
    /// Meshes rejected by the frustum test.
    pub culled: usize,
}

/// Culls mesh entities against the view frustum and submits the visible ones.
#[derive(Debug, Clone)]
pub struct PreRenderSystem {
    default_material: String,
}

impl PreRenderSystem {
    /// Create the system from the shared configuration.
    #[must_use]
    pub fn new(config: &UpdaterConfig) -> Self {
        Self {
            default_material: config.default_material.clone(),
        }
    }

    /// Name of the fallback material.
    #[must_use]
    pub fn default_material(&self) -> &str {
        &self.default_material
    }

    /// Run the pass.
    ///
    /// The renderer is cleared only when at least one mesh entity exists.
    /// The fallback material is looked up once, before the renderer is
    /// touched, and only if some mesh lacks a `Material` component. A
    /// failed pass leaves the renderer holding the previous frame.
    ///
    /// # Errors
    ///
    /// - [`SystemError::MissingMaterial`] if a mesh needs the fallback and
    ///   the library does not have it.
    /// - [`SystemError::Registry`] if an indexed entity is missing.
    pub fn update(
        &self,
        registry: &mut EntityRegistry,
        camera: &dyn Camera,
        materials: &dyn MaterialLibrary,
        renderer: &mut dyn Renderer,
    ) -> Result<PreRenderStats, SystemError> {
        let meshes = registry.entities_with::<ModelMesh>();
        let mut stats = PreRenderStats {
            candidates: meshes.len(),
            ..PreRenderStats::default()
        };
        if meshes.is_empty() {
            return Ok(stats);
        }

        let fallback = if meshes.iter().all(|&id| registry.has_component::<Material>(id)) {
            None
        } else {
            let handle = materials
                .material_by_name(&self.default_material)
                .ok_or_else(|| SystemError::MissingMaterial(self.default_material.clone()))?;
            Some(handle)
        };

        renderer.clear();
        let frustum = camera.view_frustum();

        for id in meshes {
            let Some(&ModelMesh { mesh, bounds }) = registry.get_component::<ModelMesh>(id) else {
                continue;
            };
            let material = match (registry.get_component::<Material>(id), fallback) {
                (Some(material), _) => material.handle,
                (None, Some(handle)) => handle,
                (None, None) => {
                    return Err(SystemError::MissingMaterial(self.default_material.clone()));
                }
            };

            let world = registry.global_matrix(id)?;
            let world_bounds = bounds.transformed(&world);
            if frustum.intersects_aabb(&world_bounds) {
                renderer.add_mesh_instance(mesh, material, world, world_bounds);
                stats.submitted += 1;
                trace!(entity = id.id(), mesh = mesh.raw(), material = material.raw(), "submitted mesh");
            } else {
                stats.culled += 1;
            }
        }

        debug!(
            candidates = stats.candidates,
            submitted = stats.submitted,
            culled = stats.culled,
            "pre-render pass"
        );
        Ok(stats)
    }
}

impl Default for PreRenderSystem {
    fn default() -> Self {
        Self::new(&UpdaterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use scene_ecs::{EntityId, MaterialHandle, MeshHandle};
    use scene_math::{Aabb, Frustum, Mat4, Vec3};

    use super::*;
    use crate::collaborators::{InstanceList, NamedMaterialLibrary};

    /// Looks down -Z from the origin; counts frustum requests.
    struct FixedCamera {
        frustum: Frustum,
        requests: Cell<usize>,
    }

    impl FixedCamera {
        fn new() -> Self {
            let proj = Mat4::perspective_rh(90f32.to_radians(), 1.0, 0.1, 100.0);
            let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
            Self {
                frustum: Frustum::from_view_projection(&(proj * view)),
                requests: Cell::new(0),
            }
        }
    }

    impl Camera for FixedCamera {
        fn view_frustum(&self) -> Frustum {
            self.requests.set(self.requests.get() + 1);
            self.frustum
        }
    }

    fn library() -> NamedMaterialLibrary {
        NamedMaterialLibrary::new().with("M_Default", MaterialHandle(100))
    }

    fn spawn_mesh(reg: &mut EntityRegistry, name: &str, mesh: u64, at: Vec3) -> EntityId {
        let id = reg.create_entity(name, None).unwrap();
        reg.entity_mut(id).unwrap().set_position(at);
        reg.add_component(id, ModelMesh::new(MeshHandle(mesh), Aabb::UNIT)).unwrap();
        id
    }

    #[test]
    fn test_mesh_outside_frustum_is_never_submitted() {
        let mut reg = EntityRegistry::new();
        spawn_mesh(&mut reg, "inside", 1, Vec3::new(0.0, 0.0, -10.0));
        spawn_mesh(&mut reg, "behind", 2, Vec3::new(0.0, 0.0, 10.0));

        let mut renderer = InstanceList::new();
        let stats = PreRenderSystem::default()
            .update(&mut reg, &FixedCamera::new(), &library(), &mut renderer)
            .unwrap();

        let submitted: Vec<MeshHandle> = renderer.instances().iter().map(|i| i.mesh).collect();
        assert_eq!(submitted, vec![MeshHandle(1)]);
        assert_eq!(
            stats,
            PreRenderStats {
                candidates: 2,
                submitted: 1,
                culled: 1
            }
        );
    }

    #[test]
    fn test_instance_carries_world_matrix_and_bounds() {
        let mut reg = EntityRegistry::new();
        let parent = reg.create_entity("parent", None).unwrap();
        reg.entity_mut(parent).unwrap().set_position(Vec3::new(0.0, 0.0, -20.0));
        let child = spawn_mesh(&mut reg, "child", 3, Vec3::new(1.0, 0.0, 0.0));
        reg.set_parent(child, Some(parent)).unwrap();

        let mut renderer = InstanceList::new();
        PreRenderSystem::default()
            .update(&mut reg, &FixedCamera::new(), &library(), &mut renderer)
            .unwrap();

        let instance = renderer.instances()[0];
        assert_eq!(instance.world.w_axis.truncate(), Vec3::new(1.0, 0.0, -20.0));
        assert!(instance.world_bounds.center().abs_diff_eq(Vec3::new(1.0, 0.0, -20.0), 1e-6));
    }

    #[test]
    fn test_material_component_overrides_default() {
        let mut reg = EntityRegistry::new();
        let plain = spawn_mesh(&mut reg, "plain", 1, Vec3::new(0.0, 0.0, -5.0));
        let shiny = spawn_mesh(&mut reg, "shiny", 2, Vec3::new(0.0, 0.0, -6.0));
        reg.add_component(shiny, Material::new("M_Chrome", MaterialHandle(7))).unwrap();

        let mut renderer = InstanceList::new();
        PreRenderSystem::default()
            .update(&mut reg, &FixedCamera::new(), &library(), &mut renderer)
            .unwrap();

        let by_mesh: Vec<(MeshHandle, MaterialHandle)> =
            renderer.instances().iter().map(|i| (i.mesh, i.material)).collect();
        assert_eq!(
            by_mesh,
            vec![(MeshHandle(1), MaterialHandle(100)), (MeshHandle(2), MaterialHandle(7))]
        );
        assert!(reg.contains(plain));
    }

    #[test]
    fn test_missing_default_material_is_an_error() {
        let mut reg = EntityRegistry::new();
        spawn_mesh(&mut reg, "plain", 1, Vec3::new(0.0, 0.0, -5.0));

        let err = PreRenderSystem::default()
            .update(
                &mut reg,
                &FixedCamera::new(),
                &NamedMaterialLibrary::new(),
                &mut InstanceList::new(),
            )
            .unwrap_err();
        assert_eq!(err, SystemError::MissingMaterial("M_Default".to_string()));
    }

    #[test]
    fn test_missing_default_material_leaves_renderer_untouched() {
        let mut reg = EntityRegistry::new();
        let shiny = spawn_mesh(&mut reg, "shiny", 1, Vec3::new(0.0, 0.0, -5.0));
        reg.add_component(shiny, Material::new("M_Chrome", MaterialHandle(7))).unwrap();
        spawn_mesh(&mut reg, "plain", 2, Vec3::new(0.0, 0.0, -6.0));
        let camera = FixedCamera::new();

        let mut renderer = InstanceList::new();
        let err = PreRenderSystem::default()
            .update(&mut reg, &camera, &NamedMaterialLibrary::new(), &mut renderer)
            .unwrap_err();

        assert_eq!(err, SystemError::MissingMaterial("M_Default".to_string()));
        assert_eq!(renderer.clear_count(), 0);
        assert!(renderer.instances().is_empty());
        assert_eq!(camera.requests.get(), 0);
    }

    #[test]
    fn test_all_meshes_with_material_need_no_default() {
        let mut reg = EntityRegistry::new();
        let shiny = spawn_mesh(&mut reg, "shiny", 1, Vec3::new(0.0, 0.0, -5.0));
        reg.add_component(shiny, Material::new("M_Chrome", MaterialHandle(7))).unwrap();

        let mut renderer = InstanceList::new();
        let stats = PreRenderSystem::default()
            .update(&mut reg, &FixedCamera::new(), &NamedMaterialLibrary::new(), &mut renderer)
            .unwrap();
        assert_eq!(stats.submitted, 1);
        assert_eq!(renderer.instances()[0].material, MaterialHandle(7));
    }

    #[test]
    fn test_configured_default_material_is_used() {
        let mut reg = EntityRegistry::new();
        spawn_mesh(&mut reg, "plain", 1, Vec3::new(0.0, 0.0, -5.0));
        let lib = NamedMaterialLibrary::new().with("M_Debug", MaterialHandle(9));
        let system = PreRenderSystem::new(&UpdaterConfig::new().with_default_material("M_Debug"));
        assert_eq!(system.default_material(), "M_Debug");

        let mut renderer = InstanceList::new();
        system.update(&mut reg, &FixedCamera::new(), &lib, &mut renderer).unwrap();
        assert_eq!(renderer.instances()[0].material, MaterialHandle(9));
    }

    #[test]
    fn test_no_meshes_leaves_renderer_untouched() {
        let mut reg = EntityRegistry::new();
        reg.create_entity("empty", None).unwrap();
        let camera = FixedCamera::new();

        let mut renderer = InstanceList::new();
        let stats = PreRenderSystem::default()
            .update(&mut reg, &camera, &library(), &mut renderer)
            .unwrap();

        assert_eq!(stats, PreRenderStats::default());
        assert_eq!(renderer.clear_count(), 0);
        assert_eq!(camera.requests.get(), 0);
    }

    #[test]
    fn test_submission_follows_mesh_insertion_order() {
        let mut reg = EntityRegistry::new();
        let first = reg.create_entity("first", None).unwrap();
        let second = reg.create_entity("second", None).unwrap();
        for (id, z) in [(first, -5.0), (second, -6.0)] {
            reg.entity_mut(id).unwrap().set_position(Vec3::new(0.0, 0.0, z));
        }
        reg.add_component(second, ModelMesh::new(MeshHandle(2), Aabb::UNIT)).unwrap();
        reg.add_component(first, ModelMesh::new(MeshHandle(1), Aabb::UNIT)).unwrap();

        let mut renderer = InstanceList::new();
        PreRenderSystem::default()
            .update(&mut reg, &FixedCamera::new(), &library(), &mut renderer)
            .unwrap();

        let order: Vec<MeshHandle> = renderer.instances().iter().map(|i| i.mesh).collect();
        assert_eq!(order, vec![MeshHandle(2), MeshHandle(1)]);
        assert_eq!(renderer.clear_count(), 1);
    }
}
