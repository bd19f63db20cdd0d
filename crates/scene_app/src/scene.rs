//! The demo scene and the collaborators it runs against.

use scene_ecs::{
    BodyHandle, EntityId, EntityRegistry, Material, MaterialHandle, MeshHandle, Model, ModelHandle,
    ModelMesh, Name, PhysicsBody, RegistryError, Tag, TagType,
};
use scene_math::{Aabb, Vec3};
use scene_systems::{
    Frame, FrameReport, InstanceList, NamedMaterialLibrary, PerspectiveCamera, SystemError,
    SystemsUpdater,
};

use crate::physics::{KinematicBody, KinematicWorld};

/// Marks entities moved by physics.
pub struct Dynamic;

impl TagType for Dynamic {
    const NAME: &'static str = "Dynamic";
}

const CUBE: MeshHandle = MeshHandle(1);
const PLANE: MeshHandle = MeshHandle(2);
const GROUND: MaterialHandle = MaterialHandle(1);
const CHROME: MaterialHandle = MaterialHandle(2);
const DEFAULT: MaterialHandle = MaterialHandle(3);

/// A registry plus the physics, camera, material, and renderer it is wired to.
#[derive(Debug)]
pub struct DemoScene {
    /// Entities and their components.
    pub registry: EntityRegistry,
    /// Owns the bodies linked from `PhysicsBody` components.
    pub physics: KinematicWorld,
    /// Orbits the origin and culls the scene.
    pub camera: PerspectiveCamera,
    /// Materials resolvable by name.
    pub materials: NamedMaterialLibrary,
    /// Receives the visible instances each frame.
    pub renderer: InstanceList,
}

impl DemoScene {
    /// Build the demo: a ground plane, a model with two meshes, and a few
    /// falling and spinning crates.
    ///
    /// # Errors
    ///
    /// Only on a registry bug.
    pub fn build(default_material: &str) -> Result<Self, RegistryError> {
        let mut registry = EntityRegistry::new();
        let mut physics = KinematicWorld::new();
        let materials = NamedMaterialLibrary::new()
            .with("M_Ground", GROUND)
            .with("M_Chrome", CHROME)
            .with(default_material, DEFAULT);

        let ground = registry.create_entity("ground", None)?;
        if let Some(entity) = registry.entity_mut(ground) {
            entity.set_scale(Vec3::new(20.0, 1.0, 20.0));
        }
        registry.add_component(
            ground,
            ModelMesh::new(PLANE, Aabb::new(Vec3::new(-0.5, -0.01, -0.5), Vec3::new(0.5, 0.0, 0.5))),
        )?;
        registry.add_component(ground, Material::new("M_Ground", GROUND))?;

        // A static model: root entity with two mesh children.
        let statue = registry.create_entity("statue", None)?;
        if let Some(entity) = registry.entity_mut(statue) {
            entity.set_position(Vec3::new(-4.0, 0.0, 0.0));
            entity.set_rotation_euler(0.0, 45f32.to_radians(), 0.0);
        }
        registry.add_component(
            statue,
            Model {
                handle: ModelHandle(1),
                source: "statue.glb".to_string(),
            },
        )?;
        for (name, y) in [("statue/base", 0.5), ("statue/head", 1.5)] {
            let part = registry.create_entity(name, Some(statue))?;
            if let Some(entity) = registry.entity_mut(part) {
                entity.set_position(Vec3::new(0.0, y, 0.0));
            }
            registry.add_component(part, ModelMesh::new(CUBE, Aabb::UNIT))?;
        }

        for i in 0..4u8 {
            let x = f32::from(i) * 2.0 - 1.0;
            let body = physics.spawn(
                KinematicBody::at(Vec3::new(x, 4.0 + f32::from(i), 0.0))
                    .with_spin(Vec3::new(0.0, 1.0 + f32::from(i), 0.0))
                    .falling(),
            );
            let id = spawn_crate(&mut registry, &format!("crate {i}"), body)?;
            if i % 2 == 0 {
                registry.add_component(id, Material::new("M_Chrome", CHROME))?;
            }
        }

        // Far out of view; it should always be culled.
        let body = physics.spawn(KinematicBody::at(Vec3::new(0.0, 1.0, 500.0)));
        spawn_crate(&mut registry, "lost crate", body)?;

        let camera = PerspectiveCamera::looking_at(Vec3::new(0.0, 6.0, 14.0), Vec3::new(0.0, 1.0, 0.0))
            .with_orbit_speed(0.25);

        Ok(Self {
            registry,
            physics,
            camera,
            materials,
            renderer: InstanceList::new(),
        })
    }

    /// Step physics, then run the systems for one frame.
    ///
    /// # Errors
    ///
    /// Propagates the first system error.
    pub fn step(&mut self, updater: &mut SystemsUpdater, dt: f32) -> Result<FrameReport, SystemError> {
        self.physics.step(dt);
        updater.update(
            &mut self.registry,
            Frame {
                physics: &self.physics,
                camera: &mut self.camera,
                materials: &self.materials,
                renderer: &mut self.renderer,
            },
            dt,
        )
    }
}

fn spawn_crate(
    registry: &mut EntityRegistry,
    name: &str,
    body: BodyHandle,
) -> Result<EntityId, RegistryError> {
    let id = registry.create_entity(name, None)?;
    registry.add_component(id, Name::new(name))?;
    registry.add_component(id, ModelMesh::new(CUBE, Aabb::UNIT))?;
    registry.add_component(id, PhysicsBody::new(body))?;
    registry.add_component(id, Tag::<Dynamic>::new())?;
    Ok(id)
}
