//! Render objects and the arena that owns them
//!
//! Anything spatially placed that is drawn or emits light. Objects are owned by
//! [`RenderObjects`] and referenced everywhere else by [`ObjectId`]; a scene only
//! lists the ids registered in it.

use std::fmt;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::foundation::math::Mat4;
use crate::geometry::{Aabb, BoundingVolume};
use crate::render::device::MeshRange;
use crate::render::material::Material;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::{ObjectId, SceneError, SceneId, SceneResult};

/// Pre/post-render notifications for an object
///
/// `on_render_begin` fires while the classifier buckets the object for a camera,
/// once per material pass. `on_render_end` fires once per camera after the
/// pipeline has issued the object's draws.
pub trait RenderListener {
    /// The object is about to be rendered by `camera`
    fn on_render_begin(&self, object: ObjectId, camera: &Camera);

    /// The object's draws for `camera` have been issued
    fn on_render_end(&self, _object: ObjectId, _camera: &Camera) {}
}

/// What a render object is
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Drawn geometry
    Geometry,
    /// Light source
    Light(Light),
}

/// A placed object that is drawn or emits light
#[derive(Clone)]
pub struct RenderObject {
    /// Debug name
    pub name: String,
    /// Opaque layer tag
    pub layer: u8,
    local_bounds: Aabb,
    world_bounds: BoundingVolume,
    transform: Mat4,
    inverse_transform: Mat4,
    scene: Option<SceneId>,
    listener: Option<Rc<dyn RenderListener>>,
    material: Option<Rc<Material>>,
    mesh: Option<MeshRange>,
    cast_shadows: bool,
    kind: ObjectKind,
}

impl fmt::Debug for RenderObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderObject")
            .field("name", &self.name)
            .field("layer", &self.layer)
            .field("world_bounds", &self.world_bounds)
            .field("scene", &self.scene)
            .field("material", &self.material.as_ref().map(|m| m.name.as_str()))
            .field("cast_shadows", &self.cast_shadows)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl RenderObject {
    /// Geometry with local-space bounds, no material and no mesh
    pub fn geometry(name: impl Into<String>, local_bounds: Aabb) -> Self {
        Self::with_kind(name, local_bounds, ObjectKind::Geometry)
    }

    /// Light object; its bounds come from the light's range
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        let mut object = Self::with_kind(name, Aabb::unit(), ObjectKind::Light(light));
        object.cast_shadows = false;
        object.update_world_bounds();
        object
    }

    fn with_kind(name: impl Into<String>, local_bounds: Aabb, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            layer: 0,
            local_bounds,
            world_bounds: BoundingVolume::from_aabb(local_bounds),
            transform: Mat4::identity(),
            inverse_transform: Mat4::identity(),
            scene: None,
            listener: None,
            material: None,
            mesh: None,
            cast_shadows: true,
            kind,
        }
    }

    /// Builder: material
    pub fn with_material(mut self, material: Rc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Builder: mesh range
    pub fn with_mesh(mut self, mesh: MeshRange) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Builder: world transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.set_transform(transform);
        self
    }

    /// Builder: layer tag
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Builder: render listener
    pub fn with_listener(mut self, listener: Rc<dyn RenderListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Builder: whether the object is drawn into shadow maps
    pub fn with_cast_shadows(mut self, cast_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }

    /// World transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Inverse of the world transform
    pub fn inverse_transform(&self) -> &Mat4 {
        &self.inverse_transform
    }

    /// Move the object; recomputes the inverse, the world bounds and the light's shadow camera
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.inverse_transform = transform.try_inverse().unwrap_or_else(Mat4::identity);
        if let ObjectKind::Light(light) = &mut self.kind {
            light.on_move(&transform);
        }
        self.update_world_bounds();
    }

    /// Local-space bounds
    pub fn local_bounds(&self) -> &Aabb {
        &self.local_bounds
    }

    /// Replace the local-space bounds
    pub fn set_local_bounds(&mut self, bounds: Aabb) {
        self.local_bounds = bounds;
        self.update_world_bounds();
    }

    /// Cached world-space bounds
    pub fn world_bounds(&self) -> &BoundingVolume {
        &self.world_bounds
    }

    fn update_world_bounds(&mut self) {
        self.world_bounds = match &self.kind {
            ObjectKind::Geometry => BoundingVolume::from_local(&self.local_bounds, &self.transform),
            ObjectKind::Light(light) => light.bounds(),
        };
    }

    /// Scene the object is registered in
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub(crate) fn set_scene(&mut self, scene: Option<SceneId>) {
        self.scene = scene;
        if let ObjectKind::Light(light) = &mut self.kind {
            light.set_scene(scene);
        }
    }

    /// Render listener
    pub fn listener(&self) -> Option<&Rc<dyn RenderListener>> {
        self.listener.as_ref()
    }

    /// Replace the render listener
    pub fn set_listener(&mut self, listener: Option<Rc<dyn RenderListener>>) {
        self.listener = listener;
    }

    /// Material
    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    /// Replace the material
    pub fn set_material(&mut self, material: Option<Rc<Material>>) {
        self.material = material;
    }

    /// Mesh range
    pub fn mesh(&self) -> Option<&MeshRange> {
        self.mesh.as_ref()
    }

    /// Replace the mesh range
    pub fn set_mesh(&mut self, mesh: Option<MeshRange>) {
        self.mesh = mesh;
    }

    /// Whether the object is drawn into shadow maps
    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Set whether the object is drawn into shadow maps
    pub fn set_cast_shadows(&mut self, cast_shadows: bool) {
        self.cast_shadows = cast_shadows;
    }

    /// Geometry or light
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Whether the object is a light
    pub fn is_light(&self) -> bool {
        matches!(self.kind, ObjectKind::Light(_))
    }

    /// The light, if the object is one
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            ObjectKind::Light(light) => Some(light),
            ObjectKind::Geometry => None,
        }
    }

    /// Change the light, if the object is one, then refresh the world bounds
    pub fn modify_light<R>(&mut self, f: impl FnOnce(&mut Light) -> R) -> Option<R> {
        let result = match &mut self.kind {
            ObjectKind::Light(light) => Some(f(light)),
            ObjectKind::Geometry => None,
        };
        if result.is_some() {
            self.update_world_bounds();
        }
        result
    }
}

/// Arena owning every render object
#[derive(Debug, Default)]
pub struct RenderObjects {
    objects: SlotMap<ObjectId, RenderObject>,
}

impl RenderObjects {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an object; it starts unregistered
    pub fn insert(&mut self, mut object: RenderObject) -> ObjectId {
        object.set_scene(None);
        self.objects.insert(object)
    }

    /// Destroy an object
    ///
    /// Objects still registered in a scene are refused; remove them from the scene first.
    pub fn remove(&mut self, id: ObjectId) -> SceneResult<RenderObject> {
        let object = self.objects.get(id).ok_or(SceneError::UnknownObject(id))?;
        if let Some(scene) = object.scene() {
            return Err(SceneError::StillRegistered { object: id, scene });
        }
        self.objects.remove(id).ok_or(SceneError::UnknownObject(id))
    }

    /// Object by id
    pub fn get(&self, id: ObjectId) -> Option<&RenderObject> {
        self.objects.get(id)
    }

    /// Mutable object by id
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        self.objects.get_mut(id)
    }

    /// Whether the id refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Every object
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &RenderObject)> {
        self.objects.iter()
    }

    /// Every object, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut RenderObject)> {
        self.objects.iter_mut()
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
