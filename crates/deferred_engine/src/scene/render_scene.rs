//! Scene visibility registry
//!
//! A flat list of the objects registered in one scene plus the scene's cameras.
//! Visibility queries test every registered object against the frustum; there is
//! no spatial index.

use slotmap::SlotMap;

use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::Frustum;
use crate::render::occlusion::OcclusionList;
use crate::scene::camera::Camera;
use crate::scene::render_object::RenderObjects;
use crate::scene::{CameraId, ObjectId, SceneError, SceneId, SceneResult};

/// Objects and cameras of one scene
#[derive(Debug)]
pub struct RenderScene {
    id: SceneId,
    name: String,
    cameras: SlotMap<CameraId, Camera>,
    camera_order: Vec<CameraId>,
    objects: Vec<ObjectId>,
}

impl RenderScene {
    pub(crate) fn new(id: SceneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cameras: SlotMap::with_key(),
            camera_order: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Scene id
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a camera after the existing ones
    pub fn add_camera(&mut self, mut camera: Camera) -> CameraId {
        camera.set_scene(Some(self.id));
        let id = self.cameras.insert(camera);
        self.camera_order.push(id);
        id
    }

    /// Remove a camera, keeping the order of the others
    pub fn remove_camera(&mut self, id: CameraId) -> SceneResult<Camera> {
        let mut camera = self.cameras.remove(id).ok_or(SceneError::UnknownCamera(id))?;
        self.camera_order.retain(|c| *c != id);
        camera.set_scene(None);
        Ok(camera)
    }

    /// Camera by id
    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id)
    }

    /// Mutable camera by id
    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id)
    }

    /// Cameras in the order they were added
    pub fn cameras(&self) -> impl Iterator<Item = (CameraId, &Camera)> {
        self.camera_order
            .iter()
            .filter_map(move |id| self.cameras.get(*id).map(|camera| (*id, camera)))
    }

    /// Number of cameras
    pub fn camera_count(&self) -> usize {
        self.camera_order.len()
    }

    /// Register an object
    ///
    /// Registering an object already in this scene does nothing; an object
    /// registered in another scene must be removed from it first.
    pub fn add_render_object(&mut self, objects: &mut RenderObjects, id: ObjectId) -> SceneResult<()> {
        let object = objects.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        match object.scene() {
            Some(scene) if scene == self.id => return Ok(()),
            Some(scene) => return Err(SceneError::AlreadyRegistered { object: id, scene }),
            None => {}
        }
        object.set_scene(Some(self.id));
        self.objects.push(id);
        Ok(())
    }

    /// Deregister an object and clear its back-reference
    pub fn remove_render_object(&mut self, objects: &mut RenderObjects, id: ObjectId) -> SceneResult<()> {
        let index = self
            .objects
            .iter()
            .position(|o| *o == id)
            .ok_or(SceneError::NotRegistered { object: id, scene: self.id })?;
        self.objects.remove(index);
        if let Some(object) = objects.get_mut(id) {
            object.set_scene(None);
        }
        Ok(())
    }

    /// Whether an object is registered here
    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    /// Number of registered objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Registered object ids in registration order
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Non-light objects inside the frustum of `view_projection`
    ///
    /// Clears `out` and fills it in registration order with each visible object and
    /// the squared distance from `eye` to its bounding-sphere center. Not sorted.
    pub fn compute_visible(
        &self,
        objects: &RenderObjects,
        eye: Vec3,
        view_projection: &Mat4,
        out: &mut OcclusionList,
    ) {
        let frustum = Frustum::from_view_projection(view_projection);
        out.clear();
        for id in &self.objects {
            let Some(object) = objects.get(*id) else {
                continue;
            };
            if object.is_light() {
                continue;
            }
            let bounds = object.world_bounds();
            if frustum.contains(bounds) {
                out.insert(*id, (bounds.sphere.center - eye).norm_squared());
            }
        }
    }

    /// Lights whose bounds touch the frustum of `view_projection`
    ///
    /// Clears `out` and fills it in registration order. No eye is involved, so every
    /// light gets distance zero and a sort keeps registration order.
    pub fn compute_visible_light(&self, objects: &RenderObjects, view_projection: &Mat4, out: &mut OcclusionList) {
        let frustum = Frustum::from_view_projection(view_projection);
        out.clear();
        for id in &self.objects {
            let Some(object) = objects.get(*id) else {
                continue;
            };
            if object.is_light() && frustum.contains(object.world_bounds()) {
                out.insert(*id, 0.0);
            }
        }
    }

    /// Deregister every object, clearing their back-references
    pub(crate) fn detach_all(&mut self, objects: &mut RenderObjects) {
        for id in self.objects.drain(..) {
            if let Some(object) = objects.get_mut(id) {
                object.set_scene(None);
            }
        }
    }
}
