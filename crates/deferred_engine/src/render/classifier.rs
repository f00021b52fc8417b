//! Render data classifier
//!
//! Rebuilds, for one camera, the draw buckets keyed by `(queue, pass)`. Buckets
//! are scratch data: every call to [`RenderDataClassifier::assign_visible`]
//! starts from empty ones and nothing survives into the next camera or frame.

use std::collections::HashMap;

use crate::render::material::{PassKey, RenderQueue};
use crate::render::occlusion::OcclusionList;
use crate::scene::{Camera, ObjectId, RenderObjects, SceneRegistry};

/// Per-camera draw buckets
#[derive(Debug, Default)]
pub struct RenderDataClassifier {
    buckets: HashMap<(RenderQueue, PassKey), Vec<ObjectId>>,
    visible: OcclusionList,
    visible_lights: OcclusionList,
    sort_transparent_back_to_front: bool,
}

impl RenderDataClassifier {
    /// Create a classifier drawing transparent buckets far-to-near
    pub fn new() -> Self {
        Self {
            sort_transparent_back_to_front: true,
            ..Self::default()
        }
    }

    /// Whether transparent buckets are reversed to far-to-near
    pub fn set_sort_transparent_back_to_front(&mut self, enabled: bool) {
        self.sort_transparent_back_to_front = enabled;
    }

    /// Empty every bucket, keeping their allocations
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        self.visible.clear();
        self.visible_lights.clear();
    }

    /// Classify what `camera` sees
    ///
    /// Visible non-light objects are visited near-to-far; each pass of each
    /// technique of the object's material notifies the object's listener and
    /// appends the object to the `(technique queue, pass key)` bucket. Shadow
    /// cameras skip objects that do not cast shadows. Objects without a material
    /// contribute nothing. Visible lights then go to `(Lighting, Lights)`.
    pub fn assign_visible(&mut self, camera: &Camera, scenes: &SceneRegistry, objects: &RenderObjects) {
        self.clear();

        let Some(scene) = camera.scene().and_then(|id| scenes.get(id)) else {
            log::trace!("Camera '{}' is not in a live scene, nothing to classify", camera.name);
            return;
        };

        let view_projection = camera.view_projection();
        scene.compute_visible(objects, camera.position, &view_projection, &mut self.visible);
        self.visible.sort();

        let shadow_pass = camera.is_shadow_camera();
        for candidate in self.visible.iter() {
            let Some(object) = objects.get(candidate.object) else {
                continue;
            };
            if shadow_pass && !object.cast_shadows() {
                continue;
            }
            let Some(material) = object.material() else {
                log::trace!("Skipping '{}': no material", object.name);
                continue;
            };
            for (queue, pass) in material.passes() {
                if let Some(listener) = object.listener() {
                    listener.on_render_begin(candidate.object, camera);
                }
                self.buckets
                    .entry((queue, pass.key))
                    .or_default()
                    .push(candidate.object);
            }
        }

        scene.compute_visible_light(objects, &view_projection, &mut self.visible_lights);
        self.visible_lights.sort();
        self.buckets
            .entry((RenderQueue::Lighting, PassKey::Lights))
            .or_default()
            .extend(self.visible_lights.objects());

        if self.sort_transparent_back_to_front {
            for ((queue, _), bucket) in self.buckets.iter_mut() {
                if *queue == RenderQueue::Transparent {
                    bucket.reverse();
                }
            }
        }
    }

    /// Ordered objects of a bucket; empty when nothing landed in it
    pub fn render_data(&self, queue: RenderQueue, pass: PassKey) -> &[ObjectId] {
        self.buckets
            .get(&(queue, pass))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Visible lights in classification order
    pub fn visible_lights(&self) -> &[ObjectId] {
        self.render_data(RenderQueue::Lighting, PassKey::Lights)
    }

    /// Visible non-light objects near-to-far, before any filtering
    pub fn candidates(&self) -> &OcclusionList {
        &self.visible
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.values().filter(|b| !b.is_empty()).count()
    }

    /// Every distinct object in any bucket, in first-seen order of `keys`
    pub fn objects_in(&self, keys: &[(RenderQueue, PassKey)]) -> Vec<ObjectId> {
        let mut seen = Vec::new();
        for (queue, pass) in keys {
            for id in self.render_data(*queue, *pass) {
                if !seen.contains(id) {
                    seen.push(*id);
                }
            }
        }
        seen
    }
}
