//! Registry of every live scene
//!
//! Owned by the render feature and passed by reference to whatever needs to
//! enumerate scenes.

use slotmap::SlotMap;

use crate::scene::render_object::RenderObjects;
use crate::scene::render_scene::RenderScene;
use crate::scene::{SceneError, SceneId, SceneResult};

/// Every live [`RenderScene`]
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: SlotMap<SceneId, RenderScene>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene
    pub fn create_scene(&mut self, name: impl Into<String>) -> SceneId {
        let name = name.into();
        let id = self.scenes.insert_with_key(|id| RenderScene::new(id, name));
        log::debug!("Created scene {:?}", id);
        id
    }

    /// Destroy a scene
    ///
    /// Objects still registered lose their back-reference; the scene's cameras are
    /// returned with it. The id never resolves again.
    pub fn destroy_scene(&mut self, id: SceneId, objects: &mut RenderObjects) -> SceneResult<RenderScene> {
        let mut scene = self.scenes.remove(id).ok_or(SceneError::UnknownScene(id))?;
        scene.detach_all(objects);
        log::debug!("Destroyed scene '{}'", scene.name());
        Ok(scene)
    }

    /// Scene by id
    pub fn get(&self, id: SceneId) -> Option<&RenderScene> {
        self.scenes.get(id)
    }

    /// Mutable scene by id
    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut RenderScene> {
        self.scenes.get_mut(id)
    }

    /// Every live scene
    pub fn iter(&self) -> impl Iterator<Item = (SceneId, &RenderScene)> {
        self.scenes.iter()
    }

    /// Ids of every live scene
    pub fn ids(&self) -> Vec<SceneId> {
        self.scenes.keys().collect()
    }

    /// Number of live scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether no scene is alive
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Destroy every scene
    pub fn clear(&mut self, objects: &mut RenderObjects) {
        for (_, mut scene) in self.scenes.drain() {
            scene.detach_all(objects);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::scene::render_object::RenderObject;

    #[test]
    fn test_destroy_clears_back_references() {
        let mut registry = SceneRegistry::new();
        let mut objects = RenderObjects::new();
        let id = registry.create_scene("level");
        let rock = objects.insert(RenderObject::geometry("rock", Aabb::unit()));
        registry
            .get_mut(id)
            .unwrap()
            .add_render_object(&mut objects, rock)
            .unwrap();
        assert_eq!(objects.get(rock).unwrap().scene(), Some(id));

        let scene = registry.destroy_scene(id, &mut objects).unwrap();
        assert_eq!(scene.object_count(), 0);
        assert!(objects.get(rock).unwrap().scene().is_none());
        assert!(registry.get(id).is_none());
        assert_eq!(registry.destroy_scene(id, &mut objects).unwrap_err(), SceneError::UnknownScene(id));
        assert!(objects.remove(rock).is_ok());
    }

    #[test]
    fn test_enumerates_live_scenes() {
        let mut registry = SceneRegistry::new();
        let mut objects = RenderObjects::new();
        let a = registry.create_scene("a");
        let b = registry.create_scene("b");

        let mut names: Vec<_> = registry.iter().map(|(_, s)| s.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.get(a).map(RenderScene::id), Some(a));

        registry.destroy_scene(a, &mut objects).unwrap();
        assert_eq!(registry.ids(), vec![b]);

        registry.clear(&mut objects);
        assert!(registry.is_empty());
    }
}
