//! The parsed scene.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::object::Object;
use crate::errors::Result;

/// Scene description grouped by plugin category.
///
/// Categories are ordered maps so every pass over the scene visits objects in
/// the same order, which keeps generated programs deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub camera: Option<Object>,
    pub technique: Option<Object>,
    pub textures: BTreeMap<String, Object>,
    pub bsdfs: BTreeMap<String, Object>,
    pub lights: BTreeMap<String, Object>,
    pub shapes: BTreeMap<String, Object>,
    pub entities: BTreeMap<String, Object>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scene from its JSON form and names every object after its key.
    pub fn from_json(source: &str) -> Result<Self> {
        let mut scene: Scene = serde_json::from_str(source)?;
        scene.assign_names();
        Ok(scene)
    }

    fn assign_names(&mut self) {
        if let Some(camera) = &mut self.camera {
            camera.name = "camera".to_string();
        }
        if let Some(technique) = &mut self.technique {
            technique.name = "technique".to_string();
        }
        for map in [
            &mut self.textures,
            &mut self.bsdfs,
            &mut self.lights,
            &mut self.shapes,
            &mut self.entities,
        ] {
            for (name, object) in map.iter_mut() {
                object.name.clone_from(name);
            }
        }
    }

    fn insert(map: &mut BTreeMap<String, Object>, name: &str, mut object: Object) {
        object.name = name.to_string();
        map.insert(name.to_string(), object);
    }

    pub fn set_camera(&mut self, mut camera: Object) {
        camera.name = "camera".to_string();
        self.camera = Some(camera);
    }

    pub fn set_technique(&mut self, mut technique: Object) {
        technique.name = "technique".to_string();
        self.technique = Some(technique);
    }

    pub fn add_texture(&mut self, name: &str, object: Object) {
        Self::insert(&mut self.textures, name, object);
    }

    pub fn add_bsdf(&mut self, name: &str, object: Object) {
        Self::insert(&mut self.bsdfs, name, object);
    }

    pub fn add_light(&mut self, name: &str, object: Object) {
        Self::insert(&mut self.lights, name, object);
    }

    pub fn add_shape(&mut self, name: &str, object: Object) {
        Self::insert(&mut self.shapes, name, object);
    }

    pub fn add_entity(&mut self, name: &str, object: Object) {
        Self::insert(&mut self.entities, name, object);
    }

    /// Position of an entity in iteration order, which is also its id in the
    /// runtime entity table.
    #[must_use]
    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.entities.keys().position(|key| key == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_assigns_names() {
        let scene = Scene::from_json(
            r#"{
                "camera": { "type": "perspective", "fov": 40 },
                "lights": { "sun": { "type": "directional" } },
                "entities": { "b": { "type": "entity" }, "a": { "type": "entity" } }
            }"#,
        )
        .unwrap();

        assert_eq!(scene.camera.as_ref().unwrap().name, "camera");
        assert_eq!(scene.lights["sun"].name, "sun");
        // Ordered by key
        assert_eq!(scene.entity_index("a"), Some(0));
        assert_eq!(scene.entity_index("b"), Some(1));
        assert_eq!(scene.entity_index("c"), None);
    }
}
