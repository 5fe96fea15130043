//! Scene objects and their properties.

use std::collections::BTreeMap;
use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{CodegenError, Result};

/// A single property value as produced by the scene parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Property {
    Bool(bool),
    Integer(i64),
    Number(f32),
    Vector3(Vec3),
    Array(Vec<f32>),
    String(String),
}

impl Property {
    /// Short description used in type mismatch diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Vector3(_) => "vector3",
            Self::Array(_) => "array",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Property {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f32> for Property {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<Vec3> for Property {
    fn from(value: Vec3) -> Self {
        Self::Vector3(value)
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A named plugin instance (light, bsdf, texture, camera, ...).
///
/// In JSON the plugin type lives under `"type"` and every other key is a
/// property:
///
/// ```json
/// { "type": "point", "position": [0, 4, 0], "intensity": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Object {
    /// Key of the object inside its scene category. Filled in by [`Scene`](super::Scene).
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    /// Directory of the file that declared this object, when it differs from
    /// the main scene file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub properties: BTreeMap<String, Property>,
}

impl Object {
    #[must_use]
    pub fn new(plugin_type: &str) -> Self {
        Self {
            plugin_type: plugin_type.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, value: impl Into<Property>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    #[inline]
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Builds the error reported for a present property of the wrong shape.
    #[must_use]
    pub fn mismatch(&self, property: &str, expected: &'static str) -> CodegenError {
        CodegenError::PropertyTypeMismatch {
            object: self.name.clone(),
            property: property.to_string(),
            expected,
        }
    }

    pub fn get_number(&self, name: &str, default: f32) -> Result<f32> {
        match self.property(name) {
            None => Ok(default),
            Some(Property::Number(v)) => Ok(*v),
            Some(Property::Integer(v)) => Ok(*v as f32),
            Some(_) => Err(self.mismatch(name, "number")),
        }
    }

    pub fn get_integer(&self, name: &str, default: i64) -> Result<i64> {
        match self.property(name) {
            None => Ok(default),
            Some(Property::Integer(v)) => Ok(*v),
            Some(_) => Err(self.mismatch(name, "integer")),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        match self.property(name) {
            None => Ok(default),
            Some(Property::Bool(v)) => Ok(*v),
            Some(_) => Err(self.mismatch(name, "bool")),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<Option<&str>> {
        match self.property(name) {
            None => Ok(None),
            Some(Property::String(v)) => Ok(Some(v.as_str())),
            Some(_) => Err(self.mismatch(name, "string")),
        }
    }

    /// Reads a vector, splatting scalars.
    pub fn get_vector3(&self, name: &str, default: Vec3) -> Result<Vec3> {
        match self.property(name) {
            None => Ok(default),
            Some(Property::Vector3(v)) => Ok(*v),
            Some(Property::Number(v)) => Ok(Vec3::splat(*v)),
            Some(Property::Integer(v)) => Ok(Vec3::splat(*v as f32)),
            Some(_) => Err(self.mismatch(name, "vector3 or number")),
        }
    }
}
