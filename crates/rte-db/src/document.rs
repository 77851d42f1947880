//! Serde schema of a database document.
//!
//! Every section and most fields are optional. These types mirror the JSON
//! layout; the loader converts them into [`model`](crate::model) payloads.

use glam::Vec3;
use serde::Deserialize;

use crate::model::UserId;

/// A whole document.
///
/// `point_lights`, `scenes` and `settings` are accepted but not loaded.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Flat material list.
    pub materials: Vec<MaterialEntry>,
    /// Flat mesh list.
    pub meshes: Vec<MeshEntry>,
    /// Top-level resource trees.
    pub resources: Vec<ResourceEntry>,
    /// Environment cubemaps.
    pub cubemaps: Vec<CubemapEntry>,
    /// Top-level scene node trees.
    pub nodes: Vec<NodeEntry>,
    /// Unsupported section.
    pub point_lights: Vec<serde_json::Value>,
    /// Unsupported section.
    pub scenes: Vec<serde_json::Value>,
    /// Unsupported section.
    pub settings: Option<serde_json::Value>,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// One `materials` element.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MaterialEntry {
    /// Identifier other entries refer to this one by.
    pub user_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Diffuse RGB.
    pub diffuse_color: Vec3,
    /// Specular RGB.
    pub specular_color: Vec3,
    /// Default: 1.0.
    pub smoothness: f32,
    /// Diffuse texture path, empty for none.
    pub texture_path: String,
    /// Default: 0.0.
    pub reflectivity: f32,
    /// Default: 0.0.
    pub translucency: f32,
    /// Default: 1.0.
    pub refractive_index: f32,
}

impl Default for MaterialEntry {
    fn default() -> Self {
        Self {
            user_id: None,
            name: String::new(),
            diffuse_color: Vec3::ZERO,
            specular_color: Vec3::ZERO,
            smoothness: 1.0,
            texture_path: String::new(),
            reflectivity: 0.0,
            translucency: 0.0,
            refractive_index: 1.0,
        }
    }
}

/// One `meshes` element. Vector data arrives as flat float arrays.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeshEntry {
    /// Identifier other entries refer to this one by.
    pub user_id: Option<UserId>,
    /// Positions, three floats each.
    pub vertices: Vec<f32>,
    /// UVs, two floats each.
    pub texture_coords: Vec<f32>,
    /// Normals, three floats each.
    pub normals: Vec<f32>,
    /// Triangle vertex indices.
    pub indices: Vec<u32>,
}

/// One resource, possibly with nested children.
///
/// With `from_file` set, the entry grafts the first resource tree of the
/// named document. `mesh` is ignored on such an entry; `material` still
/// overrides the grafted root's material.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceEntry {
    /// Identifier other entries refer to this one by.
    pub user_id: Option<UserId>,
    /// Mesh user id.
    pub mesh: Option<UserId>,
    /// Material user id.
    pub material: Option<UserId>,
    /// Path of another document, relative to this one.
    pub from_file: Option<String>,
    /// Nested entries, in order.
    pub children: Vec<ResourceEntry>,
}

/// One `cubemaps` element.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CubemapEntry {
    /// Face image paths.
    pub faces: Vec<String>,
}

/// One scene node, possibly with nested children.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NodeEntry {
    /// Identifier other entries refer to this one by.
    pub user_id: Option<UserId>,
    /// Resource user id.
    pub resource: Option<UserId>,
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Euler rotation in radians.
    pub rotation: Vec3,
    /// Default: one.
    pub scale: Vec3,
    /// Nested entries, in order.
    pub children: Vec<NodeEntry>,
}

impl Default for NodeEntry {
    fn default() -> Self {
        Self {
            user_id: None,
            resource: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            children: Vec::new(),
        }
    }
}
