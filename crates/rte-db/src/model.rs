//! Payload types stored in the database trees.

use std::fmt;

use glam::{Vec2, Vec3};
use rte_tree::NodeIndex;
use serde::Deserialize;

/// Identifier supplied by a document to name a material, mesh, resource or
/// scene node so other entries can refer to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Surface description shared by resources.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Document identifier, if any.
    pub user_id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Diffuse RGB.
    pub diffuse_color: Vec3,
    /// Specular RGB.
    pub specular_color: Vec3,
    /// Specular exponent scale. Default: 1.0.
    pub smoothness: f32,
    /// Path of the diffuse texture, empty for none.
    pub texture_path: String,
    /// Default: 0.0.
    pub reflectivity: f32,
    /// Default: 0.0.
    pub translucency: f32,
    /// Default: 1.0.
    pub refractive_index: f32,
}

impl Default for Material {
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

/// Indexed triangle geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Document identifier, if any.
    pub user_id: Option<UserId>,
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Per-vertex UVs.
    pub texture_coords: Vec<Vec2>,
    /// Per-vertex normals.
    pub normals: Vec<Vec3>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

/// A node of a resource hierarchy: optional geometry plus a material.
///
/// `mesh` and `material` are indices into the owning database's mesh and
/// material trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    /// Document identifier, if any.
    pub user_id: Option<UserId>,
    /// Mesh drawn for this resource.
    pub mesh: Option<NodeIndex>,
    /// Material applied to the mesh.
    pub material: Option<NodeIndex>,
}

/// Six face images of an environment cubemap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cubemap {
    /// Face image paths, in document order.
    pub faces: Vec<String>,
}

/// A placed instance in the scene hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Document identifier, if any.
    pub user_id: Option<UserId>,
    /// Resource hierarchy drawn at this node (index into the resource tree).
    pub resource: Option<NodeIndex>,
    /// Translation relative to the parent node.
    pub position: Vec3,
    /// Euler rotation in radians, relative to the parent node.
    pub rotation: Vec3,
    /// Scale relative to the parent node. Default: one.
    pub scale: Vec3,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            user_id: None,
            resource: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}
