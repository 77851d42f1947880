//! Document loading.
//!
//! Sections load in a fixed order (materials, meshes, resources, cubemaps,
//! nodes) so that references only ever point backwards: resources name
//! meshes and materials, scene nodes name resources.
//!
//! Resource and node hierarchies are walked depth-first with an explicit
//! stack. Children are pushed last-to-first so they pop, and are created,
//! in document order.

use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use rte_tree::{NodeIndex, TreeError};

use crate::config::LoaderConfig;
use crate::database::Database;
use crate::document::{CubemapEntry, Document, MaterialEntry, MeshEntry, NodeEntry, ResourceEntry};
use crate::error::LoadError;
use crate::model::{Cubemap, Material, Mesh, Resource, SceneNode, UserId};

const CUBEMAP_FACES: usize = 6;

/// Reads documents into a [`Database`].
///
/// Successive loads into the same database accumulate. Meshes are
/// validated before anything is added, but a failing include can leave the
/// entries loaded before it in place.
#[derive(Clone, Debug, Default)]
pub struct DatabaseLoader {
    config: LoaderConfig,
}

/// Where relative includes resolve and how deep the current document is.
#[derive(Clone, Copy)]
struct Scope<'p> {
    base_dir: &'p Path,
    depth: usize,
}

impl DatabaseLoader {
    /// Loader with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read the document at `path` and load it. Includes resolve against the
    /// directory containing `path`.
    pub fn load_file(&self, path: impl AsRef<Path>, db: &mut Database) -> Result<(), LoadError> {
        let path = path.as_ref();
        log::debug!("loading database from {}", path.display());
        let document = read_document(path)?;
        let scope = Scope {
            base_dir: parent_dir(path),
            depth: 0,
        };
        self.load_scoped(&document, scope, db)?;
        log::debug!("database loaded from {}", path.display());
        Ok(())
    }

    /// Parse `json` and load it. Includes resolve against
    /// [`LoaderConfig::base_dir`].
    pub fn load_str(&self, json: &str, db: &mut Database) -> Result<(), LoadError> {
        let document = Document::from_json(json)?;
        self.load_document(&document, db)
    }

    /// Load an already parsed document. Includes resolve against
    /// [`LoaderConfig::base_dir`].
    pub fn load_document(&self, document: &Document, db: &mut Database) -> Result<(), LoadError> {
        let scope = Scope {
            base_dir: &self.config.base_dir,
            depth: 0,
        };
        self.load_scoped(document, scope, db)
    }

    fn load_scoped(
        &self,
        document: &Document,
        scope: Scope<'_>,
        db: &mut Database,
    ) -> Result<(), LoadError> {
        let meshes = document
            .meshes
            .iter()
            .map(mesh_from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        for entry in &document.materials {
            db.add_material(material_from_entry(entry));
        }
        log::debug!("loaded {} materials", document.materials.len());

        for mesh in meshes {
            db.add_mesh(mesh);
        }
        log::debug!("loaded {} meshes", document.meshes.len());

        for entry in &document.resources {
            self.load_resource_tree(entry, scope, db)?;
        }
        log::debug!("loaded {} resource trees", document.resources.len());

        for entry in &document.cubemaps {
            db.add_cubemap(cubemap_from_entry(entry));
        }

        for entry in &document.nodes {
            load_node_tree(entry, db)?;
        }
        log::debug!("loaded {} node trees", document.nodes.len());

        if !document.point_lights.is_empty()
            || !document.scenes.is_empty()
            || document.settings.is_some()
        {
            log::debug!("point lights, scenes and settings are not loaded");
        }
        Ok(())
    }

    fn load_resource_tree(
        &self,
        entry: &ResourceEntry,
        scope: Scope<'_>,
        db: &mut Database,
    ) -> Result<NodeIndex, LoadError> {
        let root = self.create_resource(entry, None, scope, db)?;
        apply_material(entry, root, db)?;

        let mut pending: Vec<Pending<'_>> = Vec::new();
        push_children(&mut pending, entry, root, db)?;
        while let Some(Pending {
            entry,
            parent,
            existing,
        }) = pending.pop()
        {
            let index = match existing {
                Some(existing) => {
                    bind_existing(entry, existing, db)?;
                    existing
                }
                None => self.create_resource(entry, Some(parent), scope, db)?,
            };
            apply_material(entry, index, db)?;
            push_children(&mut pending, entry, index, db)?;
        }
        Ok(root)
    }

    fn create_resource(
        &self,
        entry: &ResourceEntry,
        parent: Option<NodeIndex>,
        scope: Scope<'_>,
        db: &mut Database,
    ) -> Result<NodeIndex, LoadError> {
        let Some(file) = &entry.from_file else {
            let mesh = entry
                .mesh
                .and_then(|id| resolve(db.mesh_by_user_id(id), "mesh", id));
            let resource = Resource {
                user_id: entry.user_id,
                mesh,
                material: None,
            };
            return Ok(db.add_resource(resource, parent)?);
        };

        let path = scope.base_dir.join(file);
        let depth = scope.depth + 1;
        if depth > self.config.max_include_depth {
            return Err(LoadError::IncludeDepthExceeded {
                path,
                depth: self.config.max_include_depth,
            });
        }
        log::debug!("including {} at depth {depth}", path.display());

        let document = read_document(&path)?;
        let mut included = Database::new();
        let nested = Scope {
            base_dir: parent_dir(&path),
            depth,
        };
        self.load_scoped(&document, nested, &mut included)?;

        let Some((&source, rest)) = included.resource_roots().split_first() else {
            return Err(LoadError::EmptyInclude { path });
        };
        if !rest.is_empty() {
            log::warn!(
                "{} defines {} resource trees; only the first is grafted",
                path.display(),
                rest.len() + 1
            );
        }
        let grafted = db.graft_resources(&included, source, parent)?;
        db.set_resource_user_id(grafted, entry.user_id)?;
        Ok(grafted)
    }
}

/// A document child waiting on the stack.
struct Pending<'d> {
    entry: &'d ResourceEntry,
    parent: NodeIndex,
    /// Child of `parent` at the entry's position that existed before the
    /// document reached `parent`.
    existing: Option<NodeIndex>,
}

/// Push the children of `entry` last-to-first. Grafted resources already
/// have children, and the document's children bind to them by position;
/// the existing children are read once here.
fn push_children<'d>(
    pending: &mut Vec<Pending<'d>>,
    entry: &'d ResourceEntry,
    index: NodeIndex,
    db: &Database,
) -> Result<(), TreeError> {
    let existing: Vec<NodeIndex> = db
        .resources
        .children(index)?
        .take(entry.children.len())
        .map(|(child, _)| child)
        .collect();
    for (position, child) in entry.children.iter().enumerate().rev() {
        pending.push(Pending {
            entry: child,
            parent: index,
            existing: existing.get(position).copied(),
        });
    }
    Ok(())
}

fn bind_existing(
    entry: &ResourceEntry,
    existing: NodeIndex,
    db: &mut Database,
) -> Result<(), TreeError> {
    if let Some(file) = &entry.from_file {
        log::warn!(
            "resource {existing} already exists; ignoring from_file {file:?}"
        );
    }
    if let Some(mesh) = entry.mesh {
        log::warn!(
            "resource {existing} already exists; ignoring mesh user id {mesh}"
        );
    }
    if entry.user_id.is_some() {
        db.set_resource_user_id(existing, entry.user_id)?;
    }
    Ok(())
}

fn apply_material(
    entry: &ResourceEntry,
    index: NodeIndex,
    db: &mut Database,
) -> Result<(), LoadError> {
    let Some(id) = entry.material else {
        return Ok(());
    };
    if let Some(material) = resolve(db.material_by_user_id(id), "material", id) {
        db.resources.at_mut(index)?.material = Some(material);
    }
    Ok(())
}

fn load_node_tree(entry: &NodeEntry, db: &mut Database) -> Result<NodeIndex, LoadError> {
    let node = node_from_entry(entry, db);
    let root = db.add_node(node, None)?;
    let mut pending: Vec<(&NodeEntry, NodeIndex)> =
        entry.children.iter().rev().map(|c| (c, root)).collect();
    while let Some((entry, parent)) = pending.pop() {
        let node = node_from_entry(entry, db);
        let index = db.add_node(node, Some(parent))?;
        pending.extend(entry.children.iter().rev().map(|c| (c, index)));
    }
    Ok(root)
}

fn resolve(found: Option<NodeIndex>, kind: &str, id: UserId) -> Option<NodeIndex> {
    if found.is_none() {
        log::warn!("skipping reference to unknown {kind} user id {id}");
    }
    found
}

fn read_document(path: &Path) -> Result<Document, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document::from_json(&text)?)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

// ── Entry conversion ────────────────────────────────────────────────

fn material_from_entry(entry: &MaterialEntry) -> Material {
    Material {
        user_id: entry.user_id,
        name: entry.name.clone(),
        diffuse_color: entry.diffuse_color,
        specular_color: entry.specular_color,
        smoothness: entry.smoothness,
        texture_path: entry.texture_path.clone(),
        reflectivity: entry.reflectivity,
        translucency: entry.translucency,
        refractive_index: entry.refractive_index,
    }
}

fn mesh_from_entry(entry: &MeshEntry) -> Result<Mesh, LoadError> {
    Ok(Mesh {
        user_id: entry.user_id,
        vertices: grouped(&entry.vertices, "vertices", 3)?
            .map(Vec3::from_slice)
            .collect(),
        texture_coords: grouped(&entry.texture_coords, "texture_coords", 2)?
            .map(Vec2::from_slice)
            .collect(),
        normals: grouped(&entry.normals, "normals", 3)?
            .map(Vec3::from_slice)
            .collect(),
        indices: entry.indices.clone(),
    })
}

fn grouped<'a>(
    values: &'a [f32],
    field: &'static str,
    arity: usize,
) -> Result<std::slice::ChunksExact<'a, f32>, LoadError> {
    if values.len() % arity != 0 {
        return Err(LoadError::MalformedArray {
            field,
            len: values.len(),
            arity,
        });
    }
    Ok(values.chunks_exact(arity))
}

fn cubemap_from_entry(entry: &CubemapEntry) -> Cubemap {
    if entry.faces.len() != CUBEMAP_FACES {
        log::warn!(
            "cubemap has {} faces, expected {CUBEMAP_FACES}",
            entry.faces.len()
        );
    }
    Cubemap {
        faces: entry.faces.clone(),
    }
}

fn node_from_entry(entry: &NodeEntry, db: &Database) -> SceneNode {
    SceneNode {
        user_id: entry.user_id,
        resource: entry
            .resource
            .and_then(|id| resolve(db.resource_by_user_id(id), "resource", id)),
        position: entry.position,
        rotation: entry.rotation,
        scale: entry.scale,
    }
}
