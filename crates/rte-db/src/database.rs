//! The resource database: one sparse tree per payload type.

use std::collections::HashMap;

use indexmap::IndexMap;
use rte_tree::{NodeIndex, SparseTree, TreeError};

use crate::model::{Cubemap, Material, Mesh, Resource, SceneNode, UserId};

/// Loaded materials, meshes, resources, cubemaps and scene nodes.
///
/// Materials and meshes are flat: every entry is a direct child of its
/// store's root. Resources and scene nodes form hierarchies whose top-level
/// trees are listed by [`resource_roots`](Self::resource_roots) and
/// [`node_roots`](Self::node_roots). Store roots carry default payloads and
/// are never exposed as entries.
///
/// Each store has a user-id map filled as entries with a `user_id` are
/// added. A later entry with the same user id replaces the mapping; the
/// earlier entry stays in its store.
#[derive(Clone, Debug, Default)]
pub struct Database {
    pub(crate) materials: SparseTree<Material>,
    pub(crate) meshes: SparseTree<Mesh>,
    pub(crate) resources: SparseTree<Resource>,
    pub(crate) nodes: SparseTree<SceneNode>,
    pub(crate) cubemaps: Vec<Cubemap>,
    pub(crate) material_ids: IndexMap<UserId, NodeIndex>,
    pub(crate) mesh_ids: IndexMap<UserId, NodeIndex>,
    pub(crate) resource_ids: IndexMap<UserId, NodeIndex>,
    pub(crate) node_ids: IndexMap<UserId, NodeIndex>,
    pub(crate) resource_roots: Vec<NodeIndex>,
    pub(crate) node_roots: Vec<NodeIndex>,
}

impl Database {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Stores ──────────────────────────────────────────────────────

    /// Material store.
    pub fn materials(&self) -> &SparseTree<Material> {
        &self.materials
    }

    /// Mesh store.
    pub fn meshes(&self) -> &SparseTree<Mesh> {
        &self.meshes
    }

    /// Resource store.
    pub fn resources(&self) -> &SparseTree<Resource> {
        &self.resources
    }

    /// Scene node store.
    pub fn nodes(&self) -> &SparseTree<SceneNode> {
        &self.nodes
    }

    /// Cubemaps in load order.
    pub fn cubemaps(&self) -> &[Cubemap] {
        &self.cubemaps
    }

    /// Top-level resource trees, in load order.
    pub fn resource_roots(&self) -> &[NodeIndex] {
        &self.resource_roots
    }

    /// Top-level scene node trees, in load order.
    pub fn node_roots(&self) -> &[NodeIndex] {
        &self.node_roots
    }

    // ── User-id lookups ─────────────────────────────────────────────

    /// Index of the material registered under `id`.
    pub fn material_by_user_id(&self, id: UserId) -> Option<NodeIndex> {
        self.material_ids.get(&id).copied()
    }

    /// Index of the mesh registered under `id`.
    pub fn mesh_by_user_id(&self, id: UserId) -> Option<NodeIndex> {
        self.mesh_ids.get(&id).copied()
    }

    /// Index of the resource registered under `id`.
    pub fn resource_by_user_id(&self, id: UserId) -> Option<NodeIndex> {
        self.resource_ids.get(&id).copied()
    }

    /// Index of the scene node registered under `id`.
    pub fn node_by_user_id(&self, id: UserId) -> Option<NodeIndex> {
        self.node_ids.get(&id).copied()
    }

    /// Material payload registered under `id`.
    pub fn material(&self, id: UserId) -> Option<&Material> {
        self.material_by_user_id(id)
            .and_then(|index| self.materials.get(index))
    }

    /// Mesh payload registered under `id`.
    pub fn mesh(&self, id: UserId) -> Option<&Mesh> {
        self.mesh_by_user_id(id)
            .and_then(|index| self.meshes.get(index))
    }

    /// Resource payload registered under `id`.
    pub fn resource(&self, id: UserId) -> Option<&Resource> {
        self.resource_by_user_id(id)
            .and_then(|index| self.resources.get(index))
    }

    /// Scene node payload registered under `id`.
    pub fn node(&self, id: UserId) -> Option<&SceneNode> {
        self.node_by_user_id(id)
            .and_then(|index| self.nodes.get(index))
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Append a material and register its user id.
    pub fn add_material(&mut self, material: Material) -> NodeIndex {
        let user_id = material.user_id;
        let index = self.materials.insert_under_root(material);
        register(&mut self.material_ids, user_id, index, "material");
        index
    }

    /// Append a mesh and register its user id.
    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeIndex {
        let user_id = mesh.user_id;
        let index = self.meshes.insert_under_root(mesh);
        register(&mut self.mesh_ids, user_id, index, "mesh");
        index
    }

    /// Append a cubemap.
    pub fn add_cubemap(&mut self, cubemap: Cubemap) {
        self.cubemaps.push(cubemap);
    }

    /// Insert a resource under `parent`, or as a new top-level tree when
    /// `parent` is `None`, and register its user id.
    pub fn add_resource(
        &mut self,
        resource: Resource,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, TreeError> {
        let user_id = resource.user_id;
        let index = self
            .resources
            .insert(resource, parent.unwrap_or(NodeIndex::ROOT))?;
        if parent.is_none() {
            self.resource_roots.push(index);
        }
        register(&mut self.resource_ids, user_id, index, "resource");
        Ok(index)
    }

    /// Insert a scene node under `parent`, or as a new top-level tree when
    /// `parent` is `None`, and register its user id.
    pub fn add_node(
        &mut self,
        node: SceneNode,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, TreeError> {
        let user_id = node.user_id;
        let index = self.nodes.insert(node, parent.unwrap_or(NodeIndex::ROOT))?;
        if parent.is_none() {
            self.node_roots.push(index);
        }
        register(&mut self.node_ids, user_id, index, "node");
        Ok(index)
    }

    /// Set the user id of an existing resource and register it.
    pub fn set_resource_user_id(
        &mut self,
        index: NodeIndex,
        user_id: Option<UserId>,
    ) -> Result<(), TreeError> {
        self.resources.at_mut(index)?.user_id = user_id;
        register(&mut self.resource_ids, user_id, index, "resource");
        Ok(())
    }

    /// Copy the resource tree rooted at `source` in `other` under `parent`
    /// (a new top-level tree when `None`), together with every material and
    /// mesh of `other`. Returns the index of the copied root.
    ///
    /// The copied resources are remapped to the copied materials and meshes.
    /// User ids of `other` are not registered here: an included document
    /// keeps its own namespace.
    pub fn graft_resources(
        &mut self,
        other: &Database,
        source: NodeIndex,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, TreeError> {
        let target = parent.unwrap_or(NodeIndex::ROOT);
        if !self.resources.contains(target) {
            return Err(TreeError::InvalidParent { index: target });
        }
        if source.is_root() || !other.resources.contains(source) {
            return Err(TreeError::InvalidSource { index: source });
        }

        let materials: HashMap<NodeIndex, NodeIndex> = other
            .materials
            .children(NodeIndex::ROOT)?
            .map(|(from, material)| (from, self.materials.insert_under_root(material.clone())))
            .collect();
        let meshes: HashMap<NodeIndex, NodeIndex> = other
            .meshes
            .children(NodeIndex::ROOT)?
            .map(|(from, mesh)| (from, self.meshes.insert_under_root(mesh.clone())))
            .collect();

        let grafted = self.resources.merge(&other.resources, source, target)?;
        if parent.is_none() {
            self.resource_roots.push(grafted);
        }
        let copies: Vec<NodeIndex> = self
            .resources
            .descendants(grafted)?
            .map(|(i, _)| i)
            .collect();
        for index in copies {
            let resource = self.resources.at_mut(index)?;
            resource.mesh = resource.mesh.and_then(|m| meshes.get(&m).copied());
            resource.material = resource.material.and_then(|m| materials.get(&m).copied());
        }
        Ok(grafted)
    }

    /// Erase the resource subtree at `index`, forgetting user ids and root
    /// entries that pointed into it. Returns the number of resources
    /// released.
    ///
    /// Scene nodes still referring to an erased resource are cleared to
    /// `resource: None` so a later allocation in the freed slot is never
    /// drawn by mistake.
    pub fn remove_resource(&mut self, index: NodeIndex) -> Result<usize, TreeError> {
        let doomed: Vec<NodeIndex> = self.resources.descendants(index)?.map(|(i, _)| i).collect();
        let released = self.resources.erase(index)?;
        self.resource_ids.retain(|_, i| !doomed.contains(i));
        self.resource_roots.retain(|i| !doomed.contains(i));

        let stale: Vec<NodeIndex> = self
            .nodes
            .descendants(NodeIndex::ROOT)?
            .filter(|(_, node)| node.resource.is_some_and(|r| doomed.contains(&r)))
            .map(|(i, _)| i)
            .collect();
        for node in stale {
            self.nodes.at_mut(node)?.resource = None;
        }
        Ok(released)
    }

    /// Drop every entry and mapping.
    pub fn clear(&mut self) {
        self.materials.clear();
        self.meshes.clear();
        self.resources.clear();
        self.nodes.clear();
        self.cubemaps.clear();
        self.material_ids.clear();
        self.mesh_ids.clear();
        self.resource_ids.clear();
        self.node_ids.clear();
        self.resource_roots.clear();
        self.node_roots.clear();
    }

    /// Whether nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
            && self.meshes.is_empty()
            && self.resources.is_empty()
            && self.nodes.is_empty()
            && self.cubemaps.is_empty()
    }

    /// Log entry counts at `info` level, and every resource tree at `debug`.
    pub fn log_summary(&self) {
        log::info!(
            "database: {} materials, {} meshes, {} resources in {} trees, {} cubemaps, {} nodes in {} trees",
            self.materials.size(),
            self.meshes.size(),
            self.resources.size(),
            self.resource_roots.len(),
            self.cubemaps.len(),
            self.nodes.size(),
            self.node_roots.len(),
        );
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        for (_, material) in self
            .materials
            .children(NodeIndex::ROOT)
            .into_iter()
            .flatten()
        {
            log::debug!(
                "material {:?} {:?}: diffuse {} specular {} texture {:?}",
                material.user_id,
                material.name,
                material.diffuse_color,
                material.specular_color,
                material.texture_path,
            );
        }
        for (_, mesh) in self.meshes.children(NodeIndex::ROOT).into_iter().flatten() {
            log::debug!(
                "mesh {:?}: {} vertices, {} uvs, {} normals, {} indices",
                mesh.user_id,
                mesh.vertices.len(),
                mesh.texture_coords.len(),
                mesh.normals.len(),
                mesh.indices.len(),
            );
        }
        for &root in &self.resource_roots {
            let mut pending = vec![(root, 0usize)];
            while let Some((index, depth)) = pending.pop() {
                let Some(resource) = self.resources.get(index) else {
                    continue;
                };
                log::debug!(
                    "{:indent$}resource {index} user {:?} mesh {:?} material {:?}",
                    "",
                    resource.user_id,
                    resource.mesh,
                    resource.material,
                    indent = depth * 2,
                );
                for (child, _) in self.resources.children_rev(index).into_iter().flatten() {
                    pending.push((child, depth + 1));
                }
            }
        }
    }
}

fn register(
    map: &mut IndexMap<UserId, NodeIndex>,
    id: Option<UserId>,
    index: NodeIndex,
    kind: &str,
) {
    let Some(id) = id else {
        return;
    };
    if let Some(previous) = map.insert(id, index) {
        log::warn!(
            "{kind} user id {id} redefined: {previous} replaced by {index}"
        );
    }
}
