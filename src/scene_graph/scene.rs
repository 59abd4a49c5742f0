use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::collections::HashMap;

use crate::model::{Buffers, Model};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId, Skin, SkinId};
use crate::scene_graph::transform::Transform;

/// Objects created from one glTF scene.
pub struct SpawnedGltf {
    pub roots: Vec<ObjectId>,
    /// glTF node index to scene object.
    pub node_objects: HashMap<usize, ObjectId>,
}

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    pub skins: Arena<Skin>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            skins: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let id = self.add_object(object);
        self.set_object_parent(id, Some(parent));
        id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Spawns every node of `scene` under `parent`, along with its meshes and skins.
    pub fn spawn_gltf_scene(
        &mut self,
        buffers: Buffers,
        scene: &gltf::Scene,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<SpawnedGltf> {
        let mut spawned = SpawnedGltf {
            roots: Vec::new(),
            node_objects: HashMap::new(),
        };
        let mut mesh_models = HashMap::new();
        let mut skinned_nodes = Vec::new();

        for node in scene.nodes() {
            let root = self.spawn_gltf_node(
                buffers,
                &node,
                parent,
                &mut spawned,
                &mut mesh_models,
                &mut skinned_nodes,
            )?;
            spawned.roots.push(root);
        }

        // Skins reference joints anywhere in the hierarchy, so resolve them last.
        let mut gltf_skins: HashMap<usize, SkinId> = HashMap::new();
        for (object_id, skin) in skinned_nodes {
            let skin_id = match gltf_skins.get(&skin.index()) {
                Some(&skin_id) => skin_id,
                None => {
                    let skin_id = self.add_gltf_skin(buffers, &skin, &spawned.node_objects);
                    gltf_skins.insert(skin.index(), skin_id);
                    skin_id
                }
            };

            if let Some(object) = self.objects.get_mut(object_id) {
                object.skin_id = Some(skin_id);
            }
        }

        Ok(spawned)
    }

    fn spawn_gltf_node<'a>(
        &mut self,
        buffers: Buffers,
        node: &gltf::Node<'a>,
        parent: Option<ObjectId>,
        spawned: &mut SpawnedGltf,
        mesh_models: &mut HashMap<usize, SceneModelId>,
        skinned_nodes: &mut Vec<(ObjectId, gltf::Skin<'a>)>,
    ) -> anyhow::Result<ObjectId> {
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        let (translation, rotation, scale) = node.transform().decomposed();

        let mut object = Object3D::named(node_name.clone()).with_transform(Transform::new(
            translation.into(),
            Quat::from_array(rotation),
            scale.into(),
        ));

        if let Some(mesh) = node.mesh() {
            let model_id = match mesh_models.get(&mesh.index()).copied() {
                Some(model_id) => model_id,
                None => {
                    let mesh_index = mesh.index();
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));
                    let model = Model::from_gltf(mesh_name, mesh, buffers)?;
                    let model_id = self.models.alloc(SceneModel::new(model));
                    mesh_models.insert(mesh_index, model_id);
                    model_id
                }
            };
            object.model_id = Some(model_id);
        }

        let object_id = self.add_object(object);
        spawned.node_objects.insert(node.index(), object_id);

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        if let Some(skin) = node.skin() {
            skinned_nodes.push((object_id, skin));
        }

        for child in node.children() {
            self.spawn_gltf_node(
                buffers,
                &child,
                Some(object_id),
                spawned,
                mesh_models,
                skinned_nodes,
            )?;
        }

        Ok(object_id)
    }

    fn add_gltf_skin(
        &mut self,
        buffers: Buffers,
        skin: &gltf::Skin,
        node_objects: &HashMap<usize, ObjectId>,
    ) -> SkinId {
        let joints: Vec<ObjectId> = skin
            .joints()
            .filter_map(|joint| node_objects.get(&joint.index()).copied())
            .collect();

        let reader = skin.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
        let inverse_bind_matrices = match reader.read_inverse_bind_matrices() {
            Some(matrices) => matrices.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
            None => vec![Mat4::IDENTITY; joints.len()],
        };

        self.skins.alloc(Skin {
            joints,
            inverse_bind_matrices,
        })
    }

    /// Joint matrices (joint world × inverse bind) for `skin_id`.
    pub fn joint_matrices(&self, skin_id: SkinId) -> Vec<Mat4> {
        let Some(skin) = self.skins.get(skin_id) else {
            return Vec::new();
        };

        skin.joints
            .iter()
            .zip(&skin.inverse_bind_matrices)
            .map(|(&joint, inverse_bind)| {
                let world = self
                    .get_object_transform(joint)
                    .map(|transform| *transform.world_matrix())
                    .unwrap_or(Mat4::IDENTITY);
                world * *inverse_bind
            })
            .collect()
    }

    fn update_transforms(&self) {
        let roots = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in roots {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        let Some(object) = self.objects.get(object_id) else {
            return;
        };

        let changed = parent_changed || object.transform.is_world_dirty();
        if changed {
            let local_matrix = *object.transform.local_matrix();
            object
                .transform
                .set_world_matrix(parent_world_matrix * local_matrix);
        }

        let world_matrix = *object.transform.world_matrix();
        for &child_id in &object.child_ids {
            self.update_object_transform_recursive(child_id, world_matrix, changed);
        }
    }

    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
            child.transform.invalidate_world();
        }

        if let Some(parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            parent.child_ids.push(child_id);
        }
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_rotation(rotation);
        }
    }

    pub fn set_object_scale(&mut self, object_id: ObjectId, scale: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_scale(scale);
        }
    }

    /// Sets translation and rotation, keeping the current scale.
    pub fn set_object_pose(&mut self, object_id: ObjectId, translation: Vec3, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(object_id) {
            let scale = object.transform.scale();
            object.transform.set_transform(translation, rotation, scale);
        }
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// Objects carrying a mesh, with their model.
    pub fn drawables(&self) -> impl Iterator<Item = (ObjectId, &Object3D, SceneModelId)> {
        self.objects
            .iter()
            .filter_map(|(id, object)| object.model_id.map(|model_id| (id, object, model_id)))
    }

    /// Recomputes world matrices; call once per frame after all transform edits.
    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Astronaut", "children": [1], "translation": [0.0, 1.0, 0.0] },
            { "name": "Helmet", "scale": [2.0, 2.0, 2.0] }
        ]
    }"#;

    #[test]
    fn world_matrices_compose_through_hierarchy() {
        let mut scene = Scene::new();
        let parent = scene.add_object(
            Object3D::named("parent").with_transform(Transform::from_translation(Vec3::X)),
        );
        let child = scene.add_child(
            parent,
            Object3D::named("child").with_transform(Transform::from_translation(Vec3::Y)),
        );

        scene.late_update();
        let world = *scene.get_object_transform(child).unwrap().world_matrix();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));

        scene.set_object_translation(parent, Vec3::Z);
        scene.late_update();
        let world = *scene.get_object_transform(child).unwrap().world_matrix();
        assert_eq!(world.transform_point3(Vec3::ZERO), Vec3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn reparenting_moves_child_between_lists() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object3D::named("a"));
        let b = scene.add_object(Object3D::named("b"));
        let child = scene.add_child(a, Object3D::named("child"));

        scene.set_object_parent(child, Some(b));

        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(scene.get_object(child).unwrap().parent_id, Some(b));
    }

    #[test]
    fn spawns_gltf_nodes_under_parent() {
        let gltf = gltf::Gltf::from_slice(NESTED_GLTF.as_bytes()).unwrap();
        let gltf_scene = gltf.document.default_scene().unwrap();

        let mut scene = Scene::new();
        let holder = scene.add_object(Object3D::named("holder"));
        let spawned = scene.spawn_gltf_scene(&[], &gltf_scene, Some(holder)).unwrap();

        assert_eq!(spawned.roots.len(), 1);
        assert_eq!(spawned.node_objects.len(), 2);

        let astronaut = scene.get_object_by_name("Astronaut").unwrap();
        let helmet = scene.get_object_by_name("Helmet").unwrap();
        assert_eq!(scene.get_object(astronaut).unwrap().parent_id, Some(holder));
        assert_eq!(scene.get_object(helmet).unwrap().parent_id, Some(astronaut));
        assert_eq!(
            scene.get_object_transform(helmet).unwrap().scale(),
            Vec3::splat(2.0)
        );
        assert_eq!(spawned.node_objects[&1], helmet);
    }
}
