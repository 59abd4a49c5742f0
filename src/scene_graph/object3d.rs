use id_arena::Id;

use crate::scene_graph::scene_model::{SceneModelId, SkinId};
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

#[derive(Default)]
pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    pub skin_id: Option<SkinId>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}
