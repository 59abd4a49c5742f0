use glam::Mat4;
use id_arena::Id;

use crate::model::Model;
use crate::scene_graph::object3d::ObjectId;

pub type SceneModelId = Id<SceneModel>;
pub type SkinId = Id<Skin>;

pub struct SceneModel {
    pub model: Model,
    /// Set by the renderer once GPU buffers exist for this model.
    pub uploaded: bool,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            uploaded: false,
        }
    }
}

pub struct Skin {
    pub joints: Vec<ObjectId>,
    pub inverse_bind_matrices: Vec<Mat4>,
}
