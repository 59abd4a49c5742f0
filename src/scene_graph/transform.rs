use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Local TRS transform with lazily rebuilt local and world matrices.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    normal_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            normal_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);
            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.borrow()
    }

    pub fn world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    /// Inverse transpose of the world matrix, for transforming normals.
    pub fn normal_matrix(&self) -> Ref<Mat4> {
        self.normal_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.normal_matrix
            .replace(world_matrix.inverse().transpose());
        self.world_dirty.set(false);
    }

    fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_follows_setters() {
        let mut transform = Transform::default();
        transform.set_translation(Vec3::new(0.0, -4.0, 0.0));
        transform.set_scale(Vec3::splat(1.5));

        let point = transform.local_matrix().transform_point3(Vec3::X);
        assert!((point - Vec3::new(1.5, -4.0, 0.0)).length() < 1e-6);
        assert!(transform.is_world_dirty());
    }

    #[test]
    fn setting_world_matrix_clears_dirty_flag() {
        let transform = Transform::default();
        transform.set_world_matrix(Mat4::from_translation(Vec3::Y));

        assert!(!transform.is_world_dirty());
        assert_eq!(*transform.world_matrix(), Mat4::from_translation(Vec3::Y));
    }
}
