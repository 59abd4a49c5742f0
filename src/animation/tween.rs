use glam::{EulerRot, Quat, Vec3};

use crate::animation::easing::Ease;

/// Position and Euler rotation (XYZ order, radians) of an animated group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseField {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl GroupPose {
    pub fn get(&self, field: PoseField) -> f32 {
        match field {
            PoseField::PositionX => self.position.x,
            PoseField::PositionY => self.position.y,
            PoseField::PositionZ => self.position.z,
            PoseField::RotationX => self.rotation.x,
            PoseField::RotationY => self.rotation.y,
            PoseField::RotationZ => self.rotation.z,
        }
    }

    pub fn set(&mut self, field: PoseField, value: f32) {
        match field {
            PoseField::PositionX => self.position.x = value,
            PoseField::PositionY => self.position.y = value,
            PoseField::PositionZ => self.position.z = value,
            PoseField::RotationX => self.rotation.x = value,
            PoseField::RotationY => self.rotation.y = value,
            PoseField::RotationZ => self.rotation.z = value,
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

#[derive(Debug, Clone)]
struct Tween {
    field: PoseField,
    // Captured from the pose on the first tick, not when the tween is requested.
    from: Option<f32>,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl Tween {
    /// Returns true once the tween has reached its target.
    fn advance(&mut self, dt: f32, pose: &mut GroupPose) -> bool {
        let from = *self.from.get_or_insert_with(|| pose.get(self.field));
        self.elapsed += dt;

        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };

        if progress >= 1.0 {
            pose.set(self.field, self.to);
            return true;
        }

        let eased = self.ease.evaluate(progress);
        pose.set(self.field, from + (self.to - from) * eased);
        false
    }
}

/// Time-driven tweens over the fields of a [`GroupPose`].
///
/// At most one tween runs per field. Requesting a tween on a field that is
/// already animating replaces the running tween; the replacement starts
/// from wherever the field currently is.
#[derive(Debug, Default)]
pub struct Tweener {
    tweens: Vec<Tween>,
}

impl Tweener {
    pub fn new() -> Self {
        Self { tweens: Vec::new() }
    }

    pub fn to(&mut self, field: PoseField, target: f32, duration: f32, ease: Ease) {
        self.tweens.retain(|tween| tween.field != field);
        self.tweens.push(Tween {
            field,
            from: None,
            to: target,
            duration,
            elapsed: 0.0,
            ease,
        });
    }

    pub fn advance(&mut self, dt: f32, pose: &mut GroupPose) {
        self.tweens.retain_mut(|tween| !tween.advance(dt, pose));
    }

    pub fn is_animating(&self, field: PoseField) -> bool {
        self.tweens.iter().any(|tween| tween.field == field)
    }

    pub fn target_of(&self, field: PoseField) -> Option<f32> {
        self.tweens
            .iter()
            .find(|tween| tween.field == field)
            .map(|tween| tween.to)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn kill_all(&mut self) {
        self.tweens.clear();
    }
}

/// A set of field targets animated together with one duration and curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub targets: Vec<(PoseField, f32)>,
    pub duration: f32,
    pub ease: Ease,
}

impl Transition {
    pub fn new(targets: impl Into<Vec<(PoseField, f32)>>, duration: f32, ease: Ease) -> Self {
        Self {
            targets: targets.into(),
            duration,
            ease,
        }
    }

    pub fn start(&self, tweener: &mut Tweener) {
        for &(field, target) in &self.targets {
            tweener.to(field, target, self.duration, self.ease);
        }
    }
}
