use std::collections::HashMap;

use glam::{Quat, Vec3};
use gltf::animation::{util::ReadOutputs, Property};

use crate::model::Buffers;
use crate::scene_graph::object3d::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
}

#[derive(Debug, Clone)]
pub enum Keyframes {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl Keyframes {
    fn len(&self) -> usize {
        match self {
            Keyframes::Translation(values) => values.len(),
            Keyframes::Rotation(values) => values.len(),
            Keyframes::Scale(values) => values.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub object: ObjectId,
    pub times: Vec<f32>,
    pub keyframes: Keyframes,
    pub interpolation: Interpolation,
}

impl Channel {
    pub fn sample(&self, time: f32) -> ChannelValue {
        let count = self.times.len().min(self.keyframes.len());
        debug_assert!(count > 0, "channel without keyframes");

        // Index of the first keyframe strictly after `time`.
        let next = self.times[..count].partition_point(|&t| t <= time);

        let (a, b, t) = if next == 0 {
            (0, 0, 0.0)
        } else if next >= count {
            (count - 1, count - 1, 0.0)
        } else {
            let prev = next - 1;
            let span = self.times[next] - self.times[prev];
            let t = if span > 0.0 {
                (time - self.times[prev]) / span
            } else {
                0.0
            };
            match self.interpolation {
                Interpolation::Step => (prev, prev, 0.0),
                Interpolation::Linear => (prev, next, t),
            }
        };

        match &self.keyframes {
            Keyframes::Translation(values) => ChannelValue::Translation(values[a].lerp(values[b], t)),
            Keyframes::Rotation(values) => ChannelValue::Rotation(values[a].slerp(values[b], t)),
            Keyframes::Scale(values) => ChannelValue::Scale(values[a].lerp(values[b], t)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Reads a glTF animation, resolving node indices through `node_objects`.
    ///
    /// Channels that target unknown nodes or morph weights are skipped.
    /// Cubic-spline channels keep their key values and are sampled linearly.
    pub fn from_gltf(
        animation: &gltf::Animation,
        buffers: Buffers,
        node_objects: &HashMap<usize, ObjectId>,
    ) -> Option<AnimationClip> {
        let name = animation
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("Animation {}", animation.index()));

        let mut channels = Vec::new();

        for channel in animation.channels() {
            let target = channel.target();
            let Some(&object) = node_objects.get(&target.node().index()) else {
                continue;
            };

            if target.property() == Property::MorphTargetWeights {
                continue;
            }

            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
            let Some(inputs) = reader.read_inputs() else {
                continue;
            };
            let times: Vec<f32> = inputs.collect();

            let (interpolation, stride) = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Step => (Interpolation::Step, 1),
                gltf::animation::Interpolation::Linear => (Interpolation::Linear, 1),
                gltf::animation::Interpolation::CubicSpline => (Interpolation::Linear, 3),
            };
            let offset = if stride == 3 { 1 } else { 0 };

            let keyframes = match reader.read_outputs() {
                Some(ReadOutputs::Translations(values)) => Keyframes::Translation(
                    values.skip(offset).step_by(stride).map(Vec3::from).collect(),
                ),
                Some(ReadOutputs::Rotations(values)) => Keyframes::Rotation(
                    values
                        .into_f32()
                        .skip(offset)
                        .step_by(stride)
                        .map(|q| Quat::from_array(q).normalize())
                        .collect(),
                ),
                Some(ReadOutputs::Scales(values)) => Keyframes::Scale(
                    values.skip(offset).step_by(stride).map(Vec3::from).collect(),
                ),
                _ => continue,
            };

            if times.is_empty() || keyframes.len() == 0 {
                continue;
            }

            channels.push(Channel {
                object,
                times,
                keyframes,
                interpolation,
            });
        }

        if channels.is_empty() {
            log::warn!("Animation clip {} has no usable channels", name);
            return None;
        }

        let duration = channels
            .iter()
            .filter_map(|channel| channel.times.last().copied())
            .fold(0.0, f32::max);

        Some(AnimationClip {
            name,
            duration,
            channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{object3d::Object3D, scene::Scene};

    fn translation_channel(interpolation: Interpolation) -> Channel {
        let mut scene = Scene::new();
        let object = scene.add_object(Object3D::default());

        Channel {
            object,
            times: vec![0.0, 1.0, 3.0],
            keyframes: Keyframes::Translation(vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 4.0, 0.0),
            ]),
            interpolation,
        }
    }

    #[test]
    fn linear_sampling_interpolates_between_keys() {
        let channel = translation_channel(Interpolation::Linear);

        assert_eq!(channel.sample(0.5), ChannelValue::Translation(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(channel.sample(2.0), ChannelValue::Translation(Vec3::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn step_sampling_holds_previous_key() {
        let channel = translation_channel(Interpolation::Step);

        assert_eq!(channel.sample(0.9), ChannelValue::Translation(Vec3::ZERO));
        assert_eq!(channel.sample(1.0), ChannelValue::Translation(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn sampling_outside_range_clamps_to_ends() {
        let channel = translation_channel(Interpolation::Linear);

        assert_eq!(channel.sample(-1.0), ChannelValue::Translation(Vec3::ZERO));
        assert_eq!(channel.sample(10.0), ChannelValue::Translation(Vec3::new(2.0, 4.0, 0.0)));
    }

    #[test]
    fn rotation_sampling_slerps() {
        let mut channel = translation_channel(Interpolation::Linear);
        let quarter = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        channel.times = vec![0.0, 1.0];
        channel.keyframes = Keyframes::Rotation(vec![Quat::IDENTITY, quarter]);

        let ChannelValue::Rotation(halfway) = channel.sample(0.5) else {
            panic!("expected a rotation");
        };
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(halfway.angle_between(expected) < 1e-4);
    }
}
