use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::animation::clip::{AnimationClip, ChannelValue};
use crate::scene_graph::object3d::ObjectId;
use crate::scene_graph::scene::Scene;

#[derive(Debug, Clone, Copy)]
struct RestPose {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Repeat,
}

/// A playing instance of one clip.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: usize,
    time: f32,
    weight: f32,
    fade: Option<Fade>,
    loop_mode: LoopMode,
    playing: bool,
}

impl ClipAction {
    fn new(clip: usize) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            fade: None,
            loop_mode: LoopMode::Repeat,
            playing: false,
        }
    }

    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.weight = 1.0;
        self.fade = None;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.weight = 0.0;
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
        self
    }

    pub fn set_loop(&mut self, loop_mode: LoopMode) -> &mut Self {
        self.loop_mode = loop_mode;
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.playing = true;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    fn advance(&mut self, dt: f32, duration: f32) {
        self.time += dt;

        match self.loop_mode {
            LoopMode::Repeat if duration > 0.0 => self.time = self.time.rem_euclid(duration),
            LoopMode::Repeat => self.time = 0.0,
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.playing = false;
                }
            }
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            let t = if fade.duration > 0.0 {
                (fade.elapsed / fade.duration).min(1.0)
            } else {
                1.0
            };
            self.weight = fade.from + (fade.to - fade.from) * t;
            if t >= 1.0 {
                self.fade = None;
            }
        }
    }
}

/// Plays animation clips on scene objects, blending each animated object
/// from its rest pose toward the sampled pose by the action weight.
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<ClipAction>,
    rest_poses: HashMap<ObjectId, RestPose>,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>, scene: &Scene) -> Self {
        let mut rest_poses = HashMap::new();

        for channel in clips.iter().flat_map(|clip| &clip.channels) {
            if rest_poses.contains_key(&channel.object) {
                continue;
            }
            if let Some(transform) = scene.get_object_transform(channel.object) {
                rest_poses.insert(
                    channel.object,
                    RestPose {
                        translation: transform.translation(),
                        rotation: transform.rotation(),
                        scale: transform.scale(),
                    },
                );
            }
        }

        let actions = (0..clips.len()).map(ClipAction::new).collect();

        Self {
            clips,
            actions,
            rest_poses,
        }
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|clip| clip.name.as_str())
    }

    pub fn action(&mut self, name: &str) -> Option<&mut ClipAction> {
        let index = self.clips.iter().position(|clip| clip.name == name)?;
        self.actions.get_mut(index)
    }

    pub fn first_action(&mut self) -> Option<&mut ClipAction> {
        self.actions.first_mut()
    }

    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.iter_mut().filter(|action| action.playing) {
            let clip = &self.clips[action.clip];
            action.advance(dt, clip.duration);

            for channel in &clip.channels {
                let Some(rest) = self.rest_poses.get(&channel.object) else {
                    continue;
                };

                let weight = action.weight;
                match channel.sample(action.time) {
                    ChannelValue::Translation(value) => {
                        scene.set_object_translation(
                            channel.object,
                            rest.translation.lerp(value, weight),
                        );
                    }
                    ChannelValue::Rotation(value) => {
                        scene.set_object_rotation(channel.object, rest.rotation.slerp(value, weight));
                    }
                    ChannelValue::Scale(value) => {
                        scene.set_object_scale(channel.object, rest.scale.lerp(value, weight));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clip::{Channel, Interpolation, Keyframes};
    use crate::scene_graph::object3d::Object3D;

    fn walk_cycle(scene: &mut Scene) -> (ObjectId, AnimationClip) {
        let object = scene.add_object(Object3D::default());
        let clip = AnimationClip {
            name: "Walk".to_string(),
            duration: 2.0,
            channels: vec![Channel {
                object,
                times: vec![0.0, 2.0],
                keyframes: Keyframes::Translation(vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(4.0, 0.0, 0.0),
                ]),
                interpolation: Interpolation::Linear,
            }],
        };
        (object, clip)
    }

    fn translation_x(scene: &Scene, object: ObjectId) -> f32 {
        scene.get_object_transform(object).unwrap().translation().x
    }

    #[test]
    fn fade_in_ramps_weight() {
        let mut scene = Scene::new();
        let (_, clip) = walk_cycle(&mut scene);
        let mut mixer = AnimationMixer::new(vec![clip], &scene);

        mixer.first_action().unwrap().reset().fade_in(0.5).play();
        assert_eq!(mixer.first_action().unwrap().weight(), 0.0);

        mixer.update(0.25, &mut scene);
        assert!((mixer.first_action().unwrap().weight() - 0.5).abs() < 1e-6);

        mixer.update(0.5, &mut scene);
        assert_eq!(mixer.first_action().unwrap().weight(), 1.0);
    }

    #[test]
    fn weight_blends_from_rest_pose() {
        let mut scene = Scene::new();
        let (object, clip) = walk_cycle(&mut scene);
        let mut mixer = AnimationMixer::new(vec![clip], &scene);

        mixer.first_action().unwrap().fade_in(1.0).play();
        mixer.update(0.5, &mut scene);

        // Sampled x is 1.0 at t=0.5, weight is 0.5.
        assert!((translation_x(&scene, object) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn repeat_wraps_time() {
        let mut scene = Scene::new();
        let (object, clip) = walk_cycle(&mut scene);
        let mut mixer = AnimationMixer::new(vec![clip], &scene);

        mixer.action("Walk").unwrap().play();
        mixer.update(2.5, &mut scene);

        let action = mixer.first_action().unwrap();
        assert!((action.time() - 0.5).abs() < 1e-5);
        assert!(action.is_playing());
        assert!((translation_x(&scene, object) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn once_stops_at_the_end() {
        let mut scene = Scene::new();
        let (_, clip) = walk_cycle(&mut scene);
        let mut mixer = AnimationMixer::new(vec![clip], &scene);

        mixer.first_action().unwrap().set_loop(LoopMode::Once).play();
        mixer.update(3.0, &mut scene);

        let action = mixer.first_action().unwrap();
        assert_eq!(action.time(), 2.0);
        assert!(!action.is_playing());
    }

    #[test]
    fn idle_actions_leave_scene_untouched() {
        let mut scene = Scene::new();
        let (object, clip) = walk_cycle(&mut scene);
        scene.set_object_translation(object, Vec3::new(9.0, 0.0, 0.0));
        let mut mixer = AnimationMixer::new(vec![clip], &scene);

        mixer.update(1.0, &mut scene);

        assert_eq!(translation_x(&scene, object), 9.0);
        assert_eq!(mixer.clip_names().collect::<Vec<_>>(), vec!["Walk"]);
        assert!(mixer.action("Run").is_none());
    }
}
