//! CPU side of the 3D backdrop: scene graph, lights, stars and the floating
//! astronaut.
//!
//! Hierarchy of the animated part:
//!
//! ```text
//! float group        idle wobble, rewritten every frame
//! └─ handle group    pose driven by scroll tweens (the transform handle)
//!    └─ model root   fixed scale/offset of the imported model
//!       └─ glTF nodes
//! ```

pub mod float;
pub mod lighting;
pub mod loader;
pub mod starfield;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::animation::{AnimationClip, AnimationMixer, GroupPose};
use crate::camera::Camera;
use crate::config::{ModelConfig, SceneConfig};
use crate::readiness::Notifier;
use crate::scene_graph::{Object3D, ObjectId, Scene, Transform};

use self::float::Float;
use self::lighting::Lighting;
use self::loader::{LoadedAsset, PendingAsset};
use self::starfield::Starfield;

/// Key for the pose that scroll animation is allowed to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformHandle {
    object: ObjectId,
}

struct MountedGroups {
    float: ObjectId,
    handle: ObjectId,
    model_root: ObjectId,
}

enum LoadState {
    Loading(PendingAsset),
    Loaded,
    Failed,
}

pub struct SceneHost {
    pub scene: Scene,
    pub camera: Camera,
    pub lighting: Lighting,
    pub starfield: Starfield,
    /// Images of the loaded asset, indexed like the glTF image list.
    pub images: Vec<gltf::image::Data>,

    model_config: ModelConfig,
    float: Float,
    groups: Option<MountedGroups>,
    pose: GroupPose,
    mixer: Option<AnimationMixer>,
    load_state: LoadState,
    notifier: Option<Notifier<TransformHandle>>,
    elapsed: f32,
}

impl SceneHost {
    pub fn new(
        config: &SceneConfig,
        asset: PendingAsset,
        notifier: Notifier<TransformHandle>,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera::from_config(&config.camera),
            lighting: Lighting::from_config(&config.lighting),
            starfield: Starfield::generate(&config.starfield, rng),
            images: Vec::new(),
            model_config: config.model.clone(),
            float: Float::new(config.float.clone(), rng),
            groups: None,
            pose: GroupPose::default(),
            mixer: None,
            load_state: LoadState::Loading(asset),
            notifier: Some(notifier),
            elapsed: 0.0,
        }
    }

    /// Creates the floating groups and announces the transform handle.
    /// Calling it again does nothing.
    pub fn mount(&mut self) {
        if self.groups.is_some() {
            return;
        }

        let float = self.scene.add_object(Object3D::named("Float"));
        let handle = self.scene.add_child(float, Object3D::named("Astronaut group"));
        let model_root = self.scene.add_child(
            handle,
            Object3D::named("Astronaut").with_transform(Transform::new(
                self.model_config.position,
                Quat::IDENTITY,
                Vec3::splat(self.model_config.scale),
            )),
        );

        self.groups = Some(MountedGroups {
            float,
            handle,
            model_root,
        });

        if let Some(notifier) = self.notifier.take() {
            log::debug!("Floating group mounted");
            notifier.notify(TransformHandle { object: handle });
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.groups.is_some()
    }

    pub fn pose_mut(&mut self, handle: TransformHandle) -> Option<&mut GroupPose> {
        let groups = self.groups.as_ref()?;
        (groups.handle == handle.object).then_some(&mut self.pose)
    }

    pub fn pose(&self) -> GroupPose {
        self.pose
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.load_state, LoadState::Loaded)
    }

    /// The loading indicator shows from mount until the model is in the scene.
    /// A failed load leaves it up.
    pub fn placeholder_visible(&self) -> bool {
        self.is_mounted() && !self.is_model_loaded()
    }

    /// World position the loading indicator is centred on.
    pub fn placeholder_anchor(&self) -> Option<Vec3> {
        let groups = self.groups.as_ref()?;
        let transform = self.scene.get_object_transform(groups.handle)?;
        Some(transform.world_matrix().transform_point3(Vec3::ZERO))
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.poll_asset();

        if let Some(groups) = &self.groups {
            let wobble = self.float.pose_at(self.elapsed);
            self.scene.set_object_pose(
                groups.float,
                Vec3::new(0.0, wobble.height, 0.0),
                euler_xyz(wobble.rotation),
            );
            self.scene.set_object_pose(
                groups.handle,
                self.pose.position,
                self.pose.rotation_quat(),
            );
        }

        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(dt, &mut self.scene);
        }

        self.scene.late_update();
    }

    fn poll_asset(&mut self) {
        // The model is attached under the model root, so wait for the mount.
        let Some(model_root) = self.groups.as_ref().map(|groups| groups.model_root) else {
            return;
        };
        let LoadState::Loading(pending) = &mut self.load_state else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };

        self.load_state = match result.and_then(|asset| self.attach_asset(asset, model_root)) {
            Ok(()) => LoadState::Loaded,
            Err(error) => {
                log::error!("Failed to load model: {:#}", error);
                LoadState::Failed
            }
        };
    }

    fn attach_asset(&mut self, asset: LoadedAsset, model_root: ObjectId) -> anyhow::Result<()> {
        let gltf_scene = asset
            .document
            .default_scene()
            .or_else(|| asset.document.scenes().next())
            .ok_or_else(|| anyhow::anyhow!("No scenes in model"))?;

        let spawned = self
            .scene
            .spawn_gltf_scene(&asset.buffers, &gltf_scene, Some(model_root))?;

        let clips: Vec<AnimationClip> = asset
            .document
            .animations()
            .filter_map(|animation| {
                AnimationClip::from_gltf(&animation, &asset.buffers, &spawned.node_objects)
            })
            .collect();

        self.images = asset.images;

        if clips.is_empty() {
            log::info!("Model has no animation clips");
            return Ok(());
        }

        let mut mixer = AnimationMixer::new(clips, &self.scene);
        if let Some(name) = mixer.clip_names().next() {
            log::info!("Playing animation {}", name);
        }
        if let Some(action) = mixer.first_action() {
            action.reset().fade_in(self.model_config.fade_in).play();
        }
        self.mixer = Some(mixer);

        Ok(())
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }
}

fn euler_xyz(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use tokio::sync::oneshot;

    use super::*;
    use crate::config::StarfieldConfig;
    use crate::readiness::{self, ReadyState};

    const ASTRONAUT_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "Astronaut body" }]
    }"#;

    fn small_config() -> SceneConfig {
        SceneConfig {
            starfield: StarfieldConfig {
                count: 16,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn loaded_asset() -> LoadedAsset {
        let gltf = gltf::Gltf::from_slice(ASTRONAUT_GLTF.as_bytes()).unwrap();
        LoadedAsset {
            document: gltf.document,
            buffers: Vec::new(),
            images: Vec::new(),
        }
    }

    fn host_with_manual_asset() -> (
        SceneHost,
        oneshot::Sender<anyhow::Result<LoadedAsset>>,
        readiness::Readiness<TransformHandle>,
    ) {
        let (sender, receiver) = oneshot::channel();
        let (notifier, readiness) = readiness::channel();
        let host = SceneHost::new(
            &small_config(),
            PendingAsset::from_receiver("astronaut.glb", receiver),
            notifier,
            &mut StdRng::seed_from_u64(11),
        );
        (host, sender, readiness)
    }

    #[test]
    fn handle_is_announced_on_mount_only() {
        let (mut host, _sender, mut readiness) = host_with_manual_asset();

        host.update(0.016);
        assert_eq!(readiness.take(), ReadyState::Pending);

        host.mount();
        host.mount();
        let ReadyState::Ready(handle) = readiness.take() else {
            panic!("handle not announced");
        };
        assert_eq!(readiness.take(), ReadyState::Finished);
        assert!(host.pose_mut(handle).is_some());
    }

    #[test]
    fn placeholder_shows_until_model_is_attached() {
        let (mut host, sender, _readiness) = host_with_manual_asset();
        host.mount();
        host.update(0.016);
        assert!(host.placeholder_visible());

        sender.send(Ok(loaded_asset())).ok().unwrap();
        host.update(0.016);

        assert!(!host.placeholder_visible());
        assert!(host.is_model_loaded());
        assert!(host.scene.get_object_by_name("Astronaut body").is_some());
        assert!(host.mixer().is_none());
    }

    #[test]
    fn failed_load_keeps_placeholder() {
        let (mut host, sender, _readiness) = host_with_manual_asset();
        host.mount();

        sender.send(Err(anyhow::anyhow!("corrupt file"))).ok().unwrap();
        host.update(0.016);

        assert!(host.placeholder_visible());
        assert!(!host.is_model_loaded());
    }

    #[test]
    fn pose_drives_the_handle_group() {
        let (mut host, _sender, mut readiness) = host_with_manual_asset();
        host.mount();
        let ReadyState::Ready(handle) = readiness.take() else {
            panic!("handle not announced");
        };

        host.pose_mut(handle).unwrap().position.x = -7.0;
        host.update(0.016);

        let group = host.scene.get_object_by_name("Astronaut group").unwrap();
        let translation = host.scene.get_object_transform(group).unwrap().translation();
        assert_eq!(translation.x, -7.0);

        let anchor = host.placeholder_anchor().unwrap();
        assert!((anchor.x + 7.0).abs() < 0.5);
    }
}
