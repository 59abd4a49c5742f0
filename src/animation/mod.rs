pub mod clip;
pub mod easing;
pub mod mixer;
pub mod tween;

pub use clip::AnimationClip;
pub use easing::Ease;
pub use mixer::AnimationMixer;
pub use tween::{GroupPose, PoseField, Transition, Tweener};
