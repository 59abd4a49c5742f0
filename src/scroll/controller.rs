use crate::animation::{Ease, GroupPose, PoseField, Transition, Tweener};
use crate::readiness::{ReadyState, Readiness};
use crate::scene_host::TransformHandle;
use crate::scroll::boundary::{Boundary, Crossing, TriggerStart};
use crate::scroll::{PageMetrics, SectionId, ABOUT_ME, PROJECTS};

const DURATION: f32 = 1.5;

/// Everything needed to register one boundary.
#[derive(Debug, Clone)]
pub struct BoundarySpec {
    pub label: &'static str,
    pub section: SectionId,
    pub start: TriggerStart,
    pub on_enter: Transition,
    pub on_leave_back: Transition,
}

impl BoundarySpec {
    fn slide(position_x: f32, rotation_y: f32) -> Transition {
        Transition::new(
            [
                (PoseField::PositionX, position_x),
                (PoseField::RotationY, rotation_y),
            ],
            DURATION,
            Ease::POWER2_IN_OUT,
        )
    }

    /// The astronaut swings left for "About Me" and right for "Projects".
    pub fn portfolio() -> Vec<BoundarySpec> {
        vec![
            BoundarySpec {
                label: "About Me",
                section: ABOUT_ME,
                start: TriggerStart::TOP_CENTER,
                on_enter: Self::slide(-7.0, 1.5),
                on_leave_back: Self::slide(0.0, 0.0),
            },
            BoundarySpec {
                label: "Projects",
                section: PROJECTS,
                start: TriggerStart::TOP_CENTER,
                on_enter: Self::slide(7.0, -1.0),
                on_leave_back: Self::slide(-7.0, 1.5),
            },
        ]
    }
}

struct Registration {
    spec: BoundarySpec,
    boundary: Boundary,
}

impl Registration {
    fn dispatch(&self, crossing: Crossing, tweener: &mut Tweener) {
        match crossing {
            Crossing::Enter => {
                log::info!("Entered {}", self.spec.label);
                self.spec.on_enter.start(tweener);
            }
            Crossing::LeaveBack => {
                log::info!("Leaving {}", self.spec.label);
                self.spec.on_leave_back.start(tweener);
            }
        }
    }
}

/// Registers scroll boundaries once the transform handle is available and
/// turns boundary crossings into tweens on it.
///
/// The controller owns its registrations and its tweens. `dispose` (or drop)
/// removes both.
pub struct ScrollTriggerController {
    readiness: Readiness<TransformHandle>,
    pending_specs: Vec<BoundarySpec>,
    registrations: Vec<Registration>,
    handle: Option<TransformHandle>,
    tweener: Tweener,
    last_scroll: Option<f32>,
}

impl ScrollTriggerController {
    pub fn new(readiness: Readiness<TransformHandle>, specs: Vec<BoundarySpec>) -> Self {
        Self {
            readiness,
            pending_specs: specs,
            registrations: Vec::new(),
            handle: None,
            tweener: Tweener::new(),
            last_scroll: None,
        }
    }

    pub fn handle(&self) -> Option<TransformHandle> {
        self.handle
    }

    pub fn registered_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn tweener(&self) -> &Tweener {
        &self.tweener
    }

    fn register_when_ready(&mut self) {
        match self.readiness.take() {
            ReadyState::Ready(handle) => {
                self.handle = Some(handle);
                self.registrations = self
                    .pending_specs
                    .drain(..)
                    .map(|spec| Registration {
                        boundary: Boundary::new(spec.section, spec.start),
                        spec,
                    })
                    .collect();
                log::info!("Registered {} scroll triggers", self.registrations.len());
            }
            ReadyState::Pending | ReadyState::Finished => {}
        }
    }

    /// Checks every boundary against this frame's scroll position.
    ///
    /// Crossings from one update are dispatched in the order the scroll
    /// passed them, so after a fast fling the last boundary passed wins.
    pub fn update(&mut self, metrics: &PageMetrics) {
        if self.handle.is_none() {
            self.register_when_ready();
        }

        let scrolling_up = self
            .last_scroll
            .is_some_and(|last| metrics.scroll_y < last);
        self.last_scroll = Some(metrics.scroll_y);

        let mut crossings: Vec<(f32, usize, Crossing)> = self
            .registrations
            .iter_mut()
            .enumerate()
            .filter_map(|(index, registration)| {
                registration
                    .boundary
                    .evaluate(metrics)
                    .map(|(position, crossing)| (position, index, crossing))
            })
            .collect();

        crossings.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if scrolling_up {
            crossings.reverse();
        }

        for (_, index, crossing) in crossings {
            self.registrations[index].dispatch(crossing, &mut self.tweener);
        }
    }

    /// Advances running tweens on the pose behind the handle.
    pub fn advance(&mut self, dt: f32, pose: &mut GroupPose) {
        self.tweener.advance(dt, pose);
    }

    /// Unregisters every boundary and stops running tweens.
    pub fn dispose(&mut self) {
        if self.registrations.is_empty() && self.pending_specs.is_empty() {
            return;
        }

        log::debug!(
            "Disposing {} scroll triggers",
            self.registrations.len()
        );
        self.registrations.clear();
        self.pending_specs.clear();
        self.tweener.kill_all();
    }
}

impl Drop for ScrollTriggerController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use tokio::sync::oneshot;

    use super::*;
    use crate::config::{SceneConfig, StarfieldConfig};
    use crate::readiness;
    use crate::scene_host::{loader::PendingAsset, SceneHost};
    use crate::scroll::tests::metrics_at;

    const ABOUT_TRIGGER: f32 = 472.0;
    const PROJECTS_TRIGGER: f32 = 1312.0;

    struct Fixture {
        host: SceneHost,
        controller: ScrollTriggerController,
        _loader: oneshot::Sender<anyhow::Result<crate::scene_host::loader::LoadedAsset>>,
    }

    impl Fixture {
        fn new() -> Self {
            let (loader, receiver) = oneshot::channel();
            let (notifier, readiness) = readiness::channel();
            let config = SceneConfig {
                starfield: StarfieldConfig {
                    count: 8,
                    ..Default::default()
                },
                ..Default::default()
            };
            let host = SceneHost::new(
                &config,
                PendingAsset::from_receiver("astronaut.glb", receiver),
                notifier,
                &mut StdRng::seed_from_u64(5),
            );
            let controller = ScrollTriggerController::new(readiness, BoundarySpec::portfolio());

            Self {
                host,
                controller,
                _loader: loader,
            }
        }

        fn mounted() -> Self {
            let mut fixture = Self::new();
            fixture.host.mount();
            fixture
        }

        fn scroll_to(&mut self, scroll_y: f32) {
            self.controller.update(&metrics_at(scroll_y));
        }

        /// Runs frames long enough for any running tween to finish.
        fn settle(&mut self) {
            let handle = self.controller.handle().expect("controller not armed");
            for _ in 0..120 {
                let pose = self.host.pose_mut(handle).unwrap();
                self.controller.advance(1.0 / 60.0, pose);
            }
        }

        fn pose(&self) -> (f32, f32) {
            let pose = self.host.pose();
            (pose.position.x, pose.rotation.y)
        }
    }

    #[test]
    fn about_enter_and_leave_back() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(0.0);

        fixture.scroll_to(ABOUT_TRIGGER + 10.0);
        fixture.settle();
        assert_eq!(fixture.pose(), (-7.0, 1.5));

        fixture.scroll_to(ABOUT_TRIGGER - 10.0);
        fixture.settle();
        assert_eq!(fixture.pose(), (0.0, 0.0));
    }

    #[test]
    fn projects_enter_and_leave_back() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(ABOUT_TRIGGER + 10.0);
        fixture.settle();

        fixture.scroll_to(PROJECTS_TRIGGER + 10.0);
        fixture.settle();
        assert_eq!(fixture.pose(), (7.0, -1.0));

        fixture.scroll_to(PROJECTS_TRIGGER - 10.0);
        fixture.settle();
        assert_eq!(fixture.pose(), (-7.0, 1.5));
    }

    #[test]
    fn tween_is_gradual() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(ABOUT_TRIGGER);

        let handle = fixture.controller.handle().unwrap();
        fixture
            .controller
            .advance(0.75, fixture.host.pose_mut(handle).unwrap());

        let (x, rotation) = fixture.pose();
        assert!(x < 0.0 && x > -7.0);
        assert!(rotation > 0.0 && rotation < 1.5);
    }

    #[test]
    fn repeated_forward_scrolling_keeps_targets() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(ABOUT_TRIGGER + 1.0);
        let tweener = fixture.controller.tweener();
        assert_eq!(tweener.target_of(PoseField::PositionX), Some(-7.0));
        assert_eq!(tweener.target_of(PoseField::RotationY), Some(1.5));

        fixture.scroll_to(ABOUT_TRIGGER + 50.0);
        fixture.scroll_to(ABOUT_TRIGGER + 100.0);

        let tweener = fixture.controller.tweener();
        assert_eq!(tweener.active_count(), 2);
        assert_eq!(tweener.target_of(PoseField::PositionX), Some(-7.0));
        assert_eq!(tweener.target_of(PoseField::RotationY), Some(1.5));

        fixture.settle();
        assert_eq!(fixture.pose(), (-7.0, 1.5));
    }

    #[test]
    fn retargeting_to_the_same_endpoint_is_harmless() {
        let mut tweener = Tweener::new();
        let mut pose = GroupPose::default();
        let specs = BoundarySpec::portfolio();
        let enter = &specs[0].on_enter;

        enter.start(&mut tweener);
        tweener.advance(0.5, &mut pose);
        enter.start(&mut tweener);
        for _ in 0..100 {
            tweener.advance(1.0 / 30.0, &mut pose);
        }

        assert_eq!(pose.position.x, -7.0);
        assert_eq!(pose.rotation.y, 1.5);
    }

    #[test]
    fn registers_only_after_handle_is_ready() {
        let mut fixture = Fixture::new();

        fixture.scroll_to(ABOUT_TRIGGER + 10.0);
        fixture.scroll_to(PROJECTS_TRIGGER + 10.0);
        assert_eq!(fixture.controller.registered_count(), 0);
        assert!(fixture.controller.handle().is_none());
        assert_eq!(fixture.controller.tweener().active_count(), 0);

        fixture.host.mount();
        fixture.scroll_to(0.0);
        assert_eq!(fixture.controller.registered_count(), 2);

        for _ in 0..5 {
            fixture.scroll_to(0.0);
        }
        assert_eq!(fixture.controller.registered_count(), 2);
    }

    #[test]
    fn dropped_notifier_leaves_controller_inert() {
        let (notifier, readiness) = readiness::channel::<TransformHandle>();
        let mut controller = ScrollTriggerController::new(readiness, BoundarySpec::portfolio());
        drop(notifier);

        controller.update(&metrics_at(PROJECTS_TRIGGER + 10.0));
        controller.update(&metrics_at(PROJECTS_TRIGGER + 20.0));

        assert_eq!(controller.registered_count(), 0);
        assert_eq!(controller.tweener().active_count(), 0);
    }

    #[test]
    fn fling_past_both_boundaries_ends_on_projects() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(0.0);

        fixture.scroll_to(PROJECTS_TRIGGER + 500.0);
        assert_eq!(
            fixture.controller.tweener().target_of(PoseField::PositionX),
            Some(7.0)
        );

        fixture.settle();
        assert_eq!(fixture.pose(), (7.0, -1.0));
    }

    #[test]
    fn fling_back_to_top_ends_at_rest() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(PROJECTS_TRIGGER + 500.0);
        fixture.settle();

        fixture.scroll_to(0.0);
        fixture.settle();
        assert_eq!(fixture.pose(), (0.0, 0.0));
    }

    #[test]
    fn dispose_unregisters_and_stops_tweens() {
        let mut fixture = Fixture::mounted();
        fixture.scroll_to(ABOUT_TRIGGER + 10.0);
        assert_eq!(fixture.controller.tweener().active_count(), 2);

        fixture.controller.dispose();
        assert_eq!(fixture.controller.registered_count(), 0);
        assert_eq!(fixture.controller.tweener().active_count(), 0);

        fixture.scroll_to(0.0);
        fixture.scroll_to(PROJECTS_TRIGGER + 10.0);
        assert_eq!(fixture.controller.tweener().active_count(), 0);
    }
}
