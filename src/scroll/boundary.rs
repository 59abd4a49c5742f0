use crate::scroll::{PageMetrics, SectionId};

/// Where a boundary fires: the point `element` of the way down the section
/// meeting the point `viewport` of the way down the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerStart {
    pub element: f32,
    pub viewport: f32,
}

impl TriggerStart {
    /// Section top reaches the vertical centre of the viewport.
    pub const TOP_CENTER: TriggerStart = TriggerStart {
        element: 0.0,
        viewport: 0.5,
    };

    /// Scroll offset at which the trigger point is reached, if the section
    /// has been measured.
    pub fn scroll_position(&self, section: SectionId, metrics: &PageMetrics) -> Option<f32> {
        let bounds = metrics.section(section)?;
        Some(bounds.top + bounds.height * self.element - metrics.viewport_height * self.viewport)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// Scrolled down past the trigger point.
    Enter,
    /// Scrolled back up above the trigger point.
    LeaveBack,
}

#[derive(Debug, Clone)]
pub struct Boundary {
    pub section: SectionId,
    pub start: TriggerStart,
    state: BoundaryState,
}

impl Boundary {
    pub fn new(section: SectionId, start: TriggerStart) -> Self {
        Self {
            section,
            start,
            state: BoundaryState::Outside,
        }
    }

    pub fn state(&self) -> BoundaryState {
        self.state
    }

    /// Steps the state machine against the current scroll position and
    /// reports a crossing when the state changes.
    pub fn evaluate(&mut self, metrics: &PageMetrics) -> Option<(f32, Crossing)> {
        let position = self.start.scroll_position(self.section, metrics)?;
        let past = metrics.scroll_y >= position;

        match (self.state, past) {
            (BoundaryState::Outside, true) => {
                self.state = BoundaryState::Inside;
                Some((position, Crossing::Enter))
            }
            (BoundaryState::Inside, false) => {
                self.state = BoundaryState::Outside;
                Some((position, Crossing::LeaveBack))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::{tests::metrics_at, ABOUT_ME};

    #[test]
    fn top_center_fires_half_a_viewport_early() {
        let metrics = metrics_at(0.0);
        let position = TriggerStart::TOP_CENTER
            .scroll_position(ABOUT_ME, &metrics)
            .unwrap();
        assert_eq!(position, 872.0 - 400.0);
    }

    #[test]
    fn unmeasured_section_never_fires() {
        let mut boundary = Boundary::new("missing", TriggerStart::TOP_CENTER);
        assert_eq!(boundary.evaluate(&metrics_at(10_000.0)), None);
        assert_eq!(boundary.state(), BoundaryState::Outside);
    }

    #[test]
    fn crossings_alternate() {
        let mut boundary = Boundary::new(ABOUT_ME, TriggerStart::TOP_CENTER);

        assert_eq!(boundary.evaluate(&metrics_at(100.0)), None);
        assert_eq!(
            boundary.evaluate(&metrics_at(472.0)),
            Some((472.0, Crossing::Enter))
        );
        assert_eq!(boundary.evaluate(&metrics_at(900.0)), None);
        assert_eq!(
            boundary.evaluate(&metrics_at(471.0)),
            Some((472.0, Crossing::LeaveBack))
        );
        assert_eq!(boundary.evaluate(&metrics_at(0.0)), None);
        assert_eq!(boundary.state(), BoundaryState::Outside);
    }
}
