//! Scroll-driven animation: page measurements, boundary state machines and
//! the controller that turns crossings into tweens.

pub mod boundary;
pub mod controller;

use std::collections::HashMap;

pub use boundary::{Boundary, Crossing, TriggerStart};
pub use controller::{BoundarySpec, ScrollTriggerController};

pub type SectionId = &'static str;

pub const TITLE: SectionId = "title";
pub const ABOUT_ME: SectionId = "about-me";
pub const PROJECTS: SectionId = "projects";
pub const CONTACT_ME: SectionId = "contact-me";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    /// Offset of the section's top from the top of the page.
    pub top: f32,
    pub height: f32,
}

/// What the page looked like this frame, in logical pixels.
#[derive(Debug, Clone, Default)]
pub struct PageMetrics {
    pub scroll_y: f32,
    pub viewport_height: f32,
    pub sections: HashMap<SectionId, SectionBounds>,
}

impl PageMetrics {
    pub fn section(&self, id: SectionId) -> Option<SectionBounds> {
        self.sections.get(id).copied()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Four 800 px sections in an 800 px viewport, 40 px apart, starting at 32.
    pub(crate) fn metrics_at(scroll_y: f32) -> PageMetrics {
        let sections = [TITLE, ABOUT_ME, PROJECTS, CONTACT_ME]
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                (
                    id,
                    SectionBounds {
                        top: 32.0 + i as f32 * 840.0,
                        height: 800.0,
                    },
                )
            })
            .collect();

        PageMetrics {
            scroll_y,
            viewport_height: 800.0,
            sections,
        }
    }

    #[test]
    fn fixture_layout() {
        let metrics = metrics_at(0.0);
        assert_eq!(metrics.section(ABOUT_ME).unwrap().top, 872.0);
        assert_eq!(metrics.section(PROJECTS).unwrap().top, 1712.0);
        assert!(metrics.section("missing").is_none());
    }
}
