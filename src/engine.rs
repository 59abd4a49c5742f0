use glam::Vec2;

use crate::{page::Page, portfolio::Portfolio};

/// Frames longer than this are treated as [`LAG_STEP`], so a stall does not
/// make running tweens jump.
const LAG_THRESHOLD: f32 = 0.5;
const LAG_STEP: f32 = 1.0 / 30.0;

pub fn smooth_lag(dt: f32) -> f32 {
    if dt > LAG_THRESHOLD {
        LAG_STEP
    } else {
        dt.max(0.0)
    }
}

/// Runs one frame of page layout and scene simulation.
pub fn update(state: &mut Portfolio, page: &Page, ui: &imgui::Ui, dt: f32) {
    let metrics = page.draw(ui, state.elapsed());
    state.update(&metrics, smooth_lag(dt));

    if !state.host.placeholder_visible() {
        return;
    }

    let display_size = Vec2::from(ui.io().display_size);
    if let Some(position) = state
        .host
        .placeholder_anchor()
        .and_then(|anchor| state.host.camera.project_to_screen(anchor, display_size))
    {
        page.draw_loading_indicator(ui, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        assert_eq!(smooth_lag(1.0 / 60.0), 1.0 / 60.0);
        assert_eq!(smooth_lag(3.0), LAG_STEP);
        assert_eq!(smooth_lag(-1.0), 0.0);
    }
}
