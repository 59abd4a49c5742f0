//! The scrolling page drawn over the 3D backdrop.
//!
//! Each section is laid out first (text measured, wrapped and placed
//! relative to the section top), then drawn into one transparent,
//! full-viewport imgui window. The offsets computed during layout are what
//! the scroll triggers see through [`PageMetrics`].

pub mod content;
pub mod layout;
pub mod theme;

use glam::Vec2;
use imgui::{Condition, FontId, StyleVar, Ui, WindowFlags};

use crate::scroll::{PageMetrics, SectionBounds, SectionId, ABOUT_ME, CONTACT_ME, PROJECTS, TITLE};

use self::layout::*;
use self::theme::{Color, PageFonts, GRAY_300, GRAY_400, GRAY_800, INDIGO_400, WHITE};

#[derive(Clone, Copy)]
struct TextStyle {
    font: FontId,
    color: Color,
    /// Line advance as a multiple of the font height.
    line_height: f32,
}

struct Line {
    style: TextStyle,
    text: String,
    position: [f32; 2],
    bounce: bool,
}

/// A positioned section, relative to its own top-left corner.
#[derive(Default)]
struct SectionLayout {
    cards: Vec<[f32; 4]>,
    lines: Vec<Line>,
    height: f32,
}

struct LayoutBuilder<'ui> {
    ui: &'ui Ui,
    y: f32,
    section: SectionLayout,
}

impl<'ui> LayoutBuilder<'ui> {
    fn new(ui: &'ui Ui) -> Self {
        Self {
            ui,
            y: 0.0,
            section: SectionLayout::default(),
        }
    }

    fn measure(&self, font: FontId, text: &str) -> [f32; 2] {
        let _font = self.ui.push_font(font);
        self.ui.calc_text_size(text)
    }

    fn space(&mut self, height: f32) {
        self.y += height;
    }

    /// Wraps `text` to the container and centres every line in it.
    fn paragraph(&mut self, style: TextStyle, text: &str, left: f32, width: f32) {
        let lines = wrap_words(text, width, |line| self.measure(style.font, line)[0]);
        for line in lines {
            self.centered_segments(&[(style, &line)], left, width);
        }
    }

    /// One line made of differently styled runs, centred as a whole.
    fn centered_segments(&mut self, segments: &[(TextStyle, &str)], left: f32, width: f32) {
        let sizes: Vec<[f32; 2]> = segments
            .iter()
            .map(|(style, text)| self.measure(style.font, text))
            .collect();
        let total_width: f32 = sizes.iter().map(|size| size[0]).sum();
        let advance = segments
            .iter()
            .zip(&sizes)
            .map(|((style, _), size)| size[1] * style.line_height)
            .fold(0.0, f32::max);

        let mut x = left + centered_x(width, total_width);
        for ((style, text), size) in segments.iter().zip(&sizes) {
            self.section.lines.push(Line {
                style: *style,
                text: text.to_string(),
                position: [x, self.y],
                bounce: false,
            });
            x += size[0];
        }

        self.y += advance;
    }

    fn finish(mut self) -> SectionLayout {
        self.section.height = self.y;
        self.section
    }
}

pub struct Page {
    fonts: PageFonts,
}

impl Page {
    pub fn new(fonts: PageFonts) -> Self {
        Self { fonts }
    }

    fn style(&self, font: FontId, color: Color, line_height: f32) -> TextStyle {
        TextStyle {
            font,
            color,
            line_height,
        }
    }

    fn layout_title(&self, ui: &Ui, width: f32) -> SectionLayout {
        let mut builder = LayoutBuilder::new(ui);

        builder.centered_segments(
            &[(self.style(self.fonts.title, INDIGO_400, 1.0), content::NAME)],
            0.0,
            width,
        );
        builder.space(16.0);
        builder.centered_segments(
            &[(self.style(self.fonts.lead, GRAY_300, 1.5), content::TAGLINE)],
            0.0,
            width,
        );
        builder.space(16.0);
        builder.centered_segments(
            &[(self.style(self.fonts.lead, GRAY_400, 1.5), content::SCROLL_HINT)],
            0.0,
            width,
        );
        if let Some(hint) = builder.section.lines.last_mut() {
            hint.bounce = true;
        }

        builder.finish()
    }

    fn layout_about(&self, ui: &Ui, width: f32) -> SectionLayout {
        let mut builder = LayoutBuilder::new(ui);
        let heading = self.style(self.fonts.heading, INDIGO_400, 1.1);
        let body = self.style(self.fonts.lead, GRAY_300, 1.55);

        builder.centered_segments(&[(heading, content::ABOUT_HEADING)], 0.0, width);
        builder.space(32.0);

        let text_width = block_width(width, TEXT_MAX_WIDTH);
        let left = centered_x(width, text_width);
        for (i, paragraph) in content::ABOUT_PARAGRAPHS.iter().enumerate() {
            if i > 0 {
                builder.space(16.0);
            }
            builder.paragraph(body, paragraph, left, text_width);
        }

        builder.finish()
    }

    fn layout_projects(&self, ui: &Ui, width: f32) -> SectionLayout {
        let mut builder = LayoutBuilder::new(ui);
        let heading = self.style(self.fonts.heading, INDIGO_400, 1.1);
        let title = self.style(self.fonts.card_title, WHITE, 1.33);
        let description = self.style(self.fonts.body, GRAY_300, 1.5);
        let highlights = self.style(self.fonts.small, GRAY_400, 1.43);

        builder.centered_segments(&[(heading, content::PROJECTS_HEADING)], 0.0, width);
        builder.space(32.0);

        let grid_width = block_width(width, GRID_MAX_WIDTH);
        let grid_left = centered_x(width, grid_width);
        let columns = grid_columns(width);
        let card_width = card_width(grid_width, columns);
        let inner_width = (card_width - 2.0 * CARD_PADDING).max(0.0);

        for (row_index, row) in content::PROJECTS.chunks(columns).enumerate() {
            if row_index > 0 {
                builder.space(GRID_GAP);
            }

            let row_top = builder.y;
            let mut row_bottom = row_top;
            let mut row_cards = Vec::with_capacity(row.len());

            for (column, project) in row.iter().enumerate() {
                let card_left = grid_left + column as f32 * (card_width + GRID_GAP);
                let inner_left = card_left + CARD_PADDING;

                builder.y = row_top + CARD_PADDING;
                builder.paragraph(title, project.title, inner_left, inner_width);
                builder.space(8.0);
                builder.paragraph(description, project.description, inner_left, inner_width);
                builder.space(8.0);
                builder.paragraph(highlights, project.highlights, inner_left, inner_width);

                row_bottom = row_bottom.max(builder.y + CARD_PADDING);
                row_cards.push(card_left);
            }

            // Cards in a row stretch to the tallest one.
            for card_left in row_cards {
                builder
                    .section
                    .cards
                    .push([card_left, row_top, card_left + card_width, row_bottom]);
            }
            builder.y = row_bottom;
        }

        builder.finish()
    }

    fn layout_contact(&self, ui: &Ui, width: f32) -> SectionLayout {
        let mut builder = LayoutBuilder::new(ui);
        let heading = self.style(self.fonts.heading, INDIGO_400, 1.1);
        let body = self.style(self.fonts.lead, GRAY_300, 1.55);
        let link = self.style(self.fonts.lead, INDIGO_400, 1.55);

        builder.space(48.0);
        builder.centered_segments(&[(heading, content::CONTACT_HEADING)], 0.0, width);
        builder.space(32.0);

        let text_width = block_width(width, f32::MAX);
        let left = centered_x(width, text_width);
        builder.paragraph(body, content::CONTACT_INVITATION, left, text_width);
        builder.space(16.0);

        for line in &content::CONTACT_LINES {
            builder.centered_segments(&[(body, line.label), (link, line.value)], 0.0, width);
        }
        builder.space(48.0);

        builder.finish()
    }

    fn draw_section(&self, ui: &Ui, section: &SectionLayout, top: f32, time: f32) {
        let origin = ui.window_pos();
        let scroll_y = ui.scroll_y();

        {
            let draw_list = ui.get_window_draw_list();
            for card in &section.cards {
                let to_screen = |x: f32, y: f32| [origin[0] + x, origin[1] + top + y - scroll_y];
                draw_list
                    .add_rect(to_screen(card[0], card[1]), to_screen(card[2], card[3]), GRAY_800)
                    .filled(true)
                    .rounding(CARD_ROUNDING)
                    .build();
            }
        }

        for line in &section.lines {
            let bounce = if line.bounce { bounce_offset(time) } else { 0.0 };
            ui.set_cursor_pos([line.position[0], top + line.position[1] + bounce]);

            let _font = ui.push_font(line.style.font);
            ui.text_colored(line.style.color, &line.text);
        }
    }

    /// Draws the page and reports where everything ended up this frame.
    pub fn draw(&self, ui: &Ui, time: f32) -> PageMetrics {
        let [viewport_width, viewport_height] = ui.io().display_size;
        let mut metrics = PageMetrics {
            viewport_height,
            ..Default::default()
        };

        let _padding = ui.push_style_var(StyleVar::WindowPadding([0.0, 0.0]));
        let _border = ui.push_style_var(StyleVar::WindowBorderSize(0.0));

        ui.window("Portfolio")
            .position([0.0, 0.0], Condition::Always)
            .size([viewport_width, viewport_height], Condition::Always)
            .flags(
                WindowFlags::NO_TITLE_BAR
                    | WindowFlags::NO_RESIZE
                    | WindowFlags::NO_COLLAPSE
                    | WindowFlags::NO_MOVE
                    | WindowFlags::NO_BACKGROUND
                    | WindowFlags::NO_SAVED_SETTINGS
                    | WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS
                    | WindowFlags::ALWAYS_VERTICAL_SCROLLBAR,
            )
            .build(|| {
                metrics.scroll_y = ui.scroll_y();
                let width = ui.content_region_avail()[0];

                let sections: [(SectionId, SectionLayout, bool); 4] = [
                    (TITLE, self.layout_title(ui, width), false),
                    (ABOUT_ME, self.layout_about(ui, width), true),
                    (PROJECTS, self.layout_projects(ui, width), true),
                    (CONTACT_ME, self.layout_contact(ui, width), true),
                ];

                let mut top = TOP_MARGIN;
                for (id, section, vertically_centered) in &sections {
                    let padding = if *vertically_centered {
                        centered_padding(viewport_height, section.height)
                    } else {
                        0.0
                    };
                    self.draw_section(ui, section, top + padding, time);

                    let height = section.height.max(viewport_height);
                    metrics.sections.insert(*id, SectionBounds { top, height });
                    top += height + SECTION_GAP;
                }

                // Extends the scrollable region to the end of the last section.
                ui.set_cursor_pos([0.0, top - SECTION_GAP]);
                ui.dummy([1.0, 1.0]);
            });

        metrics
    }

    /// Draws the loading indicator behind the page, centred on `position`
    /// (window coordinates).
    pub fn draw_loading_indicator(&self, ui: &Ui, position: Vec2) {
        let _font = ui.push_font(self.fonts.lead);
        let size = ui.calc_text_size(content::LOADING);
        ui.get_background_draw_list().add_text(
            [position.x - size[0] * 0.5, position.y - size[1] * 0.5],
            WHITE,
            content::LOADING,
        );
    }
}
