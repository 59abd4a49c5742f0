use imgui::{FontConfig, FontId, FontSource};

pub type Color = [f32; 4];

pub const INDIGO_400: Color = rgb(0x818cf8);
pub const GRAY_300: Color = rgb(0xd1d5db);
pub const GRAY_400: Color = rgb(0x9ca3af);
pub const GRAY_800: Color = rgb(0x1f2937);
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Font sizes in pixels, named after the text roles that use them.
pub struct PageFonts {
    pub small: FontId,
    pub body: FontId,
    pub lead: FontId,
    pub card_title: FontId,
    pub heading: FontId,
    pub title: FontId,
}

impl PageFonts {
    /// Adds every page font to the atlas. Must run before the renderer
    /// uploads the font texture.
    pub fn load(context: &mut imgui::Context) -> Self {
        let mut add = |size_pixels: f32| {
            context.fonts().add_font(&[FontSource::DefaultFontData {
                config: Some(FontConfig {
                    oversample_h: 1,
                    pixel_snap_h: true,
                    size_pixels,
                    ..Default::default()
                }),
            }])
        };

        // The first font added becomes imgui's default.
        Self {
            body: add(16.0),
            small: add(14.0),
            lead: add(18.0),
            card_title: add(24.0),
            heading: add(36.0),
            title: add(48.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_unpack() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(GRAY_800[0], 0x1f as f32 / 255.0);
        assert_eq!(INDIGO_400[2], 0xf8 as f32 / 255.0);
    }
}
