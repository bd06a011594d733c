use crate::core::Rgba8;

/// Read-only color set shared by every tile.
///
/// Swatches are only ever addressed through
/// [`NoiseSource::stable_index`](crate::noise::NoiseSource::stable_index), so a
/// module instance's fixed colors can be re-derived from its seed at any time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Stable-indexed swatches for module fixed colors.
    pub swatches: Vec<Rgba8>,
    /// Background for tiles whose spatial noise sample marks them light.
    pub bg_light: Rgba8,
    /// Background for every other tile, and the base surface clear color.
    pub bg_dark: Rgba8,
    /// Plate drawn behind the dot grid on dark tiles.
    pub plate: Rgba8,
    /// The dot grid's accent dot color.
    pub accent: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            swatches: vec![
                Rgba8::rgb(0xff, 0x3e, 0xa5), // pink
                Rgba8::rgb(0x00, 0xd1, 0xff), // cyan
                Rgba8::rgb(0x00, 0xd3, 0x6f), // green
                Rgba8::rgb(0xff, 0xa5, 0x00), // orange
                Rgba8::rgb(0xff, 0xd8, 0x3e), // yellow
                Rgba8::rgb(0xff, 0xff, 0xff), // white
            ],
            bg_light: Rgba8::rgb(0xf5, 0xf5, 0xf5),
            bg_dark: Rgba8::rgb(0x00, 0x00, 0x00),
            plate: Rgba8::rgb(0xf1, 0xf1, 0xf1),
            accent: Rgba8::rgb(0xff, 0x3e, 0xa5),
        }
    }
}
