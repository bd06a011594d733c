use crate::{
    core::{Point, Rect, Rgba8, remap},
    noise::NoiseSource,
    palette::Palette,
    render::Surface,
};
use kurbo::Size;

// Salts separate the independent stable choices derived from one instance seed.
const PLUS_COLOR_SALT: f64 = 11.0;
const STRIPE_COLOR_SALT: f64 = 23.0;
const CHECKER_COLOR_SALT: f64 = 37.0;
const BLOCK_COLOR_SALT: f64 = 51.0;
const DISC_OUTER_SALT: f64 = 71.0;
const DISC_INNER_SALT: f64 = 83.0;
const STRIPE_ORIENT_OFFSET: f64 = 3.0;

/// The closed registry of pattern kinds. No runtime extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    DotGrid,
    Plus,
    Stripes,
    CheckerLines,
    SolidBlock,
    Disc,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 6] = [
        ModuleKind::DotGrid,
        ModuleKind::Plus,
        ModuleKind::Stripes,
        ModuleKind::CheckerLines,
        ModuleKind::SolidBlock,
        ModuleKind::Disc,
    ];
}

/// Parameters sampled exactly once, at instance creation.
///
/// Nothing here may ever be resampled during the instance's lifetime; this is
/// what keeps a tile's look steady between crossfades.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleParams {
    DotGrid {
        /// Plate behind the dots; present only on dark tiles.
        plate: Option<Rgba8>,
        dot: Rgba8,
    },
    Plus {
        stroke: Rgba8,
    },
    Stripes {
        color: Rgba8,
        horizontal: bool,
    },
    CheckerLines {
        stroke: Rgba8,
    },
    SolidBlock {
        fill: Rgba8,
    },
    Disc {
        outer: Rgba8,
        inner: Rgba8,
    },
}

/// One concrete realization of a pattern kind.
///
/// Renders in a local frame centered on its tile: the origin is the tile
/// center and `size` is the cell edge. Only the geometric parameters listed
/// per kind vary with `t`, each driven by the continuous noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleInstance {
    seed: f64,
    params: ModuleParams,
}

impl ModuleInstance {
    /// Derive an instance of `kind` from `seed`. Pure: identical inputs yield
    /// identical fixed parameters.
    pub fn create(
        kind: ModuleKind,
        seed: f64,
        noise: &dyn NoiseSource,
        palette: &Palette,
        is_light: bool,
    ) -> Self {
        let params = match kind {
            ModuleKind::DotGrid => ModuleParams::DotGrid {
                plate: (!is_light).then_some(palette.plate),
                dot: palette.accent,
            },
            ModuleKind::Plus => ModuleParams::Plus {
                stroke: stable_color(noise, palette, seed, PLUS_COLOR_SALT),
            },
            ModuleKind::Stripes => ModuleParams::Stripes {
                color: stable_color(noise, palette, seed, STRIPE_COLOR_SALT),
                horizontal: noise.sample1(seed + STRIPE_ORIENT_OFFSET) < 0.5,
            },
            ModuleKind::CheckerLines => ModuleParams::CheckerLines {
                stroke: stable_color(noise, palette, seed, CHECKER_COLOR_SALT),
            },
            ModuleKind::SolidBlock => ModuleParams::SolidBlock {
                fill: stable_color(noise, palette, seed, BLOCK_COLOR_SALT),
            },
            ModuleKind::Disc => ModuleParams::Disc {
                outer: stable_color(noise, palette, seed, DISC_OUTER_SALT),
                inner: stable_color(noise, palette, seed, DISC_INNER_SALT),
            },
        };
        Self { seed, params }
    }

    pub fn kind(&self) -> ModuleKind {
        match self.params {
            ModuleParams::DotGrid { .. } => ModuleKind::DotGrid,
            ModuleParams::Plus { .. } => ModuleKind::Plus,
            ModuleParams::Stripes { .. } => ModuleKind::Stripes,
            ModuleParams::CheckerLines { .. } => ModuleKind::CheckerLines,
            ModuleParams::SolidBlock { .. } => ModuleKind::SolidBlock,
            ModuleParams::Disc { .. } => ModuleKind::Disc,
        }
    }

    pub fn params(&self) -> &ModuleParams {
        &self.params
    }

    pub fn render(&self, surface: &mut dyn Surface, noise: &dyn NoiseSource, size: f64, t: f64) {
        match &self.params {
            ModuleParams::DotGrid { plate, dot } => {
                let cols = dot_columns(noise.sample2(self.seed, t * 0.3));
                let step = size / cols as f64;
                let radius = step * 0.42;
                if let Some(plate) = plate {
                    surface.fill_rect(
                        Rect::from_center_size(Point::ORIGIN, Size::new(size * 0.98, size * 0.98)),
                        6.0,
                        *plate,
                    );
                }
                let half = size / 2.0;
                for row in 0..cols {
                    for col in 0..cols {
                        let x = -half + step * (col as f64 + 0.5);
                        let y = -half + step * (row as f64 + 0.5);
                        surface.fill_circle(Point::new(x, y), radius, *dot);
                    }
                }
            }
            ModuleParams::Plus { stroke } => {
                let thick = remap(
                    noise.sample2(self.seed + 1.0, t * 0.25),
                    size * 0.12,
                    size * 0.32,
                );
                surface.fill_rect(
                    Rect::from_center_size(Point::ORIGIN, Size::new(size * 0.84, thick)),
                    5.0,
                    *stroke,
                );
                surface.fill_rect(
                    Rect::from_center_size(Point::ORIGIN, Size::new(thick, size * 0.84)),
                    5.0,
                    *stroke,
                );
            }
            ModuleParams::Stripes { color, horizontal } => {
                let bands = band_count(noise.sample2(self.seed + 2.0, t * 0.15));
                let band = size / (bands as f64 * 2.0);
                for i in 0..bands {
                    let offset = -size / 2.0 + i as f64 * 2.0 * band + band / 2.0;
                    let (center, extent) = if *horizontal {
                        (Point::new(0.0, offset), Size::new(size * 0.98, band))
                    } else {
                        (Point::new(offset, 0.0), Size::new(band, size * 0.98))
                    };
                    surface.fill_rect(Rect::from_center_size(center, extent), 0.0, *color);
                }
            }
            ModuleParams::CheckerLines { stroke } => {
                let lines = line_count(noise.sample2(self.seed + 4.0, t * 0.2));
                let step = size / lines as f64;
                let weight = (size * 0.06).max(2.0);
                let half = size / 2.0;
                for i in 0..=lines {
                    let offset = -half + i as f64 * step;
                    surface.stroke_line(
                        Point::new(offset, -half),
                        Point::new(offset, half),
                        weight,
                        *stroke,
                    );
                    surface.stroke_line(
                        Point::new(-half, offset),
                        Point::new(half, offset),
                        weight,
                        *stroke,
                    );
                }
            }
            ModuleParams::SolidBlock { fill } => {
                let width = remap(
                    noise.sample2(self.seed + 5.0, t * 0.18),
                    size * 0.45,
                    size * 0.95,
                );
                let x = remap(
                    noise.sample2(self.seed + 6.0, t * 0.1),
                    -size * 0.2,
                    size * 0.2,
                );
                surface.fill_rect(
                    Rect::from_center_size(Point::new(x, 0.0), Size::new(width, size * 0.98)),
                    6.0,
                    *fill,
                );
            }
            ModuleParams::Disc { outer, inner } => {
                surface.fill_circle(Point::ORIGIN, size * 0.47, *outer);
                surface.fill_circle(Point::ORIGIN, size * 0.26, *inner);
            }
        }
    }
}

fn stable_color(noise: &dyn NoiseSource, palette: &Palette, seed: f64, salt: f64) -> Rgba8 {
    debug_assert!(!palette.swatches.is_empty());
    palette.swatches[noise.stable_index(seed, salt, palette.swatches.len())]
}

fn dot_columns(v: f64) -> usize {
    remap(v, 3.0, 6.0).floor() as usize
}

fn band_count(v: f64) -> usize {
    remap(v, 3.0, 9.0).floor() as usize
}

fn line_count(v: f64) -> usize {
    remap(v, 3.0, 6.0).floor() as usize
}
