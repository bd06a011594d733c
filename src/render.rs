use crate::core::{Affine, Point, Rect, Rgba8};

/// Drawing-primitive boundary between the grid core and the host raster.
///
/// The core only decides *what* to draw — rectangles, circles, lines, under a
/// scoped transform and opacity stack. How those rasterize is the surface's
/// business. Push/pop pairs must balance within a frame; the grid's render
/// pass guarantees this for its own scopes.
pub trait Surface {
    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Rgba8);

    /// Fill an axis-aligned rectangle, optionally with rounded corners.
    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Rgba8);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    /// Stroke a line segment with square caps.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8);

    /// Compose `local` onto the current transform until the matching pop.
    fn push_transform(&mut self, local: Affine);

    fn pop_transform(&mut self);

    /// Multiply subsequent draws by `alpha` until the matching pop.
    fn push_opacity(&mut self, alpha: f64);

    fn pop_opacity(&mut self);
}

/// A rendered frame as RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

/// One recorded drawing call.
///
/// The serialized stream doubles as a determinism fingerprint: two walls with
/// the same seed must record byte-identical streams.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawCmd {
    Clear {
        color: Rgba8,
    },
    FillRect {
        rect: Rect,
        radius: f64,
        color: Rgba8,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
    StrokeLine {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
    },
    PushTransform {
        transform: Affine,
    },
    PopTransform,
    PushOpacity {
        alpha: f64,
    },
    PopOpacity,
}

/// A [`Surface`] that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    cmds: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Drain the recorded commands, leaving the recorder empty for reuse.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.cmds)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Rgba8) {
        self.cmds.push(DrawCmd::Clear { color });
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.cmds.push(DrawCmd::FillRect {
            rect,
            radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.cmds.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        self.cmds.push(DrawCmd::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn push_transform(&mut self, local: Affine) {
        self.cmds.push(DrawCmd::PushTransform { transform: local });
    }

    fn pop_transform(&mut self) {
        self.cmds.push(DrawCmd::PopTransform);
    }

    fn push_opacity(&mut self, alpha: f64) {
        self.cmds.push(DrawCmd::PushOpacity { alpha });
    }

    fn pop_opacity(&mut self) {
        self.cmds.push(DrawCmd::PopOpacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_preserves_call_order() {
        let mut rec = RecordingSurface::new();
        rec.clear(Rgba8::rgb(0, 0, 0));
        rec.push_transform(Affine::translate((10.0, 20.0)));
        rec.fill_circle(Point::new(0.0, 0.0), 5.0, Rgba8::rgb(255, 0, 0));
        rec.pop_transform();

        let cmds = rec.take();
        assert_eq!(cmds.len(), 4);
        assert!(matches!(cmds[0], DrawCmd::Clear { .. }));
        assert!(matches!(cmds[3], DrawCmd::PopTransform));
        assert!(rec.cmds().is_empty());
    }

    #[test]
    fn draw_cmd_json_roundtrip() {
        let cmd = DrawCmd::FillRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            radius: 2.0,
            color: Rgba8::rgb(1, 2, 3),
        };
        let s = serde_json::to_string(&cmd).unwrap();
        let de: DrawCmd = serde_json::from_str(&s).unwrap();
        assert_eq!(de, cmd);
    }
}
