use kurbo::Shape;

use crate::{
    core::{Affine, Point, Rect, Rgba8},
    error::{GridwallError, GridwallResult},
    render::{FrameRGBA, Surface},
};

/// CPU rasterizing [`Surface`] backed by `vello_cpu`.
///
/// Dimensions are capped at `u16` by the underlying render context; walls are
/// viewport-sized so this never binds in practice.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    // Cumulative transform stack; last entry is the active transform.
    transforms: Vec<Affine>,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> GridwallResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| GridwallError::render(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| GridwallError::render(format!("surface height {height} exceeds u16")))?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            transforms: vec![Affine::IDENTITY],
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Rasterize everything drawn since the last [`Surface::clear`] and read
    /// the pixels back. The context keeps its geometry; callers normally clear
    /// at the start of the next frame anyway.
    pub fn take_frame(&mut self) -> GridwallResult<FrameRGBA> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn current(&self) -> Affine {
        *self.transforms.last().unwrap_or(&Affine::IDENTITY)
    }

    fn sync_transform(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.current()));
    }

    fn set_color(&mut self, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    fn fill_kurbo_path(&mut self, elements: impl Iterator<Item = kurbo::PathEl>) {
        let path = path_to_cpu(elements);
        self.ctx.fill_path(&path);
    }
}

impl Surface for CpuSurface {
    fn clear(&mut self, color: Rgba8) {
        // A clear starts a fresh frame: drop prior geometry and scopes.
        self.ctx.reset();
        self.transforms.clear();
        self.transforms.push(Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_color(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn fill_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.sync_transform();
        self.set_color(color);
        if radius > 0.0 {
            let rounded = kurbo::RoundedRect::from_rect(rect, radius);
            self.fill_kurbo_path(rounded.path_elements(0.1));
        } else {
            self.ctx
                .fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.sync_transform();
        self.set_color(color);
        let circle = kurbo::Circle::new(center, radius);
        self.fill_kurbo_path(circle.path_elements(0.1));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        let delta = to - from;
        let len = delta.hypot();
        if len == 0.0 || width <= 0.0 {
            return;
        }
        // Square-capped stroke as a filled quad around the segment.
        let n = kurbo::Vec2::new(-delta.y / len, delta.x / len) * (width / 2.0);
        let mut path = kurbo::BezPath::new();
        path.move_to(from + n);
        path.line_to(to + n);
        path.line_to(to - n);
        path.line_to(from - n);
        path.close_path();

        self.sync_transform();
        self.set_color(color);
        self.fill_kurbo_path(path.elements().iter().copied());
    }

    fn push_transform(&mut self, local: Affine) {
        let composed = self.current() * local;
        self.transforms.push(composed);
        self.sync_transform();
    }

    fn pop_transform(&mut self) {
        if self.transforms.len() > 1 {
            self.transforms.pop();
        }
        self.sync_transform();
    }

    fn push_opacity(&mut self, alpha: f64) {
        self.ctx.push_opacity_layer(alpha.clamp(0.0, 1.0) as f32);
    }

    fn pop_opacity(&mut self) {
        self.ctx.pop_layer();
    }
}

// The crate's kurbo and vello_cpu's bundled kurbo are separate versions, so
// geometry crosses the boundary element by element.
fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn path_to_cpu(elements: impl Iterator<Item = kurbo::PathEl>) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in elements {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_dimensions() {
        assert!(CpuSurface::new(1 << 20, 100).is_err());
        assert!(CpuSurface::new(100, 1 << 20).is_err());
    }

    #[test]
    fn frame_buffer_has_expected_size() {
        let mut surface = CpuSurface::new(16, 8).unwrap();
        surface.clear(Rgba8::rgb(0, 0, 0));
        let frame = surface.take_frame().unwrap();
        assert_eq!(frame.width, 16);
        assert_eq!(frame.height, 8);
        assert_eq!(frame.data.len(), 16 * 8 * 4);
    }

    #[test]
    fn clear_fills_with_opaque_color() {
        let mut surface = CpuSurface::new(4, 4).unwrap();
        surface.clear(Rgba8::rgb(255, 0, 0));
        let frame = surface.take_frame().unwrap();
        assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));
        assert!(frame.data.chunks_exact(4).any(|px| px[0] > 0));
    }

    #[test]
    fn unbalanced_pop_transform_is_ignored() {
        let mut surface = CpuSurface::new(4, 4).unwrap();
        surface.pop_transform();
        assert_eq!(surface.current(), Affine::IDENTITY);
    }
}
