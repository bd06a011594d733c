use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    config::GridConfig,
    core::{FrameIndex, Viewport},
    error::{GridwallError, GridwallResult},
    noise::{NoiseSource, PerlinField},
    palette::Palette,
    render::Surface,
    tile::Tile,
};

/// Host-issued commands, delivered between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Ask the host to persist the current raster. The core does not care
    /// about the format; it only relays the request.
    CaptureFrame,
    /// Rebuild the wall at unchanged dimensions with fresh tile seeds.
    Reinitialize,
}

/// A request the core hands back to the host in response to a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    CaptureFrame,
}

/// The whole wall: owns every tile, the tick clock, and the shared noise
/// field and RNG. All mutation goes through `on_resize` / `reinitialize` /
/// `render_frame` / `on_command`; there is no other way to touch the tiles.
pub struct GridState {
    cfg: GridConfig,
    palette: Palette,
    viewport: Viewport,
    cols: u32,
    rows: u32,
    tiles: Vec<Tile>,
    frame: FrameIndex,
    seed: u64,
    noise: PerlinField,
    rng: Pcg32,
}

impl GridState {
    /// Build a wall for the given viewport. A degenerate viewport (either
    /// dimension ≤ 0) yields a grid with zero tiles, not an error.
    pub fn initialize(
        cfg: GridConfig,
        palette: Palette,
        seed: u64,
        viewport: Viewport,
    ) -> GridwallResult<Self> {
        cfg.validate()?;
        if palette.swatches.is_empty() {
            return Err(GridwallError::validation(
                "palette must have at least one swatch",
            ));
        }

        let mut state = Self {
            cfg,
            palette,
            viewport,
            cols: 0,
            rows: 0,
            tiles: Vec::new(),
            frame: FrameIndex(0),
            seed,
            noise: PerlinField::new(seed as u32),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.rebuild();
        Ok(state)
    }

    /// Adopt new viewport dimensions. The previous tile collection is
    /// discarded wholesale; nothing is diffed or carried over. The next
    /// frame's clear repaints the surface from scratch.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rebuild();
    }

    /// Rebuild at unchanged dimensions: fresh tiles, fresh seeds, tick clock
    /// reset to zero.
    pub fn reinitialize(&mut self) {
        self.frame = FrameIndex(0);
        self.rebuild();
    }

    /// Advance and draw every tile for the current tick, then step the clock.
    ///
    /// `elapsed_secs` drives the continuous parameters (rotation, densities);
    /// the reference host derives it as ticks / 60. One call is one frame:
    /// each tile sees at most one phase transition.
    pub fn render_frame(&mut self, surface: &mut dyn Surface, elapsed_secs: f64) {
        let now = self.frame;
        surface.clear(self.palette.bg_dark);
        for tile in self.tiles.iter_mut() {
            tile.advance(now, &self.cfg, &mut self.rng, &self.noise, &self.palette);
            tile.draw(surface, &self.noise, now, elapsed_secs, &self.cfg, &self.palette);
        }
        self.frame = self.frame.next();
    }

    /// Handle a host command between frames.
    pub fn on_command(&mut self, command: Command) -> Option<HostRequest> {
        match command {
            Command::Reinitialize => {
                self.reinitialize();
                None
            }
            Command::CaptureFrame => Some(HostRequest::CaptureFrame),
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &GridConfig {
        &self.cfg
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn rebuild(&mut self) {
        let cell = self.cfg.cell_size;
        self.cols = grid_extent(self.viewport.width, cell);
        self.rows = grid_extent(self.viewport.height, cell);

        let mut tiles = Vec::with_capacity((self.cols * self.rows) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let scale = self.cfg.spatial_noise_scale;
                let is_light = self
                    .noise
                    .sample2(f64::from(col) * scale, f64::from(row) * scale)
                    > self.cfg.light_threshold;
                tiles.push(Tile::new(
                    f64::from(col) * cell,
                    f64::from(row) * cell,
                    cell,
                    is_light,
                    self.frame,
                    &self.cfg,
                    &mut self.rng,
                    &self.noise,
                    &self.palette,
                ));
            }
        }
        self.tiles = tiles;
        tracing::debug!(cols = self.cols, rows = self.rows, "rebuilt tile grid");
    }
}

/// Cells needed to cover `extent` pixels: `ceil(extent / cell)`, zero for
/// degenerate extents.
fn grid_extent(extent: f64, cell: f64) -> u32 {
    if extent <= 0.0 {
        return 0;
    }
    (extent / cell).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCmd, RecordingSurface};

    fn config(cell: f64) -> GridConfig {
        GridConfig {
            cell_size: cell,
            ..GridConfig::default()
        }
    }

    fn state(cell: f64, w: f64, h: f64) -> GridState {
        GridState::initialize(config(cell), Palette::default(), 1234, Viewport::new(w, h))
            .unwrap()
    }

    #[test]
    fn reference_viewport_yields_five_by_three() {
        let grid = state(200.0, 1000.0, 600.0);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.tiles().len(), 15);
    }

    #[test]
    fn degenerate_viewports_yield_empty_grids() {
        for (w, h) in [(0.0, 600.0), (1000.0, 0.0), (-5.0, 600.0), (0.0, 0.0)] {
            let mut grid = state(200.0, w, h);
            assert!(grid.tiles().is_empty());
            let mut rec = RecordingSurface::new();
            grid.render_frame(&mut rec, 0.0);
            // Still a no-op pass apart from the base clear.
            assert_eq!(rec.cmds().len(), 1);
        }
    }

    #[test]
    fn grid_covers_viewport_after_resize() {
        let mut grid = state(204.0, 1000.0, 600.0);
        for (w, h) in [(1.0, 1.0), (2560.0, 1440.0), (203.0, 205.0)] {
            grid.on_resize(Viewport::new(w, h));
            let cell = grid.config().cell_size;
            assert!(f64::from(grid.cols()) * cell >= w);
            assert!(f64::from(grid.rows()) * cell >= h);
            assert_eq!(grid.tiles().len(), (grid.cols() * grid.rows()) as usize);
        }
    }

    #[test]
    fn tiles_are_laid_out_row_major() {
        let grid = state(100.0, 300.0, 200.0);
        assert_eq!(grid.tiles().len(), 6);
        for (idx, tile) in grid.tiles().iter().enumerate() {
            let col = idx as u32 % grid.cols();
            let row = idx as u32 / grid.cols();
            assert_eq!(tile.x, f64::from(col) * 100.0);
            assert_eq!(tile.y, f64::from(row) * 100.0);
        }
    }

    #[test]
    fn light_assignment_is_stable_across_identical_builds() {
        let a = state(200.0, 1000.0, 600.0);
        let b = state(200.0, 1000.0, 600.0);
        let la: Vec<bool> = a.tiles().iter().map(|t| t.is_light()).collect();
        let lb: Vec<bool> = b.tiles().iter().map(|t| t.is_light()).collect();
        assert_eq!(la, lb);
    }

    #[test]
    fn reinitialize_keeps_dimensions_but_reseeds_tiles() {
        let mut grid = state(200.0, 1000.0, 600.0);
        let mut rec = RecordingSurface::new();
        for f in 0..5 {
            grid.render_frame(&mut rec, f as f64 / 60.0);
        }
        let before: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();

        grid.reinitialize();
        assert_eq!(grid.frame(), FrameIndex(0));
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 3);
        let after: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
        assert_eq!(before.len(), after.len());
        assert_ne!(before, after);
    }

    #[test]
    fn capture_command_relays_without_touching_state() {
        let mut grid = state(200.0, 1000.0, 600.0);
        let seeds: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
        let frame = grid.frame();

        assert_eq!(
            grid.on_command(Command::CaptureFrame),
            Some(HostRequest::CaptureFrame)
        );
        assert_eq!(grid.frame(), frame);
        let same: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
        assert_eq!(seeds, same);
    }

    #[test]
    fn reinitialize_command_rebuilds_in_place() {
        let mut grid = state(200.0, 1000.0, 600.0);
        let seeds: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
        assert_eq!(grid.on_command(Command::Reinitialize), None);
        let fresh: Vec<f64> = grid.tiles().iter().map(|t| t.seed()).collect();
        assert_ne!(seeds, fresh);
        assert_eq!(grid.tiles().len(), seeds.len());
    }

    #[test]
    fn render_frame_clears_first_and_steps_the_clock() {
        let mut grid = state(200.0, 400.0, 400.0);
        let mut rec = RecordingSurface::new();
        grid.render_frame(&mut rec, 0.0);
        assert_eq!(grid.frame(), FrameIndex(1));
        assert!(matches!(rec.cmds()[0], DrawCmd::Clear { .. }));
    }

    #[test]
    fn initialize_rejects_invalid_inputs() {
        let bad_cfg = GridConfig {
            fade_frames: 0,
            ..GridConfig::default()
        };
        assert!(
            GridState::initialize(bad_cfg, Palette::default(), 1, Viewport::new(100.0, 100.0))
                .is_err()
        );

        let empty = Palette {
            swatches: Vec::new(),
            ..Palette::default()
        };
        assert!(
            GridState::initialize(GridConfig::default(), empty, 1, Viewport::new(100.0, 100.0))
                .is_err()
        );
    }
}
