use std::f64::consts::PI;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::{
    config::GridConfig,
    core::{Affine, FrameIndex, Rect, remap},
    module::{ModuleInstance, ModuleKind},
    noise::NoiseSource,
    palette::Palette,
    render::Surface,
};

/// Salt mixed into the seed of a freshly chosen `next` instance so repeated
/// switches on one tile never reuse an earlier instance seed.
const NEXT_SEED_SALT: f64 = 123.0;
/// Time rate of the gentle per-tile rotation.
const ROTATION_RATE: f64 = 0.12;
/// Tile seeds are drawn uniformly from `[0, MAX_SEED)`.
const MAX_SEED: f64 = 10_000.0;

/// Crossfade lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Showing `current` unchanged.
    Hold,
    /// Blending from `current` toward `next`.
    Fade,
}

/// One grid cell and its animation state machine.
///
/// The tile seed is drawn once at creation and anchors every deterministic
/// derivation afterwards: the rotation wobble, and the seeds of replacement
/// module instances.
#[derive(Clone, Debug)]
pub struct Tile {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) size: f64,
    pub(crate) is_light: bool,
    pub(crate) seed: f64,
    pub(crate) phase: Phase,
    pub(crate) phase_start: i64,
    pub(crate) hold_jitter: i64,
    pub(crate) current: ModuleInstance,
    pub(crate) next: Option<ModuleInstance>,
}

impl Tile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        x: f64,
        y: f64,
        size: f64,
        is_light: bool,
        now: FrameIndex,
        cfg: &GridConfig,
        rng: &mut Pcg32,
        noise: &dyn NoiseSource,
        palette: &Palette,
    ) -> Self {
        let seed = rng.random_range(0.0..MAX_SEED);
        let current = random_instance(seed, rng, noise, palette, is_light);
        // Start each hold at a future tick so tiles never switch in lockstep.
        let phase_start = now.as_i64() + rng.random_range(0..cfg.hold_frames) as i64;
        Self {
            x,
            y,
            size,
            is_light,
            seed,
            phase: Phase::Hold,
            phase_start,
            hold_jitter: sample_jitter(rng, cfg.switch_jitter),
            current,
            next: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_light(&self) -> bool {
        self.is_light
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn current(&self) -> &ModuleInstance {
        &self.current
    }

    pub fn next(&self) -> Option<&ModuleInstance> {
        self.next.as_ref()
    }

    /// Run the phase transition check. Fires at most one transition per call.
    pub(crate) fn advance(
        &mut self,
        now: FrameIndex,
        cfg: &GridConfig,
        rng: &mut Pcg32,
        noise: &dyn NoiseSource,
        palette: &Palette,
    ) {
        let elapsed = now.as_i64() - self.phase_start;
        match self.phase {
            Phase::Hold => {
                if elapsed > cfg.hold_frames as i64 + self.hold_jitter {
                    self.phase = Phase::Fade;
                    self.phase_start = now.as_i64();
                    // Seed the replacement from (tile seed, now, salt): random
                    // across tiles, collision-free across this tile's history.
                    let seed = self.seed + now.0 as f64 + NEXT_SEED_SALT;
                    self.next = Some(random_instance(seed, rng, noise, palette, self.is_light));
                }
            }
            Phase::Fade => {
                // The fade ends exactly when its weight reaches 1.
                if elapsed >= cfg.fade_frames as i64 {
                    self.phase = Phase::Hold;
                    self.phase_start = now.as_i64();
                    self.hold_jitter = sample_jitter(rng, cfg.switch_jitter);
                    if let Some(next) = self.next.take() {
                        self.current = next;
                    }
                }
            }
        }
    }

    /// Blend weight toward `next`: 0 during Hold, eased `elapsed / fade` during Fade.
    pub(crate) fn fade_weight(&self, now: FrameIndex, cfg: &GridConfig) -> f64 {
        match self.phase {
            Phase::Hold => 0.0,
            Phase::Fade => {
                let k = (now.as_i64() - self.phase_start) as f64 / cfg.fade_frames as f64;
                cfg.fade_ease.apply(k.clamp(0.0, 1.0))
            }
        }
    }

    pub(crate) fn draw(
        &self,
        surface: &mut dyn Surface,
        noise: &dyn NoiseSource,
        now: FrameIndex,
        t: f64,
        cfg: &GridConfig,
        palette: &Palette,
    ) {
        let bg = if self.is_light {
            palette.bg_light
        } else {
            palette.bg_dark
        };
        // One extra pixel of background hides seams between neighbors.
        surface.fill_rect(
            Rect::new(self.x, self.y, self.x + self.size + 1.0, self.y + self.size + 1.0),
            0.0,
            bg,
        );

        let rotation = remap(
            noise.sample2(self.seed, t * ROTATION_RATE),
            -PI / 8.0,
            PI / 8.0,
        );
        let center = (self.x + self.size / 2.0, self.y + self.size / 2.0);
        surface.push_transform(Affine::translate(center) * Affine::rotate(rotation));

        let k = self.fade_weight(now, cfg);
        surface.push_opacity(1.0 - k);
        self.current.render(surface, noise, self.size, t);
        surface.pop_opacity();

        if k > 0.0
            && let Some(next) = &self.next
        {
            surface.push_opacity(k);
            next.render(surface, noise, self.size, t);
            surface.pop_opacity();
        }

        surface.pop_transform();
    }
}

fn random_instance(
    seed: f64,
    rng: &mut Pcg32,
    noise: &dyn NoiseSource,
    palette: &Palette,
    is_light: bool,
) -> ModuleInstance {
    let kind = ModuleKind::ALL[rng.random_range(0..ModuleKind::ALL.len())];
    ModuleInstance::create(kind, seed, noise, palette, is_light)
}

fn sample_jitter(rng: &mut Pcg32, bound: u64) -> i64 {
    let bound = bound as i64;
    rng.random_range(-bound..=bound)
}
