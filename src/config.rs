use crate::ease::Ease;
use crate::error::{GridwallError, GridwallResult};

/// Tunables for the wall. Defaults match the reference look.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Square cell edge in pixels.
    pub cell_size: f64,
    /// Ticks a tile holds its current module before fading.
    pub hold_frames: u64,
    /// Ticks a crossfade takes.
    pub fade_frames: u64,
    /// Hold duration jitter bound: each hold is lengthened by a uniform value
    /// in `[-switch_jitter, +switch_jitter]` ticks so tiles never sync up.
    pub switch_jitter: u64,
    /// Spatial frequency of the light/dark tile assignment.
    pub spatial_noise_scale: f64,
    /// Noise threshold above which a tile gets the light background.
    pub light_threshold: f64,
    /// Easing applied to the crossfade weight.
    pub fade_ease: Ease,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 204.0,
            hold_frames: 100,
            fade_frames: 50,
            switch_jitter: 10,
            spatial_noise_scale: 0.08,
            light_threshold: 0.6,
            fade_ease: Ease::Linear,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> GridwallResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridwallError::validation("cell_size must be > 0"));
        }
        if self.fade_frames == 0 {
            return Err(GridwallError::validation("fade_frames must be > 0"));
        }
        if self.hold_frames <= self.switch_jitter {
            return Err(GridwallError::validation(
                "hold_frames must exceed switch_jitter or holds could end before they start",
            ));
        }
        if !(0.0..=1.0).contains(&self.light_threshold) {
            return Err(GridwallError::validation(
                "light_threshold must be within [0, 1]",
            ));
        }
        if !self.spatial_noise_scale.is_finite() || self.spatial_noise_scale <= 0.0 {
            return Err(GridwallError::validation(
                "spatial_noise_scale must be > 0",
            ));
        }
        Ok(())
    }
}
