//! Gridwall renders an animated wall of grid tiles.
//!
//! Every tile cycles through a closed set of procedural pattern modules,
//! crossfading between them instead of hard-cutting. A module's look (colors,
//! orientation) is fixed the moment it is created; only its geometry breathes
//! over time, driven by a continuous noise field — so the wall moves without
//! ever flickering.
//!
//! The core is a deterministic function of state and time:
//!
//! - Build a [`GridState`] for a viewport
//! - Call [`GridState::render_frame`] once per tick with the elapsed time
//! - Draw calls land on a [`Surface`] — `vello_cpu` raster via [`CpuSurface`],
//!   or a [`RecordingSurface`] for inspection and tests
#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod ease;
pub mod error;
pub mod grid;
pub mod module;
pub mod noise;
pub mod palette;
pub mod render;
pub mod render_cpu;
pub mod tile;

pub use crate::config::GridConfig;
pub use crate::core::{FrameIndex, Rgba8, Viewport, remap};
pub use crate::ease::Ease;
pub use crate::error::{GridwallError, GridwallResult};
pub use crate::grid::{Command, GridState, HostRequest};
pub use crate::module::{ModuleInstance, ModuleKind, ModuleParams};
pub use crate::noise::{NoiseSource, PerlinField};
pub use crate::palette::Palette;
pub use crate::render::{DrawCmd, FrameRGBA, RecordingSurface, Surface};
pub use crate::render_cpu::CpuSurface;
pub use crate::tile::{Phase, Tile};
