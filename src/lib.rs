//! # Antimatter
//!
//! Real-time visualizations of matter/antimatter annihilation.
//!
//! Three scenes share one particle model and one frame driver:
//!
//! - [`AcceleratorRing`]: two counter-rotating beams on a circular ring that
//!   annihilate inside detection chambers, with an optional heat map of
//!   where collisions happened.
//! - [`Annihilation`]: a single particle and its antiparticle approaching,
//!   colliding once and releasing a burst of energy particles.
//! - [`ParticleField`]: an ambient cloud of drifting particles joined by
//!   fading links and drawn toward the pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use antimatter::prelude::*;
//!
//! let mut driver = FrameDriver::new(AcceleratorRing::new(RingConfig::default()));
//! driver.start();
//!
//! // In your frame callback:
//! if let Some(frame) = driver.tick() {
//!     // upload frame.sprites / frame.links and draw them
//! }
//! ```
//!
//! ## Frame Order
//!
//! Every running frame advances the clock, integrates particle motion,
//! detects collisions, spawns and ages effects, and finally rebuilds the
//! [`DrawList`]. Pausing freezes physics while the last frame stays visible.
//!
//! ## Units
//!
//! Positions are pixels (world units for the ring), time is seconds and
//! energies are MeV, with joules available through [`EnergyLedger`].

pub mod annihilation;
pub mod camera;
pub mod collision;
pub mod config;
pub mod draw;
pub mod driver;
pub mod effects;
pub mod error;
pub mod field;
pub mod gpu;
pub mod heatmap;
pub mod input;
pub mod integrator;
pub mod particle;
pub mod ring;
pub mod shader;
pub mod species;
pub mod store;
pub mod tasks;
pub mod time;
pub mod viewport;
pub mod window;

pub use annihilation::{Annihilation, Phase};
pub use camera::Camera;
pub use collision::{Chamber, CollisionEvent, PairDetector};
pub use config::{AnnihilationConfig, Config, FieldConfig, RingConfig};
pub use draw::{DrawList, Projection};
pub use driver::{Control, DriverState, FrameDriver, Scene};
pub use effects::{EffectSet, EnergyLedger};
pub use error::{AppError, ConfigError, GpuError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec3, Vec4};
pub use heatmap::HeatAccumulator;
pub use particle::{Direction, Particle, ParticleKind};
pub use ring::AcceleratorRing;
pub use species::Species;
pub use store::ParticleStore;
pub use time::{FrameStep, Time, TimeScale};
pub use viewport::{SceneManager, SurfaceProvider, Viewport};
pub use window::{App, SceneKind};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use antimatter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annihilation::{Annihilation, Phase};
    pub use crate::config::{AnnihilationConfig, Config, FieldConfig, RingConfig};
    pub use crate::draw::{DrawList, Projection};
    pub use crate::driver::{Control, DriverState, FrameDriver, Scene};
    pub use crate::effects::EnergyLedger;
    pub use crate::field::ParticleField;
    pub use crate::particle::{Particle, ParticleKind};
    pub use crate::ring::AcceleratorRing;
    pub use crate::species::Species;
    pub use crate::time::{FrameStep, Time, TimeScale};
    pub use crate::{Vec2, Vec3, Vec4};
}
