//! # symbios-plant
//!
//! Engine-agnostic plant growth for [Symbios](https://crates.io/crates/symbios) style
//! L-Systems: a grammar expander plus a turtle that wraps its branches around a
//! reference surface.
//!
//! It decouples the *Genotype* (axiom, rules, iteration count) from the *Phenotype*
//! (the drawn segments). The core never renders anything: branches go to a
//! [`BranchEmitter`] and steering asks a [`SurfaceOracle`] for the nearest surface
//! point, so any engine can plug in its own line renderer and collider.
//!
//! ```no_run
//! use symbios_plant::{BranchCollector, PlantConfig, Preset, SphereSurface, grow};
//! use glam::Vec3;
//!
//! let mut config = PlantConfig::from_preset(Preset::Climbing);
//! config.turtle.adaptation_strength = 20.0;
//! let sphere = SphereSurface::new(Vec3::new(0.0, -5.0, 0.0), 5.0);
//!
//! let mut branches = BranchCollector::new();
//! let report = grow(&config, &mut branches, &sphere)?;
//! assert_eq!(report.branches_emitted, branches.len());
//! # Ok::<(), symbios_plant::PlantError>(())
//! ```

pub mod branch;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod pacing;
pub mod plant;
pub mod surface;
pub mod turtle;

pub use branch::*;
pub use error::*;
pub use grammar::*;
pub use interpreter::*;
pub use pacing::*;
pub use plant::*;
pub use surface::*;
pub use turtle::*;

// Re-export the math crate so consumers use the compatible version
pub use glam;
