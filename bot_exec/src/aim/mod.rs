//! # Aim engine module
//!
//! The aim engine produces the shot parameters for the auto-aim mode. It is
//! made of two parts:
//!
//! - The [`ShotTable`], the static distance calibration of the launcher.
//! - The [`AimPredictor`], which solves the aim geometry against the
//!   alliance-mirrored target each cycle.
//!
//! The engine is owned by the mode manager and invoked from its cyclic
//! processing whenever the current mode requires an aim solution.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod predictor;
mod shot_table;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::AimParams;
pub use predictor::{AimPredictor, AimSolution};
pub use shot_table::{CalibPoint, ShotParams, ShotTable, ShotTableError};
