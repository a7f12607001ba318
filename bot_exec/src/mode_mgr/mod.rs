//! # ModeMgr module
//!
//! This module implements the [`ModeMgr`] state machine, which arbitrates
//! operator requests and subsystem sensor flags into the robot's single
//! discrete operating mode, and converts that mode into the cycle's drive and
//! shooter demands. The machine is broken down into a number of modes:
//!
//! - `Idle` - No projectile held, mechanisms stopped.
//! - `Intake` - The shooter runs in reverse to collect a projectile.
//! - `Ready` - A projectile is held, mechanisms stopped, awaiting an aim
//!   request.
//! - `Eject` - The shooter runs forwards to discard the held projectile.
//! - `AutoAimScore` - The drivetrain tracks the aim solution while the launch
//!   wheel spins to the solved velocity.
//! - `ManualAimScore` - The launch wheel spins at a fixed operator-tunable
//!   velocity while the aim trigger is held.
//! - `Score` - The feed channel pushes the projectile into the launch wheel.
//! - `Manual` - Direct operator drive of the feed, shoot and intake
//!   actuators.
//!
//! Transitions between modes are declared as a fixed, ordered rule table in
//! [`rules`] and evaluated once per control cycle on rising edges only; the
//! per-cycle demands are level-triggered and recomputed from the latched mode
//! every cycle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod rules;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::aim::ShotTableError;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::Params;
pub use rules::{GuardCtx, Rule, NUM_RULES, RULES};
pub use state::{InputData, ModeMgr, OutputData, StatusReport};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The robot's discrete operating mode.
///
/// Exactly one mode is active at any instant. The mode is owned by the
/// [`ModeMgr`] and mutated only by its transition evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Idle,
    Intake,
    Ready,
    Eject,
    AutoAimScore,
    ManualAimScore,
    Score,
    Manual,
}

/// Errors that can occur in the mode manager.
#[derive(Debug, thiserror::Error)]
pub enum ModeMgrError {
    #[error("Failed to load Params: {0:?}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid shot table: {0}")]
    ShotTableError(ShotTableError),

    #[error("Settle delay of {0} s cannot be counted at a cycle period of {1} s")]
    InvalidSettleDelay(f64, f64),

    #[error("Failed to initialise the archiver: {0}")]
    ArchiveInitError(util::archive::ArchiveError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Idle => write!(f, "Mode::Idle"),
            Mode::Intake => write!(f, "Mode::Intake"),
            Mode::Ready => write!(f, "Mode::Ready"),
            Mode::Eject => write!(f, "Mode::Eject"),
            Mode::AutoAimScore => write!(f, "Mode::AutoAimScore"),
            Mode::ManualAimScore => write!(f, "Mode::ManualAimScore"),
            Mode::Score => write!(f, "Mode::Score"),
            Mode::Manual => write!(f, "Mode::Manual"),
        }
    }
}
