//! # Equipment interface types
//!
//! One module per collaborating subsystem.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drivetrain interface - pose snapshots in and drive demands out
pub mod drive;

/// Operator input device interface - request and held-modifier snapshots
pub mod operator;

/// Shooter mechanism interface - per-channel actuator demands
pub mod shooter;
