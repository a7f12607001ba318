//! # Subsystem interface library
//!
//! This crate defines the narrow interfaces between the robot's decision core
//! (`bot_exec`) and its collaborating subsystems: the drivetrain, the shooter
//! mechanism, the operator input device, and the field/alliance service. Only
//! plain data types live here - the subsystems' internal control (closed-loop
//! motor control, pose estimation) is out of scope for the core and is hidden
//! behind these types.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod eqpt;
pub mod field;
