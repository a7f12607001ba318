//! Parameters structure for the ModeMgr

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the mode manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    // ---- TRANSITIONS ----
    /// Time the object-detection flag must stay clear in the score mode
    /// before returning to idle.
    ///
    /// Units: seconds
    pub settle_delay_s: f64,

    /// Maximum bearing error at which the auto-aim is considered ready to
    /// score.
    ///
    /// Units: radians
    pub aim_tol_rad: f64,

    // ---- SHOOTER DEMANDS ----
    /// Open-loop voltage applied (in reverse) to both channels while
    /// intaking.
    ///
    /// Units: volts
    pub intake_volts: f64,

    /// Open-loop voltage applied to both channels while ejecting.
    ///
    /// Units: volts
    pub eject_volts: f64,

    /// Open-loop voltage applied to the feed channel while scoring.
    ///
    /// Units: volts
    pub feed_volts: f64,

    /// Operator-tunable launch wheel velocity for manual aiming.
    ///
    /// Units: radians/second
    pub manual_shoot_velocity_rads: f64,
}
