//! # Shooter mechanism interface types
//!
//! The shooter has two motor channels: the `shoot` channel driving the launch
//! wheel and the `feed` channel driving the projectile into it. Running both
//! channels in reverse intakes a projectile, running both forwards ejects it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand for a single shooter motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisDem {
    /// No drive on the channel.
    Off,

    /// Open-loop voltage drive.
    ///
    /// Units: volts
    OpenLoop(f64),

    /// Closed-loop velocity drive.
    ///
    /// Units: radians/second
    Velocity(f64),
}

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Demands for both shooter channels, recomputed every control cycle.
///
/// A channel with no demand this cycle is `AxisDem::Off` - the mechanism must
/// not latch a previous cycle's demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShooterDems {
    /// Launch wheel channel demand.
    pub shoot: AxisDem,

    /// Feed channel demand.
    pub feed: AxisDem,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for AxisDem {
    fn default() -> Self {
        AxisDem::Off
    }
}

impl Default for ShooterDems {
    fn default() -> Self {
        ShooterDems::safe()
    }
}

impl ShooterDems {
    /// The safe posture: both channels off.
    pub fn safe() -> Self {
        ShooterDems {
            shoot: AxisDem::Off,
            feed: AxisDem::Off,
        }
    }
}
