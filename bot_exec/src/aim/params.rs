//! Parameters structure for the aim engine

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Point2;
use serde::Deserialize;

use super::shot_table::CalibPoint;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Parameters for the aim engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AimParams {
    // ---- TARGET GEOMETRY ----
    /// Position of the scoring target in blue-alliance field coordinates.
    ///
    /// Units: meters,
    /// Frame: Field
    pub target_position_m: [f64; 2],

    /// Length of the field along its X axis, used for alliance mirroring.
    ///
    /// Units: meters
    pub field_length_m: f64,

    // ---- BALLISTICS ----
    /// Assumed projectile exit speed, used for the time of flight estimate.
    ///
    /// Units: meters/second
    pub exit_speed_ms: f64,

    /// Calibration samples for the shot table.
    pub shot_table: Vec<CalibPoint>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AimParams {
    /// The target position as a field-frame point.
    pub fn target_point(&self) -> Point2<f64> {
        Point2::new(self.target_position_m[0], self.target_position_m[1])
    }
}
