//! # Drivetrain interface types

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Field-frame pose of the robot base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the robot's centre in the field frame.
    ///
    /// Units: meters,
    /// Frame: Field
    pub position_m: Point2<f64>,

    /// Heading of the robot about the field Z+ (upwards) axis, zero along the
    /// field X+ axis.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// Snapshot of the drivetrain state taken at the start of a control cycle.
///
/// The snapshot is immutable for the remainder of the cycle, so any lookahead
/// is done by extrapolating it rather than by querying the drivetrain again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Pose at the time the snapshot was taken.
    pub pose: Pose,

    /// Field-frame velocity at the time the snapshot was taken.
    ///
    /// Units: meters/second,
    /// Frame: Field
    pub velocity_ms: Vector2<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A demand that can be executed by the drivetrain.
///
/// Translation and rotation axes are normalised operator stick values in
/// [-1, +1]; scaling to physical speeds is the drivetrain's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DriveDem {
    /// Field-relative drive from the operator sticks.
    FieldRelative {
        /// Normalised translation demand along the field X axis.
        x: f64,

        /// Normalised translation demand along the field Y axis.
        y: f64,

        /// Normalised rotation rate demand about the field Z+ axis.
        rot: f64,
    },

    /// Translate on the operator sticks while the drivetrain closes the loop
    /// on an absolute heading.
    AtAngle {
        /// Normalised translation demand along the field X axis.
        x: f64,

        /// Normalised translation demand along the field Y axis.
        y: f64,

        /// Absolute heading demand about the field Z+ axis.
        ///
        /// Units: radians
        angle_rad: f64,
    },

    /// Bring all axes to zero rate and hold.
    Stop,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for DriveDem {
    fn default() -> Self {
        DriveDem::Stop
    }
}

impl PoseSnapshot {
    /// Predict the pose `dt_s` seconds ahead of the snapshot under a
    /// constant-velocity extrapolation. Heading is held, the drivetrain's
    /// rotation over a projectile's flight is not modelled.
    pub fn lookahead(&self, dt_s: f64) -> Pose {
        Pose {
            position_m: self.pose.position_m + self.velocity_ms * dt_s,
            heading_rad: self.pose.heading_rad,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookahead() {
        let snapshot = PoseSnapshot {
            pose: Pose {
                position_m: Point2::new(1.0, 2.0),
                heading_rad: 0.5,
            },
            velocity_ms: Vector2::new(2.0, -1.0),
        };

        let ahead = snapshot.lookahead(0.5);

        assert_eq!(ahead.position_m, Point2::new(2.0, 1.5));
        assert_eq!(ahead.heading_rad, 0.5);

        // Zero lookahead is the identity
        let same = snapshot.lookahead(0.0);
        assert_eq!(same.position_m, snapshot.pose.position_m);
    }
}
