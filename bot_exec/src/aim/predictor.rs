//! # Aim predictor
//!
//! The predictor turns a drivetrain pose snapshot and the alliance-mirrored
//! target point into an [`AimSolution`]: a heading and launch wheel velocity
//! demand, corrected for the robot's motion over the projectile's flight.
//!
//! Each solve estimates the time of flight from the previous cycle's range,
//! extrapolates the snapshot that far ahead, and aims from the extrapolated
//! position. The first solve after init uses a zero time of flight, so a
//! stationary robot is unaffected by the lookahead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::warn;
use serde::Serialize;

// Internal
use super::params::AimParams;
use super::shot_table::{ShotParams, ShotTable, ShotTableError};
use util::maths;
use subsys_if::eqpt::drive::{Pose, PoseSnapshot};
use subsys_if::field::Alliance;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An aim solution for the current cycle.
///
/// Solutions are recomputed every cycle while aiming and are only held for
/// continuous actuation - they have no meaning outside the aiming mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AimSolution {
    /// Absolute heading demand for the drivetrain.
    ///
    /// Units: radians
    pub target_angle_rad: f64,

    /// Launch wheel velocity demand for the shooter.
    ///
    /// Units: radians/second
    pub target_velocity_rads: f64,

    /// Range from the lookahead position to the target.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Time of flight estimate used for the lookahead.
    ///
    /// Units: seconds
    pub time_of_flight_s: f64,
}

/// The aim predictor.
#[derive(Debug, Default)]
pub struct AimPredictor {
    params: AimParams,

    table: ShotTable,

    /// Range computed by the previous solve, seeding the next time of flight
    /// estimate.
    last_distance_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AimPredictor {
    /// Build a predictor from its parameters, validating the shot table.
    pub fn new(params: AimParams) -> Result<Self, ShotTableError> {
        let table = ShotTable::new(params.shot_table.clone())?;

        Ok(Self {
            params,
            table,
            last_distance_m: 0.0,
        })
    }

    /// The validated shot table.
    pub fn table(&self) -> &ShotTable {
        &self.table
    }

    /// Compute an aim solution from the cycle's pose snapshot.
    ///
    /// This never blocks and never fails: an absent snapshot is treated as
    /// zero range (the solution aims along the field X axis with the
    /// minimum-range shot parameters), and a lookup failure degrades to a
    /// zero-velocity solution with a warning.
    pub fn solve(&mut self, snapshot: Option<&PoseSnapshot>, alliance: Alliance) -> AimSolution {
        let target = alliance.mirror(self.params.target_point(), self.params.field_length_m);

        let snapshot = match snapshot {
            Some(s) => s,
            None => {
                warn!("No pose snapshot available, aiming with zero range");
                self.last_distance_m = 0.0;
                let shot = self.lookup_or_safe(0.0);
                return AimSolution {
                    target_angle_rad: maths::wrap_pi(shot.angle_rad),
                    target_velocity_rads: shot.power_rads,
                    distance_m: 0.0,
                    time_of_flight_s: 0.0,
                };
            }
        };

        let time_of_flight_s = self.time_of_flight(self.last_distance_m);
        let lookahead = snapshot.lookahead(time_of_flight_s);

        let delta = target - lookahead.position_m;
        let distance_m = delta.norm();
        let bearing_rad = delta.y.atan2(delta.x);

        let shot = self.lookup_or_safe(distance_m);

        self.last_distance_m = distance_m;

        AimSolution {
            target_angle_rad: maths::wrap_pi(bearing_rad + shot.angle_rad),
            target_velocity_rads: shot.power_rads,
            distance_m,
            time_of_flight_s,
        }
    }

    /// Plain range and bearing from the given pose to the mirrored target,
    /// without lookahead. Used for telemetry.
    pub fn distance_bearing(&self, pose: &Pose, alliance: Alliance) -> (f64, f64) {
        let target = alliance.mirror(self.params.target_point(), self.params.field_length_m);

        let delta = target - pose.position_m;

        (delta.norm(), delta.y.atan2(delta.x))
    }

    /// Estimate the projectile time of flight for a given range.
    fn time_of_flight(&self, distance_m: f64) -> f64 {
        if self.params.exit_speed_ms > 0.0 {
            distance_m / self.params.exit_speed_ms
        } else {
            0.0
        }
    }

    fn lookup_or_safe(&self, distance_m: f64) -> ShotParams {
        match self.table.lookup(distance_m) {
            Ok(shot) => shot,
            Err(e) => {
                warn!("Shot table lookup failed: {}", e);
                ShotParams {
                    angle_rad: 0.0,
                    power_rads: 0.0,
                }
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{Point2, Vector2};
    use subsys_if::eqpt::drive::Pose;

    use crate::aim::shot_table::CalibPoint;

    fn test_params() -> AimParams {
        AimParams {
            target_position_m: [3.0, 4.0],
            field_length_m: 17.55,
            exit_speed_ms: 10.0,
            shot_table: vec![
                CalibPoint {
                    distance_m: 2.0,
                    angle_rad: 0.0,
                    power_rads: 100.0,
                },
                CalibPoint {
                    distance_m: 4.0,
                    angle_rad: 0.0,
                    power_rads: 200.0,
                },
            ],
        }
    }

    fn snapshot_at(x: f64, y: f64, heading_rad: f64, vel: Vector2<f64>) -> PoseSnapshot {
        PoseSnapshot {
            pose: Pose {
                position_m: Point2::new(x, y),
                heading_rad,
            },
            velocity_ms: vel,
        }
    }

    #[test]
    fn test_solve_from_origin() {
        let mut predictor = AimPredictor::new(test_params()).unwrap();

        // First solve has a zero time of flight, so the lookahead is the
        // identity even at speed and the geometry is exact.
        let snapshot = snapshot_at(0.0, 0.0, 0.0, Vector2::new(0.0, 0.0));
        let solution = predictor.solve(Some(&snapshot), Alliance::Blue);

        assert!((solution.distance_m - 5.0).abs() < 1e-9);
        assert!((solution.target_angle_rad - 4.0_f64.atan2(3.0)).abs() < 1e-9);
        assert_eq!(solution.time_of_flight_s, 0.0);

        // 5 m is beyond the calibrated span, so power clamps to the far
        // sample
        assert_eq!(solution.target_velocity_rads, 200.0);
    }

    #[test]
    fn test_solve_applies_lookahead() {
        let mut predictor = AimPredictor::new(test_params()).unwrap();

        let moving = snapshot_at(0.0, 4.0, 0.0, Vector2::new(1.0, 0.0));

        // First solve seeds the range estimate: delta (3, 0), range 3 m
        let first = predictor.solve(Some(&moving), Alliance::Blue);
        assert!((first.distance_m - 3.0).abs() < 1e-9);

        // Second solve looks ahead 3 / 10 = 0.3 s, i.e. 0.3 m downrange
        let second = predictor.solve(Some(&moving), Alliance::Blue);
        assert!((second.time_of_flight_s - 0.3).abs() < 1e-9);
        assert!((second.distance_m - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_solve_mirrors_for_red() {
        let mut predictor = AimPredictor::new(test_params()).unwrap();

        let snapshot = snapshot_at(14.55, 0.0, 0.0, Vector2::new(0.0, 0.0));
        let solution = predictor.solve(Some(&snapshot), Alliance::Red);

        // Mirrored target is (14.55, 4.0), directly up-field of the robot
        assert!((solution.distance_m - 4.0).abs() < 1e-9);
        assert!(
            (solution.target_angle_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-9
        );
    }

    #[test]
    fn test_solve_without_pose() {
        let mut predictor = AimPredictor::new(test_params()).unwrap();

        let solution = predictor.solve(None, Alliance::Blue);

        assert_eq!(solution.distance_m, 0.0);
        assert_eq!(solution.time_of_flight_s, 0.0);

        // Zero range clamps to the near end of the table
        assert_eq!(solution.target_velocity_rads, 100.0);
    }

    #[test]
    fn test_distance_bearing_telemetry() {
        let predictor = AimPredictor::new(test_params()).unwrap();

        let pose = Pose {
            position_m: Point2::new(0.0, 0.0),
            heading_rad: 1.0,
        };

        let (distance_m, bearing_rad) = predictor.distance_bearing(&pose, Alliance::Blue);

        // Bearing is field-relative, the robot's own heading plays no part
        assert!((distance_m - 5.0).abs() < 1e-9);
        assert!((bearing_rad - 4.0_f64.atan2(3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_rejected_at_init() {
        let params = AimParams {
            shot_table: vec![],
            ..test_params()
        };

        assert!(AimPredictor::new(params).is_err());
    }
}
