//! # Shot table
//!
//! The shot table holds the distance calibration of the launcher: a set of
//! measured (distance, aim angle, shot power) samples taken during tuning,
//! ordered by distance. Lookups between samples are interpolated with
//! inverse-distance weighting (exponent 2); lookups outside the calibrated
//! span clamp to the nearest end sample.
//!
//! The calibration set is static configuration loaded at init - it is never
//! mutated by robot operation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One calibration sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibPoint {
    /// Range from the target the sample was taken at.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Aim angle correction measured at this range.
    ///
    /// Units: radians
    pub angle_rad: f64,

    /// Launch wheel velocity measured at this range.
    ///
    /// Units: radians/second
    pub power_rads: f64,
}

/// The shot parameters produced by a table lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotParams {
    /// Aim angle correction.
    ///
    /// Units: radians
    pub angle_rad: f64,

    /// Launch wheel velocity.
    ///
    /// Units: radians/second
    pub power_rads: f64,
}

/// The calibration table itself, with points held sorted by ascending
/// distance.
#[derive(Debug, Clone, Default)]
pub struct ShotTable {
    points: Vec<CalibPoint>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised when building or querying the shot table.
///
/// All of these are configuration errors - they indicate a bad calibration
/// set and must be fatal at startup, never silently defaulted at run time.
#[derive(Debug, Error)]
pub enum ShotTableError {
    #[error("The shot table has no calibration points")]
    EmptyTable,

    #[error("Calibration distance {0} m is not a finite non-negative number")]
    InvalidDistance(f64),

    #[error("Calibration angle {1} rad at {0} m is not finite")]
    InvalidAngle(f64, f64),

    #[error("Calibration power {1} rad/s at {0} m is not a finite non-negative number")]
    InvalidPower(f64, f64),

    #[error("Duplicate calibration distance: {0} m")]
    DuplicateDistance(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CalibPoint {
    fn params(&self) -> ShotParams {
        ShotParams {
            angle_rad: self.angle_rad,
            power_rads: self.power_rads,
        }
    }
}

impl ShotTable {
    /// Build a table from a set of calibration points.
    ///
    /// The set must be non-empty, all values finite, powers and distances
    /// non-negative, and distances unique. The points may be given in any
    /// order - they are sorted by distance here.
    pub fn new(points: Vec<CalibPoint>) -> Result<Self, ShotTableError> {
        if points.is_empty() {
            return Err(ShotTableError::EmptyTable);
        }

        let mut keyed: Vec<(NotNan<f64>, CalibPoint)> = Vec::with_capacity(points.len());

        for point in points {
            if !point.distance_m.is_finite() || point.distance_m < 0.0 {
                return Err(ShotTableError::InvalidDistance(point.distance_m));
            }
            if !point.angle_rad.is_finite() {
                return Err(ShotTableError::InvalidAngle(
                    point.distance_m,
                    point.angle_rad,
                ));
            }
            if !point.power_rads.is_finite() || point.power_rads < 0.0 {
                return Err(ShotTableError::InvalidPower(
                    point.distance_m,
                    point.power_rads,
                ));
            }

            let key = NotNan::new(point.distance_m)
                .map_err(|_| ShotTableError::InvalidDistance(point.distance_m))?;

            keyed.push((key, point));
        }

        keyed.sort_by_key(|(key, _)| *key);

        for pair in keyed.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ShotTableError::DuplicateDistance(*pair[0].0));
            }
        }

        Ok(Self {
            points: keyed.into_iter().map(|(_, point)| point).collect(),
        })
    }

    /// Look up the shot parameters for a given range.
    ///
    /// Ranges at or beyond the calibrated span return the end samples
    /// unchanged, and a range matching a sample exactly returns that sample
    /// unchanged. Ranges between two samples are interpolated with
    /// inverse-distance weighting of the two bracketing neighbours, with
    /// weights `1 / (range - sample range)^2` recomputed on every call.
    ///
    /// Non-finite ranges clamp to the near end of the span, keeping the
    /// lookup total over all inputs.
    pub fn lookup(&self, distance_m: f64) -> Result<ShotParams, ShotTableError> {
        let first = match self.points.first() {
            Some(p) => p,
            None => return Err(ShotTableError::EmptyTable),
        };
        let last = match self.points.last() {
            Some(p) => p,
            None => return Err(ShotTableError::EmptyTable),
        };

        if !distance_m.is_finite() || distance_m <= first.distance_m {
            return Ok(first.params());
        }
        if distance_m >= last.distance_m {
            return Ok(last.params());
        }

        // First point at or above the queried range. The clamps above
        // guarantee a bracketing pair exists.
        let idx = self
            .points
            .partition_point(|p| p.distance_m < distance_m);

        let above = &self.points[idx];
        if above.distance_m == distance_m {
            return Ok(above.params());
        }
        let below = &self.points[idx - 1];

        let weight_below = 1.0 / (distance_m - below.distance_m).powi(2);
        let weight_above = 1.0 / (above.distance_m - distance_m).powi(2);
        let weight_sum = weight_below + weight_above;

        Ok(ShotParams {
            angle_rad: (below.angle_rad * weight_below + above.angle_rad * weight_above)
                / weight_sum,
            power_rads: (below.power_rads * weight_below + above.power_rads * weight_above)
                / weight_sum,
        })
    }

    /// Get the calibrated distance span as `(min, max)`, or `None` for an
    /// empty table.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.distance_m, last.distance_m)),
            _ => None,
        }
    }

    /// Number of calibration points in the table.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the table holds no calibration points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn two_point_table() -> ShotTable {
        ShotTable::new(vec![
            CalibPoint {
                distance_m: 2.0,
                angle_rad: 10.0_f64.to_radians(),
                power_rads: 100.0,
            },
            CalibPoint {
                distance_m: 4.0,
                angle_rad: 20.0_f64.to_radians(),
                power_rads: 200.0,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let table = two_point_table();

        let params = table.lookup(2.0).unwrap();
        assert_eq!(params.angle_rad, 10.0_f64.to_radians());
        assert_eq!(params.power_rads, 100.0);
    }

    #[test]
    fn test_clamp_below_and_above() {
        let table = two_point_table();

        let below = table.lookup(1.0).unwrap();
        assert_eq!(below.angle_rad, 10.0_f64.to_radians());
        assert_eq!(below.power_rads, 100.0);

        let above = table.lookup(5.0).unwrap();
        assert_eq!(above.angle_rad, 20.0_f64.to_radians());
        assert_eq!(above.power_rads, 200.0);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let table = two_point_table();

        // Equidistant from both neighbours, so the weights cancel and the
        // result is the plain average.
        let mid = table.lookup(3.0).unwrap();
        assert!((mid.angle_rad - 15.0_f64.to_radians()).abs() < 1e-9);
        assert!((mid.power_rads - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_asymmetric_interpolation() {
        let table = two_point_table();

        // At 2.5 m the weights are 1/0.25 and 1/2.25, which works out to
        // exactly 11 degrees and 110 rad/s.
        let params = table.lookup(2.5).unwrap();
        assert!((params.angle_rad - 11.0_f64.to_radians()).abs() < 1e-9);
        assert!((params.power_rads - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_errors() {
        assert!(matches!(
            ShotTable::new(vec![]),
            Err(ShotTableError::EmptyTable)
        ));

        let table = ShotTable::default();
        assert!(matches!(
            table.lookup(3.0),
            Err(ShotTableError::EmptyTable)
        ));
    }

    #[test]
    fn test_unsorted_points_are_sorted() {
        let table = ShotTable::new(vec![
            CalibPoint {
                distance_m: 4.0,
                angle_rad: 0.0,
                power_rads: 200.0,
            },
            CalibPoint {
                distance_m: 2.0,
                angle_rad: 0.0,
                power_rads: 100.0,
            },
        ])
        .unwrap();

        assert_eq!(table.span(), Some((2.0, 4.0)));
    }

    #[test]
    fn test_invalid_points_rejected() {
        let valid = CalibPoint {
            distance_m: 2.0,
            angle_rad: 0.1,
            power_rads: 100.0,
        };

        assert!(matches!(
            ShotTable::new(vec![
                valid,
                CalibPoint {
                    distance_m: -1.0,
                    ..valid
                }
            ]),
            Err(ShotTableError::InvalidDistance(_))
        ));

        assert!(matches!(
            ShotTable::new(vec![
                valid,
                CalibPoint {
                    distance_m: 3.0,
                    power_rads: -5.0,
                    ..valid
                }
            ]),
            Err(ShotTableError::InvalidPower(_, _))
        ));

        assert!(matches!(
            ShotTable::new(vec![valid, valid]),
            Err(ShotTableError::DuplicateDistance(_))
        ));

        assert!(matches!(
            ShotTable::new(vec![CalibPoint {
                distance_m: f64::NAN,
                ..valid
            }]),
            Err(ShotTableError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_non_finite_lookup_clamps() {
        let table = two_point_table();

        let params = table.lookup(f64::NAN).unwrap();
        assert_eq!(params.power_rads, 100.0);
    }
}
