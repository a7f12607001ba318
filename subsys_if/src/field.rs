//! # Field and alliance types
//!
//! Scoring targets are defined in blue-alliance field coordinates. When the
//! robot plays on the red alliance the target is reflected across the field
//! centre line once per cycle - the mirroring is a pure function and is never
//! cached across alliance changes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The alliance the robot is playing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alliance {
    Blue,
    Red,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Alliance {
    fn default() -> Self {
        Alliance::Blue
    }
}

impl Alliance {
    /// Transform a blue-alliance field point into this alliance's frame.
    ///
    /// For blue the point is returned unchanged. For red it is reflected
    /// across the field centre line: `x' = field_length - x`, `y' = y`.
    pub fn mirror(&self, point_m: Point2<f64>, field_length_m: f64) -> Point2<f64> {
        match self {
            Alliance::Blue => point_m,
            Alliance::Red => Point2::new(field_length_m - point_m.x, point_m.y),
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
    fn test_mirror() {
        let target = Point2::new(3.0, 4.0);

        assert_eq!(Alliance::Blue.mirror(target, 17.55), target);

        let mirrored = Alliance::Red.mirror(target, 17.55);
        assert!((mirrored.x - 14.55).abs() < 1e-12);
        assert_eq!(mirrored.y, 4.0);

        // Mirroring twice is the identity
        let twice = Alliance::Red.mirror(mirrored, 17.55);
        assert!((twice.x - target.x).abs() < 1e-12);
        assert_eq!(twice.y, target.y);
    }
}
