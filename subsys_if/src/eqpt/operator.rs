//! # Operator input interface types
//!
//! The operator input device is sampled once per control cycle into an
//! [`OperatorInput`] snapshot: eight mode-request booleans, the held
//! modifiers, and the drive stick axes. The snapshot is read-only to the
//! decision core, which applies its own edge/level semantics on top.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The eight mode-request signals, one per operating mode.
///
/// This is a total struct rather than a map - every mode has a request signal
/// by construction, so a "missing request mapping" cannot exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeRequests {
    #[serde(default)]
    pub idle: bool,

    #[serde(default)]
    pub intake: bool,

    #[serde(default)]
    pub ready: bool,

    #[serde(default)]
    pub eject: bool,

    #[serde(default)]
    pub auto_aim_score: bool,

    #[serde(default)]
    pub manual_aim_score: bool,

    #[serde(default)]
    pub score: bool,

    #[serde(default)]
    pub manual: bool,
}

/// A full operator input snapshot for one control cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatorInput {
    /// Mode request signals.
    #[serde(default)]
    pub requests: ModeRequests,

    /// Held aim trigger, used while in the manual-aim mode.
    #[serde(default)]
    pub aim_held: bool,

    /// Held direct-drive trigger for the feed channel (manual mode only).
    #[serde(default)]
    pub feed_held: bool,

    /// Held direct-drive trigger for the shoot channel (manual mode only).
    #[serde(default)]
    pub shoot_held: bool,

    /// Held direct-drive trigger for intaking (manual mode only).
    #[serde(default)]
    pub intake_held: bool,

    /// Normalised translation stick, field X axis, in [-1, +1].
    #[serde(default)]
    pub translate_x: f64,

    /// Normalised translation stick, field Y axis, in [-1, +1].
    #[serde(default)]
    pub translate_y: f64,

    /// Normalised rotation stick in [-1, +1].
    #[serde(default)]
    pub rotate: f64,
}

/// An operator frame: the platform enable flag plus the input snapshot.
///
/// Frames are what operator scripts contain; a frame stays in force until the
/// next one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorFrame {
    /// Platform enable flag. While false the robot must hold its safe
    /// posture regardless of the rest of the frame.
    pub enabled: bool,

    /// The operator input snapshot.
    #[serde(default)]
    pub input: OperatorInput,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An error which occurs when parsing an operator frame.
#[derive(Debug, Error)]
pub enum FrameParseError {
    #[error("Cannot parse the operator frame: {0}")]
    JsonError(#[from] serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for OperatorFrame {
    fn default() -> Self {
        OperatorFrame::safe()
    }
}

impl OperatorFrame {
    /// The safe frame: platform disabled, all signals released.
    pub fn safe() -> Self {
        OperatorFrame {
            enabled: false,
            input: OperatorInput::default(),
        }
    }

    /// Parse a frame from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, FrameParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_frame_from_json() {
        let frame = OperatorFrame::from_json(
            r#"{"enabled": true, "input": {"requests": {"intake": true}, "translate_x": 0.5}}"#,
        )
        .unwrap();

        assert!(frame.enabled);
        assert!(frame.input.requests.intake);
        assert!(!frame.input.requests.idle);
        assert!(!frame.input.aim_held);
        assert_eq!(frame.input.translate_x, 0.5);
        assert_eq!(frame.input.translate_y, 0.0);
    }

    #[test]
    fn test_frame_from_json_invalid() {
        assert!(OperatorFrame::from_json("{not json}").is_err());

        // A frame must carry the enable flag explicitly
        assert!(OperatorFrame::from_json("{}").is_err());
    }
}
