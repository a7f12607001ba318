//! # Operator script interpreter module
//!
//! This module provides an interpreter for operator input scripts, allowing
//! the robot to be driven from a recorded sequence of operator frames rather
//! than a live input device.
//!
//! A script is a plain text file of `time: payload;` entries, where `time` is
//! the session-elapsed time in seconds at which the frame takes effect and
//! `payload` is the JSON representation of a [`subsys_if`] `OperatorFrame`.
//! A frame stays in force until the next frame's time is reached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;
use subsys_if::eqpt::operator::{FrameParseError, OperatorFrame};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A frame which is scripted to take effect at a specific time.
struct ScriptedFrame {
    /// The time the frame takes effect at
    effect_time_s: f64,

    /// The operator frame to apply
    frame: OperatorFrame,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_frames` once per cycle to acquire the frames that have come
/// into effect since the last call.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    frames: VecDeque<ScriptedFrame>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid operator frame at {0} s: {1}")]
    InvalidFrame(f64, FrameParseError),
}

pub enum PendingFrames {
    None,
    Some(Vec<OperatorFrame>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e)),
        };

        // Empty queue of frames
        let mut frame_queue: VecDeque<ScriptedFrame> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        for cap in re.captures_iter(&script) {
            // Parse the effect time
            let effect_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(ScriptError::InvalidTimestamp(format!("{}", e))),
            };

            // Parse the frame from the payload. The scripts contain JSON only.
            let frame = match OperatorFrame::from_json(cap.get(3).unwrap().as_str()) {
                Ok(f) => f,
                Err(e) => return Err(ScriptError::InvalidFrame(effect_time_s, e)),
            };

            // Build the scripted frame from the match
            frame_queue.push_back(ScriptedFrame {
                effect_time_s,
                frame,
            });
        }

        if frame_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(ScriptInterpreter {
            _script_path: path,
            frames: frame_queue,
        })
    }

    /// Return a vector of newly effective frames, in script order, or `None`
    /// if no frame comes into effect this cycle.
    ///
    /// The caller should apply the frames in order, so that the last one
    /// remains in force for the cycle.
    pub fn get_pending_frames(&mut self) -> PendingFrames {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.frames.is_empty() {
            return PendingFrames::EndOfScript;
        }

        let mut frame_vec: Vec<OperatorFrame> = vec![];

        let current_time_s = get_elapsed_seconds();

        // Peek items from the queue, if the head's effect time is lower than
        // the current time add it to the vector, and keep adding frames until
        // the effect times are larger than the current time.
        while self
            .frames
            .front()
            .map(|f| f.effect_time_s < current_time_s)
            .unwrap_or(false)
        {
            if let Some(f) = self.frames.pop_front() {
                frame_vec.push(f.frame);
            }
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !frame_vec.is_empty() {
            PendingFrames::Some(frame_vec)
        } else {
            PendingFrames::None
        }
    }

    /// Get the number of frames remaining in the script
    pub fn get_num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.frames.back() {
            Some(f) => f.effect_time_s,
            None => 0f64,
        }
    }
}
