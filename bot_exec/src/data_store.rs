//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use subsys_if::eqpt::operator::OperatorFrame;

use crate::mode_mgr::{InputData, ModeMgr, OutputData, StatusReport};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
///
/// All cyclic state is owned here by the control-loop thread - no locking is
/// needed anywhere in the core.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Operator input
    /// The operator frame currently in force. Defaults to the safe
    /// (disabled) frame until the script supplies one.
    pub operator_frame: OperatorFrame,

    // ModeMgr
    pub mode_mgr: ModeMgr,
    pub mode_mgr_input: InputData,
    pub mode_mgr_output: OutputData,
    pub mode_mgr_status_rpt: StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag. The operator frame is deliberately not
    /// cleared - it stays in force until the script replaces it.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.mode_mgr_input = InputData::default();
        self.mode_mgr_output = OutputData::default();
        self.mode_mgr_status_rpt = StatusReport::default();
    }
}
