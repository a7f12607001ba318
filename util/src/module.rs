//! Module interfaces
//!
//! Each cyclic module in `bot_exec` shall implement all the items in this
//! module. A cyclic module is initialised once at startup and then processed
//! exactly once per control cycle by the main loop, consuming a snapshot of
//! its inputs and producing its outputs plus a status report.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data required for cyclic processing.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module.
    ///
    /// An error here is a configuration error - the executable shall refuse
    /// to enter the main loop rather than run a partially initialised module.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Main module processing function, called once per control cycle.
    ///
    /// The input data is a snapshot taken at the start of the cycle and must
    /// be treated as immutable for the duration of the cycle.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
