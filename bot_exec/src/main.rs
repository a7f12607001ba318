//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - System input acquisition:
//!             - Drivetrain pose snapshot
//!             - Shooter object-detection flag
//!         - Operator input processing (script replay)
//!         - Mode manager processing:
//!             - Transition evaluation
//!             - Aim solution computation
//!             - Demand synthesis
//!         - Mechanism execution (simulated)
//!         - Telemetry and archiving
//!
//! # Modules
//!
//! All modules (e.g. `mode_mgr`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use bot_lib::data_store::DataStore;
use bot_lib::mode_mgr::InputData;
#[cfg(feature = "sim")]
use bot_lib::sim_client::SimClient;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingFrames, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Talos Robot Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE OPERATOR INPUT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // The operator script is the only input source, so exactly one argument
    // is expected.
    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the operator script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading operator script from \"{}\"", &args[1]);

    let mut script = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} frames\n",
        script.get_duration(),
        script.get_num_frames()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.mode_mgr
        .init(("mode_mgr.toml", "aim.toml", CYCLE_PERIOD_S), &session)
        .wrap_err("Failed to initialise ModeMgr")?;
    info!("ModeMgr init complete");

    #[cfg(feature = "sim")]
    let mut sim_client = {
        let c = SimClient::init("sim.toml", CYCLE_PERIOD_S)
            .wrap_err("Failed to initialise SimClient")?;
        info!("SimClient initialised");
        c
    };

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- OPERATOR INPUT PROCESSING ----

        match script.get_pending_frames() {
            PendingFrames::None => (),
            PendingFrames::Some(frames) => {
                // Apply in order so the last frame stays in force
                for frame in frames {
                    ds.operator_frame = frame;
                }
            }
            // Exit if end of script reached
            PendingFrames::EndOfScript => {
                info!("End of operator script reached, stopping");
                break;
            }
        }

        // ---- DATA INPUT ----

        // Snapshot the collaborating subsystems for this cycle
        #[cfg(feature = "sim")]
        {
            ds.mode_mgr_input = InputData {
                enabled: ds.operator_frame.enabled,
                operator: ds.operator_frame.input,
                object_detected: sim_client.object_detected(),
                pose: Some(sim_client.pose_snapshot()),
                alliance: sim_client.alliance(),
            };
        }

        #[cfg(not(feature = "sim"))]
        {
            // Without an equipment stack there is no pose or detection
            // source; the machine degrades to its safe defaults.
            ds.mode_mgr_input = InputData {
                enabled: ds.operator_frame.enabled,
                operator: ds.operator_frame.input,
                object_detected: false,
                pose: None,
                alliance: Default::default(),
            };
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.mode_mgr.proc(&ds.mode_mgr_input) {
            Ok((output, report)) => {
                ds.mode_mgr_output = output;
                ds.mode_mgr_status_rpt = report;
            }
            Err(e) => {
                // ModeMgr processing is total once initialised, but degrade
                // with a warning rather than killing the loop if that ever
                // changes.
                warn!("Error during ModeMgr processing: {}", e)
            }
        };

        // ---- MECHANISM EXECUTION ----

        #[cfg(feature = "sim")]
        sim_client.step(&ds.mode_mgr_output);

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.mode_mgr.write() {
            warn!("Could not write ModeMgr archives: {}", e);
        }

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            info!(
                "{}: dist {:.2} m, bearing {:.3} rad",
                ds.mode_mgr.current_mode(),
                ds.mode_mgr_status_rpt.distance_to_target_m,
                ds.mode_mgr_status_rpt.bearing_to_target_rad
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}
