//! Implementations for the ModeMgr state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::info;
use serde::Serialize;

// Internal
use super::{GuardCtx, Mode, ModeMgrError, Params, Rule, NUM_RULES, RULES};
use crate::aim::{AimParams, AimPredictor, AimSolution};
use util::archive::{ArchiveError, Archived, Archiver};
use util::maths;
use util::module::State;
use util::params;
use util::session::Session;
use subsys_if::eqpt::drive::{DriveDem, PoseSnapshot};
use subsys_if::eqpt::operator::OperatorInput;
use subsys_if::eqpt::shooter::{AxisDem, ShooterDems};
use subsys_if::field::Alliance;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Mode manager module state.
///
/// All of the machine's memory lives here: the latched mode, the per-rule
/// edge memory, the score settle timer and the latest aim solution. The
/// struct is owned by the control-loop thread and stepped exactly once per
/// cycle - nothing in it is shared.
#[derive(Default)]
pub struct ModeMgr {
    pub(crate) params: Params,

    /// The aim engine, invoked whenever the latched mode needs a solution.
    predictor: AimPredictor,

    /// The latched operating mode.
    mode: Mode,

    /// The mode before the most recent transition.
    prev_mode: Mode,

    /// Per-rule composite condition memory for rising edge detection.
    ///
    /// Updated for every rule on every cycle, including disabled ones, so a
    /// request held across a disable does not present a fresh edge on
    /// re-enable.
    edge_memory: [bool; NUM_RULES],

    /// Number of cycles the settle delay corresponds to, fixed at init.
    settle_limit_cycles: u32,

    /// Consecutive cycles spent in the score mode without a detected object.
    settle_cycles: u32,

    /// The aim solution of the current cycle, `None` outside the auto-aim
    /// mode.
    aim: Option<AimSolution>,

    /// Shoot channel demand emitted on the previous cycle.
    last_shoot_dem: AxisDem,

    /// Shoot channel demand latched on entering the score mode.
    score_shoot_dem: AxisDem,

    /// Cycles processed since init.
    cycles: u64,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to the mode manager.
///
/// A snapshot of every external signal the machine consumes, taken at the
/// start of the cycle and immutable for its duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputData {
    /// Platform enable flag. While false the machine holds the safe posture.
    pub enabled: bool,

    /// Operator input snapshot.
    pub operator: OperatorInput,

    /// The shooter's object-detection flag. A caller with an unavailable
    /// sensor must pass false, not fail.
    pub object_detected: bool,

    /// Drivetrain pose snapshot, `None` if pose data is unavailable.
    pub pose: Option<PoseSnapshot>,

    /// The alliance the robot is playing on.
    pub alliance: Alliance,
}

/// Output demands from the mode manager for this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputData {
    /// Demand for the drivetrain.
    pub drive_dem: DriveDem,

    /// Demands for the shooter channels.
    pub shooter_dems: ShooterDems,
}

/// Status report for ModeMgr processing.
///
/// Kept flat (scalars, strings and unit enum variants only) so it can go
/// straight into the CSV archive.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Cycle count since init.
    pub cycle: u64,

    /// Mode after this cycle's transition evaluation.
    pub mode: Mode,

    /// Mode before the most recent transition.
    pub prev_mode: Mode,

    /// True if a transition committed this cycle.
    pub transitioned: bool,

    /// Name of the rule that fired this cycle, empty otherwise.
    pub rule: &'static str,

    /// Range to the mirrored target from the current pose, NaN if the pose
    /// is unavailable.
    ///
    /// Units: meters
    pub distance_to_target_m: f64,

    /// Field-relative bearing to the mirrored target, NaN if the pose is
    /// unavailable.
    ///
    /// Units: radians
    pub bearing_to_target_rad: f64,

    /// Aim solution heading demand, NaN outside the auto-aim mode.
    ///
    /// Units: radians
    pub target_angle_rad: f64,

    /// Aim solution launch wheel velocity demand, NaN outside the auto-aim
    /// mode.
    ///
    /// Units: radians/second
    pub target_velocity_rads: f64,

    /// Aim solution time of flight estimate, NaN outside the auto-aim mode.
    ///
    /// Units: seconds
    pub time_of_flight_s: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Default for OutputData {
    fn default() -> Self {
        OutputData {
            drive_dem: DriveDem::Stop,
            shooter_dems: ShooterDems::safe(),
        }
    }
}

impl Default for StatusReport {
    fn default() -> Self {
        StatusReport {
            cycle: 0,
            mode: Mode::Idle,
            prev_mode: Mode::Idle,
            transitioned: false,
            rule: "",
            distance_to_target_m: std::f64::NAN,
            bearing_to_target_rad: std::f64::NAN,
            target_angle_rad: std::f64::NAN,
            target_velocity_rads: std::f64::NAN,
            time_of_flight_s: std::f64::NAN,
        }
    }
}

impl State for ModeMgr {
    /// Paths of the mode manager and aim parameter files, plus the control
    /// cycle period in seconds.
    type InitData = (&'static str, &'static str, f64);
    type InitError = ModeMgrError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ModeMgrError;

    /// Initialise the ModeMgr module.
    ///
    /// Any error here is a configuration error - the caller must not enter
    /// the main loop with a partially initialised machine.
    fn init(
        &mut self,
        (params_path, aim_params_path, cycle_period_s): Self::InitData,
        session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(params_path).map_err(ModeMgrError::ParamLoadError)?;
        let aim_params: AimParams =
            params::load(aim_params_path).map_err(ModeMgrError::ParamLoadError)?;

        self.configure(params, aim_params, cycle_period_s)?;

        // Create the arch folder for the mode manager
        let mut arch_path = session.arch_root.clone();
        arch_path.push("mode_mgr");
        std::fs::create_dir_all(arch_path)
            .map_err(|e| ModeMgrError::ArchiveInitError(ArchiveError::FileCreateError(e)))?;

        self.arch_report = Archiver::from_path(session, "mode_mgr/status_report.csv")
            .map_err(ModeMgrError::ArchiveInitError)?;

        Ok(())
    }

    /// Perform cyclic processing of the mode manager.
    ///
    /// The processing order within a cycle is fixed:
    ///  1. advance the score settle timer,
    ///  2. evaluate every rule's composite condition against the cycle's
    ///     entry mode and detect rising edges,
    ///  3. commit the first rule (in declaration order) presenting a rising
    ///     edge - at most one transition per cycle,
    ///  4. recompute the aim solution if the latched mode needs one,
    ///  5. synthesise the level-triggered drive and shooter demands from the
    ///     latched mode.
    ///
    /// This function never fails at run time: missing sensors degrade to
    /// safe defaults and guards are total.
    fn proc(
        &mut self,
        input: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.cycles += 1;

        let entry_mode = self.mode;

        // A disabled platform overrides everything: force the safe posture
        // and return. The edge memory is still updated (against the forced
        // idle mode) so held requests do not fire on the re-enable cycle.
        if !input.enabled {
            return Ok(self.proc_disabled(input, entry_mode));
        }

        // Score settle timer. Counts consecutive cycles in score without a
        // detection; any detection, or leaving score, resets it.
        if entry_mode == Mode::Score && !input.object_detected {
            self.settle_cycles = self.settle_cycles.saturating_add(1);
        } else {
            self.settle_cycles = 0;
        }

        let ctx = GuardCtx {
            requests: input.operator.requests,
            object_detected: input.object_detected,
            aim_ready: self.aim_ready(input),
            settle_elapsed: self.settle_cycles >= self.settle_limit_cycles,
        };

        // Evaluate all composites against the entry mode so the transition
        // is atomic within the cycle, then commit the first rising edge.
        let mut fired: Option<&Rule> = None;
        for (i, rule) in RULES.iter().enumerate() {
            let active = rule.from.contains(&entry_mode) && (rule.guard)(&ctx);

            if active && !self.edge_memory[i] && fired.is_none() {
                fired = Some(rule);
            }

            self.edge_memory[i] = active;
        }

        if let Some(rule) = fired {
            // Entering score latches the previous cycle's shoot demand, so
            // an auto-aimed launch wheel keeps its speed while feeding.
            if rule.to == Mode::Score {
                self.score_shoot_dem = self.last_shoot_dem;
            }

            self.prev_mode = entry_mode;
            self.mode = rule.to;

            info!(
                "Mode change: {} -> {} ({})",
                entry_mode, self.mode, rule.name
            );
        }

        // The aim solution exists only while auto-aiming, and is recomputed
        // every cycle it does.
        self.aim = match self.mode {
            Mode::AutoAimScore => {
                Some(self.predictor.solve(input.pose.as_ref(), input.alliance))
            }
            _ => None,
        };

        let output = OutputData {
            drive_dem: self.drive_dem(&input.operator),
            shooter_dems: self.shooter_dems(&input.operator),
        };
        self.last_shoot_dem = output.shooter_dems.shoot;

        self.build_report(input, fired.is_some(), fired.map(|r| r.name).unwrap_or(""));

        Ok((output, self.report))
    }
}

impl Archived for ModeMgr {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl ModeMgr {
    /// The latched operating mode, exposed for telemetry.
    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    /// The mode before the most recent transition, exposed for telemetry.
    pub fn previous_mode(&self) -> Mode {
        self.prev_mode
    }

    /// The aim solution of the current cycle, `None` outside the auto-aim
    /// mode.
    pub fn aim_solution(&self) -> Option<AimSolution> {
        self.aim
    }

    /// Apply a parameter set, building the aim engine and sizing the settle
    /// timer.
    fn configure(
        &mut self,
        params: Params,
        aim_params: AimParams,
        cycle_period_s: f64,
    ) -> Result<(), ModeMgrError> {
        if !(cycle_period_s > 0.0) || params.settle_delay_s < 0.0 {
            return Err(ModeMgrError::InvalidSettleDelay(
                params.settle_delay_s,
                cycle_period_s,
            ));
        }

        self.settle_limit_cycles = (params.settle_delay_s / cycle_period_s).round() as u32;
        self.predictor = AimPredictor::new(aim_params).map_err(ModeMgrError::ShotTableError)?;
        self.params = params;

        Ok(())
    }

    /// Process a disabled cycle: force idle, emit the safe posture and track
    /// guard levels against the forced mode.
    fn proc_disabled(&mut self, input: &InputData, entry_mode: Mode) -> (OutputData, StatusReport) {
        if entry_mode != Mode::Idle {
            info!("Platform disabled, forcing {} -> Mode::Idle", entry_mode);
            self.prev_mode = entry_mode;
        }

        self.mode = Mode::Idle;
        self.aim = None;
        self.settle_cycles = 0;
        self.last_shoot_dem = AxisDem::Off;

        let ctx = GuardCtx {
            requests: input.operator.requests,
            object_detected: input.object_detected,
            aim_ready: false,
            settle_elapsed: false,
        };

        for (i, rule) in RULES.iter().enumerate() {
            self.edge_memory[i] = rule.from.contains(&Mode::Idle) && (rule.guard)(&ctx);
        }

        self.build_report(input, false, "");

        (OutputData::default(), self.report)
    }

    /// Aim readiness predicate for the auto-score gate.
    ///
    /// Ready means: a solution exists, the robot's heading is within the
    /// bearing tolerance of it, and its range lies within the calibrated
    /// span of the shot table.
    fn aim_ready(&self, input: &InputData) -> bool {
        let solution = match self.aim {
            Some(s) => s,
            None => return false,
        };

        let heading_rad = match input.pose {
            Some(snapshot) => snapshot.pose.heading_rad,
            None => return false,
        };

        let in_span = match self.predictor.table().span() {
            Some((min_m, max_m)) => {
                solution.distance_m >= min_m && solution.distance_m <= max_m
            }
            None => false,
        };

        let bearing_err_rad = maths::ang_dist_pi(heading_rad, solution.target_angle_rad);

        in_span && bearing_err_rad.abs() <= self.params.aim_tol_rad
    }

    /// Level-triggered drivetrain demand for the latched mode.
    fn drive_dem(&self, op: &OperatorInput) -> DriveDem {
        match (self.mode, self.aim) {
            (Mode::AutoAimScore, Some(solution)) => DriveDem::AtAngle {
                x: op.translate_x,
                y: op.translate_y,
                angle_rad: solution.target_angle_rad,
            },
            _ => DriveDem::FieldRelative {
                x: op.translate_x,
                y: op.translate_y,
                rot: op.rotate,
            },
        }
    }

    /// Level-triggered shooter demands for the latched mode.
    fn shooter_dems(&self, op: &OperatorInput) -> ShooterDems {
        let p = &self.params;

        match self.mode {
            Mode::Idle | Mode::Ready => ShooterDems::safe(),

            Mode::Intake => ShooterDems {
                shoot: AxisDem::OpenLoop(-p.intake_volts),
                feed: AxisDem::OpenLoop(-p.intake_volts),
            },

            Mode::Eject => ShooterDems {
                shoot: AxisDem::OpenLoop(p.eject_volts),
                feed: AxisDem::OpenLoop(p.eject_volts),
            },

            Mode::AutoAimScore => ShooterDems {
                shoot: match self.aim {
                    Some(solution) => AxisDem::Velocity(solution.target_velocity_rads),
                    None => AxisDem::Off,
                },
                feed: AxisDem::Off,
            },

            Mode::ManualAimScore => ShooterDems {
                shoot: match op.aim_held {
                    true => AxisDem::Velocity(p.manual_shoot_velocity_rads),
                    false => AxisDem::Off,
                },
                feed: AxisDem::Off,
            },

            Mode::Score => ShooterDems {
                shoot: self.score_shoot_dem,
                feed: AxisDem::OpenLoop(p.feed_volts),
            },

            // Direct drive: intaking claims both channels, otherwise the
            // feed and shoot helds are independent and release immediately.
            Mode::Manual => {
                if op.intake_held {
                    ShooterDems {
                        shoot: AxisDem::OpenLoop(-p.intake_volts),
                        feed: AxisDem::OpenLoop(-p.intake_volts),
                    }
                } else {
                    ShooterDems {
                        shoot: match op.shoot_held {
                            true => AxisDem::Velocity(p.manual_shoot_velocity_rads),
                            false => AxisDem::Off,
                        },
                        feed: match op.feed_held {
                            true => AxisDem::OpenLoop(p.feed_volts),
                            false => AxisDem::Off,
                        },
                    }
                }
            }
        }
    }

    /// Assemble the cycle's status report.
    fn build_report(&mut self, input: &InputData, transitioned: bool, rule: &'static str) {
        let mut report = StatusReport {
            cycle: self.cycles,
            mode: self.mode,
            prev_mode: self.prev_mode,
            transitioned,
            rule,
            ..StatusReport::default()
        };

        if let Some(snapshot) = input.pose {
            let (distance_m, bearing_rad) = self
                .predictor
                .distance_bearing(&snapshot.pose, input.alliance);
            report.distance_to_target_m = distance_m;
            report.bearing_to_target_rad = bearing_rad;
        }

        if let Some(solution) = self.aim {
            report.target_angle_rad = solution.target_angle_rad;
            report.target_velocity_rads = solution.target_velocity_rads;
            report.time_of_flight_s = solution.time_of_flight_s;
        }

        self.report = report;
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::aim::CalibPoint;
    use nalgebra::{Point2, Vector2};
    use subsys_if::eqpt::drive::Pose;

    /// 20 ms cycle, 0.5 s settle delay -> 25 cycles
    const CYCLE_PERIOD_S: f64 = 0.02;

    fn test_mgr() -> ModeMgr {
        let params = Params {
            settle_delay_s: 0.5,
            aim_tol_rad: 0.1,
            intake_volts: 3.0,
            eject_volts: 3.0,
            feed_volts: 12.0,
            manual_shoot_velocity_rads: 500.0,
        };

        let aim_params = AimParams {
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
        };

        let mut mgr = ModeMgr::default();
        mgr.configure(params, aim_params, CYCLE_PERIOD_S).unwrap();
        mgr
    }

    /// Place the machine directly into a mode with clean edge memory, as if
    /// it had been there for a while with no conditions active.
    fn force_mode(mgr: &mut ModeMgr, mode: Mode) {
        mgr.mode = mode;
        mgr.edge_memory = [false; NUM_RULES];
    }

    fn enabled_input() -> InputData {
        InputData {
            enabled: true,
            ..InputData::default()
        }
    }

    /// A pose 3 m short of the target along the field X axis, heading at it.
    fn aligned_pose() -> PoseSnapshot {
        PoseSnapshot {
            pose: Pose {
                position_m: Point2::new(0.0, 4.0),
                heading_rad: 0.0,
            },
            velocity_ms: Vector2::new(0.0, 0.0),
        }
    }

    fn proc(mgr: &mut ModeMgr, input: &InputData) -> (OutputData, StatusReport) {
        mgr.proc(input).unwrap()
    }

    #[test]
    fn test_intake_rising_edge() {
        let mut mgr = test_mgr();

        let mut input = enabled_input();
        input.operator.requests.intake = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Intake);
        assert!(report.transitioned);
        assert_eq!(report.rule, "intake_request");

        // Holding the request must not re-trigger anything
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Intake);
        assert!(!report.transitioned);
    }

    #[test]
    fn test_intake_demands() {
        let mut mgr = test_mgr();

        let mut input = enabled_input();
        input.operator.requests.intake = true;

        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::OpenLoop(-3.0));
        assert_eq!(output.shooter_dems.feed, AxisDem::OpenLoop(-3.0));
    }

    #[test]
    fn test_single_transition_per_cycle() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Ready);

        // Both the eject rule (idle request) and the manual rule (manual
        // request) present rising edges this cycle; the eject rule is
        // declared first and must be the only one committed.
        let mut input = enabled_input();
        input.object_detected = true;
        input.operator.requests.idle = true;
        input.operator.requests.manual = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Eject);
        assert_eq!(report.rule, "eject_request");

        // The losing rule's level was recorded, so it must not fire from the
        // new mode on the next cycle either
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Eject);
        assert!(!report.transitioned);
    }

    #[test]
    fn test_object_acquired_from_idle_and_intake() {
        let mut mgr = test_mgr();

        let mut input = enabled_input();
        input.object_detected = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Ready);

        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Intake);

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Ready);
        assert_eq!(report.prev_mode, Mode::Intake);
    }

    #[test]
    fn test_detection_loss_returns_to_idle() {
        for mode in [
            Mode::Eject,
            Mode::Ready,
            Mode::AutoAimScore,
            Mode::ManualAimScore,
        ]
        .iter()
        {
            let mut mgr = test_mgr();
            force_mode(&mut mgr, *mode);

            let mut input = enabled_input();
            input.object_detected = false;
            input.pose = Some(aligned_pose());

            let (_, report) = proc(&mut mgr, &input);
            assert_eq!(report.mode, Mode::Idle, "from {}", mode);
            assert_eq!(report.rule, "object_lost");
        }
    }

    #[test]
    fn test_score_settle_delay() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Score);

        let mut input = enabled_input();
        input.object_detected = false;

        // 24 undetected cycles: the pending transition must not commit
        for _ in 0..24 {
            let (_, report) = proc(&mut mgr, &input);
            assert_eq!(report.mode, Mode::Score);
        }

        // The 25th completes the 0.5 s settle delay
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(report.rule, "score_settled");
    }

    #[test]
    fn test_score_settle_cancelled_by_redetection() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Score);

        let mut undetected = enabled_input();
        undetected.object_detected = false;

        let mut detected = enabled_input();
        detected.object_detected = true;

        for _ in 0..10 {
            proc(&mut mgr, &undetected);
        }

        // The object is seen again, resetting the pending timer
        proc(&mut mgr, &detected);

        for _ in 0..24 {
            let (_, report) = proc(&mut mgr, &undetected);
            assert_eq!(report.mode, Mode::Score);
        }

        let (_, report) = proc(&mut mgr, &undetected);
        assert_eq!(report.mode, Mode::Idle);
    }

    #[test]
    fn test_disable_forces_idle() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::AutoAimScore);

        let mut input = enabled_input();
        input.enabled = false;
        input.object_detected = true;
        input.operator.requests.intake = true;

        let (output, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Idle);
        assert_eq!(output.drive_dem, DriveDem::Stop);
        assert_eq!(output.shooter_dems, ShooterDems::safe());

        // Re-enabling with the request and the detection level still held
        // must not present rising edges - the robot stays idle
        input.enabled = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Idle);
        assert!(!report.transitioned);

        // Releasing the signals for a cycle and pressing the request again
        // is a fresh edge
        input.operator.requests.intake = false;
        input.object_detected = false;
        proc(&mut mgr, &input);

        input.operator.requests.intake = true;
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Intake);
    }

    #[test]
    fn test_auto_aim_outputs() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::AutoAimScore);

        let mut input = enabled_input();
        input.object_detected = true;
        input.pose = Some(aligned_pose());
        input.operator.translate_x = 0.3;

        let (output, report) = proc(&mut mgr, &input);

        // Range 3 m is the table midpoint: 150 rad/s
        assert_eq!(output.shooter_dems.shoot, AxisDem::Velocity(150.0));
        assert_eq!(output.shooter_dems.feed, AxisDem::Off);

        match output.drive_dem {
            DriveDem::AtAngle { x, angle_rad, .. } => {
                assert_eq!(x, 0.3);
                assert!(angle_rad.abs() < 1e-9);
            }
            other => panic!("expected AtAngle, got {:?}", other),
        }

        assert!((report.distance_to_target_m - 3.0).abs() < 1e-9);
        assert!((report.target_velocity_rads - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_score_gated_on_aim_readiness() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::AutoAimScore);

        // Misaligned: heading is well outside the bearing tolerance
        let mut input = enabled_input();
        input.object_detected = true;
        input.pose = Some(PoseSnapshot {
            pose: Pose {
                position_m: Point2::new(0.0, 4.0),
                heading_rad: 1.0,
            },
            velocity_ms: Vector2::new(0.0, 0.0),
        });
        input.operator.requests.score = true;

        proc(&mut mgr, &input);
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::AutoAimScore, "misaligned, no score");

        // Aligned: the gate opens and the held request edges on the guard
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::AutoAimScore);

        let mut input = enabled_input();
        input.object_detected = true;
        input.pose = Some(aligned_pose());
        input.operator.requests.score = true;

        // First cycle computes the solution the gate consumes
        proc(&mut mgr, &input);
        let (output, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Score);
        assert_eq!(report.rule, "auto_score_request");

        // The launch wheel demand is latched from the aiming cycle while the
        // feed pushes the projectile
        assert_eq!(output.shooter_dems.shoot, AxisDem::Velocity(150.0));
        assert_eq!(output.shooter_dems.feed, AxisDem::OpenLoop(12.0));
    }

    #[test]
    fn test_manual_aim_spin_on_hold() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::ManualAimScore);

        let mut input = enabled_input();
        input.object_detected = true;

        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::Off);

        input.operator.aim_held = true;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::Velocity(500.0));

        input.operator.aim_held = false;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::Off);
    }

    #[test]
    fn test_manual_direct_drive() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Manual);

        let mut input = enabled_input();

        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems, ShooterDems::safe());

        input.operator.feed_held = true;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.feed, AxisDem::OpenLoop(12.0));
        assert_eq!(output.shooter_dems.shoot, AxisDem::Off);

        input.operator.shoot_held = true;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::Velocity(500.0));

        // Intaking claims both channels regardless of the other helds
        input.operator.intake_held = true;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems.shoot, AxisDem::OpenLoop(-3.0));
        assert_eq!(output.shooter_dems.feed, AxisDem::OpenLoop(-3.0));

        // Releasing everything stops both channels immediately
        input.operator.feed_held = false;
        input.operator.shoot_held = false;
        input.operator.intake_held = false;
        let (output, _) = proc(&mut mgr, &input);
        assert_eq!(output.shooter_dems, ShooterDems::safe());
    }

    #[test]
    fn test_manual_entry_and_exit() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::Eject);

        let mut input = enabled_input();
        input.object_detected = true;
        input.operator.requests.manual = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Manual);

        input.operator.requests.manual = false;
        input.operator.requests.ready = true;

        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Ready);
        assert_eq!(report.rule, "manual_ready");
    }

    #[test]
    fn test_aim_solution_lifetime() {
        let mut mgr = test_mgr();
        force_mode(&mut mgr, Mode::AutoAimScore);

        let mut input = enabled_input();
        input.object_detected = true;
        input.pose = Some(aligned_pose());

        proc(&mut mgr, &input);
        assert!(mgr.aim_solution().is_some());

        // Losing the object drops back to idle and the solution with it
        input.object_detected = false;
        let (_, report) = proc(&mut mgr, &input);
        assert_eq!(report.mode, Mode::Idle);
        assert!(mgr.aim_solution().is_none());
    }

    #[test]
    fn test_configure_rejects_bad_settle() {
        let params = Params {
            settle_delay_s: -1.0,
            ..Params::default()
        };

        let mut mgr = ModeMgr::default();
        assert!(matches!(
            mgr.configure(params, AimParams::default(), CYCLE_PERIOD_S),
            Err(ModeMgrError::InvalidSettleDelay(_, _))
        ));
    }
}
