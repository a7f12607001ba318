//! # Simulation client
//!
//! A desktop stand-in for the drivetrain and shooter collaborators, allowing
//! the executable to run a full control loop without hardware. The model is
//! deliberately first-order: drive demands integrate kinematically against
//! capability limits, and the projectile sensor is driven by how long the
//! shooter channels have been intaking or feeding. Closed-loop motor
//! behaviour is not modelled.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Point2, Vector2};
use serde::Deserialize;

// Internal
use crate::mode_mgr::OutputData;
use util::maths;
use util::params;
use subsys_if::eqpt::drive::{DriveDem, Pose, PoseSnapshot};
use subsys_if::eqpt::shooter::AxisDem;
use subsys_if::field::Alliance;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulation client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimParams {
    /// Alliance the simulated robot plays on.
    pub alliance: Alliance,

    /// Initial pose as `[x_m, y_m, heading_rad]`.
    pub initial_pose: [f64; 3],

    /// Maximum translation speed.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Maximum yaw rate.
    ///
    /// Units: radians/second
    pub max_yaw_rate_rads: f64,

    /// Time of continuous intaking before a projectile is picked up.
    ///
    /// Units: seconds
    pub intake_pickup_s: f64,

    /// Time of continuous feeding before the projectile leaves the robot.
    ///
    /// Units: seconds
    pub feed_release_s: f64,

    /// True if the robot starts the run holding a projectile.
    pub start_with_object: bool,
}

/// The simulation client state.
pub struct SimClient {
    params: SimParams,

    cycle_period_s: f64,

    pose: Pose,
    velocity_ms: Vector2<f64>,

    object_detected: bool,
    intake_cycles: u32,
    feed_cycles: u32,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl SimClient {
    /// Initialise the simulation from the given parameter file.
    pub fn init(params_path: &str, cycle_period_s: f64) -> Result<Self, params::LoadError> {
        let params: SimParams = params::load(params_path)?;

        Ok(Self {
            pose: Pose {
                position_m: Point2::new(params.initial_pose[0], params.initial_pose[1]),
                heading_rad: params.initial_pose[2],
            },
            velocity_ms: Vector2::new(0.0, 0.0),
            object_detected: params.start_with_object,
            intake_cycles: 0,
            feed_cycles: 0,
            cycle_period_s,
            params,
        })
    }

    /// The current pose snapshot, as the drivetrain would report it.
    pub fn pose_snapshot(&self) -> PoseSnapshot {
        PoseSnapshot {
            pose: self.pose,
            velocity_ms: self.velocity_ms,
        }
    }

    /// The shooter's object-detection flag.
    pub fn object_detected(&self) -> bool {
        self.object_detected
    }

    /// The alliance the simulated robot plays on.
    pub fn alliance(&self) -> Alliance {
        self.params.alliance
    }

    /// Integrate one cycle of the demanded outputs.
    pub fn step(&mut self, output: &OutputData) {
        self.step_drive(&output.drive_dem);
        self.step_shooter(output);
    }

    fn step_drive(&mut self, dem: &DriveDem) {
        let dt = self.cycle_period_s;

        match *dem {
            DriveDem::FieldRelative { x, y, rot } => {
                self.velocity_ms = Vector2::new(
                    maths::clamp(x, -1.0, 1.0) * self.params.max_speed_ms,
                    maths::clamp(y, -1.0, 1.0) * self.params.max_speed_ms,
                );
                self.pose.heading_rad = maths::wrap_pi(
                    self.pose.heading_rad
                        + maths::clamp(rot, -1.0, 1.0) * self.params.max_yaw_rate_rads * dt,
                );
            }
            DriveDem::AtAngle { x, y, angle_rad } => {
                self.velocity_ms = Vector2::new(
                    maths::clamp(x, -1.0, 1.0) * self.params.max_speed_ms,
                    maths::clamp(y, -1.0, 1.0) * self.params.max_speed_ms,
                );

                // Slew the heading towards the demand at the yaw rate limit
                let err_rad = maths::ang_dist_pi(self.pose.heading_rad, angle_rad);
                let max_step_rad = self.params.max_yaw_rate_rads * dt;
                self.pose.heading_rad = maths::wrap_pi(
                    self.pose.heading_rad
                        + maths::clamp(err_rad, -max_step_rad, max_step_rad),
                );
            }
            DriveDem::Stop => {
                self.velocity_ms = Vector2::new(0.0, 0.0);
            }
        }

        self.pose.position_m += self.velocity_ms * dt;
    }

    fn step_shooter(&mut self, output: &OutputData) {
        let dems = &output.shooter_dems;

        let intaking = matches!(dems.shoot, AxisDem::OpenLoop(v) if v < 0.0)
            && matches!(dems.feed, AxisDem::OpenLoop(v) if v < 0.0);
        let ejecting = matches!(dems.shoot, AxisDem::OpenLoop(v) if v > 0.0)
            && matches!(dems.feed, AxisDem::OpenLoop(v) if v > 0.0);
        let feeding = matches!(dems.feed, AxisDem::OpenLoop(v) if v > 0.0) && !ejecting;

        if intaking && !self.object_detected {
            self.intake_cycles = self.intake_cycles.saturating_add(1);
            if (self.intake_cycles as f64) * self.cycle_period_s >= self.params.intake_pickup_s {
                self.object_detected = true;
                self.intake_cycles = 0;
            }
        } else {
            self.intake_cycles = 0;
        }

        if ejecting {
            self.object_detected = false;
        }

        if feeding && self.object_detected {
            self.feed_cycles = self.feed_cycles.saturating_add(1);
            if (self.feed_cycles as f64) * self.cycle_period_s >= self.params.feed_release_s {
                self.object_detected = false;
                self.feed_cycles = 0;
            }
        } else {
            self.feed_cycles = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mode_mgr::OutputData;
    use subsys_if::eqpt::shooter::ShooterDems;

    fn test_client() -> SimClient {
        SimClient {
            params: SimParams {
                alliance: Alliance::Blue,
                initial_pose: [0.0, 0.0, 0.0],
                max_speed_ms: 2.0,
                max_yaw_rate_rads: 1.0,
                intake_pickup_s: 0.1,
                feed_release_s: 0.1,
                start_with_object: false,
            },
            cycle_period_s: 0.02,
            pose: Pose {
                position_m: Point2::new(0.0, 0.0),
                heading_rad: 0.0,
            },
            velocity_ms: Vector2::new(0.0, 0.0),
            object_detected: false,
            intake_cycles: 0,
            feed_cycles: 0,
        }
    }

    #[test]
    fn test_drive_integration() {
        let mut sim = test_client();

        let output = OutputData {
            drive_dem: DriveDem::FieldRelative {
                x: 1.0,
                y: 0.0,
                rot: 0.0,
            },
            shooter_dems: ShooterDems::safe(),
        };

        for _ in 0..50 {
            sim.step(&output);
        }

        // 1 s at full stick and 2 m/s capability
        let snapshot = sim.pose_snapshot();
        assert!((snapshot.pose.position_m.x - 2.0).abs() < 1e-9);
        assert!((snapshot.velocity_ms.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_intake_pickup() {
        let mut sim = test_client();

        let output = OutputData {
            drive_dem: DriveDem::Stop,
            shooter_dems: ShooterDems {
                shoot: AxisDem::OpenLoop(-3.0),
                feed: AxisDem::OpenLoop(-3.0),
            },
        };

        // 0.1 s pickup at 20 ms cycles = 5 cycles
        for _ in 0..4 {
            sim.step(&output);
            assert!(!sim.object_detected());
        }
        sim.step(&output);
        assert!(sim.object_detected());
    }

    #[test]
    fn test_feed_release() {
        let mut sim = test_client();
        sim.object_detected = true;

        let output = OutputData {
            drive_dem: DriveDem::Stop,
            shooter_dems: ShooterDems {
                shoot: AxisDem::Velocity(150.0),
                feed: AxisDem::OpenLoop(12.0),
            },
        };

        for _ in 0..4 {
            sim.step(&output);
            assert!(sim.object_detected());
        }
        sim.step(&output);
        assert!(!sim.object_detected());
    }

    #[test]
    fn test_at_angle_slews_heading() {
        let mut sim = test_client();

        let output = OutputData {
            drive_dem: DriveDem::AtAngle {
                x: 0.0,
                y: 0.0,
                angle_rad: 0.5,
            },
            shooter_dems: ShooterDems::safe(),
        };

        sim.step(&output);

        // One cycle at the 1 rad/s yaw limit
        assert!((sim.pose_snapshot().pose.heading_rad - 0.02).abs() < 1e-9);

        for _ in 0..50 {
            sim.step(&output);
        }
        assert!((sim.pose_snapshot().pose.heading_rad - 0.5).abs() < 1e-9);
    }
}
