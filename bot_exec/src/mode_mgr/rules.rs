//! # Transition rule table
//!
//! Each transition of the state machine is declared as a [`Rule`]: a guard
//! over the cycle's inputs, the set of modes the rule may fire from, and the
//! mode it commits. All rules are rising-edge triggered - a rule fires only
//! on the cycle where its composite condition (mode in the from-set AND guard
//! true) goes from false to true.
//!
//! The table is evaluated in declaration order and the first rule presenting
//! a rising edge wins; at most one transition commits per cycle. The order
//! below therefore encodes the precedence between rules that can fire from
//! the same mode (losing the object outranks an eject request, which
//! outranks an aim change).
//!
//! Guards are total functions over [`GuardCtx`] - they cannot fail, block or
//! hold state of their own.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use subsys_if::eqpt::operator::ModeRequests;

use super::Mode;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// The inputs a guard may consult, snapshotted once per cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardCtx {
    /// Operator mode requests for this cycle.
    pub requests: ModeRequests,

    /// The shooter's object-detection flag (false if the sensor is
    /// unavailable).
    pub object_detected: bool,

    /// True if the latest aim solution is good enough to score on.
    pub aim_ready: bool,

    /// True if the score settle delay has elapsed.
    pub settle_elapsed: bool,
}

/// A single transition rule.
pub struct Rule {
    /// Name of the rule, used for logging and telemetry.
    pub name: &'static str,

    /// Modes this rule may fire from.
    pub from: &'static [Mode],

    /// Mode committed when the rule fires.
    pub to: Mode,

    /// Guard evaluated against the cycle's inputs.
    pub guard: fn(&GuardCtx) -> bool,
}

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of rules in the table.
pub const NUM_RULES: usize = 13;

/// The transition rule table, in evaluation order.
pub static RULES: [Rule; NUM_RULES] = [
    Rule {
        name: "intake_request",
        from: &[Mode::Idle],
        to: Mode::Intake,
        guard: intake_requested,
    },
    Rule {
        name: "object_acquired",
        from: &[Mode::Idle, Mode::Intake],
        to: Mode::Ready,
        guard: object_detected,
    },
    Rule {
        name: "intake_abort",
        from: &[Mode::Intake],
        to: Mode::Idle,
        guard: idle_requested,
    },
    Rule {
        name: "object_lost",
        from: &[
            Mode::Eject,
            Mode::Ready,
            Mode::AutoAimScore,
            Mode::ManualAimScore,
        ],
        to: Mode::Idle,
        guard: object_lost,
    },
    Rule {
        name: "eject_request",
        from: &[Mode::Ready, Mode::AutoAimScore, Mode::ManualAimScore],
        to: Mode::Eject,
        guard: idle_requested,
    },
    Rule {
        name: "auto_aim_request",
        from: &[Mode::Ready, Mode::ManualAimScore],
        to: Mode::AutoAimScore,
        guard: auto_aim_requested,
    },
    Rule {
        name: "manual_aim_request",
        from: &[Mode::Ready, Mode::AutoAimScore],
        to: Mode::ManualAimScore,
        guard: manual_aim_requested,
    },
    Rule {
        name: "auto_score_request",
        from: &[Mode::AutoAimScore],
        to: Mode::Score,
        guard: score_requested_and_aim_ready,
    },
    Rule {
        name: "manual_score_request",
        from: &[Mode::ManualAimScore],
        to: Mode::Score,
        guard: score_requested,
    },
    Rule {
        name: "score_settled",
        from: &[Mode::Score],
        to: Mode::Idle,
        guard: object_lost_settled,
    },
    Rule {
        name: "manual_request",
        from: &[
            Mode::Idle,
            Mode::Intake,
            Mode::Ready,
            Mode::Eject,
            Mode::AutoAimScore,
            Mode::ManualAimScore,
            Mode::Score,
        ],
        to: Mode::Manual,
        guard: manual_requested,
    },
    Rule {
        name: "manual_exit",
        from: &[Mode::Manual],
        to: Mode::Idle,
        guard: idle_requested,
    },
    Rule {
        name: "manual_ready",
        from: &[Mode::Manual],
        to: Mode::Ready,
        guard: ready_requested,
    },
];

// ------------------------------------------------------------------------------------------------
// GUARDS
// ------------------------------------------------------------------------------------------------

fn intake_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.intake
}

fn idle_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.idle
}

fn ready_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.ready
}

fn auto_aim_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.auto_aim_score
}

fn manual_aim_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.manual_aim_score
}

fn manual_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.manual
}

fn score_requested(ctx: &GuardCtx) -> bool {
    ctx.requests.score
}

fn score_requested_and_aim_ready(ctx: &GuardCtx) -> bool {
    ctx.requests.score && ctx.aim_ready
}

fn object_detected(ctx: &GuardCtx) -> bool {
    ctx.object_detected
}

fn object_lost(ctx: &GuardCtx) -> bool {
    !ctx.object_detected
}

fn object_lost_settled(ctx: &GuardCtx) -> bool {
    !ctx.object_detected && ctx.settle_elapsed
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
