//! Physics and tuning constants for the match simulation
//!
//! All distances are world units, all times are seconds. The per-tick factors
//! (friction, drag, knockdown damping) assume the fixed 60 Hz step in
//! [`timestep`].

// ============================================================
// Timestep
// ============================================================
pub mod timestep {
    /// Fixed simulation step (60 ticks per second)
    pub const FIXED_DT: f32 = 1.0 / 60.0;

    /// Upper bound on steps run for a single `advance` call (spiral-of-death guard)
    pub const MAX_STEPS_PER_ADVANCE: u32 = 8;

    /// Simulated match length in minutes
    pub const MATCH_MINUTES: f32 = 90.0;
}

// ============================================================
// Field geometry
// ============================================================
pub mod field {
    /// Distance from the stadium edge to the touch/goal lines
    pub const STADIUM_MARGIN: f32 = 250.0;
    /// Goal line to goal line
    pub const FIELD_WIDTH: f32 = 2800.0;
    /// Sideline to sideline
    pub const FIELD_HEIGHT: f32 = 1800.0;

    /// Goal mouth width (Y span, centered on the field)
    pub const GOAL_WIDTH: f32 = 260.0;
    /// How far the net extends behind the goal line
    pub const GOAL_DEPTH: f32 = 120.0;
    /// Crossbar height above ground
    pub const CROSSBAR_HEIGHT: f32 = 90.0;

    pub const PENALTY_AREA_DEPTH: f32 = 420.0;
    pub const PENALTY_AREA_HEIGHT: f32 = 900.0;
    pub const SIX_YARD_DEPTH: f32 = 140.0;
    pub const SIX_YARD_HEIGHT: f32 = 440.0;

    /// Players may stand this far outside the lines
    pub const PLAYER_OUTSIDE_ALLOWANCE: f32 = 100.0;
    /// Extra room behind the goal line inside the goal mouth (net entry)
    pub const PLAYER_NET_ALLOWANCE: f32 = GOAL_DEPTH + 20.0;

    /// Ball must be this far past a sideline before a throw-in is called
    pub const SIDELINE_OUT_TOLERANCE: f32 = 50.0;

    pub const CENTER_X: f32 = STADIUM_MARGIN + FIELD_WIDTH / 2.0;
    pub const CENTER_Y: f32 = STADIUM_MARGIN + FIELD_HEIGHT / 2.0;
    pub const LEFT_GOAL_LINE: f32 = STADIUM_MARGIN;
    pub const RIGHT_GOAL_LINE: f32 = STADIUM_MARGIN + FIELD_WIDTH;
    pub const TOP_SIDELINE: f32 = STADIUM_MARGIN;
    pub const BOTTOM_SIDELINE: f32 = STADIUM_MARGIN + FIELD_HEIGHT;
    pub const GOAL_TOP: f32 = CENTER_Y - GOAL_WIDTH / 2.0;
    pub const GOAL_BOTTOM: f32 = CENTER_Y + GOAL_WIDTH / 2.0;
}

// ============================================================
// Ball
// ============================================================
pub mod ball {
    pub const RADIUS: f32 = 10.0;
    pub const GRAVITY: f32 = 980.0;

    /// Vertical speed above which a landing bounces
    pub const BOUNCE_MIN_SPEED: f32 = 50.0;
    /// Restitution on ground contact
    pub const GROUND_BOUNCE: f32 = 0.6;

    /// Horizontal friction per tick while grounded
    pub const GROUND_FRICTION: f32 = 0.95;
    /// Horizontal drag per tick while airborne
    pub const AIR_DRAG: f32 = 0.99;
    /// Velocities below this snap to zero
    pub const STOP_SPEED: f32 = 1.0;

    /// Height below which the ball counts as grounded for kicks and nudges
    pub const GROUNDED_HEIGHT: f32 = 5.0;
}

// ============================================================
// Goal frame collisions
// ============================================================
pub mod goal_frame {
    /// Back-of-net bounce factors
    pub const NET_BOUNCE_X: f32 = 0.3;
    pub const NET_BOUNCE_Y: f32 = 0.8;

    /// Distance from the goal line at which the frame is hit
    pub const FRAME_X_TOLERANCE: f32 = 15.0;
    /// Vertical band around the crossbar
    pub const CROSSBAR_TOLERANCE: f32 = 8.0;
    /// Distance from a goal edge that counts as the post
    pub const POST_TOLERANCE: f32 = 10.0;

    pub const CROSSBAR_BOUNCE_Z: f32 = 0.6;
    pub const CROSSBAR_BOUNCE_X: f32 = 0.7;
    pub const POST_BOUNCE_XY: f32 = 0.7;
    pub const POST_DAMP_Z: f32 = 0.6;
}

// ============================================================
// Players
// ============================================================
pub mod player {
    pub const RADIUS: f32 = 20.0;

    /// Base speed = BASE_SPEED + SPEED_PER_POINT × speed stat
    pub const BASE_SPEED: f32 = 220.0;
    pub const SPEED_PER_POINT: f32 = 1.8;

    pub const KICK_RADIUS: f32 = 40.0;
    pub const POSSESSION_RADIUS: f32 = 45.0;
    pub const KICK_COOLDOWN: f32 = 0.3;
    /// dot(travel, to_ball) must exceed this for an auto-kick
    pub const KICK_CONE_DOT: f32 = -0.95;
    /// Minimum speed that counts as "moving"
    pub const MOVING_SPEED: f32 = 10.0;

    /// Human shot charging
    pub const MAX_CHARGE_SECS: f32 = 0.8;
    pub const HUMAN_SHOT_POWER: f32 = 900.0;
    pub const HUMAN_SHOT_LIFT: f32 = 420.0;
    /// Human dribble touch = current speed × factor
    pub const HUMAN_TOUCH_FACTOR: f32 = 1.4;
    /// Charging is only possible this close to the ball
    pub const CHARGE_RADIUS: f32 = 60.0;

    /// AI auto-kick
    pub const AI_KICK_POWER: f32 = 1100.0;
    pub const AI_DRIBBLE_TOUCH: f32 = 0.35;

    pub const TACKLE_RANGE: f32 = 65.0;
    pub const TACKLE_POKE_POWER: f32 = 420.0;

    /// Stamina
    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_DECAY_PER_SEC: f32 = 2.0;
    pub const STAMINA_RECOVERY_PER_SEC: f32 = 3.0;
    pub const STAMINA_KICK_COST: f32 = 1.5;
    pub const STAMINA_TACKLE_COST: f32 = 2.5;
}

// ============================================================
// Player-player and player-ball contact
// ============================================================
pub mod contact {
    pub const COLLISION_DISTANCE: f32 = 70.0;

    /// Same-team bumps only knock down this often
    pub const SAME_TEAM_KNOCKDOWN_CHANCE: f64 = 0.02;
    /// Impacting player must be faster than this
    pub const KNOCKDOWN_MIN_SPEED: f32 = 50.0;
    /// Contests near the ball are more violent
    pub const BALL_PROXIMITY_RADIUS: f32 = 150.0;
    pub const BALL_PROXIMITY_BOOST: f32 = 1.5;
    /// impact × boost × roll must exceed this
    pub const KNOCKDOWN_THRESHOLD: f32 = 60.0;

    pub const KNOCKDOWN_MIN_SECS: f32 = 0.5;
    pub const KNOCKDOWN_MAX_SECS: f32 = 1.5;
    /// Fraction of the impacting velocity transferred to the fallen player
    pub const KNOCKDOWN_VELOCITY_SHARE: f32 = 0.5;
    /// Slide damping per tick
    pub const KNOCKDOWN_DAMPING: f32 = 0.9;

    /// Overlap share pushed apart per tick
    pub const SEPARATION_SHARE: f32 = 0.5;

    /// Incidental ball contact
    pub const NUDGE_RADIUS: f32 = 32.0;
    pub const NUDGE_MAX_PUSH: f32 = 260.0;
    pub const NUDGE_BALL_SPEED_LIMIT: f32 = 300.0;

    /// Post-restart suppression window
    pub const RESTART_GRACE_SECS: f32 = 0.3;
}

// ============================================================
// Restarts (throw-in, corner, goal kick)
// ============================================================
pub mod restart {
    pub const AIM_TURN_RATE: f32 = 2.0;
    pub const CHARGE_RATE: f32 = 1.0;

    /// Human throw-in wind-up before release
    pub const THROW_WINDUP_SECS: f32 = 0.3;
    /// Corner run-up start offset and speed
    pub const CORNER_RUNUP_DISTANCE: f32 = 60.0;
    pub const CORNER_RUNUP_SPEED: f32 = 260.0;

    pub const THROW_MIN_POWER: f32 = 200.0;
    pub const THROW_MAX_POWER: f32 = 500.0;
    pub const THROW_LIFT: f32 = 160.0;

    pub const CORNER_MIN_POWER: f32 = 500.0;
    pub const CORNER_MAX_POWER: f32 = 2400.0;
    pub const CORNER_LIFT: f32 = 460.0;

    /// Goal kick power = factor × taker base speed
    pub const GOAL_KICK_SPEED_FACTOR: f32 = 3.0;
    pub const GOAL_KICK_CHARGE: f32 = 0.6;
    pub const GOAL_KICK_LIFT: f32 = 380.0;

    /// AI executes once the restart timer falls below these
    pub const AI_THROW_THRESHOLD: f32 = 2.0;
    pub const AI_CORNER_THRESHOLD: f32 = 2.0;
    pub const AI_GOAL_KICK_THRESHOLD: f32 = 0.5;

    /// Throw-in receiver scoring
    pub const THROW_MAX_DISTANCE: f32 = 600.0;
    pub const THROW_PROGRESS_WEIGHT: f32 = 0.5;
    pub const THROW_CROWD_RADIUS: f32 = 150.0;
    pub const THROW_CROWD_PENALTY: f32 = 80.0;
    pub const THROW_SIDELINE_MARGIN: f32 = 100.0;
    pub const THROW_SIDELINE_PENALTY: f32 = 100.0;
    pub const THROW_DISTANCE_WEIGHT: f32 = 0.1;

    /// How far the taker stands from the placed ball
    pub const TAKER_OFFSET: f32 = 25.0;
    pub const PLACEMENT_INSET: f32 = 15.0;
}

// ============================================================
// AI perception and behavior
// ============================================================
pub mod ai {
    pub const PASS_BLOCK_RADIUS: f32 = 60.0;
    pub const PASS_SCORE_BASE: f32 = 1000.0;
    pub const PASS_BLOCKED_PENALTY: f32 = 5000.0;
    pub const HALF_HYSTERESIS: f32 = 100.0;

    pub const KICKOFF_WINDOW_SECS: f32 = 3.0;

    /// Ball weight in the home/ball blend falls off over this distance
    pub const BLEND_RANGE: f32 = 1400.0;
    pub const DEAD_ZONE: f32 = 15.0;
    pub const MIN_TARGET_UPDATE: f32 = 50.0;
    /// Slow down inside this distance of a positioning target
    pub const ARRIVE_RADIUS: f32 = 120.0;

    pub const IDLE_HOME_LEASH: f32 = 100.0;
    pub const IDLE_CHASE_RANGE: f32 = 400.0;

    pub const CHASE_GIVE_UP: f32 = 1100.0;
    /// Yield the ball when an opponent is this much closer
    pub const CHASE_YIELD_MARGIN: f32 = 150.0;
    pub const CHASE_YIELD_MIN_DISTANCE: f32 = 250.0;
    pub const CHASE_LEAD_SECS: f32 = 0.2;

    pub const LOST_POSSESSION: f32 = 80.0;
    pub const DECISION_INTERVAL: f32 = 0.3;
    pub const PRESSURE_RADIUS: f32 = 100.0;

    pub const SIDELINE_TRIGGER: f32 = 70.0;
    pub const SIDELINE_CLEAR: f32 = 160.0;
    pub const SIDELINE_TIMEOUT: f32 = 1.5;

    pub const KICK_SETUP_DISTANCE: f32 = 30.0;
    pub const KICK_SETUP_TOLERANCE: f32 = 25.0;
    /// dot(aim, player→ball) needed to kick without repositioning
    pub const KICK_CONE_DOT: f32 = 0.5;
    pub const KICK_SETUP_TIMEOUT: f32 = 1.5;
    pub const KICK_ABANDON_DISTANCE: f32 = 120.0;

    /// Grounded travel is roughly power / 3 at 60 Hz with 0.95 friction
    pub const PASS_POWER_PER_UNIT: f32 = 3.0;
    pub const PASS_MIN_POWER: f32 = 400.0;
    pub const PASS_MAX_POWER: f32 = 2200.0;
    pub const PASS_LOFT_DISTANCE: f32 = 700.0;
    pub const PASS_LOFT_LIFT: f32 = 260.0;

    pub const SHOT_POWER: f32 = 2400.0;
    pub const SHOT_MAX_LIFT: f32 = 150.0;
}
