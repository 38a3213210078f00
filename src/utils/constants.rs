/// Squared-length threshold below which a direction is treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

pub const DEFAULT_TIME_STEP: f32 = 1.0 / 50.0; // s, fixed simulation tick

// Planet
pub const PLANET_RADIUS: f32 = 25.0;
pub const SPIN_SPEED_DEG: f32 = 4.0; // deg/s

// Bird
pub const GROUND_CLEARANCE: f32 = 0.05;
pub const SIDE_SPEED_DEG: f32 = 90.0; // deg/s
pub const JUMP_HEIGHT: f32 = 3.0;
pub const GRAVITY: f32 = 3.0; // inward, units/s^2
pub const RADIAL_DAMPING: f32 = 1.5;
pub const MAX_ALTITUDE: f32 = 15.0;
pub const CEILING_GRACE: f32 = 0.15; // s
pub const BIRD_COLLISION_RADIUS: f32 = 0.5;

// Spawner
pub const AHEAD_ANGLE_DEG: f32 = 25.0;
pub const MIN_SIDE_ANGLE_DEG: f32 = 10.0;
pub const MAX_SIDE_ANGLE_DEG: f32 = 25.0;
pub const GATE_ALTITUDE_OFFSET: f32 = -5.0;
pub const SPAWN_INTERVAL: f32 = 5.0; // s
pub const SIMPLE_SPAWN_INTERVAL: f32 = 8.0; // s
pub const FULL_SPAWN_INTERVAL: f32 = 5.0; // s

// Gate
pub const GATE_LIFETIME: f32 = 10.0; // s
pub const GAP_HALF_HEIGHT: f32 = 2.0;
pub const GATE_HALF_WIDTH: f32 = 1.5;
pub const GATE_HALF_THICKNESS: f32 = 0.5;

// Observation normalisation
pub const OBS_VELOCITY_SCALE: f32 = 5.0;
pub const OBS_ALONG_SCALE: f32 = 20.0;
pub const OBS_LATERAL_SCALE: f32 = 10.0;
pub const OBS_RADIAL_SCALE: f32 = 5.0;
pub const OBS_DELTA_ALONG_SCALE: f32 = 5.0;
pub const MAX_ARC_LOOKAHEAD_DEG: f32 = 60.0;
pub const OBS_ALTITUDE_SCALE: f32 = 15.0;

// Controls
pub const STRAFE_DEADZONE: f32 = 0.2;
