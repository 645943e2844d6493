//! Tuning constants shared by the 3D world and the 2D collision layer.
//!
//! These are the defaults used by `WorldConfig::default()`. Worlds built from a
//! config file may override every value here except the epsilons.

/// Default fixed sub-step length (seconds)
pub const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Default cap on sub-steps executed by a single `step` call
pub const DEFAULT_MAX_SUBSTEPS: u32 = 4;

/// Default gravity (m/s^2)
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Penetration tolerated before positional correction kicks in
pub const PENETRATION_SLOP: f32 = 0.01;

/// Fraction of the remaining penetration removed per sub-step
pub const CORRECTION_PERCENT: f32 = 0.8;

/// Combined linear + angular speed below which a body starts counting towards sleep
pub const SLEEP_VELOCITY_THRESHOLD: f32 = 0.05;

/// Seconds a body must stay slow before it is put to sleep
pub const SLEEP_TIME_THRESHOLD: f32 = 0.5;

/// Default restitution for new bodies
pub const DEFAULT_RESTITUTION: f32 = 0.3;

/// Default friction coefficient for new bodies
pub const DEFAULT_FRICTION: f32 = 0.5;

/// Default per-substep linear damping
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.01;

/// Default per-substep angular damping
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.05;

/// Angular speed below which rotation integration is skipped
pub const ANGULAR_EPSILON: f32 = 1e-6;

/// Distance below which two centers are treated as coincident
pub const DISTANCE_EPSILON: f32 = 1e-6;

/// Squared tangential speed below which friction is not applied
pub const TANGENT_EPSILON_SQ: f32 = 1e-12;

/// Default edge length of a 2D spatial grid cell
pub const DEFAULT_GRID_CELL_SIZE: f32 = 64.0;
