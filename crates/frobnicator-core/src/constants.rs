//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Towers ---

/// Rate of fire is given in shots per minute; cooldowns are kept in deciseconds.
pub const DECISECONDS_PER_MINUTE: f32 = 600.0;

/// Fraction of the paid value returned when a building is sold.
pub const SELL_REFUND_RATIO: f32 = 0.75;

/// Buildings occupy a square block of this many tiles per side.
pub const TOWER_FOOTPRINT: u32 = 2;

/// Offset from a building's position to where its projectiles leave.
pub const MUZZLE_OFFSET: (f32, f32) = (48.0, -24.0);

// --- Projectiles ---

/// Projectile travel speed (units per second).
pub const PROJECTILE_SPEED: f32 = 700.0;

/// Visual length of a projectile streak.
pub const PROJECTILE_LENGTH: f32 = 25.0;

// --- Creeps ---

/// Side of the box tested against regions for containment.
pub const CREEP_SIZE: f32 = 47.0;

/// Side of the box a spawn position must fit within its spawnpoint.
pub const CREEP_SPAWN_SIZE: i32 = 48;

/// Creep positions are top-left corners; this reaches the sprite center.
pub const CREEP_CENTER_OFFSET: f32 = 24.0;

/// Region entries between forced detours to a waypoint's inner route.
pub const DETOUR_INTERVAL: u32 = 7;

/// Name of the region that counts as the creeps' goal.
pub const GOAL_REGION: &str = "middle";

// --- Economy ---

/// Gold available when a game starts.
pub const STARTING_GOLD: i32 = 30;

/// Lives available when a game starts.
pub const STARTING_LIVES: u32 = 100;

// --- Waves ---

/// Delay before the first wave (seconds).
pub const FIRST_WAVE_DELAY_SECS: u32 = 5;

/// Interval between subsequent waves (seconds).
pub const WAVE_INTERVAL_SECS: u32 = 15;

// --- Floating messages ---

/// Seconds a floating message stays visible.
pub const MESSAGE_LIFESPAN_SECS: f32 = 3.0;

/// Upward drift of a floating message per tick.
pub const MESSAGE_RISE_PER_TICK: f32 = 0.5;
