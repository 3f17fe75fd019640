// Simulation units:
// - Distance: surface pixels
// - Time: milliseconds for the wiggle clock, frames for orbital phase
// - Angles: radians

/// Wiggle speed UI value (0-10) to radians per millisecond
pub const WIGGLE_SPEED_SCALE: f64 = 0.001;

/// Rotation speed UI value (0-10) to radians per frame
pub const ROTATION_SPEED_SCALE: f64 = 0.005;

/// Full width of the per-entity orbit jitter range, centered on zero
pub const ORBIT_JITTER_SPAN: f64 = 60.0;

/// Orbit offset UI value at which the full jitter is applied
pub const ORBIT_OFFSET_RANGE: f64 = 10.0;

/// Upper bound of the per-axis wiggle speed variation
pub const WIGGLE_SPEED_VARIATION_MAX: f64 = 0.01;

/// Divisor turning a speed variation into a speed multiplier offset
pub const WIGGLE_SPEED_VARIATION_DIVISOR: f64 = 0.02;

/// Upper bound of the per-axis wiggle amplitude variation
pub const WIGGLE_AMPLITUDE_VARIATION_MAX: f64 = 2.0;

/// Divisor turning an amplitude variation into an amplitude multiplier offset
pub const WIGGLE_AMPLITUDE_VARIATION_DIVISOR: f64 = 4.0;

/// Palette used at startup
pub const DEFAULT_PALETTE: [&str; 5] = ["#B300FF", "#FF230A", "#F97901", "#FB045A", "#6000F0"];

/// Version tag written into every snapshot
pub const SNAPSHOT_VERSION: &str = "1.0";
