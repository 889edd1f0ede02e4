//! Application-level configuration constants.

use std::ops::Range;

// Entry limits
pub const MAX_ENTRIES: usize = 100;
pub const TOTAL_WEIGHT_PCT: f64 = 100.0;
pub const BALANCE_TOLERANCE_PCT: f64 = 0.5;
pub const EQUAL_WEIGHT_DECIMALS: i32 = 1;

// Wheel geometry (degrees, 0° at 3 o'clock, increasing clockwise)
pub const REFERENCE_ANGLE_DEG: f64 = -90.0;
pub const POINTER_ANGLE_DEG: f64 = 0.0;
pub const FULL_TURN_DEG: f64 = 360.0;

// SVG rendering
pub const WHEEL_RADIUS: f64 = 200.0;
pub const LABEL_RADIUS_RATIO: f64 = 0.65;

// Spin animation
pub const SPIN_DURATION_MS: u32 = 3000;
// Frame length of the manual test clock; the browser paces real frames
pub const FRAME_INTERVAL_MS: u32 = 16;
pub const SPIN_STEP_DEG: f64 = 10.0;
pub const EXTRA_ROTATIONS: Range<f64> = 3.0..5.0;
pub const SETTLE_EASING: &str = "cubic-bezier(0.17, 0.67, 0.12, 0.99)";

/// Segment colours, assigned by entry index modulo the palette length.
pub const PALETTE: [&str; 10] = [
    "#f44336", "#ffeb3b", "#03a9f4", "#3f51b5", "#9c27b0",
    "#795548", "#4caf50", "#ff9800", "#e91e63", "#00bcd4",
];
