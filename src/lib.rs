//! Core logic for the Lucky Wheel widget.
//!
//! The UI keeps a [`WeightStore`] of labelled entries, turns a snapshot of it into a
//! [`WheelLayout`], and lets a [`SpinController`] drive the spin lifecycle on top of an
//! injected [`Scheduler`] and [`RandomSource`]. Everything here is plain data and pure
//! functions apart from those two capabilities, so the whole lifecycle runs under a fake
//! clock in tests.

use std::fmt;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod random;
pub mod schedule;
pub mod spin;
pub mod store;
pub mod svg;
pub mod wheel;

pub use random::{RandomSource, RngSource};
pub use schedule::{ManualScheduler, Scheduler, TaskHandle, TimerScheduler};
pub use spin::{SpinController, SpinPhase};
pub use store::WeightStore;
pub use wheel::{build_layout, pick_winner, resolve_spin, Segment, SpinOutcome, WheelLayout};

/// A single labelled option on the wheel.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub label: String,
    pub weight: f64,
}

impl Entry {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Position of an entry in the store; entries have no other identity.
pub type EntryIndex = usize;

/// Sum of the weights of `entries`, in sequence order.
pub fn total_weight(entries: &[Entry]) -> f64 {
    entries.iter().map(|e| e.weight).sum()
}

/// Rejected user input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyLabel,
    CapacityReached { max: usize },
    InvalidWeight(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyLabel => write!(f, "Please enter a label"),
            ValidationError::CapacityReached { max } => {
                write!(f, "You can add at most {} entries", max)
            }
            ValidationError::InvalidWeight(raw) => {
                write!(f, "Invalid weight '{}': expected a non-negative number", raw)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every recoverable failure of the wheel core. None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    Validation(ValidationError),
    Index { index: usize, len: usize },
    EmptyWheel,
    ZeroWeight,
    /// Every weight is finite but their sum is not.
    WeightOverflow,
    UnbalancedWeights { total: f64 },
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::Validation(err) => write!(f, "{}", err),
            WheelError::Index { index, len } => write!(
                f,
                "Entry index {} is out of range (have {} entries)",
                index, len
            ),
            WheelError::EmptyWheel => write!(f, "Add at least one entry before spinning"),
            WheelError::ZeroWeight => write!(f, "At least one entry needs a weight above zero"),
            WheelError::WeightOverflow => write!(f, "Weights are too large to add up"),
            WheelError::UnbalancedWeights { total } => write!(
                f,
                "Weights must add up to 100% (current total: {:.1}%)",
                total
            ),
        }
    }
}

impl std::error::Error for WheelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WheelError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for WheelError {
    fn from(err: ValidationError) -> Self {
        WheelError::Validation(err)
    }
}

/// Layout entry point for plain JavaScript pages that only want the geometry.
///
/// # Arguments
/// * `entries_js` - Serialized `[{ label, weight }]` array
///
/// # Returns
/// The serialized [`WheelLayout`], or an error message string
#[wasm_bindgen]
pub fn wheel_layout(entries_js: JsValue) -> JsValue {
    let entries: Vec<Entry> = match serde_wasm_bindgen::from_value(entries_js) {
        Ok(e) => e,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize entries: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };

    match build_layout(&entries) {
        Ok(layout) => serde_wasm_bindgen::to_value(&layout).unwrap_or(JsValue::NULL),
        Err(e) => serde_wasm_bindgen::to_value(&format!("Layout failed: {}", e))
            .unwrap_or(JsValue::NULL),
    }
}
