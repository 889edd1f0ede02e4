//! Ordered, bounded list of weighted entries.
//!
//! Insertion order is significant: it fixes segment order and colour on the wheel.
//! Weights are free to drift away from 100 while the user edits them; only a spin
//! requires them to be balanced.

use crate::config::{BALANCE_TOLERANCE_PCT, EQUAL_WEIGHT_DECIMALS, MAX_ENTRIES, TOTAL_WEIGHT_PCT};
use crate::{total_weight, Entry, EntryIndex, ValidationError, WheelError};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// Longest numeric prefix, read the way a browser number field reports it
static WEIGHT_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());

/// Parse a raw weight from a text field.
///
/// Leading whitespace is skipped and trailing garbage after the number is ignored,
/// so `"12.5kg"` reads as 12.5. Negative and non-finite values are rejected.
///
/// # Examples
/// ```
/// use lucky_wheel::store::parse_weight;
/// assert_eq!(parse_weight(" 12.5kg"), Ok(12.5));
/// assert!(parse_weight("abc").is_err());
/// assert!(parse_weight("-3").is_err());
/// ```
pub fn parse_weight(raw: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidWeight(raw.to_string());

    let literal = WEIGHT_PREFIX_REGEX
        .find(raw.trim_start())
        .map(|m| m.as_str())
        .ok_or_else(invalid)?;
    let value: f64 = literal.parse().map_err(|_| invalid())?;

    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    // "-0" is a valid input; store it as plain zero
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Weights for an equal split of `count` entries, each rounded to
/// [`EQUAL_WEIGHT_DECIMALS`] places.
///
/// When plain rounding leaves the total at or beyond the balance tolerance
/// (99 entries round to 1.0 each, summing to 99), the residual is
/// spread one rounding unit at a time from the front so the split is always
/// spinnable. The result depends only on `count`.
pub fn equal_weights(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let scale = 10f64.powi(EQUAL_WEIGHT_DECIMALS);
    let total_units = (TOTAL_WEIGHT_PCT * scale).round() as i64;
    let tolerance_units = (BALANCE_TOLERANCE_PCT * scale).round() as i64;

    let base = (total_units as f64 / count as f64).round() as i64;
    let residual = total_units - base * count as i64;
    let adjusted = if residual.abs() >= tolerance_units {
        residual.unsigned_abs() as usize
    } else {
        0
    };
    let step = residual.signum();

    (0..count)
        .map(|i| {
            let units = if i < adjusted { base + step } else { base };
            units as f64 / scale
        })
        .collect()
}

/// The ordered list of entries the user is editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightStore {
    entries: Vec<Entry>,
}

impl WeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot for rendering and for building a layout.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: EntryIndex) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Append a trimmed label and split the weights equally across all entries.
    pub fn add(&mut self, label: &str) -> Result<(), WheelError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel.into());
        }
        if self.entries.len() >= MAX_ENTRIES {
            warn!("Rejected '{}': store already holds {} entries", label, MAX_ENTRIES);
            return Err(ValidationError::CapacityReached { max: MAX_ENTRIES }.into());
        }

        self.entries.push(Entry::new(label, 0.0));
        debug!("Added entry '{}' ({} total)", label, self.entries.len());
        self.redistribute_equal();
        Ok(())
    }

    /// Remove the entry at `index`; the remaining entries are split equally again.
    pub fn remove(&mut self, index: EntryIndex) -> Result<Entry, WheelError> {
        if index >= self.entries.len() {
            return Err(WheelError::Index {
                index,
                len: self.entries.len(),
            });
        }

        let removed = self.entries.remove(index);
        debug!("Removed entry '{}' at {}", removed.label, index);
        self.redistribute_equal();
        Ok(removed)
    }

    /// Store a user-typed weight for one entry.
    ///
    /// Out-of-range indices and unparsable input are ignored and the previous weight
    /// is kept, so the caller can simply re-render. Returns whether the weight was
    /// stored. Other entries are left alone.
    pub fn set_weight(&mut self, index: EntryIndex, raw: &str) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            warn!("Ignored weight edit for missing entry {}", index);
            return false;
        };

        match parse_weight(raw) {
            Ok(weight) => {
                entry.weight = weight;
                debug!("Weight of '{}' set to {}", entry.label, weight);
                true
            }
            Err(err) => {
                warn!("{}; keeping {}", err, entry.weight);
                false
            }
        }
    }

    /// Give every entry the same share of 100, rounded to one decimal. No-op when empty.
    ///
    /// Shares are not always identical: when the rounded shares would miss 100 by the
    /// balance tolerance or more (99 entries at 1.0 each), the leading entries get one
    /// extra tenth each so the wheel stays spinnable. See [`equal_weights`].
    pub fn redistribute_equal(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let weights = equal_weights(self.entries.len());
        for (entry, weight) in self.entries.iter_mut().zip(weights) {
            entry.weight = weight;
        }
        debug!(
            "Redistributed {} entries, total {:.1}",
            self.entries.len(),
            self.total_weight()
        );
    }

    pub fn total_weight(&self) -> f64 {
        total_weight(&self.entries)
    }

    /// Whether the total is within `tolerance` of 100.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total_weight() - TOTAL_WEIGHT_PCT).abs() <= tolerance
    }

    /// Check the preconditions of a spin: at least one entry and a balanced total.
    pub fn ensure_spinnable(&self) -> Result<(), WheelError> {
        if self.entries.is_empty() {
            return Err(WheelError::EmptyWheel);
        }
        if !self.is_balanced(BALANCE_TOLERANCE_PCT) {
            return Err(WheelError::UnbalancedWeights {
                total: self.total_weight(),
            });
        }
        Ok(())
    }
}
