//! Wheel geometry and weighted selection.
//!
//! Angles are in degrees, 0° at 3 o'clock and increasing clockwise, so the first
//! segment starts at the top of the wheel (-90°). Rotating the wheel by `r` moves a
//! point at wheel angle `a` to `a + r`; the pointer sits still at 0°.

use crate::config::{
    EXTRA_ROTATIONS, FULL_TURN_DEG, PALETTE, POINTER_ANGLE_DEG, REFERENCE_ANGLE_DEG,
};
use crate::random::RandomSource;
use crate::{total_weight, Entry, EntryIndex, ValidationError, WheelError};
use log::{debug, info};
use serde::Serialize;

/// One entry's slice of the wheel, covering `[start_angle, end_angle)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: EntryIndex,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color_index: usize,
}

impl Segment {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.span() / 2.0
    }

    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// Segments for every entry, in entry order, covering exactly one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelLayout {
    pub segments: Vec<Segment>,
    pub total_weight: f64,
}

impl WheelLayout {
    pub fn segment(&self, index: EntryIndex) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Index of the segment containing wheel angle `angle`, taken modulo one turn.
    pub fn segment_at(&self, angle: f64) -> Option<EntryIndex> {
        let mut offset = (angle - REFERENCE_ANGLE_DEG).rem_euclid(FULL_TURN_DEG);
        // rem_euclid can round a tiny negative remainder up to a full turn
        if offset >= FULL_TURN_DEG {
            offset = 0.0;
        }
        let angle = REFERENCE_ANGLE_DEG + offset;

        self.segments
            .iter()
            .find(|s| s.span() > 0.0 && s.start_angle <= angle && angle < s.end_angle)
            .map(|s| s.index)
    }
}

/// Result of a resolved spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinOutcome {
    pub winning_index: EntryIndex,
    /// Rotation that brings the chosen point of the winning segment under the pointer.
    pub target_angle: f64,
    /// Equivalent to `target_angle` modulo one turn, plus the decorative extra turns.
    /// The value to animate towards.
    pub total_rotation: f64,
}

/// Total weight of `entries`, or why no wheel can be drawn from them.
///
/// Entries can arrive from JavaScript without passing through the store, so every
/// weight is checked again: each must be finite and non-negative, and their sum must
/// be finite and positive.
fn usable_total(entries: &[Entry]) -> Result<f64, WheelError> {
    if entries.is_empty() {
        return Err(WheelError::EmptyWheel);
    }
    if let Some(bad) = entries
        .iter()
        .find(|e| !e.weight.is_finite() || e.weight < 0.0)
    {
        return Err(ValidationError::InvalidWeight(bad.weight.to_string()).into());
    }
    let total = total_weight(entries);
    if !total.is_finite() {
        return Err(WheelError::WeightOverflow);
    }
    if total <= 0.0 {
        return Err(WheelError::ZeroWeight);
    }
    Ok(total)
}

/// Split one turn among `entries` in proportion to their weights.
///
/// Boundaries are computed from cumulative weights, so consecutive segments share
/// their boundary exactly and the last one ends one full turn after the first starts.
pub fn build_layout(entries: &[Entry]) -> Result<WheelLayout, WheelError> {
    let total = usable_total(entries)?;

    let angle_at = |cumulative: f64| REFERENCE_ANGLE_DEG + cumulative / total * FULL_TURN_DEG;

    let mut cumulative = 0.0;
    let segments = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let start_angle = angle_at(cumulative);
            cumulative += entry.weight;
            Segment {
                index,
                label: entry.label.clone(),
                start_angle,
                end_angle: angle_at(cumulative),
                color_index: index % PALETTE.len(),
            }
        })
        .collect();

    debug!("Built layout with {} segments (total weight {})", entries.len(), total);
    Ok(WheelLayout {
        segments,
        total_weight: total,
    })
}

/// Roulette-wheel sampling: one draw in `[0, total)`, then the first entry whose
/// cumulative weight reaches it.
///
/// Zero-weight entries are never chosen. If rounding leaves the draw above the last
/// cumulative sum, the last entry with positive weight wins.
pub fn pick_winner<R: RandomSource + ?Sized>(
    entries: &[Entry],
    rng: &mut R,
) -> Result<EntryIndex, WheelError> {
    let total = usable_total(entries)?;

    let draw = rng.uniform(0.0, total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, entry) in entries.iter().enumerate() {
        if entry.weight <= 0.0 {
            continue;
        }
        cumulative += entry.weight;
        last_positive = index;
        if cumulative >= draw {
            debug!("Draw {:.3}/{} picked entry {}", draw, total, index);
            return Ok(index);
        }
    }
    Ok(last_positive)
}

/// Choose where in the winning segment the wheel stops and how far it turns to get there.
///
/// The stopping point is uniform within the segment so the wheel does not always land
/// on a segment's centre line. `total_rotation` is the target taken modulo one turn
/// (in `(0, 360]`) plus three or four whole turns, so it always exceeds three turns.
pub fn resolve_spin<R: RandomSource + ?Sized>(
    layout: &WheelLayout,
    winning_index: EntryIndex,
    rng: &mut R,
) -> Result<SpinOutcome, WheelError> {
    let segment = layout.segment(winning_index).ok_or(WheelError::Index {
        index: winning_index,
        len: layout.segments.len(),
    })?;

    let point = segment.start_angle + rng.uniform(0.0, segment.span());
    let target_angle = POINTER_ANGLE_DEG - point;
    // Only whole turns keep the chosen point under the pointer
    let extra_turns = rng
        .uniform(EXTRA_ROTATIONS.start, EXTRA_ROTATIONS.end)
        .floor();
    // A stop exactly on the pointer goes round once more instead of adding nothing
    let mut remainder = target_angle.rem_euclid(FULL_TURN_DEG);
    if remainder == 0.0 {
        remainder = FULL_TURN_DEG;
    }
    let total_rotation = extra_turns * FULL_TURN_DEG + remainder;

    info!(
        "Spin resolved: '{}' wins, stopping at {:.1}° after {} extra turns",
        segment.label, point, extra_turns
    );
    Ok(SpinOutcome {
        winning_index,
        target_angle,
        total_rotation,
    })
}

/// Layout, winner and stopping rotation in one go, drawing from `rng` in that order.
pub fn spin<R: RandomSource + ?Sized>(
    entries: &[Entry],
    rng: &mut R,
) -> Result<(WheelLayout, SpinOutcome), WheelError> {
    let layout = build_layout(entries)?;
    let winner = pick_winner(entries, rng)?;
    let outcome = resolve_spin(&layout, winner, rng)?;
    Ok((layout, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays fixed fractions of each requested range.
    struct Scripted(VecDeque<f64>);

    impl Scripted {
        fn new(fractions: &[f64]) -> Self {
            Self(fractions.iter().copied().collect())
        }
    }

    impl RandomSource for Scripted {
        fn uniform(&mut self, low: f64, high: f64) -> f64 {
            let f = self.0.pop_front().expect("script exhausted");
            low + f * (high - low)
        }
    }

    fn abc() -> Vec<Entry> {
        vec![
            Entry::new("A", 50.0),
            Entry::new("B", 30.0),
            Entry::new("C", 20.0),
        ]
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn layout_matches_weights() {
        let layout = build_layout(&abc()).unwrap();
        let bounds: Vec<(f64, f64)> = layout
            .segments
            .iter()
            .map(|s| (s.start_angle, s.end_angle))
            .collect();

        assert_close(bounds[0].0, -90.0);
        assert_close(bounds[0].1, 90.0);
        assert_close(bounds[1].0, 90.0);
        assert_close(bounds[1].1, 198.0);
        assert_close(bounds[2].0, 198.0);
        assert_close(bounds[2].1, 270.0);

        assert_close(layout.segments[0].span(), 180.0);
        assert_close(layout.segments[1].span(), 108.0);
        assert_close(layout.segments[2].span(), 72.0);
    }

    #[test]
    fn layout_is_gapless_for_uneven_weights() {
        let entries: Vec<Entry> = (0..37)
            .map(|i| Entry::new(format!("e{}", i), 0.1 + (i % 7) as f64 * 1.3))
            .collect();
        let layout = build_layout(&entries).unwrap();

        for pair in layout.segments.windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        let spans: f64 = layout.segments.iter().map(Segment::span).sum();
        assert_close(spans, 360.0);
        assert_eq!(layout.segments.last().unwrap().end_angle, 270.0);
    }

    #[test]
    fn colours_cycle_through_palette() {
        let entries: Vec<Entry> = (0..12).map(|i| Entry::new(format!("{}", i), 1.0)).collect();
        let layout = build_layout(&entries).unwrap();
        assert_eq!(layout.segments[10].color_index, 0);
        assert_eq!(layout.segments[11].color(), PALETTE[1]);
    }

    #[test]
    fn layout_rejects_unusable_wheels() {
        assert_eq!(build_layout(&[]), Err(WheelError::EmptyWheel));
        assert_eq!(
            build_layout(&[Entry::new("A", 0.0), Entry::new("B", 0.0)]),
            Err(WheelError::ZeroWeight)
        );
    }

    #[test]
    fn layout_rejects_weights_outside_the_entry_contract() {
        for bad in [f64::NAN, f64::INFINITY, -50.0] {
            let entries = [Entry::new("A", bad), Entry::new("B", 50.0)];
            assert!(
                matches!(
                    build_layout(&entries),
                    Err(WheelError::Validation(ValidationError::InvalidWeight(_)))
                ),
                "weight {} accepted",
                bad
            );
            let mut rng = Scripted::new(&[]);
            assert!(pick_winner(&entries, &mut rng).is_err());
        }
    }

    #[test]
    fn overflowing_total_is_an_error_not_a_panic() {
        let entries = [Entry::new("A", 1e308), Entry::new("B", 1e308)];
        assert_eq!(build_layout(&entries), Err(WheelError::WeightOverflow));
        let mut rng = RngSource::new(StdRng::seed_from_u64(1));
        assert_eq!(pick_winner(&entries, &mut rng), Err(WheelError::WeightOverflow));
    }

    #[test]
    fn stop_on_the_pointer_still_turns_more_than_three_times() {
        let layout = build_layout(&[Entry::new("A", 25.0), Entry::new("B", 75.0)]).unwrap();
        // B starts at 0°, right under the pointer
        let mut rng = Scripted::new(&[0.0, 0.0]);
        let outcome = resolve_spin(&layout, 1, &mut rng).unwrap();

        assert_close(outcome.total_rotation, 4.0 * 360.0);
        assert!(outcome.total_rotation > 3.0 * 360.0);
        assert_eq!(layout.segment_at(POINTER_ANGLE_DEG - outcome.total_rotation), Some(1));
    }

    #[test]
    fn draw_of_forty_picks_first_entry() {
        let mut rng = Scripted::new(&[0.4]);
        assert_eq!(pick_winner(&abc(), &mut rng), Ok(0));
    }

    #[test]
    fn draws_land_in_cumulative_bands() {
        for (fraction, expected) in [(0.0, 0), (0.5, 0), (0.51, 1), (0.8, 1), (0.81, 2), (0.999, 2)] {
            let mut rng = Scripted::new(&[fraction]);
            assert_eq!(pick_winner(&abc(), &mut rng), Ok(expected), "draw {}", fraction);
        }
    }

    #[test]
    fn zero_weight_entries_never_win() {
        let entries = vec![
            Entry::new("never", 0.0),
            Entry::new("always", 100.0),
            Entry::new("also never", 0.0),
        ];
        for fraction in [0.0, 0.5, 0.9999] {
            let mut rng = Scripted::new(&[fraction]);
            assert_eq!(pick_winner(&entries, &mut rng), Ok(1));
        }
    }

    #[test]
    fn seeded_picks_are_reproducible() {
        let run = |seed| {
            let mut rng = RngSource::new(StdRng::seed_from_u64(seed));
            (0..50)
                .map(|_| pick_winner(&abc(), &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(2024), run(2024));
    }

    #[test]
    fn frequencies_converge_to_weights() {
        let entries = abc();
        let mut rng = RngSource::new(StdRng::seed_from_u64(42));
        let draws = 200_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            counts[pick_winner(&entries, &mut rng).unwrap()] += 1;
        }
        for (count, expected) in counts.iter().zip([0.5, 0.3, 0.2]) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "observed {} expected {}",
                observed,
                expected
            );
        }
    }

    #[test]
    fn resolve_spin_lands_inside_winning_segment() {
        let layout = build_layout(&abc()).unwrap();
        // halfway into B; a draw of 3.5 turns keeps 3 whole turns
        let mut rng = Scripted::new(&[0.5, 0.25]);
        let outcome = resolve_spin(&layout, 1, &mut rng).unwrap();

        assert_eq!(outcome.winning_index, 1);
        assert_close(outcome.target_angle, -144.0);
        assert_close(outcome.total_rotation, 3.0 * 360.0 + 216.0);
        assert_eq!(layout.segment_at(POINTER_ANGLE_DEG - outcome.total_rotation), Some(1));
    }

    #[test]
    fn every_seeded_spin_turns_at_least_three_times() {
        let entries = abc();
        let mut rng = RngSource::new(StdRng::seed_from_u64(5));
        for _ in 0..500 {
            let (layout, outcome) = spin(&entries, &mut rng).unwrap();
            let landed = layout.segment_at(POINTER_ANGLE_DEG - outcome.total_rotation);
            assert_eq!(landed, Some(outcome.winning_index));
            assert!(outcome.total_rotation > 3.0 * 360.0);
            assert!(outcome.total_rotation <= 5.0 * 360.0);
        }
    }

    #[test]
    fn resolve_spin_rejects_unknown_segment() {
        let layout = build_layout(&abc()).unwrap();
        let mut rng = Scripted::new(&[]);
        assert_eq!(
            resolve_spin(&layout, 3, &mut rng),
            Err(WheelError::Index { index: 3, len: 3 })
        );
    }

    #[test]
    fn segment_at_wraps_angles() {
        let layout = build_layout(&abc()).unwrap();
        assert_eq!(layout.segment_at(0.0), Some(0));
        assert_eq!(layout.segment_at(150.0), Some(1));
        assert_eq!(layout.segment_at(-100.0), Some(2));
        assert_eq!(layout.segment_at(150.0 + 720.0), Some(1));
    }
}
