//! SVG path and label geometry for a [`WheelLayout`].

use crate::config::{FULL_TURN_DEG, LABEL_RADIUS_RATIO, SETTLE_EASING, SPIN_DURATION_MS};
use crate::wheel::{Segment, WheelLayout};

// Spans this close to a full turn are drawn as a whole disc
const FULL_TURN_EPSILON: f64 = 1e-9;

/// Drawable form of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentShape {
    pub index: usize,
    pub path: String,
    pub fill: &'static str,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

/// Point at `angle_deg` on a circle of `radius` around `(cx, cy)`.
pub fn polar_point(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// Pie-slice path for a segment of a wheel centred in a `2r × 2r` view box.
pub fn segment_path(segment: &Segment, radius: f64) -> String {
    let (cx, cy) = (radius, radius);
    let span = segment.span();

    if span >= FULL_TURN_DEG - FULL_TURN_EPSILON {
        // A single arc cannot start and end on the same point; use two halves.
        let (x1, y1) = polar_point(cx, cy, radius, segment.start_angle);
        let (x2, y2) = polar_point(cx, cy, radius, segment.start_angle + FULL_TURN_DEG / 2.0);
        return format!(
            "M {x1} {y1} A {r} {r} 0 1 1 {x2} {y2} A {r} {r} 0 1 1 {x1} {y1} Z",
            r = radius
        );
    }

    let (x1, y1) = polar_point(cx, cy, radius, segment.start_angle);
    let (x2, y2) = polar_point(cx, cy, radius, segment.end_angle);
    let large_arc = if span > FULL_TURN_DEG / 2.0 { 1 } else { 0 };
    format!(
        "M {cx} {cy} L {x1} {y1} A {r} {r} 0 {large_arc} 1 {x2} {y2} Z",
        r = radius
    )
}

/// Where a segment's label goes: on its bisector, part-way out from the centre.
pub fn label_position(segment: &Segment, radius: f64) -> (f64, f64) {
    polar_point(radius, radius, radius * LABEL_RADIUS_RATIO, segment.mid_angle())
}

/// Shapes for every segment of `layout`, in entry order.
pub fn wheel_shapes(layout: &WheelLayout, radius: f64) -> Vec<SegmentShape> {
    layout
        .segments
        .iter()
        .map(|segment| {
            let (label_x, label_y) = label_position(segment, radius);
            SegmentShape {
                index: segment.index,
                path: segment_path(segment, radius),
                fill: segment.color(),
                label: segment.label.clone(),
                label_x,
                label_y,
            }
        })
        .collect()
}

/// Inline style for the rotating wheel element.
///
/// While easing towards the result the rotation change is animated by CSS;
/// during free spinning each frame is applied directly.
pub fn rotation_style(rotation_deg: f64, easing: bool) -> String {
    if easing {
        format!(
            "transform: rotate({}deg); transition: transform {}ms {};",
            rotation_deg, SPIN_DURATION_MS, SETTLE_EASING
        )
    } else {
        format!("transform: rotate({}deg);", rotation_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::build_layout;
    use crate::Entry;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn first_segment_starts_at_the_top() {
        let layout = build_layout(&[Entry::new("A", 25.0), Entry::new("B", 75.0)]).unwrap();
        let top = polar_point(200.0, 200.0, 200.0, layout.segments[0].start_angle);
        assert!(close(top, (200.0, 0.0)));
    }

    #[test]
    fn large_arc_flag_follows_span() {
        let layout = build_layout(&[Entry::new("A", 25.0), Entry::new("B", 75.0)]).unwrap();
        assert!(segment_path(&layout.segments[0], 200.0).contains(" 0 0 1 "));
        assert!(segment_path(&layout.segments[1], 200.0).contains(" 0 1 1 "));
        assert!(segment_path(&layout.segments[0], 200.0).starts_with("M 200 200 L "));
    }

    #[test]
    fn single_entry_draws_a_full_disc() {
        let layout = build_layout(&[Entry::new("only", 100.0)]).unwrap();
        let path = segment_path(&layout.segments[0], 200.0);
        assert_eq!(path.matches(" A ").count(), 2);
        assert!(!path.contains(" L "));
    }

    #[test]
    fn labels_sit_on_the_bisector() {
        let layout = build_layout(&[Entry::new("A", 50.0), Entry::new("B", 50.0)]).unwrap();
        // A covers the right half, so its label is straight right of centre
        let (x, y) = label_position(&layout.segments[0], 200.0);
        assert!(close((x, y), (200.0 + 130.0, 200.0)));
    }

    #[test]
    fn shapes_carry_palette_colours() {
        let layout = build_layout(&[Entry::new("A", 50.0), Entry::new("B", 50.0)]).unwrap();
        let shapes = wheel_shapes(&layout, 200.0);
        assert_eq!(shapes[0].fill, "#f44336");
        assert_eq!(shapes[1].fill, "#ffeb3b");
        assert_eq!(shapes[1].label, "B");
    }

    #[test]
    fn easing_adds_css_transition() {
        assert_eq!(rotation_style(30.0, false), "transform: rotate(30deg);");
        assert_eq!(
            rotation_style(1296.0, true),
            "transform: rotate(1296deg); transition: transform 3000ms cubic-bezier(0.17, 0.67, 0.12, 0.99);"
        );
    }
}
