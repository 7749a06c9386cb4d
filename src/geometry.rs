//! Plane geometry shared by the canvas and the gauge layout.
//!
//! Angles follow the canvas convention: degrees, 0° at 3 o'clock, growing
//! clockwise (screen y points down).

use crate::section::{Section, SectionStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point on the circle of `radius` around `self` at `degrees`.
    pub fn polar(self, radius: f32, degrees: f32) -> Point {
        let rad = degrees.to_radians();
        Point::new(self.x + rad.cos() * radius, self.y + rad.sin() * radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn inset(&self, dx: f32, dy: f32) -> RectF {
        RectF::new(
            self.left + dx,
            self.top + dy,
            self.right - dx,
            self.bottom - dy,
        )
    }

    pub fn union(&self, other: &RectF) -> RectF {
        RectF::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn from_points(points: &[Point]) -> RectF {
        points.iter().fold(
            RectF::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |r, p| RectF::new(r.left.min(p.x), r.top.min(p.y), r.right.max(p.x), r.bottom.max(p.y)),
        )
    }
}

/// Extra angle a round cap adds past one end of an arc, in degrees.
///
/// The cap sticks out by half the stroke width; measured along the
/// circumference of `diameter` that length is `(w/2) * 360 / (d * PI)`.
pub fn round_cap_angle(stroke_width: f32, diameter: f32) -> f32 {
    if diameter <= 0.0 {
        return 0.0;
    }
    (stroke_width as f64 * 0.5 * 360.0 / (diameter as f64 * std::f64::consts::PI)) as f32
}

/// One section arc as it is handed to the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionArc {
    /// Start of the section's share of the range, before cap correction.
    pub start: f32,
    /// The section's proportional share of the range.
    pub sweep: f32,
    /// Start angle actually drawn.
    pub draw_start: f32,
    /// Sweep actually drawn.
    pub draw_sweep: f32,
    pub style: SectionStyle,
}

impl SectionArc {
    pub fn end(&self) -> f32 {
        self.start + self.sweep
    }
}

/// Lays `sections` out contiguously over `[start_degree, end_degree]`.
///
/// Round sections are shortened by `round_angle` at each end so their
/// visible span (cap included) matches a flat section of the same share.
pub fn layout_sections(
    sections: &[Section],
    start_degree: f32,
    end_degree: f32,
    round_angle: f32,
) -> Vec<SectionArc> {
    let range = end_degree - start_degree;
    let mut start = start_degree;
    sections
        .iter()
        .map(|section| {
            let sweep = range * section.offset;
            let arc = match section.style {
                SectionStyle::Round => SectionArc {
                    start,
                    sweep,
                    draw_start: start + round_angle,
                    draw_sweep: sweep - round_angle * 2.0,
                    style: section.style,
                },
                SectionStyle::Butt => SectionArc {
                    start,
                    sweep,
                    draw_start: start,
                    draw_sweep: sweep,
                    style: section.style,
                },
            };
            start += sweep;
            arc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use proptest::prelude::*;

    fn sections(offsets: &[f32], style: SectionStyle) -> Vec<Section> {
        offsets
            .iter()
            .map(|&o| Section::new(o, Color::WHITE, style))
            .collect()
    }

    #[test]
    fn test_three_sections_boundaries() {
        let arcs = layout_sections(
            &sections(&[0.33, 0.33, 0.34], SectionStyle::Butt),
            135.0,
            405.0,
            0.0,
        );
        assert!((arcs[0].end() - 224.1).abs() < 1e-3);
        assert!((arcs[1].end() - 313.2).abs() < 1e-3);
        assert!((arcs[2].end() - 405.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_cap_angle_known_value() {
        // w/2 = 15, d = 360 / PI  ->  15 degrees
        let angle = round_cap_angle(30.0, 360.0 / std::f32::consts::PI);
        assert!((angle - 15.0).abs() < 1e-3);
        assert_eq!(round_cap_angle(30.0, 0.0), 0.0);
    }

    #[test]
    fn test_polar_is_clockwise() {
        let p = Point::new(10.0, 10.0).polar(5.0, 90.0);
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!((p.y - 15.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_round_cap_matches_formula(w in 0.5f32..200.0, d in 1.0f32..2000.0) {
            let expected = w / 2.0 * 360.0 / (d * std::f32::consts::PI);
            prop_assert!((round_cap_angle(w, d) - expected).abs() <= expected * 1e-4);
        }

        #[test]
        fn prop_sections_tile_range(
            weights in prop::collection::vec(0.01f32..1.0, 1..8),
            start in 0.0f32..180.0,
            span in 10.0f32..360.0,
        ) {
            let total: f32 = weights.iter().sum();
            let offsets: Vec<f32> = weights.iter().map(|w| w / total).collect();
            let arcs = layout_sections(&sections(&offsets, SectionStyle::Butt), start, start + span, 3.0);
            prop_assert!((arcs[0].start - start).abs() < 1e-4);
            for pair in arcs.windows(2) {
                prop_assert!((pair[0].end() - pair[1].start).abs() < 1e-3);
            }
            prop_assert!((arcs[arcs.len() - 1].end() - (start + span)).abs() < 1e-2);
        }

        #[test]
        fn prop_round_sweep_loses_two_corrections(
            offset in 0.05f32..1.0,
            round in 0.0f32..5.0,
        ) {
            let round_arcs = layout_sections(&sections(&[offset], SectionStyle::Round), 135.0, 405.0, round);
            let butt_arcs = layout_sections(&sections(&[offset], SectionStyle::Butt), 135.0, 405.0, round);
            let share = 270.0 * offset;
            prop_assert!((round_arcs[0].draw_sweep - (share - 2.0 * round)).abs() < 1e-3);
            prop_assert!((round_arcs[0].draw_start - (135.0 + round)).abs() < 1e-3);
            prop_assert!((butt_arcs[0].draw_sweep - share).abs() < 1e-3);
            prop_assert!((butt_arcs[0].draw_start - 135.0).abs() < 1e-3);
        }
    }
}
