//! Base gauge state shared by every speedometer style.
//!
//! Owns the range, angles, sections, indicator and readout text, and the
//! cached background bitmap together with its dirty flag. Concrete styles
//! (see [`crate::deluxe`]) decide what goes into the background.

use std::sync::Arc;

use crate::attrs::AttributeSet;
use crate::canvas::{Bitmap, Canvas};
use crate::color::Color;
use crate::config::GaugeConfig;
use crate::error::{GaugeError, Result};
use crate::geometry::{Point, RectF};
use crate::indicator::{Indicator, IndicatorContext, IndicatorKind};
use crate::paint::Paint;
use crate::section::{Section, SectionStyle};
use crate::text::{measure_text, text_bounds, TextAlign, TextPaint, Typeface};

/// Snap distance for the speed animation.
const SPEED_EPSILON: f32 = 0.01;
const SECTION_TOLERANCE: f32 = 1e-4;

pub struct Speedometer {
    min_speed: f32,
    max_speed: f32,
    speed: f32,
    target_speed: f32,
    lerp_factor: f32,
    unit: String,
    start_degree: i32,
    end_degree: i32,
    tick_number: usize,
    speed_text_decimals: usize,

    density: f32,
    width: usize,
    height: usize,
    padding: f32,
    speedometer_width: f32,

    mark_color: Color,
    background_circle_color: Color,
    text_paint: TextPaint,
    speed_text_paint: TextPaint,
    unit_text_paint: TextPaint,
    typeface: Option<Arc<Typeface>>,

    sections: Vec<Section>,
    indicator: Box<dyn Indicator>,

    background: Option<Bitmap>,
    background_dirty: bool,
    generation: u64,
}

impl std::fmt::Debug for Speedometer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speedometer")
            .field("range", &(self.min_speed, self.max_speed))
            .field("speed", &self.speed)
            .field("degrees", &(self.start_degree, self.end_degree))
            .field("size", &(self.width, self.height))
            .field("sections", &self.sections.len())
            .field("indicator", &self.indicator)
            .field("generation", &self.generation)
            .finish()
    }
}

fn check_speed_range(min: f32, max: f32) -> Result<()> {
    if min < max {
        Ok(())
    } else {
        Err(GaugeError::InvalidSpeedRange { min, max })
    }
}

fn check_degrees(start: i32, end: i32) -> Result<()> {
    if start >= 0 && start < end && end - start <= 360 {
        Ok(())
    } else {
        Err(GaugeError::InvalidDegrees { start, end })
    }
}

/// Offsets must tile the whole range; an empty list draws no arcs.
fn check_sections(sections: &[Section]) -> Result<()> {
    if sections.is_empty() {
        return Ok(());
    }
    let total: f32 = sections.iter().map(|s| s.offset).sum();
    if (total - 1.0).abs() <= SECTION_TOLERANCE {
        Ok(())
    } else {
        Err(GaugeError::InvalidSections { total })
    }
}

fn lerp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

impl Speedometer {
    pub fn new(config: GaugeConfig) -> Result<Self> {
        check_speed_range(config.min_speed, config.max_speed)?;
        check_degrees(config.start_degree, config.end_degree)?;
        check_sections(&config.sections)?;
        Ok(Self::from_checked(config))
    }

    /// Builds from a configuration already known to be valid.
    pub(crate) fn from_checked(config: GaugeConfig) -> Self {
        let density = config.density;
        let mut indicator = config.indicator.create(density);
        if let Some(color) = config.indicator_color {
            indicator.set_color(color);
        }
        Self {
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            speed: config.min_speed,
            target_speed: config.min_speed,
            lerp_factor: config.speed_lerp_factor.clamp(0.0, 1.0),
            unit: config.unit,
            start_degree: config.start_degree,
            end_degree: config.end_degree,
            tick_number: config.tick_number,
            speed_text_decimals: config.speed_text_decimals,
            density,
            width: 0,
            height: 0,
            padding: config.padding.max(0.0),
            speedometer_width: config.speedometer_width_dp * density,
            mark_color: config.mark_color,
            background_circle_color: config.background_circle_color,
            text_paint: TextPaint::new(config.text_size_dp * density, config.text_color),
            speed_text_paint: TextPaint::new(config.speed_text_size_dp * density, config.speed_text_color),
            unit_text_paint: TextPaint::new(config.unit_text_size_dp * density, config.unit_text_color),
            typeface: None,
            sections: config.sections,
            indicator,
            background: None,
            background_dirty: true,
            generation: 0,
        }
    }

    /// Overrides state from the gauge-wide style options. Invalid values
    /// are logged and leave the current state untouched.
    pub fn apply_attributes(&mut self, attrs: &AttributeSet) {
        let min = attrs.get_float("min_speed", self.min_speed);
        let max = attrs.get_float("max_speed", self.max_speed);
        if let Err(e) = self.set_min_max_speed(min, max) {
            tracing::warn!(error = %e, "ignoring speed range attributes");
        }
        let start = attrs.get_int("start_degree", self.start_degree as i64);
        let end = attrs.get_int("end_degree", self.end_degree as i64);
        match (i32::try_from(start), i32::try_from(end)) {
            (Ok(start), Ok(end)) => {
                if let Err(e) = self.set_degrees(start, end) {
                    tracing::warn!(error = %e, "ignoring degree attributes");
                }
            }
            _ => tracing::warn!(start, end, "degree attributes out of range"),
        }
        if let Some(unit) = attrs.get_string("unit") {
            self.set_unit(unit);
        }
        let ticks = attrs.get_int("tick_number", self.tick_number as i64);
        if let Ok(ticks) = usize::try_from(ticks) {
            self.set_tick_number(ticks);
        }
        let width = attrs.get_dimension("speedometer_width", self.speedometer_width, self.density);
        self.set_speedometer_width(width);
        let padding = attrs.get_dimension("padding", self.padding, self.density);
        self.set_padding(padding);
        self.set_mark_color(attrs.get_color("mark_color", self.mark_color));
        self.set_text_color(attrs.get_color("text_color", self.text_paint.color));
        self.set_speed_text_color(attrs.get_color("speed_text_color", self.speed_text_paint.color));
        self.set_unit_text_color(attrs.get_color("unit_text_color", self.unit_text_paint.color));
        self.set_background_circle_color(
            attrs.get_color("background_circle_color", self.background_circle_color),
        );
        if let Some(kind) = IndicatorKind::from_index(attrs.get_int("indicator", -1)) {
            self.set_indicator(kind);
        }
        if attrs.contains("indicator_color") {
            let color = attrs.get_color("indicator_color", self.indicator.color());
            self.indicator.set_color(color);
        }
    }

    // ------------------------------------------------------------------
    // Size
    // ------------------------------------------------------------------

    /// Returns true when the dimensions changed.
    pub fn set_size(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        tracing::trace!(width, height, "gauge resized");
        self.width = width;
        self.height = height;
        self.invalidate_gauge();
        true
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Side of the square the gauge is drawn in.
    pub fn size(&self) -> usize {
        self.width.min(self.height)
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: f32) {
        if padding != self.padding {
            self.padding = padding.max(0.0);
            self.invalidate_gauge();
        }
    }

    /// Usable size: the square side without padding.
    pub fn view_size_pa(&self) -> f32 {
        self.size() as f32 - self.padding * 2.0
    }

    /// Offset that centers the gauge square in the view.
    pub fn translation(&self) -> (f32, f32) {
        let size = self.size();
        (
            (self.width - size) as f32 * 0.5,
            (self.height - size) as f32 * 0.5,
        )
    }

    pub fn center(&self) -> Point {
        let half = self.size() as f32 * 0.5;
        Point::new(half, half)
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }

    pub fn speedometer_width(&self) -> f32 {
        self.speedometer_width
    }

    pub fn set_speedometer_width(&mut self, width: f32) {
        if width != self.speedometer_width {
            self.speedometer_width = width.max(0.0);
            self.invalidate_gauge();
        }
    }

    // ------------------------------------------------------------------
    // Range & speed
    // ------------------------------------------------------------------

    pub fn min_speed(&self) -> f32 {
        self.min_speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn set_min_max_speed(&mut self, min: f32, max: f32) -> Result<()> {
        check_speed_range(min, max)?;
        if (min, max) != (self.min_speed, self.max_speed) {
            self.min_speed = min;
            self.max_speed = max;
            self.speed = self.speed.clamp(min, max);
            self.target_speed = self.target_speed.clamp(min, max);
            self.invalidate_gauge();
        }
        Ok(())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Jumps to `speed`, clamped to the range.
    pub fn set_speed(&mut self, speed: f32) {
        let speed = speed.clamp(self.min_speed, self.max_speed);
        self.speed = speed;
        self.target_speed = speed;
    }

    /// Starts moving toward `speed`; see [`Speedometer::tick`].
    pub fn speed_to(&mut self, speed: f32) {
        self.target_speed = speed.clamp(self.min_speed, self.max_speed);
    }

    /// Advances the speed animation one frame. Returns true while moving.
    pub fn tick(&mut self) -> bool {
        if self.speed == self.target_speed {
            return false;
        }
        let next = lerp(self.speed, self.target_speed, self.lerp_factor);
        self.speed = if (self.target_speed - next).abs() < SPEED_EPSILON {
            self.target_speed
        } else {
            next
        };
        true
    }

    pub fn start_degree(&self) -> i32 {
        self.start_degree
    }

    pub fn end_degree(&self) -> i32 {
        self.end_degree
    }

    pub fn set_degrees(&mut self, start: i32, end: i32) -> Result<()> {
        check_degrees(start, end)?;
        if (start, end) != (self.start_degree, self.end_degree) {
            self.start_degree = start;
            self.end_degree = end;
            self.invalidate_gauge();
        }
        Ok(())
    }

    pub fn set_start_degree(&mut self, start: i32) -> Result<()> {
        self.set_degrees(start, self.end_degree)
    }

    pub fn set_end_degree(&mut self, end: i32) -> Result<()> {
        self.set_degrees(self.start_degree, end)
    }

    pub fn degree_at_speed(&self, speed: f32) -> f32 {
        let fraction = (speed - self.min_speed) / (self.max_speed - self.min_speed);
        self.start_degree as f32 + (self.end_degree - self.start_degree) as f32 * fraction
    }

    /// Degree the indicator currently points at.
    pub fn degree(&self) -> f32 {
        self.degree_at_speed(self.speed)
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    pub fn tick_number(&self) -> usize {
        self.tick_number
    }

    pub fn set_tick_number(&mut self, tick_number: usize) {
        if tick_number != self.tick_number {
            self.tick_number = tick_number;
            self.invalidate_gauge();
        }
    }

    /// Label values, evenly spread from min to max.
    pub fn ticks(&self) -> Vec<f32> {
        match self.tick_number {
            0 => Vec::new(),
            1 => vec![self.min_speed],
            n => {
                let step = (self.max_speed - self.min_speed) / (n - 1) as f32;
                (0..n).map(|i| self.min_speed + step * i as f32).collect()
            }
        }
    }

    // ------------------------------------------------------------------
    // Sections & style
    // ------------------------------------------------------------------

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Replaces the sections. Their offsets must add up to 1.
    pub fn set_sections(&mut self, sections: Vec<Section>) -> Result<()> {
        check_sections(&sections)?;
        self.sections = sections;
        self.invalidate_gauge();
        Ok(())
    }

    /// Recolors one section. Returns false when `index` is out of range.
    pub fn set_section_color(&mut self, index: usize, color: Color) -> bool {
        match self.sections.get_mut(index) {
            Some(section) => {
                section.color = color;
                self.invalidate_gauge();
                true
            }
            None => false,
        }
    }

    pub fn set_sections_style(&mut self, style: SectionStyle) {
        self.sections.iter_mut().for_each(|s| s.style = style);
        self.invalidate_gauge();
    }

    pub fn mark_color(&self) -> Color {
        self.mark_color
    }

    pub fn set_mark_color(&mut self, color: Color) {
        if color != self.mark_color {
            self.mark_color = color;
            self.invalidate_gauge();
        }
    }

    pub fn background_circle_color(&self) -> Color {
        self.background_circle_color
    }

    pub fn set_background_circle_color(&mut self, color: Color) {
        if color != self.background_circle_color {
            self.background_circle_color = color;
            self.invalidate_gauge();
        }
    }

    pub fn text_color(&self) -> Color {
        self.text_paint.color
    }

    pub fn set_text_color(&mut self, color: Color) {
        if color != self.text_paint.color {
            self.text_paint.color = color;
            self.invalidate_gauge();
        }
    }

    pub fn set_speed_text_color(&mut self, color: Color) {
        self.speed_text_paint.color = color;
    }

    pub fn set_unit_text_color(&mut self, color: Color) {
        self.unit_text_paint.color = color;
    }

    pub fn typeface(&self) -> Option<&Typeface> {
        self.typeface.as_deref()
    }

    pub fn set_typeface(&mut self, typeface: Option<Arc<Typeface>>) {
        self.typeface = typeface;
        self.invalidate_gauge();
    }

    pub fn indicator(&self) -> &dyn Indicator {
        self.indicator.as_ref()
    }

    pub fn indicator_mut(&mut self) -> &mut dyn Indicator {
        self.indicator.as_mut()
    }

    /// Replaces the indicator, keeping the current color.
    pub fn set_indicator(&mut self, kind: IndicatorKind) {
        let color = self.indicator.color();
        self.indicator = kind.create(self.density);
        self.indicator.set_color(color);
    }

    // ------------------------------------------------------------------
    // Background cache
    // ------------------------------------------------------------------

    /// Schedules a background rebuild before the next frame.
    pub fn invalidate_gauge(&mut self) {
        self.background_dirty = true;
    }

    pub fn is_background_dirty(&self) -> bool {
        self.background_dirty
    }

    pub fn background(&self) -> Option<&Bitmap> {
        self.background.as_ref()
    }

    /// Number of background rebuilds so far.
    pub fn background_generation(&self) -> u64 {
        self.generation
    }

    /// A fresh `size x size` layer with the background circle drawn.
    pub(crate) fn create_background_bitmap(&self) -> Bitmap {
        let size = self.size();
        let mut bitmap = Bitmap::new(size, size);
        let half = size as f32 * 0.5;
        Canvas::new(&mut bitmap).draw_circle(half, half, half, &Paint::fill(self.background_circle_color));
        bitmap
    }

    pub(crate) fn store_background(&mut self, bitmap: Bitmap) {
        self.background = Some(bitmap);
        self.background_dirty = false;
        self.generation += 1;
    }

    // ------------------------------------------------------------------
    // Shared drawing
    // ------------------------------------------------------------------

    fn label_radius(&self, inset: f32) -> f32 {
        self.size() as f32 * 0.5 - self.padding - self.speedometer_width - inset - self.text_paint.size * 0.5
    }

    /// Label text and center point for each label, `inset` pixels inside
    /// the ring: one per tick, or min and max when there are no ticks.
    pub fn label_anchors(&self, inset: f32) -> Vec<(String, Point)> {
        let values: Vec<(f32, f32)> = if self.tick_number > 0 {
            self.ticks()
                .into_iter()
                .map(|v| (v, self.degree_at_speed(v)))
                .collect()
        } else {
            vec![
                (self.min_speed, self.start_degree as f32),
                (self.max_speed, self.end_degree as f32),
            ]
        };
        let radius = self.label_radius(inset);
        values
            .into_iter()
            .map(|(value, degree)| {
                let text = format!("{}", value.round() as i64);
                (text, self.center().polar(radius, degree))
            })
            .collect()
    }

    /// Draws the labels from [`Speedometer::label_anchors`] centered on
    /// their anchors. Needs a typeface.
    pub fn draw_labels(&self, canvas: &mut Canvas, inset: f32) {
        let Some(face) = self.typeface() else {
            return;
        };
        let mut paint = self.text_paint;
        paint.align = TextAlign::Center;
        for (text, at) in self.label_anchors(inset) {
            let m = face.measure(&text, paint.size);
            face.draw(canvas, &text, at.x, at.y + (m.ascent - m.descent) * 0.5, &paint);
        }
    }

    pub fn speed_text(&self) -> String {
        format!("{:.*}", self.speed_text_decimals, self.speed)
    }

    fn unit_gap(&self) -> f32 {
        self.dp_to_px(2.0)
    }

    /// Baseline-left origins of the speed and unit text.
    pub fn speed_unit_origins(&self) -> (Point, Point) {
        let face = self.typeface();
        let speed = measure_text(face, &self.speed_text(), self.speed_text_paint.size);
        let unit = measure_text(face, &self.unit, self.unit_text_paint.size);
        let total = speed.width + self.unit_gap() + unit.width;
        let left = self.size() as f32 * 0.5 - total * 0.5;
        let baseline = self.size() as f32 - self.padding - speed.descent.max(unit.descent);
        (
            Point::new(left, baseline),
            Point::new(left + speed.width + self.unit_gap(), baseline),
        )
    }

    /// Bounds of the speed value followed by the unit, centered at the
    /// bottom of the gauge.
    pub fn speed_unit_text_bounds(&self) -> RectF {
        let face = self.typeface();
        let (speed_at, unit_at) = self.speed_unit_origins();
        let speed = text_bounds(face, &self.speed_text(), speed_at.x, speed_at.y, &self.speed_text_paint);
        let unit = text_bounds(face, &self.unit, unit_at.x, unit_at.y, &self.unit_text_paint);
        speed.union(&unit)
    }

    pub fn draw_speed_unit_text(&self, canvas: &mut Canvas) {
        let Some(face) = self.typeface() else {
            return;
        };
        let (speed_at, unit_at) = self.speed_unit_origins();
        face.draw(canvas, &self.speed_text(), speed_at.x, speed_at.y, &self.speed_text_paint);
        face.draw(canvas, &self.unit, unit_at.x, unit_at.y, &self.unit_text_paint);
    }

    pub fn indicator_context(&self) -> IndicatorContext {
        IndicatorContext {
            center: self.center(),
            padding: self.padding,
            speedometer_width: self.speedometer_width,
        }
    }

    pub fn draw_indicator(&self, canvas: &mut Canvas) {
        self.indicator.draw(canvas, self.degree(), &self.indicator_context());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> Speedometer {
        Speedometer::new(GaugeConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let config = GaugeConfig::builder().min_speed(10.0).max_speed(10.0).build();
        assert!(matches!(
            Speedometer::new(config),
            Err(GaugeError::InvalidSpeedRange { .. })
        ));
        let mut g = gauge();
        assert!(g.set_degrees(200, 100).is_err());
        assert!(g.set_degrees(0, 361).is_err());
        assert!(g.set_degrees(-10, 100).is_err());
        assert!(g.set_degrees(90, 450).is_ok());
        assert_eq!((g.start_degree(), g.end_degree()), (90, 450));
    }

    #[test]
    fn test_rejects_sections_that_do_not_tile_the_range() {
        let mut g = gauge();
        let overlapping = vec![
            Section::new(0.7, Color::WHITE, SectionStyle::Butt),
            Section::new(0.7, Color::BLACK, SectionStyle::Butt),
        ];
        assert!(matches!(
            g.set_sections(overlapping.clone()),
            Err(GaugeError::InvalidSections { .. })
        ));
        assert_eq!(g.sections().len(), 3);

        let short = vec![Section::new(0.5, Color::WHITE, SectionStyle::Butt)];
        assert!(g.set_sections(short).is_err());

        let config = GaugeConfig::builder().sections(overlapping).build();
        assert!(matches!(
            Speedometer::new(config),
            Err(GaugeError::InvalidSections { .. })
        ));

        let halves = vec![
            Section::new(0.5, Color::WHITE, SectionStyle::Butt),
            Section::new(0.5, Color::BLACK, SectionStyle::Round),
        ];
        assert!(g.set_sections(halves).is_ok());
        assert!(g.set_sections(Vec::new()).is_ok());
    }

    #[test]
    fn test_section_color_by_index() {
        let mut g = gauge();
        g.store_background(Bitmap::new(1, 1));
        assert!(g.set_section_color(1, Color::BLACK));
        assert_eq!(g.sections()[1].color, Color::BLACK);
        assert!(g.is_background_dirty());
        assert!(!g.set_section_color(3, Color::BLACK));
    }

    fn anchor_degree(g: &Speedometer, at: Point) -> f32 {
        let c = g.center();
        (at.y - c.y).atan2(at.x - c.x).to_degrees().rem_euclid(360.0)
    }

    #[test]
    fn test_tick_label_anchors() {
        let mut g = gauge();
        g.set_size(200, 200);
        g.set_tick_number(5);
        let anchors = g.label_anchors(0.0);
        let texts: Vec<&str> = anchors.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["0", "25", "50", "75", "100"]);
        // ring inner edge at 70, half the label size inside it
        for ((_, at), expected) in anchors.iter().zip([135.0, 202.5, 270.0, 337.5, 45.0]) {
            assert!((anchor_degree(&g, *at) - expected).abs() < 1e-2);
            assert!((at.distance(g.center()) - 65.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_min_max_label_anchors() {
        let mut g = gauge();
        g.set_size(200, 200);
        let anchors = g.label_anchors(4.0);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].0, "0");
        assert_eq!(anchors[1].0, "100");
        assert!((anchor_degree(&g, anchors[0].1) - 135.0).abs() < 1e-2);
        assert!((anchor_degree(&g, anchors[1].1) - 45.0).abs() < 1e-2);
        assert!((anchors[0].1.distance(g.center()) - 61.0).abs() < 1e-3);
    }

    #[test]
    fn test_unit_follows_speed_on_one_baseline() {
        let mut g = gauge();
        g.set_size(200, 200);
        let (speed_at, unit_at) = g.speed_unit_origins();
        // "0.0" at 18 px, estimated 0.6 * 18 per char, then a 2 px gap
        assert!((unit_at.x - speed_at.x - (3.0 * 0.6 * 18.0 + 2.0)).abs() < 1e-3);
        assert_eq!(unit_at.y, speed_at.y);
        assert!(speed_at.y < 200.0);
    }

    #[test]
    fn test_degree_at_speed() {
        let g = gauge();
        assert_eq!(g.degree_at_speed(0.0), 135.0);
        assert_eq!(g.degree_at_speed(50.0), 270.0);
        assert_eq!(g.degree_at_speed(100.0), 405.0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut g = gauge();
        g.set_speed(140.0);
        assert_eq!(g.speed(), 100.0);
        g.speed_to(-5.0);
        assert_eq!(g.target_speed(), 0.0);
    }

    #[test]
    fn test_tick_converges_to_target() {
        let mut g = gauge();
        g.speed_to(80.0);
        let mut frames = 0;
        while g.tick() {
            frames += 1;
            assert!(frames < 1000, "animation never settled");
        }
        assert_eq!(g.speed(), 80.0);
        assert!(!g.tick());
    }

    #[test]
    fn test_ticks_spread_over_range() {
        let mut g = gauge();
        assert!(g.ticks().is_empty());
        g.set_tick_number(5);
        assert_eq!(g.ticks(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        g.set_tick_number(1);
        assert_eq!(g.ticks(), vec![0.0]);
    }

    #[test]
    fn test_size_and_translation() {
        let mut g = gauge();
        assert!(g.set_size(300, 200));
        assert!(!g.set_size(300, 200));
        assert_eq!(g.size(), 200);
        assert_eq!(g.translation(), (50.0, 0.0));
        g.set_padding(10.0);
        assert_eq!(g.view_size_pa(), 180.0);
    }

    #[test]
    fn test_setters_mark_background_dirty() {
        let mut g = gauge();
        g.store_background(Bitmap::new(1, 1));
        assert!(!g.is_background_dirty());
        g.set_mark_color(Color::BLACK);
        assert!(g.is_background_dirty());

        g.store_background(Bitmap::new(1, 1));
        g.set_speed(30.0);
        assert!(!g.is_background_dirty());
        g.set_sections_style(SectionStyle::Round);
        assert!(g.is_background_dirty());
        assert_eq!(g.background_generation(), 2);
    }

    #[test]
    fn test_readout_bounds_are_centered_at_bottom() {
        let mut g = gauge();
        g.set_size(200, 200);
        g.set_speed(42.0);
        assert_eq!(g.speed_text(), "42.0");
        let r = g.speed_unit_text_bounds();
        assert!((r.center().x - 100.0).abs() < 1e-3);
        assert!(r.bottom <= 200.0 + 1e-3);
        assert!(r.width() > 0.0);
    }

    #[test]
    fn test_attributes_override_and_fall_back() {
        let attrs = AttributeSet::from_toml_str(
            r##"
max_speed = 220
unit = "mph"
tick_number = 12
start_degree = 500
indicator = 3
indicator_color = "#123456"
"##,
        )
        .unwrap();
        let mut g = gauge();
        g.apply_attributes(&attrs);
        assert_eq!(g.max_speed(), 220.0);
        assert_eq!(g.unit(), "mph");
        assert_eq!(g.tick_number(), 12);
        // start beyond end: kept
        assert_eq!(g.start_degree(), 135);
        assert_eq!(g.indicator().color(), Color::new(0x12, 0x34, 0x56));
        assert_eq!(g.indicator().width(), 5.0);
    }
}
