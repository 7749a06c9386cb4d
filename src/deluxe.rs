//! The deluxe speedometer: colored section arcs, glowing tick marks, a
//! small indicator and a center circle.

use crate::attrs::AttributeSet;
use crate::canvas::{Bitmap, Canvas, Path};
use crate::color::Color;
use crate::config::GaugeConfig;
use crate::error::Result;
use crate::geometry::{layout_sections, round_cap_angle, RectF, SectionArc};
use crate::indicator::IndicatorKind;
use crate::paint::{BlurMaskFilter, Cap, Paint};
use crate::section::{Section, SectionStyle};
use crate::speedometer::Speedometer;

pub const MARK_BLUR_RADIUS: f32 = 5.0;
pub const SPEED_BACKGROUND_BLUR_RADIUS: f32 = 8.0;
pub const CENTER_CIRCLE_BLUR_RADIUS: f32 = 10.0;

/// Share of the angular range between two large marks.
const MARK_STEP_FACTOR: f32 = 0.111;
/// Fixed angle between two small marks.
const SMALL_MARK_STEP: f32 = 10.0;
const SMALL_MARK_STROKE: f32 = 3.0;

/// How many times a mark is stamped when stepping from `start` by `step`
/// while staying below `limit`. Mirrors the rotate-then-stamp loop, so the
/// first mark sits one step past `start`.
fn stamp_count(start: f32, limit: f32, step: f32) -> usize {
    if step <= 0.0 {
        return 0;
    }
    let mut count = 0;
    let mut i = start;
    while i < limit {
        count += 1;
        i += step;
    }
    count
}

#[derive(Debug)]
pub struct DeluxeSpeedView {
    gauge: Speedometer,

    mark_path: Path,
    small_mark_path: Path,
    circle_paint: Paint,
    speedometer_paint: Paint,
    mark_paint: Paint,
    small_mark_paint: Paint,
    speed_background_paint: Paint,
    speedometer_rect: RectF,

    with_effects: bool,
    center_circle_radius: f32,

    // Layout of the last background pass
    section_arcs: Vec<SectionArc>,
    round_angle: f32,
    mark_length: f32,
    small_mark_length: f32,
    mark_stamps: usize,
    small_mark_stamps: usize,
}

impl Default for DeluxeSpeedView {
    fn default() -> Self {
        Self::new()
    }
}

impl DeluxeSpeedView {
    /// Gauge defaults for the deluxe look: white text on a dark dial.
    pub fn default_config() -> GaugeConfig {
        GaugeConfig::builder()
            .text_color(Color::WHITE)
            .speed_text_color(Color::WHITE)
            .unit_text_color(Color::WHITE)
            .background_circle_color(Color::from_argb(0xff212121))
            .sections(vec![
                Section::new(0.6, Color::from_argb(0xff37872f), SectionStyle::Butt),
                Section::new(0.27, Color::from_argb(0xffa38234), SectionStyle::Butt),
                Section::new(0.13, Color::from_argb(0xff9b2020), SectionStyle::Butt),
            ])
            .indicator(IndicatorKind::NormalSmall)
            .indicator_color(Color::from_argb(0xff00ffec))
            .build()
    }

    pub fn new() -> Self {
        Self::from_gauge(Speedometer::from_checked(Self::default_config()))
    }

    pub fn with_config(config: GaugeConfig) -> Result<Self> {
        Ok(Self::from_gauge(Speedometer::new(config)?))
    }

    /// Builds from `config`, then overrides it with `attrs`.
    pub fn with_attributes(config: GaugeConfig, attrs: &AttributeSet) -> Result<Self> {
        let mut view = Self::with_config(config)?;
        view.apply_attributes(attrs);
        Ok(view)
    }

    fn from_gauge(gauge: Speedometer) -> Self {
        let center_circle_radius = gauge.dp_to_px(20.0);
        let mut view = Self {
            gauge,
            mark_path: Path::new(),
            small_mark_path: Path::new(),
            circle_paint: Paint::fill(Color::from_argb(0xffe0e0e0)),
            speedometer_paint: Paint::stroke(Color::WHITE, 1.0),
            mark_paint: Paint::stroke(Color::WHITE, 1.0),
            small_mark_paint: Paint::stroke(Color::WHITE, SMALL_MARK_STROKE),
            speed_background_paint: Paint::fill(Color::WHITE),
            speedometer_rect: RectF::default(),
            with_effects: true,
            center_circle_radius,
            section_arcs: Vec::new(),
            round_angle: 0.0,
            mark_length: 0.0,
            small_mark_length: 0.0,
            mark_stamps: 0,
            small_mark_stamps: 0,
        };
        view.set_with_effects(true);
        view
    }

    /// Reads the deluxe style options on top of the gauge-wide ones.
    /// Absent or malformed values keep the current state.
    pub fn apply_attributes(&mut self, attrs: &AttributeSet) {
        self.gauge.apply_attributes(attrs);
        self.speed_background_paint.color =
            attrs.get_color("speed_background_color", self.speed_background_paint.color);
        let with_effects = attrs.get_bool("with_effects", self.with_effects);
        self.circle_paint.color = attrs.get_color("center_circle_color", self.circle_paint.color);
        self.set_center_circle_radius(attrs.get_dimension(
            "center_circle_radius",
            self.center_circle_radius,
            self.gauge.density(),
        ));
        let style_index = attrs.get_int("section_style", -1);
        if style_index != -1 {
            match SectionStyle::from_index(style_index) {
                Some(style) => self.gauge.set_sections_style(style),
                None => tracing::warn!(style_index, "section style index out of range, ignored"),
            }
        }
        self.set_with_effects(with_effects);
    }

    // ------------------------------------------------------------------
    // Style setters
    // ------------------------------------------------------------------

    pub fn gauge(&self) -> &Speedometer {
        &self.gauge
    }

    /// Mutable access to the base gauge. Its setters invalidate the
    /// background themselves.
    pub fn gauge_mut(&mut self) -> &mut Speedometer {
        &mut self.gauge
    }

    pub fn is_with_effects(&self) -> bool {
        self.with_effects
    }

    pub fn set_with_effects(&mut self, with_effects: bool) {
        tracing::trace!(with_effects, "effects toggled");
        self.with_effects = with_effects;
        self.gauge.indicator_mut().with_effects(with_effects);
        let blur = |radius: f32| with_effects.then(|| BlurMaskFilter::new(radius));
        self.mark_paint.mask_filter = blur(MARK_BLUR_RADIUS);
        self.speed_background_paint.mask_filter = blur(SPEED_BACKGROUND_BLUR_RADIUS);
        self.circle_paint.mask_filter = blur(CENTER_CIRCLE_BLUR_RADIUS);
        self.gauge.invalidate_gauge();
    }

    pub fn speed_background_color(&self) -> Color {
        self.speed_background_paint.color
    }

    pub fn set_speed_background_color(&mut self, color: Color) {
        self.speed_background_paint.color = color;
        self.gauge.invalidate_gauge();
    }

    pub fn center_circle_color(&self) -> Color {
        self.circle_paint.color
    }

    /// Only the frame overlay changes; the background stays cached.
    pub fn set_center_circle_color(&mut self, color: Color) {
        self.circle_paint.color = color;
    }

    pub fn center_circle_radius(&self) -> f32 {
        self.center_circle_radius
    }

    pub fn set_center_circle_radius(&mut self, radius: f32) {
        self.center_circle_radius = radius.max(0.0);
    }

    /// Replaces the indicator, carrying the effects state over.
    pub fn set_indicator(&mut self, kind: IndicatorKind) {
        self.gauge.set_indicator(kind);
        self.gauge.indicator_mut().with_effects(self.with_effects);
    }

    pub fn mark_paint(&self) -> &Paint {
        &self.mark_paint
    }

    pub fn speed_background_paint(&self) -> &Paint {
        &self.speed_background_paint
    }

    pub fn circle_paint(&self) -> &Paint {
        &self.circle_paint
    }

    // ------------------------------------------------------------------
    // Layout of the last background pass
    // ------------------------------------------------------------------

    pub fn section_arcs(&self) -> &[SectionArc] {
        &self.section_arcs
    }

    /// Round-cap correction used for the last background, in degrees.
    pub fn round_angle(&self) -> f32 {
        self.round_angle
    }

    pub fn mark_length(&self) -> f32 {
        self.mark_length
    }

    pub fn small_mark_length(&self) -> f32 {
        self.small_mark_length
    }

    /// Large and small marks stamped in the last background.
    pub fn mark_stamps(&self) -> (usize, usize) {
        (self.mark_stamps, self.small_mark_stamps)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Resizes the view and rebuilds the background right away.
    pub fn set_size(&mut self, width: usize, height: usize) {
        if self.gauge.set_size(width, height) {
            self.update_background_bitmap();
        }
    }

    /// Advances the speed animation. Returns true while the needle moves.
    pub fn tick(&mut self) -> bool {
        self.gauge.tick()
    }

    fn init_draw(&mut self) {
        self.speedometer_paint.stroke_width = self.gauge.speedometer_width();
        self.mark_paint.color = self.gauge.mark_color();
        self.small_mark_paint.color = self.gauge.mark_color();
    }

    /// Redraws the cached background layer: section arcs, marks and labels.
    pub fn update_background_bitmap(&mut self) {
        let mut bitmap = self.gauge.create_background_bitmap();
        self.init_draw();

        let size = self.gauge.size() as f32;
        let half = size * 0.5;
        let padding = self.gauge.padding();
        let width = self.gauge.speedometer_width();
        let view_size_pa = self.gauge.view_size_pa();

        self.small_mark_length = view_size_pa / 20.0;
        self.small_mark_path.move_to(half, width + padding);
        self.small_mark_path
            .line_to(half, width + padding + self.small_mark_length);
        self.small_mark_paint.stroke_width = SMALL_MARK_STROKE;

        self.mark_length = view_size_pa / 28.0;
        self.mark_path.move_to(half, padding);
        self.mark_path.line_to(half, self.mark_length + padding);
        self.mark_paint.stroke_width = self.mark_length / 3.0;

        let risk = width * 0.5 + padding;
        self.speedometer_rect = RectF::new(risk, risk, size - risk, size - risk);
        self.round_angle = round_cap_angle(width, self.speedometer_rect.width());

        let start = self.gauge.start_degree() as f32;
        let end = self.gauge.end_degree() as f32;
        self.section_arcs = layout_sections(self.gauge.sections(), start, end, self.round_angle);

        let mut c = Canvas::new(&mut bitmap);
        for (arc, section) in self.section_arcs.iter().zip(self.gauge.sections()) {
            self.speedometer_paint.color = section.color;
            self.speedometer_paint.cap = match arc.style {
                SectionStyle::Round => Cap::Round,
                SectionStyle::Butt => Cap::Butt,
            };
            c.draw_arc(
                self.speedometer_rect,
                arc.draw_start,
                arc.draw_sweep,
                &self.speedometer_paint,
            );
        }

        let every = (end - start) * MARK_STEP_FACTOR;
        self.mark_stamps = stamp_count(start, end - 2.0 * every, every);
        c.save();
        c.rotate(90.0 + start, half, half);
        for _ in 0..self.mark_stamps {
            c.rotate(every, half, half);
            c.draw_path(&self.mark_path, &self.mark_paint);
        }
        c.restore();

        self.small_mark_stamps = stamp_count(start, end - SMALL_MARK_STEP, SMALL_MARK_STEP);
        c.save();
        c.rotate(90.0 + start, half, half);
        for _ in 0..self.small_mark_stamps {
            c.rotate(SMALL_MARK_STEP, half, half);
            c.draw_path(&self.small_mark_path, &self.small_mark_paint);
        }
        c.restore();

        let label_inset = self.small_mark_length + self.gauge.dp_to_px(3.0);
        self.gauge.draw_labels(&mut c, label_inset);

        self.gauge.store_background(bitmap);
        tracing::debug!(
            size = self.gauge.size(),
            generation = self.gauge.background_generation(),
            sections = self.section_arcs.len(),
            "background bitmap rebuilt"
        );
    }

    /// Rectangle behind the speed readout.
    pub fn speed_background_rect(&self) -> RectF {
        let mut rect = self.gauge.speed_unit_text_bounds();
        rect.left -= 2.0;
        rect.right += 2.0;
        rect.bottom += 2.0;
        rect
    }

    /// Draws one frame into `frame`, rebuilding the background first if
    /// anything it depends on changed.
    pub fn draw(&mut self, frame: &mut Bitmap) {
        if self.gauge.is_background_dirty() {
            self.update_background_bitmap();
        }
        let size = self.gauge.size() as f32;
        let (dx, dy) = self.gauge.translation();
        let mut canvas = Canvas::new(frame);
        canvas.translate(dx, dy);
        if let Some(background) = self.gauge.background() {
            canvas.draw_bitmap(background, 0.0, 0.0);
        }

        canvas.draw_rect(self.speed_background_rect(), &self.speed_background_paint);
        self.gauge.draw_speed_unit_text(&mut canvas);
        self.gauge.draw_indicator(&mut canvas);
        canvas.draw_circle(size * 0.5, size * 0.5, self.center_circle_radius, &self.circle_paint);
    }

    /// Renders a frame of the view's size over a transparent background.
    pub fn render(&mut self) -> Bitmap {
        let mut frame = Bitmap::new(self.gauge.width(), self.gauge.height());
        self.draw(&mut frame);
        frame
    }
}
