//! Needle drawing strategies.
//!
//! Every indicator is drawn pointing straight up from the gauge center and
//! then placed by rotating the canvas, the same way tick marks are stamped.

use std::fmt;

use crate::canvas::{Canvas, Path};
use crate::color::Color;
use crate::geometry::Point;
use crate::paint::{BlurMaskFilter, Cap, Paint};

/// Blur radius applied to an indicator while effects are on.
pub const INDICATOR_BLUR_RADIUS: f32 = 15.0;

const DEFAULT_INDICATOR_COLOR: Color = Color::from_argb(0xff2196f3);

/// Gauge measurements an indicator lays itself out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorContext {
    pub center: Point,
    pub padding: f32,
    pub speedometer_width: f32,
}

impl IndicatorContext {
    /// Y of the inner edge of the gauge ring, above the center.
    fn ring_inner_top(&self) -> f32 {
        self.padding + self.speedometer_width
    }
}

pub trait Indicator: fmt::Debug + Send {
    fn paint(&self) -> &Paint;
    fn paint_mut(&mut self) -> &mut Paint;

    /// Width of the needle body in pixels.
    fn width(&self) -> f32;
    fn set_width(&mut self, width: f32);

    /// Draws the indicator pointing straight up from `ctx.center`.
    fn draw_upright(&self, canvas: &mut Canvas, ctx: &IndicatorContext);

    fn color(&self) -> Color {
        self.paint().color
    }

    fn set_color(&mut self, color: Color) {
        self.paint_mut().color = color;
    }

    fn with_effects(&mut self, effects: bool) {
        self.paint_mut().mask_filter = effects.then(|| BlurMaskFilter::new(INDICATOR_BLUR_RADIUS));
    }

    fn has_effects(&self) -> bool {
        self.paint().mask_filter.is_some()
    }

    /// Draws the indicator pointing along `degree`.
    fn draw(&self, canvas: &mut Canvas, degree: f32, ctx: &IndicatorContext) {
        canvas.save();
        canvas.rotate(90.0 + degree, ctx.center.x, ctx.center.y);
        self.draw_upright(canvas, ctx);
        canvas.restore();
    }
}

/// Built-in indicator shapes, in style-attribute index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorKind {
    None,
    Normal,
    #[default]
    NormalSmall,
    Needle,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::None,
        IndicatorKind::Normal,
        IndicatorKind::NormalSmall,
        IndicatorKind::Needle,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn create(self, density: f32) -> Box<dyn Indicator> {
        match self {
            IndicatorKind::None => Box::new(NoIndicator::default()),
            IndicatorKind::Normal => Box::new(TriangleIndicator::normal(density)),
            IndicatorKind::NormalSmall => Box::new(TriangleIndicator::small(density)),
            IndicatorKind::Needle => Box::new(NeedleIndicator::new(density)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoIndicator {
    paint: Paint,
}

impl Indicator for NoIndicator {
    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn width(&self) -> f32 {
        0.0
    }

    fn set_width(&mut self, _width: f32) {}

    fn draw_upright(&self, _canvas: &mut Canvas, _ctx: &IndicatorContext) {}
}

/// Filled wedge from the center toward the ring.
#[derive(Debug, Clone)]
pub struct TriangleIndicator {
    paint: Paint,
    width: f32,
    /// Fraction of the center-to-ring distance the tip reaches.
    reach: f32,
}

impl TriangleIndicator {
    pub fn normal(density: f32) -> Self {
        Self {
            paint: Paint::fill(DEFAULT_INDICATOR_COLOR),
            width: 12.0 * density,
            reach: 1.0,
        }
    }

    pub fn small(density: f32) -> Self {
        Self {
            reach: 0.65,
            ..Self::normal(density)
        }
    }
}

impl Indicator for TriangleIndicator {
    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    fn draw_upright(&self, canvas: &mut Canvas, ctx: &IndicatorContext) {
        let c = ctx.center;
        let tip = c.y - (c.y - ctx.ring_inner_top()) * self.reach;
        let half = self.width * 0.5;
        let mut path = Path::new();
        path.move_to(c.x, tip);
        path.line_to(c.x + half, c.y);
        path.line_to(c.x - half, c.y);
        path.close();
        canvas.draw_path(&path, &self.paint);
    }
}

/// Thin round-capped line reaching into the middle of the ring.
#[derive(Debug, Clone)]
pub struct NeedleIndicator {
    paint: Paint,
}

impl NeedleIndicator {
    pub fn new(density: f32) -> Self {
        let mut paint = Paint::stroke(DEFAULT_INDICATOR_COLOR, 5.0 * density);
        paint.cap = Cap::Round;
        Self { paint }
    }
}

impl Indicator for NeedleIndicator {
    fn paint(&self) -> &Paint {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    fn width(&self) -> f32 {
        self.paint.stroke_width
    }

    fn set_width(&mut self, width: f32) {
        self.paint.stroke_width = width;
    }

    fn draw_upright(&self, canvas: &mut Canvas, ctx: &IndicatorContext) {
        let c = ctx.center;
        let tip = Point::new(c.x, ctx.padding + ctx.speedometer_width * 0.5);
        canvas.draw_line(c, tip, &self.paint);
    }
}
