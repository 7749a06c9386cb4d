use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cap {
    #[default]
    Butt,
    Round,
}

/// Blur applied to a shape's coverage before it is composited.
///
/// The shape itself stays solid; only the halo outside it is soft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurMaskFilter {
    pub radius: f32,
}

impl BlurMaskFilter {
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Standard deviation used for a blur of `radius`.
    pub fn sigma(&self) -> f32 {
        if self.radius > 0.0 {
            self.radius * 0.57735 + 0.5
        } else {
            0.0
        }
    }

    /// How far the halo reaches outside the shape, in pixels.
    pub fn extent(&self) -> f32 {
        (self.sigma() * 3.0).ceil()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub color: Color,
    pub style: PaintStyle,
    pub stroke_width: f32,
    pub cap: Cap,
    pub mask_filter: Option<BlurMaskFilter>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: PaintStyle::Fill,
            stroke_width: 1.0,
            cap: Cap::Butt,
            mask_filter: None,
        }
    }
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn blur_radius(&self) -> Option<f32> {
        self.mask_filter.map(|f| f.radius)
    }
}
