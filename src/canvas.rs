//! Software raster target and the drawing primitives the gauge needs.
//!
//! Shapes are rasterized by analytic coverage at pixel centers and blended
//! source-over into an RGBA8 [`Bitmap`]. A [`Canvas`] wraps a bitmap with a
//! rigid transform stack so a pre-built path can be stamped at many
//! rotations instead of recomputing its endpoints.

use crate::color::Color;
use crate::geometry::{Point, RectF};
use crate::paint::{Cap, Paint, PaintStyle};

// ============================================================================
// BITMAP
// ============================================================================

/// RGBA8 pixel buffer, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = &self.data[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Copies the pixels into a frame of the same dimensions, such as a
    /// `pixels` surface. Extra bytes on either side are left untouched.
    pub fn copy_to_frame(&self, frame: &mut [u8]) {
        let n = frame.len().min(self.data.len());
        frame[..n].copy_from_slice(&self.data[..n]);
    }

    fn blend(&mut self, x: usize, y: usize, color: Color, alpha: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let sa = color.a as f32 / 255.0 * alpha.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let idx = (y * self.width + x) * 4;
        let dst = &mut self.data[idx..idx + 4];
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        let out = [
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ];
        dst.copy_from_slice(&out);
    }
}

// ============================================================================
// PATH
// ============================================================================

/// A single open or closed polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    points: Vec<Point>,
    closed: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.points.clear();
        self.closed = false;
    }

    /// Starts the contour over at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.reset();
        self.points.push(Point::new(x, y));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.points.push(Point::new(x, y));
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ============================================================================
// TRANSFORM
// ============================================================================

/// Rotation followed by translation. Rigid, so stroke widths survive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    cos: f32,
    sin: f32,
    tx: f32,
    ty: f32,
    degrees: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        cos: 1.0,
        sin: 0.0,
        tx: 0.0,
        ty: 0.0,
        degrees: 0.0,
    };

    fn rotation(degrees: f32, px: f32, py: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            cos,
            sin,
            tx: px - (cos * px - sin * py),
            ty: py - (sin * px + cos * py),
            degrees,
        }
    }

    fn translation(dx: f32, dy: f32) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    /// `self` applied after `inner`.
    fn then(&self, inner: &Transform) -> Transform {
        Transform {
            cos: self.cos * inner.cos - self.sin * inner.sin,
            sin: self.sin * inner.cos + self.cos * inner.sin,
            tx: self.cos * inner.tx - self.sin * inner.ty + self.tx,
            ty: self.sin * inner.tx + self.cos * inner.ty + self.ty,
            degrees: self.degrees + inner.degrees,
        }
    }

    pub fn map(&self, p: Point) -> Point {
        Point::new(
            self.cos * p.x - self.sin * p.y + self.tx,
            self.sin * p.x + self.cos * p.y + self.ty,
        )
    }

    /// Accumulated rotation in degrees.
    pub fn degrees(&self) -> f32 {
        self.degrees
    }
}

// ============================================================================
// CANVAS
// ============================================================================

pub struct Canvas<'a> {
    target: &'a mut Bitmap,
    transform: Transform,
    saved: Vec<Transform>,
}

impl<'a> Canvas<'a> {
    pub fn new(target: &'a mut Bitmap) -> Self {
        Self {
            target,
            transform: Transform::IDENTITY,
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.target.width
    }

    pub fn height(&self) -> usize {
        self.target.height
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn clear(&mut self, color: Color) {
        self.target.clear(color);
    }

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(t) => self.transform = t,
            None => tracing::trace!("canvas restore without matching save"),
        }
    }

    /// Rotates subsequent drawing by `degrees` around `(px, py)`.
    pub fn rotate(&mut self, degrees: f32, px: f32, py: f32) {
        self.transform = self.transform.then(&Transform::rotation(degrees, px, py));
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.then(&Transform::translation(dx, dy));
    }

    pub fn draw_line(&mut self, from: Point, to: Point, paint: &Paint) {
        let (a, b) = (self.transform.map(from), self.transform.map(to));
        self.stroke_segment(a, b, paint);
    }

    pub fn draw_path(&mut self, path: &Path, paint: &Paint) {
        let points: Vec<Point> = path.points().iter().map(|&p| self.transform.map(p)).collect();
        match paint.style {
            PaintStyle::Fill if points.len() >= 3 => {
                let bounds = RectF::from_points(&points);
                self.rasterize(bounds, paint, |p| polygon_coverage(p, &points));
            }
            PaintStyle::Fill => {}
            PaintStyle::Stroke => {
                for pair in points.windows(2) {
                    self.stroke_segment(pair[0], pair[1], paint);
                }
                if path.is_closed() && points.len() > 2 {
                    self.stroke_segment(points[points.len() - 1], points[0], paint);
                }
            }
        }
    }

    /// Strokes the arc of the circle inscribed in `oval`.
    ///
    /// Negative sweeps run counter-clockwise; sweeps of 360° or more draw a
    /// full ring.
    pub fn draw_arc(&mut self, oval: RectF, start_angle: f32, sweep_angle: f32, paint: &Paint) {
        let center = self.transform.map(oval.center());
        let radius = oval.width().min(oval.height()) * 0.5;
        let (mut start, mut sweep) = (start_angle + self.transform.degrees(), sweep_angle);
        if sweep < 0.0 {
            start += sweep;
            sweep = -sweep;
        }
        let half = paint.stroke_width * 0.5;
        let reach = radius + half + 1.0;
        let bounds = RectF::new(
            center.x - reach,
            center.y - reach,
            center.x + reach,
            center.y + reach,
        );
        let cap = paint.cap;
        self.rasterize(bounds, paint, |p| {
            arc_coverage(p, center, radius, start, sweep, half, cap)
        });
    }

    pub fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        let center = self.transform.map(Point::new(cx, cy));
        match paint.style {
            PaintStyle::Fill => {
                let bounds = RectF::new(
                    center.x - radius,
                    center.y - radius,
                    center.x + radius,
                    center.y + radius,
                );
                self.rasterize(bounds, paint, |p| disk_coverage(p, center, radius));
            }
            PaintStyle::Stroke => {
                let oval = RectF::new(cx - radius, cy - radius, cx + radius, cy + radius);
                self.draw_arc(oval, 0.0, 360.0, paint);
            }
        }
    }

    /// Fills `rect` (stroke style is not used for rectangles).
    pub fn draw_rect(&mut self, rect: RectF, paint: &Paint) {
        if rect.is_empty() {
            return;
        }
        let corners = [
            Point::new(rect.left, rect.top),
            Point::new(rect.right, rect.top),
            Point::new(rect.right, rect.bottom),
            Point::new(rect.left, rect.bottom),
        ]
        .map(|p| self.transform.map(p));
        let bounds = RectF::from_points(&corners);
        self.rasterize(bounds, paint, |p| polygon_coverage(p, &corners));
    }

    /// Composites `bitmap` with its top-left corner at `(left, top)`.
    /// Only the translation part of the current transform applies.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, left: f32, top: f32) {
        let origin = self.transform.map(Point::new(left, top));
        let (ox, oy) = (origin.x.round() as i64, origin.y.round() as i64);
        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                let (tx, ty) = (ox + x as i64, oy + y as i64);
                if tx < 0 || ty < 0 {
                    continue;
                }
                if let Some(color) = bitmap.pixel(x, y) {
                    self.target.blend(tx as usize, ty as usize, color, 1.0);
                }
            }
        }
    }

    /// Blends one device pixel; used by glyph rendering.
    pub(crate) fn blend_device_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x >= 0 && y >= 0 {
            self.target.blend(x as usize, y as usize, color, alpha);
        }
    }

    fn stroke_segment(&mut self, a: Point, b: Point, paint: &Paint) {
        let half = paint.stroke_width * 0.5;
        let bounds = RectF::from_points(&[a, b]).inset(-half, -half);
        let cap = paint.cap;
        self.rasterize(bounds, paint, |p| segment_coverage(p, a, b, half, cap));
    }

    /// Evaluates `coverage` over the device-space `bounds` (grown by the
    /// blur halo) and blends `paint.color` with it.
    fn rasterize(&mut self, bounds: RectF, paint: &Paint, coverage: impl Fn(Point) -> f32) {
        let blur = paint.mask_filter.filter(|f| f.radius > 0.0);
        let halo = blur.map(|f| f.extent()).unwrap_or(0.0) + 1.0;
        let x0 = ((bounds.left - halo).floor() as i64).max(0);
        let y0 = ((bounds.top - halo).floor() as i64).max(0);
        let x1 = ((bounds.right + halo).ceil() as i64).min(self.target.width as i64);
        let y1 = ((bounds.bottom + halo).ceil() as i64).min(self.target.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let (w, h) = ((x1 - x0) as usize, (y1 - y0) as usize);
        let mut mask = Mask::new(w, h);
        for my in 0..h {
            for mx in 0..w {
                let p = Point::new(
                    (x0 as usize + mx) as f32 + 0.5,
                    (y0 as usize + my) as f32 + 0.5,
                );
                mask.data[my * w + mx] = coverage(p);
            }
        }
        if let Some(filter) = blur {
            mask = mask.solid_blur(filter.sigma());
        }
        for my in 0..h {
            for mx in 0..w {
                let cov = mask.data[my * w + mx];
                if cov > 0.002 {
                    self.target
                        .blend(x0 as usize + mx, y0 as usize + my, paint.color, cov);
                }
            }
        }
    }
}

// ============================================================================
// COVERAGE MASK & BLUR
// ============================================================================

struct Mask {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Mask {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Keeps the shape opaque and adds the blurred halo around it.
    fn solid_blur(self, sigma: f32) -> Mask {
        let radius = box_radius(sigma);
        let mut blurred = self.data.clone();
        for _ in 0..3 {
            blurred = box_blur_pass(&blurred, self.width, self.height, radius, true);
            blurred = box_blur_pass(&blurred, self.width, self.height, radius, false);
        }
        let data = self
            .data
            .iter()
            .zip(blurred)
            .map(|(&orig, soft)| orig.max(soft))
            .collect();
        Mask { data, ..self }
    }
}

/// Box radius whose three passes approximate a gaussian of `sigma`.
fn box_radius(sigma: f32) -> usize {
    let ideal_width = (4.0 * sigma * sigma + 1.0).sqrt();
    (((ideal_width - 1.0) * 0.5).round() as usize).max(1)
}

fn box_blur_pass(src: &[f32], width: usize, height: usize, radius: usize, horizontal: bool) -> Vec<f32> {
    let mut out = vec![0.0; src.len()];
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let index = |line: usize, i: usize| if horizontal { line * width + i } else { i * width + line };
    let norm = 1.0 / (2 * radius + 1) as f32;
    for line in 0..lines {
        let mut sum: f32 = (0..=radius.min(len.saturating_sub(1)))
            .map(|i| src[index(line, i)])
            .sum();
        for i in 0..len {
            out[index(line, i)] = sum * norm;
            let add = i + radius + 1;
            if add < len {
                sum += src[index(line, add)];
            }
            if i >= radius {
                sum -= src[index(line, i - radius)];
            }
        }
    }
    out
}

// ============================================================================
// COVERAGE FUNCTIONS
// ============================================================================

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

fn disk_coverage(p: Point, center: Point, radius: f32) -> f32 {
    clamp01(radius - p.distance(center) + 0.5)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

fn segment_coverage(p: Point, a: Point, b: Point, half_width: f32, cap: Cap) -> f32 {
    let len = a.distance(b);
    if len <= f32::EPSILON {
        return match cap {
            Cap::Round => disk_coverage(p, a, half_width),
            Cap::Butt => 0.0,
        };
    }
    match cap {
        Cap::Round => clamp01(half_width - distance_to_segment(p, a, b) + 0.5),
        Cap::Butt => {
            let (ux, uy) = ((b.x - a.x) / len, (b.y - a.y) / len);
            let (rx, ry) = (p.x - a.x, p.y - a.y);
            let along = rx * ux + ry * uy;
            let across = (rx * uy - ry * ux).abs();
            clamp01(half_width - across + 0.5) * clamp01(along.min(len - along) + 0.5)
        }
    }
}

fn arc_coverage(
    p: Point,
    center: Point,
    radius: f32,
    start: f32,
    sweep: f32,
    half_width: f32,
    cap: Cap,
) -> f32 {
    let dist = p.distance(center);
    let radial = clamp01(half_width - (dist - radius).abs() + 0.5);
    let body = if sweep >= 360.0 || radial <= 0.0 {
        radial
    } else {
        let angle = (p.y - center.y).atan2(p.x - center.x).to_degrees();
        let rel = (angle - start).rem_euclid(360.0);
        let edge_degrees = if rel <= sweep {
            rel.min(sweep - rel)
        } else {
            -(rel - sweep).min(360.0 - rel)
        };
        let edge_pixels = edge_degrees.to_radians() * dist;
        radial * clamp01(edge_pixels + 0.5)
    };
    match cap {
        Cap::Round if sweep < 360.0 => body
            .max(disk_coverage(p, center.polar(radius, start), half_width))
            .max(disk_coverage(p, center.polar(radius, start + sweep), half_width)),
        _ => body,
    }
}

fn polygon_coverage(p: Point, points: &[Point]) -> f32 {
    let n = points.len();
    let mut inside = false;
    let mut nearest = f32::MAX;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        nearest = nearest.min(distance_to_segment(p, a, b));
    }
    if inside {
        clamp01(0.5 + nearest)
    } else {
        clamp01(0.5 - nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::BlurMaskFilter;

    fn alpha(bitmap: &Bitmap, x: usize, y: usize) -> u8 {
        bitmap.pixel(x, y).map(|c| c.a).unwrap_or(0)
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.blend(0, 0, Color::new(10, 20, 30), 1.0);
        assert_eq!(bitmap.pixel(0, 0), Some(Color::new(10, 20, 30)));
        assert_eq!(bitmap.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_rotation_stamps_path_around_pivot() {
        let mut bitmap = Bitmap::new(100, 100);
        let mut path = Path::new();
        path.move_to(50.0, 5.0);
        path.line_to(50.0, 20.0);
        let paint = Paint::stroke(Color::WHITE, 4.0);
        let mut canvas = Canvas::new(&mut bitmap);
        canvas.save();
        canvas.rotate(90.0, 50.0, 50.0);
        canvas.draw_path(&path, &paint);
        canvas.restore();
        assert_eq!(canvas.transform(), Transform::IDENTITY);

        // the vertical mark at the top now lies horizontally on the right
        assert_eq!(alpha(&bitmap, 87, 50), 0xff);
        assert_eq!(alpha(&bitmap, 50, 12), 0);
    }

    #[test]
    fn test_rotations_accumulate() {
        let mut bitmap = Bitmap::new(10, 10);
        let mut canvas = Canvas::new(&mut bitmap);
        canvas.rotate(30.0, 5.0, 5.0);
        canvas.rotate(60.0, 5.0, 5.0);
        let p = canvas.transform().map(Point::new(5.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!((p.y - 5.0).abs() < 1e-4);
        assert!((canvas.transform().degrees() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_round_cap_extends_past_arc_end() {
        let oval = RectF::new(10.0, 10.0, 90.0, 90.0);
        let mut butt = Bitmap::new(100, 100);
        let mut round = Bitmap::new(100, 100);
        let mut paint = Paint::stroke(Color::WHITE, 10.0);
        Canvas::new(&mut butt).draw_arc(oval, 0.0, 90.0, &paint);
        paint.cap = Cap::Round;
        Canvas::new(&mut round).draw_arc(oval, 0.0, 90.0, &paint);

        // arc starts at (90, 50) heading down; just above it is outside a flat end
        assert_eq!(alpha(&butt, 90, 46), 0);
        assert!(alpha(&round, 90, 46) > 0);
        // both cover the middle of the arc
        assert_eq!(alpha(&butt, 78, 78), 0xff);
        assert_eq!(alpha(&round, 78, 78), 0xff);
    }

    #[test]
    fn test_negative_sweep_draws_counter_clockwise() {
        let oval = RectF::new(10.0, 10.0, 90.0, 90.0);
        let mut bitmap = Bitmap::new(100, 100);
        let paint = Paint::stroke(Color::WHITE, 6.0);
        Canvas::new(&mut bitmap).draw_arc(oval, 0.0, -90.0, &paint);
        assert_eq!(alpha(&bitmap, 52, 10), 0xff);
        assert_eq!(alpha(&bitmap, 50, 90), 0);
    }

    #[test]
    fn test_blur_adds_halo_and_keeps_shape_solid() {
        let mut sharp = Bitmap::new(60, 60);
        let mut soft = Bitmap::new(60, 60);
        let mut paint = Paint::fill(Color::WHITE);
        Canvas::new(&mut sharp).draw_circle(30.0, 30.0, 10.0, &paint);
        paint.mask_filter = Some(BlurMaskFilter::new(10.0));
        Canvas::new(&mut soft).draw_circle(30.0, 30.0, 10.0, &paint);

        assert_eq!(alpha(&sharp, 30, 30), 0xff);
        assert_eq!(alpha(&soft, 30, 30), 0xff);
        assert_eq!(alpha(&sharp, 44, 30), 0);
        assert!(alpha(&soft, 44, 30) > 0);
    }

    #[test]
    fn test_draw_rect_and_bitmap_blit() {
        let mut layer = Bitmap::new(10, 10);
        Canvas::new(&mut layer).draw_rect(RectF::new(2.0, 2.0, 6.0, 6.0), &Paint::fill(Color::WHITE));
        assert_eq!(alpha(&layer, 3, 3), 0xff);
        assert_eq!(alpha(&layer, 8, 8), 0);

        let mut frame = Bitmap::new(20, 20);
        let mut canvas = Canvas::new(&mut frame);
        canvas.translate(5.0, 5.0);
        canvas.draw_bitmap(&layer, 0.0, 0.0);
        assert_eq!(alpha(&frame, 8, 8), 0xff);
        assert_eq!(alpha(&frame, 3, 3), 0);
    }

    #[test]
    fn test_box_blur_preserves_mass_inside() {
        let mut data = vec![0.0; 9 * 9];
        data[4 * 9 + 4] = 1.0;
        let once = box_blur_pass(&data, 9, 9, 1, true);
        let total: f32 = once.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
