//! Deluxe speedometer gauge rendered in software.
//!
//! A [`DeluxeSpeedView`] draws a dial of colored section arcs, tick marks,
//! an indicator, a center circle and a speed readout into an RGBA
//! [`Bitmap`]. The static part of the dial is cached as a background
//! bitmap and only redrawn when size or style change; each frame blits it
//! and overlays the dynamic parts.
//!
//! ```no_run
//! use speedview::{DeluxeSpeedView, WindowConfig};
//!
//! let mut view = DeluxeSpeedView::new();
//! view.gauge_mut().speed_to(72.0);
//! view.show(WindowConfig::default())?;
//! # Ok::<(), speedview::GaugeError>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod attrs;
pub mod canvas;
pub mod color;
pub mod config;
pub mod deluxe;
pub mod error;
pub mod geometry;
pub mod indicator;
pub mod paint;
pub mod section;
pub mod speedometer;
pub mod text;
pub mod window;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use attrs::{AttrValue, AttributeSet};
pub use canvas::{Bitmap, Canvas, Path};
pub use color::Color;
pub use config::{GaugeConfig, WindowConfig};
pub use deluxe::DeluxeSpeedView;
pub use error::{GaugeError, Result};
pub use geometry::{layout_sections, round_cap_angle, Point, RectF, SectionArc};
pub use indicator::{Indicator, IndicatorKind};
pub use paint::{BlurMaskFilter, Cap, Paint, PaintStyle};
pub use section::{Section, SectionStyle};
pub use speedometer::Speedometer;
pub use text::Typeface;
pub use window::GaugeCommand;
