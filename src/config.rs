use bon::Builder;

use crate::color::Color;
use crate::indicator::IndicatorKind;
use crate::section::Section;

/// Configuration of the base gauge: range, angles, ticks and text.
///
/// Lengths ending in `_dp` are density-independent and multiplied by
/// `density` when the gauge is built.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub min_speed: f32,
    #[builder(default = 100.0)]
    pub max_speed: f32,
    #[builder(default = "Km/h".to_string(), into)]
    pub unit: String,

    // Angles, canvas convention (0 at 3 o'clock, clockwise)
    #[builder(default = 135)]
    pub start_degree: i32,
    #[builder(default = 405)]
    pub end_degree: i32,

    /// Number of numeric labels; 0 draws only the min and max labels.
    #[builder(default = 0)]
    pub tick_number: usize,
    #[builder(default = 1)]
    pub speed_text_decimals: usize,

    // Dimensions
    #[builder(default = 1.0)]
    pub density: f32,
    #[builder(default = 30.0)]
    pub speedometer_width_dp: f32,
    #[builder(default = 0.0)]
    pub padding: f32,
    #[builder(default = 18.0)]
    pub speed_text_size_dp: f32,
    #[builder(default = 15.0)]
    pub unit_text_size_dp: f32,
    #[builder(default = 10.0)]
    pub text_size_dp: f32,

    // Colors
    #[builder(default = Color::BLACK)]
    pub text_color: Color,
    #[builder(default = Color::BLACK)]
    pub speed_text_color: Color,
    #[builder(default = Color::BLACK)]
    pub unit_text_color: Color,
    #[builder(default = Color::WHITE)]
    pub mark_color: Color,
    #[builder(default = Color::WHITE)]
    pub background_circle_color: Color,

    #[builder(default = Section::defaults())]
    pub sections: Vec<Section>,
    #[builder(default)]
    pub indicator: IndicatorKind,
    /// Overrides the indicator's own default color.
    pub indicator_color: Option<Color>,

    /// Fraction of the remaining distance the speed covers per animation tick.
    #[builder(default = 0.1)]
    pub speed_lerp_factor: f32,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Window the gauge is shown in.
#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(default = "Speedometer".to_string(), into)]
    pub title: String,
    #[builder(default = 400)]
    pub width: usize,
    #[builder(default = 400)]
    pub height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::new(0x30, 0x30, 0x30))]
    pub background: Color,
    #[builder(default = true)]
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = GaugeConfig::default();
        assert_eq!(config.start_degree, 135);
        assert_eq!(config.end_degree, 405);
        assert_eq!(config.unit, "Km/h");
        assert_eq!(config.sections.len(), 3);
        assert_eq!(config.indicator, IndicatorKind::NormalSmall);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GaugeConfig::builder()
            .max_speed(240.0)
            .unit("mph")
            .tick_number(9)
            .build();
        assert_eq!(config.max_speed, 240.0);
        assert_eq!(config.unit, "mph");
        assert_eq!(config.tick_number, 9);
        assert_eq!(WindowConfig::default().width, 400);
    }
}
