use crate::color::Color;

/// End cap of a section arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionStyle {
    /// Flat end, the arc stops exactly at its angle.
    #[default]
    Butt,
    /// Semicircular end.
    Round,
}

impl SectionStyle {
    pub const ALL: [SectionStyle; 2] = [SectionStyle::Butt, SectionStyle::Round];

    /// Style for a style-attribute index, `None` when out of range.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

/// A colored slice of the gauge arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Share of the gauge's angular range, in `[0, 1]`.
    pub offset: f32,
    pub color: Color,
    pub style: SectionStyle,
}

impl Section {
    pub fn new(offset: f32, color: Color, style: SectionStyle) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
            style,
        }
    }

    /// Three sections covering 60%, 27% and 13% of the range.
    pub fn defaults() -> Vec<Section> {
        vec![
            Section::new(0.6, Color::from_argb(0xff00ff00), SectionStyle::Butt),
            Section::new(0.27, Color::from_argb(0xffffff00), SectionStyle::Butt),
            Section::new(0.13, Color::from_argb(0xffff0000), SectionStyle::Butt),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_index_is_bounds_checked() {
        assert_eq!(SectionStyle::from_index(0), Some(SectionStyle::Butt));
        assert_eq!(SectionStyle::from_index(1), Some(SectionStyle::Round));
        assert_eq!(SectionStyle::from_index(2), None);
        assert_eq!(SectionStyle::from_index(-1), None);
    }

    #[test]
    fn test_default_sections_cover_range() {
        let total: f32 = Section::defaults().iter().map(|s| s.offset).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }
}
