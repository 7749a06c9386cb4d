//! Named style options read at construction time.
//!
//! Lookups never fail: an absent key, a value of the wrong type or an
//! unparsable string yields the caller's default. Malformed values are
//! logged so a typo in a style file is still visible.

use std::collections::BTreeMap;

use crate::color::Color;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    values: BTreeMap<String, AttrValue>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a flat TOML table, e.g.
    ///
    /// ```toml
    /// speed_background_color = "#ffffff"
    /// with_effects = false
    /// center_circle_radius = "24dp"
    /// section_style = 1
    /// ```
    ///
    /// Values of other TOML types (arrays, tables, dates) are skipped.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table = source.parse()?;
        let mut attrs = Self::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::Boolean(b) => AttrValue::Bool(b),
                toml::Value::Integer(i) => AttrValue::Int(i),
                toml::Value::Float(f) => AttrValue::Float(f),
                toml::Value::String(s) => AttrValue::Str(s),
                other => {
                    tracing::warn!(attribute = %key, kind = other.type_str(), "unsupported attribute type, skipped");
                    continue;
                }
            };
            attrs.values.insert(key, value);
        }
        Ok(attrs)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttrValue) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `#RRGGBB`/`#AARRGGBB` strings or packed ARGB integers.
    pub fn get_color(&self, name: &str, default: Color) -> Color {
        match self.values.get(name) {
            None => default,
            Some(AttrValue::Str(s)) => Color::from_hex(s).unwrap_or_else(|| malformed(name, default)),
            Some(AttrValue::Int(i)) => u32::try_from(*i)
                .map(Color::from_argb)
                .unwrap_or_else(|_| malformed(name, default)),
            Some(_) => malformed(name, default),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            None => default,
            Some(AttrValue::Bool(b)) => *b,
            Some(AttrValue::Str(s)) => s.parse().unwrap_or_else(|_| malformed(name, default)),
            Some(_) => malformed(name, default),
        }
    }

    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.values.get(name) {
            None => default,
            Some(AttrValue::Int(i)) => *i,
            Some(AttrValue::Str(s)) => s.trim().parse().unwrap_or_else(|_| malformed(name, default)),
            Some(_) => malformed(name, default),
        }
    }

    pub fn get_float(&self, name: &str, default: f32) -> f32 {
        match self.values.get(name) {
            None => default,
            Some(AttrValue::Float(f)) => *f as f32,
            Some(AttrValue::Int(i)) => *i as f32,
            Some(AttrValue::Str(s)) => s.trim().parse().unwrap_or_else(|_| malformed(name, default)),
            Some(_) => malformed(name, default),
        }
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// A length in pixels. Strings may carry a `dp` or `px` suffix; bare
    /// numbers are pixels.
    pub fn get_dimension(&self, name: &str, default: f32, density: f32) -> f32 {
        match self.values.get(name) {
            None => default,
            Some(AttrValue::Float(f)) => *f as f32,
            Some(AttrValue::Int(i)) => *i as f32,
            Some(AttrValue::Str(s)) => parse_dimension(s, density).unwrap_or_else(|| malformed(name, default)),
            Some(_) => malformed(name, default),
        }
    }
}

fn parse_dimension(raw: &str, density: f32) -> Option<f32> {
    let raw = raw.trim();
    let (number, factor) = if let Some(n) = raw.strip_suffix("dp") {
        (n, density)
    } else if let Some(n) = raw.strip_suffix("px") {
        (n, 1.0)
    } else {
        (raw, 1.0)
    };
    number.trim().parse::<f32>().ok().map(|v| v * factor)
}

fn malformed<T: std::fmt::Debug>(name: &str, default: T) -> T {
    tracing::warn!(attribute = name, fallback = ?default, "malformed attribute value, keeping current");
    default
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r##"
speed_background_color = "#ff0000"
with_effects = false
center_circle_color = 4278190335
center_circle_radius = "10dp"
section_style = 1
unit = "mph"
broken_color = "red"
ignored = [1, 2]
"##;

    #[test]
    fn test_typed_lookups() {
        let attrs = AttributeSet::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            attrs.get_color("speed_background_color", Color::WHITE),
            Color::new(0xff, 0, 0)
        );
        assert_eq!(
            attrs.get_color("center_circle_color", Color::WHITE),
            Color::from_argb(0xff0000ff)
        );
        assert!(!attrs.get_bool("with_effects", true));
        assert_eq!(attrs.get_dimension("center_circle_radius", 0.0, 2.5), 25.0);
        assert_eq!(attrs.get_int("section_style", -1), 1);
        assert_eq!(attrs.get_string("unit"), Some("mph"));
        assert!(!attrs.contains("ignored"));
    }

    #[test]
    fn test_malformed_and_absent_fall_back() {
        let attrs = AttributeSet::from_toml_str(SAMPLE).unwrap();
        assert_eq!(attrs.get_color("broken_color", Color::BLACK), Color::BLACK);
        assert_eq!(attrs.get_color("missing", Color::WHITE), Color::WHITE);
        assert_eq!(attrs.get_int("unit", 7), 7);
        assert!(attrs.get_bool("section_style", true));
        assert_eq!(attrs.get_dimension("unit", 3.0, 1.0), 3.0);
    }

    #[test]
    fn test_dimension_suffixes() {
        assert_eq!(parse_dimension("12dp", 2.0), Some(24.0));
        assert_eq!(parse_dimension(" 12px ", 2.0), Some(12.0));
        assert_eq!(parse_dimension("12", 2.0), Some(12.0));
        assert_eq!(parse_dimension("dp", 2.0), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AttributeSet::from_toml_str("with_effects = ").is_err());
    }
}
