//! Resource identifiers and values

use jetpack_core::{BindingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric resource identifier, shown as `0x7f010001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Unit of a [`Dimension`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    /// Raw pixels
    Px,
    /// Density-independent pixels
    Dp,
    /// Scaled pixels
    Sp,
}

/// A length with a unit, parsed from text such as `16dp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub value: f32,
    pub unit: DimensionUnit,
}

impl Dimension {
    pub fn px(value: f32) -> Self {
        Self {
            value,
            unit: DimensionUnit::Px,
        }
    }

    pub fn dp(value: f32) -> Self {
        Self {
            value,
            unit: DimensionUnit::Dp,
        }
    }

    pub fn sp(value: f32) -> Self {
        Self {
            value,
            unit: DimensionUnit::Sp,
        }
    }

    /// Length in pixels for the given densities
    pub fn to_px(self, density: f32, scaled_density: f32) -> f32 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Dp => self.value * density,
            DimensionUnit::Sp => self.value * scaled_density,
        }
    }
}

impl FromStr for Dimension {
    type Err = BindingError;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let (number, unit) = if let Some(number) = text.strip_suffix("dip") {
            (number, DimensionUnit::Dp)
        } else if let Some(number) = text.strip_suffix("dp") {
            (number, DimensionUnit::Dp)
        } else if let Some(number) = text.strip_suffix("sp") {
            (number, DimensionUnit::Sp)
        } else if let Some(number) = text.strip_suffix("px") {
            (number, DimensionUnit::Px)
        } else {
            return Err(BindingError::config(format!("Dimension {text:?} has no unit (px, dp, sp)")));
        };

        let value = number
            .trim()
            .parse::<f32>()
            .map_err(|e| BindingError::config(format!("Invalid dimension {text:?}: {e}")))?;

        Ok(Self { value, unit })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            DimensionUnit::Px => "px",
            DimensionUnit::Dp => "dp",
            DimensionUnit::Sp => "sp",
        };
        write!(f, "{}{unit}", self.value)
    }
}

/// Parse `#RRGGBB` or `#AARRGGBB` into an ARGB value
pub fn parse_color(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix('#')
        .ok_or_else(|| BindingError::config(format!("Color {text:?} must start with '#'")))?;
    // from_str_radix alone would let a leading sign through
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BindingError::config(format!("Color {text:?} has non-hex digits")));
    }

    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| BindingError::config(format!("Invalid color {text:?}: {e}")))?;

    match digits.len() {
        6 => Ok(0xff00_0000 | value),
        8 => Ok(value),
        _ => Err(BindingError::config(format!("Color {text:?} must be #RRGGBB or #AARRGGBB"))),
    }
}

/// A resolved resource value
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceValue {
    Bool(bool),
    /// ARGB color
    Color(u32),
    Dimension(Dimension),
    Integer(i32),
    IntArray(Vec<i32>),
    String(String),
    StringArray(Vec<String>),
}

impl ResourceValue {
    /// Kind name used in diagnostics and in the table's `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceValue::Bool(_) => "bool",
            ResourceValue::Color(_) => "color",
            ResourceValue::Dimension(_) => "dimen",
            ResourceValue::Integer(_) => "integer",
            ResourceValue::IntArray(_) => "integer-array",
            ResourceValue::String(_) => "string",
            ResourceValue::StringArray(_) => "string-array",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_display() {
        assert_eq!(ResourceId(0x7f01_0001).to_string(), "0x7f010001");
        assert_eq!(ResourceId(1).to_string(), "0x00000001");
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!("16dp".parse::<Dimension>().unwrap(), Dimension::dp(16.0));
        assert_eq!("1.5sp".parse::<Dimension>().unwrap(), Dimension::sp(1.5));
        assert_eq!(" 3 px ".parse::<Dimension>().unwrap(), Dimension::px(3.0));
        assert_eq!("8dip".parse::<Dimension>().unwrap(), Dimension::dp(8.0));
        assert!("16".parse::<Dimension>().is_err());
        assert!("wide dp".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0000").unwrap(), 0xffff_0000);
        assert_eq!(parse_color("#80112233").unwrap(), 0x8011_2233);
        assert!(parse_color("ff0000").is_err());
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("#+fffff").is_err());
        assert!(parse_color("#+1ffffff").is_err());
        assert!(parse_color("#gg0000").is_err());
    }
}
