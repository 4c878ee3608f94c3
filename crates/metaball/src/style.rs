use derive_more::{Deref, From, Into};
use palette::{Srgb, Srgba, WithAlpha};
use serde::Deserialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Deref, From, Into, DeserializeFromStr, SerializeDisplay,
)]
pub struct Color(Srgba<f64>);

impl Color {
    pub const BLACK: Self = Self(Srgba::new(0.0, 0.0, 0.0, 1.0));
    pub const WHITE: Self = Self(Srgba::new(1.0, 1.0, 1.0, 1.0));
    pub const TRANSPARENT: Self = Self(Srgba::new(0.0, 0.0, 0.0, 0.0));
}

#[derive(Debug, Error, PartialEq)]
pub enum ColorParseError {
    #[error("unknown color '{0}'")]
    Unknown(String),
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts CSS color names, `transparent`, and `#rgb`, `#rrggbb` or
    /// `#rrggbbaa` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unknown = || ColorParseError::Unknown(s.to_string());

        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(unknown());
            }
            let (rgb, alpha) = match hex.len() {
                8 => {
                    let a = u8::from_str_radix(&hex[6..], 16).map_err(|_| unknown())?;
                    (&hex[..6], a)
                }
                3 | 6 => (hex, u8::MAX),
                _ => return Err(unknown()),
            };
            let rgb = Srgb::<u8>::from_str(rgb).map_err(|_| unknown())?;
            return Ok(Self(rgb.into_format::<f64>().with_alpha(alpha as f64 / 255.0)));
        }

        palette::named::from_str(&s.to_ascii_lowercase())
            .map(|c| Self(c.into_format::<f64>().with_alpha(1.0)))
            .ok_or_else(unknown)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Srgba<u8> = self.0.into_format();
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.red, c.green, c.blue, c.alpha)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    DeserializeFromStr,
    SerializeDisplay,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Justification {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    DeserializeFromStr,
    SerializeDisplay,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Fully resolved paint for a circle or connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill_color: Color,
    pub stroke_color: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub fill_color: Color,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub justification: Justification,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::WHITE,
            font_size: 32.0,
            font_family: "Sans".to_string(),
            font_weight: FontWeight::Normal,
            justification: Justification::Center,
        }
    }
}

/// Partial override of a [`Style`]. Unset fields fall through to the layer
/// below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleLayer {
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl StyleLayer {
    /// Stacks `self` on top of `lower`; fields set here win.
    pub fn over(&self, lower: &StyleLayer) -> StyleLayer {
        StyleLayer {
            fill_color: self.fill_color.or(lower.fill_color),
            stroke_color: self.stroke_color.or(lower.stroke_color),
            stroke_width: self.stroke_width.or(lower.stroke_width),
            opacity: self.opacity.or(lower.opacity),
        }
    }

    pub fn apply(&self, base: &Style) -> Style {
        Style {
            fill_color: self.fill_color.unwrap_or(base.fill_color),
            stroke_color: self.stroke_color.or(base.stroke_color),
            stroke_width: self.stroke_width.unwrap_or(base.stroke_width),
            opacity: self.opacity.unwrap_or(base.opacity),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyleLayer {
    pub fill_color: Option<Color>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub justification: Option<Justification>,
}

impl TextStyleLayer {
    pub fn over(&self, lower: &TextStyleLayer) -> TextStyleLayer {
        TextStyleLayer {
            fill_color: self.fill_color.or(lower.fill_color),
            font_size: self.font_size.or(lower.font_size),
            font_family: self
                .font_family
                .clone()
                .or_else(|| lower.font_family.clone()),
            font_weight: self.font_weight.or(lower.font_weight),
            justification: self.justification.or(lower.justification),
        }
    }

    pub fn apply(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            fill_color: self.fill_color.unwrap_or(base.fill_color),
            font_size: self.font_size.unwrap_or(base.font_size),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| base.font_family.clone()),
            font_weight: self.font_weight.unwrap_or(base.font_weight),
            justification: self.justification.unwrap_or(base.justification),
        }
    }
}
