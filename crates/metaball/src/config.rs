use crate::connector::{BlendParams, DEFAULT_BLEND};
use crate::menu::MenuError;
use crate::style::{Color, Style, StyleLayer, TextStyle, TextStyleLayer};
use serde::Deserialize;

pub const DEFAULT_MAX_DISTANCE: f64 = 300.0;
pub const DEFAULT_HANDLE_LEN_RATE: f64 = 2.4;
pub const DEFAULT_POINTER_RADIUS: f64 = 50.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub radius: Option<f64>,
}

/// User-facing menu configuration. Every style field is a partial layer on
/// top of the built-in defaults; see [`MenuConfig::resolve`] for precedence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub item_style: StyleLayer,
    pub item_text_style: TextStyleLayer,
    pub pointer: PointerConfig,
    pub pointer_style: StyleLayer,
    pub max_distance: f64,
    pub handle_len_rate: f64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            item_style: StyleLayer::default(),
            item_text_style: TextStyleLayer::default(),
            pointer: PointerConfig::default(),
            pointer_style: StyleLayer::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
            handle_len_rate: DEFAULT_HANDLE_LEN_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Per-item overrides stack on this layer before the defaults apply.
    pub item_layer: StyleLayer,
    pub item_text_layer: TextStyleLayer,
    pub pointer_style: Style,
    pub pointer_radius: f64,
    pub max_distance: f64,
    pub handle_len_rate: f64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            item_layer: StyleLayer::default(),
            item_text_layer: TextStyleLayer::default(),
            pointer_style: Style::default(),
            pointer_radius: DEFAULT_POINTER_RADIUS,
            max_distance: DEFAULT_MAX_DISTANCE,
            handle_len_rate: DEFAULT_HANDLE_LEN_RATE,
        }
    }
}

impl ResolvedConfig {
    pub fn item_style(&self, overrides: &StyleLayer) -> Style {
        overrides.over(&self.item_layer).apply(&Style::default())
    }

    pub fn item_text_style(&self, overrides: &TextStyleLayer) -> TextStyle {
        overrides
            .over(&self.item_text_layer)
            .apply(&TextStyle::default())
    }

    pub fn blend_params(&self) -> BlendParams {
        BlendParams::new(DEFAULT_BLEND, self.handle_len_rate, self.max_distance)
    }
}

fn ensure_non_negative(name: &str, value: f64) -> Result<f64, MenuError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MenuError::InvalidConfig(format!(
            "{name} must be a finite, non-negative number (got {value})"
        )))
    }
}

impl MenuConfig {
    /// Applies the cascade:
    ///
    /// * items: defaults, then `item_style`, then the item's own overrides
    /// * labels: defaults, then `item_text_style`, then the item's overrides
    /// * pointer: defaults, then `item_style`, then `pointer_style`
    ///
    /// The pointer radius comes from `pointer.radius`, falling back to 50.
    pub fn resolve(&self) -> Result<ResolvedConfig, MenuError> {
        let pointer_defaults = StyleLayer {
            fill_color: Some(Color::BLACK),
            ..StyleLayer::default()
        };
        let pointer_style = self
            .pointer_style
            .over(&self.item_style)
            .over(&pointer_defaults)
            .apply(&Style::default());

        Ok(ResolvedConfig {
            item_layer: self.item_style.clone(),
            item_text_layer: self.item_text_style.clone(),
            pointer_style,
            pointer_radius: ensure_non_negative(
                "pointer.radius",
                self.pointer.radius.unwrap_or(DEFAULT_POINTER_RADIUS),
            )?,
            max_distance: ensure_non_negative("max_distance", self.max_distance)?,
            handle_len_rate: ensure_non_negative("handle_len_rate", self.handle_len_rate)?,
        })
    }
}
