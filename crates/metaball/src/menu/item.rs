use super::MenuError;
use crate::geometry::{Circle, NormalizedPoint, Size};
use crate::style::{StyleLayer, TextStyleLayer};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

/// Something that reacts to an item being clicked.
pub trait Clickable {
    fn on_click(&self) -> anyhow::Result<()>;
}

impl<F> Clickable for F
where
    F: Fn() -> anyhow::Result<()>,
{
    fn on_click(&self) -> anyhow::Result<()> {
        self()
    }
}

pub struct MenuItem {
    pub label: Label,
    /// Center as fractions of the surface size.
    pub position: NormalizedPoint,
    pub radius: f64,
    pub style: StyleLayer,
    pub text_style: TextStyleLayer,
    action: Option<Box<dyn Clickable>>,
}

impl MenuItem {
    pub fn new(
        label: impl Into<String>,
        position: NormalizedPoint,
        radius: f64,
    ) -> Result<Self, MenuError> {
        let label = Label::new(label);
        let invalid = |reason: &str| MenuError::InvalidItem {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        if !position.is_finite() {
            return Err(invalid("position must be finite"));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(invalid("radius must be finite and non-negative"));
        }

        Ok(Self {
            label,
            position,
            radius,
            style: StyleLayer::default(),
            text_style: TextStyleLayer::default(),
            action: None,
        })
    }

    pub fn with_style(mut self, style: StyleLayer) -> Self {
        self.style = style;
        self
    }

    pub fn with_text_style(mut self, text_style: TextStyleLayer) -> Self {
        self.text_style = text_style;
        self
    }

    pub fn with_action(mut self, action: impl Clickable + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// The item's circle in pixel space for a surface of `size`.
    pub fn circle(&self, size: Size) -> Circle {
        Circle::new(self.position.to_pixels(size), self.radius)
    }

    /// Runs the click action, if any. Errors and panics are logged and
    /// swallowed so the menu keeps working; returns whether the action ran
    /// to completion.
    pub fn click(&self) -> bool {
        let Some(action) = &self.action else {
            return false;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| action.on_click())) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                log::error!("Click action for '{}' failed: {:#}", self.label, e);
                false
            }
            Err(_) => {
                log::error!("Click action for '{}' panicked", self.label);
                false
            }
        }
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("position", &self.position)
            .field("radius", &self.radius)
            .field("style", &self.style)
            .field("text_style", &self.text_style)
            .field("has_action", &self.has_action())
            .finish()
    }
}
