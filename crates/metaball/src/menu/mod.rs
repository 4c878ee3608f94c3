use crate::geometry::{Point, Size};
use crate::style::TextStyle;
use thiserror::Error;

pub mod item;
pub mod model;
pub mod scene;

pub use item::{Clickable, Label, MenuItem};
pub use model::CircleMenu;
pub use scene::{
    CircleVisual, ConnectorVisual, LabelVisual, Renderer, Scene, VisualId, label_bounds,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MenuError {
    #[error("Invalid menu item '{label}': {reason}")]
    InvalidItem { label: String, reason: String },
    #[error("Invalid menu config: {0}")]
    InvalidConfig(String),
}

/// Input the hosting toolkit forwards to the menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    PointerMove(Point),
    Resize,
    Click(Point),
}

/// The drawing surface the menu is laid out on.
pub trait Surface {
    /// Current pixel size.
    fn size(&self) -> Size;

    fn request_redraw(&self);

    /// Ink size of `text` in `style`. Labels the surface cannot measure are
    /// not click targets.
    fn measure_text(&self, _text: &str, _style: &TextStyle) -> Option<Size> {
        None
    }
}
