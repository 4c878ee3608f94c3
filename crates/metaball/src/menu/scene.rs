use super::item::Label;
use crate::connector::Connector;
use crate::geometry::{Circle, Point, Rect, Size};
use crate::style::{Justification, Style, TextStyle};
use derive_more::{Display, From};

/// Identity of a drawable, stable for the lifetime of one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct VisualId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct CircleVisual {
    pub id: VisualId,
    pub circle: Circle,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelVisual {
    pub id: VisualId,
    pub text: Label,
    /// Anchor; the renderer places the text around it per justification.
    pub position: Point,
    pub style: TextStyle,
    /// Where the ink lands, when the surface could measure it.
    pub bounds: Option<Rect>,
}

/// Box covered by text of size `ink` anchored at `anchor`: vertically
/// centered, horizontally starting at, centered on, or ending at the anchor.
pub fn label_bounds(anchor: Point, ink: Size, justification: Justification) -> Rect {
    let left = match justification {
        Justification::Left => anchor.x,
        Justification::Center => anchor.x - ink.width / 2.0,
        Justification::Right => anchor.x - ink.width,
    };
    Rect::new(Point::new(left, anchor.y - ink.height / 2.0), ink)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorVisual {
    pub outline: Connector,
    pub style: Style,
}

/// Draws the three kinds of visual the menu produces.
pub trait Renderer {
    type Error;

    fn draw_connector(&mut self, connector: &ConnectorVisual) -> Result<(), Self::Error>;

    fn draw_circle(&mut self, circle: &CircleVisual) -> Result<(), Self::Error>;

    fn draw_label(&mut self, label: &LabelVisual) -> Result<(), Self::Error>;
}

/// Everything on screen, one ordered collection per layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub connectors: Vec<ConnectorVisual>,
    /// Menu items in order, then the pointer.
    pub circles: Vec<CircleVisual>,
    pub labels: Vec<LabelVisual>,
}

impl Scene {
    /// Draws back to front: connectors, circles, labels.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        for connector in &self.connectors {
            renderer.draw_connector(connector)?;
        }
        for circle in &self.circles {
            renderer.draw_circle(circle)?;
        }
        for label in &self.labels {
            renderer.draw_label(label)?;
        }
        Ok(())
    }

    pub fn circle(&self, id: VisualId) -> Option<&CircleVisual> {
        self.circles.iter().find(|c| c.id == id)
    }
}
