use cairo::Context;
use metaball::menu::{CircleVisual, ConnectorVisual, LabelVisual};
use metaball::style::{FontWeight, Justification, TextStyle};
use metaball::{Color, Point, Renderer, Scene, Size, Style};
use palette::Srgba;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Color) {
    let color: Srgba<f64> = color.into();
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn select_font(cr: &Context, style: &TextStyle) {
    let weight = match style.font_weight {
        FontWeight::Normal => cairo::FontWeight::Normal,
        FontWeight::Bold => cairo::FontWeight::Bold,
    };
    cr.select_font_face(&style.font_family, cairo::FontSlant::Normal, weight);
    cr.set_font_size(style.font_size);
}

/// Ink size of `text` as [`CairoRenderer`] would draw it.
pub fn measure_text(text: &str, style: &TextStyle) -> Option<Size> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
    let cr = Context::new(&surface).ok()?;
    select_font(&cr, style);
    let ext = cr.text_extents(text).ok()?;
    Some(Size::new(ext.width(), ext.height()))
}

/// Ink rectangle of a piece of text, relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
struct InkBox {
    x_bearing: f64,
    y_bearing: f64,
    width: f64,
    height: f64,
}

impl From<&cairo::TextExtents> for InkBox {
    fn from(ext: &cairo::TextExtents) -> Self {
        Self {
            x_bearing: ext.x_bearing(),
            y_bearing: ext.y_bearing(),
            width: ext.width(),
            height: ext.height(),
        }
    }
}

/// Where to start the text so its ink is vertically centered on `anchor`
/// and aligned horizontally per `justification`.
fn text_origin(anchor: Point, ink: InkBox, justification: Justification) -> Point {
    let x = match justification {
        Justification::Left => anchor.x - ink.x_bearing,
        Justification::Center => anchor.x - ink.x_bearing - ink.width / 2.0,
        Justification::Right => anchor.x - ink.x_bearing - ink.width,
    };
    Point::new(x, anchor.y - ink.y_bearing - ink.height / 2.0)
}

/// Paints menu visuals onto a cairo context.
pub struct CairoRenderer<'a> {
    cr: &'a Context,
}

impl<'a> CairoRenderer<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }

    /// Fills, and strokes if requested, the current path. Partial opacity
    /// goes through a group so fill and stroke fade together.
    fn paint_path(&self, style: &Style) -> Result<(), cairo::Error> {
        let translucent = style.opacity < 1.0;
        if translucent {
            self.cr.push_group();
        }

        set_source(self.cr, style.fill_color);
        match style.stroke_color {
            Some(stroke) if style.stroke_width > 0.0 => {
                self.cr.fill_preserve()?;
                set_source(self.cr, stroke);
                self.cr.set_line_width(style.stroke_width);
                self.cr.stroke()?;
            }
            _ => self.cr.fill()?,
        }

        if translucent {
            self.cr.pop_group_to_source()?;
            self.cr.paint_with_alpha(style.opacity.max(0.0))?;
        }
        Ok(())
    }
}

impl Renderer for CairoRenderer<'_> {
    type Error = cairo::Error;

    fn draw_connector(&mut self, connector: &ConnectorVisual) -> Result<(), cairo::Error> {
        let start = connector.outline.segments[0].point;
        self.cr.new_path();
        self.cr.move_to(start.x, start.y);
        for curve in connector.outline.curves() {
            if curve.is_straight() {
                self.cr.line_to(curve.to.x, curve.to.y);
            } else {
                self.cr.curve_to(
                    curve.ctrl1.x,
                    curve.ctrl1.y,
                    curve.ctrl2.x,
                    curve.ctrl2.y,
                    curve.to.x,
                    curve.to.y,
                );
            }
        }
        self.cr.close_path();
        self.paint_path(&connector.style)
    }

    fn draw_circle(&mut self, circle: &CircleVisual) -> Result<(), cairo::Error> {
        if circle.circle.is_degenerate() {
            return Ok(());
        }
        let c = circle.circle;
        self.cr.new_path();
        self.cr.arc(c.center.x, c.center.y, c.radius, 0.0, 2.0 * PI);
        self.paint_path(&circle.style)
    }

    fn draw_label(&mut self, label: &LabelVisual) -> Result<(), cairo::Error> {
        let style = &label.style;
        self.cr.new_path();
        set_source(self.cr, style.fill_color);
        select_font(self.cr, style);

        let ext = self.cr.text_extents(label.text.as_str())?;
        let origin = text_origin(label.position, InkBox::from(&ext), style.justification);
        self.cr.move_to(origin.x, origin.y);
        self.cr.show_text(label.text.as_str())
    }
}

/// Clears to `background` and paints the scene over it.
pub fn draw(cr: &Context, scene: &Scene, background: Srgba<f64>) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.set_operator(cairo::Operator::Source);
    let (r, g, b, a) = background.into_components();
    cr.set_source_rgba(r, g, b, a);
    cr.paint()?;
    cr.restore()?;

    scene.render(&mut CairoRenderer::new(cr))
}
