use crate::gui::menu;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use metaball::style::TextStyle;
use metaball::{Size, Surface};

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("meld"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

/// The menu's drawing surface: a drawing area that is redrawn on request.
#[derive(Debug, Clone)]
pub struct GtkSurface {
    area: gtk::DrawingArea,
}

impl GtkSurface {
    pub fn new(area: gtk::DrawingArea) -> Self {
        Self { area }
    }
}

impl Surface for GtkSurface {
    fn size(&self) -> Size {
        Size::new(self.area.width() as f64, self.area.height() as f64)
    }

    fn request_redraw(&self) {
        self.area.queue_draw();
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> Option<Size> {
        menu::measure_text(text, style)
    }
}
