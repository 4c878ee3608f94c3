use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub background: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext, overlay: bool) -> Self {
        // see-through when covering the desktop
        let alpha = overlay.then_some(0.35);
        Self {
            background: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, alpha.unwrap_or(1.0)),
                alpha,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.meld-window, .meld-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
