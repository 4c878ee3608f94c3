use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window::{self, GtkSurface};
use gtk::prelude::*;
use gtk4 as gtk;
use metaball::{CircleMenu, Color, MenuEvent, Point};
use palette::Srgba;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

pub struct AppInit {
    pub config: Config,
    /// Where reloads read from; `None` when no config location is known.
    pub config_path: Option<PathBuf>,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    menu: Rc<RefCell<CircleMenu<GtkSurface>>>,
    background: Rc<Cell<Option<Color>>>,
    config_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerMove(Point),
    Click(Point),
    Resize,
    Close,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn reload(&self) {
        let Some(path) = &self.config_path else {
            return;
        };

        let config = match config::reload(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        let (resolved, items) = match config.prepare() {
            Ok(prepared) => prepared,
            Err(e) => {
                log::error!("Ignoring invalid config: {}", e);
                return;
            }
        };

        let mut menu = self.menu.borrow_mut();
        let pointer = menu.pointer().center;
        let surface = menu.surface().clone();
        *menu = CircleMenu::new(surface, items, resolved);
        menu.on_pointer_move(pointer);
        self.background.set(config.window.background);
        log::info!("Configuration reloaded");
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some(window_config.title.as_str()),
            set_default_size: (window_config.width, window_config.height),
            add_css_class: "meld-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Close);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[local_ref]
            drawing_area -> gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "meld-drawing-area",

                connect_resize[sender] => move |_, _, _| {
                    sender.input(AppMsg::Resize);
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Click(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            events,
        } = init;
        let window_config = config.window.clone();

        theme::load_css();
        if window_config.overlay {
            window::init_layer_shell(&root);
        }

        let (resolved, items) = config.prepare_or_default();

        let area = gtk::DrawingArea::new();
        let surface = GtkSurface::new(area.clone());

        let model = AppModel {
            menu: Rc::new(RefCell::new(CircleMenu::new(surface, items, resolved))),
            background: Rc::new(Cell::new(window_config.background)),
            config_path,
        };

        let drawing_area = &area;
        let widgets = view_output!();

        let menu_draw = model.menu.clone();
        let background = model.background.clone();
        let overlay = window_config.overlay;
        area.set_draw_func(move |area, cr, _, _| {
            let background = background.get().map(Srgba::<f64>::from).unwrap_or_else(|| {
                ThemeColors::from_context(&area.style_context(), overlay).background
            });
            if let Err(e) = menu::draw(cr, menu_draw.borrow().scene(), background) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::PointerMove(point) => {
                self.menu
                    .borrow_mut()
                    .handle_event(MenuEvent::PointerMove(point));
            }
            AppMsg::Click(point) => {
                self.menu.borrow_mut().handle_event(MenuEvent::Click(point));
            }
            AppMsg::Resize => {
                self.menu.borrow_mut().handle_event(MenuEvent::Resize);
            }
            AppMsg::Close => relm4::main_application().quit(),
            AppMsg::ConfigReload => self.reload(),
        }
    }
}
