use super::item::MenuItem;
use super::scene::{CircleVisual, ConnectorVisual, LabelVisual, Scene, VisualId, label_bounds};
use super::{MenuError, MenuEvent, Surface};
use crate::config::{MenuConfig, ResolvedConfig};
use crate::connector::{BlendParams, compute_connector};
use crate::geometry::{Circle, NormalizedPoint, Point};
use std::collections::HashMap;

type ClickObserver = Box<dyn FnMut(NormalizedPoint)>;

/// A set of circular items joined to a movable pointer by metaball
/// connectors.
///
/// Items are positioned in fractions of the surface and converted to pixels
/// on every layout, so a resize only needs [`CircleMenu::draw_menu`]. The
/// scene is rebuilt wholesale by each handler before it returns.
pub struct CircleMenu<S: Surface> {
    surface: S,
    items: Vec<MenuItem>,
    config: ResolvedConfig,
    pointer: Circle,
    pointer_id: Option<VisualId>,
    scene: Scene,
    click_targets: HashMap<VisualId, usize>,
    next_id: u64,
    surface_click: ClickObserver,
}

impl<S: Surface> CircleMenu<S> {
    /// Builds the menu and performs the initial layout. The pointer starts at
    /// the origin until the first move.
    pub fn new(surface: S, items: Vec<MenuItem>, config: ResolvedConfig) -> Self {
        let pointer = Circle::new(Point::ORIGIN, config.pointer_radius);

        let mut menu = Self {
            surface,
            items,
            config,
            pointer,
            pointer_id: None,
            scene: Scene::default(),
            click_targets: HashMap::new(),
            next_id: 0,
            surface_click: Box::new(|p| log::info!("click x={:.4} y={:.4}", p.x, p.y)),
        };
        menu.draw_menu();
        menu
    }

    pub fn with_config(
        surface: S,
        items: Vec<MenuItem>,
        config: &MenuConfig,
    ) -> Result<Self, MenuError> {
        Ok(Self::new(surface, items, config.resolve()?))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn pointer(&self) -> Circle {
        self.pointer
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Replaces the observer told about every click, in normalized
    /// coordinates.
    pub fn set_surface_click_observer(&mut self, observer: impl FnMut(NormalizedPoint) + 'static) {
        self.surface_click = Box::new(observer);
    }

    /// The item a visual was created for. The pointer has none.
    pub fn item_for(&self, id: VisualId) -> Option<&MenuItem> {
        self.click_targets.get(&id).and_then(|&i| self.items.get(i))
    }

    pub fn handle_event(&mut self, event: MenuEvent) {
        match event {
            MenuEvent::PointerMove(point) => self.on_pointer_move(point),
            MenuEvent::Resize => self.on_resize(),
            MenuEvent::Click(point) => {
                if let Some(index) = self.hit_item(point) {
                    self.on_item_click(index);
                }
                self.on_surface_click(point);
            }
        }
    }

    pub fn on_pointer_move(&mut self, point: Point) {
        self.pointer.center = point;
        if let Some(visual) = self
            .pointer_id
            .and_then(|id| self.scene.circles.iter_mut().find(|c| c.id == id))
        {
            visual.circle = self.pointer;
        }
        self.draw_connections();
        self.surface.request_redraw();
    }

    pub fn on_resize(&mut self) {
        self.draw_menu();
    }

    /// Runs the action of the item at `index`. Returns whether it succeeded.
    pub fn on_item_click(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(MenuItem::click)
    }

    pub fn on_surface_click(&mut self, point: Point) {
        let size = self.surface.size();
        if size.width <= 0.0 || size.height <= 0.0 {
            log::debug!("Ignoring click on empty surface");
            return;
        }
        (self.surface_click)(point.normalize(size));
    }

    /// Rebuilds every visual from the items, the pointer and the current
    /// surface size, then the connectors.
    pub fn draw_menu(&mut self) {
        let size = self.surface.size();
        let mut next = self.next_id;
        let mut alloc = || {
            let id = VisualId::from(next);
            next += 1;
            id
        };

        let mut circles = Vec::with_capacity(self.items.len() + 1);
        let mut labels = Vec::with_capacity(self.items.len());
        let mut click_targets = HashMap::with_capacity(self.items.len() * 2);

        for (index, item) in self.items.iter().enumerate() {
            let circle = item.circle(size);
            let (circle_id, label_id) = (alloc(), alloc());

            let text_style = self.config.item_text_style(&item.text_style);
            let bounds = self
                .surface
                .measure_text(item.label.as_str(), &text_style)
                .map(|ink| label_bounds(circle.center, ink, text_style.justification));

            circles.push(CircleVisual {
                id: circle_id,
                circle,
                style: self.config.item_style(&item.style),
            });
            labels.push(LabelVisual {
                id: label_id,
                text: item.label.clone(),
                position: circle.center,
                style: text_style,
                bounds,
            });
            click_targets.insert(circle_id, index);
            click_targets.insert(label_id, index);
        }

        let pointer_id = alloc();
        circles.push(CircleVisual {
            id: pointer_id,
            circle: self.pointer,
            style: self.config.pointer_style.clone(),
        });

        self.next_id = next;
        self.pointer_id = Some(pointer_id);
        self.click_targets = click_targets;
        self.scene = Scene {
            connectors: connect_all(&circles, self.config.blend_params()),
            circles,
            labels,
        };

        log::debug!(
            "Laid out {} items on {}x{}, {} connectors",
            self.items.len(),
            size.width,
            size.height,
            self.scene.connectors.len()
        );
        self.surface.request_redraw();
    }

    /// Replaces every connector with a fresh set computed from the current
    /// circles.
    pub fn draw_connections(&mut self) {
        self.scene.connectors = connect_all(&self.scene.circles, self.config.blend_params());
    }

    /// Topmost item visual under `point`. Labels sit above circles; the
    /// pointer is skipped.
    fn hit_item(&self, point: Point) -> Option<usize> {
        let label = self
            .scene
            .labels
            .iter()
            .rev()
            .find(|l| l.bounds.is_some_and(|b| b.contains(point)))
            .map(|l| l.id);
        let circle = || {
            self.scene
                .circles
                .iter()
                .rev()
                .filter(|c| Some(c.id) != self.pointer_id)
                .find(|c| c.circle.contains(point))
                .map(|c| c.id)
        };

        label
            .or_else(circle)
            .and_then(|id| self.click_targets.get(&id).copied())
    }
}

/// One connector per unordered pair that blends, styled like the later
/// circle of the pair.
fn connect_all(circles: &[CircleVisual], params: BlendParams) -> Vec<ConnectorVisual> {
    let mut connectors = Vec::new();
    for (i, a) in circles.iter().enumerate() {
        for b in circles[..i].iter().rev() {
            if let Some(outline) = compute_connector(&a.circle, &b.circle, params) {
                connectors.push(ConnectorVisual {
                    outline,
                    style: a.style.clone(),
                });
            }
        }
    }
    connectors
}
