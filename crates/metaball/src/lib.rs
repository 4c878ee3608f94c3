pub mod config;
pub mod connector;
pub mod geometry;
pub mod macros;
pub mod menu;
pub mod style;

pub use config::{MenuConfig, PointerConfig, ResolvedConfig};
pub use connector::{BlendParams, Connector, Segment, compute_connector};
pub use geometry::{Circle, CubicBezier, NormalizedPoint, Point, Rect, Size};
pub use menu::{CircleMenu, Clickable, MenuError, MenuEvent, MenuItem, Renderer, Scene, Surface};
pub use style::{Color, Style, StyleLayer, TextStyle, TextStyleLayer};
