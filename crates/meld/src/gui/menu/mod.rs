pub mod view;

pub use view::{CairoRenderer, draw, measure_text};
