mod line_renderer;

pub use line_renderer::{LineRenderer, format_addr};
