pub mod map_view;
pub mod selection;

pub use map_view::*;
pub use selection::*;
