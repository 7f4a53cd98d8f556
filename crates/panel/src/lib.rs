pub mod gesture;
pub mod info;
pub mod sheet;
pub mod view;

pub use gesture::*;
pub use info::*;
pub use sheet::*;
pub use view::*;
