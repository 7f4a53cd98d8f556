pub mod markers;
pub mod symbology;

pub use markers::*;
pub use symbology::*;
