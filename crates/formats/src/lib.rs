pub mod booth_source;
pub mod event_data;

pub use booth_source::*;
pub use event_data::*;
