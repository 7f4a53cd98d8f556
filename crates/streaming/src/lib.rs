pub mod cache;
pub mod request;
pub mod residency;

pub use cache::*;
pub use request::*;
pub use residency::*;
