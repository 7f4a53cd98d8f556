//! Shared state of the event map.
//!
//! Every input arrives as a typed [`Command`]; the store applies it and emits
//! [`Effect`]s for the host to carry out. Render projections (markers, panel,
//! selectors) are computed on demand from the authoritative state.

pub mod command;
pub mod config;
pub mod event_map;

pub use command::*;
pub use config::*;
pub use event_map::*;
