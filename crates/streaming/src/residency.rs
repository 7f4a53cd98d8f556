/// Lifecycle of a cached content file.
///
/// Requested → Resident. A failed fetch drops the entry instead of storing a
/// failure state, so the next lookup starts over at Requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResidencyState {
    Requested,
    Resident,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Residency {
    pub state: ResidencyState,
}

impl Residency {
    pub fn new() -> Self {
        Self {
            state: ResidencyState::Requested,
        }
    }
}

impl Default for Residency {
    fn default() -> Self {
        Self::new()
    }
}
