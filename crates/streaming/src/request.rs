/// Identifies one outstanding content fetch.
///
/// Handles are issued in increasing order and never reused, so a completion
/// for a forgotten request can be told apart from a live one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Request(pub u64);
