use foundation::LatLng;
use formats::GroupRef;
use panel::Gesture;
use streaming::Request;

/// What caused an item selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectSource {
    /// A marker click; always opens the sheet fully.
    Marker,
    /// The linked-item button inside the panel; keeps the sheet height.
    Link,
}

/// Input to the store, applied in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectItem { id: String, source: SelectSource },
    /// A row tapped in the active group's member list.
    OpenGroupMember { id: String },
    /// `None` clears the group.
    ChooseGroup(Option<GroupRef>),
    MapBackgroundClick,
    /// From a member's detail back to its group list.
    Back,
    /// Follows the shown item's link, if it has one.
    FollowLink,
    Gesture(Gesture),
    ClosePanel,
    SetView { center: LatLng, zoom: f64 },
    Resize { width_px: f64, height_px: f64 },
    InfoOpen,
    InfoClose,
    InfoSelectTab(usize),
}

/// Identifies one content fetch and the panel state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTicket {
    pub request: Request,
    pub item_id: String,
    pub filename: String,
    /// Store generation at issue time; bumped whenever the shown item changes.
    pub generation: u64,
}

/// Work for the host, drained after each dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchContent(ContentTicket),
    Recenter { center: LatLng, zoom: f64 },
    /// Projections changed; re-read markers and panel.
    Render,
}
