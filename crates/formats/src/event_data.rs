use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use foundation::{LatLng, LatLngBounds};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Default resource name of the event data document, relative to the page.
pub const EVENT_DATA_FILE_NAME: &str = "event_data.json";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Booth,
    Food,
    Stage,
    Restroom,
    Service,
    Checkin,
    Medical,
    Foodtruck,
    DemoDrive,
    Parking,
    Surprise,
    Prize,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Booth,
        Category::Food,
        Category::Stage,
        Category::Restroom,
        Category::Service,
        Category::Checkin,
        Category::Medical,
        Category::Foodtruck,
        Category::DemoDrive,
        Category::Parking,
        Category::Surprise,
        Category::Prize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Booth => "booth",
            Category::Food => "food",
            Category::Stage => "stage",
            Category::Restroom => "restroom",
            Category::Service => "service",
            Category::Checkin => "checkin",
            Category::Medical => "medical",
            Category::Foodtruck => "foodtruck",
            Category::DemoDrive => "demo_drive",
            Category::Parking => "parking",
            Category::Surprise => "surprise",
            Category::Prize => "prize",
        }
    }

    /// Booths and food booths are packed in rows; their markers keep a fixed size.
    pub fn is_booth_like(self) -> bool {
        matches!(self, Category::Booth | Category::Food)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of interest on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Long-form HTML fragment, fetched on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_file: Option<String>,
    /// Token cost of the activity.
    #[serde(default, rename = "token", skip_serializing_if = "Option::is_none")]
    pub token_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_display: Option<String>,
}

/// Wire form of `Item`. Older documents carry `coordinates: [lat, lng]`
/// instead of separate `lat`/`lng` fields.
#[derive(Deserialize)]
struct RawItem {
    id: String,
    #[serde(rename = "type")]
    category: Category,
    name: String,
    lat: Option<f64>,
    lng: Option<f64>,
    coordinates: Option<[f64; 2]>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    description_file: Option<String>,
    #[serde(default, rename = "token")]
    token_cost: Option<u32>,
    #[serde(default)]
    stamp_category: Option<String>,
    #[serde(default)]
    link_to_id: Option<String>,
    #[serde(default)]
    link_display: Option<String>,
}

impl TryFrom<RawItem> for Item {
    type Error = String;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        let (lat, lng) = match (raw.lat, raw.lng, raw.coordinates) {
            (Some(lat), Some(lng), _) => (lat, lng),
            (_, _, Some([lat, lng])) => (lat, lng),
            _ => return Err(format!("item {}: missing lat/lng", raw.id)),
        };
        Ok(Item {
            id: raw.id,
            category: raw.category,
            name: raw.name,
            lat,
            lng,
            subtitle: raw.subtitle,
            description: raw.description,
            description_file: raw.description_file,
            token_cost: raw.token_cost,
            stamp_category: raw.stamp_category,
            link_to_id: raw.link_to_id,
            link_display: raw.link_display,
        })
    }
}

/// What the detail panel renders as an item's body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ItemBody<'a> {
    ContentFile(&'a str),
    Description(&'a str),
    None,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Item {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn content_file(&self) -> Option<&str> {
        non_empty(&self.description_file)
    }

    /// A content file reference takes precedence over the short description.
    pub fn body(&self) -> ItemBody<'_> {
        if let Some(file) = self.content_file() {
            return ItemBody::ContentFile(file);
        }
        match non_empty(&self.description) {
            Some(text) => ItemBody::Description(text),
            None => ItemBody::None,
        }
    }

    /// Linked item id and its button label. The label falls back to the id.
    pub fn link(&self) -> Option<(&str, &str)> {
        let target = non_empty(&self.link_to_id)?;
        let label = non_empty(&self.link_display).unwrap_or(target);
        Some((target, label))
    }
}

/// A curated tour across several items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "itemIds", alias = "items")]
    pub item_ids: Vec<String>,
}

/// Items grouped by physical layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "rowId", alias = "id", deserialize_with = "de_flexible_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, rename = "itemIds", alias = "items")]
    pub item_ids: Vec<String>,
}

impl Row {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

// Row ids were numeric in older documents.
fn de_flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

/// Addresses a story or a row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum GroupRef {
    Story(String),
    Row(String),
}

impl GroupRef {
    pub fn id(&self) -> &str {
        match self {
            GroupRef::Story(id) | GroupRef::Row(id) => id,
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Story(id) => write!(f, "story '{id}'"),
            GroupRef::Row(id) => write!(f, "row '{id}'"),
        }
    }
}

/// Wire form of the event data document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingRef {
    pub group: GroupRef,
    pub item_id: String,
}

impl fmt::Display for DanglingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} references unknown item '{}'", self.group, self.item_id)
    }
}

/// Findings collected while loading. None of them prevent loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Later duplicates are dropped; the first occurrence wins.
    pub duplicate_item_ids: Vec<String>,
    /// Group members with no matching item. They resolve to nothing.
    pub dangling: Vec<DanglingRef>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_item_ids.is_empty() && self.dangling.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .duplicate_item_ids
            .iter()
            .map(|id| format!("duplicate item id '{id}'"))
            .collect();
        out.extend(self.dangling.iter().map(|d| d.to_string()));
        out
    }
}

#[derive(Debug)]
pub enum EventDataError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Strict loading rejects any finding in the report.
    Invalid(LoadReport),
}

impl fmt::Display for EventDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDataError::Io(err) => write!(f, "I/O error: {err}"),
            EventDataError::Parse(err) => write!(f, "event data parse error: {err}"),
            EventDataError::Invalid(report) => {
                write!(f, "event data invalid: {}", report.messages().join("; "))
            }
        }
    }
}

impl std::error::Error for EventDataError {}

/// Loaded, immutable event data.
#[derive(Debug, Clone, Default)]
pub struct EventData {
    items: IndexMap<String, Item>,
    stories: Vec<Story>,
    rows: Vec<Row>,
}

impl EventData {
    pub fn from_document(doc: EventDocument) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let mut items: IndexMap<String, Item> = IndexMap::with_capacity(doc.items.len());
        for item in doc.items {
            if items.contains_key(&item.id) {
                report.duplicate_item_ids.push(item.id);
                continue;
            }
            items.insert(item.id.clone(), item);
        }

        let data = Self {
            items,
            stories: doc.stories,
            rows: doc.rows,
        };

        for (group, ids) in data.groups() {
            for id in ids {
                if !data.items.contains_key(id) {
                    report.dangling.push(DanglingRef {
                        group: group.clone(),
                        item_id: id.clone(),
                    });
                }
            }
        }

        (data, report)
    }

    pub fn from_json_str(payload: &str) -> Result<(Self, LoadReport), EventDataError> {
        let doc: EventDocument = serde_json::from_str(payload).map_err(EventDataError::Parse)?;
        Ok(Self::from_document(doc))
    }

    /// Like `from_json_str`, but any report finding is an error.
    pub fn from_json_str_strict(payload: &str) -> Result<Self, EventDataError> {
        let (data, report) = Self::from_json_str(payload)?;
        if !report.is_clean() {
            return Err(EventDataError::Invalid(report));
        }
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadReport), EventDataError> {
        let payload = fs::read_to_string(path).map_err(EventDataError::Io)?;
        Self::from_json_str(&payload)
    }

    fn groups(&self) -> impl Iterator<Item = (GroupRef, &[String])> + '_ {
        let stories = self
            .stories
            .iter()
            .map(|s| (GroupRef::Story(s.id.clone()), s.item_ids.as_slice()));
        let rows = self
            .rows
            .iter()
            .map(|r| (GroupRef::Row(r.id.clone()), r.item_ids.as_slice()));
        stories.chain(rows)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Items in document order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn group_name(&self, group: &GroupRef) -> Option<&str> {
        match group {
            GroupRef::Story(id) => self.story(id).map(|s| s.name.as_str()),
            GroupRef::Row(id) => self.row(id).map(|r| r.name.as_str()),
        }
    }

    /// Resolved members in the group's declared order.
    ///
    /// Unknown ids are filtered out and repeated ids appear once. An unknown
    /// group resolves to an empty list.
    pub fn group_members(&self, group: &GroupRef) -> Vec<&Item> {
        let ids: &[String] = match group {
            GroupRef::Story(id) => self.story(id).map(|s| s.item_ids.as_slice()),
            GroupRef::Row(id) => self.row(id).map(|r| r.item_ids.as_slice()),
        }
        .unwrap_or(&[]);

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        ids.iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.items.values().map(Item::position))
    }

    /// Every distinct content file referenced by an item, sorted.
    pub fn content_files(&self) -> BTreeSet<&str> {
        self.items.values().filter_map(Item::content_file).collect()
    }
}
