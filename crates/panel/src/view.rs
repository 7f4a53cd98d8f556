//! What the detail panel shows, derived from the selection and content cache.
//!
//! Nothing here is stored: the host re-reads a fresh `PanelView` after every
//! render effect and replaces the panel DOM wholesale.

use formats::{Category, EventData, GroupRef, Item, ItemBody};
use serde::Serialize;

use crate::sheet::SheetState;

/// Long-form body of the shown item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PanelBody {
    /// Fetched content file, inserted verbatim.
    Html(String),
    /// Short inline description.
    Text(String),
    Loading,
    Empty,
}

/// Where the item's content file stands in the cache.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentState<'a> {
    Ready(&'a str),
    Loading,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkButton {
    pub target_id: String,
    pub label: String,
}

/// Returns from an item's detail to the list of the group it was opened from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackButton {
    pub group: GroupRef,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetail {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub subtitle: Option<String>,
    pub body: PanelBody,
    pub token_cost: Option<u32>,
    pub stamp_category: Option<String>,
    pub link: Option<LinkButton>,
    pub back: Option<BackButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub subtitle: Option<String>,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupList {
    pub group: GroupRef,
    pub title: String,
    pub description: Option<String>,
    pub rows: Vec<MemberRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    None,
    Item(ItemDetail),
    Group(GroupList),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub sheet: SheetState,
    pub visible: bool,
    pub content: PanelContent,
}

/// Inputs for one panel projection.
#[derive(Debug, Copy, Clone)]
pub struct PanelInput<'a> {
    pub sheet: SheetState,
    pub selected: Option<&'a str>,
    pub group: Option<&'a GroupRef>,
    /// True when `selected` was opened from `group`'s list.
    pub selected_in_group: bool,
    /// Cache state of the selected item's content file, if it has one.
    pub content: Option<ContentState<'a>>,
}

impl PanelView {
    pub fn closed() -> Self {
        Self {
            sheet: SheetState::Closed,
            visible: false,
            content: PanelContent::None,
        }
    }

    /// An item's detail takes precedence over the group list.
    pub fn build(data: &EventData, input: PanelInput<'_>) -> Self {
        let content = match (input.selected.and_then(|id| data.item(id)), input.group) {
            (Some(item), group) => {
                let back = group
                    .filter(|_| input.selected_in_group)
                    .and_then(|g| back_button(data, g));
                PanelContent::Item(item_detail(item, input.content, back))
            }
            (None, Some(group)) => match group_list(data, group) {
                Some(list) => PanelContent::Group(list),
                None => PanelContent::None,
            },
            (None, None) => PanelContent::None,
        };

        Self {
            sheet: input.sheet,
            visible: input.sheet.is_visible(),
            content,
        }
    }

    pub fn item(&self) -> Option<&ItemDetail> {
        match &self.content {
            PanelContent::Item(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&GroupList> {
        match &self.content {
            PanelContent::Group(list) => Some(list),
            _ => None,
        }
    }
}

fn back_button(data: &EventData, group: &GroupRef) -> Option<BackButton> {
    let name = data.group_name(group)?;
    Some(BackButton {
        group: group.clone(),
        label: name.to_string(),
    })
}

pub fn item_detail(
    item: &Item,
    content: Option<ContentState<'_>>,
    back: Option<BackButton>,
) -> ItemDetail {
    let body = match item.body() {
        ItemBody::ContentFile(_) => match content {
            Some(ContentState::Ready(html)) => PanelBody::Html(html.to_string()),
            Some(ContentState::Loading) => PanelBody::Loading,
            Some(ContentState::Failed) | None => PanelBody::Empty,
        },
        ItemBody::Description(text) => PanelBody::Text(text.to_string()),
        ItemBody::None => PanelBody::Empty,
    };

    ItemDetail {
        id: item.id.clone(),
        category: item.category,
        title: item.name.clone(),
        subtitle: item.subtitle.clone(),
        body,
        token_cost: item.token_cost,
        stamp_category: item.stamp_category.clone(),
        link: item.link().map(|(target, label)| LinkButton {
            target_id: target.to_string(),
            label: label.to_string(),
        }),
        back,
    }
}

/// `None` for an unknown group.
pub fn group_list(data: &EventData, group: &GroupRef) -> Option<GroupList> {
    let title = data.group_name(group)?.to_string();
    let description = match group {
        GroupRef::Row(id) => data.row(id).and_then(|r| r.description.clone()),
        GroupRef::Story(_) => None,
    };
    let rows = data
        .group_members(group)
        .into_iter()
        .map(|item| MemberRow {
            id: item.id.clone(),
            name: item.name.clone(),
            subtitle: item.subtitle.clone(),
            category: item.category,
        })
        .collect();

    Some(GroupList {
        group: group.clone(),
        title,
        description,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data() -> EventData {
        let payload = r#"{
            "items": [
                {"id": "b1", "type": "booth", "name": "Calligraphy", "lat": 37.2661, "lng": -122.0127,
                 "subtitle": "Brush and ink", "description": "Write your name.", "token": 2},
                {"id": "b3", "type": "booth", "name": "Lanterns", "lat": 37.2662, "lng": -122.0126,
                 "description_file": "b3.html", "link_to_id": "b1"},
                {"id": "b7", "type": "food", "name": "Dumplings", "lat": 37.2663, "lng": -122.0125,
                 "stamp_category": "food"}
            ],
            "stories": [{"id": "story-dragon", "name": "Dragon", "itemIds": ["b1", "b3", "b7"]}],
            "rows": [{"rowId": 4, "name": "Row 4", "description": "North lawn", "lat": 37.2, "lng": -122.0,
                      "itemIds": ["b7"]}]
        }"#;
        EventData::from_json_str(payload).expect("parse").0
    }

    fn input<'a>(
        selected: Option<&'a str>,
        group: Option<&'a GroupRef>,
        content: Option<ContentState<'a>>,
    ) -> PanelInput<'a> {
        PanelInput {
            sheet: SheetState::FullyOpen,
            selected,
            group,
            selected_in_group: selected.is_some() && group.is_some(),
            content,
        }
    }

    #[test]
    fn item_with_description_renders_text_and_fields() {
        let data = data();
        let view = PanelView::build(&data, input(Some("b1"), None, None));
        let detail = view.item().expect("item");
        assert_eq!(detail.title, "Calligraphy");
        assert_eq!(detail.subtitle.as_deref(), Some("Brush and ink"));
        assert_eq!(detail.body, PanelBody::Text("Write your name.".into()));
        assert_eq!(detail.token_cost, Some(2));
        assert_eq!(detail.back, None);
        assert!(view.visible);
    }

    #[test]
    fn content_file_body_follows_cache_state() {
        let data = data();
        let body = |content| {
            PanelView::build(&data, input(Some("b3"), None, content))
                .item()
                .expect("item")
                .body
                .clone()
        };
        assert_eq!(body(Some(ContentState::Loading)), PanelBody::Loading);
        assert_eq!(
            body(Some(ContentState::Ready("<p>hi</p>"))),
            PanelBody::Html("<p>hi</p>".into())
        );
        assert_eq!(body(Some(ContentState::Failed)), PanelBody::Empty);
    }

    #[test]
    fn link_label_falls_back_to_target_id() {
        let data = data();
        let view = PanelView::build(&data, input(Some("b3"), None, None));
        assert_eq!(
            view.item().expect("item").link,
            Some(LinkButton {
                target_id: "b1".into(),
                label: "b1".into(),
            })
        );
    }

    #[test]
    fn group_without_selection_lists_members_in_order() {
        let data = data();
        let story = GroupRef::Story("story-dragon".into());
        let view = PanelView::build(&data, input(None, Some(&story), None));
        let list = view.group().expect("group");
        assert_eq!(list.title, "Dragon");
        let ids: Vec<&str> = list.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b3", "b7"]);
    }

    #[test]
    fn member_detail_has_a_back_button() {
        let data = data();
        let story = GroupRef::Story("story-dragon".into());
        let view = PanelView::build(&data, input(Some("b3"), Some(&story), None));
        assert_eq!(
            view.item().expect("item").back,
            Some(BackButton {
                group: story.clone(),
                label: "Dragon".into(),
            })
        );
    }

    #[test]
    fn row_list_carries_its_description() {
        let data = data();
        let row = GroupRef::Row("4".into());
        let view = PanelView::build(&data, input(None, Some(&row), None));
        assert_eq!(
            view.group().expect("row").description.as_deref(),
            Some("North lawn")
        );
    }

    #[test]
    fn nothing_selected_is_empty_content() {
        let data = data();
        let view = PanelView::build(&data, input(Some("missing"), None, None));
        assert_eq!(view.content, PanelContent::None);
        assert_eq!(PanelView::closed().visible, false);
    }

    #[test]
    fn wire_shape_is_tagged_for_the_host() {
        let data = data();
        let view = PanelView::build(&data, input(Some("b1"), None, None));
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(json["sheet"], "fully_open");
        assert_eq!(json["content"]["kind"], "item");
        assert_eq!(json["content"]["body"]["kind"], "text");
        assert_eq!(json["content"]["body"]["value"], "Write your name.");
        assert_eq!(
            serde_json::to_value(PanelBody::Loading).expect("json")["kind"],
            "loading"
        );
    }
}
