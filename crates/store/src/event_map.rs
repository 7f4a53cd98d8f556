use std::collections::BTreeSet;

use foundation::LatLng;
use formats::{EventData, EventDataError, GroupRef, LoadReport};
use layers::{Marker, marker_layer};
use panel::{
    ContentState, DragOrigin, DragTracker, Gesture, InfoDialog, PanelInput, PanelView, SheetState,
};
use runtime::EventBus;
use scene::MapView;
use serde::Serialize;
use streaming::{CacheError, ContentCache, FetchError, Lookup};

use crate::command::{Command, ContentTicket, Effect, SelectSource};
use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    /// The map stays usable but empty.
    Failed(String),
}

/// One entry of the story or row selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOption {
    pub group: GroupRef,
    pub name: String,
    pub member_count: usize,
    pub active: bool,
}

/// The single owner of interaction state.
#[derive(Debug)]
pub struct EventMap {
    config: AppConfig,
    data: EventData,
    report: LoadReport,
    load_state: LoadState,
    view: MapView,
    sheet: SheetState,
    drag: DragTracker,
    info: InfoDialog,
    cache: ContentCache,
    /// Content files whose latest fetch for the shown item failed.
    failed: BTreeSet<String>,
    generation: u64,
    commands: EventBus<Command>,
    effects: EventBus<Effect>,
}

impl EventMap {
    pub fn new(config: AppConfig) -> Self {
        Self {
            view: MapView::new(config.map),
            drag: DragTracker::new(config.gestures),
            cache: ContentCache::new(config.cache_policy()),
            config,
            data: EventData::default(),
            report: LoadReport::default(),
            load_state: LoadState::Pending,
            sheet: SheetState::Closed,
            info: InfoDialog::default(),
            failed: BTreeSet::new(),
            generation: 0,
            commands: EventBus::new(),
            effects: EventBus::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn sheet(&self) -> SheetState {
        self.sheet
    }

    pub fn info(&self) -> InfoDialog {
        self.info
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Installs a freshly fetched event document.
    ///
    /// Dangling references are reported, not fatal. On a parse error the map
    /// is left empty and the error is returned for logging.
    pub fn load(&mut self, payload: &str) -> Result<&LoadReport, EventDataError> {
        match EventData::from_json_str(payload) {
            Ok((data, report)) => {
                self.data = data;
                self.report = report;
                self.load_state = LoadState::Ready;
                self.reset_interaction();
                Ok(&self.report)
            }
            Err(e) => {
                self.load_failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Records a failed load. The map renders with no markers.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.data = EventData::default();
        self.report = LoadReport::default();
        self.load_state = LoadState::Failed(message.into());
        self.reset_interaction();
    }

    fn reset_interaction(&mut self) {
        self.view.clear();
        self.sheet = SheetState::Closed;
        self.failed.clear();
        self.generation += 1;
        self.effects.emit(Effect::Render);
    }

    /// Queues `command` and applies everything queued, including commands
    /// emitted while applying.
    pub fn dispatch(&mut self, command: Command) {
        self.commands.emit(command);
        while let Some(next) = self.commands.pop() {
            self.apply(next);
        }
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain()
    }

    pub fn drag_begin(&mut self, origin: DragOrigin, y_px: f64) {
        self.drag.begin(origin, y_px);
    }

    /// Ends a sheet drag and applies the resulting gesture.
    pub fn drag_end(&mut self, y_px: f64) -> Gesture {
        let gesture = self.drag.end(y_px);
        if gesture != Gesture::None {
            self.dispatch(Command::Gesture(gesture));
        }
        gesture
    }

    fn has_item(&self) -> bool {
        self.view.selection().selected().is_some()
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SelectItem { id, source } => {
                if self.data.item(&id).is_none() {
                    return;
                }
                if let Some(center) = self.view.select_item(&self.data, &id) {
                    self.recenter(center);
                }
                self.sheet = match source {
                    SelectSource::Marker => self.sheet.open(),
                    SelectSource::Link if self.sheet.is_visible() => self.sheet,
                    SelectSource::Link => self.sheet.open(),
                };
                self.show_selected();
            }
            Command::OpenGroupMember { id } => {
                if self.data.item(&id).is_none() {
                    return;
                }
                if let Some(center) = self.view.open_group_member(&self.data, &id) {
                    self.recenter(center);
                }
                self.sheet = self.sheet.open();
                self.show_selected();
            }
            Command::ChooseGroup(group) => {
                let count = self.view.choose_group(&self.data, group);
                self.sheet = if count > 0 {
                    self.sheet.open()
                } else {
                    self.sheet.close()
                };
                self.show_selected();
            }
            Command::MapBackgroundClick => {
                self.set_sheet(self.sheet.background_tap(self.has_item()));
            }
            Command::Back => {
                if self.view.back_to_group() {
                    self.sheet = self.sheet.open();
                    self.show_selected();
                }
            }
            Command::FollowLink => {
                let target = self
                    .view
                    .selection()
                    .selected()
                    .and_then(|id| self.data.item(id))
                    .and_then(|item| item.link())
                    .map(|(target, _)| target.to_string());
                if let Some(id) = target {
                    self.commands.emit(Command::SelectItem {
                        id,
                        source: SelectSource::Link,
                    });
                }
            }
            Command::Gesture(gesture) => {
                let has_item = self.has_item();
                let next = match gesture {
                    Gesture::SwipeUp => self.sheet.swipe_up(),
                    Gesture::SwipeDown => self.sheet.swipe_down(has_item),
                    Gesture::HandleTap => self.sheet.handle_tap(has_item),
                    Gesture::None => self.sheet,
                };
                self.set_sheet(next);
            }
            Command::ClosePanel => {
                self.view.clear();
                self.sheet = self.sheet.close();
                self.show_selected();
            }
            Command::SetView { center, zoom } => {
                let before = self.view.zoom();
                self.view.set_view(center, zoom);
                if self.view.zoom() != before {
                    self.effects.emit(Effect::Render);
                }
            }
            Command::Resize {
                width_px,
                height_px,
            } => {
                self.view.set_viewport_size(width_px, height_px);
            }
            Command::InfoOpen => {
                self.info.open();
                self.effects.emit(Effect::Render);
            }
            Command::InfoClose => {
                self.info.close();
                self.effects.emit(Effect::Render);
            }
            Command::InfoSelectTab(index) => {
                if self.info.select_tab(index) {
                    self.effects.emit(Effect::Render);
                }
            }
        }
    }

    fn set_sheet(&mut self, next: SheetState) {
        if next != self.sheet {
            self.sheet = next;
            self.effects.emit(Effect::Render);
        }
    }

    fn recenter(&mut self, center: LatLng) {
        self.effects.emit(Effect::Recenter {
            center,
            zoom: self.view.zoom(),
        });
    }

    /// The shown item may have changed: start a new generation, look up its
    /// content and render.
    fn show_selected(&mut self) {
        self.generation += 1;
        let wanted = self
            .view
            .selection()
            .selected()
            .and_then(|id| self.data.item(id))
            .and_then(|item| item.content_file().map(|f| (item.id.clone(), f.to_string())));

        if let Some((item_id, filename)) = wanted {
            self.failed.remove(&filename);
            if let Lookup::Fetch(request) = self.cache.lookup(&filename) {
                self.effects.emit(Effect::FetchContent(ContentTicket {
                    request,
                    item_id,
                    filename,
                    generation: self.generation,
                }));
            }
        }
        self.effects.emit(Effect::Render);
    }

    /// Content file of the item currently shown in the panel.
    pub fn current_content_file(&self) -> Option<&str> {
        self.view
            .selection()
            .selected()
            .and_then(|id| self.data.item(id))
            .and_then(|item| item.content_file())
    }

    /// A ticket is current if it was issued for the shown item, or if the
    /// shown item is waiting on the same file and this ticket is the only
    /// fetch for it still in flight.
    pub fn is_current(&self, ticket: &ContentTicket) -> bool {
        if ticket.generation == self.generation {
            return true;
        }
        self.current_content_file() == Some(ticket.filename.as_str())
            && self
                .cache
                .requests_for(&ticket.filename)
                .all(|req| req == ticket.request)
    }

    /// Applies a finished content fetch.
    ///
    /// Successful text is always cached and re-renders the panel when the
    /// shown item uses that file. Only a current ticket marks the file as
    /// failed. Returns whether the panel was affected; a fetch failure is
    /// returned as an error for logging.
    pub fn content_loaded(
        &mut self,
        ticket: &ContentTicket,
        result: Result<String, FetchError>,
    ) -> Result<bool, CacheError> {
        let current = self.is_current(ticket);
        match self.cache.complete(ticket.request, result) {
            Ok(_) => {
                let shown = self.current_content_file() == Some(ticket.filename.as_str());
                if shown {
                    self.effects.emit(Effect::Render);
                }
                Ok(shown)
            }
            Err(err @ CacheError::Fetch { .. }) => {
                if current {
                    self.failed.insert(ticket.filename.clone());
                    self.effects.emit(Effect::Render);
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn markers(&self) -> Vec<Marker> {
        marker_layer(
            &self.data,
            self.view.selection(),
            self.view.zoom(),
            &self.config.markers,
        )
    }

    pub fn panel(&self) -> PanelView {
        let content = self.current_content_file().map(|file| {
            if let Some(text) = self.cache.get(file) {
                ContentState::Ready(text)
            } else if self.failed.contains(file) {
                ContentState::Failed
            } else {
                ContentState::Loading
            }
        });
        let selection = self.view.selection();
        PanelView::build(
            &self.data,
            PanelInput {
                sheet: self.sheet,
                selected: selection.selected(),
                group: selection.group(),
                selected_in_group: self.view.selected_in_group(),
                content,
            },
        )
    }

    pub fn stories(&self) -> Vec<GroupOption> {
        self.data
            .stories()
            .iter()
            .map(|s| self.group_option(GroupRef::Story(s.id.clone()), &s.name))
            .collect()
    }

    pub fn rows(&self) -> Vec<GroupOption> {
        self.data
            .rows()
            .iter()
            .map(|r| self.group_option(GroupRef::Row(r.id.clone()), &r.name))
            .collect()
    }

    fn group_option(&self, group: GroupRef, name: &str) -> GroupOption {
        GroupOption {
            member_count: self.data.group_members(&group).len(),
            active: self.view.selection().group() == Some(&group),
            group,
            name: name.to_string(),
        }
    }
}
