//! Recording fakes for the map, list, notifier, storage and position source.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use waymark::storage::{AppConfig, DurableStore, MemoryStore, StorageError};
use waymark::view::{
    GeolocationError, GeolocationProvider, ListRenderer, MapProvider, MarkerHandle, Notice,
    Notifier,
};
use waymark::workouts::{Coordinates, WorkoutId};
use waymark::App;

/// A marker currently on the fake map.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: WorkoutId,
    pub coordinates: Coordinates,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct MapState {
    next: u64,
    pub markers: BTreeMap<u64, PlacedMarker>,
    pub views: Vec<(Coordinates, u8)>,
}

impl MapState {
    pub fn marker_for(&self, id: &WorkoutId) -> Option<&PlacedMarker> {
        self.markers.values().find(|m| &m.id == id)
    }
}

pub struct FakeMap(pub Rc<RefCell<MapState>>);

impl MapProvider for FakeMap {
    fn place_marker(&mut self, id: &WorkoutId, coordinates: Coordinates) -> MarkerHandle {
        let mut state = self.0.borrow_mut();
        state.next += 1;
        let handle = state.next;
        state.markers.insert(
            handle,
            PlacedMarker {
                id: id.clone(),
                coordinates,
                text: String::new(),
            },
        );
        MarkerHandle(handle)
    }

    fn remove_marker(&mut self, handle: &MarkerHandle) {
        self.0.borrow_mut().markers.remove(&handle.0);
    }

    fn set_marker_text(&mut self, handle: &MarkerHandle, text: &str) {
        if let Some(marker) = self.0.borrow_mut().markers.get_mut(&handle.0) {
            marker.text = text.to_string();
        }
    }

    fn pan_to(&mut self, coordinates: Coordinates, zoom: u8) {
        self.0.borrow_mut().views.push((coordinates, zoom));
    }
}

/// A list entry currently rendered by the fake list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: WorkoutId,
    pub html: String,
    pub title: Option<String>,
}

#[derive(Debug, Default)]
pub struct ListState {
    pub items: Vec<ListItem>,
    pub controls_visible: bool,
    pub rebuilds: usize,
}

impl ListState {
    pub fn ids(&self) -> Vec<WorkoutId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn item(&self, id: &WorkoutId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}

pub struct FakeList(pub Rc<RefCell<ListState>>);

impl ListRenderer for FakeList {
    fn append_item(&mut self, id: &WorkoutId, html: &str) {
        self.0.borrow_mut().items.push(ListItem {
            id: id.clone(),
            html: html.to_string(),
            title: None,
        });
    }

    fn remove_item(&mut self, id: &WorkoutId) {
        self.0.borrow_mut().items.retain(|item| &item.id != id);
    }

    fn clear_items(&mut self) {
        let mut state = self.0.borrow_mut();
        state.items.clear();
        state.rebuilds += 1;
    }

    fn patch_item_text(&mut self, id: &WorkoutId, text: &str) {
        let mut state = self.0.borrow_mut();
        if let Some(item) = state.items.iter_mut().find(|item| &item.id == id) {
            item.title = Some(text.to_string());
        }
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.0.borrow_mut().controls_visible = visible;
    }
}

pub struct FakeNotifier(pub Rc<RefCell<Vec<Notice>>>);

impl Notifier for FakeNotifier {
    fn show(&mut self, notice: Notice) {
        self.0.borrow_mut().push(notice);
    }
}

/// Durable store whose contents stay visible to the test.
pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

impl DurableStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().remove(key)
    }
}

/// Position source that never answers.
pub struct SilentLocation;

impl GeolocationProvider for SilentLocation {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
        std::future::pending()
    }
}

/// Position source that refuses.
pub struct DeniedLocation;

impl GeolocationProvider for DeniedLocation {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<Coordinates, GeolocationError>> + Send {
        async { Err(GeolocationError::Unavailable("denied".to_string())) }
    }
}

/// Shared state of all fakes handed to one [`App`].
#[derive(Default)]
pub struct Harness {
    pub map: Rc<RefCell<MapState>>,
    pub list: Rc<RefCell<ListState>>,
    pub notices: Rc<RefCell<Vec<Notice>>>,
    pub storage: Rc<RefCell<MemoryStore>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Harness whose storage starts with `json` under the default key.
    pub fn with_stored(json: &str) -> Self {
        Self {
            storage: Rc::new(RefCell::new(MemoryStore::with_entry("workouts", json))),
            ..Self::default()
        }
    }

    pub fn app(&self, config: AppConfig) -> App {
        App::new(
            config,
            Box::new(SharedStore(self.storage.clone())),
            Box::new(FakeList(self.list.clone())),
            Box::new(FakeNotifier(self.notices.clone())),
        )
    }

    pub fn map(&self) -> Box<FakeMap> {
        Box::new(FakeMap(self.map.clone()))
    }

    pub fn stored(&self) -> Option<String> {
        self.storage.borrow().get("workouts").unwrap()
    }
}
