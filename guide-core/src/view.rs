//! View state for one search cycle: what is loading, what failed, what the
//! map should show. All mutations happen on the caller's thread; async
//! lookups hand their results back through the `apply_*` methods together
//! with the ticket of the cycle they belong to, so a completion that
//! outlives its cycle cannot overwrite newer state.

use serde::{Deserialize, Serialize};

use crate::model::{Coordinates, PlaceOfInterest, WeatherReport};

/// Initial viewport before any search (country-level view).
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: -14.235,
    lon: -51.925,
};
pub const DEFAULT_ZOOM: u8 = 4;
/// Viewport zoom once a city resolves.
pub const CITY_ZOOM: u8 = 13;
/// Viewport zoom when focusing a single place.
pub const PLACE_ZOOM: u8 = 15;

/// Map viewport a rendering surface would display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Capture of the search generation a lookup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

/// Mutually-exclusive display sections derived from the state.
#[derive(Debug, PartialEq)]
pub enum Section<'a> {
    /// Nothing searched yet.
    Prompt,
    /// Primary lookup in flight.
    Loading,
    /// Primary lookup failed.
    Error(&'a str),
    /// Weather resolved; list/map/excerpt render from their own slices.
    Results(&'a WeatherReport),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    generation: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub weather: Option<WeatherReport>,
    pub places: Vec<PlaceOfInterest>,
    pub excerpt: Option<String>,
    /// Id of the currently selected place, if any.
    pub selected: Option<String>,
    pub map: MapView,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search cycle. Empty (or whitespace-only) queries are a
    /// no-op and return no ticket. Otherwise all prior results, errors and
    /// selection are cleared, loading is set, and the returned ticket marks
    /// every lookup belonging to this cycle.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.weather = None;
        self.places.clear();
        self.excerpt = None;
        self.selected = None;

        Some(SearchTicket {
            generation: self.generation,
        })
    }

    fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Primary lookup succeeded: set the weather slice, recenter the map on
    /// the resolved city, clear loading. Secondary slices stay untouched.
    pub fn apply_weather(&mut self, ticket: SearchTicket, report: WeatherReport) {
        if !self.is_current(ticket) {
            return;
        }
        self.map.center = report.coord;
        self.map.zoom = CITY_ZOOM;
        self.weather = Some(report);
        self.loading = false;
    }

    /// Primary lookup failed: one user-facing message, loading cleared.
    pub fn fail_search(&mut self, ticket: SearchTicket, message: impl Into<String>) {
        if !self.is_current(ticket) {
            return;
        }
        self.error = Some(message.into());
        self.loading = false;
    }

    /// Places lookup settled; updates only its own slice.
    pub fn apply_places(&mut self, ticket: SearchTicket, places: Vec<PlaceOfInterest>) {
        if !self.is_current(ticket) {
            return;
        }
        self.places = places;
    }

    /// Excerpt lookup settled; updates only its own slice. `None` covers
    /// both "no page" and "disambiguation page" outcomes.
    pub fn apply_excerpt(&mut self, ticket: SearchTicket, excerpt: Option<String>) {
        if !self.is_current(ticket) {
            return;
        }
        self.excerpt = excerpt;
    }

    /// Selection from the list: selects the place and re-centers the map on
    /// it at place zoom. Unknown ids are ignored.
    pub fn select_from_list(&mut self, id: &str) -> bool {
        let Some(place) = self.places.iter().find(|p| p.id == id) else {
            return false;
        };
        self.map.center = place.coord;
        self.map.zoom = PLACE_ZOOM;
        self.selected = Some(place.id.clone());
        true
    }

    /// Selection from a map marker: same selected identity as the list
    /// entry point, but the viewport stays where it is.
    pub fn select_marker(&mut self, id: &str) -> bool {
        let Some(place) = self.places.iter().find(|p| p.id == id) else {
            return false;
        };
        self.selected = Some(place.id.clone());
        true
    }

    /// Close the detail popover.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_place(&self) -> Option<&PlaceOfInterest> {
        let id = self.selected.as_deref()?;
        self.places.iter().find(|p| p.id == id)
    }

    /// Which single status section is visible. The conditions are mutually
    /// exclusive: a cycle either is in flight, failed, or produced weather;
    /// before the first submit none of those hold.
    pub fn visible_section(&self) -> Section<'_> {
        if self.loading {
            return Section::Loading;
        }
        if let Some(error) = self.error.as_deref() {
            return Section::Error(error);
        }
        match self.weather.as_ref() {
            Some(report) => Section::Results(report),
            None => Section::Prompt,
        }
    }
}
