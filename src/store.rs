//! Ordered waypoint collection: start, hops, destination.
//!
//! The store is the single source of truth for the user's stops. All
//! mutation goes through the methods below so the role invariants hold
//! at every point: one start first, one destination last, at most
//! `MAX_HOPS` hops in between.

use tracing::debug;

use crate::error::StoreError;
use crate::model::{
    Location, MAX_HOPS, MAX_SUGGESTIONS, MIN_QUERY_CHARS, WaypointEntry, WaypointId, WaypointType,
};

/// Coordinates closer than this on both axes count as the same place.
pub const DUPLICATE_THRESHOLD_DEG: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct WaypointStore {
    entries: Vec<WaypointEntry>,
    max_hops: usize,
    next_hop: u64,
}

impl Default for WaypointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::with_max_hops(MAX_HOPS)
    }

    /// A store allowing fewer hops than `MAX_HOPS`. Larger values are capped.
    pub fn with_max_hops(max_hops: usize) -> Self {
        Self {
            entries: vec![
                WaypointEntry::new(WaypointId::start(), WaypointType::Start),
                WaypointEntry::new(WaypointId::destination(), WaypointType::Destination),
            ],
            max_hops: max_hops.min(MAX_HOPS),
            next_hop: 1,
        }
    }

    /// Entries in presentation order.
    pub fn entries(&self) -> &[WaypointEntry] {
        &self.entries
    }

    pub fn get(&self, id: &WaypointId) -> Option<&WaypointEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    fn get_mut(&mut self, id: &WaypointId) -> Result<&mut WaypointEntry, StoreError> {
        self.entries
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| StoreError::UnknownWaypoint(id.clone()))
    }

    fn position_of(&self, waypoint_type: WaypointType) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.waypoint_type == waypoint_type)
    }

    pub fn start(&self) -> Option<&WaypointEntry> {
        self.position_of(WaypointType::Start).map(|i| &self.entries[i])
    }

    pub fn destination(&self) -> Option<&WaypointEntry> {
        self.position_of(WaypointType::Destination)
            .map(|i| &self.entries[i])
    }

    pub fn hops(&self) -> impl Iterator<Item = &WaypointEntry> {
        self.entries.iter().filter(|entry| entry.is_hop())
    }

    pub fn hop_count(&self) -> usize {
        self.hops().count()
    }

    /// Entries with a selected location, in presentation order.
    pub fn located(&self) -> Vec<&WaypointEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.location.is_some())
            .collect()
    }

    /// Appends an empty hop just before the destination.
    ///
    /// Returns `None` without touching the store when the hop limit is
    /// reached or an existing hop is still blank.
    pub fn add_hop(&mut self) -> Option<WaypointId> {
        if self.hop_count() >= self.max_hops {
            debug!(max_hops = self.max_hops, "hop limit reached");
            return None;
        }
        if self.hops().any(WaypointEntry::has_blank_query) {
            debug!("blank hop pending, not adding another");
            return None;
        }

        let id = WaypointId::new(format!("hop-{}", self.next_hop));
        self.next_hop += 1;

        let at = self
            .position_of(WaypointType::Destination)
            .unwrap_or(self.entries.len());
        self.entries
            .insert(at, WaypointEntry::new(id.clone(), WaypointType::Hop));
        Some(id)
    }

    /// Removes a hop. Start and destination are never removed.
    pub fn remove_hop(&mut self, id: &WaypointId) -> Option<WaypointEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| &entry.id == id && entry.is_hop())?;
        Some(self.entries.remove(index))
    }

    /// Exchanges location and query between start and destination.
    ///
    /// Ids and roles stay in place; pending suggestions on both are dropped.
    pub fn swap_start_and_destination(&mut self) -> bool {
        let (Some(start), Some(destination)) = (
            self.position_of(WaypointType::Start),
            self.position_of(WaypointType::Destination),
        ) else {
            return false;
        };

        let start_location = self.entries[start].location.take();
        let start_query = std::mem::take(&mut self.entries[start].query);

        self.entries[start].location = self.entries[destination].location.take();
        self.entries[start].query = std::mem::take(&mut self.entries[destination].query);
        self.entries[destination].location = start_location;
        self.entries[destination].query = start_query;

        for index in [start, destination] {
            self.entries[index].suggestions.clear();
            self.entries[index].is_searching = false;
        }
        true
    }

    /// Sets the raw query text. Short queries drop their suggestions at once.
    pub fn update_query(&mut self, id: &WaypointId, text: &str) -> Result<(), StoreError> {
        let entry = self.get_mut(id)?;
        entry.query = text.to_string();
        if text.chars().count() < MIN_QUERY_CHARS {
            entry.suggestions.clear();
        }
        Ok(())
    }

    pub fn set_searching(&mut self, id: &WaypointId, searching: bool) -> Result<(), StoreError> {
        let entry = self.get_mut(id)?;
        entry.is_searching = searching;
        if !searching && entry.query.chars().count() < MIN_QUERY_CHARS {
            entry.suggestions.clear();
        }
        Ok(())
    }

    /// Attaches search results and ends the searching state.
    pub fn resolve_suggestions(
        &mut self,
        id: &WaypointId,
        mut suggestions: Vec<Location>,
    ) -> Result<(), StoreError> {
        let entry = self.get_mut(id)?;
        suggestions.truncate(MAX_SUGGESTIONS);
        entry.suggestions = suggestions;
        entry.is_searching = false;
        Ok(())
    }

    /// The first located hop (other than `exclude`) within the duplicate
    /// threshold of `candidate`.
    pub fn find_duplicate(&self, candidate: &Location, exclude: &WaypointId) -> Option<&Location> {
        self.hops()
            .filter(|entry| &entry.id != exclude)
            .filter_map(|entry| entry.location.as_ref())
            .find(|existing| {
                (existing.lat - candidate.lat).abs() < DUPLICATE_THRESHOLD_DEG
                    && (existing.lng - candidate.lng).abs() < DUPLICATE_THRESHOLD_DEG
            })
    }

    /// Whether `candidate` collides with another hop. Start and destination
    /// are exempt.
    pub fn check_for_duplicates(&self, candidate: &Location, exclude: &WaypointId) -> bool {
        self.find_duplicate(candidate, exclude).is_some()
    }

    /// Commits a chosen place to an entry, unless it duplicates another hop.
    pub fn select_location(
        &mut self,
        id: &WaypointId,
        location: Location,
    ) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::UnknownWaypoint(id.clone()));
        }
        if let Some(existing) = self.find_duplicate(&location, id) {
            return Err(StoreError::Duplicate {
                name: existing.name.clone(),
            });
        }

        let entry = self.get_mut(id)?;
        entry.query = location.name.clone();
        entry.location = Some(location);
        entry.suggestions.clear();
        entry.is_searching = false;
        Ok(())
    }
}
