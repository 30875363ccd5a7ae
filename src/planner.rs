//! Planning session: one waypoint store, its search debouncer and the
//! current optimized route.
//!
//! The session is what a presentation layer drives. After any call, the
//! entries, route, error and duplicate warning can be read back and shown.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::debounce::{SEARCH_DELAY, ScheduledLookup, SearchDebouncer};
use crate::error::{PlannerError, StoreError};
use crate::model::{Location, MAX_HOPS, OptimizedRoute, WaypointEntry, WaypointId};
use crate::reconcile::reconcile;
use crate::store::WaypointStore;
use crate::traits::{Geocoder, TripOptimizer};
use crate::trips::{Session, TripStore};

#[derive(Debug, Clone)]
pub struct PlannerOptions {
    /// Hop limit, capped at `MAX_HOPS`.
    pub max_hops: usize,
    /// Quiet period before a search is issued.
    pub search_delay: Duration,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            max_hops: MAX_HOPS,
            search_delay: SEARCH_DELAY,
        }
    }
}

pub struct Planner<G, T> {
    store: WaypointStore,
    debouncer: SearchDebouncer,
    geocoder: G,
    optimizer: T,
    optimized_route: Option<OptimizedRoute>,
    error: Option<String>,
    duplicate_warning: Option<String>,
}

impl<G: Geocoder, T: TripOptimizer> Planner<G, T> {
    pub fn new(geocoder: G, optimizer: T) -> Self {
        Self::with_options(geocoder, optimizer, PlannerOptions::default())
    }

    pub fn with_options(geocoder: G, optimizer: T, options: PlannerOptions) -> Self {
        Self {
            store: WaypointStore::with_max_hops(options.max_hops),
            debouncer: SearchDebouncer::new(options.search_delay),
            geocoder,
            optimizer,
            optimized_route: None,
            error: None,
            duplicate_warning: None,
        }
    }

    pub fn store(&self) -> &WaypointStore {
        &self.store
    }

    pub fn entries(&self) -> &[WaypointEntry] {
        self.store.entries()
    }

    pub fn get(&self, id: &WaypointId) -> Option<&WaypointEntry> {
        self.store.get(id)
    }

    pub fn optimized_route(&self) -> Option<&OptimizedRoute> {
        self.optimized_route.as_ref()
    }

    /// Last optimize failure, as shown to the user.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn duplicate_warning(&self) -> Option<&str> {
        self.duplicate_warning.as_deref()
    }

    pub fn add_hop(&mut self) -> Option<WaypointId> {
        self.store.add_hop()
    }

    pub fn remove_hop(&mut self, id: &WaypointId) -> bool {
        if self.store.remove_hop(id).is_none() {
            return false;
        }
        self.debouncer.forget(id);
        self.optimized_route = None;
        self.duplicate_warning = None;
        debug!(%id, "hop removed");
        true
    }

    pub fn swap_start_and_destination(&mut self) -> bool {
        if !self.store.swap_start_and_destination() {
            return false;
        }
        for entry in [WaypointId::start(), WaypointId::destination()] {
            self.debouncer.invalidate(&entry);
        }
        self.optimized_route = None;
        true
    }

    /// Applies a keystroke to `id` using the wall clock.
    pub fn update_query(&mut self, id: &WaypointId, text: &str) -> Result<(), StoreError> {
        self.update_query_at(id, text, Instant::now())
    }

    /// Applies a keystroke to `id` as if typed at `now`.
    pub fn update_query_at(
        &mut self,
        id: &WaypointId,
        text: &str,
        now: Instant,
    ) -> Result<(), StoreError> {
        self.store.update_query(id, text)?;
        self.error = None;
        self.duplicate_warning = None;

        let scheduled = self.debouncer.keystroke(id, text, now);
        self.store.set_searching(id, scheduled.is_some())
    }

    /// Earliest instant at which `poll_searches_at` has work to do.
    pub fn next_search_due(&self) -> Option<Instant> {
        self.debouncer.next_due()
    }

    pub fn poll_searches(&mut self) -> usize {
        self.poll_searches_at(Instant::now())
    }

    /// Runs every lookup due at `now` through the geocoder and applies the
    /// results. Returns how many entries received suggestions.
    pub fn poll_searches_at(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        for lookup in self.debouncer.take_due(now) {
            let results = self.geocoder.search(&lookup.query);
            if self.complete_lookup(&lookup, results) {
                applied += 1;
            }
        }
        applied
    }

    /// Takes the lookups due at `now` without running them, for callers
    /// that issue searches themselves. Hand results to `complete_lookup`.
    pub fn take_due_lookups(&mut self, now: Instant) -> Vec<ScheduledLookup> {
        self.debouncer.take_due(now)
    }

    /// Applies search results unless the entry changed since the lookup
    /// was scheduled or no longer exists.
    pub fn complete_lookup(&mut self, lookup: &ScheduledLookup, results: Vec<Location>) -> bool {
        if !self.debouncer.is_current(lookup) {
            debug!(id = %lookup.id, query = %lookup.query, "discarding stale search results");
            return false;
        }
        self.store.resolve_suggestions(&lookup.id, results).is_ok()
    }

    /// Commits a suggestion, or records a duplicate warning and leaves the
    /// entry untouched.
    pub fn select_location(
        &mut self,
        id: &WaypointId,
        location: Location,
    ) -> Result<(), StoreError> {
        match self.store.select_location(id, location) {
            Ok(()) => {
                self.debouncer.invalidate(id);
                self.optimized_route = None;
                self.duplicate_warning = None;
                Ok(())
            }
            Err(err @ StoreError::Duplicate { .. }) => {
                warn!(%id, "duplicate hop rejected");
                self.duplicate_warning = Some(err.to_string());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Sends the located waypoints to the trip optimizer and replaces the
    /// current route with the reconciled result.
    pub fn optimize(&mut self) -> Result<&OptimizedRoute, PlannerError> {
        let located = self.store.located();
        if located.len() < 2 {
            return Err(self.fail(PlannerError::InsufficientWaypoints));
        }

        let has_start = self.store.start().is_some_and(|e| e.location.is_some());
        let has_destination = self
            .store
            .destination()
            .is_some_and(|e| e.location.is_some());
        if !has_start || !has_destination {
            return Err(self.fail(PlannerError::MissingStartOrDestination));
        }

        let coordinates: Vec<(f64, f64)> = located
            .iter()
            .filter_map(|entry| entry.location.as_ref().map(Location::coords))
            .collect();
        self.error = None;

        let trip = match self.optimizer.optimize(&coordinates) {
            Ok(trip) => trip,
            Err(err) => return Err(self.fail(err)),
        };

        let reconciliation = reconcile(&trip, self.store.entries());
        info!(
            stops = reconciliation.route.waypoints.len(),
            distance = %reconciliation.route.distance,
            duration = %reconciliation.route.duration,
            "route optimized"
        );
        Ok(&*self.optimized_route.insert(reconciliation.route))
    }

    /// Saves the current route for the session's user.
    pub fn save_trip<S: TripStore>(
        &self,
        trips: &S,
        session: &Session,
    ) -> Result<(), PlannerError> {
        let route = self
            .optimized_route
            .as_ref()
            .ok_or(PlannerError::NothingToSave)?;
        trips.save_trip(session, route)?;
        Ok(())
    }

    fn fail(&mut self, err: PlannerError) -> PlannerError {
        warn!(error = ?err, "optimize failed");
        self.error = Some(err.to_string());
        err
    }
}

impl<G, T> Planner<G, T> {
    /// Cancels every scheduled search. Returns how many were dropped.
    pub fn teardown(&mut self) -> usize {
        self.debouncer.cancel_all()
    }
}

impl<G, T> Drop for Planner<G, T> {
    fn drop(&mut self) {
        let cancelled = self.teardown();
        if cancelled > 0 {
            debug!(cancelled, "pending searches cancelled on teardown");
        }
    }
}
