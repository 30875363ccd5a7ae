//! Per-waypoint debounced place lookups.
//!
//! A lookup is only issued once a waypoint's text has been quiet for the
//! search delay. Every keystroke supersedes the previous scheduled lookup
//! for that waypoint. The clock is supplied by the caller, which keeps the
//! registry single-threaded and deterministic.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::model::{MIN_QUERY_CHARS, WaypointId};

/// Quiet period between the last keystroke and the lookup.
pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// A lookup that is due (or in flight) for one waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledLookup {
    pub id: WaypointId,
    pub query: String,
    /// Keystroke generation this lookup was scheduled under.
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Pending {
    due: Instant,
    lookup: ScheduledLookup,
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: HashMap<WaypointId, Pending>,
    generations: HashMap<WaypointId, u64>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DELAY)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Registers a keystroke for `id`.
    ///
    /// Any scheduled lookup for `id` is dropped. Returns the due instant of
    /// the new lookup, or `None` when the text is too short to search.
    pub fn keystroke(&mut self, id: &WaypointId, text: &str, now: Instant) -> Option<Instant> {
        self.cancel(id);

        let generation = self.generations.entry(id.clone()).or_insert(0);
        *generation += 1;
        let generation = *generation;

        if text.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        let due = now + self.delay;
        self.pending.insert(
            id.clone(),
            Pending {
                due,
                lookup: ScheduledLookup {
                    id: id.clone(),
                    query: text.to_string(),
                    generation,
                },
            },
        );
        trace!(%id, generation, "lookup scheduled");
        Some(due)
    }

    /// Drops the scheduled lookup for `id`, if any.
    pub fn cancel(&mut self, id: &WaypointId) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Cancels the scheduled lookup for `id` and marks anything in flight
    /// for it as stale.
    pub fn invalidate(&mut self, id: &WaypointId) {
        self.pending.remove(id);
        *self.generations.entry(id.clone()).or_insert(0) += 1;
    }

    /// Drops all state for a waypoint that no longer exists.
    pub fn forget(&mut self, id: &WaypointId) {
        self.pending.remove(id);
        self.generations.remove(id);
    }

    /// Cancels every scheduled lookup. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: &WaypointId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest due instant among scheduled lookups.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().map(|pending| pending.due).min()
    }

    /// Removes and returns every lookup due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduledLookup> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|_, pending| {
            if pending.due <= now {
                due.push(pending.clone());
                false
            } else {
                true
            }
        });

        due.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.lookup.id.cmp(&b.lookup.id)));
        due.into_iter().map(|pending| pending.lookup).collect()
    }

    /// Whether no keystroke for the lookup's waypoint arrived after it was
    /// scheduled.
    pub fn is_current(&self, lookup: &ScheduledLookup) -> bool {
        self.generations.get(&lookup.id) == Some(&lookup.generation)
    }
}
