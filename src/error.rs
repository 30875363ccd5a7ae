//! Error types for planner operations.

use thiserror::Error;

use crate::model::WaypointId;

/// Failures surfaced to the user by the optimize and save actions.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Please select at least a start and destination location")]
    InsufficientWaypoints,

    #[error("Please select both start and destination locations")]
    MissingStartOrDestination,

    /// Network failure or non-success HTTP status. The detail is for logs;
    /// the user sees the short message.
    #[error("Failed to optimize route. Please try again.")]
    Transport(String),

    /// The service answered but had no usable trip.
    #[error("No optimized route found between the selected locations ({0})")]
    NoRouteFound(String),

    #[error("There is no optimized route to save")]
    NothingToSave,

    #[error(transparent)]
    Persistence(#[from] TripStoreError),
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        PlannerError::Transport(err.to_string())
    }
}

/// Rejected waypoint store mutations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("unknown waypoint: {0}")]
    UnknownWaypoint(WaypointId),

    /// The message is shown to the user verbatim.
    #[error("\"{name}\" is already selected as another hop. Please choose a different location.")]
    Duplicate { name: String },
}

/// Failures of the saved-trip collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripStoreError {
    #[error("You must be logged in to save trips.")]
    Unauthorized,

    #[error("trip storage failed: {0}")]
    Backend(String),
}
