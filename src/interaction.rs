//! One user action, from locating the user to drawing the charts.
//!
//! Every trigger builds a fresh [`Interaction`] which walks
//! `Idle → AwaitingLocation → AwaitingData → Rendered`, or ends in `Failed`.
//! Coordinates are passed from step to step; nothing is shared between runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::error::{FetchError, InteractionError};
use crate::location::{Coordinates, LocationProvider};
use crate::normalize::normalize;
use crate::notify::{CONNECTION_ALERT, LOCATION_ALERT, Notifier};
use crate::render::{ChartRenderer, RenderDispatcher};
use crate::response::ComparisonResponse;
use crate::series::Series;
use crate::services::stats_api::{CrimeStatsApi, Endpoint};
use crate::tables::tables_from_composite;

/// Which comparison a trigger asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// A single series of percentage differences.
    CompareLocation,
    /// One table chart per crime type, location against city average.
    CompareToCityAverage,
}

impl Flow {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Flow::CompareLocation => Endpoint::CompareLocation,
            Flow::CompareToCityAverage => Endpoint::CompareToCityAverage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    AwaitingLocation,
    AwaitingData,
    Rendered,
    Failed,
}

impl InteractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InteractionState::Rendered | InteractionState::Failed)
    }
}

/// External capabilities an interaction drives.
#[derive(Clone)]
pub struct Collaborators {
    pub location: Arc<dyn LocationProvider>,
    pub api: Arc<dyn CrimeStatsApi>,
    pub notifier: Arc<dyn Notifier>,
}

/// How a finished interaction went.
#[derive(Debug)]
pub struct Completed {
    pub flow: Flow,
    /// Every state visited, starting with `Idle`.
    pub history: Vec<InteractionState>,
    pub result: Result<(), InteractionError>,
}

impl Completed {
    pub fn state(&self) -> InteractionState {
        self.history
            .last()
            .copied()
            .unwrap_or(InteractionState::Idle)
    }
}

pub struct Interaction {
    flow: Flow,
    history: Vec<InteractionState>,
}

impl Interaction {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            history: vec![InteractionState::Idle],
        }
    }

    pub fn state(&self) -> InteractionState {
        self.history
            .last()
            .copied()
            .unwrap_or(InteractionState::Idle)
    }

    fn transition(&mut self, next: InteractionState) {
        debug!(flow = ?self.flow, from = ?self.state(), to = ?next, "State transition");
        self.history.push(next);
    }

    /// Runs to a terminal state. Location and fetch failures alert the user
    /// exactly once; renderer failures are returned without an alert.
    #[tracing::instrument(skip_all, fields(flow = ?self.flow))]
    pub async fn run<R: ChartRenderer>(mut self, deps: &Collaborators, renderer: R) -> Completed {
        let result = self.drive(deps, renderer).await;
        if let Err(e) = &result {
            self.fail(deps.notifier.as_ref(), e);
        }
        Completed {
            flow: self.flow,
            history: self.history,
            result,
        }
    }

    async fn drive<R: ChartRenderer>(
        &mut self,
        deps: &Collaborators,
        renderer: R,
    ) -> Result<(), InteractionError> {
        self.transition(InteractionState::AwaitingLocation);
        let coords = deps
            .location
            .current_position()
            .await
            .map_err(InteractionError::LocationUnavailable)?;
        info!(coords = %coords, "Location acquired");

        self.transition(InteractionState::AwaitingData);
        let response = deps
            .api
            .compare(self.flow.endpoint(), coords)
            .await
            .map_err(|e| match e {
                FetchError::Malformed(_) => InteractionError::MalformedResponse(e),
                other => InteractionError::FetchFailed(other),
            })?;

        self.render(coords, response, renderer)?;
        self.transition(InteractionState::Rendered);
        Ok(())
    }

    fn render<R: ChartRenderer>(
        &self,
        coords: Coordinates,
        response: ComparisonResponse,
        renderer: R,
    ) -> Result<(), InteractionError> {
        let mut dispatcher = RenderDispatcher::new(renderer);

        match self.flow {
            Flow::CompareLocation => {
                let raw = response
                    .into_flat()
                    .map_err(InteractionError::MalformedResponse)?;
                let values = normalize(&raw);
                info!(
                    coords = %coords,
                    received = raw.len(),
                    kept = values.len(),
                    "Comparison normalized"
                );
                dispatcher
                    .render_series(&Series::from_category_values(&values))
                    .map_err(InteractionError::Render)
            }
            Flow::CompareToCityAverage => {
                let composite = response
                    .into_composite()
                    .map_err(InteractionError::MalformedResponse)?;
                let tables = tables_from_composite(&composite);
                info!(
                    coords = %coords,
                    categories = composite.crime_types.len(),
                    tables = tables.len(),
                    "Comparison tables built"
                );
                dispatcher
                    .render_tables(&tables)
                    .map_err(InteractionError::Render)
            }
        }
    }

    fn fail(&mut self, notifier: &dyn Notifier, err: &InteractionError) {
        match err {
            InteractionError::LocationUnavailable(e) => {
                warn!(error = %e, "Could not get location");
                notifier.alert(LOCATION_ALERT);
            }
            InteractionError::FetchFailed(e) | InteractionError::MalformedResponse(e) => {
                error!(error = %e, raw = e.raw_body().unwrap_or(""), "Comparison request failed");
                notifier.alert(CONNECTION_ALERT);
            }
            InteractionError::Render(e) => {
                error!(error = %e, "Chart rendering failed");
            }
        }
        self.transition(InteractionState::Failed);
    }
}

/// Result of asking a [`Session`] to start an interaction.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// Another interaction was still running; nothing was done.
    Ignored,
    Completed(Completed),
}

/// Serializes triggers: while one interaction is in flight, further triggers
/// are ignored rather than racing to draw into the same containers.
pub struct Session {
    deps: Collaborators,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the interaction finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(deps: Collaborators) -> Self {
        Self {
            deps,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn trigger<R: ChartRenderer>(&self, flow: Flow, renderer: R) -> TriggerOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!(flow = ?flow, "Interaction already in flight, ignoring trigger");
            return TriggerOutcome::Ignored;
        }
        let _guard = InFlight(&self.in_flight);

        TriggerOutcome::Completed(Interaction::new(flow).run(&self.deps, renderer).await)
    }
}
