//! The single "current route" slot.
//!
//! Only one route is shown at a time. Clicking a second POI while the first
//! request is still in flight must not let the slower, older answer
//! overwrite the newer one, so every request takes a [`Generation`] and only
//! the latest generation may fill the slot.

use std::sync::Arc;

use super::convert::RouteResult;

/// Token identifying one route request. Later requests get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Holds at most one resolved route.
#[derive(Debug, Default)]
pub struct RouteSlot {
    latest: u64,
    current: Option<(Generation, Arc<RouteResult>)>,
}

impl RouteSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any request still in flight.
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Whether `generation` is the most recent request.
    pub fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }

    /// Store a finished route if its request is still the latest.
    ///
    /// Returns `false` and drops the route when a newer request has been
    /// started (or the slot cleared) since `generation` was issued.
    pub fn complete(&mut self, generation: Generation, route: Arc<RouteResult>) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        self.current = Some((generation, route));
        true
    }

    /// The route currently shown, with the request that produced it.
    pub fn current(&self) -> Option<(Generation, &Arc<RouteResult>)> {
        self.current.as_ref().map(|(g, r)| (*g, r))
    }

    /// Remove the shown route and invalidate requests in flight.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.current = None;
    }
}
