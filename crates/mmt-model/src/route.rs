//! Timetabled stop sequences.

use mmt_core::{LegId, NodeId, SimTime};

use crate::{ModelError, ModelResult};

// ── Stop ──────────────────────────────────────────────────────────────────────

/// One scheduled halt on a vehicle's route.
///
/// The timetable fields (`location`, `arrival`, `departure`) are fixed at
/// construction.  The boarding/alighting rosters are filled in by assignment
/// events as the optimizer attaches legs to the stop.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub location: NodeId,
    pub arrival: SimTime,
    pub departure: SimTime,
    /// Legs scheduled to board at this stop.
    pub boarding: Vec<LegId>,
    /// Legs scheduled to alight at this stop.
    pub alighting: Vec<LegId>,
}

impl Stop {
    pub fn new(location: NodeId, arrival: SimTime, departure: SimTime) -> Self {
        Self {
            location,
            arrival,
            departure,
            boarding: Vec::new(),
            alighting: Vec::new(),
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered sequence of [`Stop`]s with a cursor marking the vehicle's
/// position along it.
///
/// Invariant (checked at construction): stop times are non-decreasing along
/// the sequence, and each stop's departure is not before its arrival.  The
/// cursor starts unset and advances monotonically; it never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    stops: Vec<Stop>,
    /// Index of the current stop; `None` until the vehicle is released.
    cursor: Option<usize>,
}

impl Route {
    /// Validate the timetable and build a route.
    pub fn new(stops: Vec<Stop>) -> ModelResult<Self> {
        if stops.is_empty() {
            return Err(ModelError::EmptyRoute);
        }
        let mut last = SimTime::ZERO;
        for (index, stop) in stops.iter().enumerate() {
            if stop.arrival < last || stop.departure < stop.arrival {
                return Err(ModelError::NonMonotonicRoute { index });
            }
            last = stop.departure;
        }
        Ok(Self {
            stops,
            cursor: None,
        })
    }

    // ── Cursor movement ───────────────────────────────────────────────────

    /// Place the cursor at the first stop (vehicle release).
    pub fn start(&mut self) {
        self.cursor = Some(0);
    }

    /// Move the cursor to the next stop and return it.
    ///
    /// Returns `None` if the route is exhausted (the caller should not have
    /// scheduled a departure in that case).
    pub fn advance(&mut self) -> Option<&Stop> {
        let next = self.cursor?.checked_add(1)?;
        if next >= self.stops.len() {
            return None;
        }
        self.cursor = Some(next);
        Some(&self.stops[next])
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_stop(&self) -> Option<&Stop> {
        self.stops.get(self.cursor?)
    }

    pub fn current_stop_mut(&mut self) -> Option<&mut Stop> {
        self.stops.get_mut(self.cursor?)
    }

    /// The stops strictly after the current one, in order.
    pub fn next_stops(&self) -> &[Stop] {
        match self.cursor {
            None => &self.stops,
            Some(i) => &self.stops[(i + 1).min(self.stops.len())..],
        }
    }

    /// `true` once there is no stop after the current one.
    pub fn is_exhausted(&self) -> bool {
        self.next_stops().is_empty()
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    pub fn stop_mut(&mut self, index: usize) -> Option<&mut Stop> {
        self.stops.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Index of the first stop at or after the cursor whose departure is at
    /// or after `horizon` — the earliest point the optimizer may still touch.
    ///
    /// Returns `None` if every remaining stop departs inside the frozen
    /// window.
    pub fn first_stop_from(&self, horizon: SimTime) -> Option<usize> {
        let from = self.cursor.unwrap_or(0);
        (from..self.stops.len()).find(|&i| self.stops[i].departure >= horizon)
    }

    /// Index of the first stop after `after` located at `node`.
    ///
    /// Used to find the alighting stop matching a boarding assignment.
    pub fn find_stop_at(&self, node: NodeId, after: usize) -> Option<usize> {
        ((after + 1)..self.stops.len()).find(|&i| self.stops[i].location == node)
    }
}
