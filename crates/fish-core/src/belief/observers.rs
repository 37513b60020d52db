//! Every participant's belief at one table.

use super::state::{BeliefState, ViewReports};
use crate::deal::Deal;
use crate::error::EngineError;
use crate::event::Event;
use crate::model::seat::Seat;

/// One belief per seat, fed the same events in the same order.
#[derive(Debug, Clone)]
pub struct Observers {
    states: Vec<BeliefState>,
}

impl Observers {
    pub fn from_deal(deal: &Deal) -> Result<Self, EngineError> {
        Ok(Self {
            states: deal.beliefs()?,
        })
    }

    pub fn states(&self) -> &[BeliefState] {
        &self.states
    }

    pub fn get(&self, seat: Seat) -> Option<&BeliefState> {
        self.states.get(seat.index())
    }

    /// Applies `event` to every belief, all or nothing.
    ///
    /// When any belief rejects the event none of them change, and the error of
    /// the lowest seat is returned.
    pub fn apply(&mut self, event: &Event) -> Result<Vec<ViewReports>, EngineError> {
        let mut next = self.states.clone();
        let reports = apply_all(&mut next, event)?;
        self.states = next;
        Ok(reports)
    }

    /// Whether every seat derived the same public view.
    pub fn public_views_agree(&self) -> bool {
        match self.states.split_first() {
            Some((first, rest)) => rest.iter().all(|state| state.public() == first.public()),
            None => true,
        }
    }

    pub fn all_consistent(&self) -> bool {
        self.states.iter().all(BeliefState::is_consistent_snapshot)
    }
}

#[cfg(not(feature = "parallel"))]
fn apply_all(states: &mut [BeliefState], event: &Event) -> Result<Vec<ViewReports>, EngineError> {
    states.iter_mut().map(|state| state.apply(event)).collect()
}

#[cfg(feature = "parallel")]
fn apply_all(states: &mut [BeliefState], event: &Event) -> Result<Vec<ViewReports>, EngineError> {
    use rayon::prelude::*;

    let results: Vec<_> = states.par_iter_mut().map(|state| state.apply(event)).collect();
    results.into_iter().collect()
}
