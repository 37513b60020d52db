//! Fixed-point tightening of a deduction view.
//!
//! Every UNKNOWN cell in scope is tried both ways against the checker. A cell
//! whose HELD trial fails must be ABSENT, one whose ABSENT trial fails must be
//! HELD, and a cell where both fail proves the view itself is contradictory.
//! Deductions that need two unknowns assumed at once are out of reach.

use super::consistency::{Scope, first_violation, violation_at};
use super::matrix::Status;
use super::state::{Knowledge, TableState};
use crate::config::Rules;
use crate::model::seat::Seat;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Passes over the scope, including the final pass that changed nothing.
    pub passes: usize,
    /// Cells moved from UNKNOWN to HELD or ABSENT.
    pub tightened: usize,
}

/// Tightens `knowledge` in place until a pass over `scope` makes no change.
///
/// On error the view may already be partially tightened.
pub fn propagate(
    rules: &Rules,
    knowledge: &mut Knowledge,
    table: &TableState,
    scope: &Scope,
) -> Result<PropagationReport, super::Violation> {
    if let Some(violation) = first_violation(rules, knowledge, table, scope) {
        return Err(violation);
    }

    let cards = scope.cards(rules);
    let mut report = PropagationReport::default();
    loop {
        report.passes += 1;
        let mut changed = 0;
        for &card in cards.iter() {
            for seat in rules.seats() {
                if knowledge.status(seat, card) != Status::Unknown {
                    continue;
                }
                let held = trial(rules, knowledge, table, seat, card, Status::Held);
                let absent = trial(rules, knowledge, table, seat, card, Status::Absent);
                let forced = match (held, absent) {
                    (None, None) => continue,
                    (Some(_), None) => Status::Absent,
                    (None, Some(_)) => Status::Held,
                    (Some(violation), Some(_)) => return Err(violation),
                };
                knowledge.matrix_mut().set(seat, card, forced);
                changed += 1;
            }
        }
        report.tightened += changed;
        if changed == 0 {
            return Ok(report);
        }
    }
}

fn trial(
    rules: &Rules,
    knowledge: &mut Knowledge,
    table: &TableState,
    seat: Seat,
    card: usize,
    status: Status,
) -> Option<super::Violation> {
    let previous = knowledge.matrix_mut().set(seat, card, status);
    let violation = violation_at(rules, knowledge, table, card);
    knowledge.matrix_mut().set(seat, card, previous);
    violation
}
