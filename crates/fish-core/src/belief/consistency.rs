//! Structural invariants of a deduction view.
//!
//! The checker is a plain predicate: it reports the first violation it finds and
//! never mutates its input. Propagation calls it once per trial, so checks are
//! restricted to the cards under test and the groups they belong to.

use super::matrix::Status;
use super::state::{Knowledge, TableState};
use crate::config::{GroupId, Rules};
use crate::model::card::Card;
use crate::model::seat::Seat;
use std::borrow::Cow;
use thiserror::Error;

/// Cards a check or propagation run is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Group(GroupId),
    /// Card indices into the configured deck.
    Cards(Vec<usize>),
}

impl Scope {
    pub fn cards<'a>(&'a self, rules: &'a Rules) -> Cow<'a, [usize]> {
        match self {
            Scope::All => Cow::Owned((0..rules.population()).collect()),
            Scope::Group(group) => Cow::Borrowed(rules.group(*group).cards()),
            Scope::Cards(cards) => Cow::Borrowed(cards.as_slice()),
        }
    }
}

/// A broken invariant, with the card, group or seat it was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{card} is held by both {first} and {second}")]
    DuplicateHolder { card: Card, first: Seat, second: Seat },
    #[error("{card} is in play but every seat is marked absent")]
    Unowned { card: Card },
    #[error("{seat} holds at least {counter} of {group} but is absent for {absent} of {size}")]
    GroupCounter {
        seat: Seat,
        group: GroupId,
        counter: u8,
        absent: u8,
        size: u8,
    },
    #[error("{seat} holds {hand_size} cards but is absent for {absent} of {population}")]
    HandSize {
        seat: Seat,
        hand_size: u8,
        absent: usize,
        population: usize,
    },
    #[error("{group} has already been called")]
    GroupNotRemaining { group: GroupId },
    #[error("revealed counts for {group} sum to {found}, expected {expected}")]
    RevealedTotal { group: GroupId, expected: u8, found: usize },
    #[error("{seat} revealed {revealed} cards of {group}, known bounds are {min}..={max}")]
    RevealedCount {
        seat: Seat,
        group: GroupId,
        revealed: u8,
        min: u8,
        max: u8,
    },
    #[error("expected {expected} revealed counts, got {found}")]
    RevealedArity { expected: usize, found: usize },
    #[error("{seat} cannot give up {removed} cards from a hand of {hand_size}")]
    HandUnderflow { seat: Seat, hand_size: u8, removed: u8 },
}

impl Violation {
    /// Number of the structural invariant broken, or `None` for event-level violations.
    pub fn invariant(&self) -> Option<u8> {
        match self {
            Violation::DuplicateHolder { .. } => Some(1),
            Violation::Unowned { .. } => Some(2),
            Violation::GroupCounter { .. } => Some(3),
            Violation::HandSize { .. } => Some(4),
            _ => None,
        }
    }
}

/// First violation of invariants 1-4 over `scope`, or `None` when the view is consistent.
///
/// Invariants 1 and 2 are checked for every card in scope, invariant 3 for every
/// group touched by the scope, invariant 4 for every seat.
pub fn first_violation(
    rules: &Rules,
    knowledge: &Knowledge,
    table: &TableState,
    scope: &Scope,
) -> Option<Violation> {
    let cards = scope.cards(rules);
    let mut groups_seen = vec![false; rules.group_count()];
    for &card in cards.iter() {
        if let Some(violation) = column_violation(rules, knowledge, table, card) {
            return Some(violation);
        }
        let group = rules.group_of(card);
        if !groups_seen[group.index()] {
            groups_seen[group.index()] = true;
            if let Some(violation) = group_violation(rules, knowledge, group) {
                return Some(violation);
            }
        }
    }
    hand_size_violation(rules, knowledge, table)
}

pub fn is_consistent(rules: &Rules, knowledge: &Knowledge, table: &TableState, scope: &Scope) -> bool {
    first_violation(rules, knowledge, table, scope).is_none()
}

/// Check after a single cell of `card` changed.
pub(crate) fn violation_at(
    rules: &Rules,
    knowledge: &Knowledge,
    table: &TableState,
    card: usize,
) -> Option<Violation> {
    column_violation(rules, knowledge, table, card)
        .or_else(|| group_violation(rules, knowledge, rules.group_of(card)))
        .or_else(|| hand_size_violation(rules, knowledge, table))
}

fn column_violation(
    rules: &Rules,
    knowledge: &Knowledge,
    table: &TableState,
    card: usize,
) -> Option<Violation> {
    let mut holder: Option<Seat> = None;
    let mut all_absent = true;
    for seat in rules.seats() {
        match knowledge.status(seat, card) {
            Status::Held => {
                if let Some(first) = holder {
                    return Some(Violation::DuplicateHolder {
                        card: rules.card(card),
                        first,
                        second: seat,
                    });
                }
                holder = Some(seat);
                all_absent = false;
            }
            Status::Unknown => all_absent = false,
            Status::Absent => {}
        }
    }
    if all_absent && table.is_remaining(rules.group_of(card)) {
        return Some(Violation::Unowned {
            card: rules.card(card),
        });
    }
    None
}

fn group_violation(rules: &Rules, knowledge: &Knowledge, group: GroupId) -> Option<Violation> {
    let size = rules.group(group).size();
    for seat in rules.seats() {
        let counter = knowledge.counter(seat, group);
        let absent = knowledge.count_in_group(rules, seat, group, Status::Absent);
        if counter > size || absent > size - counter {
            return Some(Violation::GroupCounter {
                seat,
                group,
                counter,
                absent,
                size,
            });
        }
    }
    None
}

fn hand_size_violation(rules: &Rules, knowledge: &Knowledge, table: &TableState) -> Option<Violation> {
    let population = rules.population();
    for seat in rules.seats() {
        let hand_size = table.hand_size(seat);
        let absent = knowledge.matrix().absent_count(seat);
        if absent > population.saturating_sub(hand_size as usize) {
            return Some(Violation::HandSize {
                seat,
                hand_size,
                absent,
                population,
            });
        }
    }
    None
}
