//! Dense ownership tables indexed by seat and card index.

use crate::config::GroupId;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// Tri-state ownership of a (participant, card) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Held,
    Absent,
    Unknown,
}

impl Status {
    /// Numeric encoding used by feature builders: held 1, absent -1, unknown 0.
    pub const fn as_i8(self) -> i8 {
        match self {
            Status::Held => 1,
            Status::Absent => -1,
            Status::Unknown => 0,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Status::Unknown)
    }
}

/// Seat-by-card status table stored row-major.
///
/// Keeps a running count of absent marks per seat so the hand-size bound can
/// be checked without rescanning a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipMatrix {
    cards: usize,
    cells: Vec<Status>,
    absent_per_seat: Vec<u16>,
}

impl OwnershipMatrix {
    pub fn new(seats: usize, cards: usize) -> Self {
        Self {
            cards,
            cells: vec![Status::Unknown; seats * cards],
            absent_per_seat: vec![0; seats],
        }
    }

    pub fn seats(&self) -> usize {
        self.absent_per_seat.len()
    }

    pub fn cards(&self) -> usize {
        self.cards
    }

    pub fn get(&self, seat: Seat, card: usize) -> Status {
        self.cells[seat.index() * self.cards + card]
    }

    /// Overwrites a cell, returning its previous status.
    pub fn set(&mut self, seat: Seat, card: usize, status: Status) -> Status {
        let cell = &mut self.cells[seat.index() * self.cards + card];
        let previous = *cell;
        *cell = status;
        let absent = &mut self.absent_per_seat[seat.index()];
        match (previous, status) {
            (Status::Absent, Status::Absent) => {}
            (Status::Absent, _) => *absent -= 1,
            (_, Status::Absent) => *absent += 1,
            _ => {}
        }
        previous
    }

    pub fn row(&self, seat: Seat) -> &[Status] {
        let start = seat.index() * self.cards;
        &self.cells[start..start + self.cards]
    }

    pub fn column(&self, card: usize) -> impl Iterator<Item = Status> + '_ {
        self.cells.iter().skip(card).step_by(self.cards).copied()
    }

    pub fn absent_count(&self, seat: Seat) -> usize {
        self.absent_per_seat[seat.index()] as usize
    }

    pub fn unknown_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|status| **status == Status::Unknown)
            .count()
    }

    /// Seat marked held for `card`, if any.
    pub fn holder(&self, card: usize) -> Option<Seat> {
        self.column(card)
            .position(|status| status == Status::Held)
            .and_then(Seat::from_index)
    }
}

/// Per seat, per group lower bounds on how many cards of the group the seat holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCounters {
    groups: usize,
    counts: Vec<u8>,
}

impl GroupCounters {
    pub fn new(seats: usize, groups: usize) -> Self {
        Self {
            groups,
            counts: vec![0; seats * groups],
        }
    }

    pub fn get(&self, seat: Seat, group: GroupId) -> u8 {
        self.counts[seat.index() * self.groups + group.index()]
    }

    pub fn set(&mut self, seat: Seat, group: GroupId, count: u8) {
        self.counts[seat.index() * self.groups + group.index()] = count;
    }

    pub fn row(&self, seat: Seat) -> &[u8] {
        let start = seat.index() * self.groups;
        &self.counts[start..start + self.groups]
    }
}
