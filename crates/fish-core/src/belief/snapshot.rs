//! Read-only outbound views of a belief.

use super::matrix::Status;
use super::state::{BeliefState, Knowledge, TableState};
use crate::config::{GroupId, Rules};
use crate::model::card::Card;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// Borrowed view of the public deduction plus the shared table facts.
#[derive(Debug, Clone, Copy)]
pub struct PublicSnapshot<'a> {
    rules: &'a Rules,
    knowledge: &'a Knowledge,
    table: &'a TableState,
}

impl<'a> PublicSnapshot<'a> {
    pub fn rules(&self) -> &'a Rules {
        self.rules
    }

    pub fn status(&self, seat: Seat, card: usize) -> Status {
        self.knowledge.status(seat, card)
    }

    /// The seat's statuses in deck order.
    pub fn row(&self, seat: Seat) -> &'a [Status] {
        self.knowledge.matrix().row(seat)
    }

    pub fn counter(&self, seat: Seat, group: GroupId) -> u8 {
        self.knowledge.counter(seat, group)
    }

    pub fn counters(&self, seat: Seat) -> &'a [u8] {
        self.knowledge.counters().row(seat)
    }

    pub fn hand_sizes(&self) -> &'a [u8] {
        self.table.hand_sizes()
    }

    pub fn is_remaining(&self, group: GroupId) -> bool {
        self.table.is_remaining(group)
    }

    pub fn knowledge(&self) -> &'a Knowledge {
        self.knowledge
    }
}

impl BeliefState {
    pub fn public_snapshot(&self) -> PublicSnapshot<'_> {
        PublicSnapshot {
            rules: self.rules(),
            knowledge: self.public(),
            table: self.table(),
        }
    }
}

/// Owned, serializable copy of a belief, with statuses encoded HELD = 1,
/// ABSENT = -1, UNKNOWN = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub owner: Seat,
    pub deck: Vec<Card>,
    pub private: Vec<Vec<i8>>,
    pub public: Vec<Vec<i8>>,
    pub private_counters: Vec<Vec<u8>>,
    pub public_counters: Vec<Vec<u8>>,
    pub hand_sizes: Vec<u8>,
    pub remaining: Vec<GroupId>,
}

impl SnapshotRecord {
    pub fn capture(state: &BeliefState) -> Self {
        let rules = state.rules();
        let encode = |knowledge: &Knowledge| -> Vec<Vec<i8>> {
            rules
                .seats()
                .map(|seat| {
                    knowledge
                        .matrix()
                        .row(seat)
                        .iter()
                        .map(|status| status.as_i8())
                        .collect()
                })
                .collect()
        };
        let counters = |knowledge: &Knowledge| -> Vec<Vec<u8>> {
            rules
                .seats()
                .map(|seat| knowledge.counters().row(seat).to_vec())
                .collect()
        };
        SnapshotRecord {
            owner: state.owner(),
            deck: rules.deck().to_vec(),
            private: encode(state.private()),
            public: encode(state.public()),
            private_counters: counters(state.private()),
            public_counters: counters(state.public()),
            hand_sizes: state.table().hand_sizes().to_vec(),
            remaining: state.table().remaining_groups().collect(),
        }
    }

    pub fn to_json(state: &BeliefState) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(state))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
