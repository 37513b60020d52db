//! Per-participant belief record.

use super::consistency::{Scope, first_violation};
use super::matrix::{GroupCounters, OwnershipMatrix, Status};
use super::propagate::{PropagationReport, propagate};
use crate::config::{GroupId, Rules};
use crate::error::{ConfigurationError, EngineError};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::seat::Seat;
use std::sync::Arc;

/// Ownership matrix plus half-suit counters: one deduction view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knowledge {
    matrix: OwnershipMatrix,
    counters: GroupCounters,
}

impl Knowledge {
    /// Everything unknown, every counter zero.
    pub fn blank(rules: &Rules) -> Self {
        Self {
            matrix: OwnershipMatrix::new(rules.participants(), rules.population()),
            counters: GroupCounters::new(rules.participants(), rules.group_count()),
        }
    }

    pub fn matrix(&self) -> &OwnershipMatrix {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut OwnershipMatrix {
        &mut self.matrix
    }

    pub fn counters(&self) -> &GroupCounters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut GroupCounters {
        &mut self.counters
    }

    pub fn status(&self, seat: Seat, card: usize) -> Status {
        self.matrix.get(seat, card)
    }

    pub fn counter(&self, seat: Seat, group: GroupId) -> u8 {
        self.counters.get(seat, group)
    }

    /// Number of cards of `group` marked with `status` for `seat`.
    pub fn count_in_group(&self, rules: &Rules, seat: Seat, group: GroupId, status: Status) -> u8 {
        rules
            .group(group)
            .cards()
            .iter()
            .filter(|card| self.matrix.get(seat, **card) == status)
            .count() as u8
    }
}

/// Facts every participant shares: hand sizes and the groups still in play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    hand_sizes: Vec<u8>,
    remaining: Vec<bool>,
}

impl TableState {
    /// Start-of-game table: configured deal sizes, every group in play.
    pub fn initial(rules: &Rules) -> Self {
        Self {
            hand_sizes: rules.initial_hand_sizes().to_vec(),
            remaining: vec![true; rules.group_count()],
        }
    }

    /// Table with explicit hand sizes and remaining groups, for seeded states.
    pub fn new(
        rules: &Rules,
        hand_sizes: Vec<u8>,
        remaining: impl IntoIterator<Item = GroupId>,
    ) -> Result<Self, ConfigurationError> {
        if hand_sizes.len() != rules.participants() {
            return Err(ConfigurationError::HandSizeCount {
                expected: rules.participants(),
                found: hand_sizes.len(),
            });
        }
        let mut flags = vec![false; rules.group_count()];
        for group in remaining {
            let flag = flags
                .get_mut(group.index())
                .ok_or(ConfigurationError::UnknownGroup(group))?;
            *flag = true;
        }
        Ok(Self {
            hand_sizes,
            remaining: flags,
        })
    }

    pub fn hand_size(&self, seat: Seat) -> u8 {
        self.hand_sizes[seat.index()]
    }

    pub fn hand_sizes(&self) -> &[u8] {
        &self.hand_sizes
    }

    pub(crate) fn hand_sizes_mut(&mut self) -> &mut [u8] {
        &mut self.hand_sizes
    }

    pub fn is_remaining(&self, group: GroupId) -> bool {
        self.remaining.get(group.index()).copied().unwrap_or(false)
    }

    pub fn remaining_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.remaining
            .iter()
            .enumerate()
            .filter(|(_, remaining)| **remaining)
            .map(|(index, _)| GroupId::new(index as u8))
    }

    pub fn called_count(&self) -> usize {
        self.remaining.iter().filter(|remaining| !**remaining).count()
    }

    pub(crate) fn mark_called(&mut self, group: GroupId) {
        self.remaining[group.index()] = false;
    }

    /// Sum of all hand sizes.
    pub fn cards_in_play(&self) -> usize {
        self.hand_sizes.iter().map(|size| *size as usize).sum()
    }
}

/// One participant's complete belief: private and public views over shared table facts.
#[derive(Debug, Clone)]
pub struct BeliefState {
    rules: Arc<Rules>,
    owner: Seat,
    private: Knowledge,
    public: Knowledge,
    table: TableState,
}

impl BeliefState {
    /// Start-of-game belief for `owner` holding `own_hand`.
    pub fn new(rules: Arc<Rules>, owner: Seat, own_hand: &[Card]) -> Result<Self, EngineError> {
        if !rules.contains_seat(owner) {
            return Err(ConfigurationError::UnknownSeat(owner).into());
        }
        let expected = rules.initial_hand_size(owner);
        if own_hand.len() != expected as usize {
            return Err(ConfigurationError::HandSizeMismatch {
                seat: owner,
                expected,
                found: own_hand.len(),
            }
            .into());
        }

        let mut private = Knowledge::blank(&rules);
        for index in 0..rules.population() {
            private.matrix.set(owner, index, Status::Absent);
        }
        for card in own_hand {
            let index = rules
                .index_of(*card)
                .ok_or(ConfigurationError::CardNotInDeck(*card))?;
            if private.matrix.set(owner, index, Status::Held) == Status::Held {
                return Err(ConfigurationError::DuplicateCard(*card).into());
            }
            let group = rules.group_of(index);
            let count = private.counters.get(owner, group);
            private.counters.set(owner, group, count + 1);
        }

        let public = Knowledge::blank(&rules);
        let table = TableState::initial(&rules);
        Self::from_parts(rules, owner, private, public, table)
    }

    /// Builds a belief from caller-supplied views, rejecting inconsistent seeds.
    ///
    /// Both views are propagated over the whole deck before the state is returned.
    pub fn from_parts(
        rules: Arc<Rules>,
        owner: Seat,
        private: Knowledge,
        public: Knowledge,
        table: TableState,
    ) -> Result<Self, EngineError> {
        if !rules.contains_seat(owner) {
            return Err(ConfigurationError::UnknownSeat(owner).into());
        }
        let mut state = Self {
            rules,
            owner,
            private,
            public,
            table,
        };
        state.propagate(&Scope::All)?;
        Ok(state)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn shared_rules(&self) -> &Arc<Rules> {
        &self.rules
    }

    pub fn owner(&self) -> Seat {
        self.owner
    }

    pub fn private(&self) -> &Knowledge {
        &self.private
    }

    pub fn public(&self) -> &Knowledge {
        &self.public
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub(crate) fn parts_mut(&mut self) -> (&Rules, &mut Knowledge, &mut Knowledge, &mut TableState) {
        (
            &self.rules,
            &mut self.private,
            &mut self.public,
            &mut self.table,
        )
    }

    /// Private status of `seat` for `card`; `None` when the card is not in the deck.
    pub fn status(&self, seat: Seat, card: Card) -> Option<Status> {
        self.rules
            .index_of(card)
            .map(|index| self.private.status(seat, index))
    }

    pub fn public_status(&self, seat: Seat, card: Card) -> Option<Status> {
        self.rules
            .index_of(card)
            .map(|index| self.public.status(seat, index))
    }

    pub fn counter(&self, seat: Seat, group: GroupId) -> u8 {
        self.private.counter(seat, group)
    }

    pub fn public_counter(&self, seat: Seat, group: GroupId) -> u8 {
        self.public.counter(seat, group)
    }

    pub fn hand_size(&self, seat: Seat) -> u8 {
        self.table.hand_size(seat)
    }

    /// Cards currently held by the owner, in deck order.
    pub fn own_hand(&self) -> Hand {
        let cards = self
            .private
            .matrix
            .row(self.owner)
            .iter()
            .enumerate()
            .filter(|(_, status)| **status == Status::Held)
            .map(|(index, _)| self.rules.card(index))
            .collect();
        Hand::with_cards(cards)
    }

    /// Full-deck invariant check over both views.
    pub fn is_consistent_snapshot(&self) -> bool {
        first_violation(&self.rules, &self.private, &self.table, &Scope::All).is_none()
            && first_violation(&self.rules, &self.public, &self.table, &Scope::All).is_none()
    }

    /// Runs propagation over both views in place.
    ///
    /// On a violation the state may be partially tightened; callers that need
    /// atomicity propagate a clone.
    pub fn propagate(&mut self, scope: &Scope) -> Result<ViewReports, EngineError> {
        let private = propagate(&self.rules, &mut self.private, &self.table, scope)?;
        let public = propagate(&self.rules, &mut self.public, &self.table, scope)?;
        Ok(ViewReports { private, public })
    }
}

/// Propagation outcome for each view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewReports {
    pub private: PropagationReport,
    pub public: PropagationReport,
}

impl ViewReports {
    pub fn tightened(&self) -> usize {
        self.private.tightened + self.public.tightened
    }
}
