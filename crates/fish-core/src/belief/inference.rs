//! Action queries derived from the owner's private view.

use super::matrix::Status;
use super::state::BeliefState;
use crate::config::GroupId;
use crate::error::{EngineError, IllegalAction};
use crate::model::card::Card;
use crate::model::seat::Seat;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A request for `card` from `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ask {
    pub target: Seat,
    pub card: Card,
}

/// One holder per card of a group, in the group's card order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallAssignment {
    pub group: GroupId,
    pub assignments: Vec<(Seat, Card)>,
}

impl CallAssignment {
    /// Number of cards assigned to `seat`.
    pub fn count_for(&self, seat: Seat) -> usize {
        self.assignments
            .iter()
            .filter(|(holder, _)| *holder == seat)
            .count()
    }
}

/// Picks a teammate for a card whose holder is not known.
pub trait CallGuess {
    /// `candidates` is never empty and lists teammates in seat order.
    fn guess(&mut self, card: Card, candidates: &[Seat]) -> Seat;
}

/// Always the first candidate in seat order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl CallGuess for FirstCandidate {
    fn guess(&mut self, _card: Card, candidates: &[Seat]) -> Seat {
        candidates[0]
    }
}

/// Uniformly random candidate.
#[derive(Debug, Clone)]
pub struct RandomGuess<R> {
    rng: R,
}

impl<R: Rng> RandomGuess<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CallGuess for RandomGuess<R> {
    fn guess(&mut self, _card: Card, candidates: &[Seat]) -> Seat {
        candidates[self.rng.gen_range(0..candidates.len())]
    }
}

impl BeliefState {
    /// First ask whose outcome is already certain: an opponent known to hold a
    /// card from a group the owner holds part of.
    ///
    /// Groups and cards are scanned in canonical order, opponents in seat order.
    pub fn guaranteed_ask(&self) -> Option<Ask> {
        let rules = self.rules();
        let owner = self.owner();
        rules
            .group_ids()
            .filter(|group| self.table().is_remaining(*group) && self.counter(owner, *group) > 0)
            .flat_map(move |group| rules.group(group).cards().iter().copied())
            .find_map(|card| {
                rules
                    .opponents(owner)
                    .iter()
                    .find(|opponent| self.private().status(**opponent, card) == Status::Held)
                    .map(|target| Ask {
                        target: *target,
                        card: rules.card(card),
                    })
            })
    }

    /// Whether the owner may ask `target` for `card`.
    pub fn legal_ask(&self, target: Seat, card: Card) -> bool {
        self.check_ask(target, card).is_ok()
    }

    /// Like [`legal_ask`](Self::legal_ask), naming the failed precondition.
    pub fn check_ask(&self, target: Seat, card: Card) -> Result<(), IllegalAction> {
        self.ask_precondition(self.owner(), target, card).map(|_| ())
    }

    /// Every legal ask for the owner, in card order then opponent order.
    pub fn legal_asks(&self) -> Vec<Ask> {
        let rules = self.rules();
        let owner = self.owner();
        let mut asks = Vec::new();
        for card in rules.deck() {
            for target in rules.opponents(owner) {
                if self.legal_ask(*target, *card) {
                    asks.push(Ask {
                        target: *target,
                        card: *card,
                    });
                }
            }
        }
        asks
    }

    /// Validates an ask by `asker` and returns the card's deck index.
    ///
    /// Seat, deck, team and known-holding checks apply to any asker; the
    /// "holds another card of the group" requirement is only knowable, and
    /// so only enforced, when the asker is the owner.
    pub(crate) fn ask_precondition(
        &self,
        asker: Seat,
        target: Seat,
        card: Card,
    ) -> Result<usize, IllegalAction> {
        let rules = self.rules();
        for seat in [asker, target] {
            if !rules.contains_seat(seat) {
                return Err(IllegalAction::UnknownSeat(seat));
            }
        }
        let index = rules
            .index_of(card)
            .ok_or(IllegalAction::CardNotInDeck(card))?;
        let group = rules.group_of(index);
        if !self.table().is_remaining(group) {
            return Err(IllegalAction::GroupAlreadyCalled(group));
        }
        if !rules.are_opponents(asker, target) {
            return Err(IllegalAction::NotOpponent { asker, target });
        }
        if self.private().status(asker, index) == Status::Held {
            return Err(IllegalAction::AlreadyHeld { asker, card });
        }
        if asker == self.owner() {
            let holds_other = rules
                .group(group)
                .cards()
                .iter()
                .any(|other| *other != index && self.private().status(asker, *other) == Status::Held);
            if !holds_other {
                return Err(IllegalAction::NoCardInGroup { asker, card });
            }
        }
        Ok(index)
    }

    /// First remaining group whose every card is known held by the owner's team.
    pub fn check_call(&self) -> Option<CallAssignment> {
        let rules = self.rules();
        let teammates = rules.teammates(self.owner());
        self.table().remaining_groups().find_map(|group| {
            rules
                .group(group)
                .cards()
                .iter()
                .map(|card| {
                    teammates
                        .iter()
                        .find(|seat| self.private().status(**seat, *card) == Status::Held)
                        .map(|seat| (*seat, rules.card(*card)))
                })
                .collect::<Option<Vec<_>>>()
                .map(|assignments| CallAssignment { group, assignments })
        })
    }

    /// Best-effort call of `group` when the team must call without full knowledge.
    ///
    /// Known teammate holders are used as-is; every other card goes to the
    /// teammate `guess` picks among those not known absent.
    pub fn force_call(
        &self,
        group: GroupId,
        guess: &mut impl CallGuess,
    ) -> Result<CallAssignment, EngineError> {
        let rules = self.rules();
        if !rules.contains_group(group) {
            return Err(IllegalAction::UnknownGroup(group).into());
        }
        if !self.table().is_remaining(group) {
            return Err(IllegalAction::GroupAlreadyCalled(group).into());
        }
        let teammates = rules.teammates(self.owner());
        let mut assignments = Vec::with_capacity(rules.group(group).cards().len());
        for &index in rules.group(group).cards() {
            let card = rules.card(index);
            let known = teammates
                .iter()
                .copied()
                .find(|seat| self.private().status(*seat, index) == Status::Held);
            let holder = match known {
                Some(seat) => seat,
                None => {
                    let open: Vec<Seat> = teammates
                        .iter()
                        .copied()
                        .filter(|seat| self.private().status(*seat, index) != Status::Absent)
                        .collect();
                    let candidates = if open.is_empty() { teammates } else { open.as_slice() };
                    guess.guess(card, candidates)
                }
            };
            assignments.push((holder, card));
        }
        Ok(CallAssignment { group, assignments })
    }
}
