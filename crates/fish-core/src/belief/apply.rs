//! Event application.
//!
//! Every event is validated first, then applied to a scratch copy of the
//! belief and propagated; the copy replaces the live state only on success.

use super::consistency::{Scope, Violation};
use super::matrix::Status;
use super::state::{BeliefState, Knowledge, ViewReports};
use crate::config::GroupId;
use crate::error::{EngineError, IllegalAction};
use crate::event::{AskEvent, CallEvent, Event};
use crate::model::card::Card;
use crate::model::seat::Seat;
use tracing::{Level, event};

const TARGET: &str = "fish_core::belief";

impl BeliefState {
    pub fn apply(&mut self, event: &Event) -> Result<ViewReports, EngineError> {
        match event {
            Event::Ask(ask) => self.apply_ask_event(ask),
            Event::Call(call) => self.apply_call_event(call),
        }
    }

    pub fn apply_ask_event(&mut self, ask: &AskEvent) -> Result<ViewReports, EngineError> {
        self.apply_ask(ask.asker, ask.target, ask.card, ask.success)
    }

    pub fn apply_call_event(&mut self, call: &CallEvent) -> Result<ViewReports, EngineError> {
        self.apply_call(call.group, &call.revealed)
    }

    /// Records an ask of `target` by `asker` for `card`.
    ///
    /// A successful ask moves the card, bumps the asker's group counter (to 1
    /// when it was 0) and lowers the target's. A failed ask proves neither
    /// seat holds the card, and that the asker holds some card of its group.
    pub fn apply_ask(
        &mut self,
        asker: Seat,
        target: Seat,
        card: Card,
        success: bool,
    ) -> Result<ViewReports, EngineError> {
        let index = self.ask_precondition(asker, target, card)?;
        let group = self.rules().group_of(index);
        if success && self.hand_size(target) == 0 {
            return Err(self.reject(
                "ask",
                Violation::HandUnderflow {
                    seat: target,
                    hand_size: 0,
                    removed: 1,
                },
            ));
        }

        let mut next = self.clone();
        let (rules, private, public, table) = next.parts_mut();
        let size = rules.group(group).size();
        for knowledge in [private, public] {
            record_ask(knowledge, asker, target, index, group, size, success);
        }
        if success {
            let sizes = table.hand_sizes_mut();
            sizes[asker.index()] += 1;
            sizes[target.index()] -= 1;
        }

        let reports = match next.propagate(&Scope::Group(group)) {
            Ok(reports) => reports,
            Err(EngineError::ConsistencyViolation(violation)) => {
                return Err(self.reject("ask", violation));
            }
            Err(other) => return Err(other),
        };
        *self = next;

        event!(
            target: TARGET,
            Level::DEBUG,
            owner = %self.owner(),
            kind = "ask",
            asker = %asker,
            target_seat = %target,
            card = %card,
            success,
            private_passes = reports.private.passes,
            public_passes = reports.public.passes,
            tightened = reports.tightened(),
        );
        Ok(reports)
    }

    /// Records the call of `group`, where `revealed[i]` cards of it were held by seat `i`.
    pub fn apply_call(&mut self, group: GroupId, revealed: &[u8]) -> Result<ViewReports, EngineError> {
        if !self.rules().contains_group(group) {
            return Err(IllegalAction::UnknownGroup(group).into());
        }
        if let Err(violation) = self.check_revealed(group, revealed) {
            return Err(self.reject("call", violation));
        }

        let mut next = self.clone();
        let (rules, private, public, table) = next.parts_mut();
        let cards = rules.group(group).cards();
        for knowledge in [private, public] {
            for seat in rules.seats() {
                for &card in cards {
                    knowledge.matrix_mut().set(seat, card, Status::Absent);
                }
                knowledge.counters_mut().set(seat, group, 0);
            }
        }
        for (size, removed) in table.hand_sizes_mut().iter_mut().zip(revealed) {
            *size -= removed;
        }
        table.mark_called(group);

        let reports = match next.propagate(&Scope::All) {
            Ok(reports) => reports,
            Err(EngineError::ConsistencyViolation(violation)) => {
                return Err(self.reject("call", violation));
            }
            Err(other) => return Err(other),
        };
        *self = next;

        if tracing::enabled!(target: TARGET, Level::DEBUG) {
            let hand_sizes = self.table().hand_sizes().to_vec();
            event!(
                target: TARGET,
                Level::DEBUG,
                owner = %self.owner(),
                kind = "call",
                group = %self.rules().group(group).label(),
                revealed = ?revealed,
                hand_sizes = ?hand_sizes,
                private_passes = reports.private.passes,
                public_passes = reports.public.passes,
                tightened = reports.tightened(),
            );
        }
        Ok(reports)
    }

    /// Revealed counts must cover every seat, sum to the group size and agree
    /// with what both views already know about each seat.
    fn check_revealed(&self, group: GroupId, revealed: &[u8]) -> Result<(), Violation> {
        let rules = self.rules();
        if !self.table().is_remaining(group) {
            return Err(Violation::GroupNotRemaining { group });
        }
        if revealed.len() != rules.participants() {
            return Err(Violation::RevealedArity {
                expected: rules.participants(),
                found: revealed.len(),
            });
        }
        let size = rules.group(group).size();
        let total: usize = revealed.iter().map(|count| *count as usize).sum();
        if total != size as usize {
            return Err(Violation::RevealedTotal {
                group,
                expected: size,
                found: total,
            });
        }
        for (seat, &count) in rules.seats().zip(revealed) {
            let hand_size = self.hand_size(seat);
            if count > hand_size {
                return Err(Violation::HandUnderflow {
                    seat,
                    hand_size,
                    removed: count,
                });
            }
            for knowledge in [self.private(), self.public()] {
                let held = knowledge.count_in_group(rules, seat, group, Status::Held);
                let absent = knowledge.count_in_group(rules, seat, group, Status::Absent);
                let min = held.max(knowledge.counter(seat, group));
                let max = (size - absent).min(hand_size);
                if count < min || count > max {
                    return Err(Violation::RevealedCount {
                        seat,
                        group,
                        revealed: count,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    fn reject(&self, kind: &'static str, violation: Violation) -> EngineError {
        tracing::warn!(
            target: TARGET,
            owner = %self.owner(),
            kind,
            invariant = ?violation.invariant(),
            %violation,
            message = "event contradicts the current belief; state left unchanged"
        );
        EngineError::ConsistencyViolation(violation)
    }
}

fn record_ask(
    knowledge: &mut Knowledge,
    asker: Seat,
    target: Seat,
    card: usize,
    group: GroupId,
    group_size: u8,
    success: bool,
) {
    let asker_count = knowledge.counter(asker, group);
    if success {
        knowledge.matrix_mut().set(asker, card, Status::Held);
        knowledge.matrix_mut().set(target, card, Status::Absent);
        let bumped = if asker_count == 0 {
            1
        } else {
            (asker_count + 1).min(group_size)
        };
        knowledge.counters_mut().set(asker, group, bumped);
        let target_count = knowledge.counter(target, group);
        knowledge
            .counters_mut()
            .set(target, group, target_count.saturating_sub(1));
    } else {
        knowledge.matrix_mut().set(asker, card, Status::Absent);
        knowledge.matrix_mut().set(target, card, Status::Absent);
        if asker_count == 0 {
            knowledge.counters_mut().set(asker, group, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rules;
    use std::sync::Arc;

    fn card(name: &str) -> Card {
        name.parse().unwrap()
    }

    fn hearts_state(owner: u8) -> BeliefState {
        let hand: Vec<Card> = ["2h", "3h", "4h", "5h", "6h", "7h", "8h", "9h", "Th"]
            .iter()
            .map(|name| card(name))
            .collect();
        BeliefState::new(Arc::new(Rules::standard()), Seat::new(owner), &hand).unwrap()
    }

    #[test]
    fn successful_ask_moves_the_card() {
        let mut belief = hearts_state(1);
        let hh = belief.rules().group_by_label("Hh").unwrap();
        belief
            .apply_ask(Seat::new(2), Seat::new(1), card("Th"), true)
            .unwrap();
        assert_eq!(belief.hand_size(Seat::new(1)), 8);
        assert_eq!(belief.hand_size(Seat::new(2)), 10);
        assert_eq!(belief.status(Seat::new(1), card("Th")), Some(Status::Absent));
        assert_eq!(belief.status(Seat::new(2), card("Th")), Some(Status::Held));
        assert_eq!(belief.public_status(Seat::new(1), card("Th")), Some(Status::Absent));
        assert_eq!(belief.public_status(Seat::new(2), card("Th")), Some(Status::Held));
        assert_eq!(belief.counter(Seat::new(1), hh), 1);
        assert_eq!(belief.counter(Seat::new(2), hh), 1);
        assert!(!belief.own_hand().contains(card("Th")));
    }

    #[test]
    fn failed_ask_marks_both_seats_absent() {
        let mut belief = hearts_state(1);
        let hh = belief.rules().group_by_label("Hh").unwrap();
        belief
            .apply_ask(Seat::new(2), Seat::new(1), card("Jh"), false)
            .unwrap();
        assert_eq!(belief.hand_size(Seat::new(1)), 9);
        assert_eq!(belief.hand_size(Seat::new(2)), 9);
        assert_eq!(belief.status(Seat::new(1), card("Jh")), Some(Status::Absent));
        assert_eq!(belief.status(Seat::new(2), card("Jh")), Some(Status::Absent));
        assert_eq!(belief.public_status(Seat::new(2), card("Jh")), Some(Status::Absent));
        assert_eq!(belief.counter(Seat::new(1), hh), 2);
        assert_eq!(belief.counter(Seat::new(2), hh), 1);
        assert_eq!(belief.public_counter(Seat::new(2), hh), 1);
        assert_eq!(belief.public_counter(Seat::new(1), hh), 0);
    }

    #[test]
    fn illegal_asks_leave_state_untouched() {
        let mut belief = hearts_state(0);
        let before = belief.clone();
        let err = belief
            .apply_ask(Seat::new(1), Seat::new(3), card("Jh"), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction(IllegalAction::NotOpponent { .. })));
        let err = belief
            .apply_ask(Seat::new(0), Seat::new(1), card("Jc"), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction(IllegalAction::NoCardInGroup { .. })));
        assert_eq!(belief.private(), before.private());
        assert_eq!(belief.table(), before.table());
    }

    #[test]
    fn contradictory_ask_is_rejected_atomically() {
        let mut belief = hearts_state(0);
        belief
            .apply_ask(Seat::new(3), Seat::new(0), card("9h"), true)
            .unwrap();
        assert_eq!(belief.status(Seat::new(3), card("9h")), Some(Status::Held));
        let before = belief.clone();
        // 9h is known to be with seat 3, so seat 1 cannot hand it over.
        let err = belief
            .apply_ask(Seat::new(2), Seat::new(1), card("9h"), true)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::ConsistencyViolation(Violation::DuplicateHolder { .. })
        ));
        assert_eq!(belief.private(), before.private());
        assert_eq!(belief.public(), before.public());
        assert_eq!(belief.table(), before.table());
    }

    #[test]
    fn call_validation_rejects_bad_counts() {
        let mut belief = hearts_state(0);
        let eights = belief.rules().group_by_label("8J").unwrap();
        let lh = belief.rules().group_by_label("Lh").unwrap();
        let before = belief.clone();
        assert!(matches!(
            belief.apply_call(eights, &[1, 0, 2, 0, 3]),
            Err(EngineError::ConsistencyViolation(Violation::RevealedArity { .. }))
        ));
        assert!(matches!(
            belief.apply_call(eights, &[1, 0, 2, 0, 2, 0]),
            Err(EngineError::ConsistencyViolation(Violation::RevealedTotal { .. }))
        ));
        // The owner holds exactly one card of 8J.
        assert!(matches!(
            belief.apply_call(eights, &[0, 0, 3, 0, 3, 0]),
            Err(EngineError::ConsistencyViolation(Violation::RevealedCount { .. }))
        ));
        // And all six of Lh.
        assert!(matches!(
            belief.apply_call(lh, &[5, 1, 0, 0, 0, 0]),
            Err(EngineError::ConsistencyViolation(Violation::RevealedCount { .. }))
        ));
        assert!(matches!(
            belief.apply_call(GroupId::new(40), &[0; 6]),
            Err(EngineError::IllegalAction(IllegalAction::UnknownGroup(_)))
        ));
        assert_eq!(belief.private(), before.private());
        assert_eq!(belief.table(), before.table());
    }

    #[test]
    fn calling_twice_is_rejected() {
        let mut belief = hearts_state(0);
        let lh = belief.rules().group_by_label("Lh").unwrap();
        belief.apply_call(lh, &[6, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(belief.hand_size(Seat::new(0)), 3);
        assert!(matches!(
            belief.apply_call(lh, &[6, 0, 0, 0, 0, 0]),
            Err(EngineError::ConsistencyViolation(Violation::GroupNotRemaining { .. }))
        ));
        assert!(matches!(
            belief.apply_ask(Seat::new(1), Seat::new(0), card("2h"), false),
            Err(EngineError::IllegalAction(IllegalAction::GroupAlreadyCalled(_)))
        ));
    }
}
