use fish_core::belief::{Knowledge, Scope, TableState, propagate};
use fish_core::{Ask, BeliefState, Card, GroupId, Rules, Seat, Status};
use std::sync::Arc;

fn card(name: &str) -> Card {
    name.parse().unwrap()
}

fn cards(names: &[&str]) -> Vec<Card> {
    names.iter().map(|name| card(name)).collect()
}

fn belief(owner: u8, hand: &[&str]) -> BeliefState {
    BeliefState::new(Arc::new(Rules::standard()), Seat::new(owner), &cards(hand)).unwrap()
}

const HEARTS: [&str; 9] = ["2h", "3h", "4h", "5h", "6h", "7h", "8h", "9h", "Th"];

fn group(state: &BeliefState, label: &str) -> GroupId {
    state.rules().group_by_label(label).unwrap()
}

#[test]
fn own_low_hearts_are_callable() {
    let state = belief(0, &HEARTS);
    let call = state.check_call().expect("low hearts are fully held");
    assert_eq!(call.group, group(&state, "Lh"));
    let expected: Vec<(Seat, Card)> = cards(&["2h", "3h", "4h", "5h", "6h", "7h"])
        .into_iter()
        .map(|card| (Seat::new(0), card))
        .collect();
    assert_eq!(call.assignments, expected);
}

#[test]
fn last_seat_not_ruled_out_holds_the_card() {
    let state = belief(0, &HEARTS);
    let rules = state.rules();
    let jh = rules.index_of(card("Jh")).unwrap();
    let mut knowledge: Knowledge = state.private().clone();
    for seat in 1..5 {
        knowledge.matrix_mut().set(Seat::new(seat), jh, Status::Absent);
    }
    assert_eq!(knowledge.status(Seat::new(5), jh), Status::Unknown);
    propagate(rules, &mut knowledge, state.table(), &Scope::Cards(vec![jh])).unwrap();
    assert_eq!(knowledge.status(Seat::new(5), jh), Status::Held);
}

#[test]
fn successful_ask_adjusts_both_counters() {
    let mut state = belief(1, &HEARTS);
    let hh = group(&state, "Hh");
    assert_eq!(state.counter(Seat::new(2), hh), 0);
    assert_eq!(state.counter(Seat::new(1), hh), 2);
    state
        .apply_ask(Seat::new(2), Seat::new(1), card("Th"), true)
        .unwrap();
    assert_eq!(state.counter(Seat::new(2), hh), 1);
    assert_eq!(state.counter(Seat::new(1), hh), 1);
    assert_eq!(state.public_counter(Seat::new(2), hh), 1);
    assert_eq!(state.public_counter(Seat::new(1), hh), 0);
}

#[test]
fn call_removes_group_and_cards() {
    let mut state = belief(0, &HEARTS);
    let eights = group(&state, "8J");
    state.apply_call(eights, &[1, 0, 2, 0, 3, 0]).unwrap();
    assert_eq!(state.table().hand_sizes(), &[8, 9, 7, 9, 6, 9]);
    assert!(!state.table().is_remaining(eights));
    let rules = state.rules();
    for seat in rules.seats() {
        assert_eq!(state.counter(seat, eights), 0);
        assert_eq!(state.public_counter(seat, eights), 0);
        for &index in rules.group(eights).cards() {
            assert_eq!(state.private().status(seat, index), Status::Absent);
            assert_eq!(state.public().status(seat, index), Status::Absent);
        }
    }
    assert_eq!(state.own_hand().len(), 8);
    assert!(state.is_consistent_snapshot());
}

#[test]
fn two_two_two_split_is_callable() {
    let mut state = belief(0, &["2h", "3h", "9h", "Th", "Jh", "8h", "8c", "8d", "BJ"]);
    for opponent in [1, 3, 5] {
        let opponent = Seat::new(opponent);
        state.apply_ask(Seat::new(2), opponent, card("6h"), false).unwrap();
        state.apply_ask(Seat::new(2), opponent, card("7h"), false).unwrap();
        state.apply_ask(Seat::new(4), opponent, card("4h"), false).unwrap();
        state.apply_ask(Seat::new(4), opponent, card("5h"), false).unwrap();
    }
    let call = state.check_call().expect("every low heart is placed");
    let expected = vec![
        (Seat::new(0), card("2h")),
        (Seat::new(0), card("3h")),
        (Seat::new(2), card("4h")),
        (Seat::new(2), card("5h")),
        (Seat::new(4), card("6h")),
        (Seat::new(4), card("7h")),
    ];
    assert_eq!(call.assignments, expected);
}

#[test]
fn teammate_counter_places_the_last_card() {
    let mut state = belief(0, &["2h", "9h", "2d", "9d", "2c", "9c", "2s", "9s", "8c"]);
    state
        .apply_ask(Seat::new(2), Seat::new(3), card("3h"), false)
        .unwrap();
    for name in ["3h", "4h", "5h", "6h"] {
        state.apply_ask(Seat::new(2), Seat::new(1), card(name), true).unwrap();
    }
    let lh = group(&state, "Lh");
    assert_eq!(state.counter(Seat::new(2), lh), 5);
    assert_eq!(state.status(Seat::new(2), card("7h")), Some(Status::Held));

    let call = state.check_call().expect("low hearts are placed");
    let mut expected = vec![(Seat::new(0), card("2h"))];
    expected.extend(cards(&["3h", "4h", "5h", "6h", "7h"]).into_iter().map(|card| (Seat::new(2), card)));
    assert_eq!(call.group, lh);
    assert_eq!(call.assignments, expected);
}

#[test]
fn endgame_hand_sizes_place_remaining_cards() {
    let rules = Arc::new(Rules::standard());
    let owner = Seat::new(0);
    let lh = rules.group_by_label("Lh").unwrap();
    let own = cards(&["2h", "3h"]);

    let mut private = Knowledge::blank(&rules);
    for index in 0..rules.population() {
        let in_lh = rules.group_of(index) == lh;
        for seat in rules.seats() {
            if !in_lh || rules.are_opponents(owner, seat) {
                private.matrix_mut().set(seat, index, Status::Absent);
            }
        }
        if in_lh {
            let status = if own.contains(&rules.card(index)) {
                Status::Held
            } else {
                Status::Absent
            };
            private.matrix_mut().set(owner, index, status);
        }
    }
    for name in ["4h", "5h"] {
        let index = rules.index_of(card(name)).unwrap();
        private.matrix_mut().set(Seat::new(2), index, Status::Absent);
    }
    private.counters_mut().set(owner, lh, 2);

    let table = TableState::new(&rules, vec![2, 0, 2, 0, 2, 0], [lh]).unwrap();
    let public = Knowledge::blank(&rules);
    let state = BeliefState::from_parts(rules, owner, private, public, table).unwrap();

    assert_eq!(state.status(Seat::new(4), card("4h")), Some(Status::Held));
    assert_eq!(state.status(Seat::new(4), card("5h")), Some(Status::Held));
    assert_eq!(state.status(Seat::new(2), card("6h")), Some(Status::Held));
    assert_eq!(state.status(Seat::new(2), card("7h")), Some(Status::Held));
    assert_eq!(state.check_call().map(|call| call.group), Some(lh));
}

#[test]
fn inconsistent_seed_state_is_rejected() {
    let rules = Arc::new(Rules::standard());
    let mut private = Knowledge::blank(&rules);
    let jh = rules.index_of(card("Jh")).unwrap();
    private.matrix_mut().set(Seat::new(1), jh, Status::Held);
    private.matrix_mut().set(Seat::new(3), jh, Status::Held);
    let table = TableState::initial(&rules);
    let public = Knowledge::blank(&rules);
    let err = BeliefState::from_parts(rules, Seat::new(0), private, public, table).unwrap_err();
    assert!(matches!(
        err,
        fish_core::EngineError::ConsistencyViolation(fish_core::Violation::DuplicateHolder { .. })
    ));
}

#[test]
fn seed_counter_beyond_group_size_is_rejected() {
    let rules = Arc::new(Rules::standard());
    let mut private = Knowledge::blank(&rules);
    private.counters_mut().set(Seat::new(1), GroupId::new(0), 7);
    let table = TableState::initial(&rules);
    let public = Knowledge::blank(&rules);
    let err = BeliefState::from_parts(rules, Seat::new(0), private, public, table).unwrap_err();
    assert!(matches!(
        err,
        fish_core::EngineError::ConsistencyViolation(fish_core::Violation::GroupCounter {
            counter: 7,
            size: 6,
            ..
        })
    ));
}

#[test]
fn seed_table_with_unknown_group_is_rejected() {
    let rules = Rules::standard();
    let err = TableState::new(&rules, vec![9; 6], [GroupId::new(0), GroupId::new(12)]).unwrap_err();
    assert_eq!(err, fish_core::ConfigurationError::UnknownGroup(GroupId::new(12)));
}

#[test]
fn failed_ask_bookkeeping() {
    let mut state = belief(1, &HEARTS);
    let hh = group(&state, "Hh");
    state
        .apply_ask(Seat::new(2), Seat::new(1), card("Jh"), false)
        .unwrap();
    assert_eq!(state.table().hand_sizes(), &[9; 6]);
    assert_eq!(state.status(Seat::new(1), card("Jh")), Some(Status::Absent));
    assert_eq!(state.status(Seat::new(2), card("Jh")), Some(Status::Absent));
    assert_eq!(state.counter(Seat::new(1), hh), 2);
    assert_eq!(state.counter(Seat::new(2), hh), 1);
}

#[test]
fn known_opponent_card_is_a_guaranteed_ask() {
    let mut state = belief(0, &HEARTS);
    assert_eq!(state.guaranteed_ask(), None);
    state
        .apply_ask(Seat::new(1), Seat::new(0), card("9h"), true)
        .unwrap();
    assert_eq!(
        state.guaranteed_ask(),
        Some(Ask {
            target: Seat::new(1),
            card: card("9h"),
        })
    );
    assert!(state.legal_ask(Seat::new(1), card("9h")));
}

#[test]
fn rejected_events_do_not_commit() {
    let mut state = belief(0, &HEARTS);
    let before = state.clone();
    let lh = group(&state, "Lh");
    assert!(state.apply_call(lh, &[0, 6, 0, 0, 0, 0]).is_err());
    assert!(state.apply_ask(Seat::new(0), Seat::new(1), card("2h"), true).is_err());
    assert_eq!(state.private(), before.private());
    assert_eq!(state.public(), before.public());
    assert_eq!(state.table(), before.table());
}
