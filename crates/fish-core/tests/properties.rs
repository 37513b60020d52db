//! Random games played from a known deal, checking every belief after every event.

use fish_core::belief::{Scope, Status};
use fish_core::model::Hand;
use fish_core::{AskEvent, BeliefState, CallEvent, Deal, Event, GroupId, Observers, Rules, Seat};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Ground truth plus the observers being tested.
struct Table {
    rules: Arc<Rules>,
    hands: Vec<Hand>,
    observers: Observers,
    called: usize,
}

impl Table {
    fn deal(seed: u64) -> (Self, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let rules = Arc::new(Rules::standard());
        let deal = Deal::random(rules.clone(), &mut rng);
        let hands = deal.hands().iter().map(|hand| Hand::with_cards(hand.clone())).collect();
        let observers = Observers::from_deal(&deal).unwrap();
        (
            Self {
                rules,
                hands,
                observers,
                called: 0,
            },
            rng,
        )
    }

    fn holder(&self, index: usize) -> Option<Seat> {
        let card = self.rules.card(index);
        self.rules
            .seats()
            .find(|seat| self.hands[seat.index()].contains(card))
    }

    fn legal_asks(&self) -> Vec<AskEvent> {
        let mut asks = Vec::new();
        for asker in self.rules.seats() {
            let hand = &self.hands[asker.index()];
            for group in self.rules.group_ids() {
                let cards = self.rules.group(group).cards();
                let holds_some = cards
                    .iter()
                    .any(|index| hand.contains(self.rules.card(*index)));
                if !holds_some {
                    continue;
                }
                for &index in cards {
                    let card = self.rules.card(index);
                    if hand.contains(card) {
                        continue;
                    }
                    for &target in self.rules.opponents(asker) {
                        asks.push(AskEvent {
                            asker,
                            target,
                            card,
                            success: self.holder(index) == Some(target),
                        });
                    }
                }
            }
        }
        asks
    }

    fn next_event(&self, rng: &mut SmallRng) -> Option<Event> {
        let remaining: Vec<GroupId> = self.observers.states()[0].table().remaining_groups().collect();
        if remaining.is_empty() {
            return None;
        }
        let asks = self.legal_asks();
        if asks.is_empty() || rng.gen_bool(0.1) {
            let group = remaining[rng.gen_range(0..remaining.len())];
            let cards = self.rules.group(group).cards();
            let revealed = self
                .rules
                .seats()
                .map(|seat| {
                    cards
                        .iter()
                        .filter(|index| self.holder(**index) == Some(seat))
                        .count() as u8
                })
                .collect();
            return Some(Event::Call(CallEvent { group, revealed }));
        }
        Some(Event::Ask(asks[rng.gen_range(0..asks.len())]))
    }

    fn play(&mut self, event: &Event) {
        match event {
            Event::Ask(ask) if ask.success => {
                self.hands[ask.target.index()].remove(ask.card);
                self.hands[ask.asker.index()].add(ask.card);
            }
            Event::Ask(_) => {}
            Event::Call(call) => {
                for &index in self.rules.group(call.group).cards() {
                    let card = self.rules.card(index);
                    for hand in &mut self.hands {
                        hand.remove(card);
                    }
                }
                self.called += 1;
            }
        }
    }
}

fn agrees_with_truth(table: &Table, state: &BeliefState) -> Result<(), TestCaseError> {
    let rules = &table.rules;
    for index in 0..rules.population() {
        let holder = table.holder(index);
        for seat in rules.seats() {
            for knowledge in [state.private(), state.public()] {
                match knowledge.status(seat, index) {
                    Status::Held => prop_assert_eq!(holder, Some(seat)),
                    Status::Absent => prop_assert_ne!(holder, Some(seat)),
                    Status::Unknown => {}
                }
            }
        }
    }
    for seat in rules.seats() {
        for group in rules.group_ids() {
            let actual = rules
                .group(group)
                .cards()
                .iter()
                .filter(|index| table.holder(**index) == Some(seat))
                .count() as u8;
            prop_assert!(state.counter(seat, group) <= actual);
            prop_assert!(state.public_counter(seat, group) <= actual);
        }
        prop_assert_eq!(state.hand_size(seat) as usize, table.hands[seat.index()].len());
    }
    prop_assert_eq!(state.own_hand(), table.hands[state.owner().index()].clone());
    Ok(())
}

fn never_loosens(before: &BeliefState, after: &BeliefState) -> Result<(), TestCaseError> {
    let rules = before.rules();
    for seat in rules.seats() {
        for index in 0..rules.population() {
            for (old, new) in [
                (before.private().status(seat, index), after.private().status(seat, index)),
                (before.public().status(seat, index), after.public().status(seat, index)),
            ] {
                prop_assert!(!(old.is_known() && new == Status::Unknown));
            }
        }
    }
    Ok(())
}

fn scope_of(event: &Event, rules: &Rules) -> Scope {
    match event {
        Event::Ask(ask) => rules
            .group_of_card(ask.card)
            .map(Scope::Group)
            .unwrap_or(Scope::All),
        Event::Call(_) => Scope::All,
    }
}

fn play_game(seed: u64, max_events: usize) -> Result<(), TestCaseError> {
    let (mut table, mut rng) = Table::deal(seed);
    for state in table.observers.states() {
        agrees_with_truth(&table, state)?;
    }
    for _ in 0..max_events {
        let Some(event) = table.next_event(&mut rng) else {
            break;
        };
        let before = table.observers.clone();
        table.play(&event);
        table.observers.apply(&event).map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert!(table.observers.all_consistent());
        prop_assert!(table.observers.public_views_agree());
        let population = table.rules.population();
        for (old, state) in before.states().iter().zip(table.observers.states()) {
            let total: usize = state.table().cards_in_play();
            prop_assert_eq!(total, population - 6 * table.called);
            never_loosens(old, state)?;
            agrees_with_truth(&table, state)?;

            let mut again = state.clone();
            let reports = again
                .propagate(&scope_of(&event, &table.rules))
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(reports.tightened(), 0);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn random_games_keep_beliefs_sound(seed in any::<u64>()) {
        play_game(seed, 60)?;
    }
}

#[test]
fn fixed_seed_game_runs_to_completion() {
    play_game(2024, 400).unwrap();
}
