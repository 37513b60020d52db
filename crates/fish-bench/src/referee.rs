//! Ground-truth game loop driving a table of observers.
//!
//! The referee knows every hand. Seats choose asks and calls from their own
//! beliefs only; the referee resolves them against the truth, broadcasts the
//! outcome to every observer and checks the observers after every event.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fish_core::belief::{Ask, CallAssignment, CallGuess, FirstCandidate, RandomGuess};
use fish_core::model::{Hand, TeamId};
use fish_core::{
    AskEvent, BeliefState, CallEvent, Card, Deal, EngineError, Event, GroupId, Observers, Rules,
    Seat,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::GuessKind;

/// Forced-call strategy selected by configuration.
pub enum Guesser {
    First(FirstCandidate),
    Random(RandomGuess<StdRng>),
}

impl Guesser {
    pub fn new(kind: GuessKind, seed: u64) -> Self {
        match kind {
            GuessKind::First => Guesser::First(FirstCandidate),
            GuessKind::Random => Guesser::Random(RandomGuess::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl CallGuess for Guesser {
    fn guess(&mut self, card: Card, candidates: &[Seat]) -> Seat {
        match self {
            Guesser::First(inner) => inner.guess(card, candidates),
            Guesser::Random(inner) => inner.guess(card, candidates),
        }
    }
}

/// Counters collected over one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub starting_seat: u8,
    pub asks: usize,
    pub successful_asks: usize,
    pub guaranteed_asks: usize,
    pub calls: usize,
    pub failed_calls: usize,
    pub forced_calls: usize,
    pub team_scores: BTreeMap<TeamId, u32>,
    pub cells_tightened: usize,
    pub truncated: bool,
    pub engine_time: Duration,
}

impl GameRecord {
    pub fn events(&self) -> usize {
        self.asks + self.calls
    }
}

pub struct Referee {
    rules: Arc<Rules>,
    hands: Vec<Hand>,
    observers: Observers,
    turn: Seat,
    rng: StdRng,
    guesser: Guesser,
    record: GameRecord,
}

impl Referee {
    /// Deals a game from `seed`; the same seed always replays the same game.
    pub fn new(rules: Arc<Rules>, seed: u64, guess: GuessKind) -> Result<Self, RefereeError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let deal = Deal::random(rules.clone(), &mut rng);
        let observers = Observers::from_deal(&deal)?;
        let hands = deal
            .hands()
            .iter()
            .map(|hand| Hand::with_cards(hand.clone()))
            .collect();
        let turn = Seat::new(rng.gen_range(0..rules.participants()) as u8);
        let guesser = Guesser::new(guess, rng.r#gen());
        let record = GameRecord {
            starting_seat: turn.id(),
            team_scores: rules.seats().map(|seat| (rules.team_of(seat), 0)).collect(),
            ..GameRecord::default()
        };
        Ok(Self {
            rules,
            hands,
            observers,
            turn,
            rng,
            guesser,
            record,
        })
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Plays until every group is called or `max_turns` asks were made.
    pub fn play(mut self, max_turns: usize) -> Result<GameRecord, RefereeError> {
        loop {
            while let Some((caller, call)) = self.find_call() {
                self.resolve_call(caller, call, false)?;
            }
            if self.remaining().is_empty() {
                break;
            }
            let holding: Vec<TeamId> = self.teams_with_cards();
            if holding.len() == 1 {
                self.force_remaining_calls()?;
                break;
            }
            if self.record.asks >= max_turns {
                self.record.truncated = true;
                break;
            }
            self.advance_turn();
            let ask = self.choose_ask()?;
            self.resolve_ask(ask)?;
        }
        Ok(self.record)
    }

    fn state(&self, seat: Seat) -> &BeliefState {
        &self.observers.states()[seat.index()]
    }

    fn remaining(&self) -> Vec<GroupId> {
        self.state(Seat::new(0)).table().remaining_groups().collect()
    }

    fn holder(&self, card: Card) -> Option<Seat> {
        self.rules
            .seats()
            .find(|seat| self.hands[seat.index()].contains(card))
    }

    fn teams_with_cards(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = self
            .rules
            .seats()
            .filter(|seat| !self.hands[seat.index()].is_empty())
            .map(|seat| self.rules.team_of(seat))
            .collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }

    fn find_call(&self) -> Option<(Seat, CallAssignment)> {
        self.rules
            .seats()
            .find_map(|seat| self.state(seat).check_call().map(|call| (seat, call)))
    }

    /// Moves the turn off an empty hand: to the next teammate with cards, else to
    /// the next seat with cards.
    fn advance_turn(&mut self) {
        if !self.hands[self.turn.index()].is_empty() {
            return;
        }
        let teammates = self.rules.teammates(self.turn);
        let position = teammates
            .iter()
            .position(|seat| *seat == self.turn)
            .unwrap_or(0);
        let next_teammate = (1..teammates.len())
            .map(|offset| teammates[(position + offset) % teammates.len()])
            .find(|seat| !self.hands[seat.index()].is_empty());
        let participants = self.rules.participants();
        self.turn = next_teammate.unwrap_or_else(|| {
            (1..participants)
                .map(|offset| Seat::new(((self.turn.index() + offset) % participants) as u8))
                .find(|seat| !self.hands[seat.index()].is_empty())
                .unwrap_or(self.turn)
        });
    }

    fn choose_ask(&mut self) -> Result<Ask, RefereeError> {
        if let Some(ask) = self.state(self.turn).guaranteed_ask() {
            self.record.guaranteed_asks += 1;
            return Ok(ask);
        }
        let asks = self.state(self.turn).legal_asks();
        if asks.is_empty() {
            return Err(RefereeError::NoLegalAsk { seat: self.turn });
        }
        let pick = self.rng.gen_range(0..asks.len());
        Ok(asks[pick])
    }

    fn resolve_ask(&mut self, ask: Ask) -> Result<(), RefereeError> {
        let asker = self.turn;
        let success = self.hands[ask.target.index()].contains(ask.card);
        let broadcast = Event::Ask(AskEvent {
            asker,
            target: ask.target,
            card: ask.card,
            success,
        });
        self.broadcast(&broadcast)?;

        if success {
            self.hands[ask.target.index()].remove(ask.card);
            self.hands[asker.index()].add(ask.card);
            self.record.successful_asks += 1;
        } else {
            self.turn = ask.target;
        }
        self.record.asks += 1;
        self.verify()
    }

    fn resolve_call(
        &mut self,
        caller: Seat,
        call: CallAssignment,
        forced: bool,
    ) -> Result<(), RefereeError> {
        let success = call
            .assignments
            .iter()
            .all(|(seat, card)| self.holder(*card) == Some(*seat));
        let cards: Vec<Card> = self
            .rules
            .group(call.group)
            .cards()
            .iter()
            .map(|index| self.rules.card(*index))
            .collect();
        let revealed: Vec<u8> = self
            .rules
            .seats()
            .map(|seat| {
                cards
                    .iter()
                    .filter(|card| self.hands[seat.index()].contains(**card))
                    .count() as u8
            })
            .collect();
        self.broadcast(&Event::Call(CallEvent {
            group: call.group,
            revealed,
        }))?;

        for hand in &mut self.hands {
            for card in &cards {
                hand.remove(*card);
            }
        }
        let winner = if success {
            self.rules.team_of(caller)
        } else {
            self.rules
                .opponents(caller)
                .first()
                .map(|seat| self.rules.team_of(*seat))
                .unwrap_or_else(|| self.rules.team_of(caller))
        };
        *self.record.team_scores.entry(winner).or_insert(0) += 1;
        self.record.calls += 1;
        if !success {
            self.record.failed_calls += 1;
        }
        if forced {
            self.record.forced_calls += 1;
        }

        if tracing::enabled!(target: "fish_bench::call", Level::DEBUG) {
            event!(
                target: "fish_bench::call",
                Level::DEBUG,
                caller = %caller,
                group = %self.rules.group(call.group).label(),
                success,
                forced,
            );
        }
        self.verify()
    }

    /// The only team with cards left must call every remaining group.
    fn force_remaining_calls(&mut self) -> Result<(), RefereeError> {
        for group in self.remaining() {
            let Some(caller) = self
                .rules
                .seats()
                .find(|seat| !self.hands[seat.index()].is_empty())
            else {
                break;
            };
            let call = self.observers.states()[caller.index()].force_call(group, &mut self.guesser)?;
            self.resolve_call(caller, call, true)?;
        }
        Ok(())
    }

    fn broadcast(&mut self, event: &Event) -> Result<(), RefereeError> {
        let started = Instant::now();
        let reports = self.observers.apply(event)?;
        self.record.engine_time += started.elapsed();
        self.record.cells_tightened += reports.iter().map(|report| report.tightened()).sum::<usize>();
        Ok(())
    }

    fn verify(&self) -> Result<(), RefereeError> {
        let event_index = self.record.events();
        if !self.observers.all_consistent() {
            return Err(RefereeError::Inconsistent { event_index });
        }
        if !self.observers.public_views_agree() {
            return Err(RefereeError::PublicDivergence { event_index });
        }
        let expected: usize = self.hands.iter().map(Hand::len).sum();
        let found = self.state(Seat::new(0)).table().cards_in_play();
        if expected != found {
            return Err(RefereeError::HandSizeDrift { expected, found });
        }
        for (seat, state) in self.rules.seats().zip(self.observers.states()) {
            if state.own_hand() != self.hands[seat.index()] {
                return Err(RefereeError::OwnHandDrift { seat, event_index });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RefereeError {
    #[error("engine rejected a true event: {0}")]
    Engine(#[from] EngineError),
    #[error("{seat} has cards but no legal ask")]
    NoLegalAsk { seat: Seat },
    #[error("an observer is inconsistent after event {event_index}")]
    Inconsistent { event_index: usize },
    #[error("public views diverged after event {event_index}")]
    PublicDivergence { event_index: usize },
    #[error("observers count {found} cards in play, the table holds {expected}")]
    HandSizeDrift { expected: usize, found: usize },
    #[error("{seat}'s own hand no longer matches the table after event {event_index}")]
    OwnHandDrift { seat: Seat, event_index: usize },
}
