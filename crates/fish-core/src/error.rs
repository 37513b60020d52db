//! Error types surfaced by the engine.

use crate::belief::Violation;
use crate::config::GroupId;
use crate::model::card::Card;
use crate::model::seat::Seat;
use thiserror::Error;

/// A card identifier that does not name any card.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed card identifier '{0}'")]
pub struct MalformedCardError(pub String);

/// Setup problems detected before any belief state exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    MalformedCard(#[from] MalformedCardError),
    #[error("the deck holds no cards")]
    EmptyDeck,
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("card {0} is not part of the configured deck")]
    CardNotInDeck(Card),
    #[error("card {0} is not assigned to any group")]
    UngroupedCard(Card),
    #[error("group '{label}' has {size} cards; groups must hold between 1 and 255")]
    GroupSize { label: String, size: usize },
    #[error("group label '{0}' is used more than once")]
    DuplicateGroupLabel(String),
    #[error("at least two participants are required, found {0}")]
    TooFewParticipants(usize),
    #[error("at most 255 participants are supported, found {0}")]
    TooManyParticipants(usize),
    #[error("{0} has no opponents")]
    NoOpponents(Seat),
    #[error("expected {expected} hand sizes, found {found}")]
    HandSizeCount { expected: usize, found: usize },
    #[error("hand sizes sum to {found} but the deck holds {expected} cards")]
    PopulationMismatch { expected: usize, found: usize },
    #[error("expected {expected} hands, found {found}")]
    HandCount { expected: usize, found: usize },
    #[error("{seat} was dealt {found} cards, expected {expected}")]
    HandSizeMismatch { seat: Seat, expected: u8, found: usize },
    #[error("{0} is not a participant")]
    UnknownSeat(Seat),
    #[error("group {0} does not exist")]
    UnknownGroup(GroupId),
}

/// A requested action that the rules forbid; nothing was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("{0} is not a participant")]
    UnknownSeat(Seat),
    #[error("card {0} is not part of the configured deck")]
    CardNotInDeck(Card),
    #[error("group {0} does not exist")]
    UnknownGroup(GroupId),
    #[error("group {0} has already been called")]
    GroupAlreadyCalled(GroupId),
    #[error("{asker} may not ask {target}: they are on the same team")]
    NotOpponent { asker: Seat, target: Seat },
    #[error("{asker} already holds {card}")]
    AlreadyHeld { asker: Seat, card: Card },
    #[error("{asker} holds no other card in the group of {card}")]
    NoCardInGroup { asker: Seat, card: Card },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("consistency violation: {0}")]
    ConsistencyViolation(#[from] Violation),
    #[error("illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),
    #[error(transparent)]
    MalformedCard(#[from] MalformedCardError),
}
