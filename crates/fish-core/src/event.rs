//! Publicly broadcast game events.

use crate::config::GroupId;
use crate::model::card::Card;
use crate::model::seat::Seat;
use serde::{Deserialize, Serialize};

/// `asker` requested `card` from `target`; `success` when it changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskEvent {
    pub asker: Seat,
    pub target: Seat,
    pub card: Card,
    pub success: bool,
}

/// `group` was called; `revealed[i]` is how many of its cards seat `i` held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub group: GroupId,
    pub revealed: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Ask(AskEvent),
    Call(CallEvent),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Ask(_) => "ask",
            Event::Call(_) => "call",
        }
    }
}

impl From<AskEvent> for Event {
    fn from(event: AskEvent) -> Self {
        Event::Ask(event)
    }
}

impl From<CallEvent> for Event {
    fn from(event: CallEvent) -> Self {
        Event::Call(event)
    }
}
