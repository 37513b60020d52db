pub mod belief;
pub mod config;
pub mod deal;
pub mod error;
pub mod event;
pub mod model;

pub use belief::{
    Ask, BeliefState, CallAssignment, CallGuess, FirstCandidate, Observers, RandomGuess, Scope,
    Status, Violation,
};
pub use config::{GameConfig, GroupConfig, GroupId, Rules};
pub use deal::Deal;
pub use error::{ConfigurationError, EngineError, IllegalAction, MalformedCardError};
pub use event::{AskEvent, CallEvent, Event};
pub use model::{Card, HalfSuit, Seat};
