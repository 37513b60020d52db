//! Per-participant belief tracking: state, invariants, propagation, queries
//! and event application.

pub mod apply;
pub mod consistency;
pub mod inference;
pub mod matrix;
pub mod observers;
pub mod propagate;
pub mod snapshot;
pub mod state;

pub use consistency::{Scope, Violation, first_violation, is_consistent};
pub use inference::{Ask, CallAssignment, CallGuess, FirstCandidate, RandomGuess};
pub use matrix::{GroupCounters, OwnershipMatrix, Status};
pub use observers::Observers;
pub use propagate::{PropagationReport, propagate};
pub use snapshot::{PublicSnapshot, SnapshotRecord};
pub use state::{BeliefState, Knowledge, TableState, ViewReports};
