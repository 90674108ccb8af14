//! Aggregate trait for ledger-backed domain models.

use crate::entity::Entity;

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` validates a command and returns the
///   record describing what happened.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO. Persisting the mutated state together with
/// the returned record is the caller's job.
pub trait Aggregate: Entity {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single recorded event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which event to record given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error>;
}
