//! Simulation core for the AquaView water-quality monitor.
//!
//! Everything that is not presentation lives here: the synthetic sample
//! generator, the bounded history window, the alert evaluator, the persisted
//! settings store, and the timer-driven [`session::Session`] that ties them
//! together. The presentation layer and the LLM analyst are read-only
//! consumers of the snapshots a session hands out.

pub mod error;
pub mod evaluator;
pub mod generator;
pub mod history;
pub mod notify;
pub mod session;
pub mod store;
