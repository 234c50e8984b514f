//! Shared data model for the AquaView water-quality monitor.
//!
//! These types are the contract between the simulation core, the persisted
//! settings blob, and the presentation/analyst layers. They carry no logic
//! beyond construction defaults and patch merging.

pub mod alert;
pub mod analysis;
pub mod sample;
pub mod settings;
