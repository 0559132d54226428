//! Generation pipeline: the provider fallback chain and its result type.

pub mod orchestrator;

pub use orchestrator::{Draft, Orchestrator};
