//! Core types for the forge.

pub mod category;
pub mod item;
pub mod provenance;
pub mod request;

pub use category::*;
pub use item::*;
pub use provenance::*;
pub use request::*;
