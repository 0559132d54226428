//! Vendor identifiers and default model ids.

pub mod vendor;

pub use vendor::Vendor;
