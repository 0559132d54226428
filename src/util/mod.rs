//! Utility modules: deadlines and lenient decoding.

pub mod lenient;
pub mod timeout;
