//! Utility functions for working with A2A types.
//!
//! Helpers for building outbound messages and ids, and for flattening the
//! parts of inbound messages and artifacts.

pub mod constants;
pub mod message;
pub mod parts;

pub use constants::*;
pub use message::*;
pub use parts::*;
