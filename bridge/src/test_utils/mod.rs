//! Test utilities
//!
//! Hand-written transport and alert doubles plus payload fixtures.
//!
//! The repository and host ports are also `automock`ed (see `domain::ports`);
//! the transport double stays hand-written because tests script a sequence of
//! responses and then assert on every request it saw.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
