//! Bookstore Common Types
//!
//! Shared types used across the bookstore workspace: book identifiers,
//! currency codes, monetary rounding and the book record itself.

pub mod identifiers;
pub mod monetary;
pub mod book;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use book::*;
pub use error::*;
pub use time::*;
