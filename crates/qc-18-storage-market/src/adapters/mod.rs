//! # Adapters Layer (Outer Hexagon)
//!
//! In-process implementations of the driven ports. A deployed runtime
//! supplies its own block source and journal.

pub mod clock;
pub mod event_log;

pub use clock::*;
pub use event_log::*;
