//! # Domain Layer (Inner Hexagon)
//!
//! Pure marketplace logic. NO I/O, NO async.
//!
//! ## Components
//!
//! - `registry`: ProviderRegistry, one record per principal
//! - `ledger`: RequestLedger, sequential ids and lifecycle status
//! - `guard`: existence / principal / status checks
//! - `accountant`: CapacityAccountant, atomic capacity transitions
//! - `state`: MarketState, the store owning registry + ledger
//! - `invariants`: runtime capacity checks

pub mod accountant;
pub mod entities;
pub mod guard;
pub mod invariants;
pub mod ledger;
pub mod registry;
pub mod state;
pub mod value_objects;

pub use accountant::*;
pub use entities::*;
pub use invariants::*;
pub use ledger::*;
pub use registry::*;
pub use state::*;
pub use value_objects::*;
