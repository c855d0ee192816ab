//! # IPC Module
//!
//! JSON call surface: envelopes in, receipts out.

pub mod handler;
pub mod payloads;

pub use handler::*;
pub use payloads::*;
