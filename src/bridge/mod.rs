//! Call router and event translator.
//!
//! The router decides *whether* a call reaches the backend (lifecycle gate,
//! known-operation check); the translator decides *what* each call means
//! (payload coercion into typed backend calls).

mod router;
mod translator;

pub use router::{Bridge, Outcome, StartupGate};
