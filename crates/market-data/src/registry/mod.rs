//! Request pacing for market data providers.
//!
//! Free-tier history endpoints reject bursts, so every history call goes
//! through a shared [`RequestGate`] that keeps calls a minimum interval apart.

mod request_gate;

pub use request_gate::RequestGate;
