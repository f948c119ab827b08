//! Domain services behind the order-intake flows.
//!
//! - [`validation`] - pure field predicates (phone, address, custom order)
//! - [`delivery`] - governorate to delivery-fee resolution
//! - [`intake`] - image size gate, preview slot, storage path convention
//! - [`orders`] - the submission state machine tying the above together

pub mod delivery;
pub mod intake;
pub mod orders;
pub mod validation;

pub use orders::{OrderIntake, SubmissionError};
