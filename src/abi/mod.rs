//! Raw interface descriptions, exactly as the ABI JSON spells them.
//!
//! Nothing in here resolves types or validates values, see
//! [`crate::parser`] for turning an [`Abi`] into typed specs.

pub mod contract;
pub mod item;
pub mod operation;
pub mod param;
pub mod signature;
pub mod state_mutability;

pub use contract::Abi;
pub use item::AbiItem;
pub use operation::Operation;
pub use param::RawParam;
pub use signature::{derive_method_id, derive_signature, format_signature, signature_hash};
pub use state_mutability::StateMutability;
