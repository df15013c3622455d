//! Shared types and models for the Warehouse Inventory Management Platform
//!
//! This crate contains the domain models and pure domain logic (stock status
//! derivation, serial-number handling, warranty expiry derivation, branch
//! aggregation regrouping) shared across the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
