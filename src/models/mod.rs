//! Data models for the HubSpot CRM deals API.
//!
//! - [`primitives`] - Identifier newtypes (`DealId`, `Cursor`)
//! - [`deal`] - Deal records and the list-page envelope

pub mod primitives;
pub mod deal;

// Re-export commonly used types
pub use primitives::*;
pub use deal::*;
