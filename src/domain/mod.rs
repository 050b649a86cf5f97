//! Domain aggregates exposed by the contacts service layer.

pub mod contact;
pub mod filter;
pub mod types;
