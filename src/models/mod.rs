//! Database and configuration models used by the contacts repository.

pub mod config;
pub mod contact;
