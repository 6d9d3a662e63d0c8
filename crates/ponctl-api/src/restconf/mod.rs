//! RESTCONF transport and wire models for the MSAN MIB.

pub mod client;
pub mod models;
