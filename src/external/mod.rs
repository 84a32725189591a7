//! Clients for services this backend depends on.

pub mod backend;
pub mod client;
