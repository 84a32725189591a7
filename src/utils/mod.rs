//! Request extractors, token verification and retry helpers.

pub mod jwt;
pub mod retry;
pub mod validate;
