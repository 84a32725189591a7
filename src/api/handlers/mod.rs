//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod admin;
pub mod applications;
pub mod categories;
pub mod health;
pub mod profiles;
