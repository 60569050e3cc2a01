//! # Tracker API Endpoints
//!
//! Organized endpoint implementations for the tracker resource types this
//! tool touches: issues, search, links, transitions, and the current user.

pub mod issues;
pub mod links;
pub mod search;
pub mod transitions;
pub mod users;
