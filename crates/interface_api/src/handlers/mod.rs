//! Request handlers

pub mod claims;
pub mod coverage;
pub mod health;
pub mod policy;
