//! Core Kernel - Foundational types shared by the claims engine
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers
//! - Extraction confidence scores and the system-wide low-confidence threshold
//! - Port error types and health checks for adapters

pub mod identifiers;
pub mod confidence;
pub mod ports;
pub mod error;

pub use identifiers::ClaimId;
pub use confidence::{Confidence, LOW_CONFIDENCE_THRESHOLD};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
