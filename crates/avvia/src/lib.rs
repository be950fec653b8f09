//! Candidate pipeline model for seasonal recruiting campaigns.
//!
//! Campaigns declare the roles they need to staff and the documents each role
//! requires; candidates move through a closed status taxonomy driven by
//! operator actions. Reports aggregate candidates per role and estimate the
//! operational risk of missing the staffing target on time.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
