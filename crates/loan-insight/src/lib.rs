//! Loan prediction, credit scoring, and analytics.
//!
//! The classifier is an injected boundary; everything derived from a user's history lives in
//! [`scoring`] and [`reports`] as pure functions. Services wire those to repositories and are
//! exposed through the axum routers in each module.

pub mod accounts;
pub mod config;
pub mod error;
pub mod gamification;
pub mod predictions;
pub mod reports;
pub mod scoring;
pub mod store;
pub mod telemetry;
