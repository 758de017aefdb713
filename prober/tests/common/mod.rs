//! Common test utilities and infrastructure
//!
//! Shared fixtures and helpers used by the prober integration suites.

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{mount_model, ContextBuilder, TestContext};
