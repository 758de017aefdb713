//! Prober library for the Gemini probe tooling
//!
//! This library provides the HTTP probe primitive, the bounded probe runner,
//! presentation seams and the diagnostic commands built on top of them.

pub mod commands;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use commands::ProbeContext;
pub use error::{ProberError, ProberResult};
pub use services::*;
pub use traits::*;
pub use types::*;
