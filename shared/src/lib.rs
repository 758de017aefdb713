//! Shared types for the Gemini probe tooling
//!
//! Contains the key-value configuration loader and the probe data model used
//! by every command. Presentation and HTTP concerns live in the `prober` crate.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

pub use config::ConfigMap;
pub use errors::*;
pub use types::*;
