//! Prober services implementations

pub mod console;
pub mod gemini_client;
pub mod probe_runner;
pub mod result_store;

#[cfg(test)]
pub mod tests;

pub use console::*;
pub use gemini_client::RealGeminiClient;
pub use probe_runner::*;
pub use result_store::*;
