//! Pure helpers with no I/O

pub mod outcome;
pub mod prompt;
pub mod utils;

pub use outcome::*;
pub use utils::*;
