//! StepForge Common Library
//!
//! Analysis-result model, input documents and error types shared by the
//! generator core and the command-line front end.

pub mod error;
pub mod input;
pub mod model;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::*;

/// StepForge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
