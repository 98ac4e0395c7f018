//! C/C++ Preprocessor Integration
//!
//! Plans and runs the external preprocessor whose line-marker output feeds
//! the directive parser. Each supported compiler contributes a pure
//! [`Invocation`] plan; [`run_preprocessor`] carries it out.

pub mod compiler;
pub mod runner;

pub use compiler::{Invocation, StagedInput, PREPROCESSOR_OUTPUT_FILE};
pub use runner::{execute, run_preprocessor};
