//! MinLib Core
//!
//! Core types, errors and configuration shared by the MinLib extraction
//! and bundling pipeline.

pub mod config;
pub mod copy_spec;
pub mod error;
pub mod paths;
pub mod types;

pub use config::{BundleConfig, BundleConfigBuilder};
pub use error::{Error, Result};
pub use types::*;
