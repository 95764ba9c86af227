//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the filesystem core:
//! - Logging and tracing infrastructure
//! - Configuration management and bridge injection
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that `core-fs` depends on. It
//! establishes the logging conventions and the fail-fast configuration
//! builder used to hand native bridges to the filesystem façade.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{FileSystemConfig, FileSystemConfigBuilder};
pub use error::{Error, Result};
