//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-fs`, `bridge-memory`). Host applications can
//! depend on `unifile-workspace` and enable the documented features without
//! needing to wire each crate individually.

#[cfg(any(feature = "desktop-shims", feature = "memory"))]
pub use core_fs;

#[cfg(feature = "memory")]
pub use bridge_memory;
