//! Standard Location Resolution
//!
//! Hosts expose a handful of well-known directories (documents, caches,
//! temporary storage). The core never discovers them itself; it asks an
//! injected [`LocationResolver`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::Result;

/// Well-known directories every host must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardLocation {
    /// Persistent application contents (`files` on Android, `Documents` on iOS)
    Contents,
    /// Purgeable cache storage
    Caches,
    /// Short-lived scratch storage
    Temporary,
}

impl StandardLocation {
    pub const ALL: [StandardLocation; 3] = [Self::Contents, Self::Caches, Self::Temporary];
}

impl fmt::Display for StandardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contents => write!(f, "contents"),
            Self::Caches => write!(f, "caches"),
            Self::Temporary => write!(f, "temporary"),
        }
    }
}

/// Standard location resolver trait
///
/// # Contract
///
/// The returned path is absolute and the directory already exists when the
/// call returns. Implementations create it when missing.
pub trait LocationResolver: Send + Sync {
    fn resolve(&self, location: StandardLocation) -> Result<PathBuf>;
}
