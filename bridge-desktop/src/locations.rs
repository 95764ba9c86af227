//! Standard directory resolution for desktop hosts

use bridge_traits::{
    driver::entry_name,
    error::Result,
    location::{LocationResolver, StandardLocation},
};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const APP_DIR_NAME: &str = "unifile";

/// Desktop location resolver
///
/// Defaults follow the platform conventions exposed by `dirs`:
/// - Contents: `<data_dir>/unifile`
/// - Caches: `<cache_dir>/unifile`
/// - Temporary: `<temp_dir>/unifile`
#[derive(Debug, Clone)]
pub struct DesktopLocationResolver {
    contents_dir: PathBuf,
    caches_dir: PathBuf,
    temporary_dir: PathBuf,
}

impl DesktopLocationResolver {
    /// Create a resolver with default directories
    pub fn new() -> Self {
        Self::for_app(APP_DIR_NAME)
    }

    /// Create a resolver whose directories are namespaced by `app_name`
    pub fn for_app(app_name: &str) -> Self {
        let contents_dir = dirs::data_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".local")
                    .join("share")
            })
            .join(app_name);

        let caches_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(app_name);

        let temporary_dir = std::env::temp_dir().join(app_name);

        Self {
            contents_dir,
            caches_dir,
            temporary_dir,
        }
    }

    /// Create a resolver with custom directories
    pub fn with_directories(
        contents_dir: PathBuf,
        caches_dir: PathBuf,
        temporary_dir: PathBuf,
    ) -> Self {
        Self {
            contents_dir,
            caches_dir,
            temporary_dir,
        }
    }

    fn directory(&self, location: StandardLocation) -> &PathBuf {
        match location {
            StandardLocation::Contents => &self.contents_dir,
            StandardLocation::Caches => &self.caches_dir,
            StandardLocation::Temporary => &self.temporary_dir,
        }
    }
}

impl Default for DesktopLocationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationResolver for DesktopLocationResolver {
    fn resolve(&self, location: StandardLocation) -> Result<PathBuf> {
        let dir = self.directory(location);

        // Ensure directory exists
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            debug!(entry = %entry_name(dir), %location, "Created standard directory");
        }

        let absolute = if dir.is_absolute() {
            dir.clone()
        } else {
            std::env::current_dir()?.join(dir)
        };
        Ok(absolute)
    }
}
