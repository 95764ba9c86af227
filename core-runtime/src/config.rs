//! # Core Configuration Module
//!
//! Provides configuration management for the filesystem core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `FileSystemConfig` instance that holds the native bridges and settings the
//! `FileSystemService` needs. It enforces fail-fast validation so that a
//! missing capability is reported at construction time instead of on the
//! first file operation.
//!
//! ## Required Dependencies
//!
//! - `NativeDriver` - Stat, list, read, write and tree operations
//! - `LocationResolver` - Contents, caches and temporary directories
//!
//! When the `desktop-shims` feature is enabled, `StdFileSystemDriver` and
//! `DesktopLocationResolver` are injected automatically if not provided.
//!
//! ## Usage
//!
//! ### Basic Configuration with Desktop Defaults
//!
//! ```ignore
//! use core_runtime::config::FileSystemConfig;
//!
//! let config = FileSystemConfig::builder()
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Configuration with Custom Bridges
//!
//! ```ignore
//! use core_runtime::config::FileSystemConfig;
//! use std::sync::Arc;
//!
//! let config = FileSystemConfig::builder()
//!     .driver(Arc::new(MyDriver))
//!     .locations(Arc::new(MyLocations))
//!     .base64_line_width(Some(76))
//!     .redact_paths(false)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates all settings and provides actionable error messages
//! when capabilities are missing or values are out of range:
//!
//! ```ignore
//! use core_runtime::config::FileSystemConfig;
//!
//! let result = FileSystemConfig::builder()
//!     .base64_line_width(Some(10))
//!     .build();
//! assert!(result.is_err());
//! ```

use crate::error::{Error, Result};
use bridge_traits::{LocationResolver, NativeDriver};
use std::sync::Arc;

/// Line width used by MIME-style base64 output
pub const MIME_LINE_WIDTH: usize = 76;

/// Configuration for the filesystem core.
///
/// This struct holds all dependencies and settings required to construct a
/// `FileSystemService`. Use [`FileSystemConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct FileSystemConfig {
    /// Native filesystem driver
    pub driver: Arc<dyn NativeDriver>,

    /// Standard directory resolver
    pub locations: Arc<dyn LocationResolver>,

    /// Wrap base64 output every `n` characters (`None` keeps a single line)
    pub base64_line_width: Option<usize>,

    /// Reduce paths to their file name in log output
    pub redact_paths: bool,
}

impl std::fmt::Debug for FileSystemConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemConfig")
            .field("driver", &"NativeDriver { ... }")
            .field("locations", &"LocationResolver { ... }")
            .field("base64_line_width", &self.base64_line_width)
            .field("redact_paths", &self.redact_paths)
            .finish()
    }
}

impl FileSystemConfig {
    /// Creates a new builder for constructing a `FileSystemConfig`.
    pub fn builder() -> FileSystemConfigBuilder {
        FileSystemConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Base64 line width is greater than 0
    /// - Base64 line width is a multiple of 4 so every line holds whole quanta
    pub fn validate(&self) -> Result<()> {
        if let Some(width) = self.base64_line_width {
            if width == 0 {
                return Err(Error::Config(
                    "Base64 line width must be greater than 0. Use None for single-line output."
                        .to_string(),
                ));
            }

            if width % 4 != 0 {
                return Err(Error::Config(format!(
                    "Base64 line width must be a multiple of 4, got {}",
                    width
                )));
            }
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn driver_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "NativeDriver".to_string(),
        message: "NativeDriver implementation is required for file access. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default StdFileSystemDriver. \
                 Mobile: inject a driver backed by the platform file manager. \
                 Tests: inject bridge_memory::MemoryFileSystemDriver."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn locations_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "LocationResolver".to_string(),
        message: "LocationResolver implementation is required for standard directories. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default DesktopLocationResolver. \
                 Mobile: inject the application container directories. \
                 Tests: inject bridge_memory::MemoryFileSystemDriver."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_driver() -> Result<Arc<dyn NativeDriver>> {
    use bridge_desktop::StdFileSystemDriver;

    let driver: Arc<dyn NativeDriver> = Arc::new(StdFileSystemDriver::new());
    Ok(driver)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_driver() -> Result<Arc<dyn NativeDriver>> {
    Err(driver_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_locations() -> Result<Arc<dyn LocationResolver>> {
    use bridge_desktop::DesktopLocationResolver;

    let locations: Arc<dyn LocationResolver> = Arc::new(DesktopLocationResolver::new());
    Ok(locations)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_locations() -> Result<Arc<dyn LocationResolver>> {
    Err(locations_missing_error())
}

/// Builder for constructing [`FileSystemConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](FileSystemConfigBuilder::build) to create the final config.
pub struct FileSystemConfigBuilder {
    driver: Option<Arc<dyn NativeDriver>>,
    locations: Option<Arc<dyn LocationResolver>>,
    base64_line_width: Option<usize>,
    redact_paths: bool,
}

impl Default for FileSystemConfigBuilder {
    fn default() -> Self {
        Self {
            driver: None,
            locations: None,
            base64_line_width: None,
            redact_paths: true,
        }
    }
}

impl FileSystemConfigBuilder {
    /// Sets the native driver implementation.
    ///
    /// If not provided, `StdFileSystemDriver` is used when the
    /// `desktop-shims` feature is enabled.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use core_runtime::config::FileSystemConfig;
    /// use std::sync::Arc;
    ///
    /// let builder = FileSystemConfig::builder()
    ///     .driver(Arc::new(MyDriver));
    /// ```
    pub fn driver(mut self, driver: Arc<dyn NativeDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Sets the standard location resolver.
    ///
    /// The resolver must hand back absolute paths to directories that exist.
    pub fn locations(mut self, locations: Arc<dyn LocationResolver>) -> Self {
        self.locations = Some(locations);
        self
    }

    /// Sets the base64 line width.
    ///
    /// Default: `None` (single line). [`MIME_LINE_WIDTH`] matches the layout
    /// produced by MIME encoders.
    pub fn base64_line_width(mut self, width: Option<usize>) -> Self {
        self.base64_line_width = width;
        self
    }

    /// Enables or disables path redaction in log output.
    ///
    /// Default: true
    pub fn redact_paths(mut self, enabled: bool) -> Self {
        self.redact_paths = enabled;
        self
    }

    /// Builds the final `FileSystemConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns `Ok(FileSystemConfig)` on success, or an error if:
    /// - A required bridge is missing and no desktop default is available
    /// - Configuration values are invalid
    pub fn build(self) -> Result<FileSystemConfig> {
        let driver = match self.driver {
            Some(driver) => driver,
            None => provide_default_driver()?,
        };

        let locations = match self.locations {
            Some(locations) => locations,
            None => provide_default_locations()?,
        };

        let config = FileSystemConfig {
            driver,
            locations,
            base64_line_width: self.base64_line_width,
            redact_paths: self.redact_paths,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{
        AppendHandle, BridgeError, NativeStat, StandardLocation,
    };
    use bytes::Bytes;
    use std::path::{Path, PathBuf};

    type BridgeResult<T> = std::result::Result<T, BridgeError>;

    // Inert bridges for builder tests
    struct NullDriver;

    impl NativeDriver for NullDriver {
        fn canonicalize(&self, path: &Path) -> BridgeResult<PathBuf> {
            Ok(path.to_path_buf())
        }

        fn exists(&self, _path: &Path, _expect_directory: bool) -> bool {
            false
        }

        fn stat(&self, path: &Path) -> BridgeResult<NativeStat> {
            Err(BridgeError::not_found(path))
        }

        fn list_children(&self, path: &Path) -> BridgeResult<Vec<String>> {
            Err(BridgeError::not_found(path))
        }

        fn read_all(&self, path: &Path) -> BridgeResult<Bytes> {
            Err(BridgeError::not_found(path))
        }

        fn create_empty(&self, _path: &Path, _is_directory: bool) -> BridgeResult<()> {
            Ok(())
        }

        fn open_for_append(&self, path: &Path) -> BridgeResult<Box<dyn AppendHandle>> {
            Err(BridgeError::not_found(path))
        }

        fn overwrite(&self, _path: &Path, _data: &[u8]) -> BridgeResult<()> {
            Ok(())
        }

        fn delete(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }

        fn move_entry(&self, _src: &Path, _dest: &Path) -> BridgeResult<()> {
            Ok(())
        }

        fn copy_entry(&self, _src: &Path, _dest: &Path) -> BridgeResult<()> {
            Ok(())
        }

        fn mkdir(&self, _path: &Path, _recursive: bool) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct FixedLocations;

    impl LocationResolver for FixedLocations {
        fn resolve(&self, location: StandardLocation) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from("/").join(location.to_string()))
        }
    }

    fn builder_with_bridges() -> FileSystemConfigBuilder {
        FileSystemConfig::builder()
            .driver(Arc::new(NullDriver))
            .locations(Arc::new(FixedLocations))
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_defaults() {
        let config = FileSystemConfig::builder()
            .build()
            .expect("desktop defaults should succeed");

        assert!(config.base64_line_width.is_none());
        assert!(config.redact_paths);
        assert!(!config.driver.exists(Path::new(""), false));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_driver() {
        let result = FileSystemConfig::builder()
            .locations(Arc::new(FixedLocations))
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { .. }));
        let err_msg = err.to_string();
        assert!(err_msg.contains("NativeDriver"));
        assert!(err_msg.contains("file access"));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_locations() {
        let result = FileSystemConfig::builder()
            .driver(Arc::new(NullDriver))
            .build();

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("LocationResolver"));
        assert!(err_msg.contains("standard directories"));
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(config.base64_line_width, None);
        assert!(config.redact_paths);
        assert_eq!(
            config.locations.resolve(StandardLocation::Caches).unwrap(),
            PathBuf::from("/caches")
        );
    }

    #[test]
    fn test_builder_with_mime_line_width() {
        let config = builder_with_bridges()
            .base64_line_width(Some(MIME_LINE_WIDTH))
            .redact_paths(false)
            .build()
            .unwrap();

        assert_eq!(config.base64_line_width, Some(76));
        assert!(!config.redact_paths);
    }

    #[test]
    fn test_validate_rejects_zero_line_width() {
        let result = builder_with_bridges().base64_line_width(Some(0)).build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be greater than 0"));
    }

    #[test]
    fn test_validate_rejects_partial_quantum_line_width() {
        let result = builder_with_bridges().base64_line_width(Some(10)).build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("multiple of 4"));
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder_with_bridges().build().unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("NativeDriver { ... }"));
        assert!(debug.contains("redact_paths: true"));
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = builder_with_bridges()
            .base64_line_width(Some(64))
            .build()
            .unwrap();

        let cloned = config.clone();
        assert_eq!(cloned.base64_line_width, config.base64_line_width);
        assert!(Arc::ptr_eq(&cloned.driver, &config.driver));
    }
}
