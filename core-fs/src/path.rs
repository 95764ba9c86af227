//! Path model
//!
//! A [`PathComponent`] keeps the string it was built from next to a
//! lexically canonical absolute form computed once at construction. Nothing
//! here touches the filesystem: existence is never checked and symbolic links
//! are left for the driver's `canonicalize` to resolve.

use std::env;
use std::fmt;
use std::path::{Component, Path as StdPath, PathBuf, MAIN_SEPARATOR};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Immutable, normalized filesystem path
///
/// A component built from an empty string, or from a relative string when
/// the working directory cannot be determined, is *null-backed*: it has no
/// canonical form and every operation taking it fails with `InvalidPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathComponent {
    raw: Option<String>,
    canonical: Option<PathBuf>,
}

impl PathComponent {
    /// Build a component from a path string
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let canonical = lexical_canonical(&raw);
        Self {
            raw: Some(raw),
            canonical,
        }
    }

    /// A component with no backing path
    pub fn null() -> Self {
        Self::default()
    }

    /// The string this component was built from
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Absolute path with `.`/`..` and duplicate separators collapsed
    pub fn canonical(&self) -> Option<&StdPath> {
        self.canonical.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.canonical.is_none()
    }

    /// Last segment of the canonical path
    pub fn name(&self) -> Option<&str> {
        self.canonical.as_deref()?.file_name()?.to_str()
    }

    /// Derive `canonical/segment`, re-canonicalized
    ///
    /// Returns `None` for a null-backed component.
    pub fn by_appending(&self, segment: &str) -> Option<PathComponent> {
        let base = self.canonical.as_ref()?;
        let joined = format!("{}{}{}", base.to_string_lossy(), MAIN_SEPARATOR, segment);
        Some(Self::new(joined))
    }
}

/// Resolve `raw` to an absolute path without consulting the filesystem
///
/// `..` above the root stays at the root.
fn lexical_canonical(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }

    let input = StdPath::new(raw);
    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        env::current_dir().ok()?.join(input)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }

    Some(out)
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.canonical {
            Some(path) => write!(f, "{}", path.display()),
            None => f.write_str("<null>"),
        }
    }
}

impl From<&str> for PathComponent {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PathComponent {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for PathComponent {
    fn from(raw: &String) -> Self {
        Self::new(raw.as_str())
    }
}

impl From<&StdPath> for PathComponent {
    fn from(path: &StdPath) -> Self {
        Self::new(path.to_string_lossy())
    }
}

impl From<PathBuf> for PathComponent {
    fn from(path: PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

impl From<&PathComponent> for PathComponent {
    fn from(component: &PathComponent) -> Self {
        component.clone()
    }
}

impl Serialize for PathComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathComponent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::new(raw),
            None => Self::null(),
        })
    }
}

/// A resolved location under two naming conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub absolute_path: PathComponent,
    pub relative_path: PathComponent,
}

impl Path {
    pub fn new(absolute_path: PathComponent, relative_path: PathComponent) -> Self {
        Self {
            absolute_path,
            relative_path,
        }
    }

    /// Both components built from the same path string
    pub fn from_path_string(path: &str) -> Self {
        Self::new(PathComponent::new(path), PathComponent::new(path))
    }

    /// Child of the absolute component
    pub fn by_appending(&self, segment: &str) -> Option<PathComponent> {
        self.absolute_path.by_appending(segment)
    }
}

impl From<&Path> for PathComponent {
    fn from(path: &Path) -> Self {
        path.absolute_path.clone()
    }
}
