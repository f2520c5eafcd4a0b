//! Components, their source files and the object groups they produce.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Suffix appended to a source path to name its object file.
pub const OBJECT_SUFFIX: &str = ".o";

/// A declared source file.
///
/// The extension is inferred once at declaration time and keeps its leading
/// dot (`.cpp`), which is also how it is reported in errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    path: PathBuf,
    extension: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        SourceFile { path, extension }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The extension including its leading dot, or an empty string.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Object file produced from this source: the full source path with
    /// [`OBJECT_SUFFIX`] appended (`adb/adb.cpp` -> `adb/adb.cpp.o`).
    pub fn object_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(OBJECT_SUFFIX);
        PathBuf::from(name)
    }
}

/// A named group of sources compiled with shared flags.
///
/// Components are created from the manifest and never mutated once the
/// component graph has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    name: String,
    sources: Vec<SourceFile>,
    flags: String,
    include_dirs: Vec<String>,
    deps: Vec<String>,
}

impl Component {
    /// Create an empty component.
    pub fn new(name: impl Into<String>) -> Self {
        Component {
            name: name.into(),
            sources: Vec::new(),
            flags: String::new(),
            include_dirs: Vec::new(),
            deps: Vec::new(),
        }
    }

    /// Add sources, keeping declaration order.
    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(sources.into_iter().map(SourceFile::new));
        self
    }

    /// Set the common compiler flags. The string is passed through untouched.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// Add include directories. Repeated directories are kept once, at their
    /// first position.
    pub fn with_include_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dir in dirs {
            let dir = dir.into();
            if !self.include_dirs.contains(&dir) {
                self.include_dirs.push(dir);
            }
        }
        self
    }

    /// Declare dependency edges from this component, in declaration order.
    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn include_dirs(&self) -> &[String] {
        &self.include_dirs
    }

    /// Names of the components this one depends on.
    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    /// Include directories rendered as `-I<dir>` flags.
    pub fn include_flags(&self) -> Vec<String> {
        self.include_dirs
            .iter()
            .map(|dir| format!("-I{}", dir))
            .collect()
    }
}

/// The ordered object files produced by one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectGroup {
    /// Owning component
    pub component: String,
    /// Object files in source declaration order
    pub objects: Vec<PathBuf>,
}

impl ObjectGroup {
    pub fn new(component: impl Into<String>) -> Self {
        ObjectGroup {
            component: component.into(),
            objects: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
