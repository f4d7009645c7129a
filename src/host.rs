//! Build Host Port
//!
//! Abstracts the host build system: where emitted artifacts go and where
//! dependency edges are registered for incremental invalidation. The core
//! only supplies the edges; the host decides when to re-run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GlyphpackResult;

/// Interface to the host build system.
pub trait BuildHost {
    /// Public base path prefixed onto external artifact URLs.
    fn public_path(&self) -> &str;

    /// Register an exact-file dependency edge.
    fn add_file_dependency(&mut self, path: &Path);

    /// Register a directory-contents dependency edge.
    fn add_directory_dependency(&mut self, path: &Path);

    /// Register an external artifact in the build output graph.
    fn emit_file(&mut self, name: &str, content: &[u8]) -> GlyphpackResult<()>;
}

/// Filesystem-backed host writing artifacts under an output root.
///
/// Used by the CLI; dependency edges are recorded so callers can inspect
/// or forward them to an outer watcher.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    out_dir: PathBuf,
    public_path: String,
    file_deps: Vec<PathBuf>,
    directory_deps: Vec<PathBuf>,
    written: Vec<PathBuf>,
}

impl DirectoryHost {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            public_path: "/".to_string(),
            file_deps: Vec::new(),
            directory_deps: Vec::new(),
            written: Vec::new(),
        }
    }

    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = public_path.into();
        self
    }

    pub fn file_dependencies(&self) -> &[PathBuf] {
        &self.file_deps
    }

    pub fn directory_dependencies(&self) -> &[PathBuf] {
        &self.directory_deps
    }

    /// Paths written so far, relative to the output root.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl BuildHost for DirectoryHost {
    fn public_path(&self) -> &str {
        &self.public_path
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.file_deps.push(path.to_path_buf());
    }

    fn add_directory_dependency(&mut self, path: &Path) {
        self.directory_deps.push(path.to_path_buf());
    }

    fn emit_file(&mut self, name: &str, content: &[u8]) -> GlyphpackResult<()> {
        let path = self.out_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        self.written.push(PathBuf::from(name));
        Ok(())
    }
}

/// In-memory host for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub public_path: String,
    pub file_deps: Vec<PathBuf>,
    pub directory_deps: Vec<PathBuf>,
    pub emitted: Vec<(String, Vec<u8>)>,
}

#[cfg(test)]
impl MemoryHost {
    pub fn new() -> Self {
        Self {
            public_path: "/".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl BuildHost for MemoryHost {
    fn public_path(&self) -> &str {
        &self.public_path
    }

    fn add_file_dependency(&mut self, path: &Path) {
        self.file_deps.push(path.to_path_buf());
    }

    fn add_directory_dependency(&mut self, path: &Path) {
        self.directory_deps.push(path.to_path_buf());
    }

    fn emit_file(&mut self, name: &str, content: &[u8]) -> GlyphpackResult<()> {
        self.emitted.push((name.to_string(), content.to_vec()));
        Ok(())
    }
}
