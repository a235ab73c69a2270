// Workspace - the single directory all generated files are written to
// Every output path is validated against the workspace root before any write

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to get app data directory")]
    NoAppDataDir,
    #[error("Path '{0}' escapes the workspace")]
    OutsideWorkspace(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// The directory generated MIDI files, the catalog and the history live in.
///
/// The root is canonicalized once at construction. `resolve` does a purely
/// lexical containment check after that, so a filename like
/// `../../etc/passwd` is rejected before anything touches the disk.
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open a workspace at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>) -> WorkspaceResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        let root = root.as_ref().canonicalize()?;
        Ok(Workspace { root })
    }

    /// Open the default workspace under the platform data directory
    pub fn default_location() -> WorkspaceResult<Self> {
        let data_dir = dirs::data_dir().ok_or(WorkspaceError::NoAppDataDir)?;
        Workspace::new(data_dir.join("com.patternforge.app"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `filename` to an absolute path inside the workspace.
    ///
    /// Fails if the joined path would land outside the root.
    pub fn resolve(&self, filename: &str) -> WorkspaceResult<PathBuf> {
        let joined = self.root.join(filename);
        let normalized = normalize(&joined);
        if !normalized.starts_with(&self.root) {
            return Err(WorkspaceError::OutsideWorkspace(filename.to_string()));
        }
        Ok(normalized)
    }

    /// Resolve `filename`, then write `data` to it. Parent directories
    /// inside the workspace are created as needed.
    pub fn write_file(&self, filename: &str, data: &[u8]) -> WorkspaceResult<PathBuf> {
        let path = self.resolve(filename)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        log::info!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(path)
    }

    /// Path of the pattern catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join("pattern_catalog.json")
    }

    /// Path of the generation history file
    pub fn history_path(&self) -> PathBuf {
        self.root.join("generator_history.json")
    }
}

/// Lexically normalize a path: drop `.` components and let `..` consume
/// the preceding component. No filesystem access, so symlinks inside the
/// workspace are not followed here.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plain_filename_resolves_inside_root() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        let path = ws.resolve("drums_GEN-0001_trap_140bpm.mid").unwrap();
        assert!(path.starts_with(ws.root()));
        assert_eq!(path.file_name().unwrap(), "drums_GEN-0001_trap_140bpm.mid");
    }

    #[test]
    fn test_subdirectory_is_allowed() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        let path = ws.resolve("kits/melody.mid").unwrap();
        assert!(path.starts_with(ws.root()));
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        let result = ws.resolve("../../etc/passwd");
        assert!(matches!(result, Err(WorkspaceError::OutsideWorkspace(_))));
    }

    #[test]
    fn test_absolute_path_is_rejected() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        let result = ws.resolve("/etc/passwd");
        assert!(matches!(result, Err(WorkspaceError::OutsideWorkspace(_))));
    }

    #[test]
    fn test_write_file_lands_in_workspace() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        let path = ws.write_file("test.mid", b"MThd").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), b"MThd");
    }

    #[test]
    fn test_write_refuses_escape() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path()).unwrap();

        assert!(ws.write_file("../stolen.mid", b"MThd").is_err());
    }
}
