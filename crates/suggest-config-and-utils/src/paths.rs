//! File system layout of a suggestd installation.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

const BASE_DIR_NAME: &str = ".suggestd";
const SOCKET_NAME: &str = "suggestd.sock";
const PID_NAME: &str = "suggestd.pid";

/// Locations of the runtime files, all under one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Paths under `~/.suggestd`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;
        Ok(Self::with_base_dir(home.join(BASE_DIR_NAME)))
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `--base-dir` if given, else `~/.suggestd`.
    pub fn resolve(base_dir: Option<&Path>) -> CoreResult<Self> {
        match base_dir {
            Some(dir) => Ok(Self::with_base_dir(dir)),
            None => Self::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/config.json`
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// `<base>/suggestd.sock`
    pub fn socket_file(&self) -> PathBuf {
        self.base_dir.join(SOCKET_NAME)
    }

    /// `<base>/suggestd.pid`
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join(PID_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// `<base>/logs/dev.jsonl`
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("dev.jsonl")
    }

    /// Creates the base and logs directories.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().expect("Failed to determine home directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths_with_base_dir() {
        let base = PathBuf::from("/tmp/test-suggestd");
        let paths = Paths::with_base_dir(base.clone());

        assert_eq!(paths.base_dir(), base.as_path());
        assert_eq!(paths.config_file(), base.join("config.json"));
        assert_eq!(paths.socket_file(), base.join("suggestd.sock"));
        assert_eq!(paths.pid_file(), base.join("suggestd.pid"));
        assert_eq!(paths.logs_dir(), base.join("logs"));
        assert_eq!(paths.log_file(), base.join("logs/dev.jsonl"));
    }

    #[test]
    fn test_paths_default_under_home() {
        let paths = Paths::new().unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(paths.base_dir(), home.join(".suggestd").as_path());
    }

    #[test]
    fn test_resolve_prefers_explicit_base() {
        let dir = tempdir().unwrap();
        let paths = Paths::resolve(Some(dir.path())).unwrap();
        assert_eq!(paths.base_dir(), dir.path());
    }

    #[test]
    fn test_ensure_dirs_creates_directories() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("suggestd");
        let paths = Paths::with_base_dir(&base);

        assert!(!base.exists());
        paths.ensure_dirs().unwrap();

        assert!(base.is_dir());
        assert!(paths.logs_dir().is_dir());

        // Idempotent
        paths.ensure_dirs().unwrap();
    }
}
