//! Runtime abstraction for system operations.
//!
//! The checker never touches the clock, the environment or the disk
//! directly. Everything goes through [`Runtime`] so that tests can pin time
//! and swap the filesystem for a mock.
//!
//! # Structure
//!
//! - `clock` - Wall clock
//! - `env` - Environment variables and well-known directories
//! - `fs` - File system operations (read, write, rename, directory)

mod clock;
mod env;
mod fs;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::env as std_env;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Clock
    fn now(&self) -> DateTime<Utc>;

    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    // Directories
    /// Per-user data directory (e.g. `~/.local/share` on Linux).
    fn data_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn now(&self) -> DateTime<Utc> {
        self.now_impl()
    }

    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir_impl()
    }
}
