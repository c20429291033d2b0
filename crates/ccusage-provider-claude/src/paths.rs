//! Resolution of the Claude data directory
//!
//! The log root is either given explicitly or derived as `<home>/.claude`.
//! Environment access goes through [`EnvSource`] so callers (and tests) can
//! supply their own view of the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Variables consulted, in order, to find the user's home directory
pub const HOME_VARS: [&str; 2] = ["HOME", "USERPROFILE"];

/// Directory name of Claude's data under the home directory
pub const CLAUDE_DIR_NAME: &str = ".claude";

/// Subdirectory of the data directory holding per-project logs
pub const PROJECTS_DIR_NAME: &str = "projects";

/// Read-only access to environment variables
pub trait EnvSource {
    /// Value of `key`, if set
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Home directory from the first non-empty of [`HOME_VARS`]
///
/// Returns an empty string when none is set; the resulting data path is then
/// relative and most likely missing, which loads as "no data".
pub fn home_dir<E: EnvSource + ?Sized>(env: &E) -> String {
    HOME_VARS
        .iter()
        .filter_map(|key| env.var(key))
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// `<home>/.claude`
pub fn default_claude_path<E: EnvSource + ?Sized>(env: &E) -> PathBuf {
    PathBuf::from(home_dir(env)).join(CLAUDE_DIR_NAME)
}

/// The explicit path if given, otherwise [`default_claude_path`]
pub fn resolve_claude_path<E: EnvSource + ?Sized>(explicit: Option<&Path>, env: &E) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => default_claude_path(env),
    }
}

/// Root of the usage log tree for a given data directory
pub fn projects_dir(claude_path: &Path) -> PathBuf {
    claude_path.join(PROJECTS_DIR_NAME)
}
