//! Locating a rustdoc output directory ("doc root").
//!
//! A doc root is any directory containing `trait.impl/`. Users may point at
//! the doc root itself, at a `target/` directory or at a project directory;
//! all three resolve to the same place.

use crate::cli::Cli;
use crate::index::TRAIT_IMPL_DIR;
use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the doc root explicitly.
pub const DOC_ROOT_ENV: &str = "RUSTDOC_IMPLS_DOC_ROOT";

/// How far to walk up from the working directory outside a Git repository.
const MAX_DEPTH_OUTSIDE_GIT: usize = 3;

/// Where the startup doc root comes from, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocRootConfig {
    /// Positional `doc_root` argument
    pub cli_path: Option<String>,
    /// `RUSTDOC_IMPLS_DOC_ROOT`
    pub env_path: Option<String>,
    /// `CARGO_TARGET_DIR`
    pub cargo_target_dir: Option<String>,
}

impl DocRootConfig {
    /// Combine the parsed command line with the process environment.
    pub fn from_cli(cli: &Cli) -> Self {
        let non_empty = |v: String| (!v.trim().is_empty()).then_some(v);
        Self {
            cli_path: cli
                .doc_root
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned())
                .and_then(non_empty),
            env_path: env::var(DOC_ROOT_ENV).ok().and_then(non_empty),
            cargo_target_dir: env::var("CARGO_TARGET_DIR").ok().and_then(non_empty),
        }
    }

    /// Resolve the configured doc root, falling back to an upward search from
    /// `cwd`. Explicit settings that do not resolve are logged and skipped.
    pub fn resolve(&self, cwd: &Path) -> Option<PathBuf> {
        let explicit = [
            ("argument", self.cli_path.as_deref()),
            (DOC_ROOT_ENV, self.env_path.as_deref()),
            ("CARGO_TARGET_DIR", self.cargo_target_dir.as_deref()),
        ];
        for (origin, value) in explicit {
            let Some(value) = value else {
                continue;
            };
            let path = absolutize(cwd, &expand_tilde(value));
            match resolve_doc_root(&path) {
                Some(root) => {
                    info!(origin, root = %root.display(), "Using configured doc root");
                    return Some(root);
                }
                None => debug!(origin, path = %path.display(), "Configured path has no docs"),
            }
        }

        find_doc_root_upward(cwd)
    }
}

/// Resolve a user-supplied directory to a doc root.
///
/// Checks `path`, `path/doc` and `path/target/doc`, in that order.
pub fn resolve_doc_root(path: &Path) -> Option<PathBuf> {
    [
        path.to_path_buf(),
        path.join("doc"),
        path.join("target").join("doc"),
    ]
    .into_iter()
    .find(|candidate| is_doc_root(candidate))
}

/// Whether `path` directly contains `trait.impl/`.
pub fn is_doc_root(path: &Path) -> bool {
    path.join(TRAIT_IMPL_DIR).is_dir()
}

/// Walk up from `start` looking for `target/doc/trait.impl`.
///
/// Inside a Git repository the search stops at the repository root; outside
/// one it gives up after a few levels. System directories end the search.
pub fn find_doc_root_upward(start: &Path) -> Option<PathBuf> {
    let git_root = find_git_root(start);
    let max_depth = if git_root.is_some() {
        None
    } else {
        Some(MAX_DEPTH_OUTSIDE_GIT)
    };

    let mut current = start.to_path_buf();
    let mut depth = 0;
    loop {
        if let Some(root) = resolve_doc_root(&current) {
            info!("✓ Auto-detected doc root: {}", root.display());
            return Some(root);
        }

        if current.parent().is_none() || is_system_directory(&current) {
            debug!("Hit boundary directory: {}", current.display());
            break;
        }
        if let Some(ref git_root) = git_root
            && current == git_root.as_path()
        {
            debug!("Reached Git repository root, stopping search");
            break;
        }
        if let Some(max) = max_depth
            && depth >= max
        {
            debug!("Reached maximum search depth of {} directories", max);
            break;
        }

        match current.parent() {
            Some(parent) => {
                current = parent.to_path_buf();
                depth += 1;
            }
            None => break,
        }
    }

    debug!("No doc root found from {}", start.display());
    None
}

/// Find the directory containing `.git`, walking up from `start`.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Protected system locations where no project lives.
pub fn is_system_directory(path: &Path) -> bool {
    const SYSTEM_DIRS: &[&str] = &[
        "/usr", "/etc", "/var", "/opt", "/srv", "/bin", "/sbin", "/lib", "/lib64", "/boot", "/dev",
        "/proc", "/sys", "/run",
    ];
    let path_str = path.to_string_lossy().to_lowercase();
    SYSTEM_DIRS
        .iter()
        .any(|dir| path_str == *dir || path_str.starts_with(&format!("{}/", dir)))
        || path_str.ends_with(":\\windows")
        || path_str.contains(":\\windows\\")
        || path_str.contains(":\\program files")
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

fn absolutize(cwd: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("/usr/lib", true)]
    #[case("/etc", true)]
    #[case("/home/user/project", false)]
    #[case("/usrlocal", false)]
    fn test_is_system_directory(#[case] path: &str, #[case] expected: bool) {
        check!(is_system_directory(Path::new(path)) == expected);
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        let_assert!(Cow::Borrowed(path) = expand_tilde("/tmp/docs"));
        check!(path == "/tmp/docs");
        let_assert!(Cow::Borrowed(_) = expand_tilde("~user/docs"));
    }

    #[rstest]
    #[case(&["rustdoc-impls"], None)]
    #[case(&["rustdoc-impls", "target/doc"], Some("target/doc"))]
    #[case(&["rustdoc-impls", " "], None)]
    fn test_config_from_cli(#[case] args: &[&str], #[case] expected: Option<&str>) {
        use clap::Parser;

        let_assert!(Ok(cli) = Cli::try_parse_from(args));
        let config = DocRootConfig::from_cli(&cli);
        check!(config.cli_path.as_deref() == expected);
    }

    #[test]
    fn test_absolutize() {
        check!(absolutize(Path::new("/work"), "target") == Path::new("/work/target"));
        check!(absolutize(Path::new("/work"), "/abs") == Path::new("/abs"));
    }
}
