use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rustdoc-impls", version)]
#[command(
    about = "Serve rustdoc trait implementor tables over MCP",
    long_about = None
)]
pub struct Cli {
    /// Doc root, `target/` directory or project directory to index on startup.
    /// Falls back to RUSTDOC_IMPLS_DOC_ROOT, CARGO_TARGET_DIR, then an upward search.
    pub doc_root: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use clap::error::ErrorKind;

    #[test]
    fn test_doc_root_is_optional() {
        let_assert!(Ok(cli) = Cli::try_parse_from(["rustdoc-impls"]));
        check!(cli.doc_root.is_none());

        let_assert!(Ok(cli) = Cli::try_parse_from(["rustdoc-impls", "~/project/target"]));
        check!(cli.doc_root == Some(PathBuf::from("~/project/target")));
    }

    #[test]
    fn test_flags_are_not_taken_as_paths() {
        let_assert!(Err(err) = Cli::try_parse_from(["rustdoc-impls", "--help"]));
        check!(err.kind() == ErrorKind::DisplayHelp);

        let_assert!(Err(err) = Cli::try_parse_from(["rustdoc-impls", "--version"]));
        check!(err.kind() == ErrorKind::DisplayVersion);

        let_assert!(Err(err) = Cli::try_parse_from(["rustdoc-impls", "--verbose"]));
        check!(err.kind() == ErrorKind::UnknownArgument);
    }
}
