//! Selecting and indexing a documentation directory.

use crate::detection::{expand_tilde, resolve_doc_root};
use crate::format::doc_root_summary;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetDocRootRequest {
    /// Rustdoc output directory (containing trait.impl/), a target/ directory,
    /// or a project directory after `cargo doc`
    pub path: String,
}

/// Resolve the requested directory to a doc root and index it.
pub async fn handle_set_doc_root(
    state: &DocState,
    request: SetDocRootRequest,
) -> Result<String, String> {
    let requested = PathBuf::from(expand_tilde(&request.path).into_owned());
    let requested = tokio::fs::canonicalize(&requested)
        .await
        .map_err(|e| format!("Failed to resolve path '{}': {}", request.path, e))?;

    let Some(root) = resolve_doc_root(&requested) else {
        return Err(format!(
            "No rustdoc output found at {}.\n\n\
             Expected a trait.impl/ directory in it, in doc/ or in target/doc/. \
             Run `cargo doc` first.",
            requested.display()
        ));
    };

    let previous = state.doc_root().await;
    let index = state
        .set_doc_root(root)
        .await
        .map_err(|e| format!("Failed to index documentation: {:#}", e))?;

    Ok(doc_root_summary(&index, previous.as_deref()))
}
