//! Shared server state: the active doc root and its index.

use crate::error::Result;
use crate::index::DocIndex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State shared by every tool handler.
///
/// The index is swapped as a whole when the doc root changes, so handlers
/// holding an `Arc<DocIndex>` keep a consistent view.
#[derive(Debug, Default)]
pub struct DocState {
    index: RwLock<Option<Arc<DocIndex>>>,
}

impl DocState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index, if a doc root has been configured.
    pub async fn index(&self) -> Option<Arc<DocIndex>> {
        self.index.read().await.clone()
    }

    pub async fn doc_root(&self) -> Option<PathBuf> {
        self.index
            .read()
            .await
            .as_ref()
            .map(|index| index.root().to_path_buf())
    }

    /// Scan `root` and make it the active doc root.
    ///
    /// The previous index stays active if the scan fails.
    pub async fn set_doc_root(&self, root: PathBuf) -> Result<Arc<DocIndex>> {
        let index = Arc::new(DocIndex::load(root).await?);
        *self.index.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Current index or a message telling the user how to configure one.
    pub async fn require_index(&self) -> std::result::Result<Arc<DocIndex>, String> {
        self.index().await.ok_or_else(|| {
            "No documentation indexed.\n\n\
             Use set_doc_root with a rustdoc output directory (containing trait.impl/), \
             a target/ directory or a project directory after running `cargo doc`."
                .to_string()
        })
    }
}
