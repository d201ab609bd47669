//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `doc_tree`: a temporary doc root holding the real `IvSizeUser` implementor
//!   script plus a few small synthetic ones
//! - `indexed_state`: a `DocState` with `doc_tree` already indexed
//!
//! [`TempWorkspace`] is the underlying temp directory abstraction.

// Each integration test crate uses a different subset of these helpers.
#![allow(dead_code)]

use rstest::fixture;
use rustdoc_impls::DocState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// The `crypto_common::IvSizeUser` implementor script exactly as rustdoc wrote it.
pub const IV_SIZE_USER_JS: &str =
    include_str!("../fixtures/trait.impl/crypto_common/trait.IvSizeUser.js");

/// `cipher::block::BlockCipher`, in the newer `Object.fromEntries` layout.
pub const BLOCK_CIPHER_JS: &str = r#"(function() {
    var implementors = Object.fromEntries([["aes",[["impl <a class=\"trait\" href=\"cipher/block/trait.BlockCipher.html\" title=\"trait cipher::block::BlockCipher\">BlockCipher</a> for <a class=\"struct\" href=\"aes/struct.Aes128.html\" title=\"struct aes::Aes128\">Aes128</a>",0,[]],["impl <a class=\"trait\" href=\"cipher/block/trait.BlockCipher.html\" title=\"trait cipher::block::BlockCipher\">BlockCipher</a> for <a class=\"struct\" href=\"aes/struct.Aes256.html\" title=\"struct aes::Aes256\">Aes256</a>",0,[]]]]]);
    if (window.register_implementors) {
        window.register_implementors(implementors);
    } else {
        window.pending_implementors = implementors;
    }
})()
//{"start":57,"fragment_lengths":[400]}"#;

/// `core::marker::Send`, with a synthetic entry for `cbc::Decryptor`.
pub const SEND_JS: &str = r#"(function() {var implementors = {
"cbc":[["impl&lt;C&gt; <a class=\"trait\" href=\"core/marker/trait.Send.html\" title=\"trait core::marker::Send\">Send</a> for <a class=\"struct\" href=\"cbc/struct.Decryptor.html\" title=\"struct cbc::Decryptor\">Decryptor</a>&lt;C&gt;<div class=\"where\">where\n    C: <a class=\"trait\" href=\"core/marker/trait.Send.html\" title=\"trait core::marker::Send\">Send</a>,</div>",1,[]]]
};if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#;

/// A temporary directory that is removed when dropped.
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content, creating parent directories.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Creates a minimal .git directory so detection sees a repository root.
    pub fn create_git_repo(&self, path: &str) {
        let git_path = self.root.join(path).join(".git");
        std::fs::create_dir_all(&git_path).expect("Failed to create .git directory");
        std::fs::write(git_path.join("HEAD"), "ref: refs/heads/main")
            .expect("Failed to write HEAD");
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A project directory whose `target/doc` holds implementor scripts.
pub struct DocTree {
    pub workspace: TempWorkspace,
}

impl DocTree {
    pub const DOC_DIR: &'static str = "target/doc";

    /// Creates the standard tree: IvSizeUser, BlockCipher and Send.
    pub fn new() -> Self {
        let tree = Self {
            workspace: TempWorkspace::new(),
        };
        tree.add_script("crypto_common/trait.IvSizeUser.js", IV_SIZE_USER_JS);
        tree.add_script("cipher/block/trait.BlockCipher.js", BLOCK_CIPHER_JS);
        tree.add_script("core/marker/trait.Send.js", SEND_JS);
        // Not an implementor script; must be ignored by the scan.
        tree.workspace
            .create_file("target/doc/trait.impl/crypto_common/index.html", "<html></html>");
        tree
    }

    /// Writes a script relative to `target/doc/trait.impl`.
    pub fn add_script(&self, relative: &str, content: &str) {
        self.workspace.create_file(
            &format!("{}/trait.impl/{}", Self::DOC_DIR, relative),
            content,
        );
    }

    /// Project directory (parent of `target/`).
    pub fn project(&self) -> &Path {
        self.workspace.path()
    }

    /// The doc root (`target/doc`).
    pub fn doc_root(&self) -> PathBuf {
        self.workspace.path().join(Self::DOC_DIR)
    }
}

#[fixture]
pub fn doc_tree() -> DocTree {
    DocTree::new()
}

/// A `DocState` with the given tree indexed. The caller keeps the tree alive.
pub async fn indexed_state(tree: &DocTree) -> Arc<DocState> {
    let state = Arc::new(DocState::new());
    state
        .set_doc_root(tree.doc_root())
        .await
        .expect("Failed to index doc tree");
    state
}
