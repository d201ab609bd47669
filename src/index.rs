//! Index of every trait's implementor table under a rustdoc output directory.

use crate::error::{LoadError, Result};
use crate::implementor::ImplementorRecord;
use crate::page::TraitPage;
use crate::table::ImplementorTable;
use crate::types::TraitPath;
use anyhow::Context;
use ignore::WalkBuilder;
use rapidfuzz::distance::jaro_winkler;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory under the doc root that holds implementor scripts.
pub const TRAIT_IMPL_DIR: &str = "trait.impl";

/// Suggestions below this similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A script that could not be loaded during a scan.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// A close match for a trait path that was not found.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitSuggestion {
    pub trait_path: TraitPath,
    pub score: f64,
}

/// One trait implemented by a type, found by [`DocIndex::impls_for_type`].
#[derive(Debug, Clone)]
pub struct TypeImpl {
    pub trait_path: TraitPath,
    /// Crate that provides the impl
    pub crate_name: String,
    pub record: ImplementorRecord,
}

/// Trait pages found under a doc root, keyed by trait path.
#[derive(Debug)]
pub struct DocIndex {
    root: PathBuf,
    pages: BTreeMap<TraitPath, TraitPage>,
    failures: Vec<ScanFailure>,
}

impl DocIndex {
    /// An index with no pages, rooted at `root`.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pages: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Scan `root/trait.impl` and load every implementor script found there.
    ///
    /// Unreadable scripts are logged and collected in [`Self::failures`]; they
    /// do not abort the scan.
    pub fn scan(root: &Path) -> Result<Self> {
        let impl_dir = root.join(TRAIT_IMPL_DIR);
        anyhow::ensure!(
            impl_dir.is_dir(),
            "No {} directory under {}",
            TRAIT_IMPL_DIR,
            root.display()
        );

        let mut index = Self::empty(root);

        // target/ is usually git-ignored, so ignore files must not apply here.
        let walker = WalkBuilder::new(&impl_dir)
            .standard_filters(false)
            .follow_links(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %impl_dir.display(), error = %e, "Walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let Some(trait_path) = path
                .strip_prefix(&impl_dir)
                .ok()
                .and_then(TraitPath::from_relative_file)
            else {
                continue;
            };

            let page = TraitPage::with_source(trait_path.clone(), path.to_path_buf());
            if let Err(e) = page.reload() {
                tracing::warn!(path = %path.display(), error = %e, "Skipping implementor script");
                index.failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                continue;
            }
            index.pages.insert(trait_path, page);
        }

        tracing::info!(
            root = %root.display(),
            traits = index.pages.len(),
            failures = index.failures.len(),
            "Indexed implementor tables"
        );
        Ok(index)
    }

    /// [`Self::scan`] on the blocking thread pool.
    pub async fn load(root: PathBuf) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::scan(&root))
            .await
            .context("Scan task panicked")?
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn failures(&self) -> &[ScanFailure] {
        &self.failures
    }

    pub fn trait_count(&self) -> usize {
        self.pages.len()
    }

    /// Indexed trait paths in order.
    pub fn traits(&self) -> impl Iterator<Item = &TraitPath> {
        self.pages.keys()
    }

    pub fn page(&self, trait_path: &TraitPath) -> Option<&TraitPage> {
        self.pages.get(trait_path)
    }

    /// Total implementor records across all traits.
    pub fn record_count(&self) -> usize {
        self.pages
            .values()
            .filter_map(TraitPage::snapshot)
            .map(|table| table.len())
            .sum()
    }

    /// Resolve a query to an indexed trait.
    ///
    /// Accepts a full path (`crypto_common::IvSizeUser`) or a bare trait name
    /// (`IvSizeUser`) that identifies exactly one indexed trait. Otherwise the
    /// closest paths are returned, best first.
    pub fn resolve(&self, query: &str) -> std::result::Result<&TraitPath, Vec<TraitSuggestion>> {
        let query = query.trim();

        if let Ok(path) = query.parse::<TraitPath>()
            && let Some((found, _)) = self.pages.get_key_value(&path)
        {
            return Ok(found);
        }

        let mut by_name = self.pages.keys().filter(|path| path.name() == query);
        if let (Some(only), None) = (by_name.next(), by_name.next()) {
            return Ok(only);
        }

        Err(self.suggest(query))
    }

    /// Implementor table of a trait, delivered through its page.
    pub fn implementors_of(
        &self,
        query: &str,
    ) -> std::result::Result<(&TraitPath, Arc<ImplementorTable>), Vec<TraitSuggestion>> {
        let trait_path = self.resolve(query)?;
        let table = self
            .pages
            .get(trait_path)
            .and_then(TraitPage::implementors)
            .unwrap_or_default();
        Ok((trait_path, table))
    }

    /// Every indexed impl whose implementing type matches `query`, either by
    /// full path (`cbc::Decryptor`) or by name (`Decryptor`).
    pub fn impls_for_type(&self, query: &str) -> Vec<TypeImpl> {
        let query = query.trim();
        let by_path = query.contains("::");

        let mut found = Vec::new();
        for (trait_path, page) in &self.pages {
            let Some(table) = page.implementors() else {
                continue;
            };
            for (crate_name, record) in table.records() {
                let Some(signature) = record.signature() else {
                    continue;
                };
                let matches = if by_path {
                    signature.self_path.as_deref() == Some(query)
                } else {
                    signature.self_name == query
                };
                if matches {
                    found.push(TypeImpl {
                        trait_path: trait_path.clone(),
                        crate_name: crate_name.to_string(),
                        record: record.clone(),
                    });
                }
            }
        }
        found
    }

    /// Re-read one trait's script. The new table replaces the old one.
    pub fn reload(&self, trait_path: &TraitPath) -> std::result::Result<(), LoadError> {
        let page = self.pages.get(trait_path).ok_or_else(|| LoadError::NotFound {
            trait_path: trait_path.to_string(),
            path: self.root.join(trait_path.relative_file()),
        })?;
        let delivery = page.reload()?;
        tracing::debug!(trait_path = %trait_path, ?delivery, "Reloaded implementors");
        Ok(())
    }

    fn suggest(&self, query: &str) -> Vec<TraitSuggestion> {
        let mut suggestions: Vec<TraitSuggestion> = self
            .pages
            .keys()
            .map(|path| {
                let full = path.to_string();
                let score = jaro_winkler::similarity(query.chars(), full.chars())
                    .max(jaro_winkler::similarity(query.chars(), path.name().chars()));
                TraitSuggestion {
                    trait_path: path.clone(),
                    score,
                }
            })
            .filter(|s| s.score >= SUGGESTION_THRESHOLD)
            .collect();
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions.truncate(5);
        suggestions
    }
}
