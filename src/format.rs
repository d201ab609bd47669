//! Plain-text rendering of tool output.

use crate::implementor::ImplementorRecord;
use crate::index::{DocIndex, TraitSuggestion, TypeImpl};
use crate::table::ImplementorTable;
use crate::types::TraitPath;
use std::fmt::Write as _;
use std::path::Path;

/// Summary shown after a doc root is indexed.
pub fn doc_root_summary(index: &DocIndex, previous: Option<&Path>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Doc root: {}", index.root().display());
    if let Some(previous) = previous
        && previous != index.root()
    {
        let _ = writeln!(out, "Previous: {}", previous.display());
    }
    let _ = writeln!(
        out,
        "Indexed {} traits with {} implementors",
        index.trait_count(),
        index.record_count()
    );

    if !index.failures().is_empty() {
        let _ = writeln!(out, "\n{} scripts could not be read:", index.failures().len());
        for failure in index.failures().iter().take(10) {
            let _ = writeln!(out, "• {}: {}", failure.path.display(), failure.error);
        }
    }
    out
}

/// Implementors of one trait, grouped by providing crate.
pub fn implementor_listing(trait_path: &TraitPath, table: &ImplementorTable) -> String {
    let mut out = format!("# Implementors of `{}`\n", trait_path);
    if table.is_empty() {
        out.push_str("\nNo implementors documented.\n");
        return out;
    }

    for (crate_name, records) in table.iter() {
        let _ = writeln!(out, "\n## {} ({})", crate_name, records.len());
        for record in records {
            write_record(&mut out, record);
        }
    }
    out
}

/// Result of re-reading one trait's script.
pub fn reload_summary(trait_path: &TraitPath, table: &ImplementorTable) -> String {
    format!(
        "Reloaded `{}`: {} implementors from {} crates\n",
        trait_path,
        table.len(),
        table.crate_count()
    )
}

/// Traits implemented by a type.
pub fn type_impl_listing(query: &str, impls: &[TypeImpl]) -> String {
    if impls.is_empty() {
        return format!("No indexed trait implementations found for `{}`.\n", query);
    }

    let mut out = format!("# Traits implemented by `{}` ({})\n\n", query, impls.len());
    for found in impls {
        let _ = writeln!(out, "• `{}` (impl in {})", found.trait_path, found.crate_name);
        let _ = writeln!(out, "    {}", found.record.plain_text());
    }
    out
}

/// Message for an unknown trait query.
pub fn not_found(query: &str, suggestions: &[TraitSuggestion]) -> String {
    let mut out = format!("Trait '{}' not found in the index.", query);
    if suggestions.is_empty() {
        out.push_str("\n\nUse list_traits to see the indexed traits.");
    } else {
        out.push_str(" Did you mean one of these?\n\n");
        for suggestion in suggestions {
            let _ = writeln!(out, "• `{}`", suggestion.trait_path);
        }
    }
    out
}

fn write_record(out: &mut String, record: &ImplementorRecord) {
    let _ = write!(out, "- {}", record.plain_text());
    if let Some(path) = record.signature().and_then(|s| s.self_path.as_deref()) {
        let _ = write!(out, "  [{}]", path);
    }
    if record.is_synthetic() {
        out.push_str(" (auto)");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_implementor_listing_groups_by_crate() {
        let mut table = ImplementorTable::new();
        table.push(
            "cbc",
            ImplementorRecord::new(
                r#"impl <a class="trait" href="x" title="trait crypto_common::IvSizeUser">IvSizeUser</a> for <a class="struct" href="y" title="struct cbc::Encryptor">Encryptor</a>"#,
            ),
        );
        let path: TraitPath = "crypto_common::IvSizeUser".parse().unwrap();

        let out = implementor_listing(&path, &table);
        check!(out.starts_with("# Implementors of `crypto_common::IvSizeUser`"));
        check!(out.contains("## cbc (1)"));
        check!(out.contains("- impl IvSizeUser for Encryptor  [cbc::Encryptor]"));
    }

    #[test]
    fn test_empty_listing() {
        let path: TraitPath = "a::B".parse().unwrap();
        check!(implementor_listing(&path, &ImplementorTable::new()).contains("No implementors"));
    }

    #[test]
    fn test_not_found_without_suggestions() {
        check!(not_found("Nope", &[]).contains("list_traits"));
    }
}
