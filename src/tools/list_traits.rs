//! Listing the traits that have implementor tables.

use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListTraitsRequest {
    /// Only list traits defined in this crate
    #[serde(default)]
    pub crate_name: Option<String>,
}

pub async fn handle_list_traits(
    state: &DocState,
    request: ListTraitsRequest,
) -> Result<String, String> {
    let index = state.require_index().await?;
    let filter = request.crate_name.as_deref().map(|name| name.replace('-', "_"));

    let mut out = String::new();
    let mut count = 0usize;
    for trait_path in index.traits() {
        if filter.as_deref().is_some_and(|name| trait_path.crate_name() != name) {
            continue;
        }
        let implementors = index
            .page(trait_path)
            .and_then(|page| page.snapshot())
            .map_or(0, |table| table.len());
        let _ = writeln!(out, "• `{}` ({} implementors)", trait_path, implementors);
        count += 1;
    }

    if count == 0 {
        return Ok(match request.crate_name {
            Some(name) => format!("No indexed traits defined in crate '{}'.", name),
            None => "No traits indexed.".to_string(),
        });
    }
    Ok(format!("{} traits:\n\n{}", count, out))
}
