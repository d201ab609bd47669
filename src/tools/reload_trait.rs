//! Re-reading one trait's implementor script after `cargo doc` reruns.

use crate::format::{not_found, reload_summary};
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReloadTraitRequest {
    /// Trait path such as 'crypto_common::IvSizeUser', or a unique trait name
    pub trait_path: String,
}

pub async fn handle_reload_trait(
    state: &DocState,
    request: ReloadTraitRequest,
) -> Result<String, String> {
    let index = state.require_index().await?;

    let trait_path = match index.resolve(&request.trait_path) {
        Ok(trait_path) => trait_path,
        Err(suggestions) => return Err(not_found(&request.trait_path, &suggestions)),
    };

    // On failure the previously loaded table stays in place.
    index
        .reload(trait_path)
        .map_err(|e| format!("Failed to reload `{}`: {}", trait_path, e))?;

    let table = index
        .implementors_of(&trait_path.to_string())
        .map(|(_, table)| table)
        .map_err(|suggestions| not_found(&request.trait_path, &suggestions))?;
    Ok(reload_summary(trait_path, &table))
}
