//! Listing the implementors of a trait.

use crate::format::{implementor_listing, not_found};
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListImplementorsRequest {
    /// Trait path such as 'crypto_common::IvSizeUser', or a unique trait name
    pub trait_path: String,
    /// Only show impls provided by this crate
    #[serde(default)]
    pub crate_name: Option<String>,
}

pub async fn handle_list_implementors(
    state: &DocState,
    request: ListImplementorsRequest,
) -> Result<String, String> {
    let index = state.require_index().await?;

    let (trait_path, table) = match index.implementors_of(&request.trait_path) {
        Ok(found) => found,
        Err(suggestions) => return Err(not_found(&request.trait_path, &suggestions)),
    };

    let table = match &request.crate_name {
        Some(crate_name) => std::sync::Arc::new(table.filter_crate(crate_name)),
        None => table,
    };
    Ok(implementor_listing(trait_path, &table))
}
