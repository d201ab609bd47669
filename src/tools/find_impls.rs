//! Reverse lookup: which traits a type implements.

use crate::format::type_impl_listing;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindImplsRequest {
    /// Type path such as 'cbc::Decryptor', or a bare type name
    pub type_path: String,
}

pub async fn handle_find_impls(
    state: &DocState,
    request: FindImplsRequest,
) -> Result<String, String> {
    let index = state.require_index().await?;
    let impls = index.impls_for_type(&request.type_path);
    Ok(type_impl_listing(request.type_path.trim(), &impls))
}
