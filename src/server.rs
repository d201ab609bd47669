//! MCP server exposing implementor lookups.

use crate::state::DocState;
use crate::tools::{
    FindImplsRequest, ListImplementorsRequest, ListTraitsRequest, ReloadTraitRequest,
    SetDocRootRequest, handle_find_impls, handle_list_implementors, handle_list_traits,
    handle_reload_trait, handle_set_doc_root,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server answering "who implements what" from rustdoc output.
#[derive(Clone)]
pub struct ImplServer {
    /// Shared documentation state
    state: Arc<DocState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ImplServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplServer")
            .field("state", &self.state)
            .finish()
    }
}

impl Default for ImplServer {
    fn default() -> Self {
        Self::new(Arc::new(DocState::new()))
    }
}

#[tool_router]
impl ImplServer {
    pub fn new(state: Arc<DocState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Index a rustdoc output directory. Accepts the doc directory itself (containing trait.impl/), a target/ directory, or a project directory after `cargo doc`."
    )]
    async fn set_doc_root(
        &self,
        Parameters(request): Parameters<SetDocRootRequest>,
    ) -> std::result::Result<String, String> {
        handle_set_doc_root(&self.state, request).await
    }

    #[tool(
        description = "List traits that have documented implementors, optionally only those defined in one crate.",
        input_schema = inline_schema_for_type::<ListTraitsRequest>()
    )]
    async fn list_traits(
        &self,
        Parameters(request): Parameters<ListTraitsRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_traits(&self.state, request).await
    }

    #[tool(
        description = "List every documented implementor of a trait, grouped by the crate providing the impl, with generic bounds. Accepts a full path like 'crypto_common::IvSizeUser' or a unique trait name.",
        input_schema = inline_schema_for_type::<ListImplementorsRequest>()
    )]
    async fn list_implementors(
        &self,
        Parameters(request): Parameters<ListImplementorsRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_implementors(&self.state, request).await
    }

    #[tool(
        description = "Find the traits a type implements across all indexed implementor tables. Accepts 'cbc::Decryptor' or a bare name like 'Decryptor'."
    )]
    async fn find_impls(
        &self,
        Parameters(request): Parameters<FindImplsRequest>,
    ) -> std::result::Result<String, String> {
        handle_find_impls(&self.state, request).await
    }

    #[tool(
        description = "Re-read one trait's implementor script from the current doc root, e.g. after `cargo doc` regenerated it. Faster than calling set_doc_root again.",
        input_schema = inline_schema_for_type::<ReloadTraitRequest>()
    )]
    async fn reload_trait(
        &self,
        Parameters(request): Parameters<ReloadTraitRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload_trait(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for ImplServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "rustdoc-impls: trait implementor lookups over rustdoc output. \
                 A doc root is detected on startup when possible; use set_doc_root to choose one. \
                 Then use list_traits, list_implementors and find_impls, \
                 and reload_trait after regenerating docs.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// so optional fields render as plain inputs rather than `$ref` patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(rmcp::schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}
