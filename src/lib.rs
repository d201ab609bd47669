//! Trait implementor tables from rustdoc output.
//!
//! Rustdoc writes one `trait.impl/<crate>/trait.<Name>.js` script per trait,
//! listing every documented `impl` of that trait grouped by crate. This crate
//! decodes those scripts, models the page-side deliver-or-defer hand-off that
//! consumes them, and indexes a whole doc tree for lookups over MCP.

pub mod cli;
pub mod detection;
pub mod error;
pub mod format;
pub mod implementor;
pub mod index;
pub mod page;
pub mod registry;
pub mod script;
pub mod server;
pub mod state;
pub mod table;
pub mod tools;
pub mod tracing;
pub mod types;

pub use error::{LoadError, Result, ScriptError};
pub use implementor::{ImplSignature, ImplementorRecord};
pub use index::{DocIndex, TypeImpl};
pub use page::TraitPage;
pub use registry::{Delivery, ImplementorRegistry};
pub use script::{parse_implementors_script, render_implementors_script};
pub use state::DocState;
pub use table::ImplementorTable;
pub use types::TraitPath;
