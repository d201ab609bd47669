pub mod find_impls;
pub mod list_implementors;
pub mod list_traits;
pub mod reload_trait;
pub mod set_doc_root;

pub use find_impls::*;
pub use list_implementors::*;
pub use list_traits::*;
pub use reload_trait::*;
pub use set_doc_root::*;
