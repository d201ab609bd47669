//! Implementor records and the rustdoc HTML they are described with.

pub(crate) mod html;
mod record;

pub use record::{ImplSignature, ImplementorRecord, SignatureError};
