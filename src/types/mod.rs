mod document;
mod filter;
mod property;

pub use document::{Document, DocumentId, ParseDocumentIdError};
pub use filter::Filter;
pub use property::{PropertyDraft, SchemaError};
