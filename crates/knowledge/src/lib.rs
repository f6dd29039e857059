//! Knowledge base for the Skyline support agent.
//!
//! - [`store::load`] reads and validates the JSON document.
//! - [`ContextFormatter`] flattens it into the text block that is inserted
//!   into every prompt.
//!
//! The document is immutable once loaded; the formatted context is computed
//! once per process.

pub mod document;
pub mod formatter;
pub mod store;

pub use document::{
    Amenities, CompanyInfo, ContactInfo, Faq, Field, KnowledgeDocument, PricingInfo, Project,
};
pub use formatter::{format_context, ContextFormatter, DEFAULT_TITLE, MISSING};
pub use store::load;
