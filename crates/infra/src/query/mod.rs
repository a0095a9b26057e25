//! In-memory invoice query engine.
//!
//! A query runs over an owned snapshot of the repository in four fixed steps:
//! global filter, field filters, stable sort, pagination. Every step is
//! synchronous, so a result never reflects a partially processed record set.

pub mod engine;
pub mod field;
pub mod params;

pub use engine::execute;
pub use field::{FieldValue, InvoiceField, UnknownField};
pub use params::{DEFAULT_SORT_FIELD, QueryParams, QueryResult, SortOrder};
