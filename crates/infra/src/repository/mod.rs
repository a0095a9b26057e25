//! Invoice storage: the canonical record set the query engine reads from.

pub mod in_memory;
pub mod seed;

pub use in_memory::{InMemoryInvoiceRepository, InvoiceRepository};
pub use seed::sample_invoices;
