//! Invoicing domain module.
//!
//! This crate contains the invoice model, line-item aggregation and the
//! create/view form controller, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod aggregation;
pub mod form;
pub mod invoice;

pub use aggregation::{LineAmount, invoice_total, item_total};
pub use form::{
    FieldError, FieldErrorKind, FieldPath, FormError, FormItem, FormMode, FormOutcome,
    HeaderField, InvoiceFormController, ItemField, ValidationErrors,
};
pub use invoice::{Invoice, InvoiceDraft, InvoiceHeader, InvoiceItem};
