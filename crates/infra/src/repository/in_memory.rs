use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use invoicedesk_core::{DomainError, DomainResult, Entity, InvoiceId};
use invoicedesk_invoicing::{Invoice, InvoiceDraft};

use crate::repository::seed;

/// Append-only invoice store.
///
/// Readers get owned snapshots; nothing handed out aliases the live records.
pub trait InvoiceRepository: Send + Sync {
    /// Copy of every record, in insertion order.
    fn snapshot(&self) -> Vec<Invoice>;
    fn get(&self, id: InvoiceId) -> Option<Invoice>;
    /// Persist a draft under the next id. A number is generated when the draft has none.
    fn append(&self, draft: InvoiceDraft) -> DomainResult<Invoice>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> InvoiceRepository for Arc<S>
where
    S: InvoiceRepository + ?Sized,
{
    fn snapshot(&self) -> Vec<Invoice> {
        (**self).snapshot()
    }

    fn get(&self, id: InvoiceId) -> Option<Invoice> {
        (**self).get(id)
    }

    fn append(&self, draft: InvoiceDraft) -> DomainResult<Invoice> {
        (**self).append(draft)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

#[derive(Debug)]
struct Records {
    invoices: Vec<Invoice>,
    next_id: InvoiceId,
}

/// In-memory repository for tests/dev, seeded once at construction.
#[derive(Debug)]
pub struct InMemoryInvoiceRepository {
    inner: RwLock<Records>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Records {
                invoices: Vec::new(),
                next_id: InvoiceId::new(1),
            }),
        }
    }

    /// Start from existing records. Ids and invoice numbers must be unique.
    pub fn with_invoices(invoices: Vec<Invoice>) -> DomainResult<Self> {
        let mut ids = HashSet::new();
        let mut numbers = HashSet::new();
        for invoice in &invoices {
            if !ids.insert(invoice.id()) {
                return Err(DomainError::conflict(format!(
                    "duplicate invoice id {}",
                    invoice.id()
                )));
            }
            if !numbers.insert(invoice.invoice_number()) {
                return Err(DomainError::conflict(format!(
                    "duplicate invoice number {}",
                    invoice.invoice_number()
                )));
            }
        }

        let next_id = invoices
            .iter()
            .map(Entity::id)
            .max()
            .map(|id| id.next())
            .unwrap_or(InvoiceId::new(1));

        Ok(Self {
            inner: RwLock::new(Records { invoices, next_id }),
        })
    }

    /// Repository holding the generated sample dataset.
    pub fn seeded(count: usize) -> DomainResult<Self> {
        let invoices = seed::sample_invoices(count)?;
        tracing::debug!(count = invoices.len(), "seeded invoice repository");
        Self::with_invoices(invoices)
    }
}

impl Default for InMemoryInvoiceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn snapshot(&self) -> Vec<Invoice> {
        match self.inner.read() {
            Ok(records) => records.invoices.clone(),
            Err(_) => vec![],
        }
    }

    fn get(&self, id: InvoiceId) -> Option<Invoice> {
        let records = self.inner.read().ok()?;
        records.invoices.iter().find(|inv| inv.id() == id).cloned()
    }

    fn append(&self, draft: InvoiceDraft) -> DomainResult<Invoice> {
        let mut records = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("invoice repository lock poisoned"))?;

        let id = records.next_id;
        let invoice_number = match draft.invoice_number() {
            Some(number) => number.to_string(),
            None => seed::invoice_number(id),
        };

        if records
            .invoices
            .iter()
            .any(|inv| inv.invoice_number() == invoice_number)
        {
            return Err(DomainError::conflict(format!(
                "invoice number {invoice_number} already exists"
            )));
        }

        let invoice = Invoice::from_draft(id, invoice_number, draft);
        records.invoices.push(invoice.clone());
        records.next_id = id.next();

        Ok(invoice)
    }

    fn len(&self) -> usize {
        self.inner.read().map(|r| r.invoices.len()).unwrap_or(0)
    }
}
